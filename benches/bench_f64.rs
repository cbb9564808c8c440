use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

fn bench_addition(c: &mut Criterion) {
    c.bench_function("f64_addition", |b| {
        let x = 123.456789_f64;
        let y = 987.654321_f64;
        b.iter(|| black_box(black_box(x) + black_box(y)));
    });
}

fn bench_subtraction(c: &mut Criterion) {
    c.bench_function("f64_subtraction", |b| {
        let x = 987.654321_f64;
        let y = 123.456789_f64;
        b.iter(|| black_box(black_box(x) - black_box(y)));
    });
}

fn bench_multiplication(c: &mut Criterion) {
    c.bench_function("f64_multiplication", |b| {
        let x = 123.456789_f64;
        let y = 9.876543_f64;
        b.iter(|| black_box(black_box(x) * black_box(y)));
    });
}

fn bench_division(c: &mut Criterion) {
    c.bench_function("f64_division", |b| {
        let x = 123.456789_f64;
        let y = 9.876543_f64;
        b.iter(|| black_box(black_box(x) / black_box(y)));
    });
}

fn bench_parsing(c: &mut Criterion) {
    c.bench_function("f64_parsing", |b| {
        b.iter(|| black_box("123.456789".parse::<f64>().unwrap()));
    });
}

fn bench_formatting(c: &mut Criterion) {
    c.bench_function("f64_formatting", |b| {
        let d = 123.456789_f64;
        b.iter(|| black_box(format!("{}", d)));
    });
}

fn bench_sum(c: &mut Criterion) {
    c.bench_function("f64_sum_1000_values", |b| {
        let values: Vec<f64> = (0..1000)
            .map(|i| format!("{}.{:02}", i, i % 100).parse().unwrap())
            .collect();
        b.iter(|| black_box(values.iter().sum::<f64>()));
    });
}

fn bench_rounding(c: &mut Criterion) {
    c.bench_function("f64_round", |b| {
        let d = 123.456789_f64;
        b.iter(|| black_box(black_box(d).round_ties_even()));
    });
}

fn bench_comparison(c: &mut Criterion) {
    c.bench_function("f64_comparison", |b| {
        let x = 123.456789_f64;
        let y = 123.456790_f64;
        b.iter(|| black_box(black_box(x) < black_box(y)));
    });
}

fn bench_sqrt(c: &mut Criterion) {
    c.bench_function("f64_sqrt", |b| {
        let d = 123.456789_f64;
        b.iter(|| black_box(black_box(d).sqrt()));
    });
}

fn bench_log2(c: &mut Criterion) {
    c.bench_function("f64_log2", |b| {
        let d = 123.456789_f64;
        b.iter(|| black_box(black_box(d).log2()));
    });
}

fn bench_pow2(c: &mut Criterion) {
    c.bench_function("f64_pow2", |b| {
        let d = 6.789_f64;
        b.iter(|| black_box(black_box(d).exp2()));
    });
}

fn bench_powf(c: &mut Criterion) {
    c.bench_function("f64_powf", |b| {
        let d = 1.05_f64;
        let e = 10.0_f64;
        b.iter(|| black_box(black_box(d).powf(black_box(e))));
    });
}

fn bench_sin(c: &mut Criterion) {
    c.bench_function("f64_sin", |b| {
        let d = 2.345678_f64;
        b.iter(|| black_box(black_box(d).sin()));
    });
}

fn bench_tan(c: &mut Criterion) {
    c.bench_function("f64_tan", |b| {
        let d = 0.345678_f64;
        b.iter(|| black_box(black_box(d).tan()));
    });
}

fn bench_atan2(c: &mut Criterion) {
    c.bench_function("f64_atan2", |b| {
        let y = 3.5_f64;
        let x = -1.25_f64;
        b.iter(|| black_box(black_box(y).atan2(black_box(x))));
    });
}

fn bench_acos(c: &mut Criterion) {
    c.bench_function("f64_acos", |b| {
        let d = 0.345678_f64;
        b.iter(|| black_box(black_box(d).acos()));
    });
}

criterion_group!(
    benches,
    bench_addition,
    bench_subtraction,
    bench_multiplication,
    bench_division,
    bench_parsing,
    bench_formatting,
    bench_sum,
    bench_rounding,
    bench_comparison,
    bench_sqrt,
    bench_log2,
    bench_pow2,
    bench_powf,
    bench_sin,
    bench_tan,
    bench_atan2,
    bench_acos,
);

criterion_main!(benches);
