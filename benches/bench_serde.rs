use criterion::{Criterion, criterion_group, criterion_main};
use fix64::Fix64;
use serde::{Deserialize, Serialize};
use std::{hint::black_box, str::FromStr};

// ============================================================================
// JSON Serialization/Deserialization
// ============================================================================

fn bench_fix64_serialize_json(c: &mut Criterion) {
    c.bench_function("fix64_serialize_json", |b| {
        let d = Fix64::from_str("123.456789").unwrap();
        b.iter(|| black_box(serde_json::to_string(&black_box(d)).unwrap()));
    });
}

fn bench_fix64_deserialize_json(c: &mut Criterion) {
    c.bench_function("fix64_deserialize_json", |b| {
        let json = r#""123.456789""#;
        b.iter(|| black_box(serde_json::from_str::<Fix64>(black_box(json)).unwrap()));
    });
}

fn bench_fix64_roundtrip_json(c: &mut Criterion) {
    c.bench_function("fix64_roundtrip_json", |b| {
        let d = Fix64::from_str("123.456789").unwrap();
        b.iter(|| {
            let json = serde_json::to_string(&black_box(d)).unwrap();
            black_box(serde_json::from_str::<Fix64>(&json).unwrap())
        });
    });
}

// ============================================================================
// Struct Serialization
// ============================================================================

#[derive(Serialize, Deserialize)]
struct UnitState {
    id: u32,
    x: Fix64,
    y: Fix64,
    heading: Fix64,
    speed: Fix64,
}

fn sample_state() -> UnitState {
    UnitState {
        id: 42,
        x: Fix64::from_str("1024.5").unwrap(),
        y: Fix64::from_str("-77.125").unwrap(),
        heading: Fix64::PI_OVER_4,
        speed: Fix64::from_str("3.75").unwrap(),
    }
}

fn bench_struct_serialize_json(c: &mut Criterion) {
    c.bench_function("fix64_struct_serialize_json", |b| {
        let state = sample_state();
        b.iter(|| black_box(serde_json::to_string(black_box(&state)).unwrap()));
    });
}

fn bench_struct_deserialize_json(c: &mut Criterion) {
    c.bench_function("fix64_struct_deserialize_json", |b| {
        let json = serde_json::to_string(&sample_state()).unwrap();
        b.iter(|| black_box(serde_json::from_str::<UnitState>(black_box(&json)).unwrap()));
    });
}

// ============================================================================
// Binary Serialization
// ============================================================================

fn bench_fix64_serialize_bincode(c: &mut Criterion) {
    c.bench_function("fix64_serialize_bincode", |b| {
        let d = Fix64::from_str("123.456789").unwrap();
        b.iter(|| black_box(bincode::serialize(&black_box(d)).unwrap()));
    });
}

fn bench_fix64_deserialize_bincode(c: &mut Criterion) {
    c.bench_function("fix64_deserialize_bincode", |b| {
        let d = Fix64::from_str("123.456789").unwrap();
        let bytes = bincode::serialize(&d).unwrap();
        b.iter(|| black_box(bincode::deserialize::<Fix64>(black_box(&bytes)).unwrap()));
    });
}

fn bench_struct_roundtrip_bincode(c: &mut Criterion) {
    c.bench_function("fix64_struct_roundtrip_bincode", |b| {
        let state = sample_state();
        b.iter(|| {
            let bytes = bincode::serialize(black_box(&state)).unwrap();
            black_box(bincode::deserialize::<UnitState>(&bytes).unwrap())
        });
    });
}

criterion_group!(
    benches,
    bench_fix64_serialize_json,
    bench_fix64_deserialize_json,
    bench_fix64_roundtrip_json,
    bench_struct_serialize_json,
    bench_struct_deserialize_json,
    bench_fix64_serialize_bincode,
    bench_fix64_deserialize_bincode,
    bench_struct_roundtrip_bincode,
);

criterion_main!(benches);
