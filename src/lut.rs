//! Sine and tangent lookup tables over `[0, π/2]`.
//!
//! Both tables hold `LUT_SIZE` raw Q31.32 samples taken at
//! `i * (π/2) / (LUT_SIZE - 1)`, truncated toward zero like every other
//! conversion into `Fix64`. They are generated once, on first use, from
//! integer arithmetic only, so every platform builds bit-identical tables.

use alloc::boxed::Box;
use alloc::vec::Vec;

use lazy_static::lazy_static;

use crate::Fix64;

/// Number of samples per table: `PI_OVER_2.raw >> 15`.
pub(crate) const LUT_SIZE: usize = (Fix64::PI_OVER_2.to_raw() >> 15) as usize;

/// Fractional bits of the generator's working precision (Q2.62).
const WORK_BITS: u32 = 62;

const WORK_ONE: i128 = 1 << WORK_BITS;

/// π/2 in Q2.62, truncated.
const WORK_PI_OVER_2: i128 = 7_244_019_458_077_122_842;

/// Extra bits carried by the angle step so the accumulated step error stays
/// far below one Q2.62 unit across the whole table.
const STEP_EXTRA_BITS: u32 = 28;

/// Taylor terms used for sine; the 14th term is below 2^-62 on `[0, π/2]`.
const SIN_TERMS: usize = 14;

/// Signed Taylor coefficients `(-1)^k / (2k+1)!` in Q2.62.
const SIN_COEFFS: [i128; SIN_TERMS] = sin_coefficients();

const fn sin_coefficients() -> [i128; SIN_TERMS] {
    let mut coeffs = [0i128; SIN_TERMS];
    let mut factorial: i128 = 1;
    let mut k = 0;
    while k < SIN_TERMS {
        let n = 2 * k as i128 + 1;
        if k > 0 {
            factorial *= (n - 1) * n;
        }
        let magnitude = WORK_ONE / factorial;
        coeffs[k] = if k % 2 == 0 { magnitude } else { -magnitude };
        k += 1;
    }
    coeffs
}

pub(crate) struct Tables {
    pub(crate) sin: Box<[i64]>,
    pub(crate) tan: Box<[i64]>,
}

lazy_static! {
    static ref TABLES: Tables = Tables::generate();
}

/// Sine samples, raw Q31.32.
#[inline]
pub(crate) fn sin_lut() -> &'static [i64] {
    &TABLES.sin
}

/// Tangent samples, raw Q31.32. The final entry (π/2) is `i64::MAX`.
#[inline]
pub(crate) fn tan_lut() -> &'static [i64] {
    &TABLES.tan
}

pub(crate) fn initialize() {
    lazy_static::initialize(&TABLES);
}

/// Clamps a computed table index into the table bounds.
#[inline(always)]
pub(crate) const fn clamp_index(index: i64) -> usize {
    if index < 0 {
        0
    } else if index >= LUT_SIZE as i64 {
        LUT_SIZE - 1
    } else {
        index as usize
    }
}

impl Tables {
    fn generate() -> Self {
        // Q2.62 sines for the whole quarter wave; cosines are read mirrored.
        let step = (WORK_PI_OVER_2 << STEP_EXTRA_BITS) / (LUT_SIZE as i128 - 1);
        let work: Vec<i128> = (0..LUT_SIZE)
            .map(|i| work_sin((i as i128 * step) >> STEP_EXTRA_BITS))
            .collect();

        let sin: Box<[i64]> = work.iter().map(|&s| truncate_to_raw(s) as i64).collect();

        let tan: Box<[i64]> = (0..LUT_SIZE)
            .map(|i| {
                let cos = work[LUT_SIZE - 1 - i];
                if cos <= 0 {
                    return i64::MAX;
                }
                let quotient = truncate_to_raw((work[i] << WORK_BITS) / cos);
                if quotient > i64::MAX as i128 {
                    i64::MAX
                } else {
                    quotient as i64
                }
            })
            .collect();

        #[cfg(feature = "tracing")]
        tracing::debug!(entries = LUT_SIZE, "generated sine and tangent lookup tables");

        Self { sin, tan }
    }
}

/// Q2.62 product, flooring.
#[inline(always)]
const fn work_mul(a: i128, b: i128) -> i128 {
    (a * b) >> WORK_BITS
}

/// sin(x) for x in [0, π/2], both in Q2.62, by Horner evaluation in x².
fn work_sin(x: i128) -> i128 {
    let x_sq = work_mul(x, x);
    let mut acc = SIN_COEFFS[SIN_TERMS - 1];
    for k in (0..SIN_TERMS - 1).rev() {
        acc = SIN_COEFFS[k] + work_mul(x_sq, acc);
    }
    work_mul(x, acc)
}

/// Drops the extra fraction bits of a non-negative Q2.62 value.
#[inline(always)]
const fn truncate_to_raw(work: i128) -> i128 {
    work >> (WORK_BITS - Fix64::FRACTIONAL_BITS)
}
