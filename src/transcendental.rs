//! Square root, logarithms, powers and trigonometry for [`Fix64`].
//!
//! Every function here works on raw integers only. Results depend on nothing
//! but the inputs and the lookup tables, so they are identical everywhere.

use crate::lut::{self, LUT_SIZE};
use crate::{Fix64, FixError};

/// `(LUT_SIZE - 1) / (π/2)`: converts an angle in `[0, π/2]` to a table position.
const LUT_INTERVAL: Fix64 =
    Fix64::from_i32(LUT_SIZE as i32 - 1).saturating_div(Fix64::PI_OVER_2);

/// 0.28, the constant of the rational arctangent approximation.
const ATAN2_K: Fix64 = Fix64::from_raw(1_202_590_842);

/// (2^29)π in raw form, the largest multiple of π below `MAX` with this shape.
/// Reducing modulo each of `LARGE_PI >> i` keeps far more precision than a
/// single reduction modulo 2π.
const LARGE_PI: i64 = 7_244_019_458_077_122_842;

/// Angle reduced to `[0, π/2)` plus the mirroring needed to undo the reduction.
struct QuarterAngle {
    angle: i64,
    /// Angle was in the second half of its half-turn: read the table backwards.
    flip_horizontal: bool,
    /// Angle was in `[π, 2π)`: negate the result.
    flip_vertical: bool,
}

impl QuarterAngle {
    fn reduce(raw: i64) -> Self {
        let mut clamped_2pi = raw;
        for i in 0..29 {
            clamped_2pi %= LARGE_PI >> i;
        }
        if raw < 0 {
            clamped_2pi += Fix64::PI_TIMES_2.to_raw();
        }

        let pi = Fix64::PI.to_raw();
        let pi_over_2 = Fix64::PI_OVER_2.to_raw();

        let flip_vertical = clamped_2pi >= pi;
        let mut clamped_pi = clamped_2pi;
        while clamped_pi >= pi {
            clamped_pi -= pi;
        }

        let flip_horizontal = clamped_pi >= pi_over_2;
        let mut angle = clamped_pi;
        if angle >= pi_over_2 {
            angle -= pi_over_2;
        }

        Self {
            angle,
            flip_horizontal,
            flip_vertical,
        }
    }
}

/// Nearest table position for `angle` (in `[0, π/2]`) and the signed distance
/// to it, in units of one table step.
#[inline(always)]
fn table_position(angle: i64) -> (i64, Fix64) {
    let raw_index = Fix64::from_raw(angle).wrapping_mul(LUT_INTERVAL);
    let rounded = raw_index.round();
    let error = raw_index.wrapping_sub(rounded);
    (rounded.to_i64(), error)
}

/// Linear interpolation between two neighbouring samples.
#[inline(always)]
fn interpolation_delta(error: Fix64, nearest: i64, second: i64) -> i64 {
    let gap = Fix64::from_raw(nearest.wrapping_sub(second)).wrapping_abs();
    error.wrapping_mul(gap).to_raw()
}

/// Digit-by-digit square root of a non-negative raw value, in two passes of
/// 64-bit arithmetic, rounded to nearest.
fn sqrt_raw(x: i64) -> i64 {
    let mut num = x as u64;
    let mut result = 0u64;

    // second-to-top bit
    let mut bit = 1u64 << 62;
    while bit > num {
        bit >>= 2;
    }

    for pass in 0..2 {
        while bit != 0 {
            if num >= result.wrapping_add(bit) {
                num = num.wrapping_sub(result.wrapping_add(bit));
                result = (result >> 1).wrapping_add(bit);
            } else {
                result >>= 1;
            }
            bit >>= 2;
        }

        if pass == 0 {
            // Bring in the low 32 bits of the answer.
            if num > (1u64 << 32) - 1 {
                // num would overflow the shift: fold in the half step by hand
                num = num.wrapping_sub(result);
                num = (num << 32).wrapping_sub(0x8000_0000);
                result = (result << 32).wrapping_add(0x8000_0000);
            } else {
                num <<= 32;
                result <<= 32;
            }
            bit = 1u64 << 30;
        }
    }

    if num > result {
        result += 1;
    }
    result as i64
}

/// Clay S. Turner's binary logarithm. `x` must be positive.
fn log2_raw(x: i64) -> i64 {
    let one = Fix64::ONE.to_raw();
    let mut b: i64 = 1 << (Fix64::FRACTIONAL_BITS - 1);
    let mut y: i64 = 0;

    let mut raw_x = x;
    while raw_x < one {
        raw_x <<= 1;
        y -= one;
    }
    while raw_x >= one << 1 {
        raw_x >>= 1;
        y += one;
    }

    let mut z = Fix64::from_raw(raw_x);
    for _ in 0..Fix64::FRACTIONAL_BITS {
        z = z.wrapping_mul(z);
        if z.to_raw() >= one << 1 {
            z = Fix64::from_raw(z.to_raw() >> 1);
            y += b;
        }
        b >>= 1;
    }

    y
}

impl Fix64 {
    // ========================================================================
    // Square Root
    // ========================================================================

    /// Square root, rounded to the nearest raw value.
    ///
    /// Returns `None` for negative input.
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub fn sqrt(self) -> Option<Self> {
        if self.is_negative() {
            None
        } else {
            Some(Self::from_raw(sqrt_raw(self.to_raw())))
        }
    }

    /// Square root, returning `FixError::OutOfDomain` for negative input.
    pub fn try_sqrt(self) -> crate::Result<Self> {
        self.sqrt().ok_or(FixError::OutOfDomain)
    }

    // ========================================================================
    // Logarithms
    // ========================================================================

    /// Base-2 logarithm, at least 9 decimals of accuracy.
    ///
    /// Returns `None` unless `self` is positive.
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub fn log2(self) -> Option<Self> {
        if self.is_positive() {
            Some(Self::from_raw(log2_raw(self.to_raw())))
        } else {
            None
        }
    }

    /// Base-2 logarithm, returning `FixError::OutOfDomain` unless `self` is positive.
    pub fn try_log2(self) -> crate::Result<Self> {
        self.log2().ok_or(FixError::OutOfDomain)
    }

    /// Natural logarithm, `log2(x) * ln(2)`. At least 7 decimals of accuracy.
    ///
    /// Returns `None` unless `self` is positive.
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub fn ln(self) -> Option<Self> {
        self.log2().map(|log| log.wrapping_mul(Self::LN2))
    }

    /// Natural logarithm, returning `FixError::OutOfDomain` unless `self` is positive.
    pub fn try_ln(self) -> crate::Result<Self> {
        self.ln().ok_or(FixError::OutOfDomain)
    }

    // ========================================================================
    // Powers
    // ========================================================================

    /// 2 raised to `self`, at least 6 decimals of accuracy.
    ///
    /// Saturates to `MAX` for exponents of 31 and above; exponents of -31 and
    /// below give `1 / MAX` (two raw units).
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub fn pow2(self) -> Self {
        if self.is_zero() {
            return Self::ONE;
        }

        // exp(-x) = 1/exp(x)
        let negative = self.is_negative();
        let x = if negative { -self } else { self };

        if x == Self::ONE {
            return if negative { Self::HALF } else { Self::TWO };
        }
        if x >= Self::LOG2_MAX {
            return if negative {
                Self::ONE / Self::MAX
            } else {
                Self::MAX
            };
        }
        if x <= Self::LOG2_MIN {
            return if negative { Self::MAX } else { Self::ZERO };
        }

        // Power series for exp(frac * ln 2): term n+1 is term n * x/n.
        let integer_part = x.to_i64() as u32;
        let fraction = x.fract();

        let mut result = Self::ONE;
        let mut term = Self::ONE;
        let mut i = 1;
        while !term.is_zero() {
            term = fraction.wrapping_mul(term).wrapping_mul(Self::LN2) / Self::from_i32(i);
            result += term;
            i += 1;
        }

        result = Self::from_raw(result.to_raw() << integer_part);
        if negative {
            result = Self::ONE / result;
        }
        result
    }

    /// `self` raised to `exponent`, computed as `pow2(exponent * log2(self))`.
    /// About 5 significant digits of accuracy.
    ///
    /// Returns `None` for a zero base with a negative exponent, and for a
    /// negative base (unless the exponent is zero).
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub fn powf(self, exponent: Self) -> Option<Self> {
        self.try_powf(exponent).ok()
    }

    /// `self` raised to `exponent`.
    ///
    /// # Errors
    /// `FixError::DivisionByZero` for a zero base with a negative exponent,
    /// `FixError::OutOfDomain` for a negative base.
    pub fn try_powf(self, exponent: Self) -> crate::Result<Self> {
        if self == Self::ONE || exponent.is_zero() {
            return Ok(Self::ONE);
        }
        if self.is_zero() {
            return if exponent.is_negative() {
                Err(FixError::DivisionByZero)
            } else {
                Ok(Self::ZERO)
            };
        }

        let log = self.try_log2()?;
        Ok((exponent * log).pow2())
    }

    /// `base^exponent` for a base already known to be positive.
    pub(crate) fn pow_positive_base(base: Self, exponent: Self) -> Self {
        if base == Self::ONE || exponent.is_zero() {
            return Self::ONE;
        }
        (exponent * Self::from_raw(log2_raw(base.to_raw()))).pow2()
    }

    // ========================================================================
    // Trigonometry
    // ========================================================================

    /// Sine, by linear interpolation in the sine table.
    ///
    /// Error is below 1e-9 for small arguments; the range reduction keeps it
    /// near that even at `MAX`.
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub fn sin(self) -> Self {
        let QuarterAngle {
            angle,
            flip_horizontal,
            flip_vertical,
        } = QuarterAngle::reduce(self.to_raw());
        let sin_lut = lut::sin_lut();

        let (index, error) = table_position(angle);
        let step = error.signum() as i64;
        let last = LUT_SIZE as i64 - 1;

        let (nearest, second) = if flip_horizontal {
            (
                sin_lut[lut::clamp_index(last - index)],
                sin_lut[lut::clamp_index(last - index - step)],
            )
        } else {
            (
                sin_lut[lut::clamp_index(index)],
                sin_lut[lut::clamp_index(index + step)],
            )
        };

        let delta = interpolation_delta(error, nearest, second);
        let interpolated = if flip_horizontal {
            nearest.wrapping_sub(delta)
        } else {
            nearest.wrapping_add(delta)
        };

        Self::from_raw(if flip_vertical {
            interpolated.wrapping_neg()
        } else {
            interpolated
        })
    }

    /// Cosine, as the sine of the shifted angle.
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub fn cos(self) -> Self {
        Self::cos_to_sin_angle(self).sin()
    }

    /// Sine by nearest table entry, no interpolation. Accurate to 4-5 decimals.
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub fn fast_sin(self) -> Self {
        let QuarterAngle {
            angle,
            flip_horizontal,
            flip_vertical,
        } = QuarterAngle::reduce(self.to_raw());

        // The table has PI_OVER_2 >> 15 entries, so the angle indexes it directly.
        let index = ((angle >> 15) as usize).min(LUT_SIZE - 1);
        let nearest = lut::sin_lut()[if flip_horizontal {
            LUT_SIZE - 1 - index
        } else {
            index
        }];

        Self::from_raw(if flip_vertical { -nearest } else { nearest })
    }

    /// Cosine by nearest table entry. Accurate to 4-5 decimals.
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub fn fast_cos(self) -> Self {
        Self::cos_to_sin_angle(self).fast_sin()
    }

    #[inline(always)]
    const fn cos_to_sin_angle(x: Self) -> Self {
        let raw = x.to_raw();
        let shift = if raw > 0 {
            -Self::PI.to_raw() - Self::PI_OVER_2.to_raw()
        } else {
            Self::PI_OVER_2.to_raw()
        };
        Self::from_raw(raw.wrapping_add(shift))
    }

    /// Tangent, by linear interpolation in the tangent table.
    ///
    /// Accurate for moderate arguments. Near odd multiples of π/2 the result
    /// approaches `MAX` (or `-MAX`) rather than diverging.
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub fn tan(self) -> Self {
        let pi_over_2 = Self::PI_OVER_2.to_raw();

        let mut clamped_pi = self.to_raw() % Self::PI.to_raw();
        let mut flip = false;
        if clamped_pi < 0 {
            clamped_pi = -clamped_pi;
            flip = true;
        }
        if clamped_pi > pi_over_2 {
            flip = !flip;
            clamped_pi = pi_over_2 - (clamped_pi - pi_over_2);
        }

        let tan_lut = lut::tan_lut();
        let (index, error) = table_position(clamped_pi);
        let nearest = tan_lut[lut::clamp_index(index)];
        let second = tan_lut[lut::clamp_index(index + error.signum() as i64)];

        let interpolated = nearest.wrapping_add(interpolation_delta(error, nearest, second));
        Self::from_raw(if flip {
            interpolated.wrapping_neg()
        } else {
            interpolated
        })
    }

    // ========================================================================
    // Inverse Trigonometry
    // ========================================================================

    /// Arccosine in `[0, π]`, via `atan(sqrt(1 - x²) / x)`. At least 7 decimals.
    ///
    /// Returns `None` if `self` is outside `[-1, 1]`.
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub fn acos(self) -> Option<Self> {
        if self < Self::NEG_ONE || self > Self::ONE {
            return None;
        }
        if self.is_zero() {
            return Some(Self::PI_OVER_2);
        }

        let root = Self::from_raw(sqrt_raw((Self::ONE - self * self).to_raw()));
        let result = (root / self).atan();
        Some(if self.is_negative() {
            result + Self::PI
        } else {
            result
        })
    }

    /// Arccosine, returning `FixError::OutOfDomain` outside `[-1, 1]`.
    pub fn try_acos(self) -> crate::Result<Self> {
        self.acos().ok_or(FixError::OutOfDomain)
    }

    /// Arctangent in `[-π/2, π/2]` by Euler's series. At least 7 decimals.
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub fn atan(self) -> Self {
        if self.is_zero() {
            return Self::ZERO;
        }

        // atan(-z) = -atan(z)
        let negative = self.is_negative();
        let mut z = if negative { -self } else { self };

        // atan(z) = π/2 - atan(1/z)
        let invert = z > Self::ONE;
        if invert {
            z = Self::ONE / z;
        }

        let three = Self::from_i32(3);
        let z_sq = z * z;
        let z_sq_2 = z_sq * Self::TWO;
        let z_sq_plus_one = z_sq + Self::ONE;
        let z_sq_12 = z_sq_plus_one * Self::TWO;

        let mut dividend = z_sq_2;
        let mut divisor = z_sq_plus_one * three;
        let mut result = Self::ONE;
        let mut term = Self::ONE;

        for _ in 2..30 {
            term *= dividend / divisor;
            result += term;

            dividend += z_sq_2;
            divisor += z_sq_12;

            if term.is_zero() {
                break;
            }
        }

        result = result * z / z_sq_plus_one;

        if invert {
            result = Self::PI_OVER_2 - result;
        }
        if negative {
            result = -result;
        }
        result
    }

    /// Angle of the point `(x, y)` in `[-π, π]`, `self` being `y`.
    ///
    /// Uses the rational approximation `z / (1 + 0.28 z²)`, so it is only good
    /// to about 2-3 decimals. `atan2(0, 0)` is zero.
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub fn atan2(self, x: Self) -> Self {
        let y = self;
        if x.is_zero() {
            return match y.signum() {
                1 => Self::PI_OVER_2,
                0 => Self::ZERO,
                _ => -Self::PI_OVER_2,
            };
        }

        let z = y / x;

        // Denominator saturated: z is effectively infinite.
        if Self::ONE + ATAN2_K * z * z == Self::MAX {
            return if y.is_negative() {
                -Self::PI_OVER_2
            } else {
                Self::PI_OVER_2
            };
        }

        if z.abs() < Self::ONE {
            let atan = z / (Self::ONE + ATAN2_K * z * z);
            if x.is_negative() {
                return if y.is_negative() {
                    atan - Self::PI
                } else {
                    atan + Self::PI
                };
            }
            atan
        } else {
            let atan = Self::PI_OVER_2 - z / (z * z + ATAN2_K);
            if y.is_negative() {
                atan - Self::PI
            } else {
                atan
            }
        }
    }
}
