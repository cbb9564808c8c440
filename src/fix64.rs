use core::fmt;
use core::iter::{Product, Sum};
use core::ops::{
    Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Rem, RemAssign, Sub, SubAssign,
};
use core::str::FromStr;

#[cfg(feature = "rust_decimal")]
use rust_decimal::{Decimal, prelude::ToPrimitive};
#[cfg(feature = "serde")]
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

use crate::FixError;

/// Signed Q31.32 fixed-point number.
///
/// Range: -2,147,483,648 to 2,147,483,647.99999999976716935634
/// Precision: 2^-32
///
/// Equality, ordering and hashing are those of the raw `i64`.
///
/// The raw field is private. Serialization code stores [`Fix64::to_raw`] and
/// restores it with [`Fix64::from_raw`], or uses the `serde` feature.
///
/// ```
/// use fix64::Fix64;
///
/// let stored: i64 = Fix64::PI.to_raw();
/// assert_eq!(stored, 13_493_037_704);
/// assert_eq!(Fix64::from_raw(stored), Fix64::PI);
/// ```
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Fix64 {
    value: i64,
}

// ============================================================================
// Constants
// ============================================================================

impl Fix64 {
    /// Number of fractional bits.
    pub const FRACTIONAL_BITS: u32 = 32;

    const ONE_RAW: i64 = 1 << Self::FRACTIONAL_BITS;
    const FRACTION_MASK: i64 = 0x0000_0000_FFFF_FFFF;
    const INTEGER_MASK: i64 = !Self::FRACTION_MASK;
    const HALF_FRACTION: i64 = 0x8000_0000;

    /// Maximum value: ~2,147,483,648
    pub const MAX: Self = Self { value: i64::MAX };

    /// Minimum value: -2,147,483,648
    pub const MIN: Self = Self { value: i64::MIN };

    /// Zero
    pub const ZERO: Self = Self { value: 0 };

    /// One (1.0)
    pub const ONE: Self = Self {
        value: Self::ONE_RAW,
    };

    /// Minus one (-1.0)
    pub const NEG_ONE: Self = Self {
        value: -Self::ONE_RAW,
    };

    /// Two (2.0)
    pub const TWO: Self = Self {
        value: 2 * Self::ONE_RAW,
    };

    /// One half (0.5)
    pub const HALF: Self = Self {
        value: Self::ONE_RAW / 2,
    };

    /// Smallest positive value, 2^-32.
    pub const PRECISION: Self = Self { value: 1 };

    // ===== Angles =====

    /// π
    pub const PI: Self = Self {
        value: 0x3_243F_6A88,
    };

    /// π/2
    pub const PI_OVER_2: Self = Self {
        value: 0x1_921F_B544,
    };

    /// π/4
    pub const PI_OVER_4: Self = Self { value: 0xC90F_DAA2 };

    /// 2π
    pub const PI_TIMES_2: Self = Self {
        value: 0x6_487E_D511,
    };

    /// 1/π
    pub const PI_INV: Self = Self {
        value: 1_367_130_551,
    };

    /// 2/π
    pub const PI_OVER_2_INV: Self = Self {
        value: 2_734_261_102,
    };

    /// π/180, multiply degrees by this to get radians.
    pub const DEG_TO_RAD: Self = Self::PI.saturating_div(Self::from_i32(180));

    /// 180/π, multiply radians by this to get degrees.
    pub const RAD_TO_DEG: Self = Self::from_i32(180).saturating_div(Self::PI);

    // ===== Logarithms and roots =====

    /// ln(2)
    pub const LN2: Self = Self { value: 0xB172_17F7 };

    /// e
    pub const E: Self = Self {
        value: 11_674_931_554,
    };

    /// log2(e)
    pub const LOG2E: Self = Self {
        value: 6_196_328_018,
    };

    /// log10(e)
    pub const LOG10E: Self = Self {
        value: 1_865_280_596,
    };

    /// ln(10)
    pub const LN10: Self = Self {
        value: 9_889_527_670,
    };

    /// √2
    pub const SQRT2: Self = Self {
        value: 6_074_000_999,
    };

    /// Exponents at or above this make `pow2` saturate.
    pub(crate) const LOG2_MAX: Self = Self {
        value: 0x1F_0000_0000,
    };

    /// Exponents at or below this make `pow2` underflow to zero.
    pub(crate) const LOG2_MIN: Self = Self {
        value: -0x20_0000_0000,
    };
}

// ============================================================================
// Constructors and Raw Access
// ============================================================================

impl Default for Fix64 {
    fn default() -> Self {
        Self::ZERO
    }
}

impl Fix64 {
    /// Creates a Fix64 from its raw representation (the value times 2^32).
    ///
    /// Every `i64` is a valid raw value. Lookup tables, serialization and
    /// replay code use this to restore values without a conversion step.
    #[inline(always)]
    pub const fn from_raw(value: i64) -> Self {
        Self { value }
    }

    /// Returns the raw internal value (the value times 2^32).
    #[inline(always)]
    pub const fn to_raw(self) -> i64 {
        self.value
    }
}

// ============================================================================
// Arithmetic Operations - Addition
// ============================================================================

impl Fix64 {
    /// Checked addition. Returns `None` if overflow occurred.
    #[inline(always)]
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub const fn checked_add(self, rhs: Self) -> Option<Self> {
        if let Some(result) = self.value.checked_add(rhs.value) {
            Some(Self { value: result })
        } else {
            None
        }
    }

    /// Saturating addition. On overflow returns `MIN` or `MAX` depending on
    /// the sign of the operands.
    #[inline(always)]
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub const fn saturating_add(self, rhs: Self) -> Self {
        let x = self.value;
        let y = rhs.value;
        let sum = x.wrapping_add(y);
        // operands share a sign and the sum does not
        if ((!(x ^ y) & (x ^ sum)) & i64::MIN) != 0 {
            return if x > 0 { Self::MAX } else { Self::MIN };
        }
        Self { value: sum }
    }

    /// Addition without overflow checking. Wraps on overflow.
    #[inline(always)]
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub const fn wrapping_add(self, rhs: Self) -> Self {
        Self {
            value: self.value.wrapping_add(rhs.value),
        }
    }
}

// ============================================================================
// Arithmetic Operations - Subtraction
// ============================================================================

impl Fix64 {
    /// Checked subtraction. Returns `None` if overflow occurred.
    #[inline(always)]
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub const fn checked_sub(self, rhs: Self) -> Option<Self> {
        if let Some(result) = self.value.checked_sub(rhs.value) {
            Some(Self { value: result })
        } else {
            None
        }
    }

    /// Saturating subtraction. On overflow returns `MIN` or `MAX` depending on
    /// the sign of `self`.
    #[inline(always)]
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub const fn saturating_sub(self, rhs: Self) -> Self {
        let x = self.value;
        let y = rhs.value;
        let diff = x.wrapping_sub(y);
        // operands differ in sign and the difference lost the sign of x
        if (((x ^ y) & (x ^ diff)) & i64::MIN) != 0 {
            return if x < 0 { Self::MIN } else { Self::MAX };
        }
        Self { value: diff }
    }

    /// Subtraction without overflow checking. Wraps on overflow.
    #[inline(always)]
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub const fn wrapping_sub(self, rhs: Self) -> Self {
        Self {
            value: self.value.wrapping_sub(rhs.value),
        }
    }
}

// ============================================================================
// Arithmetic Operations - Multiplication
// ============================================================================

/// The four 32x32 partial products of a Q31.32 multiplication, already
/// aligned to the result's binary point.
struct PartialProducts {
    lo: i64,
    mid1: i64,
    mid2: i64,
    hi: i64,
    /// Unshifted high product; its top half never reaches the result.
    hi_hi: i64,
}

impl Fix64 {
    #[inline(always)]
    const fn partial_products(x: i64, y: i64) -> PartialProducts {
        let x_lo = (x & Self::FRACTION_MASK) as u64;
        let x_hi = x >> Self::FRACTIONAL_BITS;
        let y_lo = (y & Self::FRACTION_MASK) as u64;
        let y_hi = y >> Self::FRACTIONAL_BITS;

        let lo_lo = x_lo * y_lo;
        let lo_hi = (x_lo as i64).wrapping_mul(y_hi);
        let hi_lo = x_hi.wrapping_mul(y_lo as i64);
        let hi_hi = x_hi.wrapping_mul(y_hi);

        PartialProducts {
            lo: (lo_lo >> Self::FRACTIONAL_BITS) as i64,
            mid1: lo_hi,
            mid2: hi_lo,
            hi: hi_hi << Self::FRACTIONAL_BITS,
            hi_hi,
        }
    }

    /// Wrapping sum that also accumulates a sign-carry flag.
    #[inline(always)]
    const fn add_tracking_overflow(x: i64, y: i64, overflow: bool) -> (i64, bool) {
        let sum = x.wrapping_add(y);
        (sum, overflow | (((x ^ y ^ sum) & i64::MIN) != 0))
    }

    /// Saturating multiplication.
    ///
    /// Splits both operands into 32-bit halves, sums the partial products and
    /// then checks three overflow conditions: a result sign that contradicts
    /// the operand signs, high bits of the top product that do not fit, and a
    /// negative result that shrank below the negative operand.
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub const fn saturating_mul(self, rhs: Self) -> Self {
        let x = self.value;
        let y = rhs.value;
        let p = Self::partial_products(x, y);

        let (sum, overflow) = Self::add_tracking_overflow(p.lo, p.mid1, false);
        let (sum, overflow) = Self::add_tracking_overflow(sum, p.mid2, overflow);
        let (sum, overflow) = Self::add_tracking_overflow(sum, p.hi, overflow);

        let signs_equal = ((x ^ y) & i64::MIN) == 0;

        // Equal signs with a negative result overflowed positively, and the reverse.
        if signs_equal {
            if sum < 0 || (overflow && x > 0) {
                return Self::MAX;
            }
        } else if sum > 0 {
            return Self::MIN;
        }

        // The top 32 bits of hi_hi must be pure sign extension.
        let top_carry = p.hi_hi >> Self::FRACTIONAL_BITS;
        if top_carry != 0 && top_carry != -1 {
            return if signs_equal { Self::MAX } else { Self::MIN };
        }

        // Signs differ, both magnitudes exceed one, and the result is still
        // above the negative operand: negative overflow.
        if !signs_equal {
            let (positive, negative) = if x > y { (x, y) } else { (y, x) };
            if sum > negative && negative < -Self::ONE_RAW && positive > Self::ONE_RAW {
                return Self::MIN;
            }
        }

        Self { value: sum }
    }

    /// Multiplication without overflow checking. Wraps on overflow.
    #[inline(always)]
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub const fn wrapping_mul(self, rhs: Self) -> Self {
        let p = Self::partial_products(self.value, rhs.value);
        Self {
            value: p.lo.wrapping_add(p.mid1).wrapping_add(p.mid2).wrapping_add(p.hi),
        }
    }

    /// Checked multiplication. Returns `None` if the product does not fit.
    ///
    /// Computed with a 128-bit intermediate, so the overflow test is exact.
    #[inline(always)]
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub const fn checked_mul(self, rhs: Self) -> Option<Self> {
        let product = (self.value as i128 * rhs.value as i128) >> Self::FRACTIONAL_BITS;
        if product > i64::MAX as i128 || product < i64::MIN as i128 {
            None
        } else {
            Some(Self {
                value: product as i64,
            })
        }
    }
}

// ============================================================================
// Arithmetic Operations - Division
// ============================================================================

impl Fix64 {
    /// Binary long division of raw values, rounding half away from zero.
    ///
    /// Each iteration shifts the remainder up by its leading zeros, so the
    /// loop runs once per nonzero quotient chunk rather than once per bit.
    /// Returns `i64::MAX`/`i64::MIN` when the quotient does not fit.
    /// `y` must be nonzero.
    const fn div_raw(x: i64, y: i64) -> i64 {
        let negative = ((x ^ y) & i64::MIN) != 0;
        let mut remainder = x.unsigned_abs();
        let mut divider = y.unsigned_abs();
        let mut quotient = 0u64;
        let mut bit_pos: i32 = 64 / 2 + 1;

        // Strip factors of 16 from the divider.
        while (divider & 0xF) == 0 && bit_pos >= 4 {
            divider >>= 4;
            bit_pos -= 4;
        }

        while remainder != 0 && bit_pos >= 0 {
            let mut shift = remainder.leading_zeros() as i32;
            if shift > bit_pos {
                shift = bit_pos;
            }
            remainder <<= shift as u32;
            bit_pos -= shift;

            let div = remainder / divider;
            remainder %= divider;
            quotient = quotient.wrapping_add(div << bit_pos as u32);

            if (div & !(u64::MAX >> bit_pos as u32)) != 0 {
                return if negative { i64::MIN } else { i64::MAX };
            }

            remainder <<= 1;
            bit_pos -= 1;
        }

        // The quotient carries one extra bit; add one and drop it to round.
        quotient = quotient.wrapping_add(1);
        let result = (quotient >> 1) as i64;
        if negative { result.wrapping_neg() } else { result }
    }

    /// Saturating division. Clamps to `MIN`/`MAX` on overflow.
    ///
    /// # Panics
    /// Panics if `rhs` is zero.
    #[inline(always)]
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub const fn saturating_div(self, rhs: Self) -> Self {
        if rhs.value == 0 {
            panic!("attempt to divide by zero");
        }
        Self {
            value: Self::div_raw(self.value, rhs.value),
        }
    }

    /// Checked division. Returns `None` if `rhs` is zero or the quotient does
    /// not fit.
    ///
    /// Rounds exactly like [`saturating_div`](Self::saturating_div).
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub const fn checked_div(self, rhs: Self) -> Option<Self> {
        if rhs.value == 0 {
            return None;
        }

        // floor(|x| * 2^33 / |y|), then round half up on the magnitude
        let magnitude = ((self.value.unsigned_abs() as u128) << (Self::FRACTIONAL_BITS + 1))
            / rhs.value.unsigned_abs() as u128;
        let rounded = (magnitude + 1) >> 1;

        let negative = (self.value < 0) != (rhs.value < 0);
        if negative {
            if rounded > 1u128 << 63 {
                None
            } else {
                Some(Self {
                    value: (rounded as u64).wrapping_neg() as i64,
                })
            }
        } else if rounded > i64::MAX as u128 {
            None
        } else {
            Some(Self {
                value: rounded as i64,
            })
        }
    }

    /// Division that reports a zero divisor as an error.
    ///
    /// Overflow is not an error here: the quotient saturates exactly like the
    /// `/` operator.
    #[inline(always)]
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub const fn try_div(self, rhs: Self) -> crate::Result<Self> {
        if rhs.value == 0 {
            return Err(FixError::DivisionByZero);
        }
        Ok(Self {
            value: Self::div_raw(self.value, rhs.value),
        })
    }
}

// ============================================================================
// Arithmetic Operations - Remainder
// ============================================================================

impl Fix64 {
    /// Remainder of the raw values; the result takes the sign of `self`.
    ///
    /// `MIN % -1` (raw) is defined as zero.
    ///
    /// # Panics
    /// Panics if `rhs` is zero.
    #[inline(always)]
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub const fn rem(self, rhs: Self) -> Self {
        if self.value == i64::MIN && rhs.value == -1 {
            return Self::ZERO;
        }
        Self {
            value: self.value % rhs.value,
        }
    }

    /// Remainder without the `MIN % -1` special case.
    ///
    /// # Panics
    /// Panics if `rhs` is zero, or if `self` is `MIN` and `rhs` has raw value -1.
    #[inline(always)]
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub const fn fast_rem(self, rhs: Self) -> Self {
        Self {
            value: self.value % rhs.value,
        }
    }

    /// Checked remainder. Returns `None` if `rhs` is zero.
    #[inline(always)]
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub const fn checked_rem(self, rhs: Self) -> Option<Self> {
        if rhs.value == 0 {
            None
        } else {
            Some(self.rem(rhs))
        }
    }

    /// Remainder that reports a zero divisor as an error.
    #[inline(always)]
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub const fn try_rem(self, rhs: Self) -> crate::Result<Self> {
        match self.checked_rem(rhs) {
            Some(result) => Ok(result),
            None => Err(FixError::DivisionByZero),
        }
    }
}

// ============================================================================
// Arithmetic Operations - Negation
// ============================================================================

impl Fix64 {
    /// Checked negation. Returns `None` for `MIN`.
    #[inline(always)]
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub const fn checked_neg(self) -> Option<Self> {
        if let Some(result) = self.value.checked_neg() {
            Some(Self { value: result })
        } else {
            None
        }
    }

    /// Saturating negation. `-MIN` is `MAX`.
    #[inline(always)]
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub const fn saturating_neg(self) -> Self {
        if self.value == i64::MIN {
            Self::MAX
        } else {
            Self { value: -self.value }
        }
    }

    /// Wrapping negation. `-MIN` is `MIN`.
    #[inline(always)]
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub const fn wrapping_neg(self) -> Self {
        Self {
            value: self.value.wrapping_neg(),
        }
    }
}

// ============================================================================
// Arithmetic Operations - Absolute Value
// ============================================================================

impl Fix64 {
    /// Returns the absolute value of `self`. `MIN.abs()` is `MAX`.
    #[inline(always)]
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub const fn abs(self) -> Self {
        if self.value == i64::MIN {
            Self::MAX
        } else {
            self.wrapping_abs()
        }
    }

    /// Branchless absolute value. The result for `MIN` is unspecified
    /// (currently `MIN`).
    #[inline(always)]
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub const fn wrapping_abs(self) -> Self {
        let mask = self.value >> 63;
        Self {
            value: self.value.wrapping_add(mask) ^ mask,
        }
    }

    /// Checked absolute value. Returns `None` for `MIN`.
    #[inline(always)]
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub const fn checked_abs(self) -> Option<Self> {
        if self.value == i64::MIN {
            None
        } else {
            Some(self.wrapping_abs())
        }
    }
}

// ============================================================================
// Sign Operations
// ============================================================================

impl Fix64 {
    /// Returns `true` if `self` is positive.
    #[inline(always)]
    pub const fn is_positive(self) -> bool {
        self.value > 0
    }

    /// Returns `true` if `self` is negative.
    #[inline(always)]
    pub const fn is_negative(self) -> bool {
        self.value < 0
    }

    /// Returns `true` if `self` is zero.
    #[inline(always)]
    pub const fn is_zero(self) -> bool {
        self.value == 0
    }

    /// Returns the sign of `self` as -1, 0, or 1.
    #[inline(always)]
    pub const fn signum(self) -> i32 {
        if self.value > 0 {
            1
        } else if self.value < 0 {
            -1
        } else {
            0
        }
    }
}

// ============================================================================
// Comparison Utilities
// ============================================================================

impl Fix64 {
    /// Returns the minimum of two values.
    #[inline(always)]
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub const fn min(self, other: Self) -> Self {
        if self.value < other.value {
            self
        } else {
            other
        }
    }

    /// Returns the maximum of two values.
    #[inline(always)]
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub const fn max(self, other: Self) -> Self {
        if self.value > other.value {
            self
        } else {
            other
        }
    }

    /// Restricts a value to a certain interval.
    ///
    /// Returns `max` if `self` is greater than `max`, and `min` if `self` is less than `min`.
    /// Otherwise returns `self`.
    ///
    /// # Panics
    ///
    /// Panics if `min > max`.
    #[inline(always)]
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub const fn clamp(self, min: Self, max: Self) -> Self {
        assert!(
            min.value <= max.value,
            "min must be less than or equal to max"
        );
        if self.value < min.value {
            min
        } else if self.value > max.value {
            max
        } else {
            self
        }
    }
}

// ============================================================================
// Rounding Operations
// ============================================================================

impl Fix64 {
    /// Returns the largest integer less than or equal to `self`.
    #[inline(always)]
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub const fn floor(self) -> Self {
        Self {
            value: self.value & Self::INTEGER_MASK,
        }
    }

    /// Returns the smallest integer greater than or equal to `self`.
    #[inline(always)]
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub const fn ceil(self) -> Self {
        if (self.value & Self::FRACTION_MASK) != 0 {
            self.floor().saturating_add(Self::ONE)
        } else {
            self
        }
    }

    /// Returns `self - self.floor()`, always in `[0, 1)`.
    #[inline(always)]
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub const fn fract(self) -> Self {
        Self {
            value: self.value & Self::FRACTION_MASK,
        }
    }

    /// Rounds to the nearest integer, using banker's rounding (round half to even).
    #[inline(always)]
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub const fn round(self) -> Self {
        let fractional = self.value & Self::FRACTION_MASK;
        let integral = self.floor();
        if fractional < Self::HALF_FRACTION {
            integral
        } else if fractional > Self::HALF_FRACTION {
            integral.saturating_add(Self::ONE)
        } else if (integral.value & Self::ONE_RAW) == 0 {
            integral
        } else {
            integral.saturating_add(Self::ONE)
        }
    }

    /// [`floor`](Self::floor) narrowed to `i32`. Values outside the `i32`
    /// range wrap.
    #[inline(always)]
    pub const fn floor_to_int(self) -> i32 {
        self.floor().to_i64() as i32
    }

    /// [`ceil`](Self::ceil) narrowed to `i32`. Values outside the `i32`
    /// range wrap.
    #[inline(always)]
    pub const fn ceil_to_int(self) -> i32 {
        self.ceil().to_i64() as i32
    }

    /// [`round`](Self::round) narrowed to `i32`. Values outside the `i32`
    /// range wrap.
    #[inline(always)]
    pub const fn round_to_int(self) -> i32 {
        self.round().to_i64() as i32
    }
}

// ============================================================================
// Integer Conversions
// ============================================================================

impl Fix64 {
    /// Creates a Fix64 from an i32 integer (always succeeds).
    #[inline(always)]
    pub const fn from_i32(value: i32) -> Self {
        Self {
            value: (value as i64) << Self::FRACTIONAL_BITS,
        }
    }

    /// Creates a Fix64 from an i64 integer. Returns `None` outside the `i32` range.
    #[inline(always)]
    pub const fn from_i64(value: i64) -> Option<Self> {
        if value > i32::MAX as i64 || value < i32::MIN as i64 {
            None
        } else {
            Some(Self::from_i32(value as i32))
        }
    }

    /// Creates a Fix64 from an i64 by shifting it into place; integer bits
    /// beyond the representable range are discarded (two's-complement wrap).
    #[inline(always)]
    pub const fn wrapping_from_i64(value: i64) -> Self {
        Self {
            value: value << Self::FRACTIONAL_BITS,
        }
    }

    /// Creates a Fix64 from an i64, returning an error on overflow.
    #[inline(always)]
    pub const fn try_from_i64(value: i64) -> crate::Result<Self> {
        match Self::from_i64(value) {
            Some(v) => Ok(v),
            None => Err(FixError::Overflow),
        }
    }

    /// Converts to i64 by an arithmetic shift, which rounds toward negative
    /// infinity (`-1.5` becomes `-2`).
    #[inline(always)]
    pub const fn to_i64(self) -> i64 {
        self.value >> Self::FRACTIONAL_BITS
    }
}

// ============================================================================
// Float Conversions
// ============================================================================

impl Fix64 {
    const ONE_F64: f64 = 4_294_967_296.0;
    const ONE_F32: f32 = 4_294_967_296.0;
    const TWO_POW_63: f64 = 9_223_372_036_854_775_808.0;

    /// Creates a Fix64 from an f64, truncating toward zero.
    ///
    /// Returns `None` if the value is NaN, infinite, or out of range.
    #[inline(always)]
    pub fn from_f64(value: f64) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }

        let scaled = value * Self::ONE_F64;

        if scaled >= Self::TWO_POW_63 || scaled < -Self::TWO_POW_63 {
            return None;
        }

        Some(Self {
            value: scaled as i64,
        })
    }

    /// Converts to f64 (`raw / 2^32`, rounded by the float conversion).
    #[inline(always)]
    pub fn to_f64(self) -> f64 {
        self.value as f64 / Self::ONE_F64
    }

    /// Creates a Fix64 from an f32, truncating toward zero.
    #[inline(always)]
    pub fn from_f32(value: f32) -> Option<Self> {
        Self::from_f64(value as f64)
    }

    /// Converts to f32.
    ///
    /// Note: May lose precision.
    #[inline(always)]
    pub fn to_f32(self) -> f32 {
        self.value as f32 / Self::ONE_F32
    }

    /// Creates a Fix64 from an f64, returning an error if invalid.
    #[inline(always)]
    pub fn try_from_f64(value: f64) -> crate::Result<Self> {
        if value.is_nan() || value.is_infinite() {
            return Err(FixError::InvalidFormat);
        }
        Self::from_f64(value).ok_or(FixError::Overflow)
    }

    /// Creates a Fix64 from an f32, returning an error if invalid.
    #[inline(always)]
    pub fn try_from_f32(value: f32) -> crate::Result<Self> {
        Self::try_from_f64(value as f64)
    }
}

// ============================================================================
// Decimal Conversions
// ============================================================================

#[cfg(feature = "rust_decimal")]
impl From<Fix64> for Decimal {
    /// `raw / 2^32` computed in decimal arithmetic.
    fn from(value: Fix64) -> Self {
        Decimal::from(value.value) / Decimal::from(Fix64::ONE_RAW)
    }
}

#[cfg(feature = "rust_decimal")]
impl TryFrom<Decimal> for Fix64 {
    type Error = FixError;

    /// `value * 2^32` truncated toward zero.
    fn try_from(value: Decimal) -> crate::Result<Self> {
        value
            .checked_mul(Decimal::from(Self::ONE_RAW))
            .and_then(|scaled| scaled.trunc().to_i64())
            .map(Self::from_raw)
            .ok_or(FixError::Overflow)
    }
}

// ============================================================================
// String Parsing
// ============================================================================

impl Fix64 {
    /// Decimal digits needed to write any fraction of 2^-32 exactly.
    const EXACT_DIGITS: u32 = 32;

    /// 5^32: `10^32 / 2^32`, so `digits / 5^32` turns a 32-digit decimal
    /// fraction into a raw fraction.
    const FIVE_POW_32: u128 = 23_283_064_365_386_962_890_625;

    /// Parses a decimal string into a Fix64.
    ///
    /// Supports formats like: "123", "-123.45", "+0.5", ".25"
    ///
    /// The value is truncated toward zero to the nearest multiple of 2^-32,
    /// exactly, however many digits are given.
    ///
    /// # Errors
    /// Returns `FixError::InvalidFormat` if the string is not a valid decimal.
    /// Returns `FixError::Overflow` if the value is out of range.
    pub fn from_str_truncated(s: &str) -> crate::Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(FixError::InvalidFormat);
        }

        let bytes = s.as_bytes();
        let (is_negative, digits) = match bytes[0] {
            b'-' => (true, &bytes[1..]),
            b'+' => (false, &bytes[1..]),
            _ => (false, bytes),
        };

        let (int_digits, frac_digits) = match digits.iter().position(|&b| b == b'.') {
            Some(dp) => {
                let frac = &digits[dp + 1..];
                if frac.is_empty() {
                    return Err(FixError::InvalidFormat);
                }
                (&digits[..dp], frac)
            }
            None => (digits, &digits[..0]),
        };

        if int_digits.is_empty() && frac_digits.is_empty() {
            return Err(FixError::InvalidFormat);
        }

        // Parse integer part; anything past 2^31 cannot fit either sign.
        let mut integer = 0u64;
        for &byte in int_digits {
            let digit = byte.wrapping_sub(b'0');
            if digit > 9 {
                return Err(FixError::InvalidFormat);
            }
            integer = integer * 10 + digit as u64;
            if integer > 1 << 31 {
                return Err(FixError::Overflow);
            }
        }

        // Digits past the 32nd cannot move the truncated result.
        let mut fraction = 0u128;
        let mut count = 0u32;
        for &byte in frac_digits {
            let digit = byte.wrapping_sub(b'0');
            if digit > 9 {
                return Err(FixError::InvalidFormat);
            }
            if count < Self::EXACT_DIGITS {
                fraction = fraction * 10 + digit as u128;
                count += 1;
            }
        }
        fraction *= 10u128.pow(Self::EXACT_DIGITS - count);

        let magnitude =
            ((integer as u128) << Self::FRACTIONAL_BITS) | (fraction / Self::FIVE_POW_32);

        let value = if is_negative {
            if magnitude > 1u128 << 63 {
                return Err(FixError::Overflow);
            }
            (magnitude as u64).wrapping_neg() as i64
        } else {
            if magnitude > i64::MAX as u128 {
                return Err(FixError::Overflow);
            }
            magnitude as i64
        };

        Ok(Self { value })
    }

    /// Parses a Fix64 from a UTF-8 byte slice.
    pub fn from_utf8_bytes(bytes: &[u8]) -> crate::Result<Self> {
        let s = core::str::from_utf8(bytes).map_err(|_| FixError::InvalidFormat)?;
        Self::from_str_truncated(s)
    }
}

impl FromStr for Fix64 {
    type Err = FixError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_str_truncated(s)
    }
}

// ============================================================================
// Byte Conversions
// ============================================================================

impl Fix64 {
    /// Creates from big-endian bytes of the raw value.
    #[inline(always)]
    pub const fn from_be_bytes(bytes: [u8; 8]) -> Self {
        Self {
            value: i64::from_be_bytes(bytes),
        }
    }

    /// Creates from little-endian bytes of the raw value.
    #[inline(always)]
    pub const fn from_le_bytes(bytes: [u8; 8]) -> Self {
        Self {
            value: i64::from_le_bytes(bytes),
        }
    }

    /// Creates from native-endian bytes of the raw value.
    #[inline(always)]
    pub const fn from_ne_bytes(bytes: [u8; 8]) -> Self {
        Self {
            value: i64::from_ne_bytes(bytes),
        }
    }

    /// Raw value as big-endian bytes.
    #[inline(always)]
    pub const fn to_be_bytes(self) -> [u8; 8] {
        self.value.to_be_bytes()
    }

    /// Raw value as little-endian bytes.
    #[inline(always)]
    pub const fn to_le_bytes(self) -> [u8; 8] {
        self.value.to_le_bytes()
    }

    /// Raw value as native-endian bytes.
    #[inline(always)]
    pub const fn to_ne_bytes(self) -> [u8; 8] {
        self.value.to_ne_bytes()
    }
}

// ============================================================================
// Operator Overloading
// ============================================================================

impl Add for Fix64 {
    type Output = Self;

    #[inline(always)]
    fn add(self, rhs: Self) -> Self::Output {
        self.saturating_add(rhs)
    }
}

impl Sub for Fix64 {
    type Output = Self;

    #[inline(always)]
    fn sub(self, rhs: Self) -> Self::Output {
        self.saturating_sub(rhs)
    }
}

impl Mul for Fix64 {
    type Output = Self;

    #[inline(always)]
    fn mul(self, rhs: Self) -> Self::Output {
        self.saturating_mul(rhs)
    }
}

impl Div for Fix64 {
    type Output = Self;

    #[inline(always)]
    fn div(self, rhs: Self) -> Self::Output {
        self.saturating_div(rhs)
    }
}

impl Rem for Fix64 {
    type Output = Self;

    #[inline(always)]
    fn rem(self, rhs: Self) -> Self::Output {
        Fix64::rem(self, rhs)
    }
}

impl Neg for Fix64 {
    type Output = Self;

    #[inline(always)]
    fn neg(self) -> Self::Output {
        self.saturating_neg()
    }
}

impl AddAssign for Fix64 {
    #[inline(always)]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl SubAssign for Fix64 {
    #[inline(always)]
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl MulAssign for Fix64 {
    #[inline(always)]
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl DivAssign for Fix64 {
    #[inline(always)]
    fn div_assign(&mut self, rhs: Self) {
        *self = *self / rhs;
    }
}

impl RemAssign for Fix64 {
    #[inline(always)]
    fn rem_assign(&mut self, rhs: Self) {
        *self = *self % rhs;
    }
}

// ============================================================================
// Standard Library Trait Implementations
// ============================================================================

impl TryFrom<i64> for Fix64 {
    type Error = FixError;

    #[inline(always)]
    fn try_from(value: i64) -> crate::Result<Self> {
        Self::try_from_i64(value)
    }
}

impl TryFrom<f64> for Fix64 {
    type Error = FixError;

    #[inline(always)]
    fn try_from(value: f64) -> crate::Result<Self> {
        Self::try_from_f64(value)
    }
}

impl TryFrom<f32> for Fix64 {
    type Error = FixError;

    #[inline(always)]
    fn try_from(value: f32) -> crate::Result<Self> {
        Self::try_from_f32(value)
    }
}

impl From<i32> for Fix64 {
    #[inline(always)]
    fn from(value: i32) -> Self {
        Self::from_i32(value)
    }
}

impl From<i16> for Fix64 {
    #[inline(always)]
    fn from(value: i16) -> Self {
        Self::from_i32(value as i32)
    }
}

impl From<u16> for Fix64 {
    #[inline(always)]
    fn from(value: u16) -> Self {
        Self::from_i32(value as i32)
    }
}

impl From<i8> for Fix64 {
    #[inline(always)]
    fn from(value: i8) -> Self {
        Self::from_i32(value as i32)
    }
}

impl From<u8> for Fix64 {
    #[inline(always)]
    fn from(value: u8) -> Self {
        Self::from_i32(value as i32)
    }
}

// ============================================================================
// Formatting
// ============================================================================

impl Fix64 {
    /// Fractional digits written by plain `{}`.
    const DISPLAY_DIGITS: u32 = 10;

    /// Writes the value with `digits` fractional digits, rounding half away
    /// from zero. With `trim`, trailing zeros (and a bare point) are dropped.
    fn write_decimal(&self, f: &mut fmt::Formatter<'_>, digits: usize, trim: bool) -> fmt::Result {
        let abs_value = self.value.unsigned_abs();
        let mut integer_part = abs_value >> Self::FRACTIONAL_BITS;

        // Exact fraction as a 32-digit decimal numerator over 10^32.
        let exact = (abs_value & Self::FRACTION_MASK as u64) as u128 * Self::FIVE_POW_32;

        let used = digits.min(Self::EXACT_DIGITS as usize) as u32;
        let divisor = 10u128.pow(Self::EXACT_DIGITS - used);
        let mut fraction = exact / divisor;
        if divisor > 1 && (exact % divisor) * 2 >= divisor {
            fraction += 1;
        }
        if fraction == 10u128.pow(used) {
            fraction = 0;
            integer_part += 1;
        }

        if self.value < 0 && (integer_part != 0 || fraction != 0) {
            f.write_str("-")?;
        }
        write!(f, "{}", integer_part)?;

        if trim {
            let mut width = used as usize;
            while width > 0 && fraction % 10 == 0 {
                fraction /= 10;
                width -= 1;
            }
            if width > 0 {
                write!(f, ".{:0width$}", fraction, width = width)?;
            }
        } else if digits > 0 {
            write!(f, ".{:0width$}", fraction, width = used as usize)?;
            for _ in used as usize..digits {
                f.write_str("0")?;
            }
        }

        Ok(())
    }
}

impl fmt::Display for Fix64 {
    /// `{}` rounds to at most 10 fractional digits, `{:.N}` to exactly N and
    /// `{:#}` prints the exact value.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(precision) = f.precision() {
            return self.write_decimal(f, precision, false);
        }
        if f.alternate() {
            return self.write_decimal(f, Self::EXACT_DIGITS as usize, true);
        }
        self.write_decimal(f, Self::DISPLAY_DIGITS as usize, true)
    }
}

impl fmt::Debug for Fix64 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            // {:#?} shows raw internals
            f.debug_struct("Fix64").field("value", &self.value).finish()
        } else {
            write!(f, "Fix64({})", self)
        }
    }
}

// ============================================================================
// Iterator Trait Implementations
// ============================================================================

impl Sum for Fix64 {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, x| acc + x)
    }
}

impl<'a> Sum<&'a Fix64> for Fix64 {
    fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, x| acc + *x)
    }
}

impl Product for Fix64 {
    fn product<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ONE, |acc, x| acc * x)
    }
}

impl<'a> Product<&'a Fix64> for Fix64 {
    fn product<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.fold(Self::ONE, |acc, x| acc * *x)
    }
}

// ============================================================================
// Serde Support
// ============================================================================

#[cfg(feature = "serde")]
impl Serialize for Fix64 {
    fn serialize<S>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if serializer.is_human_readable() {
            // JSON, TOML, etc. - exact decimal string, parses back bit-for-bit
            serializer.collect_str(&format_args!("{:#}", self))
        } else {
            // Bincode, MessagePack, etc. - serialize raw i64
            self.value.serialize(serializer)
        }
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for Fix64 {
    fn deserialize<D>(deserializer: D) -> core::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        if deserializer.is_human_readable() {
            let s = alloc::string::String::deserialize(deserializer)?;
            Self::from_str(&s).map_err(de::Error::custom)
        } else {
            let value = i64::deserialize(deserializer)?;
            Ok(Self { value })
        }
    }
}









#[cfg(all(test, feature = "rust_decimal"))]
mod decimal_tests {
    use core::str::FromStr;

    use rust_decimal::Decimal;

    use super::*;

    #[test]
    fn test_to_decimal() {
        assert_eq!(Decimal::from(Fix64::HALF), Decimal::from_str("0.5").unwrap());
        assert_eq!(
            Decimal::from(Fix64::from_raw(0x1_4000_0000)),
            Decimal::from_str("1.25").unwrap()
        );
        assert_eq!(Decimal::from(Fix64::MIN), Decimal::from(-2_147_483_648i64));
    }

    #[test]
    fn test_from_decimal_truncates() {
        let tenth = Decimal::from_str("0.1").unwrap();
        assert_eq!(Fix64::try_from(tenth).unwrap().to_raw(), 429_496_729);
        assert_eq!(Fix64::try_from(-tenth).unwrap().to_raw(), -429_496_729);
        assert_eq!(
            Fix64::try_from(Decimal::from_str("0.3183098861837906715377675267").unwrap()),
            Ok(Fix64::PI_INV)
        );
    }

    #[test]
    fn test_from_decimal_overflow() {
        assert_eq!(
            Fix64::try_from(Decimal::from(3_000_000_000i64)),
            Err(FixError::Overflow)
        );
    }
}
