//! Scalar helpers built on the core arithmetic: interpolation, easing, angle
//! wrapping and approach functions used by simulation code.

use crate::Fix64;

impl Fix64 {
    /// Default tolerance of [`approx_eq_default`](Self::approx_eq_default): 0.0001, truncated.
    pub const APPROX_EPSILON: Self = Self::from_raw(429_496);

    // ========================================================================
    // Reciprocals and Exponentials
    // ========================================================================

    /// `1 / self`. Returns `None` for zero; large results saturate.
    #[inline]
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub fn recip(self) -> Option<Self> {
        Self::ONE.try_div(self).ok()
    }

    /// `1 / sqrt(self)`. Returns `None` unless `self` is positive.
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub fn rsqrt(self) -> Option<Self> {
        if !self.is_positive() {
            return None;
        }
        self.sqrt().and_then(Self::recip)
    }

    /// e raised to `self`.
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub fn exp(self) -> Self {
        Self::pow_positive_base(Self::E, self)
    }

    /// 10 raised to `self`.
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub fn exp10(self) -> Self {
        Self::pow_positive_base(Self::from_i32(10), self)
    }

    // ========================================================================
    // Interpolation
    // ========================================================================

    /// `a + t * (b - a)`. `t` is not clamped.
    #[inline]
    pub fn lerp(a: Self, b: Self, t: Self) -> Self {
        a + t * (b - a)
    }

    /// Inverse of [`lerp`](Self::lerp): where `x` sits between `a` and `b`.
    ///
    /// Returns `None` when `a == b`.
    #[inline]
    pub fn unlerp(a: Self, b: Self, x: Self) -> Option<Self> {
        (x - a).checked_div_saturating(b - a)
    }

    /// Maps `x` from the range `[a, b]` onto `[c, d]`.
    ///
    /// Returns `None` when `a == b`.
    pub fn remap(a: Self, b: Self, c: Self, d: Self, x: Self) -> Option<Self> {
        Self::unlerp(a, b, x).map(|t| Self::lerp(c, d, t))
    }

    /// `self * a + b`, each step saturating.
    #[inline]
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub fn mul_add(self, a: Self, b: Self) -> Self {
        self * a + b
    }

    /// Clamps to `[0, 1]`.
    #[inline]
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub fn saturate(self) -> Self {
        self.clamp(Self::ZERO, Self::ONE)
    }

    /// Hermite easing of `x` between the edges `a` and `b`: 0 at or below
    /// `a`, 1 at or above `b`.
    ///
    /// Returns `None` when the edges coincide.
    pub fn smoothstep(a: Self, b: Self, x: Self) -> Option<Self> {
        let t = (x - a).checked_div_saturating(b - a)?.saturate();
        Some(t * t * (Self::from_i32(3) - Self::TWO * t))
    }

    /// 1 if `x >= edge`, else 0.
    #[inline]
    pub fn step(edge: Self, x: Self) -> Self {
        if x >= edge { Self::ONE } else { Self::ZERO }
    }

    /// Division that is `None` only for a zero divisor and saturates otherwise.
    #[inline(always)]
    fn checked_div_saturating(self, rhs: Self) -> Option<Self> {
        self.try_div(rhs).ok()
    }

    // ========================================================================
    // Angles
    // ========================================================================

    /// Degrees to radians.
    #[inline]
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub fn to_radians(self) -> Self {
        self * Self::DEG_TO_RAD
    }

    /// Radians to degrees.
    #[inline]
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub fn to_degrees(self) -> Self {
        self * Self::RAD_TO_DEG
    }

    /// `self - divisor * round(self / divisor)`, the IEEE 754 remainder, with
    /// ties going to the even quotient.
    ///
    /// # Panics
    /// Panics if `divisor` is zero.
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub fn ieee_remainder(self, divisor: Self) -> Self {
        self - divisor * (self / divisor).round()
    }

    /// Reduces an angle into `[-π, π)`.
    ///
    /// `PI_TIMES_2` is not exactly twice `PI`, so the lower end can sit one
    /// raw unit below `-PI`.
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub fn wrap_angle(self) -> Self {
        let angle = self.ieee_remainder(Self::PI_TIMES_2);
        if angle < -Self::PI {
            angle + Self::PI_TIMES_2
        } else if angle >= Self::PI {
            angle - Self::PI_TIMES_2
        } else {
            angle
        }
    }

    /// Loops `self` into `[0, length]`.
    ///
    /// # Panics
    /// Panics if `length` is not positive.
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub fn repeat(self, length: Self) -> Self {
        (self - (self / length).floor() * length).clamp(Self::ZERO, length)
    }

    /// Shortest signed angle from `self` to `target`, in `(-π, π]`.
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub fn delta_angle(self, target: Self) -> Self {
        let delta = (target - self).repeat(Self::PI_TIMES_2);
        if delta > Self::PI {
            delta - Self::PI_TIMES_2
        } else {
            delta
        }
    }

    /// Moves `self` toward `target` by at most `max_delta`, landing exactly
    /// on `target` when it is within reach.
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub fn move_towards(self, target: Self, max_delta: Self) -> Self {
        let delta = target - self;
        if delta.is_zero() || delta.abs() <= max_delta {
            return target;
        }
        let step = if delta.is_negative() { -max_delta } else { max_delta };
        self + step
    }

    /// Like [`move_towards`](Self::move_towards), but the angles wrap, so the
    /// move takes the short way around the circle.
    ///
    /// Returns `target` unchanged (not normalized) once it is within reach.
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub fn move_towards_angle(self, target: Self, max_delta: Self) -> Self {
        let delta = self.delta_angle(target);
        if -max_delta < delta && delta < max_delta {
            return target;
        }
        self.move_towards(self + delta, max_delta)
    }

    // ========================================================================
    // Comparison
    // ========================================================================

    /// `|self - other| < epsilon`.
    #[inline]
    pub fn approx_eq(self, other: Self, epsilon: Self) -> bool {
        (self - other).abs() < epsilon
    }

    /// [`approx_eq`](Self::approx_eq) with [`APPROX_EPSILON`](Self::APPROX_EPSILON).
    #[inline]
    pub fn approx_eq_default(self, other: Self) -> bool {
        self.approx_eq(other, Self::APPROX_EPSILON)
    }

    /// True when both values have the same [`signum`](Self::signum); zero
    /// only matches zero.
    #[inline]
    pub const fn same_sign(self, other: Self) -> bool {
        self.signum() == other.signum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn fx(value: i32) -> Fix64 {
        Fix64::from_i32(value)
    }

    fn fl(value: f64) -> Fix64 {
        Fix64::from_f64(value).unwrap()
    }

    fn approx(actual: Fix64, expected: f64, tolerance: f64) {
        assert!(
            (actual.to_f64() - expected).abs() <= tolerance,
            "{} vs {}",
            actual,
            expected
        );
    }

    #[test]
    fn test_approx_epsilon() {
        assert_eq!(Fix64::APPROX_EPSILON, fl(0.0001));
    }

    #[test]
    fn test_recip() {
        assert_eq!(fx(4).recip(), Some(fl(0.25)));
        assert_eq!(fl(-0.5).recip(), Some(fx(-2)));
        assert_eq!(Fix64::ZERO.recip(), None);
        assert_eq!(Fix64::PRECISION.recip(), Some(Fix64::MAX));
    }

    #[test]
    fn test_rsqrt() {
        assert_eq!(fx(4).rsqrt(), Some(Fix64::HALF));
        assert_eq!(Fix64::ZERO.rsqrt(), None);
        assert_eq!(Fix64::NEG_ONE.rsqrt(), None);
    }

    #[test]
    fn test_exp() {
        assert_eq!(Fix64::ZERO.exp(), Fix64::ONE);
        approx(Fix64::ONE.exp(), core::f64::consts::E, 1e-8);
        approx(Fix64::NEG_ONE.exp(), (-1.0f64).exp(), 1e-8);
        assert_eq!(fx(100).exp(), Fix64::MAX);
    }

    #[test]
    fn test_exp10() {
        assert_eq!(Fix64::ZERO.exp10(), Fix64::ONE);
        approx(fx(2).exp10(), 100.0, 1e-6);
        approx(Fix64::NEG_ONE.exp10(), 0.1, 1e-8);
    }

    #[test]
    fn test_lerp_unlerp_remap() {
        assert_eq!(Fix64::lerp(fx(2), fx(4), Fix64::HALF), fx(3));
        assert_eq!(Fix64::lerp(fx(2), fx(4), fx(2)), fx(6));
        assert_eq!(Fix64::unlerp(fx(2), fx(4), fx(3)), Some(Fix64::HALF));
        assert_eq!(Fix64::unlerp(fx(2), fx(2), fx(3)), None);
        assert_eq!(
            Fix64::remap(fx(0), fx(10), fx(0), fx(100), fx(5)),
            Some(fx(50))
        );
        assert_eq!(Fix64::remap(fx(1), fx(1), fx(0), fx(100), fx(5)), None);
    }

    #[test]
    fn test_mul_add_and_saturate() {
        assert_eq!(fx(2).mul_add(fx(3), fx(4)), fx(10));
        assert_eq!(Fix64::MAX.mul_add(fx(2), Fix64::MIN), Fix64::from_raw(-1));
        assert_eq!(fx(5).saturate(), Fix64::ONE);
        assert_eq!(fx(-5).saturate(), Fix64::ZERO);
        assert_eq!(Fix64::HALF.saturate(), Fix64::HALF);
    }

    #[test]
    fn test_smoothstep() {
        assert_eq!(Fix64::smoothstep(fx(0), fx(1), Fix64::HALF), Some(Fix64::HALF));
        assert_eq!(Fix64::smoothstep(fx(0), fx(1), fx(-1)), Some(Fix64::ZERO));
        assert_eq!(Fix64::smoothstep(fx(0), fx(1), fx(2)), Some(Fix64::ONE));
        approx(
            Fix64::smoothstep(fx(0), fx(4), fx(1)).unwrap(),
            0.15625,
            1e-9,
        );
        assert_eq!(Fix64::smoothstep(fx(1), fx(1), fx(1)), None);
    }

    #[test]
    fn test_step() {
        assert_eq!(Fix64::step(fx(1), fx(1)), Fix64::ONE);
        assert_eq!(Fix64::step(fx(1), fx(2)), Fix64::ONE);
        assert_eq!(Fix64::step(fx(1), Fix64::HALF), Fix64::ZERO);
    }

    #[test]
    fn test_degree_conversion() {
        approx(fx(180).to_radians(), core::f64::consts::PI, 1e-7);
        approx(fx(90).to_radians(), core::f64::consts::FRAC_PI_2, 1e-7);
        approx(Fix64::PI.to_degrees(), 180.0, 1e-6);
        assert_eq!(Fix64::ZERO.to_degrees(), Fix64::ZERO);
    }

    #[test]
    fn test_ieee_remainder() {
        // quotient ties go to even
        assert_eq!(fx(7).ieee_remainder(fx(2)), fx(-1));
        assert_eq!(fx(5).ieee_remainder(fx(2)), fx(1));
        assert_eq!(fx(-7).ieee_remainder(fx(3)), fx(-1));
    }

    #[test]
    fn test_wrap_angle() {
        assert_eq!((Fix64::PI_TIMES_2 + Fix64::HALF).wrap_angle(), Fix64::HALF);
        assert_eq!(Fix64::PI.wrap_angle(), Fix64::PI - Fix64::PI_TIMES_2);
        assert_eq!((-Fix64::PI).wrap_angle(), -Fix64::PI);
        assert!((Fix64::PI * fx(3)).wrap_angle() < Fix64::PI);
    }

    proptest! {
        #[test]
        fn prop_wrap_angle_keeps_direction(raw in (-1000i64 << 32)..=(1000i64 << 32)) {
            let angle = Fix64::from_raw(raw);
            let wrapped = angle.wrap_angle();
            prop_assert!(wrapped >= Fix64::PI - Fix64::PI_TIMES_2 && wrapped < Fix64::PI, "{}", wrapped);
            let drift = (wrapped.sin().to_f64() - angle.sin().to_f64()).abs();
            prop_assert!(drift <= 1e-7, "sin drift {} at {}", drift, angle);
        }
    }

    #[test]
    fn test_repeat() {
        assert_eq!(fx(7).repeat(fx(3)), fx(1));
        assert_eq!(fx(-1).repeat(fx(3)), fx(2));
        assert_eq!(fl(2.5).repeat(Fix64::ONE), Fix64::HALF);
        assert_eq!(fx(3).repeat(fx(3)), Fix64::ZERO);
    }

    #[test]
    fn test_delta_angle() {
        assert_eq!(Fix64::ZERO.delta_angle(Fix64::ONE), Fix64::ONE);
        approx(
            Fix64::ZERO.delta_angle(Fix64::PI + Fix64::HALF),
            -(core::f64::consts::PI - 0.5),
            1e-8,
        );
        approx(
            fl(0.1).delta_angle(Fix64::PI_TIMES_2 - fl(0.1)),
            -0.2,
            1e-8,
        );
    }

    #[test]
    fn test_move_towards() {
        assert_eq!(fx(0).move_towards(fx(10), fx(3)), fx(3));
        assert_eq!(fx(0).move_towards(fx(2), fx(3)), fx(2));
        assert_eq!(fx(5).move_towards(fx(-5), fx(1)), fx(4));
        assert_eq!(fx(5).move_towards(fx(5), fx(1)), fx(5));
    }

    #[test]
    fn test_move_towards_angle() {
        assert_eq!(
            Fix64::ZERO.move_towards_angle(Fix64::PI_OVER_2, Fix64::ONE),
            Fix64::ONE
        );
        assert_eq!(
            Fix64::ZERO.move_towards_angle(Fix64::PI_OVER_2, fx(2)),
            Fix64::PI_OVER_2
        );
        // within reach across the wrap: the original target comes back
        let target = Fix64::PI_TIMES_2 - fl(0.1);
        assert_eq!(fl(0.1).move_towards_angle(target, Fix64::ONE), target);
        // out of reach across the wrap: moves backwards
        assert_eq!(
            fx(1).move_towards_angle(Fix64::PI_TIMES_2 - fx(1), Fix64::HALF),
            Fix64::HALF
        );
    }

    #[test]
    fn test_approx_eq() {
        assert!(Fix64::ONE.approx_eq_default(Fix64::ONE + fl(0.00005)));
        assert!(!Fix64::ONE.approx_eq_default(Fix64::ONE + fl(0.0002)));
        assert!(Fix64::ONE.approx_eq(fl(1.05), fl(0.1)));
        assert!(!Fix64::ONE.approx_eq(Fix64::ONE, Fix64::ZERO));
    }

    #[test]
    fn test_same_sign() {
        assert!(Fix64::ZERO.same_sign(Fix64::ZERO));
        assert!(fx(3).same_sign(Fix64::PRECISION));
        assert!(fx(-3).same_sign(Fix64::MIN));
        assert!(!Fix64::ONE.same_sign(Fix64::NEG_ONE));
        assert!(!Fix64::ZERO.same_sign(Fix64::ONE));
    }
}
