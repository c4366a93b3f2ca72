//! Small math helpers shared by the filter and the synthesis crate.
//!
//! All functions are allocation-free and `no_std`.

use libm::floorf;

/// Flush denormal floats to zero.
///
/// Subnormal floats cause severe CPU slowdowns on most architectures. Values
/// below 1e-20 are replaced with zero, leaving margin before the IEEE 754
/// subnormal range. Use in recursive state that can decay toward zero.
#[allow(clippy::inline_always)]
#[inline(always)]
pub fn flush_denormal(x: f32) -> f32 {
    if x.abs() < 1e-20 { 0.0 } else { x }
}

/// Linear interpolation between `a` (t = 0) and `b` (t = 1).
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Wrap `x` into `[0, period)`.
///
/// Cheap for the common case of a value at most one period out of range;
/// falls back to a floor division otherwise. Never returns `period` itself.
#[inline]
pub fn wrap(x: f32, period: f32) -> f32 {
    let mut y = x;
    if y >= period {
        y -= period;
    } else if y < 0.0 {
        y += period;
    }
    if !(0.0..period).contains(&y) {
        y = x - period * floorf(x / period);
    }
    if y >= period || y < 0.0 { 0.0 } else { y }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::f32::consts::TAU;

    #[test]
    fn test_flush_denormal() {
        assert_eq!(flush_denormal(1e-25), 0.0);
        assert_eq!(flush_denormal(-1e-25), 0.0);
        assert_eq!(flush_denormal(0.5), 0.5);
    }

    #[test]
    fn test_lerp() {
        assert_eq!(lerp(1.0, 3.0, 0.0), 1.0);
        assert_eq!(lerp(1.0, 3.0, 1.0), 3.0);
        assert_eq!(lerp(1.0, 3.0, 0.5), 2.0);
    }

    #[test]
    fn test_wrap_single_period() {
        assert!((wrap(TAU + 0.5, TAU) - 0.5).abs() < 1e-6);
        assert!((wrap(-0.5, TAU) - (TAU - 0.5)).abs() < 1e-6);
        assert_eq!(wrap(1.0, TAU), 1.0);
    }

    #[test]
    fn test_wrap_many_periods() {
        let y = wrap(10.0 * TAU + 1.0, TAU);
        assert!((y - 1.0).abs() < 1e-4, "got {y}");
        let y = wrap(-7.0 * TAU + 1.0, TAU);
        assert!((y - 1.0).abs() < 1e-4, "got {y}");
    }

    #[test]
    fn test_wrap_never_returns_period() {
        for x in [TAU, 2.0 * TAU, -TAU, TAU - f32::EPSILON, 1.0e7] {
            let y = wrap(x, TAU);
            assert!((0.0..TAU).contains(&y), "wrap({x}) = {y}");
        }
    }
}
