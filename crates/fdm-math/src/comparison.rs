//! Relative floating-point comparison.

use fdm_core::Real;

/// Whether `x` and `y` agree to within `n` machine epsilons relative to
/// either of them.
///
/// When one side is exactly zero the test becomes absolute against the
/// square of the tolerance.
#[inline]
pub fn close_enough(x: Real, y: Real, n: u32) -> bool {
    if x == y {
        return true;
    }
    let diff = (x - y).abs();
    let tolerance = Real::from(n) * Real::EPSILON;
    if x == 0.0 || y == 0.0 {
        return diff < tolerance * tolerance;
    }
    diff <= tolerance * x.abs() || diff <= tolerance * y.abs()
}
