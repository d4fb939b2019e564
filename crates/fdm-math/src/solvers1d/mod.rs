//! 1D root-finding solvers.
//!
//! [`brent`] works on a known bracket; [`brent_from_guess`] first grows a
//! bracket outwards from an initial guess and then hands over to Brent.

use fdm_core::{
    errors::{Error, Result},
    Real,
};

const MAX_ITERATIONS: u32 = 100;
const MAX_BRACKET_EVALUATIONS: u32 = 100;
const BRACKET_GROWTH_FACTOR: Real = 1.6;
const DEFAULT_ACCURACY: Real = 1.0e-11;

// ── Brent ─────────────────────────────────────────────────────────────────────

/// Brent's method for finding a root of `f(x)` in `[x_min, x_max]`.
///
/// Combines bisection, secant, and inverse quadratic interpolation.
pub fn brent<F>(f: F, x_min: Real, x_max: Real, accuracy: Real) -> Result<Real>
where
    F: Fn(Real) -> Real,
{
    let fa = f(x_min);
    let fb = f(x_max);
    brent_bracketed(&f, x_min, fa, x_max, fb, accuracy)
}

fn brent_bracketed<F>(f: &F, x_min: Real, f_min: Real, x_max: Real, f_max: Real, accuracy: Real) -> Result<Real>
where
    F: Fn(Real) -> Real,
{
    let acc = if accuracy > 0.0 {
        accuracy
    } else {
        DEFAULT_ACCURACY
    };
    let mut a = x_min;
    let mut b = x_max;
    let mut fa = f_min;
    let mut fb = f_max;

    if !(fa.is_finite() && fb.is_finite()) {
        return Err(Error::Numerical(format!(
            "Brent: non-finite function value at the bracket ends ({fa}, {fb})"
        )));
    }
    if fa * fb > 0.0 {
        return Err(Error::Precondition(format!(
            "Brent: f({a}) and f({b}) must have opposite signs"
        )));
    }
    if fa == 0.0 {
        return Ok(a);
    }
    if fb == 0.0 {
        return Ok(b);
    }

    let mut c = b;
    let mut fc = fb;
    let mut d = b - a;
    let mut e = d;

    for _ in 0..MAX_ITERATIONS {
        if fb * fc > 0.0 {
            c = a;
            fc = fa;
            d = b - a;
            e = d;
        }
        if fc.abs() < fb.abs() {
            a = b;
            b = c;
            c = a;
            fa = fb;
            fb = fc;
            fc = fa;
        }
        let tol = 2.0 * f64::EPSILON * b.abs() + 0.5 * acc;
        let xm = 0.5 * (c - b);
        if xm.abs() <= tol || fb == 0.0 {
            return Ok(b);
        }
        if e.abs() >= tol && fa.abs() > fb.abs() {
            let s = fb / fa;
            let (p, q) = if a == c {
                (2.0 * xm * s, 1.0 - s)
            } else {
                let q = fa / fc;
                let r = fb / fc;
                let p = s * (2.0 * xm * q * (q - r) - (b - a) * (r - 1.0));
                let q = (q - 1.0) * (r - 1.0) * (s - 1.0);
                (p, q)
            };
            let (p, q) = if p > 0.0 { (p, -q) } else { (-p, q) };
            if 2.0 * p < (3.0 * xm * q - (tol * q).abs()) && 2.0 * p < (e * q).abs() {
                e = d;
                d = p / q;
            } else {
                d = xm;
                e = d;
            }
        } else {
            d = xm;
            e = d;
        }
        a = b;
        fa = fb;
        b += if d.abs() > tol {
            d
        } else if xm > 0.0 {
            tol
        } else {
            -tol
        };
        fb = f(b);
    }
    Err(Error::Numerical(
        "Brent solver: maximum iterations reached".into(),
    ))
}

// ── Bracketing ────────────────────────────────────────────────────────────────

/// Brent's method started from a guess.
///
/// A bracket is grown geometrically from `[guess - step, guess]` or
/// `[guess, guess + step]` (depending on the sign of `f(guess)`), always
/// extending the side with the smaller function value, until `f` changes
/// sign. The root is then polished with [`brent`].
///
/// # Errors
/// [`Error::Numerical`] if no sign change is found within the evaluation
/// budget, [`Error::Precondition`] if `step` is not positive.
pub fn brent_from_guess<F>(f: F, accuracy: Real, guess: Real, step: Real) -> Result<Real>
where
    F: Fn(Real) -> Real,
{
    fdm_core::ensure!(step > 0.0, "bracketing step must be positive, got {step}");

    let root = guess;
    let f_root = f(root);
    if f_root == 0.0 {
        return Ok(root);
    }

    let (mut x_min, mut f_min, mut x_max, mut f_max) = if f_root > 0.0 {
        let x_min = root - step;
        (x_min, f(x_min), root, f_root)
    } else {
        let x_max = root + step;
        (root, f_root, x_max, f(x_max))
    };

    let mut flip_flop = -1;
    for _ in 2..=MAX_BRACKET_EVALUATIONS {
        if f_min * f_max <= 0.0 {
            if f_min == 0.0 {
                return Ok(x_min);
            }
            if f_max == 0.0 {
                return Ok(x_max);
            }
            return brent_bracketed(&f, x_min, f_min, x_max, f_max, accuracy);
        }
        let grow_min = if f_min.abs() < f_max.abs() {
            true
        } else if f_min.abs() > f_max.abs() {
            false
        } else {
            flip_flop == -1
        };
        if grow_min {
            x_min += BRACKET_GROWTH_FACTOR * (x_min - x_max);
            f_min = f(x_min);
        } else {
            x_max += BRACKET_GROWTH_FACTOR * (x_max - x_min);
            f_max = f(x_max);
        }
        flip_flop = -flip_flop;
    }

    Err(Error::Numerical(format!(
        "unable to bracket a root in {MAX_BRACKET_EVALUATIONS} evaluations \
         (last bracket [{x_min}, {x_max}], values [{f_min}, {f_max}])"
    )))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
