//! ODE solvers.
//!
//! Provides an adaptive Runge-Kutta 4th/5th order solver (Dormand-Prince)
//! for ordinary differential equations. It drives both the method-of-lines
//! time-stepping scheme and the multi-point concentrating mesher.

use fdm_core::{
    errors::{Error, Result},
    Real,
};

const MAX_STEPS: usize = 10_000;
const TINY: Real = 1.0e-30;

/// A function `f(t, y) → dy/dt` for an ODE system.
///
/// Evaluation may fail, e.g. when the right-hand side has to discretize an
/// operator whose market inputs are out of range.
pub trait OdeFunction {
    /// Evaluate the right-hand side of `dy/dt = f(t, y)`.
    fn eval(&self, t: Real, y: &[Real]) -> Result<Vec<Real>>;
}

impl<F> OdeFunction for F
where
    F: Fn(Real, &[Real]) -> Result<Vec<Real>>,
{
    fn eval(&self, t: Real, y: &[Real]) -> Result<Vec<Real>> {
        (self)(t, y)
    }
}

/// Adaptive Runge-Kutta 4(5) ODE solver (Dormand-Prince method).
///
/// Integrates `dy/dt = f(t, y)` from `t0` to `t1` (in either direction)
/// with step-size control. The local error of each component is measured
/// relative to `|y| + |h·y'|` and kept below `eps`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdaptiveRungeKutta {
    /// Relative error tolerance per step.
    pub eps: Real,
    /// Size of the first trial step.
    pub h1: Real,
    /// Smallest step accepted before giving up.
    pub hmin: Real,
}

impl AdaptiveRungeKutta {
    /// Create a new adaptive Runge-Kutta solver.
    pub fn new(eps: Real, h1: Real, hmin: Real) -> Self {
        Self { eps, h1, hmin }
    }

    /// Integrate `dy/dt = f(t, y)` from `t0` to `t1`, returning `y(t1)`.
    ///
    /// # Errors
    /// [`Error::Numerical`] when the step size underflows `hmin`, the state
    /// becomes non-finite, or the step budget is exhausted. Errors raised by
    /// `f` are propagated unchanged.
    pub fn integrate<F: OdeFunction>(
        &self,
        f: &F,
        y0: &[Real],
        t0: Real,
        t1: Real,
    ) -> Result<Vec<Real>> {
        let mut y = y0.to_vec();
        if t0 == t1 {
            return Ok(y);
        }
        fdm_core::ensure!(
            self.eps > 0.0 && self.eps.is_finite(),
            "ODE tolerance must be positive, got {}",
            self.eps
        );

        let direction = if t1 > t0 { 1.0 } else { -1.0 };
        let span = (t1 - t0).abs();
        let mut h = if self.h1 > 0.0 {
            self.h1.min(span)
        } else {
            0.01 * span
        } * direction;
        let mut t = t0;

        for _ in 0..MAX_STEPS {
            if direction * (t + h - t1) > 0.0 {
                h = t1 - t;
            }

            let dydt = f.eval(t, &y)?;
            let (y_new, err) = dormand_prince_step(f, t, &y, &dydt, h)?;

            let err_max = y
                .iter()
                .zip(&dydt)
                .zip(&err)
                .map(|((yi, di), ei)| (ei / (yi.abs() + (h * di).abs() + TINY)).abs())
                .fold(0.0, Real::max)
                / self.eps;

            if !err_max.is_finite() {
                return Err(Error::Numerical(format!(
                    "ODE integration produced a non-finite state at t = {t}"
                )));
            }

            if err_max <= 1.0 {
                t += h;
                y = y_new;
                if direction * (t - t1) >= 0.0 || (t1 - t).abs() <= 1e-14 * span {
                    return Ok(y);
                }
                let grow = if err_max > 1.89e-4 {
                    0.9 * err_max.powf(-0.2)
                } else {
                    5.0
                };
                h *= grow;
            } else {
                h *= (0.9 * err_max.powf(-0.25)).max(0.1);
                if h.abs() <= self.hmin || t + h == t {
                    return Err(Error::Numerical(format!(
                        "ODE step size underflow at t = {t} (h = {h})"
                    )));
                }
            }
        }

        Err(Error::Numerical(format!(
            "ODE integration from {t0} to {t1} exceeded {MAX_STEPS} steps"
        )))
    }
}

impl Default for AdaptiveRungeKutta {
    fn default() -> Self {
        Self::new(1e-6, 1e-4, 0.0)
    }
}

/// Single Dormand-Prince step. Returns `(y_new, error_estimate)`.
fn dormand_prince_step<F: OdeFunction>(
    f: &F,
    t: Real,
    y: &[Real],
    k1: &[Real],
    h: Real,
) -> Result<(Vec<Real>, Vec<Real>)> {
    let n = y.len();
    let stage = |coeffs: &[(Real, &[Real])]| -> Vec<Real> {
        (0..n)
            .map(|i| y[i] + h * coeffs.iter().map(|(c, k)| c * k[i]).sum::<Real>())
            .collect()
    };

    let k2 = f.eval(t + h / 5.0, &stage(&[(1.0 / 5.0, k1)]))?;
    let k3 = f.eval(
        t + 3.0 / 10.0 * h,
        &stage(&[(3.0 / 40.0, k1), (9.0 / 40.0, &k2[..])]),
    )?;
    let k4 = f.eval(
        t + 4.0 / 5.0 * h,
        &stage(&[(44.0 / 45.0, k1), (-56.0 / 15.0, &k2[..]), (32.0 / 9.0, &k3[..])]),
    )?;
    let k5 = f.eval(
        t + 8.0 / 9.0 * h,
        &stage(&[
            (19372.0 / 6561.0, k1),
            (-25360.0 / 2187.0, &k2[..]),
            (64448.0 / 6561.0, &k3[..]),
            (-212.0 / 729.0, &k4[..]),
        ]),
    )?;
    let k6 = f.eval(
        t + h,
        &stage(&[
            (9017.0 / 3168.0, k1),
            (-355.0 / 33.0, &k2[..]),
            (46732.0 / 5247.0, &k3[..]),
            (49.0 / 176.0, &k4[..]),
            (-5103.0 / 18656.0, &k5[..]),
        ]),
    )?;

    // 5th order solution
    let y_new = stage(&[
        (35.0 / 384.0, k1),
        (500.0 / 1113.0, &k3[..]),
        (125.0 / 192.0, &k4[..]),
        (-2187.0 / 6784.0, &k5[..]),
        (11.0 / 84.0, &k6[..]),
    ]);

    // FSAL stage at the new point
    let k7 = f.eval(t + h, &y_new)?;

    let err = (0..n)
        .map(|i| {
            h * (71.0 / 57600.0 * k1[i] - 71.0 / 16695.0 * k3[i] + 71.0 / 1920.0 * k4[i]
                - 17253.0 / 339200.0 * k5[i]
                + 22.0 / 525.0 * k6[i]
                - 1.0 / 40.0 * k7[i])
        })
        .collect();

    Ok((y_new, err))
}

/// Integrate a scalar ODE `dy/dt = f(t, y)` from `t0` to `t1`.
pub fn integrate_scalar<F>(
    rk: &AdaptiveRungeKutta,
    f: F,
    y0: Real,
    t0: Real,
    t1: Real,
) -> Result<Real>
where
    F: Fn(Real, Real) -> Real,
{
    let wrapper = |t: Real, y: &[Real]| -> Result<Vec<Real>> { Ok(vec![f(t, y[0])]) };
    let result = rk.integrate(&wrapper, &[y0], t0, t1)?;
    Ok(result[0])
}
