//! Monotone-preserving cubic Hermite interpolation.
//!
//! Implements the Fritsch-Carlson algorithm that modifies cubic Hermite slopes
//! to guarantee monotonicity on each sub-interval where the data is monotone.

use fdm_core::{errors::Result, Real};

use super::{check_nodes, HermitePiecewise, Interpolation1D};

/// Monotone-preserving cubic Hermite spline.
#[derive(Debug, Clone)]
pub struct MonotoneCubicSpline {
    inner: HermitePiecewise,
}

impl MonotoneCubicSpline {
    /// Build a monotone cubic spline through the given data.
    pub fn new(xs: &[Real], ys: &[Real]) -> Result<Self> {
        check_nodes(xs, ys, 2)?;
        let n = xs.len();

        // Step 1: compute secant slopes δ_i
        let delta: Vec<Real> = (0..n - 1)
            .map(|i| (ys[i + 1] - ys[i]) / (xs[i + 1] - xs[i]))
            .collect();

        // Step 2: initial tangent estimates (three-point formula)
        let mut ts = vec![0.0; n];
        ts[0] = delta[0];
        ts[n - 1] = delta[n - 2];
        for i in 1..n - 1 {
            ts[i] = if delta[i - 1] * delta[i] <= 0.0 {
                0.0
            } else {
                0.5 * (delta[i - 1] + delta[i])
            };
        }

        // Step 3: Fritsch-Carlson monotonicity corrections
        for i in 0..n - 1 {
            if delta[i].abs() < 1e-30 {
                ts[i] = 0.0;
                ts[i + 1] = 0.0;
            } else {
                let alpha = ts[i] / delta[i];
                let beta = ts[i + 1] / delta[i];
                let r2 = alpha * alpha + beta * beta;
                if r2 > 9.0 {
                    let tau = 3.0 / r2.sqrt();
                    ts[i] = tau * alpha * delta[i];
                    ts[i + 1] = tau * beta * delta[i];
                }
            }
        }

        Ok(Self {
            inner: HermitePiecewise::new(xs.to_vec(), ys.to_vec(), &ts),
        })
    }
}

impl Interpolation1D for MonotoneCubicSpline {
    fn value(&self, x: Real) -> Real {
        self.inner.value(x)
    }

    fn derivative(&self, x: Real) -> Real {
        self.inner.derivative(x)
    }

    fn second_derivative(&self, x: Real) -> Real {
        self.inner.second_derivative(x)
    }

    fn x_min(&self) -> Real {
        self.inner.x_min()
    }

    fn x_max(&self) -> Real {
        self.inner.x_max()
    }
}
