//! Natural cubic spline.
//!
//! C² interpolation with vanishing second derivative at both end points.
//! The nodal second derivatives come from the usual tridiagonal system,
//! after which the spline is stored in the same Hermite form as the local
//! cubic schemes.

use fdm_core::{errors::Result, Real};

use super::{check_nodes, HermitePiecewise, Interpolation1D};

/// Natural cubic spline interpolation.
#[derive(Debug, Clone)]
pub struct CubicNaturalSpline {
    inner: HermitePiecewise,
}

impl CubicNaturalSpline {
    /// Build a natural cubic spline through the given data.
    ///
    /// With two points the spline degenerates to the straight line.
    pub fn new(xs: &[Real], ys: &[Real]) -> Result<Self> {
        check_nodes(xs, ys, 2)?;
        let n = xs.len();

        let h: Vec<Real> = xs.windows(2).map(|w| w[1] - w[0]).collect();
        let s: Vec<Real> = (0..n - 1).map(|i| (ys[i + 1] - ys[i]) / h[i]).collect();

        // Second derivatives m[1..n-1] from
        //   h[i-1] m[i-1] + 2 (h[i-1] + h[i]) m[i] + h[i] m[i+1] = 6 (s[i] - s[i-1])
        let mut m = vec![0.0; n];
        if n > 2 {
            let k = n - 2;
            let mut c_prime = vec![0.0; k];
            let mut d_prime = vec![0.0; k];
            for j in 0..k {
                let i = j + 1;
                let lower = if j > 0 { h[i - 1] } else { 0.0 };
                let diag = 2.0 * (h[i - 1] + h[i]);
                let upper = h[i];
                let rhs = 6.0 * (s[i] - s[i - 1]);
                let (cp, dp) = if j > 0 {
                    (c_prime[j - 1], d_prime[j - 1])
                } else {
                    (0.0, 0.0)
                };
                let pivot = diag - lower * cp;
                c_prime[j] = upper / pivot;
                d_prime[j] = (rhs - lower * dp) / pivot;
            }
            m[k] = d_prime[k - 1];
            for j in (0..k - 1).rev() {
                m[j + 1] = d_prime[j] - c_prime[j] * m[j + 2];
            }
        }

        let mut ts = vec![0.0; n];
        for i in 0..n - 1 {
            ts[i] = s[i] - h[i] * (2.0 * m[i] + m[i + 1]) / 6.0;
        }
        ts[n - 1] = s[n - 2] + h[n - 2] * (m[n - 2] + 2.0 * m[n - 1]) / 6.0;

        Ok(Self {
            inner: HermitePiecewise::new(xs.to_vec(), ys.to_vec(), &ts),
        })
    }
}

impl Interpolation1D for CubicNaturalSpline {
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
