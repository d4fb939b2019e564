//! Black–Scholes operator in log-spot.
//!
//! With `x = ln S` the pricing equation reads
//!
//! `∂V/∂t + (r − q − ½σ²) ∂V/∂x + ½σ² ∂²V/∂x² − r V = 0`.
//!
//! On the two edge rows the far-field condition `∂²V/∂S² = 0`, i.e.
//! `∂²V/∂x² = ∂V/∂x`, is used, which leaves `(r − q) ∂V/∂x − r V`.

use std::sync::Arc;

use fdm_core::{ensure, errors::Result, Real, Size, Time};

use super::{first_derivative, second_derivative, FdmLinearOpComposite, FdmOperatorSplit, TripleBandLinearOp};
use crate::market::{RateCurve, VolatilityModel};
use crate::meshers::Fdm1dMesher;

/// Black–Scholes spatial operator on a log-spot mesher.
#[derive(Debug, Clone)]
pub struct FdmBlackScholesOp {
    spots: Vec<Real>,
    dx: TripleBandLinearOp,
    dxx: TripleBandLinearOp,
    risk_free: Arc<dyn RateCurve>,
    dividend_yield: Arc<dyn RateCurve>,
    volatility: Arc<dyn VolatilityModel>,
}

impl FdmBlackScholesOp {
    /// Create the operator on `mesher`, whose locations are `ln S`.
    ///
    /// # Errors
    /// [`Configuration`](fdm_core::Error::Configuration) on a mesher with
    /// fewer than three nodes.
    pub fn new(
        mesher: &Fdm1dMesher,
        risk_free: Arc<dyn RateCurve>,
        dividend_yield: Arc<dyn RateCurve>,
        volatility: Arc<dyn VolatilityModel>,
    ) -> Result<Self> {
        ensure!(
            mesher.size() >= 3,
            Configuration => "the Black-Scholes operator needs at least 3 nodes, got {}",
            mesher.size()
        );
        Ok(Self {
            spots: mesher.locations().iter().map(|x| x.exp()).collect(),
            dx: first_derivative(mesher),
            dxx: second_derivative(mesher),
            risk_free,
            dividend_yield,
            volatility,
        })
    }
}

impl FdmLinearOpComposite for FdmBlackScholesOp {
    fn size(&self) -> Size {
        self.spots.len()
    }

    fn discretize(&self, t1: Time, t2: Time) -> Result<FdmOperatorSplit> {
        ensure!(
            t1.is_finite() && t2.is_finite() && t1 <= t2,
            Domain => "invalid discretization interval [{t1}, {t2}]"
        );
        let r = self.risk_free.forward_rate(t1, t2);
        let q = self.dividend_yield.forward_rate(t1, t2);
        ensure!(
            r.is_finite() && q.is_finite(),
            Domain => "non-finite rates over [{t1}, {t2}]: r = {r}, q = {q}"
        );

        let n = self.size();
        let mut drift = Vec::with_capacity(n);
        let mut half_var = Vec::with_capacity(n);
        for (i, &s) in self.spots.iter().enumerate() {
            let v = self.volatility.variance_rate(t1, t2, s);
            ensure!(
                v.is_finite() && v >= 0.0,
                Domain => "invalid variance {v} at spot {s} over [{t1}, {t2}]"
            );
            let edge = i == 0 || i == n - 1;
            drift.push(if edge { r - q } else { r - q - 0.5 * v });
            half_var.push(0.5 * v);
        }

        let op = TripleBandLinearOp::axpyb(&drift, &self.dx, &self.dxx.mult(&half_var), &[-r]);
        Ok(FdmOperatorSplit::single(op))
    }
}
