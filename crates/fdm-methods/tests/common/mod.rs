//! Helpers shared by the integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use fdm_core::Real;
use fdm_math::normal_cdf;
use fdm_methods::market::{ConstantVolatility, FlatRate};
use fdm_methods::{
    Fdm1dMesher, FdmBackwardSolver, FdmBlackScholesOp, FdmBoundaryConditionSet, FdmLinearOpComposite,
    FdmSchemeDesc, FdmStepConditionComposite,
};

/// Closed-form Black–Scholes call.
pub fn black_scholes_call(s: Real, k: Real, r: Real, q: Real, sigma: Real, t: Real) -> Real {
    let sd = sigma * t.sqrt();
    let d1 = ((s / k).ln() + (r - q) * t) / sd + 0.5 * sd;
    let d2 = d1 - sd;
    s * (-q * t).exp() * normal_cdf(d1) - k * (-r * t).exp() * normal_cdf(d2)
}

/// Closed-form cash-or-nothing digital call paying 1.
pub fn black_scholes_digital(s: Real, k: Real, r: Real, sigma: Real, t: Real) -> Real {
    let sd = sigma * t.sqrt();
    let d2 = ((s / k).ln() + r * t) / sd - 0.5 * sd;
    (-r * t).exp() * normal_cdf(d2)
}

/// Uniform log-spot grid on `[ln 50, ln 150]`.
pub fn log_spot_mesher(n: usize) -> Fdm1dMesher {
    Fdm1dMesher::uniform(50.0_f64.ln(), 150.0_f64.ln(), n).unwrap()
}

/// Black–Scholes operator with flat inputs.
pub fn bs_op(mesher: &Fdm1dMesher, r: Real, q: Real, sigma: Real) -> Arc<dyn FdmLinearOpComposite> {
    Arc::new(
        FdmBlackScholesOp::new(
            mesher,
            Arc::new(FlatRate::new(r)),
            Arc::new(FlatRate::new(q)),
            Arc::new(ConstantVolatility::new(sigma)),
        )
        .unwrap(),
    )
}

/// Call payoff on a log-spot grid.
pub fn call_payoff(mesher: &Fdm1dMesher, k: Real) -> Vec<Real> {
    mesher.locations().iter().map(|x| (x.exp() - k).max(0.0)).collect()
}

/// Digital payoff on a log-spot grid.
pub fn digital_payoff(mesher: &Fdm1dMesher, k: Real) -> Vec<Real> {
    mesher
        .locations()
        .iter()
        .map(|x| if x.exp() > k { 1.0 } else { 0.0 })
        .collect()
}

/// Backward solver without boundaries or events.
pub fn plain_solver(op: Arc<dyn FdmLinearOpComposite>, desc: FdmSchemeDesc) -> FdmBackwardSolver {
    FdmBackwardSolver::new(
        op,
        FdmBoundaryConditionSet::empty(),
        Arc::new(FdmStepConditionComposite::empty()),
        desc,
    )
    .unwrap()
}
