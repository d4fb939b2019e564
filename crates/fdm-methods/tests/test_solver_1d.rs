//! The one-dimensional solver: value, greeks and theta against closed forms.

mod common;

use std::sync::Arc;

use approx::assert_abs_diff_eq;
use common::{black_scholes_call, bs_op};
use fdm_core::Real;
use fdm_math::{normal_cdf, normal_pdf};
use fdm_methods::market::FlatRate;
use fdm_methods::{
    BlackScholesMesherBuilder, Fdm1dMesher, Fdm1dSolver, FdmAmericanStepCondition, FdmBoundaryConditionSet,
    FdmDirichletBoundary, FdmSchemeDesc, FdmSolverDesc, FdmStepConditionComposite, Side, StepCondition,
};

const R: Real = 0.03;
const SIGMA: Real = 0.2;

fn mesher(n: usize) -> Fdm1dMesher {
    BlackScholesMesherBuilder::new(n, 100.0, 1.0, SIGMA)
        .with_rates(Arc::new(FlatRate::new(R)), Arc::new(FlatRate::new(0.0)))
        .with_concentration(100.0, 0.1)
        .build()
        .unwrap()
}

fn desc(mesher: &Fdm1dMesher, payoff: impl Fn(Real) -> Real, condition: FdmStepConditionComposite) -> FdmSolverDesc {
    FdmSolverDesc {
        mesher: mesher.clone(),
        bc_set: FdmBoundaryConditionSet::empty(),
        condition,
        initial_values: mesher.locations().iter().map(|x| payoff(x.exp())).collect(),
        maturity: 1.0,
        time_steps: 100,
        damping_steps: 0,
    }
}

fn call(s: Real) -> Real {
    (s - 100.0).max(0.0)
}

fn put(s: Real) -> Real {
    (100.0 - s).max(0.0)
}

// ─── European call ────────────────────────────────────────────────────────────

#[test]
fn european_call_greeks() {
    let m = mesher(201);
    let solver = Fdm1dSolver::new(
        desc(&m, call, FdmStepConditionComposite::empty()),
        FdmSchemeDesc::crank_nicolson(),
        bs_op(&m, R, 0.0, SIGMA),
    )
    .unwrap();

    let s = 100.0;
    let d1 = (R + 0.5 * SIGMA * SIGMA) / SIGMA;
    let d2 = d1 - SIGMA;
    let value = black_scholes_call(s, 100.0, R, 0.0, SIGMA, 1.0);
    let delta = normal_cdf(d1);
    let gamma = normal_pdf(d1) / (s * SIGMA);
    let theta = -s * normal_pdf(d1) * SIGMA / 2.0 - R * 100.0 * (-R).exp() * normal_cdf(d2);

    let x = s.ln();
    assert_abs_diff_eq!(solver.interpolate_at(x), value, epsilon = 1e-2);
    assert_abs_diff_eq!(solver.delta_at_spot(s), delta, epsilon = 1e-3);
    assert_abs_diff_eq!(solver.gamma_at_spot(s), gamma, epsilon = 1e-3);
    assert_abs_diff_eq!(solver.theta_at(x).unwrap(), theta, epsilon = 5e-2);
}

#[test]
fn node_values_match_the_spline() {
    let m = mesher(51);
    let solver = Fdm1dSolver::new(
        desc(&m, call, FdmStepConditionComposite::empty()),
        FdmSchemeDesc::douglas(),
        bs_op(&m, R, 0.0, SIGMA),
    )
    .unwrap();
    for i in [0, 10, 25, 50] {
        let x = solver.locations()[i];
        assert_abs_diff_eq!(solver.interpolate_at(x), solver.value_at_index(i).unwrap(), epsilon = 1e-12);
    }
    assert!(matches!(
        solver.value_at_index(51),
        Err(fdm_core::Error::IndexOutOfRange { index: 51, size: 51 })
    ));
}

// ─── American put ─────────────────────────────────────────────────────────────

#[test]
fn american_put_through_the_solver() {
    let r = 0.05;
    let m = BlackScholesMesherBuilder::new(201, 100.0, 1.0, SIGMA)
        .with_rates(Arc::new(FlatRate::new(r)), Arc::new(FlatRate::new(0.0)))
        .build()
        .unwrap();
    let american = Arc::new(FdmAmericanStepCondition::new(&m, put)) as Arc<dyn StepCondition>;
    let condition = FdmStepConditionComposite::new(vec![american]).unwrap();
    let solver = Fdm1dSolver::new(desc(&m, put, condition), FdmSchemeDesc::crank_nicolson(), bs_op(&m, r, 0.0, SIGMA))
        .unwrap();

    let value = solver.interpolate_at(100.0_f64.ln());
    assert!((value - 6.09).abs() < 5e-2, "{value}");
    let delta = solver.delta_at_spot(100.0);
    assert!(delta < 0.0 && delta > -1.0, "{delta}");
    // deep in the money the put is exercised
    assert_abs_diff_eq!(solver.interpolate_at(60.0_f64.ln()), 40.0, epsilon = 1e-3);
    assert_abs_diff_eq!(solver.delta_at_spot(60.0), -1.0, epsilon = 1e-2);
}

// ─── Boundaries ───────────────────────────────────────────────────────────────

#[test]
fn dirichlet_boundaries_survive_the_solve() {
    let m = mesher(101);
    let upper = m.upper().exp() - 100.0 * (-R).exp();
    let mut d = desc(&m, call, FdmStepConditionComposite::empty());
    d.bc_set = FdmBoundaryConditionSet::new(vec![
        FdmDirichletBoundary::new(Side::Lower, 0.0),
        FdmDirichletBoundary::new(Side::Upper, upper),
    ])
    .unwrap();
    d.damping_steps = 2;
    let solver = Fdm1dSolver::new(d, FdmSchemeDesc::hundsdorfer(), bs_op(&m, R, 0.0, SIGMA)).unwrap();
    assert_eq!(solver.values()[0], 0.0);
    assert_eq!(solver.values()[100], upper);
    let value = solver.interpolate_at(100.0_f64.ln());
    assert!((value - black_scholes_call(100.0, 100.0, R, 0.0, SIGMA, 1.0)).abs() < 2e-2, "{value}");
}
