//! End-to-end rollbacks through the backward solver.
//!
//! Vanilla and digital calls under a lognormal diffusion, checked against
//! the closed-form prices, plus the damping phase, boundary pinning and the
//! shared-solver use across threads.

mod common;

use std::sync::Arc;

use common::{
    black_scholes_call, black_scholes_digital, bs_op, call_payoff, digital_payoff, log_spot_mesher,
    plain_solver,
};
use fdm_core::Real;
use fdm_math::{CubicNaturalSpline, Interpolation1D};
use fdm_methods::{
    FdmBackwardSolver, FdmBoundaryConditionSet, FdmDirichletBoundary, FdmSchemeDesc,
    FdmStepConditionComposite, Side,
};

fn is_monotone(v: &[Real]) -> bool {
    v.windows(2).all(|w| w[1] >= w[0])
}

// ─── Vanilla call ─────────────────────────────────────────────────────────────

#[test]
fn crank_nicolson_call_matches_black_scholes() {
    let mesher = log_spot_mesher(101);
    let solver = plain_solver(bs_op(&mesher, 0.0, 0.0, 0.2), FdmSchemeDesc::crank_nicolson());
    let mut a = call_payoff(&mesher, 100.0);
    solver.rollback(&mut a, 1.0, 0.0, 100, 0).unwrap();

    let i = mesher.nearest_index(100.0_f64.ln());
    let s = mesher.location(i).exp();
    let expected = black_scholes_call(s, 100.0, 0.0, 0.0, 0.2, 1.0);
    assert!((a[i] - expected).abs() < 1e-2, "{} vs {expected}", a[i]);

    let spline = CubicNaturalSpline::new(mesher.locations(), &a).unwrap();
    let atm = spline.value(100.0_f64.ln());
    assert!((atm - 7.9656).abs() < 1e-2, "{atm}");
}

#[test]
fn implicit_euler_converges_with_more_steps() {
    let mesher = log_spot_mesher(401);
    let op = bs_op(&mesher, 0.0, 0.0, 0.2);
    let solver = plain_solver(op, FdmSchemeDesc::implicit_euler());
    let i = mesher.nearest_index(100.0_f64.ln());
    let expected = black_scholes_call(mesher.location(i).exp(), 100.0, 0.0, 0.0, 0.2, 1.0);

    let errors: Vec<Real> = [5, 10, 20]
        .iter()
        .map(|&steps| {
            let mut a = call_payoff(&mesher, 100.0);
            solver.rollback(&mut a, 1.0, 0.0, steps, 0).unwrap();
            (a[i] - expected).abs()
        })
        .collect();
    assert!(errors[1] < errors[0] && errors[2] < errors[1], "{errors:?}");
}

#[test]
fn rates_and_dividend_yield() {
    let mesher = log_spot_mesher(201);
    let solver = plain_solver(bs_op(&mesher, 0.05, 0.02, 0.25), FdmSchemeDesc::douglas());
    let mut a = call_payoff(&mesher, 100.0);
    solver.rollback(&mut a, 0.5, 0.0, 100, 0).unwrap();
    let i = mesher.nearest_index(100.0_f64.ln());
    let expected = black_scholes_call(mesher.location(i).exp(), 100.0, 0.05, 0.02, 0.25, 0.5);
    assert!((a[i] - expected).abs() < 1e-2, "{} vs {expected}", a[i]);
}

// ─── Digital call and damping ─────────────────────────────────────────────────

#[test]
fn damped_digital_is_smooth() {
    let mesher = log_spot_mesher(101);
    let solver = plain_solver(bs_op(&mesher, 0.0, 0.0, 0.2), FdmSchemeDesc::crank_nicolson());
    let mut a = digital_payoff(&mesher, 100.0);
    solver.rollback(&mut a, 1.0, 0.0, 100, 20).unwrap();

    let k = 100.0_f64.ln();
    let window: Vec<usize> = (0..mesher.size())
        .filter(|&i| (mesher.location(i) - k).abs() < 0.3)
        .collect();
    let values: Vec<Real> = window.iter().map(|&i| a[i]).collect();
    assert!(is_monotone(&values));
    assert!(values.iter().all(|v| (-1e-8..=1.0 + 1e-8).contains(v)));

    // no sign change of the second difference away from the strike
    for (lo, hi) in [(-0.3, -0.1), (0.1, 0.3)] {
        let idx: Vec<usize> = (1..mesher.size() - 1)
            .filter(|&i| {
                let d = mesher.location(i) - k;
                d > lo && d < hi
            })
            .collect();
        let signs: Vec<bool> = idx
            .iter()
            .map(|&i| a[i + 1] - 2.0 * a[i] + a[i - 1] > 0.0)
            .collect();
        assert!(signs.windows(2).all(|w| w[0] == w[1]), "second differences on ({lo}, {hi})");
    }

    let i = mesher.nearest_index(k);
    let expected = black_scholes_digital(mesher.location(i).exp(), 100.0, 0.0, 0.2, 1.0);
    assert!((a[i] - expected).abs() < 2e-2, "{} vs {expected}", a[i]);
}

#[test]
fn damping_removes_crank_nicolson_ringing() {
    // one large Crank–Nicolson step rings on the jump; two implicit Euler
    // steps in front of it do not
    let mesher = log_spot_mesher(101);
    let solver = plain_solver(bs_op(&mesher, 0.0, 0.0, 0.2), FdmSchemeDesc::crank_nicolson());
    let k = 100.0_f64.ln();
    let window = |a: &[Real]| -> Vec<Real> {
        (0..mesher.size())
            .filter(|&i| (mesher.location(i) - k).abs() < 0.25)
            .map(|i| a[i])
            .collect()
    };

    let mut undamped = digital_payoff(&mesher, 100.0);
    solver.rollback(&mut undamped, 0.5, 0.0, 1, 0).unwrap();
    assert!(!is_monotone(&window(&undamped)));

    let mut damped = digital_payoff(&mesher, 100.0);
    solver.rollback(&mut damped, 0.5, 0.0, 1, 2).unwrap();
    assert!(is_monotone(&window(&damped)));
}

// ─── Boundaries and trivial rollbacks ─────────────────────────────────────────

#[test]
fn dirichlet_edges_are_exact_for_every_scheme() {
    let mesher = log_spot_mesher(51);
    let op = bs_op(&mesher, 0.03, 0.0, 0.2);
    let bc = FdmBoundaryConditionSet::new(vec![
        FdmDirichletBoundary::new(Side::Lower, 0.0),
        FdmDirichletBoundary::new(Side::Upper, 12.5),
    ])
    .unwrap();
    for desc in [
        FdmSchemeDesc::explicit_euler(),
        FdmSchemeDesc::implicit_euler(),
        FdmSchemeDesc::crank_nicolson(),
        FdmSchemeDesc::douglas(),
        FdmSchemeDesc::craig_sneyd(),
        FdmSchemeDesc::modified_craig_sneyd(),
        FdmSchemeDesc::hundsdorfer(),
        FdmSchemeDesc::modified_hundsdorfer(),
        FdmSchemeDesc::method_of_lines(),
        FdmSchemeDesc::tr_bdf2(),
    ] {
        let solver = FdmBackwardSolver::new(
            Arc::clone(&op),
            bc.clone(),
            Arc::new(FdmStepConditionComposite::empty()),
            desc,
        )
        .unwrap();
        let mut a = call_payoff(&mesher, 100.0);
        solver.rollback(&mut a, 0.2, 0.0, 100, 2).unwrap();
        assert_eq!(a[0], 0.0, "{desc:?}");
        assert_eq!(a[50], 12.5, "{desc:?}");
    }
}

#[test]
fn equal_times_leave_the_array_unchanged() {
    let mesher = log_spot_mesher(51);
    let op = bs_op(&mesher, 0.03, 0.0, 0.2);
    for desc in [
        FdmSchemeDesc::explicit_euler(),
        FdmSchemeDesc::crank_nicolson(),
        FdmSchemeDesc::hundsdorfer(),
        FdmSchemeDesc::tr_bdf2(),
    ] {
        let solver = plain_solver(Arc::clone(&op), desc);
        let mut a = call_payoff(&mesher, 100.0);
        let before = a.clone();
        solver.rollback(&mut a, 0.7, 0.7, 10, 0).unwrap();
        assert_eq!(a, before);
    }
}

#[test]
fn rollback_in_pieces_reaches_the_same_value() {
    let mesher = log_spot_mesher(101);
    let solver = plain_solver(bs_op(&mesher, 0.02, 0.0, 0.2), FdmSchemeDesc::douglas());
    let mut once = call_payoff(&mesher, 100.0);
    solver.rollback(&mut once, 1.0, 0.0, 100, 0).unwrap();
    let mut twice = call_payoff(&mesher, 100.0);
    solver.rollback(&mut twice, 1.0, 0.5, 50, 0).unwrap();
    solver.rollback(&mut twice, 0.5, 0.0, 50, 0).unwrap();
    for (x, y) in once.iter().zip(&twice) {
        assert!((x - y).abs() < 1e-12);
    }
}

// ─── Sharing ──────────────────────────────────────────────────────────────────

#[test]
fn one_solver_serves_several_threads() {
    let mesher = log_spot_mesher(101);
    let solver = plain_solver(bs_op(&mesher, 0.01, 0.0, 0.2), FdmSchemeDesc::crank_nicolson());
    let strikes = [90.0, 100.0, 110.0, 120.0];

    let sequential: Vec<Vec<Real>> = strikes
        .iter()
        .map(|&k| {
            let mut a = call_payoff(&mesher, k);
            solver.rollback(&mut a, 1.0, 0.0, 50, 0).unwrap();
            a
        })
        .collect();

    let parallel: Vec<Vec<Real>> = std::thread::scope(|scope| {
        let handles: Vec<_> = strikes
            .iter()
            .map(|&k| {
                let solver = &solver;
                let mesher = &mesher;
                scope.spawn(move || {
                    let mut a = call_payoff(mesher, k);
                    solver.rollback(&mut a, 1.0, 0.0, 50, 0).unwrap();
                    a
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(sequential, parallel);
}
