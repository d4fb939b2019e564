//! TR-BDF2.
//!
//! A trapezoidal (Craig–Sneyd, θ = μ = ½) stage covers the fraction `α` of
//! the step, then a BDF2 stage combines it with the start value:
//!
//! ```text
//! f* = TR(U, α·dt)
//! (I − β·L)·U' = (f*/α − (1−α)²/α·U) / (2−α),   β = (1−α)/(2−α)·dt
//! ```

use fdm_core::{errors::Result, Real, Time};

use super::{discretize_step, implicit_solve, CraigSneydScheme};
use crate::boundary::FdmBoundaryConditionSet;
use crate::operators::FdmLinearOpComposite;

/// TR-BDF2 step.
#[derive(Debug, Clone, Copy)]
pub struct TrBdf2Scheme<'a> {
    alpha: Real,
    op: &'a dyn FdmLinearOpComposite,
    bc_set: &'a FdmBoundaryConditionSet,
    trapezoidal: CraigSneydScheme<'a>,
}

impl<'a> TrBdf2Scheme<'a> {
    /// TR-BDF2 with trapezoidal fraction `alpha`.
    pub fn new(alpha: Real, op: &'a dyn FdmLinearOpComposite, bc_set: &'a FdmBoundaryConditionSet) -> Self {
        Self {
            alpha,
            op,
            bc_set,
            trapezoidal: CraigSneydScheme::new(0.5, 0.5, op, bc_set),
        }
    }

    /// Advance `a` from `from` back to `to`.
    pub fn step(&self, a: &mut [Real], from: Time, to: Time) -> Result<()> {
        let split = discretize_step(self.op, a, from, to)?;
        let dt = from - to;
        let alpha = self.alpha;

        let mut f_star = a.to_vec();
        self.trapezoidal.step(&mut f_star, from, from - alpha * dt)?;

        let f: Vec<Real> = f_star
            .iter()
            .zip(a.iter())
            .map(|(fs, u)| (fs / alpha - (1.0 - alpha).powi(2) / alpha * u) / (2.0 - alpha))
            .collect();

        let beta = (1.0 - alpha) / (2.0 - alpha) * dt;
        let x = implicit_solve(&split.combined(), f, beta, self.bc_set, to)?;
        a.copy_from_slice(&x);
        self.bc_set.apply_after_solving(a, to);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{bump, HeatOp};
    use super::*;
    use crate::boundary::{FdmDirichletBoundary, Side};

    #[test]
    fn stiff_steps_do_not_ring() {
        // L-stable: a huge step on a kink leaves no oscillations behind
        let op = HeatOp::new(41, None);
        let bc = FdmBoundaryConditionSet::new(vec![
            FdmDirichletBoundary::new(Side::Lower, 0.0),
            FdmDirichletBoundary::new(Side::Upper, 0.0),
        ])
        .unwrap();
        let mut a: Vec<Real> = (0..41).map(|i| if i == 20 { 1.0 } else { 0.0 }).collect();
        TrBdf2Scheme::new(2.0 - 2.0_f64.sqrt(), &op, &bc)
            .step(&mut a, 50.0, 0.0)
            .unwrap();
        assert!(a.iter().all(|v| v.abs() < 0.05), "{a:?}");
    }

    #[test]
    fn close_to_crank_nicolson_on_smooth_data() {
        let op = HeatOp::new(31, Some(-0.2));
        let bc = FdmBoundaryConditionSet::empty();
        let mut a = bump(31);
        let mut b = a.clone();
        TrBdf2Scheme::new(2.0 - 2.0_f64.sqrt(), &op, &bc).step(&mut a, 0.05, 0.0).unwrap();
        super::super::CrankNicolsonScheme::new(0.5, &op, &bc)
            .step(&mut b, 0.05, 0.0)
            .unwrap();
        for (x, y) in a.iter().zip(&b) {
            assert!((x - y).abs() < 1e-3);
        }
    }

    #[test]
    fn blends_the_untouched_start_and_pins_the_result() {
        let op = HeatOp::new(21, None);
        let bc = FdmBoundaryConditionSet::new(vec![
            FdmDirichletBoundary::new(Side::Lower, 0.5),
            FdmDirichletBoundary::new(Side::Upper, 0.25),
        ])
        .unwrap();
        let alpha = 2.0 - 2.0_f64.sqrt();
        let start = bump(21);

        let mut f_star = start.clone();
        CraigSneydScheme::new(0.5, 0.5, &op, &bc).step(&mut f_star, 0.1, 0.1 - alpha * 0.1).unwrap();
        let f: Vec<Real> = f_star
            .iter()
            .zip(&start)
            .map(|(fs, u)| (fs / alpha - (1.0 - alpha).powi(2) / alpha * u) / (2.0 - alpha))
            .collect();
        let split = op.discretize(0.0, 0.1).unwrap();
        let beta = (1.0 - alpha) / (2.0 - alpha) * 0.1;
        let expected = implicit_solve(&split.combined(), f, beta, &bc, 0.0).unwrap();

        let mut a = start.clone();
        TrBdf2Scheme::new(alpha, &op, &bc).step(&mut a, 0.1, 0.0).unwrap();
        assert_eq!(a[0], 0.5);
        assert_eq!(a[20], 0.25);
        for (x, y) in a.iter().zip(&expected) {
            assert!((x - y).abs() < 1e-14);
        }
    }
}
