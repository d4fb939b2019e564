//! Hundsdorfer–Verwer ADI scheme.
//!
//! The corrector weights the whole operator with `μ` and its implicit
//! sweep is anchored at the predictor rather than at the start value.

use fdm_core::{errors::Result, Real, Time};

use super::{axpy, diff, directional_sweep, discretize_step};
use crate::boundary::FdmBoundaryConditionSet;
use crate::operators::FdmLinearOpComposite;

/// Hundsdorfer operator-splitting step.
#[derive(Debug, Clone, Copy)]
pub struct HundsdorferScheme<'a> {
    theta: Real,
    mu: Real,
    op: &'a dyn FdmLinearOpComposite,
    bc_set: &'a FdmBoundaryConditionSet,
}

impl<'a> HundsdorferScheme<'a> {
    /// Hundsdorfer scheme with implicitness θ and corrector weight μ.
    pub fn new(
        theta: Real,
        mu: Real,
        op: &'a dyn FdmLinearOpComposite,
        bc_set: &'a FdmBoundaryConditionSet,
    ) -> Self {
        Self {
            theta,
            mu,
            op,
            bc_set,
        }
    }

    /// Advance `a` from `from` back to `to`.
    pub fn step(&self, a: &mut [Real], from: Time, to: Time) -> Result<()> {
        let split = discretize_step(self.op, a, from, to)?;
        let dt = from - to;
        let theta_dt = self.theta * dt;

        let mut y0 = axpy(dt, &split.apply(a), a);
        self.bc_set.apply_after_applying(&mut y0, to);
        let mut y = directional_sweep(&split, y0.clone(), a, theta_dt, self.bc_set, to)?;
        self.bc_set.apply_after_applying(&mut y, to);

        let mut yt = axpy(self.mu * dt, &split.apply(&diff(&y, a)), &y0);
        self.bc_set.apply_after_applying(&mut yt, to);
        let mut yt = directional_sweep(&split, yt, &y, theta_dt, self.bc_set, to)?;
        self.bc_set.apply_after_solving(&mut yt, to);

        a.copy_from_slice(&yt);
        Ok(())
    }
}
