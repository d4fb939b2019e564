//! Explicit Euler: `u(to) = u(from) + dt·L·u(from)`.

use fdm_core::{errors::Result, Real, Time};

use super::{axpy, discretize_step};
use crate::boundary::FdmBoundaryConditionSet;
use crate::operators::{FdmLinearOpComposite, FdmOperatorSplit};

/// Fully explicit step. Stable only for `dt` below the diffusion limit.
#[derive(Debug, Clone, Copy)]
pub struct ExplicitEulerScheme<'a> {
    op: &'a dyn FdmLinearOpComposite,
    bc_set: &'a FdmBoundaryConditionSet,
}

impl<'a> ExplicitEulerScheme<'a> {
    /// Bind the scheme to an operator and its boundary conditions.
    pub fn new(op: &'a dyn FdmLinearOpComposite, bc_set: &'a FdmBoundaryConditionSet) -> Self {
        Self { op, bc_set }
    }

    /// Advance `a` from `from` back to `to`.
    pub fn step(&self, a: &mut [Real], from: Time, to: Time) -> Result<()> {
        let split = discretize_step(self.op, a, from, to)?;
        self.step_with(&split, a, from - to, to, 1.0);
        Ok(())
    }

    /// `a ← a + θ·dt·L·a` with the edges pinned at `to`.
    pub(crate) fn step_with(&self, split: &FdmOperatorSplit, a: &mut [Real], dt: Time, to: Time, theta: Real) {
        let y = axpy(theta * dt, &split.apply(a), a);
        a.copy_from_slice(&y);
        self.bc_set.apply_after_applying(a, to);
    }
}
