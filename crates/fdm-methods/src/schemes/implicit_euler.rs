//! Implicit Euler: `(I − dt·L)·u(to) = u(from)`.

use fdm_core::{errors::Result, Real, Time};

use super::{discretize_step, implicit_solve};
use crate::boundary::FdmBoundaryConditionSet;
use crate::operators::{FdmLinearOpComposite, FdmOperatorSplit};

/// Fully implicit step on the summed operator.
///
/// First order but L-stable, so it is the scheme of choice for damping
/// non-smooth terminal data.
#[derive(Debug, Clone, Copy)]
pub struct ImplicitEulerScheme<'a> {
    op: &'a dyn FdmLinearOpComposite,
    bc_set: &'a FdmBoundaryConditionSet,
}

impl<'a> ImplicitEulerScheme<'a> {
    /// Bind the scheme to an operator and its boundary conditions.
    pub fn new(op: &'a dyn FdmLinearOpComposite, bc_set: &'a FdmBoundaryConditionSet) -> Self {
        Self { op, bc_set }
    }

    /// Advance `a` from `from` back to `to`.
    pub fn step(&self, a: &mut [Real], from: Time, to: Time) -> Result<()> {
        let split = discretize_step(self.op, a, from, to)?;
        self.step_with(&split, a, from - to, to, 1.0)
    }

    /// Solve `(I − θ·dt·L)·x = a` with boundary rows at `to`.
    pub(crate) fn step_with(
        &self,
        split: &FdmOperatorSplit,
        a: &mut [Real],
        dt: Time,
        to: Time,
        theta: Real,
    ) -> Result<()> {
        let x = implicit_solve(&split.combined(), a.to_vec(), theta * dt, self.bc_set, to)?;
        a.copy_from_slice(&x);
        self.bc_set.apply_after_solving(a, to);
        Ok(())
    }
}
