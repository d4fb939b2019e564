//! Douglas ADI scheme.
//!
//! ```text
//! Y0 = U + dt·L·U
//! Yi = Y(i-1) + θ·dt·L_i·(Yi − U)      i = 1..k
//! ```

use fdm_core::{errors::Result, Real, Time};

use super::{axpy, directional_sweep, discretize_step};
use crate::boundary::FdmBoundaryConditionSet;
use crate::operators::FdmLinearOpComposite;

/// Douglas operator-splitting step.
#[derive(Debug, Clone, Copy)]
pub struct DouglasScheme<'a> {
    theta: Real,
    op: &'a dyn FdmLinearOpComposite,
    bc_set: &'a FdmBoundaryConditionSet,
}

impl<'a> DouglasScheme<'a> {
    /// Douglas scheme with implicitness θ.
    pub fn new(theta: Real, op: &'a dyn FdmLinearOpComposite, bc_set: &'a FdmBoundaryConditionSet) -> Self {
        Self { theta, op, bc_set }
    }

    /// Advance `a` from `from` back to `to`.
    pub fn step(&self, a: &mut [Real], from: Time, to: Time) -> Result<()> {
        let split = discretize_step(self.op, a, from, to)?;
        let dt = from - to;

        let mut y = axpy(dt, &split.apply(a), a);
        self.bc_set.apply_after_applying(&mut y, to);
        let mut y = directional_sweep(&split, y, a, self.theta * dt, self.bc_set, to)?;
        self.bc_set.apply_after_solving(&mut y, to);

        a.copy_from_slice(&y);
        Ok(())
    }
}
