//! Method of lines: the semi-discrete system `du/dt = −L(t)·u` is handed to
//! an adaptive Runge–Kutta integrator.

use fdm_core::{errors::Result, Real, Time};
use fdm_math::AdaptiveRungeKutta;

use super::discretize_step;
use crate::boundary::FdmBoundaryConditionSet;
use crate::operators::FdmLinearOpComposite;

/// Width of the interval the operator is discretized over when the
/// integrator asks for the instantaneous right-hand side.
const INSTANT_WIDTH: Time = 1e-4;

/// Method-of-lines step.
#[derive(Debug, Clone, Copy)]
pub struct MethodOfLinesScheme<'a> {
    eps: Real,
    rel_init_step_size: Real,
    op: &'a dyn FdmLinearOpComposite,
    bc_set: &'a FdmBoundaryConditionSet,
}

impl<'a> MethodOfLinesScheme<'a> {
    /// Integrate with tolerance `eps` and a first trial step of
    /// `rel_init_step_size` times the step.
    pub fn new(
        eps: Real,
        rel_init_step_size: Real,
        op: &'a dyn FdmLinearOpComposite,
        bc_set: &'a FdmBoundaryConditionSet,
    ) -> Self {
        Self {
            eps,
            rel_init_step_size,
            op,
            bc_set,
        }
    }

    fn rhs(&self, t: Time, u: &[Real]) -> Result<Vec<Real>> {
        let t = t.max(0.0);
        let split = self.op.discretize(t, t + INSTANT_WIDTH)?;
        let mut dudt: Vec<Real> = split.apply(u).into_iter().map(|v| -v).collect();
        self.bc_set.apply_to_derivative(&mut dudt);
        Ok(dudt)
    }

    /// Advance `a` from `from` back to `to`.
    pub fn step(&self, a: &mut [Real], from: Time, to: Time) -> Result<()> {
        // validates sizes and direction
        discretize_step(self.op, a, from, to)?;
        let dt = from - to;
        let rk = AdaptiveRungeKutta::new(self.eps, self.rel_init_step_size * dt, 0.0);
        let rhs = |t: Real, u: &[Real]| self.rhs(t, u);
        let u = rk.integrate(&rhs, a, from, to.max(0.0))?;
        a.copy_from_slice(&u);
        self.bc_set.apply_after_solving(a, to);
        Ok(())
    }
}
