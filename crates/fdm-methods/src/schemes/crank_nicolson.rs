//! θ-scheme: an explicit step weighted `1 − θ` followed by an implicit step
//! weighted `θ`. θ = ½ is Crank–Nicolson.

use fdm_core::{errors::Result, Real, Time};

use super::{discretize_step, ExplicitEulerScheme, ImplicitEulerScheme};
use crate::boundary::FdmBoundaryConditionSet;
use crate::operators::FdmLinearOpComposite;

/// Crank–Nicolson (θ-blend) step.
#[derive(Debug, Clone, Copy)]
pub struct CrankNicolsonScheme<'a> {
    theta: Real,
    op: &'a dyn FdmLinearOpComposite,
    explicit: ExplicitEulerScheme<'a>,
    implicit: ImplicitEulerScheme<'a>,
}

impl<'a> CrankNicolsonScheme<'a> {
    /// θ-scheme on `op`.
    pub fn new(theta: Real, op: &'a dyn FdmLinearOpComposite, bc_set: &'a FdmBoundaryConditionSet) -> Self {
        Self {
            theta,
            op,
            explicit: ExplicitEulerScheme::new(op, bc_set),
            implicit: ImplicitEulerScheme::new(op, bc_set),
        }
    }

    /// Implicitness θ.
    pub fn theta(&self) -> Real {
        self.theta
    }

    /// Advance `a` from `from` back to `to`.
    pub fn step(&self, a: &mut [Real], from: Time, to: Time) -> Result<()> {
        let split = discretize_step(self.op, a, from, to)?;
        let dt = from - to;
        if self.theta != 1.0 {
            self.explicit.step_with(&split, a, dt, to, 1.0 - self.theta);
        }
        if self.theta != 0.0 {
            self.implicit.step_with(&split, a, dt, to, self.theta)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{bump, HeatOp};
    use super::*;

    #[test]
    fn limits_are_the_euler_schemes() {
        let op = HeatOp::new(21, Some(-0.1));
        let bc = FdmBoundaryConditionSet::empty();

        let mut a = bump(21);
        let mut b = a.clone();
        CrankNicolsonScheme::new(1.0, &op, &bc).step(&mut a, 0.2, 0.1).unwrap();
        ImplicitEulerScheme::new(&op, &bc).step(&mut b, 0.2, 0.1).unwrap();
        assert_eq!(a, b);

        let mut a = bump(21);
        let mut b = a.clone();
        CrankNicolsonScheme::new(0.0, &op, &bc).step(&mut a, 0.2, 0.1).unwrap();
        ExplicitEulerScheme::new(&op, &bc).step(&mut b, 0.2, 0.1).unwrap();
        assert_eq!(a, b);
    }
}
