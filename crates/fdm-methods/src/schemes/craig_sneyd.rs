//! Craig–Sneyd ADI scheme: a Douglas predictor followed by a corrector
//! that re-weights the explicit mixed terms with `μ`.

use fdm_core::{errors::Result, Real, Time};

use super::{axpy, diff, directional_sweep, discretize_step};
use crate::boundary::FdmBoundaryConditionSet;
use crate::operators::FdmLinearOpComposite;

/// Craig–Sneyd operator-splitting step.
#[derive(Debug, Clone, Copy)]
pub struct CraigSneydScheme<'a> {
    theta: Real,
    mu: Real,
    op: &'a dyn FdmLinearOpComposite,
    bc_set: &'a FdmBoundaryConditionSet,
}

impl<'a> CraigSneydScheme<'a> {
    /// Craig–Sneyd scheme with implicitness θ and mixed weight μ.
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
        let y = directional_sweep(&split, y0.clone(), a, theta_dt, self.bc_set, to)?;

        let mut yt = axpy(self.mu * dt, &split.apply_mixed(&diff(&y, a)), &y0);
        self.bc_set.apply_after_applying(&mut yt, to);
        let mut yt = directional_sweep(&split, yt, a, theta_dt, self.bc_set, to)?;
        self.bc_set.apply_after_solving(&mut yt, to);

        a.copy_from_slice(&yt);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{bump, HeatOp};
    use super::super::DouglasScheme;
    use super::*;

    #[test]
    fn without_mixed_terms_it_is_douglas() {
        let op = HeatOp::new(25, None);
        let bc = FdmBoundaryConditionSet::empty();
        let mut a = bump(25);
        let mut b = a.clone();
        CraigSneydScheme::new(0.5, 0.5, &op, &bc).step(&mut a, 0.3, 0.2).unwrap();
        DouglasScheme::new(0.5, &op, &bc).step(&mut b, 0.3, 0.2).unwrap();
        for (x, y) in a.iter().zip(&b) {
            assert!((x - y).abs() < 1e-14);
        }
    }

    #[test]
    fn corrector_pulls_the_mixed_part_towards_the_exact_discount() {
        // M = −½·I commutes with the diffusion, so the exact step is
        // exp(−½·dt) times the step without it
        let op = HeatOp::new(25, Some(-0.5));
        let bc = FdmBoundaryConditionSet::empty();
        let mut a = bump(25);
        let mut b = a.clone();
        let mut c = a.clone();
        CraigSneydScheme::new(0.5, 0.5, &op, &bc).step(&mut a, 0.3, 0.2).unwrap();
        DouglasScheme::new(0.5, &op, &bc).step(&mut b, 0.3, 0.2).unwrap();
        DouglasScheme::new(0.5, &HeatOp::new(25, None), &bc)
            .step(&mut c, 0.3, 0.2)
            .unwrap();
        let exact: Vec<Real> = c.iter().map(|v| (-0.05_f64).exp() * v).collect();

        // explicit Euler discounting sits below the trapezoidal one
        assert!(a[12] > b[12], "{} vs {}", a[12], b[12]);
        let max_err = |v: &[Real]| {
            v.iter()
                .zip(&exact)
                .map(|(x, y)| (x - y).abs())
                .fold(0.0, Real::max)
        };
        assert!(max_err(&a) < 1e-4, "{}", max_err(&a));
        assert!(10.0 * max_err(&a) < max_err(&b), "{} vs {}", max_err(&a), max_err(&b));
    }
}
