//! Backward solver.
//!
//! Owns the operator, the boundary conditions and the condition set, and
//! composes an implicit Euler damping phase with the configured scheme:
//!
//! ```text
//! from ──damping (implicit Euler)──▶ damping_to ──main scheme──▶ to
//! damping_to = from − (from − to)·d/(steps + d)
//! ```

use std::sync::Arc;

use fdm_core::{ensure, errors::Result, Real, Size, Time};

use crate::boundary::FdmBoundaryConditionSet;
use crate::operators::FdmLinearOpComposite;
use crate::schemes::{FdmScheme, FdmSchemeDesc, FdmSchemeType};
use crate::step_conditions::FdmStepConditionComposite;
use crate::stepper::FdmTimeStepper;

/// Rolls solution arrays back in time.
///
/// The solver holds no per-rollback state, so one instance can roll back
/// any number of independent arrays, also from several threads at once.
///
/// # Example
/// ```
/// use std::sync::Arc;
/// use fdm_methods::{
///     FdmBackwardSolver, FdmBlackScholesOp, FdmBoundaryConditionSet, Fdm1dMesher,
///     FdmSchemeDesc, FdmStepConditionComposite,
/// };
/// use fdm_methods::market::{ConstantVolatility, FlatRate};
///
/// let mesher = Fdm1dMesher::uniform(50.0_f64.ln(), 150.0_f64.ln(), 101).unwrap();
/// let op = FdmBlackScholesOp::new(
///     &mesher,
///     Arc::new(FlatRate::new(0.0)),
///     Arc::new(FlatRate::new(0.0)),
///     Arc::new(ConstantVolatility::new(0.2)),
/// )
/// .unwrap();
/// let solver = FdmBackwardSolver::new(
///     Arc::new(op),
///     FdmBoundaryConditionSet::empty(),
///     Arc::new(FdmStepConditionComposite::empty()),
///     FdmSchemeDesc::crank_nicolson(),
/// )
/// .unwrap();
///
/// let mut values: Vec<f64> = mesher
///     .locations()
///     .iter()
///     .map(|x| (x.exp() - 100.0).max(0.0))
///     .collect();
/// solver.rollback(&mut values, 1.0, 0.0, 100, 0).unwrap();
/// let atm = values[mesher.nearest_index(100.0_f64.ln())];
/// assert!((atm - 7.97).abs() < 0.2);
/// ```
#[derive(Debug, Clone)]
pub struct FdmBackwardSolver {
    op: Arc<dyn FdmLinearOpComposite>,
    bc_set: FdmBoundaryConditionSet,
    condition: Arc<FdmStepConditionComposite>,
    desc: FdmSchemeDesc,
}

impl FdmBackwardSolver {
    /// Compose a solver.
    ///
    /// # Errors
    /// [`Configuration`](fdm_core::Error::Configuration) if `desc` does not
    /// validate.
    pub fn new(
        op: Arc<dyn FdmLinearOpComposite>,
        bc_set: FdmBoundaryConditionSet,
        condition: Arc<FdmStepConditionComposite>,
        desc: FdmSchemeDesc,
    ) -> Result<Self> {
        desc.validate()?;
        Ok(Self {
            op,
            bc_set,
            condition,
            desc,
        })
    }

    /// The scheme description.
    pub fn scheme_desc(&self) -> &FdmSchemeDesc {
        &self.desc
    }

    /// The condition set.
    pub fn condition(&self) -> &FdmStepConditionComposite {
        &self.condition
    }

    /// Roll `a` back from `from` to `to` with `steps` main steps preceded by
    /// `damping_steps` implicit Euler steps.
    ///
    /// Every input is checked before `a` is touched. `from == to` leaves
    /// `a` unchanged.
    ///
    /// # Errors
    /// * [`Configuration`](fdm_core::Error::Configuration) for a size
    ///   mismatch, no steps at all, or a non-finite boundary value.
    /// * [`Domain`](fdm_core::Error::Domain) for non-finite times,
    ///   `from < to` or `to < 0`.
    /// * [`Numerical`](fdm_core::Error::Numerical) for a singular solve or
    ///   a non-finite value during the rollback.
    pub fn rollback(
        &self,
        a: &mut [Real],
        from: Time,
        to: Time,
        steps: Size,
        damping_steps: Size,
    ) -> Result<()> {
        ensure!(
            a.len() == self.op.size(),
            Configuration => "array size {} does not match the operator size {}",
            a.len(),
            self.op.size()
        );
        ensure!(
            from.is_finite() && to.is_finite(),
            Domain => "rollback times must be finite, got {from} -> {to}"
        );
        ensure!(from >= to, Domain => "cannot roll back from {from} to the later time {to}");
        ensure!(to >= 0.0, Domain => "cannot roll back to the negative time {to}");
        if from == to {
            return Ok(());
        }
        ensure!(
            steps + damping_steps > 0,
            Configuration => "a rollback from {from} to {to} needs at least one step"
        );
        self.bc_set.check_values(from)?;
        self.bc_set.check_values(to)?;

        #[cfg(feature = "logging")]
        tracing::debug!(
            scheme = %self.desc.scheme_type,
            from,
            to,
            steps,
            damping_steps,
            "rolling back"
        );

        let op = self.op.as_ref();
        let implicit = FdmScheme::new(&FdmSchemeDesc::implicit_euler(), op, &self.bc_set)?;

        if self.desc.scheme_type == FdmSchemeType::ImplicitEuler {
            return FdmTimeStepper::new(implicit, &self.bc_set, &self.condition).rollback(
                a,
                from,
                to,
                steps + damping_steps,
            );
        }

        let damping_to = from - (from - to) * damping_steps as Real / (steps + damping_steps) as Real;
        if damping_steps > 0 {
            #[cfg(feature = "logging")]
            tracing::trace!(from, damping_to, damping_steps, "damping phase");
            FdmTimeStepper::new(implicit, &self.bc_set, &self.condition)
                .rollback(a, from, damping_to, damping_steps)?;
        }
        if steps > 0 {
            let scheme = FdmScheme::new(&self.desc, op, &self.bc_set)?;
            FdmTimeStepper::new(scheme, &self.bc_set, &self.condition)
                .rollback(a, damping_to, to, steps)?;
        }
        Ok(())
    }
}
