//! Time stepper.
//!
//! Splits `[to, from]` into equal steps and drives a scheme across them,
//! stopping exactly on every stopping time of the condition set that lies
//! strictly inside the interval. The visited times depend only on the
//! interval, the step count and the stopping times.

use fdm_core::{
    ensure,
    errors::{Error, Result},
    Real, Size, Time,
};

use crate::boundary::FdmBoundaryConditionSet;
use crate::schemes::FdmScheme;
use crate::step_conditions::{FdmStepConditionComposite, STOPPING_TIME_TOLERANCE};

/// Drives one scheme across a rollback interval.
#[derive(Debug, Clone)]
pub struct FdmTimeStepper<'a> {
    scheme: FdmScheme<'a>,
    bc_set: &'a FdmBoundaryConditionSet,
    condition: &'a FdmStepConditionComposite,
}

impl<'a> FdmTimeStepper<'a> {
    /// Stepper for `scheme` honouring `condition`. The edges in `bc_set`
    /// are pinned again after every condition application.
    pub fn new(
        scheme: FdmScheme<'a>,
        bc_set: &'a FdmBoundaryConditionSet,
        condition: &'a FdmStepConditionComposite,
    ) -> Self {
        Self { scheme, bc_set, condition }
    }

    /// The scheme being driven.
    pub fn scheme(&self) -> &FdmScheme<'a> {
        &self.scheme
    }

    /// Roll `a` back from `from` to `to` in `steps` equal steps plus one
    /// extra landing per interior stopping time.
    ///
    /// The condition set is applied after every sub-step with the sub-step's
    /// end time. A stopping time equal to `from` is not applied; one equal
    /// to `to` is. Dirichlet edges hold their boundary values on return.
    ///
    /// # Errors
    /// * [`Domain`](fdm_core::Error::Domain) for non-finite times,
    ///   `from < to` or `to < 0`.
    /// * [`Configuration`](fdm_core::Error::Configuration) for zero steps on
    ///   a non-empty interval.
    /// * [`Numerical`](fdm_core::Error::Numerical) if a step produces a
    ///   non-finite value, plus whatever the scheme or a condition reports.
    pub fn rollback(&self, a: &mut [Real], from: Time, to: Time, steps: Size) -> Result<()> {
        ensure!(
            from.is_finite() && to.is_finite(),
            Domain => "rollback times must be finite, got {from} -> {to}"
        );
        ensure!(from >= to, Domain => "cannot roll back from {from} to the later time {to}");
        ensure!(to >= 0.0, Domain => "cannot roll back to the negative time {to}");
        if from == to {
            return Ok(());
        }
        ensure!(steps > 0, Configuration => "a rollback from {from} to {to} needs at least one step");

        let stopping_times = self.condition.stopping_times();
        let dt = (from - to) / steps as Real;
        let mut now = from;

        for i in 0..steps {
            let next = if i + 1 == steps {
                to
            } else {
                let grid = from - (i + 1) as Real * dt;
                stopping_times
                    .iter()
                    .copied()
                    .find(|s| (s - grid).abs() <= STOPPING_TIME_TOLERANCE)
                    .unwrap_or(grid)
            };

            for &stop in stopping_times.iter().rev() {
                if stop < now - STOPPING_TIME_TOLERANCE && stop > next + STOPPING_TIME_TOLERANCE {
                    #[cfg(feature = "logging")]
                    tracing::trace!(time = stop, "landing on stopping time");
                    self.advance(a, now, stop)?;
                    now = stop;
                }
            }

            self.advance(a, now, next)?;
            now = next;
        }
        Ok(())
    }

    fn advance(&self, a: &mut [Real], from: Time, to: Time) -> Result<()> {
        self.scheme.step(a, from, to)?;
        if let Some(i) = a.iter().position(|v| !v.is_finite()) {
            return Err(Error::Numerical(format!(
                "{} step {from} -> {to} produced the non-finite value {} at node {i}",
                self.scheme.scheme_type(),
                a[i]
            )));
        }
        self.condition.apply_to(a, to)?;
        self.bc_set.apply_after_solving(a, to);
        Ok(())
    }
}
