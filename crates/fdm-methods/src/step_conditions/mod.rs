//! Step conditions.
//!
//! A step condition transforms the solution array at particular times: a
//! dividend drop, an exercise decision, a snapshot. The time stepper lands
//! exactly on every stopping time of the [`FdmStepConditionComposite`] and
//! applies the composite after every sub-step.

pub mod dividend;
pub mod exercise;
pub mod snapshot;

pub use dividend::FdmDividendHandler;
pub use exercise::{FdmAmericanStepCondition, FdmBermudanStepCondition};
pub use snapshot::FdmSnapshotCondition;

use std::fmt;
use std::sync::Arc;

use fdm_core::{ensure, errors::Result, Real, Time};

/// Two times closer than this are the same stopping time.
pub const STOPPING_TIME_TOLERANCE: Time = 1e-10;

/// A transformation of the solution array at given times.
pub trait StepCondition: fmt::Debug + Send + Sync {
    /// Times at which the condition must be applied.
    fn stopping_times(&self) -> Vec<Time>;

    /// Transform `a`, the solution at time `t`.
    fn apply_to(&self, a: &mut [Real], t: Time) -> Result<()>;

    /// Conditions returning `true` are applied after every sub-step, not
    /// only at their stopping times.
    fn applies_every_step(&self) -> bool {
        false
    }
}

#[derive(Debug, Clone)]
struct Entry {
    condition: Arc<dyn StepCondition>,
    times: Vec<Time>,
}

/// An ordered collection of step conditions.
///
/// Conditions sharing a stopping time are applied in registration order.
#[derive(Debug, Clone, Default)]
pub struct FdmStepConditionComposite {
    entries: Vec<Entry>,
    stopping_times: Vec<Time>,
}

impl FdmStepConditionComposite {
    /// The empty composite: no stopping times, applying it is a no-op.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Collect `conditions`.
    ///
    /// # Errors
    /// * [`Domain`](fdm_core::Error::Domain) for a negative or non-finite
    ///   stopping time.
    /// * [`Configuration`](fdm_core::Error::Configuration) for a time-keyed
    ///   condition without stopping times.
    pub fn new(conditions: Vec<Arc<dyn StepCondition>>) -> Result<Self> {
        let mut entries = Vec::with_capacity(conditions.len());
        let mut all_times = Vec::new();
        for condition in conditions {
            let mut times = condition.stopping_times();
            ensure!(
                times.iter().all(|t| t.is_finite() && *t >= 0.0),
                Domain => "stopping times must be finite and non-negative, got {times:?}"
            );
            ensure!(
                !times.is_empty() || condition.applies_every_step(),
                Configuration => "step condition {condition:?} has no stopping times"
            );
            times.sort_by(Time::total_cmp);
            all_times.extend_from_slice(&times);
            entries.push(Entry { condition, times });
        }

        all_times.sort_by(Time::total_cmp);
        all_times.dedup_by(|b, a| (*b - *a).abs() <= STOPPING_TIME_TOLERANCE);

        Ok(Self {
            entries,
            stopping_times: all_times,
        })
    }

    /// A copy with `condition` appended.
    pub fn with_condition(&self, condition: Arc<dyn StepCondition>) -> Result<Self> {
        let mut conditions: Vec<Arc<dyn StepCondition>> =
            self.entries.iter().map(|e| Arc::clone(&e.condition)).collect();
        conditions.push(condition);
        Self::new(conditions)
    }

    /// Sorted, de-duplicated union of all stopping times.
    pub fn stopping_times(&self) -> &[Time] {
        &self.stopping_times
    }

    /// Number of conditions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no conditions.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Apply every condition that reacts at `t`.
    ///
    /// A time-keyed condition receives its own stopping time rather than `t`
    /// so that it sees the exact event time.
    pub fn apply_to(&self, a: &mut [Real], t: Time) -> Result<()> {
        for entry in &self.entries {
            let hit = entry
                .times
                .iter()
                .find(|&&s| (s - t).abs() <= STOPPING_TIME_TOLERANCE);
            match hit {
                Some(&s) => entry.condition.apply_to(a, s)?,
                None if entry.condition.applies_every_step() => entry.condition.apply_to(a, t)?,
                None => {}
            }
        }
        Ok(())
    }
}
