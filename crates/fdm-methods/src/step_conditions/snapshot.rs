//! Snapshot of the solution at one time.

use std::sync::Mutex;

use fdm_core::{
    errors::{Error, Result},
    Real, Time,
};

use super::StepCondition;

/// Records a copy of the solution array when the rollback passes `time`.
///
/// The 1-D solver uses it to read off theta.
#[derive(Debug)]
pub struct FdmSnapshotCondition {
    time: Time,
    values: Mutex<Option<Vec<Real>>>,
}

impl FdmSnapshotCondition {
    /// Snapshot at `time`.
    pub fn new(time: Time) -> Self {
        Self {
            time,
            values: Mutex::new(None),
        }
    }

    /// The snapshot time.
    pub fn time(&self) -> Time {
        self.time
    }

    /// The recorded values, if the rollback went through `time`.
    pub fn values(&self) -> Option<Vec<Real>> {
        self.values.lock().ok().and_then(|v| v.clone())
    }
}

impl StepCondition for FdmSnapshotCondition {
    fn stopping_times(&self) -> Vec<Time> {
        vec![self.time]
    }

    fn apply_to(&self, a: &mut [Real], _t: Time) -> Result<()> {
        let mut slot = self
            .values
            .lock()
            .map_err(|_| Error::Runtime("snapshot storage poisoned".into()))?;
        *slot = Some(a.to_vec());
        Ok(())
    }
}
