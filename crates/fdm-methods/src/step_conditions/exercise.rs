//! Early-exercise conditions.

use std::fmt;
use std::sync::Arc;

use fdm_core::{ensure, errors::Result, Real, Time};

use super::StepCondition;
use crate::meshers::Fdm1dMesher;

fn exercise_values<F>(mesher: &Fdm1dMesher, payoff: F) -> Vec<Real>
where
    F: Fn(Real) -> Real,
{
    mesher.locations().iter().map(|x| payoff(x.exp())).collect()
}

fn exercise(a: &mut [Real], values: &[Real]) -> Result<()> {
    ensure!(
        a.len() == values.len(),
        Configuration => "array size {} does not match the mesher size {}",
        a.len(),
        values.len()
    );
    for (v, &ex) in a.iter_mut().zip(values) {
        *v = v.max(ex);
    }
    Ok(())
}

/// American exercise: the holder may exercise at any time, so the value is
/// floored by the intrinsic value after every sub-step.
#[derive(Clone)]
pub struct FdmAmericanStepCondition {
    values: Vec<Real>,
}

impl FdmAmericanStepCondition {
    /// Exercise `payoff(S)` on a log-spot `mesher`.
    pub fn new<F>(mesher: &Fdm1dMesher, payoff: F) -> Self
    where
        F: Fn(Real) -> Real,
    {
        Self {
            values: exercise_values(mesher, payoff),
        }
    }
}

impl fmt::Debug for FdmAmericanStepCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FdmAmericanStepCondition")
            .field("size", &self.values.len())
            .finish()
    }
}

impl StepCondition for FdmAmericanStepCondition {
    fn stopping_times(&self) -> Vec<Time> {
        Vec::new()
    }

    fn apply_to(&self, a: &mut [Real], _t: Time) -> Result<()> {
        exercise(a, &self.values)
    }

    fn applies_every_step(&self) -> bool {
        true
    }
}

/// Bermudan exercise at a discrete set of times.
#[derive(Clone)]
pub struct FdmBermudanStepCondition {
    times: Vec<Time>,
    values: Arc<[Real]>,
}

impl FdmBermudanStepCondition {
    /// Exercise `payoff(S)` on a log-spot `mesher` at `exercise_times`.
    ///
    /// # Errors
    /// [`Configuration`](fdm_core::Error::Configuration) for an empty list
    /// of exercise times.
    pub fn new<F>(exercise_times: Vec<Time>, mesher: &Fdm1dMesher, payoff: F) -> Result<Self>
    where
        F: Fn(Real) -> Real,
    {
        ensure!(
            !exercise_times.is_empty(),
            Configuration => "a Bermudan condition needs at least one exercise time"
        );
        Ok(Self {
            times: exercise_times,
            values: exercise_values(mesher, payoff).into(),
        })
    }
}

impl fmt::Debug for FdmBermudanStepCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FdmBermudanStepCondition")
            .field("times", &self.times)
            .finish_non_exhaustive()
    }
}

impl StepCondition for FdmBermudanStepCondition {
    fn stopping_times(&self) -> Vec<Time> {
        self.times.clone()
    }

    fn apply_to(&self, a: &mut [Real], _t: Time) -> Result<()> {
        exercise(a, &self.values)
    }
}
