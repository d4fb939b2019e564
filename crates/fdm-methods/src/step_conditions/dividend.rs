//! Cash dividends on a log-spot grid.
//!
//! Just before an ex-dividend time `t_d` (looking backwards) the value at
//! spot `S` equals the value after the drop at `S − D`. The array is
//! re-interpolated with a monotone cubic spline; spots that would fall below
//! the grid are floored at the lowest node.

use fdm_core::{ensure, errors::Result, Real, Time};
use fdm_math::{Interpolation1D, MonotoneCubicSpline};

use super::{StepCondition, STOPPING_TIME_TOLERANCE};
use crate::meshers::Fdm1dMesher;

/// Applies cash dividends `(time, amount)` on a log-spot mesher.
#[derive(Debug, Clone)]
pub struct FdmDividendHandler {
    x: Vec<Real>,
    dividends: Vec<(Time, Real)>,
}

impl FdmDividendHandler {
    /// Create the handler for `dividends` on `mesher` (locations are `ln S`).
    ///
    /// # Errors
    /// * [`Domain`](fdm_core::Error::Domain) for negative or non-finite
    ///   dividend times.
    /// * [`Configuration`](fdm_core::Error::Configuration) for an empty
    ///   schedule or a negative or non-finite amount.
    pub fn new(mesher: &Fdm1dMesher, mut dividends: Vec<(Time, Real)>) -> Result<Self> {
        ensure!(
            !dividends.is_empty(),
            Configuration => "empty dividend schedule"
        );
        for &(t, d) in &dividends {
            ensure!(
                t.is_finite() && t >= 0.0,
                Domain => "dividend time must be finite and non-negative, got {t}"
            );
            ensure!(
                d.is_finite() && d >= 0.0,
                Configuration => "dividend amount must be finite and non-negative, got {d}"
            );
        }
        dividends.sort_by(|a, b| a.0.total_cmp(&b.0));
        Ok(Self {
            x: mesher.locations().to_vec(),
            dividends,
        })
    }

    /// The dividend schedule, sorted by time.
    pub fn dividends(&self) -> &[(Time, Real)] {
        &self.dividends
    }
}

impl StepCondition for FdmDividendHandler {
    fn stopping_times(&self) -> Vec<Time> {
        self.dividends.iter().map(|d| d.0).collect()
    }

    fn apply_to(&self, a: &mut [Real], t: Time) -> Result<()> {
        let amount: Real = self
            .dividends
            .iter()
            .filter(|d| (d.0 - t).abs() <= STOPPING_TIME_TOLERANCE)
            .map(|d| d.1)
            .sum();
        if amount == 0.0 {
            return Ok(());
        }
        ensure!(
            a.len() == self.x.len(),
            Configuration => "array size {} does not match the mesher size {}",
            a.len(),
            self.x.len()
        );

        let spline = MonotoneCubicSpline::new(&self.x, a)?;
        let floor = self.x[0].exp();
        for (v, &x) in a.iter_mut().zip(&self.x) {
            let dropped = (x.exp() - amount).max(floor);
            *v = spline.value(dropped.ln());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_payoff_drops_by_the_dividend() {
        let mesher = Fdm1dMesher::uniform(50.0_f64.ln(), 150.0_f64.ln(), 201).unwrap();
        let handler = FdmDividendHandler::new(&mesher, vec![(0.5, 2.0)]).unwrap();
        let mut a: Vec<Real> = mesher.locations().iter().map(|x| x.exp()).collect();
        handler.apply_to(&mut a, 0.5).unwrap();
        for (i, &x) in mesher.locations().iter().enumerate().skip(10) {
            assert!((a[i] - (x.exp() - 2.0)).abs() < 1e-3, "node {i}");
        }
        // floored at the lowest node
        assert!((a[0] - 50.0).abs() < 1e-9);
    }

    #[test]
    fn other_times_leave_the_array_alone() {
        let mesher = Fdm1dMesher::uniform(0.0, 1.0, 5).unwrap();
        let handler = FdmDividendHandler::new(&mesher, vec![(0.5, 2.0)]).unwrap();
        let mut a = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        handler.apply_to(&mut a, 0.25).unwrap();
        assert_eq!(a, vec![1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(handler.stopping_times(), vec![0.5]);
    }

    #[test]
    fn rejects_negative_amounts() {
        let mesher = Fdm1dMesher::uniform(0.0, 1.0, 5).unwrap();
        assert!(FdmDividendHandler::new(&mesher, vec![(0.5, -1.0)]).is_err());
        assert!(FdmDividendHandler::new(&mesher, vec![(-0.5, 1.0)]).unwrap_err().is_domain());
    }
}
