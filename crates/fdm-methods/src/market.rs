//! Coefficient providers for the spatial operators.
//!
//! Rates and volatilities are passed to operators and meshers explicitly;
//! there is no ambient evaluation date or market snapshot.

use std::fmt;
use std::sync::Arc;

use fdm_core::{ensure, errors::Result, Rate, Real, Time, Volatility};

// ── Rates ─────────────────────────────────────────────────────────────────────

/// A continuously compounded rate curve.
pub trait RateCurve: fmt::Debug + Send + Sync {
    /// Average forward rate over `[t1, t2]`.
    ///
    /// For `t1 == t2` the instantaneous forward rate at `t1` is returned.
    fn forward_rate(&self, t1: Time, t2: Time) -> Rate;

    /// Discount factor from 0 to `t`.
    fn discount(&self, t: Time) -> Real {
        if t == 0.0 {
            1.0
        } else {
            (-self.forward_rate(0.0, t) * t).exp()
        }
    }
}

/// A flat rate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlatRate {
    rate: Rate,
}

impl FlatRate {
    /// Create a flat curve.
    pub fn new(rate: Rate) -> Self {
        Self { rate }
    }
}

impl RateCurve for FlatRate {
    fn forward_rate(&self, _t1: Time, _t2: Time) -> Rate {
        self.rate
    }
}

/// Piecewise flat forward rates.
///
/// `rates[i]` applies on `(times[i-1], times[i]]` (with `times[-1] = 0`);
/// the last rate extends beyond the last time.
#[derive(Debug, Clone, PartialEq)]
pub struct PiecewiseFlatRate {
    times: Vec<Time>,
    rates: Vec<Rate>,
}

impl PiecewiseFlatRate {
    /// Create the curve from segment end times and rates.
    ///
    /// # Errors
    /// [`Configuration`](fdm_core::Error::Configuration) for empty or
    /// mismatched inputs, non-finite values or non-increasing times.
    pub fn new(times: Vec<Time>, rates: Vec<Rate>) -> Result<Self> {
        ensure!(
            !times.is_empty() && times.len() == rates.len(),
            Configuration => "need one rate per time ({} times, {} rates)",
            times.len(),
            rates.len()
        );
        ensure!(
            times.iter().chain(&rates).all(|v| v.is_finite()),
            Configuration => "piecewise rates must be finite"
        );
        ensure!(
            times[0] > 0.0 && times.windows(2).all(|w| w[1] > w[0]),
            Configuration => "segment times must be positive and strictly increasing"
        );
        Ok(Self { times, rates })
    }

    fn segment(&self, t: Time) -> usize {
        self.times.partition_point(|&s| s < t).min(self.rates.len() - 1)
    }

    /// `∫_0^t f(s) ds`.
    fn integral(&self, t: Time) -> Real {
        let mut acc = 0.0;
        let mut prev = 0.0;
        for (&ti, &ri) in self.times.iter().zip(&self.rates) {
            if t <= ti {
                return acc + ri * (t - prev);
            }
            acc += ri * (ti - prev);
            prev = ti;
        }
        acc + self.rates[self.rates.len() - 1] * (t - prev)
    }
}

impl RateCurve for PiecewiseFlatRate {
    fn forward_rate(&self, t1: Time, t2: Time) -> Rate {
        if t2 == t1 {
            // right-continuous instantaneous rate
            let idx = self.times.partition_point(|&s| s <= t1).min(self.rates.len() - 1);
            return self.rates[idx];
        }
        if t1 >= 0.0 && t2 > t1 {
            (self.integral(t2) - self.integral(t1)) / (t2 - t1)
        } else {
            self.rates[self.segment(t1.max(0.0))]
        }
    }
}

// ── Volatility ────────────────────────────────────────────────────────────────

/// A (possibly local) volatility model.
pub trait VolatilityModel: fmt::Debug + Send + Sync {
    /// Variance rate `σ²` to use over `[t1, t2]` at spot level `spot`.
    fn variance_rate(&self, t1: Time, t2: Time, spot: Real) -> Real;
}

/// Constant Black volatility.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstantVolatility {
    sigma: Volatility,
}

impl ConstantVolatility {
    /// Create a constant volatility.
    pub fn new(sigma: Volatility) -> Self {
        Self { sigma }
    }
}

impl VolatilityModel for ConstantVolatility {
    fn variance_rate(&self, _t1: Time, _t2: Time, _spot: Real) -> Real {
        self.sigma * self.sigma
    }
}

/// Local volatility given as a function `σ(t, S)`, sampled at the
/// mid-point of each time interval.
#[derive(Clone)]
pub struct LocalVolatilityFn {
    sigma: Arc<dyn Fn(Time, Real) -> Volatility + Send + Sync>,
}

impl LocalVolatilityFn {
    /// Wrap a local volatility function.
    pub fn new<F>(sigma: F) -> Self
    where
        F: Fn(Time, Real) -> Volatility + Send + Sync + 'static,
    {
        Self {
            sigma: Arc::new(sigma),
        }
    }
}

impl fmt::Debug for LocalVolatilityFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalVolatilityFn").finish_non_exhaustive()
    }
}

impl VolatilityModel for LocalVolatilityFn {
    fn variance_rate(&self, t1: Time, t2: Time, spot: Real) -> Real {
        let sigma = (self.sigma)(0.5 * (t1 + t2), spot);
        sigma * sigma
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_rate_discount() {
        let r = FlatRate::new(0.05);
        assert!((r.discount(2.0) - (-0.1_f64).exp()).abs() < 1e-15);
        assert_eq!(r.discount(0.0), 1.0);
    }

    #[test]
    fn piecewise_forward_rates_average_segments() {
        let c = PiecewiseFlatRate::new(vec![1.0, 2.0], vec![0.01, 0.03]).unwrap();
        assert!((c.forward_rate(0.0, 1.0) - 0.01).abs() < 1e-15);
        assert!((c.forward_rate(0.5, 1.5) - 0.02).abs() < 1e-15);
        assert!((c.forward_rate(3.0, 4.0) - 0.03).abs() < 1e-15);
        assert_eq!(c.forward_rate(1.0, 1.0), 0.03);
        assert_eq!(c.forward_rate(0.5, 0.5), 0.01);
        assert!((c.discount(2.0) - (-0.04_f64).exp()).abs() < 1e-15);
    }

    #[test]
    fn piecewise_rejects_bad_input() {
        assert!(PiecewiseFlatRate::new(vec![], vec![]).is_err());
        assert!(PiecewiseFlatRate::new(vec![2.0, 1.0], vec![0.0, 0.0]).is_err());
        assert!(PiecewiseFlatRate::new(vec![1.0], vec![0.0, 0.1]).is_err());
    }

    #[test]
    fn local_volatility_is_sampled_mid_interval() {
        let lv = LocalVolatilityFn::new(|t, s| 0.1 + t + 0.001 * s);
        let v = lv.variance_rate(0.0, 0.2, 100.0);
        assert!((v - 0.3_f64.powi(2)).abs() < 1e-14);
        assert_eq!(ConstantVolatility::new(0.2).variance_rate(0.0, 1.0, 1.0), 0.2 * 0.2);
    }
}
