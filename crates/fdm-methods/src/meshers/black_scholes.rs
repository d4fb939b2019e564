//! Log-spot mesher sized from a lognormal diffusion.
//!
//! The grid spans the forward path of the spot (including drops for cash
//! dividends) widened by `scale · σ√T · Φ⁻¹(1 − eps)` on both sides, in
//! `x = ln S`.

use std::sync::Arc;

use fdm_core::{ensure, errors::Result, Real, Size, Time, Volatility};
use fdm_math::normal_cdf_inverse;

use super::{ConcentratingPoint, Fdm1dMesher};
use crate::market::{FlatRate, RateCurve};

/// Builder for a Black–Scholes log-spot mesher.
///
/// # Example
/// ```
/// use fdm_methods::meshers::BlackScholesMesherBuilder;
///
/// let mesher = BlackScholesMesherBuilder::new(101, 100.0, 1.0, 0.2)
///     .with_concentration(100.0, 0.1)
///     .build()
///     .unwrap();
/// assert_eq!(mesher.size(), 101);
/// assert!(mesher.lower() < 100.0_f64.ln() && mesher.upper() > 100.0_f64.ln());
/// ```
#[derive(Debug, Clone)]
pub struct BlackScholesMesherBuilder {
    size: Size,
    spot: Real,
    maturity: Time,
    volatility: Volatility,
    risk_free: Arc<dyn RateCurve>,
    dividend_yield: Arc<dyn RateCurve>,
    dividends: Vec<(Time, Real)>,
    x_min: Option<Real>,
    x_max: Option<Real>,
    eps: Real,
    scale_factor: Real,
    concentration: Option<(Real, Real)>,
}

impl BlackScholesMesherBuilder {
    /// Start a builder for `size` nodes around `spot`, using the Black
    /// volatility `volatility` to maturity to size the domain.
    pub fn new(size: Size, spot: Real, maturity: Time, volatility: Volatility) -> Self {
        Self {
            size,
            spot,
            maturity,
            volatility,
            risk_free: Arc::new(FlatRate::new(0.0)),
            dividend_yield: Arc::new(FlatRate::new(0.0)),
            dividends: Vec::new(),
            x_min: None,
            x_max: None,
            eps: 1e-4,
            scale_factor: 1.5,
            concentration: None,
        }
    }

    /// Risk-free and dividend-yield curves used for the forward.
    pub fn with_rates(mut self, risk_free: Arc<dyn RateCurve>, dividend_yield: Arc<dyn RateCurve>) -> Self {
        self.risk_free = risk_free;
        self.dividend_yield = dividend_yield;
        self
    }

    /// Cash dividends as `(time, amount)` pairs.
    pub fn with_dividends(mut self, dividends: Vec<(Time, Real)>) -> Self {
        self.dividends = dividends;
        self
    }

    /// Fix the lower bound in log-spot.
    pub fn with_x_min(mut self, x_min: Real) -> Self {
        self.x_min = Some(x_min);
        self
    }

    /// Fix the upper bound in log-spot.
    pub fn with_x_max(mut self, x_max: Real) -> Self {
        self.x_max = Some(x_max);
        self
    }

    /// Tail probability cut off on each side (default `1e-4`).
    pub fn with_eps(mut self, eps: Real) -> Self {
        self.eps = eps;
        self
    }

    /// Widening factor applied to the tail quantile (default `1.5`).
    pub fn with_scale_factor(mut self, scale_factor: Real) -> Self {
        self.scale_factor = scale_factor;
        self
    }

    /// Concentrate nodes around spot level `level` with relative `density`.
    pub fn with_concentration(mut self, level: Real, density: Real) -> Self {
        self.concentration = Some((level, density));
        self
    }

    /// Build the mesher.
    ///
    /// # Errors
    /// [`Configuration`](fdm_core::Error::Configuration) for a non-positive
    /// spot, maturity or volatility, or an invalid tail probability.
    pub fn build(self) -> Result<Fdm1dMesher> {
        ensure!(
            self.spot > 0.0 && self.spot.is_finite(),
            Configuration => "negative or null underlying given: {}",
            self.spot
        );
        ensure!(
            self.maturity > 0.0 && self.maturity.is_finite(),
            Configuration => "maturity must be positive, got {}",
            self.maturity
        );
        ensure!(
            self.volatility > 0.0 && self.volatility.is_finite(),
            Configuration => "volatility must be positive, got {}",
            self.volatility
        );
        ensure!(
            self.eps > 0.0 && self.eps < 0.5,
            Configuration => "tail probability must be in (0, 0.5), got {}",
            self.eps
        );

        let (mi, ma) = self.forward_range()?;

        let width = self.volatility * self.maturity.sqrt()
            * normal_cdf_inverse(1.0 - self.eps)?
            * self.scale_factor;
        let x_min = self.x_min.unwrap_or(mi.ln() - width);
        let x_max = self.x_max.unwrap_or(ma.ln() + width);

        #[cfg(feature = "logging")]
        tracing::debug!(
            size = self.size,
            spot = self.spot,
            x_min,
            x_max,
            "building Black-Scholes mesher"
        );

        match self.concentration {
            Some((level, density))
                if level > 0.0 && level.ln() >= x_min && level.ln() <= x_max =>
            {
                Fdm1dMesher::concentrating(
                    x_min,
                    x_max,
                    self.size,
                    Some(ConcentratingPoint::new(level.ln(), density, false)),
                )
            }
            _ => Fdm1dMesher::uniform(x_min, x_max, self.size),
        }
    }

    /// Lowest and highest forward level reached on the way to maturity.
    fn forward_range(&self) -> Result<(Real, Real)> {
        let mut steps: Vec<(Time, Real)> = Vec::new();
        for &(t, amount) in &self.dividends {
            ensure!(
                t.is_finite() && amount.is_finite(),
                Configuration => "dividends must be finite, got ({t}, {amount})"
            );
            if (0.0..=self.maturity).contains(&t) {
                steps.push((t, amount));
            }
        }
        let n = ((24.0 * self.maturity) as usize).max(2);
        steps.extend((0..n).map(|i| ((i + 1) as Real * self.maturity / n as Real, 0.0)));
        steps.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let r = &self.risk_free;
        let q = &self.dividend_yield;
        let mut last = 0.0;
        let mut fwd = self.spot;
        let (mut mi, mut ma) = (fwd, fwd);
        for (t, amount) in steps {
            fwd *= r.discount(last) / r.discount(t) * q.discount(t) / q.discount(last);
            mi = mi.min(fwd);
            ma = ma.max(fwd);
            fwd -= amount;
            mi = mi.min(fwd);
            ma = ma.max(fwd);
            last = t;
        }
        ensure!(
            mi > 0.0,
            Configuration => "dividends exceed the forward of the underlying"
        );
        Ok((mi, ma))
    }
}
