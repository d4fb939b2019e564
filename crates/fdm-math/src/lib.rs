//! # fdm-math
//!
//! Mathematical utilities used by the finite-difference engine:
//! interpolation, 1-D root finding, adaptive ODE integration,
//! the normal distribution (via statrs) and float comparison.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Modules ───────────────────────────────────────────────────────────────────

/// Floating-point comparison utilities.
pub mod comparison;

/// Probability distributions.
pub mod distributions;

/// 1D interpolation schemes.
pub mod interpolations;

/// Ordinary differential equation integrators.
pub mod ode;

/// 1D root-finding solvers.
pub mod solvers1d;

// ── Convenience re-exports ────────────────────────────────────────────────────

pub use comparison::close_enough;
pub use distributions::{normal_cdf, normal_cdf_inverse, normal_pdf};
pub use interpolations::{
    CubicNaturalSpline, Interpolation1D, LinearInterpolation, MonotoneCubicSpline,
};
pub use ode::AdaptiveRungeKutta;
pub use solvers1d::{brent, brent_from_guess};
