//! Probability distributions.
//!
//! Only the standard normal is needed by the finite-difference engine
//! (grid extents from quantiles, closed-form references in tests); the
//! special functions are delegated to `statrs`.

pub mod normal;

pub use normal::{normal_cdf, normal_cdf_inverse, normal_pdf};
