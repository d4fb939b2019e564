//! Error types for fdm-rs.
//!
//! Every failure of the finite-difference engine is fatal for the current
//! operation and is reported through a single `thiserror`-derived enum.
//! Configuration, domain and numerical failures are kept apart so that a
//! caller can tell a badly specified grid from a diverging step.

use thiserror::Error;

/// The top-level error type used throughout fdm-rs.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// Invalid set-up of a mesher, operator, condition or scheme.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// An input outside its admissible domain (times, critical points).
    #[error("domain error: {0}")]
    Domain(String),

    /// A numerical failure: singular system, non-finite values,
    /// non-converging integration.
    #[error("numerical error: {0}")]
    Numerical(String),

    /// General precondition violated.
    #[error("precondition not satisfied: {0}")]
    Precondition(String),

    /// General runtime error.
    #[error("{0}")]
    Runtime(String),

    /// Index out of range.
    #[error("index ({index}) out of range [0, {size})")]
    IndexOutOfRange {
        /// The index that was out of range.
        index: usize,
        /// The size of the container.
        size: usize,
    },
}

impl Error {
    /// `true` for configuration errors.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Error::Configuration(_))
    }

    /// `true` for domain errors.
    pub fn is_domain(&self) -> bool {
        matches!(self, Error::Domain(_))
    }

    /// `true` for numerical errors.
    pub fn is_numerical(&self) -> bool {
        matches!(self, Error::Numerical(_))
    }
}

/// Shorthand `Result` type used throughout fdm-rs.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Return early with an error if a condition does not hold.
///
/// The plain form reports an [`Error::Precondition`]; prefixing the message
/// with a variant name and `=>` selects that variant instead.
///
/// # Example
/// ```
/// use fdm_core::{ensure, errors::Error};
/// fn positive(x: f64) -> fdm_core::errors::Result<f64> {
///     ensure!(x.is_finite(), "x must be finite");
///     ensure!(x > 0.0, Domain => "x must be positive, got {x}");
///     Ok(x)
/// }
/// assert!(positive(1.0).is_ok());
/// assert_eq!(
///     positive(-1.0),
///     Err(Error::Domain("x must be positive, got -1".into()))
/// );
/// ```
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $kind:ident => $($msg:tt)*) => {
        if !$cond {
            return Err($crate::errors::Error::$kind(format!($($msg)*)));
        }
    };
    ($cond:expr, $($msg:tt)*) => {
        if !$cond {
            return Err($crate::errors::Error::Precondition(
                format!($($msg)*)
            ));
        }
    };
}
