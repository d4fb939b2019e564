//! # fdm
//!
//! Finite-difference backward rollback of one-factor pricing PDEs.
//!
//! This crate is a **façade** over the workspace crates. Application code
//! should depend on it rather than on the individual `fdm-*` crates.
//!
//! ## Quick start
//!
//! ```toml
//! [dependencies]
//! fdm = "0.1"
//! ```
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use fdm::methods::market::{ConstantVolatility, FlatRate};
//! use fdm::prelude::*;
//!
//! let mesher = BlackScholesMesherBuilder::new(201, 100.0, 1.0, 0.2)
//!     .with_concentration(100.0, 0.1)
//!     .build()?;
//! let op = FdmBlackScholesOp::new(
//!     &mesher,
//!     Arc::new(FlatRate::new(0.03)),
//!     Arc::new(FlatRate::new(0.0)),
//!     Arc::new(ConstantVolatility::new(0.2)),
//! )?;
//! let desc = FdmSolverDesc {
//!     initial_values: mesher.locations().iter().map(|x| (x.exp() - 100.0).max(0.0)).collect(),
//!     mesher,
//!     bc_set: FdmBoundaryConditionSet::empty(),
//!     condition: FdmStepConditionComposite::empty(),
//!     maturity: 1.0,
//!     time_steps: 100,
//!     damping_steps: 2,
//! };
//! let solver = Fdm1dSolver::new(desc, FdmSchemeDesc::douglas(), Arc::new(op))?;
//! let price = solver.interpolate_at(100.0_f64.ln());
//! assert!((price - 9.41).abs() < 0.05);
//! # Ok::<(), fdm::core::Error>(())
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

/// Core types, aliases and error definitions.
pub use fdm_core as core;

/// Numerical utilities: interpolation, ODE integration, root finding.
pub use fdm_math as math;

/// Meshers, operators, step conditions, schemes and solvers.
pub use fdm_methods as methods;

/// The types needed for a typical rollback.
pub mod prelude {
    pub use fdm_core::{Error, Real, Result, Size, Time};
    pub use fdm_methods::{
        BlackScholesMesherBuilder, ConcentratingPoint, Fdm1dMesher, Fdm1dSolver, FdmAmericanStepCondition,
        FdmBackwardSolver, FdmBermudanStepCondition, FdmBlackScholesOp, FdmBoundaryConditionSet,
        FdmDirichletBoundary, FdmDividendHandler, FdmLinearOpComposite, FdmSchemeDesc, FdmSchemeType,
        FdmSolverDesc, FdmStepConditionComposite, Side, StepCondition,
    };
}
