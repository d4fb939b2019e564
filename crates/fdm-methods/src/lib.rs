//! # fdm-methods
//!
//! Finite-difference backward rollback of one-factor pricing PDEs
//! `∂u/∂t + L(t) u = 0`.
//!
//! # Modules
//!
//! * [`meshers`] — uniform, concentrating and Black–Scholes grids
//! * [`operators`] — triple-band operators, derivatives, the Black–Scholes operator
//! * [`market`] — rate curves and volatility models feeding the operators
//! * [`boundary`] — Dirichlet boundary conditions
//! * [`step_conditions`] — dividends, exercise, snapshots and their composite
//! * [`schemes`] — the time-stepping scheme family
//! * [`stepper`] — drives a scheme across stopping times
//! * [`backward_solver`] — damping phase plus main scheme
//! * [`solver_1d`] — rollback to zero with value, derivatives and theta

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Modules ───────────────────────────────────────────────────────────────────

/// Spatial grids.
pub mod meshers;

/// Spatial operators and their discretization.
pub mod operators;

/// Coefficient providers for the operators.
pub mod market;

/// Dirichlet boundary conditions.
pub mod boundary;

/// Discrete events applied during a rollback.
pub mod step_conditions;

/// Time-stepping schemes.
pub mod schemes;

/// The time stepper.
pub mod stepper;

/// The backward solver.
pub mod backward_solver;

/// One-dimensional solver with value, derivative and theta accessors.
pub mod solver_1d;

// ── Convenience re-exports ────────────────────────────────────────────────────

pub use backward_solver::FdmBackwardSolver;
pub use boundary::{FdmBoundaryConditionSet, FdmDirichletBoundary, Side};
pub use meshers::{BlackScholesMesherBuilder, ConcentratingPoint, Fdm1dMesher};
pub use operators::{FdmBlackScholesOp, FdmLinearOpComposite, FdmOperatorSplit, TripleBandLinearOp};
pub use schemes::{FdmScheme, FdmSchemeDesc, FdmSchemeType};
pub use solver_1d::{Fdm1dSolver, FdmSolverDesc};
pub use step_conditions::{
    FdmAmericanStepCondition, FdmBermudanStepCondition, FdmDividendHandler, FdmSnapshotCondition,
    FdmStepConditionComposite, StepCondition,
};
pub use stepper::FdmTimeStepper;
