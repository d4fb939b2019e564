//! One-dimensional solver.
//!
//! Rolls the initial values back from maturity to time zero and exposes the
//! result through a natural cubic spline, together with first and second
//! derivatives and theta read off a snapshot taken shortly after zero.

use std::sync::Arc;

use fdm_core::{
    ensure,
    errors::{Error, Result},
    Real, Size, Time,
};
use fdm_math::{CubicNaturalSpline, Interpolation1D};

use crate::backward_solver::FdmBackwardSolver;
use crate::boundary::FdmBoundaryConditionSet;
use crate::meshers::Fdm1dMesher;
use crate::operators::FdmLinearOpComposite;
use crate::schemes::FdmSchemeDesc;
use crate::step_conditions::{FdmSnapshotCondition, FdmStepConditionComposite};

/// Inputs of a one-dimensional solve.
#[derive(Debug, Clone)]
pub struct FdmSolverDesc {
    /// Spatial grid.
    pub mesher: Fdm1dMesher,
    /// Boundary conditions.
    pub bc_set: FdmBoundaryConditionSet,
    /// Discrete events.
    pub condition: FdmStepConditionComposite,
    /// Values at maturity, one per node.
    pub initial_values: Vec<Real>,
    /// Time the rollback starts from.
    pub maturity: Time,
    /// Main scheme steps.
    pub time_steps: Size,
    /// Implicit Euler damping steps.
    pub damping_steps: Size,
}

/// Solution of a one-dimensional backward problem at time zero.
#[derive(Debug, Clone)]
pub struct Fdm1dSolver {
    locations: Vec<Real>,
    values: Vec<Real>,
    interpolation: CubicNaturalSpline,
    theta: Option<(Time, CubicNaturalSpline)>,
}

impl Fdm1dSolver {
    /// Solve `desc` with the scheme `scheme` on the operator `op`.
    ///
    /// The snapshot used for theta is taken at
    /// `0.99·min(1/365, first stopping time or maturity)`.
    ///
    /// # Errors
    /// * [`Configuration`](fdm_core::Error::Configuration) if the initial
    ///   values or the operator do not match the mesher.
    /// * [`Domain`](fdm_core::Error::Domain) for a negative or non-finite
    ///   maturity.
    /// * Any error raised during the rollback.
    pub fn new(desc: FdmSolverDesc, scheme: FdmSchemeDesc, op: Arc<dyn FdmLinearOpComposite>) -> Result<Self> {
        let n = desc.mesher.size();
        ensure!(
            desc.initial_values.len() == n && op.size() == n,
            Configuration => "mesher size {n}, initial values {}, operator size {}",
            desc.initial_values.len(),
            op.size()
        );
        ensure!(
            desc.maturity.is_finite() && desc.maturity >= 0.0,
            Domain => "maturity must be finite and non-negative, got {}",
            desc.maturity
        );

        let first_stop = desc.condition.stopping_times().first().copied();
        let snapshot_time = 0.99 * (1.0 / 365.0_f64).min(first_stop.unwrap_or(desc.maturity));
        let snapshot = Arc::new(FdmSnapshotCondition::new(snapshot_time));
        let condition = desc.condition.with_condition(snapshot.clone())?;

        let solver = FdmBackwardSolver::new(op, desc.bc_set, Arc::new(condition), scheme)?;
        let mut values = desc.initial_values;
        solver.rollback(&mut values, desc.maturity, 0.0, desc.time_steps, desc.damping_steps)?;

        let locations = desc.mesher.locations().to_vec();
        let interpolation = CubicNaturalSpline::new(&locations, &values)?;
        let theta = match snapshot.values() {
            Some(v) if snapshot_time > 0.0 => Some((snapshot_time, CubicNaturalSpline::new(&locations, &v)?)),
            _ => None,
        };

        #[cfg(feature = "logging")]
        tracing::debug!(
            size = n,
            maturity = desc.maturity,
            snapshot_time,
            has_theta = theta.is_some(),
            "1-D solve finished"
        );

        Ok(Self {
            locations,
            values,
            interpolation,
            theta,
        })
    }

    /// Grid locations.
    pub fn locations(&self) -> &[Real] {
        &self.locations
    }

    /// Values at time zero, one per node.
    pub fn values(&self) -> &[Real] {
        &self.values
    }

    /// Value at node `i`.
    pub fn value_at_index(&self, i: Size) -> Result<Real> {
        self.values.get(i).copied().ok_or(Error::IndexOutOfRange {
            index: i,
            size: self.values.len(),
        })
    }

    /// Spline value at `x`.
    pub fn interpolate_at(&self, x: Real) -> Real {
        self.interpolation.value(x)
    }

    /// `∂u/∂x` at `x`.
    pub fn derivative_x(&self, x: Real) -> Real {
        self.interpolation.derivative(x)
    }

    /// `∂²u/∂x²` at `x`.
    pub fn derivative_xx(&self, x: Real) -> Real {
        self.interpolation.second_derivative(x)
    }

    /// `(u(t_s, x) − u(0, x)) / t_s` with `t_s` the snapshot time.
    ///
    /// `None` when no snapshot was taken strictly after zero.
    pub fn theta_at(&self, x: Real) -> Option<Real> {
        self.theta
            .as_ref()
            .map(|(t, snapshot)| (snapshot.value(x) - self.interpolate_at(x)) / t)
    }

    /// Delta at spot `s` on a log-spot grid.
    pub fn delta_at_spot(&self, s: Real) -> Real {
        self.derivative_x(s.ln()) / s
    }

    /// Gamma at spot `s` on a log-spot grid.
    pub fn gamma_at_spot(&self, s: Real) -> Real {
        let x = s.ln();
        (self.derivative_xx(x) - self.derivative_x(x)) / (s * s)
    }
}
