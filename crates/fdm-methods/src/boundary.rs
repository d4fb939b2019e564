//! Dirichlet boundary conditions.
//!
//! A condition pins the value of the lower or upper edge node. The schemes
//! call the hooks below at fixed points of every step:
//!
//! * after an explicit update the edge value is overwritten,
//! * before an implicit solve the edge row becomes an identity equation
//!   whose right-hand side is the boundary value,
//! * after a solve the edge value is overwritten again.

use std::fmt;
use std::sync::Arc;

use fdm_core::{ensure, errors::Result, Real, Size, Time};

use crate::operators::TripleBandLinearOp;

/// Edge of the grid a boundary condition acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Side {
    /// First node.
    Lower,
    /// Last node.
    Upper,
}

impl Side {
    fn index(self, n: Size) -> Size {
        match self {
            Side::Lower => 0,
            Side::Upper => n - 1,
        }
    }
}

#[derive(Clone)]
enum BoundaryValue {
    Fixed(Real),
    TimeDependent(Arc<dyn Fn(Time) -> Real + Send + Sync>),
}

impl fmt::Debug for BoundaryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryValue::Fixed(v) => f.debug_tuple("Fixed").field(v).finish(),
            BoundaryValue::TimeDependent(_) => f.write_str("TimeDependent(..)"),
        }
    }
}

/// Pins one edge node to a fixed or time-dependent value.
#[derive(Debug, Clone)]
pub struct FdmDirichletBoundary {
    side: Side,
    value: BoundaryValue,
}

impl FdmDirichletBoundary {
    /// Boundary with a constant value.
    pub fn new(side: Side, value: Real) -> Self {
        Self {
            side,
            value: BoundaryValue::Fixed(value),
        }
    }

    /// Boundary whose value depends on time.
    pub fn time_dependent<F>(side: Side, value: F) -> Self
    where
        F: Fn(Time) -> Real + Send + Sync + 'static,
    {
        Self {
            side,
            value: BoundaryValue::TimeDependent(Arc::new(value)),
        }
    }

    /// Side of the grid.
    pub fn side(&self) -> Side {
        self.side
    }

    /// Boundary value at time `t`.
    pub fn value_at(&self, t: Time) -> Real {
        match &self.value {
            BoundaryValue::Fixed(v) => *v,
            BoundaryValue::TimeDependent(f) => f(t),
        }
    }
}

/// The boundary conditions of one solve, at most one per side.
#[derive(Debug, Clone, Default)]
pub struct FdmBoundaryConditionSet {
    conditions: Vec<FdmDirichletBoundary>,
}

impl FdmBoundaryConditionSet {
    /// No boundary conditions.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Collect boundary conditions.
    ///
    /// # Errors
    /// [`Configuration`](fdm_core::Error::Configuration) if two conditions
    /// act on the same side.
    pub fn new(conditions: Vec<FdmDirichletBoundary>) -> Result<Self> {
        for side in [Side::Lower, Side::Upper] {
            let count = conditions.iter().filter(|c| c.side == side).count();
            ensure!(
                count <= 1,
                Configuration => "{count} boundary conditions given for the {side:?} side"
            );
        }
        Ok(Self { conditions })
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// The conditions in the set.
    pub fn conditions(&self) -> &[FdmDirichletBoundary] {
        &self.conditions
    }

    /// Check that every boundary value is finite at `t`.
    pub(crate) fn check_values(&self, t: Time) -> Result<()> {
        for c in &self.conditions {
            let v = c.value_at(t);
            ensure!(
                v.is_finite(),
                Configuration => "non-finite boundary value {v} on the {:?} side at t = {t}",
                c.side
            );
        }
        Ok(())
    }

    fn pin(&self, x: &mut [Real], t: Time) {
        let n = x.len();
        for c in &self.conditions {
            x[c.side.index(n)] = c.value_at(t);
        }
    }

    /// Overwrite the edge values after an explicit update.
    pub fn apply_after_applying(&self, x: &mut [Real], t: Time) {
        self.pin(x, t);
    }

    /// Turn the edge rows of `op` into identity rows and put the boundary
    /// values into `rhs`.
    pub fn apply_before_solving(&self, op: &mut TripleBandLinearOp, rhs: &mut [Real], t: Time) {
        let n = rhs.len();
        for c in &self.conditions {
            let i = c.side.index(n);
            op.set_identity_row(i);
            rhs[i] = c.value_at(t);
        }
    }

    /// Overwrite the edge values after a solve.
    pub fn apply_after_solving(&self, x: &mut [Real], t: Time) {
        self.pin(x, t);
    }

    /// Zero the time derivative of pinned nodes.
    pub fn apply_to_derivative(&self, dxdt: &mut [Real]) {
        let n = dxdt.len();
        for c in &self.conditions {
            dxdt[c.side.index(n)] = 0.0;
        }
    }
}
