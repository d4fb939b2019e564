//! Spatial operators.
//!
//! An operator is discretized once per time interval into an
//! [`FdmOperatorSplit`]: one or more directional triple-band parts, which the
//! splitting schemes treat implicitly, and an optional mixed part which is
//! always treated explicitly. The discretization is a value, so a single
//! operator can be shared between threads rolling back independent arrays.

pub mod black_scholes;
pub mod derivatives;
pub mod triple_band;

pub use black_scholes::FdmBlackScholesOp;
pub use derivatives::{first_derivative, second_derivative};
pub use triple_band::TripleBandLinearOp;

use std::fmt;

use fdm_core::{ensure, errors::Result, Real, Size, Time};

/// A time-dependent linear spatial operator `L(t)`.
///
/// The backward equation solved by the schemes is `∂u/∂t + L(t) u = 0`.
pub trait FdmLinearOpComposite: fmt::Debug + Send + Sync {
    /// Number of grid nodes the operator acts on.
    fn size(&self) -> Size;

    /// Discretize the operator for the time interval `[t1, t2]`.
    ///
    /// `t1 == t2` requests the instantaneous operator.
    fn discretize(&self, t1: Time, t2: Time) -> Result<FdmOperatorSplit>;
}

/// An operator discretized over one time interval.
#[derive(Debug, Clone, PartialEq)]
pub struct FdmOperatorSplit {
    directions: Vec<TripleBandLinearOp>,
    mixed: Option<TripleBandLinearOp>,
}

impl FdmOperatorSplit {
    /// Combine directional parts and an optional mixed part.
    ///
    /// # Errors
    /// [`Configuration`](fdm_core::Error::Configuration) if no directional
    /// part is given or the parts differ in size.
    pub fn new(directions: Vec<TripleBandLinearOp>, mixed: Option<TripleBandLinearOp>) -> Result<Self> {
        ensure!(
            !directions.is_empty(),
            Configuration => "an operator split needs at least one direction"
        );
        let n = directions[0].size();
        ensure!(
            directions.iter().chain(mixed.iter()).all(|op| op.size() == n),
            Configuration => "all operator parts must have the same size"
        );
        Ok(Self { directions, mixed })
    }

    /// A single directional part without mixed terms.
    pub fn single(op: TripleBandLinearOp) -> Self {
        Self {
            directions: vec![op],
            mixed: None,
        }
    }

    /// Number of grid nodes.
    pub fn size(&self) -> Size {
        self.directions[0].size()
    }

    /// Number of directional parts.
    pub fn n_directions(&self) -> usize {
        self.directions.len()
    }

    /// Directional part `i`.
    pub fn direction(&self, i: usize) -> &TripleBandLinearOp {
        &self.directions[i]
    }

    /// `L · r` over all parts.
    pub fn apply(&self, r: &[Real]) -> Vec<Real> {
        let mut out = self.apply_mixed(r);
        for op in &self.directions {
            for (o, v) in out.iter_mut().zip(op.apply(r)) {
                *o += v;
            }
        }
        out
    }

    /// `L_i · r` for directional part `i`.
    pub fn apply_direction(&self, i: usize, r: &[Real]) -> Vec<Real> {
        self.directions[i].apply(r)
    }

    /// Mixed part applied to `r`; zero when there is none.
    pub fn apply_mixed(&self, r: &[Real]) -> Vec<Real> {
        self.mixed
            .as_ref()
            .map_or_else(|| vec![0.0; r.len()], |m| m.apply(r))
    }

    /// Sum of all parts as one triple-band operator.
    pub fn combined(&self) -> TripleBandLinearOp {
        let mut total = self.directions[0].clone();
        for op in self.directions.iter().skip(1).chain(self.mixed.iter()) {
            total = total.add(op);
        }
        total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn op(d: Real) -> TripleBandLinearOp {
        TripleBandLinearOp::identity(3).shifted(d, 0.0)
    }

    #[test]
    fn apply_sums_all_parts() {
        let split = FdmOperatorSplit::new(vec![op(1.0), op(2.0)], Some(op(0.5))).unwrap();
        let r = [1.0, 2.0, 3.0];
        assert_eq!(split.apply(&r), vec![3.5, 7.0, 10.5]);
        assert_eq!(split.apply_mixed(&r), vec![0.5, 1.0, 1.5]);
        assert_eq!(split.apply_direction(1, &r), vec![2.0, 4.0, 6.0]);
        assert_eq!(split.combined().diag(), &[3.5, 3.5, 3.5]);
    }

    #[test]
    fn missing_mixed_part_is_zero() {
        let split = FdmOperatorSplit::single(op(1.0));
        assert_eq!(split.apply_mixed(&[1.0, 1.0, 1.0]), vec![0.0; 3]);
        assert_eq!(split.n_directions(), 1);
    }

    #[test]
    fn rejects_inconsistent_parts() {
        assert!(FdmOperatorSplit::new(vec![], None).is_err());
        let bad = FdmOperatorSplit::new(vec![op(1.0)], Some(TripleBandLinearOp::identity(4)));
        assert!(bad.unwrap_err().is_configuration());
    }
}
