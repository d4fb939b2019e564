//! One-dimensional meshers.
//!
//! A mesher is an ordered set of grid locations together with the forward
//! and backward spacing of every node. The two edge nodes have no neighbour
//! on their outward side, which is expressed as `None`.
//!
//! * [`Fdm1dMesher::uniform`] — equally spaced nodes
//! * [`Fdm1dMesher::concentrating`] — sinh-stretched nodes around one point
//! * [`Fdm1dMesher::concentrating_multi`] — several concentration points
//! * [`Fdm1dMesher::predefined`] — caller supplied locations
//! * [`BlackScholesMesherBuilder`] — log-spot grid sized from the diffusion

pub mod black_scholes;
pub mod concentrating;
pub mod predefined;
pub mod uniform;

pub use black_scholes::BlackScholesMesherBuilder;
pub use concentrating::ConcentratingPoint;

use fdm_core::{ensure, errors::Result, Real, Size};

/// An immutable one-dimensional grid.
#[derive(Debug, Clone, PartialEq)]
pub struct Fdm1dMesher {
    locations: Vec<Real>,
    dplus: Vec<Option<Real>>,
    dminus: Vec<Option<Real>>,
}

impl Fdm1dMesher {
    /// Wrap a set of locations, computing the node spacings.
    ///
    /// # Errors
    /// [`Configuration`](fdm_core::Error::Configuration) if fewer than two
    /// locations are given or they are not finite and strictly increasing.
    pub(crate) fn from_locations(locations: Vec<Real>) -> Result<Self> {
        ensure!(
            locations.len() >= 2,
            Configuration => "a mesher needs at least 2 nodes, got {}",
            locations.len()
        );
        ensure!(
            locations.iter().all(|x| x.is_finite()),
            Configuration => "mesher locations must be finite"
        );
        if let Some(i) = locations.windows(2).position(|w| w[1] <= w[0]) {
            return Err(fdm_core::Error::Configuration(format!(
                "mesher locations must be strictly increasing (x[{}] = {} >= x[{}] = {})",
                i,
                locations[i],
                i + 1,
                locations[i + 1]
            )));
        }

        let n = locations.len();
        let dplus = (0..n)
            .map(|i| (i + 1 < n).then(|| locations[i + 1] - locations[i]))
            .collect();
        let dminus = (0..n)
            .map(|i| (i > 0).then(|| locations[i] - locations[i - 1]))
            .collect();
        Ok(Self {
            locations,
            dplus,
            dminus,
        })
    }

    /// Number of nodes.
    pub fn size(&self) -> Size {
        self.locations.len()
    }

    /// All node locations in ascending order.
    pub fn locations(&self) -> &[Real] {
        &self.locations
    }

    /// Location of node `i`.
    pub fn location(&self, i: Size) -> Real {
        self.locations[i]
    }

    /// Distance to the next node, `None` on the upper edge.
    pub fn dplus(&self, i: Size) -> Option<Real> {
        self.dplus[i]
    }

    /// Distance to the previous node, `None` on the lower edge.
    pub fn dminus(&self, i: Size) -> Option<Real> {
        self.dminus[i]
    }

    /// First node.
    pub fn lower(&self) -> Real {
        self.locations[0]
    }

    /// Last node.
    pub fn upper(&self) -> Real {
        self.locations[self.locations.len() - 1]
    }

    /// Index of the node closest to `x`.
    pub fn nearest_index(&self, x: Real) -> Size {
        let idx = self.locations.partition_point(|&l| l < x);
        if idx == 0 {
            0
        } else if idx == self.locations.len() {
            idx - 1
        } else if (self.locations[idx] - x).abs() < (x - self.locations[idx - 1]).abs() {
            idx
        } else {
            idx - 1
        }
    }
}

/// Common validation of mesher bounds.
pub(crate) fn check_bounds(start: Real, end: Real, size: Size) -> Result<()> {
    ensure!(
        start.is_finite() && end.is_finite(),
        Configuration => "mesher bounds must be finite, got [{start}, {end}]"
    );
    ensure!(
        end > start,
        Configuration => "end must be larger than start ({end} <= {start})"
    );
    ensure!(
        size >= 2,
        Configuration => "a mesher needs at least 2 nodes, got {size}"
    );
    Ok(())
}
