//! Uniform mesher.

use fdm_core::{errors::Result, Real, Size};

use super::{check_bounds, Fdm1dMesher};

impl Fdm1dMesher {
    /// `size` equally spaced nodes on `[start, end]`.
    ///
    /// The last node equals `end` exactly.
    pub fn uniform(start: Real, end: Real, size: Size) -> Result<Self> {
        check_bounds(start, end, size)?;
        let dx = (end - start) / (size - 1) as Real;
        let mut locations: Vec<Real> = (0..size).map(|i| start + i as Real * dx).collect();
        locations[size - 1] = end;
        Self::from_locations(locations)
    }
}
