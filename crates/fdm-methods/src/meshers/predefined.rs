//! Mesher over caller supplied locations.

use fdm_core::{errors::Result, Real};

use super::Fdm1dMesher;

impl Fdm1dMesher {
    /// Use `locations` as the grid.
    ///
    /// # Errors
    /// [`Configuration`](fdm_core::Error::Configuration) unless the locations
    /// are finite, strictly increasing and at least two.
    pub fn predefined(locations: &[Real]) -> Result<Self> {
        Self::from_locations(locations.to_vec())
    }
}
