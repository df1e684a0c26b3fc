use serde::{Deserialize, Serialize};

use crate::geometry::{LatLng, LatLngBounds};

/// A boundary (neighbourhood, search area) with optional holes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolygonRegion {
    pub external: Vec<LatLng>,
    #[serde(default)]
    pub internals: Vec<Vec<LatLng>>,
}

impl PolygonRegion {
    /// Outer ring first, then every hole.
    pub fn rings(&self) -> Vec<Vec<LatLng>> {
        std::iter::once(self.external.clone())
            .chain(self.internals.iter().cloned())
            .collect()
    }

    pub fn bounds(&self) -> Option<LatLngBounds> {
        LatLngBounds::from_points(&self.external)
    }
}
