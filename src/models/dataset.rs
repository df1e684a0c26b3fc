use serde::{Deserialize, Serialize};

use super::{property::Property, region::PolygonRegion};

/// Body of a successful search response. Replaced in whole on every search.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub properties: Vec<Property>,
    pub polygons: Vec<PolygonRegion>,
}

impl Dataset {
    pub fn from_json(body: &str) -> anyhow::Result<Dataset> {
        Ok(serde_json::from_str(body)?)
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty() && self.polygons.is_empty()
    }
}
