pub mod layer_map;

pub use layer_map::LayerMap;

use crate::{
    config::MapConfig,
    geometry::{LatLng, LatLngBounds},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LayerId(pub u64);

#[derive(Debug, Clone, PartialEq)]
pub struct TileLayer {
    pub url_template: String,
    pub max_zoom: u8,
    pub attribution: String,
}

impl TileLayer {
    pub fn from_config(config: &MapConfig) -> TileLayer {
        TileLayer {
            url_template: config.tile_url.clone(),
            max_zoom: config.tile_max_zoom,
            attribution: config.tile_attribution.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub position: LatLng,
    pub popup: Option<String>,
}

/// First ring is the outer boundary, the rest are holes.
#[derive(Debug, Clone, PartialEq)]
pub struct PolygonLayer {
    pub rings: Vec<Vec<LatLng>>,
}

impl PolygonLayer {
    pub fn bounds(&self) -> Option<LatLngBounds> {
        LatLngBounds::from_points(self.rings.iter().flatten())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Layer {
    Tile(TileLayer),
    Marker(Marker),
    Polygon(PolygonLayer),
}

impl Layer {
    /// Markers and polygons are overlays; everything else is a base layer.
    pub fn is_overlay(&self) -> bool {
        matches!(self, Layer::Marker(_) | Layer::Polygon(_))
    }
}

/// The slice of an interactive map the viewer drives.
pub trait MapSurface {
    fn set_view(&mut self, center: LatLng, zoom: u8);

    fn add_layer(&mut self, layer: Layer) -> LayerId;

    fn remove_layer(&mut self, id: LayerId) -> Option<Layer>;

    fn layers(&self) -> Box<dyn Iterator<Item = (LayerId, &Layer)> + '_>;

    fn fit_bounds(&mut self, bounds: LatLngBounds);
}
