use std::collections::BTreeMap;

use serde_json::{json, Value};

use super::{Layer, LayerId, MapSurface};
use crate::geometry::{LatLng, LatLngBounds};

const DEFAULT_MAX_ZOOM: u8 = 19;

/// In-memory map surface. Keeps layers in insertion order and tracks the
/// viewport the way a slippy map would.
#[derive(Debug, Clone)]
pub struct LayerMap {
    layers: BTreeMap<LayerId, Layer>,
    next_id: u64,
    center: LatLng,
    zoom: u8,
    max_zoom: u8,
    viewport: Option<LatLngBounds>,
}

impl Default for LayerMap {
    fn default() -> Self {
        LayerMap::new(DEFAULT_MAX_ZOOM)
    }
}

impl LayerMap {
    pub fn new(max_zoom: u8) -> LayerMap {
        LayerMap {
            layers: BTreeMap::new(),
            next_id: 0,
            center: LatLng::new(0.0, 0.0),
            zoom: 0,
            max_zoom,
            viewport: None,
        }
    }

    pub fn center(&self) -> LatLng {
        self.center
    }

    pub fn zoom(&self) -> u8 {
        self.zoom
    }

    /// Bounds of the last `fit_bounds` call, if any.
    pub fn viewport(&self) -> Option<LatLngBounds> {
        self.viewport
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn markers(&self) -> impl Iterator<Item = &super::Marker> {
        self.layers.values().filter_map(|layer| match layer {
            Layer::Marker(marker) => Some(marker),
            _ => None,
        })
    }

    pub fn polygons(&self) -> impl Iterator<Item = &super::PolygonLayer> {
        self.layers.values().filter_map(|layer| match layer {
            Layer::Polygon(polygon) => Some(polygon),
            _ => None,
        })
    }

    pub fn tiles(&self) -> impl Iterator<Item = &super::TileLayer> {
        self.layers.values().filter_map(|layer| match layer {
            Layer::Tile(tile) => Some(tile),
            _ => None,
        })
    }

    /// Overlays as a GeoJSON `FeatureCollection`. Base layers are left out.
    pub fn to_geojson(&self) -> Value {
        let features: Vec<Value> = self
            .layers
            .values()
            .filter_map(|layer| match layer {
                Layer::Marker(marker) => Some(json!({
                    "type": "Feature",
                    "geometry": {
                        "type": "Point",
                        "coordinates": lng_lat(&marker.position),
                    },
                    "properties": { "popup": marker.popup },
                })),
                Layer::Polygon(polygon) => Some(json!({
                    "type": "Feature",
                    "geometry": {
                        "type": "Polygon",
                        "coordinates": polygon
                            .rings
                            .iter()
                            .map(|ring| closed_ring(ring))
                            .collect::<Vec<_>>(),
                    },
                    "properties": {},
                })),
                Layer::Tile(_) => None,
            })
            .collect();

        let mut collection = json!({
            "type": "FeatureCollection",
            "features": features,
        });
        if let Some(bounds) = self.viewport {
            collection["bbox"] = json!([
                bounds.south_west.lng,
                bounds.south_west.lat,
                bounds.north_east.lng,
                bounds.north_east.lat
            ]);
        }
        collection
    }

    fn zoom_for(&self, bounds: &LatLngBounds) -> u8 {
        let span = (bounds.north_east.lat - bounds.south_west.lat)
            .abs()
            .max((bounds.north_east.lng - bounds.south_west.lng).abs());
        if span <= 0.0 {
            return self.max_zoom;
        }
        let zoom = (360.0 / span).log2().floor();
        zoom.clamp(0.0, self.max_zoom as f64) as u8
    }
}

fn lng_lat(point: &LatLng) -> [f64; 2] {
    [point.lng, point.lat]
}

fn closed_ring(ring: &[LatLng]) -> Vec<[f64; 2]> {
    let mut coordinates: Vec<[f64; 2]> = ring.iter().map(lng_lat).collect();
    if let Some(first) = coordinates.first().copied() {
        if coordinates.last() != Some(&first) {
            coordinates.push(first);
        }
    }
    coordinates
}

impl MapSurface for LayerMap {
    fn set_view(&mut self, center: LatLng, zoom: u8) {
        self.center = center;
        self.zoom = zoom.min(self.max_zoom);
    }

    fn add_layer(&mut self, layer: Layer) -> LayerId {
        let id = LayerId(self.next_id);
        self.next_id += 1;
        self.layers.insert(id, layer);
        id
    }

    fn remove_layer(&mut self, id: LayerId) -> Option<Layer> {
        self.layers.remove(&id)
    }

    fn layers(&self) -> Box<dyn Iterator<Item = (LayerId, &Layer)> + '_> {
        Box::new(self.layers.iter().map(|(id, layer)| (*id, layer)))
    }

    fn fit_bounds(&mut self, bounds: LatLngBounds) {
        self.center = bounds.center();
        self.zoom = self.zoom_for(&bounds);
        self.viewport = Some(bounds);
    }
}
