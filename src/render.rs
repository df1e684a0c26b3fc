use anyhow::Result;
use log::{debug, info};
use maud::html;

use crate::{
    filters::{FilterCriteria, FilterForm},
    geometry::LatLngBounds,
    map::{Layer, LayerId, MapSurface, Marker, PolygonLayer},
    models::{Dataset, PolygonRegion, Property},
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderSummary {
    pub markers: usize,
    pub regions: usize,
    pub bounds: Option<LatLngBounds>,
}

/// Removes every marker and polygon from the map. Tile layers stay.
pub fn reset<M: MapSurface>(map: &mut M) -> usize {
    let overlays: Vec<LayerId> = map
        .layers()
        .filter(|(_, layer)| layer.is_overlay())
        .map(|(id, _)| id)
        .collect();

    for id in &overlays {
        map.remove_layer(*id);
    }
    overlays.len()
}

/// Draws one polygon per region and fits the viewport to all of them.
pub fn draw_regions<M: MapSurface>(map: &mut M, regions: &[PolygonRegion]) -> Option<LatLngBounds> {
    let mut bounds: Option<LatLngBounds> = None;

    for region in regions {
        let polygon = PolygonLayer {
            rings: region.rings(),
        };
        if let Some(region_bounds) = polygon.bounds() {
            bounds = Some(match bounds {
                Some(b) => b.union(region_bounds),
                None => region_bounds,
            });
        }
        map.add_layer(Layer::Polygon(polygon));
    }

    if let Some(b) = bounds {
        map.fit_bounds(b);
    }
    bounds
}

/// Clears the overlays and draws only the regions of `dataset`.
pub fn render_regions<M: MapSurface>(map: &mut M, dataset: &Dataset) -> RenderSummary {
    let removed = reset(map);
    debug!("Removed {} overlays", removed);

    RenderSummary {
        markers: 0,
        regions: dataset.polygons.len(),
        bounds: draw_regions(map, &dataset.polygons),
    }
}

pub fn popup_html(property: &Property) -> String {
    html! {
        a href=(property.url) target="_blank" { strong { "#" (property.id) } }
        br;
        "Price: " (property.price)
        br;
        "Bedrooms: " (property.bedrooms)
    }
    .into_string()
}

pub fn draw_markers<M: MapSurface>(
    map: &mut M,
    properties: &[Property],
    criteria: &FilterCriteria,
) -> usize {
    let matching = criteria.apply(properties);
    for property in &matching {
        map.add_layer(Layer::Marker(Marker {
            position: property.position(),
            popup: Some(popup_html(property)),
        }));
    }
    matching.len()
}

/// Clears the overlays and redraws them from `dataset` and `form`.
///
/// The form is parsed before anything is removed, so a bad field leaves the
/// map exactly as it was.
pub fn render<M: MapSurface>(
    map: &mut M,
    dataset: &Dataset,
    form: &FilterForm,
) -> Result<RenderSummary> {
    let criteria = FilterCriteria::from_form(form)?;

    let removed = reset(map);
    debug!("Removed {} overlays", removed);

    let bounds = draw_regions(map, &dataset.polygons);
    let markers = draw_markers(map, &dataset.properties, &criteria);

    let summary = RenderSummary {
        markers,
        regions: dataset.polygons.len(),
        bounds,
    };
    info!(
        "Rendered {} of {} listings and {} regions",
        summary.markers,
        dataset.properties.len(),
        summary.regions
    );
    Ok(summary)
}
