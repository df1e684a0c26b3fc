use anyhow::Result;
use log::{error, info, warn};

use crate::{
    config::MapConfig,
    filters::FilterForm,
    geometry::LatLng,
    map::{Layer, MapSurface, TileLayer},
    models::Dataset,
    render::{self, RenderSummary},
    search::{SearchBackend, SearchForm},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loaded,
}

/// Everything the viewer remembers between events. Replaced in whole when a
/// search completes.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewerState {
    pub dataset: Dataset,
    pub phase: Phase,
}

impl Default for ViewerState {
    fn default() -> Self {
        ViewerState {
            dataset: Dataset::default(),
            phase: Phase::Idle,
        }
    }
}

/// Owns the map, the cached dataset and the filter form.
pub struct ListingViewer<M: MapSurface> {
    map: M,
    state: ViewerState,
    form: FilterForm,
}

impl<M: MapSurface> ListingViewer<M> {
    /// Sets the initial view and adds the base tile layer.
    pub fn new(config: &MapConfig, mut map: M) -> ListingViewer<M> {
        map.set_view(
            LatLng::new(config.center_latitude, config.center_longitude),
            config.zoom,
        );
        map.add_layer(Layer::Tile(TileLayer::from_config(config)));

        ListingViewer {
            map,
            state: ViewerState::default(),
            form: FilterForm::default(),
        }
    }

    pub fn map(&self) -> &M {
        &self.map
    }

    pub fn state(&self) -> &ViewerState {
        &self.state
    }

    pub fn dataset(&self) -> &Dataset {
        &self.state.dataset
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn form(&self) -> &FilterForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut FilterForm {
        &mut self.form
    }

    pub fn render(&mut self) -> Result<RenderSummary> {
        render::render(&mut self.map, &self.state.dataset, &self.form)
    }

    /// Re-renders the cached dataset with the current form values.
    pub fn submit_filters(&mut self) -> Result<RenderSummary> {
        if self.state.phase == Phase::Idle {
            warn!("Filtering before any search has completed");
        }
        self.render().map_err(|err| {
            error!("Filter submission rejected: {:#}", err);
            err
        })
    }

    /// Applies the outcome of a search. A failed search keeps the previous
    /// dataset and leaves the map alone. If the new dataset arrives while the
    /// filter form is invalid, its regions are still drawn and no markers are.
    pub fn complete_search(&mut self, response: Result<Dataset>) -> Result<RenderSummary> {
        let dataset = match response {
            Ok(dataset) => dataset,
            Err(err) => {
                error!("Search failed: {:#}", err);
                return Err(err);
            }
        };

        info!(
            "Search returned {} listings and {} regions",
            dataset.properties.len(),
            dataset.polygons.len()
        );
        self.state = ViewerState {
            dataset,
            phase: Phase::Loaded,
        };
        self.render().map_err(|err| {
            error!("Rendering search results failed: {:#}", err);
            render::render_regions(&mut self.map, &self.state.dataset);
            err
        })
    }

    pub async fn submit_search<B: SearchBackend>(
        &mut self,
        backend: &B,
        form: SearchForm,
    ) -> Result<RenderSummary> {
        let response = backend.search(form).await;
        self.complete_search(response)
    }
}
