pub mod config;
pub mod console;
pub mod filters;
pub mod geometry;
pub mod logger;
pub mod map;
pub mod models;
pub mod render;
pub mod search;
pub mod viewer;

pub use filters::{FilterCriteria, FilterForm};
pub use map::{LayerMap, MapSurface};
pub use models::Dataset;
pub use viewer::ListingViewer;
