pub mod dataset;
mod fields;
pub mod property;
pub mod region;

pub use dataset::Dataset;
pub use property::Property;
pub use region::PolygonRegion;
