use serde::{Deserialize, Serialize};

use super::fields::{bool_or_flag, f64_or_string, i64_or_string, u64_or_string};
use crate::geometry::LatLng;

/// A rentable listing as returned by the search endpoint.
///
/// The endpoint derives these values from scraped script arrays, so numbers
/// and flags may arrive as strings or `0`/`1` as well as native JSON types.
/// Nulls, fractional counts and unknown flag spellings are rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    #[serde(deserialize_with = "u64_or_string")]
    pub id: u64,
    pub url: String,
    #[serde(deserialize_with = "f64_or_string")]
    pub latitude: f64,
    #[serde(deserialize_with = "f64_or_string")]
    pub longitude: f64,
    #[serde(deserialize_with = "u64_or_string")]
    pub price: u64,
    #[serde(deserialize_with = "i64_or_string")]
    pub bedrooms: i64,
    #[serde(deserialize_with = "bool_or_flag")]
    pub studio: bool,
    #[serde(deserialize_with = "bool_or_flag")]
    pub shared: bool,
    #[serde(default, deserialize_with = "bool_or_flag")]
    pub live: bool,
    #[serde(default, deserialize_with = "bool_or_flag")]
    pub furnished: bool,
}

impl Property {
    pub fn position(&self) -> LatLng {
        LatLng::new(self.latitude, self.longitude)
    }
}
