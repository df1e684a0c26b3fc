use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A WGS84 position. On the wire it is a `[latitude, longitude]` pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> LatLng {
        LatLng { lat, lng }
    }
}

impl Serialize for LatLng {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        (&self.lat, &self.lng).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for LatLng {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let (lat, lng) = <(f64, f64)>::deserialize(deserializer)?;
        Ok(LatLng { lat, lng })
    }
}

/// Axis-aligned box spanned by a set of positions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLngBounds {
    pub south_west: LatLng,
    pub north_east: LatLng,
}

impl LatLngBounds {
    pub fn from_point(point: LatLng) -> LatLngBounds {
        LatLngBounds {
            south_west: point,
            north_east: point,
        }
    }

    /// Returns `None` for an empty set of points.
    pub fn from_points<'a, I>(points: I) -> Option<LatLngBounds>
    where
        I: IntoIterator<Item = &'a LatLng>,
    {
        points.into_iter().fold(None, |bounds, point| match bounds {
            None => Some(LatLngBounds::from_point(*point)),
            Some(b) => Some(b.extend(*point)),
        })
    }

    pub fn extend(self, point: LatLng) -> LatLngBounds {
        LatLngBounds {
            south_west: LatLng::new(
                self.south_west.lat.min(point.lat),
                self.south_west.lng.min(point.lng),
            ),
            north_east: LatLng::new(
                self.north_east.lat.max(point.lat),
                self.north_east.lng.max(point.lng),
            ),
        }
    }

    pub fn union(self, other: LatLngBounds) -> LatLngBounds {
        self.extend(other.south_west).extend(other.north_east)
    }

    pub fn contains(&self, point: LatLng) -> bool {
        point.lat >= self.south_west.lat
            && point.lat <= self.north_east.lat
            && point.lng >= self.south_west.lng
            && point.lng <= self.north_east.lng
    }

    pub fn center(&self) -> LatLng {
        LatLng::new(
            (self.south_west.lat + self.north_east.lat) / 2.0,
            (self.south_west.lng + self.north_east.lng) / 2.0,
        )
    }
}
