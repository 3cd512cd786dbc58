//! Country bounding-box check, run before any provider call

use serde::{Deserialize, Serialize};

/// Axis-aligned box in decimal degrees; edges are inclusive
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl BoundingBox {
    pub fn contains(&self, latitude: f64, longitude: f64) -> bool {
        (self.min_lat..=self.max_lat).contains(&latitude)
            && (self.min_lon..=self.max_lon).contains(&longitude)
    }

    /// Parse Nominatim's `boundingbox`: `[min_lat, max_lat, min_lon, max_lon]`
    /// as decimal strings. Anything malformed gives `None`.
    pub fn from_provider(values: &[String]) -> Option<Self> {
        let [min_lat, max_lat, min_lon, max_lon] = values else {
            return None;
        };
        let parse = |v: &String| v.trim().parse::<f64>().ok().filter(|n| n.is_finite());
        Some(Self {
            min_lat: parse(min_lat)?,
            max_lat: parse(max_lat)?,
            min_lon: parse(min_lon)?,
            max_lon: parse(max_lon)?,
        })
    }

    /// Whether the whole box lies inside `other`
    pub fn within(&self, other: &BoundingBox) -> bool {
        other.contains(self.min_lat, self.min_lon) && other.contains(self.max_lat, self.max_lon)
    }
}
