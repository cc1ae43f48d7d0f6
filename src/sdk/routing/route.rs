use serde::{Deserialize, Serialize};

use super::cache::Coord;

/// Distance (meters) and duration (seconds) for one origin/destination pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RouteMetrics {
    pub distance: f64,
    pub duration: f64,
    /// Set when the values are placeholders produced after a provider failure.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub estimated: bool,
}

impl RouteMetrics {
    pub fn new(distance: f64, duration: f64) -> Self {
        Self {
            distance,
            duration,
            estimated: false,
        }
    }
}

/// A drivable path between two points, with its totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteGeometry {
    pub coordinates: Vec<Coord>,
    pub distance: f64,
    pub duration: f64,
}
