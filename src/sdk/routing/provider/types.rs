use serde::{Deserialize, Serialize};

use crate::sdk::routing::cache::Coord;
use crate::sdk::routing::error::RoutingError;
use crate::sdk::routing::route::RouteGeometry;

// --- Matrix endpoint ---

#[derive(Serialize, Debug)]
pub struct MatrixRequest {
    pub locations: Vec<[f64; 2]>,
    pub metrics: [&'static str; 2],
    pub destinations: Vec<usize>,
    pub sources: [usize; 1],
}

impl MatrixRequest {
    /// Origin first, then every destination; source index is always 0.
    pub fn new(origin: Coord, destinations: &[Coord]) -> Self {
        let mut locations = Vec::with_capacity(destinations.len() + 1);
        locations.push([origin.0, origin.1]);
        locations.extend(destinations.iter().map(|d| [d.0, d.1]));
        Self {
            locations,
            metrics: ["distance", "duration"],
            destinations: (1..=destinations.len()).collect(),
            sources: [0],
        }
    }
}

/// `[source][destination]`; ORS reports unreachable pairs as `null`.
#[derive(Deserialize, Debug)]
pub struct MatrixResponse {
    pub distances: Vec<Vec<Option<f64>>>,
    pub durations: Vec<Vec<Option<f64>>>,
}

// --- Directions endpoint ---
// The plain JSON answer carries `routes`, the GeoJSON one carries `features`.

#[derive(Deserialize, Debug, Default)]
pub struct DirectionsResponse {
    #[serde(default)]
    pub routes: Vec<RouteObject>,
    #[serde(default)]
    pub features: Vec<RouteObject>,
}

#[derive(Deserialize, Debug, Default)]
pub struct RouteObject {
    pub geometry: Option<LineGeometry>,
    pub summary: Option<DirectionsSummary>,
    pub properties: Option<RouteProperties>,
    #[serde(default)]
    pub features: Vec<RouteObject>,
}

#[derive(Deserialize, Debug, Default)]
pub struct RouteProperties {
    pub summary: Option<DirectionsSummary>,
}

#[derive(Deserialize, Debug)]
pub struct LineGeometry {
    pub coordinates: Vec<Vec<f64>>,
}

#[derive(Deserialize, Debug, Clone, Copy, Default)]
pub struct DirectionsSummary {
    #[serde(default)]
    pub distance: f64,
    #[serde(default)]
    pub duration: f64,
}

impl DirectionsResponse {
    pub fn first_route(&self) -> Option<&RouteObject> {
        self.routes.first().or_else(|| self.features.first())
    }

    /// `Ok(None)` when the provider found no route at all.
    pub fn into_geometry(self) -> Result<Option<RouteGeometry>, RoutingError> {
        let Some(route) = self.first_route() else {
            return Ok(None);
        };

        let geometry = route
            .geometry
            .as_ref()
            .or_else(|| route.features.first().and_then(|f| f.geometry.as_ref()))
            .ok_or_else(|| RoutingError::Malformed("route has no geometry".to_string()))?;

        let summary = route
            .summary
            .or_else(|| route.properties.as_ref().and_then(|p| p.summary))
            .unwrap_or_default();

        let coordinates = geometry
            .coordinates
            .iter()
            .map(|position| match position.as_slice() {
                [lon, lat, ..] => Ok((*lon, *lat)),
                _ => Err(RoutingError::Malformed(format!(
                    "position with {} values",
                    position.len()
                ))),
            })
            .collect::<Result<Vec<Coord>, _>>()?;

        Ok(Some(RouteGeometry {
            coordinates,
            distance: summary.distance,
            duration: summary.duration,
        }))
    }
}
