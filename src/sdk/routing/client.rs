use rand::Rng;
use std::ops::Range;
use std::sync::Arc;

use super::cache::{matrix_key, pair_key, Coord, RouteCache};
use super::route::{RouteGeometry, RouteMetrics};
use super::service::RoutingProvider;

pub const PLACEHOLDER_DISTANCE_M: Range<f64> = 10_000.0..60_000.0;
pub const PLACEHOLDER_DURATION_S: Range<f64> = 600.0..4_200.0;

/// Stand-in metrics used when the provider cannot answer, flagged as estimated.
pub fn placeholder_metrics<R: Rng>(rng: &mut R) -> RouteMetrics {
    RouteMetrics {
        distance: rng.gen_range(PLACEHOLDER_DISTANCE_M),
        duration: rng.gen_range(PLACEHOLDER_DURATION_S),
        estimated: true,
    }
}

fn placeholders(count: usize) -> Vec<RouteMetrics> {
    let mut rng = rand::thread_rng();
    (0..count).map(|_| placeholder_metrics(&mut rng)).collect()
}

fn fill_unreachable(row: Vec<Option<RouteMetrics>>) -> Vec<RouteMetrics> {
    let mut rng = rand::thread_rng();
    row.into_iter()
        .map(|cell| cell.unwrap_or_else(|| placeholder_metrics(&mut rng)))
        .collect()
}

/// Caching front for a [`RoutingProvider`]. Never fails: provider errors are
/// logged and turned into placeholder metrics or an absent route.
pub struct RoutingClient {
    provider: Arc<dyn RoutingProvider>,
    cache: RouteCache,
}

impl RoutingClient {
    pub fn new(provider: Arc<dyn RoutingProvider>) -> Self {
        Self {
            provider,
            cache: RouteCache::new(),
        }
    }

    pub fn cache(&self) -> &RouteCache {
        &self.cache
    }

    /// One metric per destination, `result[i]` belonging to `destinations[i]`.
    pub async fn get_route_metrics(
        &self,
        origin: Coord,
        destinations: &[Coord],
    ) -> Arc<Vec<RouteMetrics>> {
        if destinations.is_empty() {
            return Arc::new(Vec::new());
        }

        let key = matrix_key(origin, destinations);
        if let Some(metrics) = self.cache.get_metrics(&key) {
            log::debug!("[CACHE HIT] matrix {:?} -> {} destinations", origin, destinations.len());
            return metrics;
        }

        match self.provider.matrix(origin, destinations).await {
            Ok(row) => {
                let unreachable = row.iter().filter(|m| m.is_none()).count();
                if unreachable == 0 {
                    return self.cache.insert_metrics(key, fill_unreachable(row));
                }
                // Rows with estimates stay out of the cache so the next call asks again.
                log::warn!(
                    "{} of {} destinations unreachable from {:?}, using estimates",
                    unreachable,
                    row.len(),
                    origin
                );
                Arc::new(fill_unreachable(row))
            }
            Err(err) => {
                log::error!("Matrix request failed from {:?}: {}", origin, err);
                log::warn!(
                    "Using estimated metrics for {} destinations",
                    destinations.len()
                );
                Arc::new(placeholders(destinations.len()))
            }
        }
    }

    /// Road route between two points, or `None` when there is none to show.
    pub async fn get_route(&self, origin: Coord, destination: Coord) -> Option<Arc<RouteGeometry>> {
        let key = pair_key(origin, destination);
        if let Some(route) = self.cache.get_route(&key) {
            log::debug!("[CACHE HIT] route {}", key);
            return Some(route);
        }

        match self.provider.directions(origin, destination).await {
            Ok(Some(route)) => Some(self.cache.insert_route(key, route)),
            Ok(None) => {
                log::warn!("No route found for {}", key);
                None
            }
            Err(err) if err.is_no_route() => {
                log::warn!("No route found for {}: {}", key, err);
                None
            }
            Err(err) => {
                log::error!("Directions request failed for {}: {}", key, err);
                None
            }
        }
    }
}
