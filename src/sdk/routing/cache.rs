use super::route::{RouteGeometry, RouteMetrics};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

/// `(longitude, latitude)` in WGS84 degrees.
pub type Coord = (f64, f64);

fn coord_key(coord: Coord) -> String {
    format!("{},{}", coord.0, coord.1)
}

/// Cache key for a point route, e.g. `10.2,56.1-10.1,56.2`.
pub fn pair_key(start: Coord, end: Coord) -> String {
    format!("{}-{}", coord_key(start), coord_key(end))
}

/// Cache key for a matrix request. The whole ordered destination list is part
/// of the key since the result is only valid for that exact set.
pub fn matrix_key(origin: Coord, destinations: &[Coord]) -> String {
    let destinations = destinations
        .iter()
        .map(|d| coord_key(*d))
        .collect::<Vec<_>>()
        .join("|");
    format!("matrix-{}-{}", coord_key(origin), destinations)
}

/// In-memory store of provider answers for one session. Entries are never
/// evicted; values are shared so a hit hands back the cached object itself.
#[derive(Default)]
pub struct RouteCache {
    metrics: Mutex<HashMap<String, Arc<Vec<RouteMetrics>>>>,
    routes: Mutex<HashMap<String, Arc<RouteGeometry>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    // A panic while holding the lock cannot leave a map half-written.
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl RouteCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_metrics(&self, key: &str) -> Option<Arc<Vec<RouteMetrics>>> {
        lock(&self.metrics).get(key).cloned()
    }

    pub fn insert_metrics(&self, key: String, metrics: Vec<RouteMetrics>) -> Arc<Vec<RouteMetrics>> {
        let metrics = Arc::new(metrics);
        lock(&self.metrics).insert(key, Arc::clone(&metrics));
        metrics
    }

    pub fn get_route(&self, key: &str) -> Option<Arc<RouteGeometry>> {
        lock(&self.routes).get(key).cloned()
    }

    pub fn insert_route(&self, key: String, route: RouteGeometry) -> Arc<RouteGeometry> {
        let route = Arc::new(route);
        lock(&self.routes).insert(key, Arc::clone(&route));
        route
    }

    pub fn metrics_len(&self) -> usize {
        lock(&self.metrics).len()
    }

    pub fn routes_len(&self) -> usize {
        lock(&self.routes).len()
    }
}
