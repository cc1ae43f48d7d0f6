use async_trait::async_trait;

use super::cache::Coord;
use super::error::RoutingError;
use super::route::{RouteGeometry, RouteMetrics};

#[async_trait]
pub trait RoutingProvider: Send + Sync {
    /// Distance/duration from `origin` to every destination, in destination order.
    /// A `None` entry is a destination the provider could not reach.
    async fn matrix(
        &self,
        origin: Coord,
        destinations: &[Coord],
    ) -> Result<Vec<Option<RouteMetrics>>, RoutingError>;

    /// Road path between two points. `Ok(None)` means the provider found no route.
    async fn directions(
        &self,
        start: Coord,
        end: Coord,
    ) -> Result<Option<RouteGeometry>, RoutingError>;
}
