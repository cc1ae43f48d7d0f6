pub mod cache;
pub mod client;
pub mod error;
pub mod provider;
pub mod route;
pub mod service;

pub use cache::{Coord, RouteCache};
pub use client::{placeholder_metrics, RoutingClient};
pub use error::RoutingError;
pub use provider::RemoteOrsProvider;
pub use route::{RouteGeometry, RouteMetrics};
pub use service::RoutingProvider;
