pub mod sdk;

pub use sdk::address::{AddressCandidate, AddressResolver, DawaClient, Resolution};
pub use sdk::aggregator::{filter_by_specialty, overlay_metrics, sort_for_display, ResultAggregator};
pub use sdk::config::FinderConfig;
pub use sdk::hospitals::{Hospital, HospitalDirectory};
pub use sdk::routing::{Coord, RemoteOrsProvider, RouteGeometry, RouteMetrics, RoutingClient};
pub use sdk::session::{FinderSession, SelectionState};
pub use sdk::specialties::SpecialtyCatalog;
