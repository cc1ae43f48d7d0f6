pub mod address;
pub mod aggregator;
pub mod config;
pub mod hospitals;
pub mod routing;
pub mod session;
pub mod specialties;
pub mod util;
