pub mod dawa;
pub mod error;
pub mod resolver;
pub mod service;

pub use dawa::DawaClient;
pub use error::AddressError;
pub use resolver::{AddressResolver, Resolution, MIN_QUERY_CHARS};
pub use service::{AddressCandidate, AddressLookup};
