use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::error::AddressError;
use crate::sdk::routing::Coord;

/// One suggestion from the address search, in provider order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddressCandidate {
    /// Full display text, e.g. "Banegårdspladsen 1, 8000 Aarhus C".
    pub text: String,
    pub coordinate: Coord,
    pub id: String,
    pub street: String,
    pub house_number: String,
    pub postcode: String,
    pub city: String,
}

#[async_trait]
pub trait AddressLookup: Send + Sync {
    async fn autocomplete(&self, query: &str) -> Result<Vec<AddressCandidate>, AddressError>;
}
