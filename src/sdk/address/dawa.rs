use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use super::error::AddressError;
use super::service::{AddressCandidate, AddressLookup};

// --- DAWA autocomplete payload ---
#[derive(Deserialize, Debug)]
struct DawaSuggestion {
    tekst: String,
    adresse: DawaAddress,
}

#[derive(Deserialize, Debug)]
struct DawaAddress {
    id: String,
    #[serde(default)]
    vejnavn: String,
    #[serde(default)]
    husnr: String,
    #[serde(default)]
    postnr: String,
    #[serde(default)]
    postnrnavn: String,
    x: f64, // lon
    y: f64, // lat
}

impl DawaSuggestion {
    fn into_candidate(self) -> AddressCandidate {
        AddressCandidate {
            text: self.tekst,
            coordinate: (self.adresse.x, self.adresse.y),
            id: self.adresse.id,
            street: self.adresse.vejnavn,
            house_number: self.adresse.husnr,
            postcode: self.adresse.postnr,
            city: self.adresse.postnrnavn,
        }
    }
}

fn parse_suggestions(text: &str) -> Result<Vec<AddressCandidate>, AddressError> {
    let suggestions: Vec<DawaSuggestion> = serde_json::from_str(text)?;
    Ok(suggestions
        .into_iter()
        .map(DawaSuggestion::into_candidate)
        .collect())
}

/// Danish address autocomplete (Dataforsyningen / DAWA).
pub struct DawaClient {
    client: Client,
    base_url: String,
}

impl DawaClient {
    pub fn new(base_url: String, timeout: Duration) -> Result<Self, AddressError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl AddressLookup for DawaClient {
    async fn autocomplete(&self, query: &str) -> Result<Vec<AddressCandidate>, AddressError> {
        let url = format!("{}/adresser/autocomplete", self.base_url);
        log::debug!("[DAWA] autocomplete for \"{}\"", query);

        let response = self.client.get(&url).query(&[("q", query)]).send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(AddressError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        parse_suggestions(&text).map_err(|e| {
            log::error!("Failed to parse DAWA response. Error: {}. Body: {}", e, text);
            e
        })
    }
}
