use super::types::{DirectionsResponse, MatrixRequest, MatrixResponse};
use crate::sdk::routing::cache::Coord;
use crate::sdk::routing::error::RoutingError;
use crate::sdk::routing::route::{RouteGeometry, RouteMetrics};
use crate::sdk::routing::service::RoutingProvider;
use crate::sdk::util::rate_limit::Limiter;
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::Client;
use std::time::Duration;

const PROFILE: &str = "driving-car";

/// OpenRouteService over HTTP (hosted or self-hosted, depending on `base_url`).
pub struct RemoteOrsProvider {
    client: Client,
    api_key: String,
    base_url: String,
    limiter: Limiter,
}

impl RemoteOrsProvider {
    pub fn new(
        api_key: String,
        base_url: String,
        timeout: Duration,
        limiter: Limiter,
    ) -> Result<Self, RoutingError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            limiter,
        })
    }

    /// Reads the body, turning a non-success status into a [`RoutingError`].
    async fn read_body(&self, url: &str, response: reqwest::Response) -> Result<String, RoutingError> {
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            log::error!(
                "API returned non-success status: {}. URL: {}\nBody: {}",
                status,
                url,
                text
            );
            return Err(RoutingError::from_response(status.as_u16(), text));
        }
        Ok(text)
    }
}

fn metrics_row(response: MatrixResponse, expected: usize) -> Result<Vec<Option<RouteMetrics>>, RoutingError> {
    let distances = response
        .distances
        .into_iter()
        .next()
        .ok_or_else(|| RoutingError::Malformed("matrix has no distance row".to_string()))?;
    let durations = response
        .durations
        .into_iter()
        .next()
        .ok_or_else(|| RoutingError::Malformed("matrix has no duration row".to_string()))?;

    if distances.len() != expected || durations.len() != expected {
        return Err(RoutingError::Malformed(format!(
            "expected {} destinations, got {} distances and {} durations",
            expected,
            distances.len(),
            durations.len()
        )));
    }

    Ok(distances
        .into_iter()
        .zip(durations)
        .map(|cell| match cell {
            (Some(distance), Some(duration)) => Some(RouteMetrics::new(distance, duration)),
            _ => None,
        })
        .collect())
}

#[async_trait]
impl RoutingProvider for RemoteOrsProvider {
    async fn matrix(
        &self,
        origin: Coord,
        destinations: &[Coord],
    ) -> Result<Vec<Option<RouteMetrics>>, RoutingError> {
        self.limiter.until_ready().await;
        let url = format!("{}/v2/matrix/{}", self.base_url, PROFILE);
        let body = MatrixRequest::new(origin, destinations);
        log::debug!(
            "[PROVIDER] Calling matrix for {:?} -> {} destinations",
            origin,
            destinations.len()
        );

        let response = self
            .client
            .post(&url)
            .query(&[("api_key", self.api_key.as_str())])
            .header(ACCEPT, "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                log::error!("Failed to send matrix request. URL: {}\nError: {}", url, e);
                e
            })?;

        let text = self.read_body(&url, response).await?;
        let matrix: MatrixResponse = serde_json::from_str(&text).map_err(|e| {
            log::error!("Failed to parse MatrixResponse. Error: {}. Body: {}", e, text);
            e
        })?;

        metrics_row(matrix, destinations.len())
    }

    async fn directions(
        &self,
        start: Coord,
        end: Coord,
    ) -> Result<Option<RouteGeometry>, RoutingError> {
        self.limiter.until_ready().await;
        let url = format!("{}/v2/directions/{}", self.base_url, PROFILE);
        let start_param = format!("{},{}", start.0, start.1);
        let end_param = format!("{},{}", end.0, end.1);
        log::debug!(
            "[PROVIDER] Calling directions for {:?} -> {:?}",
            start,
            end
        );

        let response = self
            .client
            .get(&url)
            .query(&[
                ("api_key", self.api_key.as_str()),
                ("start", start_param.as_str()),
                ("end", end_param.as_str()),
            ])
            .header(ACCEPT, "application/json, application/geo+json")
            .send()
            .await
            .map_err(|e| {
                log::error!("Failed to send directions request. URL: {}\nError: {}", url, e);
                e
            })?;

        let text = self.read_body(&url, response).await?;
        let directions: DirectionsResponse = serde_json::from_str(&text).map_err(|e| {
            log::error!("Failed to parse DirectionsResponse. Error: {}. Body: {}", e, text);
            e
        })?;

        directions.into_geometry()
    }
}
