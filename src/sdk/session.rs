use std::sync::Arc;
use thiserror::Error;

use super::address::{
    AddressCandidate, AddressError, AddressLookup, AddressResolver, DawaClient, Resolution,
};
use super::aggregator::{sort_for_display, ResultAggregator};
use super::config::FinderConfig;
use super::hospitals::{Hospital, HospitalDirectory};
use super::routing::{Coord, RemoteOrsProvider, RouteGeometry, RoutingClient, RoutingError, RoutingProvider};
use super::util::rate_limit::ors_limiter;

#[derive(Error, Debug)]
pub enum SetupError {
    #[error("Failed to build routing provider: {0}")]
    Routing(#[from] RoutingError),

    #[error("Failed to build address lookup: {0}")]
    Address(#[from] AddressError),
}

/// Everything the user has chosen so far, plus what is currently on screen.
#[derive(Debug, Clone, Default)]
pub struct SelectionState {
    pub origin: Option<Coord>,
    pub origin_label: Option<String>,
    /// Empty means no filter.
    pub specialty: String,
    pub selected: Option<String>,
    pub hovered: Option<String>,
    pub route: Option<Arc<RouteGeometry>>,
    pub candidates: Vec<AddressCandidate>,
    /// Published list, in dataset order.
    pub hospitals: Vec<Hospital>,
}

/// One user's interaction with the finder.
pub struct FinderSession {
    resolver: AddressResolver,
    aggregator: ResultAggregator,
    routing: Arc<RoutingClient>,
    state: SelectionState,
}

impl FinderSession {
    pub fn new(
        lookup: Arc<dyn AddressLookup>,
        provider: Arc<dyn RoutingProvider>,
        directory: Arc<HospitalDirectory>,
        config: &FinderConfig,
    ) -> Self {
        let routing = Arc::new(RoutingClient::new(provider));
        let state = SelectionState {
            hospitals: directory.all().to_vec(),
            ..SelectionState::default()
        };
        Self {
            resolver: AddressResolver::new(lookup, config.debounce),
            aggregator: ResultAggregator::new(directory, Arc::clone(&routing)),
            routing,
            state,
        }
    }

    /// Wires the DAWA and OpenRouteService HTTP clients from `config`.
    pub fn from_config(
        config: &FinderConfig,
        directory: Arc<HospitalDirectory>,
    ) -> Result<Self, SetupError> {
        let lookup = DawaClient::new(config.dawa_base_url.clone(), config.http_timeout)?;
        let provider = RemoteOrsProvider::new(
            config.ors_api_key.clone(),
            config.ors_base_url.clone(),
            config.http_timeout,
            ors_limiter(config.ors_requests_per_minute),
        )?;
        Ok(Self::new(Arc::new(lookup), Arc::new(provider), directory, config))
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    /// Runs one debounced lookup; the candidate list only changes if this
    /// query is still the latest when its answer arrives.
    pub async fn search_address(&mut self, query: &str) -> &[AddressCandidate] {
        match self.resolver.resolve(query).await {
            Resolution::Candidates(candidates) => self.state.candidates = candidates,
            Resolution::Superseded => {}
        }
        &self.state.candidates
    }

    /// Commits candidate `index` as the origin. Returns the new origin, or
    /// `None` if there is no such candidate.
    pub async fn select_candidate(&mut self, index: usize) -> Option<Coord> {
        if index >= self.state.candidates.len() {
            log::warn!(
                "No address candidate #{} ({} available)",
                index,
                self.state.candidates.len()
            );
            return None;
        }
        let candidate = self.state.candidates.swap_remove(index);
        self.state.candidates.clear();
        log::info!("Origin set to {} {:?}", candidate.text, candidate.coordinate);
        self.state.origin_label = Some(candidate.text);
        self.set_origin(Some(candidate.coordinate)).await;
        Some(candidate.coordinate)
    }

    pub async fn set_origin(&mut self, origin: Option<Coord>) {
        self.state.origin = origin;
        if origin.is_none() {
            self.state.origin_label = None;
        }
        // The drawn route belongs to the previous origin.
        self.state.route = None;
        self.state.hovered = None;
        self.refresh().await;
    }

    pub async fn set_specialty(&mut self, specialty: &str) {
        self.state.specialty = specialty.trim().to_string();
        self.refresh().await;

        if let Some(id) = &self.state.selected {
            if !self.state.hospitals.iter().any(|h| &h.id == id) {
                self.state.selected = None;
            }
        }
    }

    async fn refresh(&mut self) {
        let origin = self.state.origin;
        let hospitals = match self.aggregator.recompute(origin, &self.state.specialty).await {
            Some(hospitals) => hospitals,
            // Never keep metrics computed for another origin.
            None => self.aggregator.directory().with_specialty(&self.state.specialty),
        };
        log::info!(
            "{} hospitals for specialty {:?}{}",
            hospitals.len(),
            self.state.specialty,
            if origin.is_some() { " with travel times" } else { "" }
        );
        self.state.hospitals = hospitals;
    }

    /// Shows the route to the hovered hospital. Without an origin, or when the
    /// pointer leaves the list, the route is cleared and nothing is requested.
    pub async fn hover_hospital(&mut self, id: Option<&str>) -> Option<Arc<RouteGeometry>> {
        self.state.hovered = id.map(str::to_string);

        let target = id.and_then(|id| self.state.hospitals.iter().find(|h| h.id == id));
        let (Some(origin), Some(hospital)) = (self.state.origin, target) else {
            self.state.route = None;
            return None;
        };

        let destination = hospital.coordinates;
        self.state.route = self.routing.get_route(origin, destination).await;
        self.state.route.clone()
    }

    /// Marks a hospital as selected; unknown ids clear the selection.
    pub fn select_hospital(&mut self, id: Option<&str>) -> Option<&Hospital> {
        let found = id.and_then(|id| self.state.hospitals.iter().find(|h| h.id == id));
        self.state.selected = found.map(|h| h.id.clone());
        found
    }

    /// The published list in display order.
    pub fn displayed(&self) -> Vec<Hospital> {
        let mut hospitals = self.state.hospitals.clone();
        sort_for_display(&mut hospitals);
        hospitals
    }

    /// Results are only meaningful once both an origin and a specialty are chosen.
    pub fn results_ready(&self) -> bool {
        self.state.origin.is_some() && !self.state.specialty.is_empty()
    }
}
