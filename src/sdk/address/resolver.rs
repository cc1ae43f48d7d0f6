use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use super::service::{AddressCandidate, AddressLookup};

/// Queries shorter than this (after trimming) never reach the provider.
pub const MIN_QUERY_CHARS: usize = 2;

#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// Candidates for the most recent query, possibly empty.
    Candidates(Vec<AddressCandidate>),
    /// A newer query was started; this result must not be displayed.
    Superseded,
}

/// Debounced address search. Every call to [`AddressResolver::resolve`] is
/// one keystroke; only the latest one issued may produce candidates.
pub struct AddressResolver {
    lookup: Arc<dyn AddressLookup>,
    debounce: Duration,
    latest: AtomicU64,
}

impl AddressResolver {
    pub fn new(lookup: Arc<dyn AddressLookup>, debounce: Duration) -> Self {
        Self {
            lookup,
            debounce,
            latest: AtomicU64::new(0),
        }
    }

    fn is_latest(&self, ticket: u64) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket
    }

    pub async fn resolve(&self, query: &str) -> Resolution {
        let ticket = self.latest.fetch_add(1, Ordering::SeqCst) + 1;

        if query.trim().chars().count() < MIN_QUERY_CHARS {
            return Resolution::Candidates(Vec::new());
        }

        tokio::time::sleep(self.debounce).await;
        if !self.is_latest(ticket) {
            log::debug!("Query \"{}\" superseded during debounce", query);
            return Resolution::Superseded;
        }

        let result = self.lookup.autocomplete(query).await;
        if !self.is_latest(ticket) {
            log::debug!("Dropping stale address results for \"{}\"", query);
            return Resolution::Superseded;
        }

        match result {
            Ok(candidates) => {
                log::debug!("{} address candidates for \"{}\"", candidates.len(), query);
                Resolution::Candidates(candidates)
            }
            Err(err) => {
                log::error!("Address lookup failed for \"{}\": {}", query, err);
                Resolution::Candidates(Vec::new())
            }
        }
    }
}
