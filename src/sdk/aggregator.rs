use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use super::hospitals::{Hospital, HospitalDirectory};
use super::routing::{Coord, RouteMetrics, RoutingClient};

/// Hospitals offering `specialty`; an empty filter keeps everything.
pub fn filter_by_specialty(hospitals: &[Hospital], specialty: &str) -> Vec<Hospital> {
    let specialty = specialty.trim();
    hospitals
        .iter()
        .filter(|h| specialty.is_empty() || h.has_specialty(specialty))
        .cloned()
        .collect()
}

/// Annotates `hospitals[i]` with `metrics[i]`. On a length mismatch nothing is
/// annotated rather than risk pairing a hospital with another one's metrics.
pub fn overlay_metrics(hospitals: &[Hospital], metrics: &[RouteMetrics]) -> Vec<Hospital> {
    if hospitals.len() != metrics.len() {
        log::error!(
            "Got {} metrics for {} hospitals, leaving list unannotated",
            metrics.len(),
            hospitals.len()
        );
        return hospitals.to_vec();
    }
    hospitals
        .iter()
        .zip(metrics)
        .map(|(hospital, m)| hospital.with_metrics(m))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Duration,
    Distance,
    Unsorted,
}

pub fn display_sort_key(hospitals: &[Hospital]) -> SortKey {
    if hospitals.iter().all(|h| h.duration.is_some()) {
        SortKey::Duration
    } else if hospitals.iter().all(|h| h.distance.is_some()) {
        SortKey::Distance
    } else {
        SortKey::Unsorted
    }
}

fn by_value(a: Option<f64>, b: Option<f64>) -> std::cmp::Ordering {
    a.unwrap_or(f64::INFINITY).total_cmp(&b.unwrap_or(f64::INFINITY))
}

/// Stable sort for presentation: duration, else distance, else unchanged.
pub fn sort_for_display(hospitals: &mut [Hospital]) {
    match display_sort_key(hospitals) {
        SortKey::Duration => hospitals.sort_by(|a, b| by_value(a.duration, b.duration)),
        SortKey::Distance => hospitals.sort_by(|a, b| by_value(a.distance, b.distance)),
        SortKey::Unsorted => {}
    }
}

/// Rebuilds the hospital list whenever the origin or the specialty changes.
pub struct ResultAggregator {
    directory: Arc<HospitalDirectory>,
    routing: Arc<RoutingClient>,
    generation: AtomicU64,
}

impl ResultAggregator {
    pub fn new(directory: Arc<HospitalDirectory>, routing: Arc<RoutingClient>) -> Self {
        Self {
            directory,
            routing,
            generation: AtomicU64::new(0),
        }
    }

    pub fn directory(&self) -> &HospitalDirectory {
        &self.directory
    }

    /// The filtered list, annotated for `origin` when one is set. Returns
    /// `None` if a newer recomputation started while this one was waiting.
    pub async fn recompute(&self, origin: Option<Coord>, specialty: &str) -> Option<Vec<Hospital>> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let filtered = self.directory.with_specialty(specialty);

        let Some(origin) = origin else {
            return Some(filtered);
        };

        let destinations: Vec<Coord> = filtered.iter().map(|h| h.coordinates).collect();
        let metrics = self.routing.get_route_metrics(origin, &destinations).await;

        if self.generation.load(Ordering::SeqCst) != generation {
            log::debug!("Discarding results for {:?}, a newer update is pending", origin);
            return None;
        }
        Some(overlay_metrics(&filtered, &metrics))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sdk::routing::{RouteGeometry, RoutingError, RoutingProvider};
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Answers with each destination's longitude as distance; slow for origins west of 10°E.
    #[derive(Default)]
    struct SlowWestProvider {
        calls: Mutex<usize>,
    }

    #[async_trait]
    impl RoutingProvider for SlowWestProvider {
        async fn matrix(
            &self,
            origin: Coord,
            destinations: &[Coord],
        ) -> Result<Vec<Option<RouteMetrics>>, RoutingError> {
            *self.calls.lock().unwrap() += 1;
            if origin.0 < 10.0 {
                tokio::time::sleep(Duration::from_secs(1)).await;
            }
            Ok(destinations
                .iter()
                .map(|d| Some(RouteMetrics::new(d.0, origin.0)))
                .collect())
        }

        async fn directions(
            &self,
            _start: Coord,
            _end: Coord,
        ) -> Result<Option<RouteGeometry>, RoutingError> {
            Ok(None)
        }
    }

    fn aggregator(provider: Arc<SlowWestProvider>) -> Arc<ResultAggregator> {
        let directory = HospitalDirectory::new(vec![
            Hospital {
                coordinates: (12.5, 55.7),
                ..hospital("rh", &["Kardiologi"])
            },
            Hospital {
                coordinates: (10.2, 56.2),
                ..hospital("auh", &["Neurologi"])
            },
        ])
        .unwrap();
        Arc::new(ResultAggregator::new(
            Arc::new(directory),
            Arc::new(RoutingClient::new(provider)),
        ))
    }

    #[tokio::test(start_paused = true)]
    async fn recompute_without_origin_skips_routing() {
        let provider = Arc::new(SlowWestProvider::default());
        let aggregator = aggregator(provider.clone());

        let list = aggregator.recompute(None, "Kardiologi").await.unwrap();
        assert_eq!(ids(&list), ["rh"]);
        assert!(list[0].distance.is_none());
        assert_eq!(*provider.calls.lock().unwrap(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn recompute_annotates_for_the_origin() {
        let provider = Arc::new(SlowWestProvider::default());
        let aggregator = aggregator(provider.clone());

        let list = aggregator.recompute(Some((11.0, 56.0)), "").await.unwrap();
        assert_eq!(ids(&list), ["rh", "auh"]);
        assert_eq!(list[0].distance, Some(12.5));
        assert_eq!(list[1].distance, Some(10.2));
        assert!(list.iter().all(|h| h.duration == Some(11.0)));
    }

    #[tokio::test(start_paused = true)]
    async fn slower_older_recompute_is_discarded() {
        let provider = Arc::new(SlowWestProvider::default());
        let aggregator = aggregator(provider.clone());

        let older = {
            let aggregator = aggregator.clone();
            tokio::spawn(async move { aggregator.recompute(Some((9.0, 56.0)), "").await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        let newer = aggregator.recompute(Some((12.0, 55.0)), "").await;

        assert!(newer.unwrap().iter().all(|h| h.duration == Some(12.0)));
        assert!(older.await.unwrap().is_none());
        assert_eq!(*provider.calls.lock().unwrap(), 2);
    }

    fn hospital(id: &str, specialties: &[&str]) -> Hospital {
        Hospital {
            id: id.to_string(),
            name: id.to_uppercase(),
            address: String::new(),
            coordinates: (10.0, 56.0),
            specialties: specialties.iter().map(|s| s.to_string()).collect(),
            distance: None,
            duration: None,
            estimated: false,
        }
    }

    fn timed(id: &str, distance: Option<f64>, duration: Option<f64>) -> Hospital {
        Hospital {
            distance,
            duration,
            ..hospital(id, &[])
        }
    }

    fn ids(hospitals: &[Hospital]) -> Vec<&str> {
        hospitals.iter().map(|h| h.id.as_str()).collect()
    }

    #[test]
    fn empty_filter_keeps_everything() {
        let all = vec![hospital("a", &["Kardiologi"]), hospital("b", &[])];
        assert_eq!(ids(&filter_by_specialty(&all, "")), ["a", "b"]);
        assert_eq!(ids(&filter_by_specialty(&all, "   ")), ["a", "b"]);
    }

    #[test]
    fn filter_keeps_source_order() {
        let all = vec![
            hospital("a", &["Kardiologi", "Neurologi"]),
            hospital("b", &["Neurologi"]),
            hospital("c", &["Kardiologi"]),
        ];
        assert_eq!(ids(&filter_by_specialty(&all, "Kardiologi")), ["a", "c"]);
        assert!(filter_by_specialty(&all, "Onkologi").is_empty());
    }

    #[test]
    fn overlay_is_positional() {
        let hospitals = vec![hospital("a", &[]), hospital("b", &[]), hospital("c", &[])];
        let metrics = vec![
            RouteMetrics::new(100.0, 10.0),
            RouteMetrics::new(200.0, 20.0),
            RouteMetrics::new(300.0, 30.0),
        ];
        let annotated = overlay_metrics(&hospitals, &metrics);
        for (i, h) in annotated.iter().enumerate() {
            assert_eq!(h.id, hospitals[i].id);
            assert_eq!(h.distance, Some(metrics[i].distance));
            assert_eq!(h.duration, Some(metrics[i].duration));
        }
    }

    #[test]
    fn overlay_refuses_mismatched_lengths() {
        let hospitals = vec![hospital("a", &[]), hospital("b", &[])];
        let annotated = overlay_metrics(&hospitals, &[RouteMetrics::new(1.0, 1.0)]);
        assert!(annotated.iter().all(|h| h.distance.is_none() && h.duration.is_none()));
    }

    #[test]
    fn sorts_by_duration_when_all_have_one() {
        let mut list = vec![
            timed("slow", Some(1_000.0), Some(900.0)),
            timed("fast", Some(9_000.0), Some(300.0)),
            timed("mid", Some(5_000.0), Some(600.0)),
        ];
        sort_for_display(&mut list);
        assert_eq!(ids(&list), ["fast", "mid", "slow"]);
    }

    #[test]
    fn falls_back_to_distance() {
        let mut list = vec![
            timed("far", Some(9_000.0), Some(100.0)),
            timed("near", Some(1_000.0), None),
        ];
        assert_eq!(display_sort_key(&list), SortKey::Distance);
        sort_for_display(&mut list);
        assert_eq!(ids(&list), ["near", "far"]);
    }

    #[test]
    fn keeps_order_without_complete_metrics() {
        let mut list = vec![
            timed("b", Some(9_000.0), None),
            timed("a", None, None),
            timed("c", Some(1_000.0), None),
        ];
        assert_eq!(display_sort_key(&list), SortKey::Unsorted);
        sort_for_display(&mut list);
        assert_eq!(ids(&list), ["b", "a", "c"]);
    }

    #[test]
    fn equal_durations_keep_their_order() {
        let mut list = vec![
            timed("first", Some(3.0), Some(60.0)),
            timed("second", Some(1.0), Some(60.0)),
            timed("zero", Some(0.0), Some(0.0)),
        ];
        sort_for_display(&mut list);
        assert_eq!(ids(&list), ["zero", "first", "second"]);
    }
}
