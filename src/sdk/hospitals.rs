use serde::{Deserialize, Serialize};
use std::{fs, path::Path};
use thiserror::Error;

use super::aggregator::filter_by_specialty;
use super::routing::{Coord, RouteMetrics};

#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("Failed to read dataset: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse hospital JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Duplicate hospital id: {0}")]
    DuplicateId(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hospital {
    pub id: String,
    pub name: String,
    pub address: String,
    pub coordinates: Coord,
    pub specialties: Vec<String>,
    /// Meters by road from the current origin.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
    /// Seconds by road from the current origin.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub estimated: bool,
}

impl Hospital {
    pub fn has_specialty(&self, specialty: &str) -> bool {
        self.specialties.iter().any(|s| s == specialty)
    }

    /// A copy of this hospital annotated with `metrics`.
    pub fn with_metrics(&self, metrics: &RouteMetrics) -> Hospital {
        Hospital {
            distance: Some(metrics.distance),
            duration: Some(metrics.duration),
            estimated: metrics.estimated,
            ..self.clone()
        }
    }
}

/// The static hospital list, read once and never mutated.
#[derive(Debug, Clone, Default)]
pub struct HospitalDirectory {
    hospitals: Vec<Hospital>,
}

impl HospitalDirectory {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, DatasetError> {
        let data = fs::read_to_string(path)?;
        Self::from_json(&data)
    }

    pub fn from_json(data: &str) -> Result<Self, DatasetError> {
        let hospitals: Vec<Hospital> = serde_json::from_str(data)?;
        Self::new(hospitals)
    }

    /// Metrics in the source data are discarded; they only make sense for an origin.
    pub fn new(mut hospitals: Vec<Hospital>) -> Result<Self, DatasetError> {
        let mut seen = std::collections::HashSet::new();
        for hospital in &mut hospitals {
            if !seen.insert(hospital.id.clone()) {
                return Err(DatasetError::DuplicateId(hospital.id.clone()));
            }
            hospital.distance = None;
            hospital.duration = None;
            hospital.estimated = false;
        }
        Ok(Self { hospitals })
    }

    pub fn all(&self) -> &[Hospital] {
        &self.hospitals
    }

    pub fn get(&self, id: &str) -> Option<&Hospital> {
        self.hospitals.iter().find(|h| h.id == id)
    }

    /// Copies of the hospitals offering `name`, in dataset order; empty `name` keeps all.
    pub fn with_specialty(&self, name: &str) -> Vec<Hospital> {
        filter_by_specialty(&self.hospitals, name)
    }

    pub fn len(&self) -> usize {
        self.hospitals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hospitals.is_empty()
    }

    /// Every specialty label used by at least one hospital, sorted.
    pub fn specialties_in_use(&self) -> Vec<String> {
        let mut labels: Vec<String> = self
            .hospitals
            .iter()
            .flat_map(|h| h.specialties.iter().cloned())
            .collect();
        labels.sort();
        labels.dedup();
        labels
    }
}
