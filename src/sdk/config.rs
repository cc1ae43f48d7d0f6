use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

use super::util::rate_limit::ORS_DEFAULT_PER_MINUTE;

pub const DEFAULT_ORS_BASE_URL: &str = "https://api.openrouteservice.org";
pub const DEFAULT_DAWA_BASE_URL: &str = "https://api.dataforsyningen.dk";
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 15;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable {0}")]
    Missing(&'static str),

    #[error("Invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct FinderConfig {
    pub ors_api_key: String,
    pub ors_base_url: String,
    pub dawa_base_url: String,
    pub hospitals_path: PathBuf,
    pub specialties_path: PathBuf,
    pub debounce: Duration,
    pub http_timeout: Duration,
    pub ors_requests_per_minute: u32,
}

impl FinderConfig {
    /// Reads the configuration from the process environment.
    /// Call `dotenvy::dotenv()` first if a `.env` file should be honoured.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let ors_api_key = lookup("ORS_API_KEY")
            .filter(|key| !key.trim().is_empty())
            .ok_or(ConfigError::Missing("ORS_API_KEY"))?;

        let string_or = |key: &str, default: &str| {
            lookup(key)
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or_else(|| default.to_string())
        };

        Ok(Self {
            ors_api_key,
            ors_base_url: string_or("ORS_BASE_URL", DEFAULT_ORS_BASE_URL),
            dawa_base_url: string_or("DAWA_BASE_URL", DEFAULT_DAWA_BASE_URL),
            hospitals_path: lookup("HOSPITALS_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("data/hospitals.json")),
            specialties_path: lookup("SPECIALTIES_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("data/specialties.csv")),
            debounce: Duration::from_millis(parse_or(
                &lookup,
                "ADDRESS_DEBOUNCE_MS",
                DEFAULT_DEBOUNCE_MS,
            )?),
            http_timeout: Duration::from_secs(parse_or(
                &lookup,
                "HTTP_TIMEOUT_SECS",
                DEFAULT_HTTP_TIMEOUT_SECS,
            )?),
            ors_requests_per_minute: parse_or(
                &lookup,
                "ORS_REQUESTS_PER_MINUTE",
                ORS_DEFAULT_PER_MINUTE,
            )?,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        None => Ok(default),
    }
}
