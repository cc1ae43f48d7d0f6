use env_logger::{Builder, Env};

/// HTTP client crates are chatty at `debug`; keep them at `warn` unless asked.
const DEFAULT_FILTER: &str = "info,reqwest=warn,hyper_util=warn";

/// Initialises `env_logger` from `RUST_LOG`, falling back to [`DEFAULT_FILTER`].
pub fn init_logging() {
    Builder::from_env(Env::default().default_filter_or(DEFAULT_FILTER))
        .format_timestamp_secs()
        .format_module_path(false)
        .init();
}
