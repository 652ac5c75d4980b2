//! Tracing setup
//!
//! Logs go to stderr so they never mix into the operator protocol on
//! stdout. The filter comes from `HELDLINE_LOG_LEVEL` and accepts anything
//! `EnvFilter` does (`debug`, `heldline=trace,reqwest=warn`, ...).

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter
pub const LOG_LEVEL_ENV_VAR: &str = "HELDLINE_LOG_LEVEL";

/// Filter used when the environment does not set one
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Build the filter from the environment, falling back to the default on a
/// missing or unparsable value
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_LEVEL_ENV_VAR)
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL))
}

/// Install the global subscriber. Safe to call more than once; later calls
/// are ignored.
pub fn init() {
    let result = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .with_ansi(atty::is(atty::Stream::Stderr))
        .try_init();

    if result.is_ok() {
        tracing::info!("Tracing initialized successfully");
    }
}
