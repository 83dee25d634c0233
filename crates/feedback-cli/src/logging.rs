//! Diagnostic logging for the CLI.

use feedback_core::config::{DEFAULT_LOG_FILTER, LOG_FILTER_ENV};
use tracing_subscriber::{fmt, EnvFilter};

/// Filter from `FEEDBACK_LOG`, falling back to `warn` when unset or invalid.
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_FILTER_ENV)
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}

/// Install the stderr subscriber. Safe to call more than once.
pub fn init() {
    let _ = fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
