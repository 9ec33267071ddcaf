//! Process-wide tracing setup.
//!
//! Minimal for now; can grow layered logging, correlation IDs, etc.

use tracing_subscriber::EnvFilter;

/// Initialize tracing with the default `info` filter.
///
/// Safe to call multiple times (subsequent calls are no-ops).
pub fn init() {
    init_with("info");
}

/// Initialize tracing with an explicit fallback filter, still overridable via
/// `RUST_LOG`.
pub fn init_with(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    // JSON logs + timestamps, configurable via RUST_LOG.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(false)
        .try_init();
}
