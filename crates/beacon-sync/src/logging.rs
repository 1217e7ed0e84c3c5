//! Logging initialization for beacon embedders and tests.
//!
//! Events follow the `event = "sync.<module>.<operation>_<phase>"` field
//! convention so log pipelines can filter on stable names instead of
//! message text.

use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber.
///
/// Filter comes from `RUST_LOG`, defaulting to `info`. Safe to call more
/// than once - later calls are no-ops, so tests that share a process don't
/// panic.
pub fn init_logging(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if json {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .try_init();
    } else {
        let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
    }
}
