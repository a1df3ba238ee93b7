//! Structured logging with tracing.

use tracing_subscriber::{fmt, EnvFilter};

#[derive(Clone)]
pub struct EventLogger;

impl EventLogger {
    /// Initializes the global subscriber. Honors `RUST_LOG`; defaults to
    /// `info`.
    pub fn init() {
        fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .init()
    }

    pub fn log_run(policy: &str, processes: usize) {
        tracing::info!(policy, processes, "simulation requested");
    }
}
