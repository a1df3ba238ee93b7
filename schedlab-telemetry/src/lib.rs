//! # schedlab-telemetry
//!
//! Logging and metrics for simulator hosts (CLI today, HTTP consumers
//! later). The engine itself stays observable through its trace; this
//! crate covers the plumbing around it.

pub mod logging;
pub mod metrics;

pub use logging::EventLogger;
pub use metrics::MetricsRecorder;
