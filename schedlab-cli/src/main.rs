//! ## schedlab-cli
//!
//! Operational entrypoint for the scheduling simulator: load a workload
//! file, run it under its policy, print the per-process metrics, and
//! optionally export or validate the replay trace.

use clap::Parser;

use schedlab_telemetry::logging::EventLogger;
use schedlab_telemetry::metrics::MetricsRecorder;

mod commands;

use commands::Cli;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    EventLogger::init();
    let metrics = MetricsRecorder::new();
    let cli = Cli::parse();
    commands::run_command(cli, metrics)?;
    Ok(())
}
