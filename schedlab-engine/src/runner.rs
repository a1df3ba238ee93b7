//! Bridge from a validated workload to an engine run.

use thiserror::Error;

use schedlab_config::{ConfigError, PolicyConfig, WorkloadConfig};
use schedlab_policy::{Fcfs, Mlfq, MlfqLevel, Policy, Stcf};

use crate::engine::Engine;
use crate::report::RunReport;

/// Failure surface of a full simulation run, from loading the workload
/// through exporting and validating its trace.
#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Trace serialization error: {0}")]
    Trace(#[from] serde_yaml::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Instantiates the policy named by the workload.
pub fn build_policy(config: &PolicyConfig) -> Box<dyn Policy> {
    match config {
        PolicyConfig::Fcfs => Box::new(Fcfs),
        PolicyConfig::Stcf => Box::new(Stcf),
        PolicyConfig::Mlfq {
            levels,
            boost_interval,
        } => {
            let levels = levels
                .iter()
                .map(|l| MlfqLevel {
                    quantum: l.quantum,
                    allotment: l.allotment,
                })
                .collect();
            Box::new(Mlfq::new(levels, *boost_interval))
        }
    }
}

/// Runs a validated workload to completion (or to its safety bound) and
/// returns the report. Same workload in, same trace and metrics out.
pub fn run_workload(config: &WorkloadConfig) -> RunReport {
    let policy = build_policy(&config.policy);
    Engine::new(&config.processes, policy, config.safety_bound).run()
}
