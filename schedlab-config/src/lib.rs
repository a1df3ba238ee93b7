//! # schedlab-config
//!
//! Workload configuration: the submitted process list, the scheduling
//! policy and its parameters, and the safety bound.
//!
//! Loading is hierarchical (YAML file, then `SCHEDLAB_` environment
//! overrides) and everything is validated before the engine ever sees it.
//! Negative bursts or arrivals are unrepresentable by construction: all
//! durations are unsigned, so they fail at parse time.

#![warn(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use schedlab_core::process::ProcessRequest;

mod error;
pub mod validation;

pub use error::ConfigError;

const DEFAULT_SAFETY_BOUND: u64 = 10_000;

fn default_safety_bound() -> u64 {
    DEFAULT_SAFETY_BOUND
}

/// One MLFQ queue's parameters. `allotment: ~` (absent) pins processes at
/// the level until a boost.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MlfqLevelConfig {
    pub quantum: u64,
    #[serde(default)]
    pub allotment: Option<u64>,
}

/// Policy selection plus policy-specific parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PolicyConfig {
    Fcfs,
    Stcf,
    Mlfq {
        levels: Vec<MlfqLevelConfig>,
        boost_interval: u64,
    },
}

/// Top-level workload description consumed by the engine.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct WorkloadConfig {
    /// Processes in submission order; ties in arrival time keep this
    /// order when pids are assigned.
    #[validate(
        length(min = 1, message = "at least one process is required"),
        custom(function = crate::validation::validate_processes)
    )]
    pub processes: Vec<ProcessRequest>,

    #[validate(custom(function = crate::validation::validate_policy))]
    pub policy: PolicyConfig,

    /// Maximum simulated tick before a run is aborted as non-terminating.
    #[serde(default = "default_safety_bound")]
    #[validate(range(min = 1, message = "safety bound must be at least 1"))]
    pub safety_bound: u64,
}

impl WorkloadConfig {
    /// Loads and validates a workload from a YAML file, with `SCHEDLAB_`
    /// environment variables taking precedence.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound(PathBuf::from(path)));
        }

        Figment::new()
            .merge(Yaml::file(path))
            .merge(Env::prefixed("SCHEDLAB_").split("__"))
            .extract()
            .map_err(ConfigError::from)
            .and_then(|config: Self| {
                config.validate()?;
                Ok(config)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use schedlab_core::process::IoEvent;

    fn valid_workload() -> WorkloadConfig {
        WorkloadConfig {
            processes: vec![ProcessRequest {
                arrival: 0,
                burst: 4,
                io_events: vec![IoEvent {
                    offset: 2,
                    duration: 3,
                }],
            }],
            policy: PolicyConfig::Fcfs,
            safety_bound: 100,
        }
    }

    #[test]
    fn test_valid_workload_passes() {
        assert!(valid_workload().validate().is_ok());
    }

    #[test]
    fn test_empty_process_list_rejected() {
        let mut workload = valid_workload();
        workload.processes.clear();
        assert!(workload.validate().is_err());
    }

    #[test]
    fn test_zero_burst_rejected() {
        let mut workload = valid_workload();
        workload.processes[0].burst = 0;
        assert!(workload.validate().is_err());
    }

    #[test]
    fn test_io_offset_beyond_burst_rejected() {
        let mut workload = valid_workload();
        workload.processes[0].io_events[0].offset = 4;
        assert!(workload.validate().is_err());
    }

    #[test]
    fn test_unordered_io_offsets_rejected() {
        let mut workload = valid_workload();
        workload.processes[0].io_events = vec![
            IoEvent {
                offset: 3,
                duration: 1,
            },
            IoEvent {
                offset: 2,
                duration: 1,
            },
        ];
        assert!(workload.validate().is_err());
    }

    #[test]
    fn test_empty_mlfq_rejected() {
        let mut workload = valid_workload();
        workload.policy = PolicyConfig::Mlfq {
            levels: vec![],
            boost_interval: 10,
        };
        assert!(workload.validate().is_err());
    }

    #[test]
    fn test_zero_safety_bound_rejected() {
        let mut workload = valid_workload();
        workload.safety_bound = 0;
        assert!(workload.validate().is_err());
    }

    #[test]
    fn test_parses_yaml_workload() {
        let yaml = r#"
processes:
  - arrival: 0
    burst: 3
  - arrival: 2
    burst: 1
    io_events:
      - { offset: 1, duration: 2 }
policy:
  kind: mlfq
  levels:
    - { quantum: 2, allotment: 4 }
    - { quantum: 4 }
  boost_interval: 20
"#;
        let config: WorkloadConfig = serde_yaml::from_str(yaml).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.safety_bound, DEFAULT_SAFETY_BOUND);
        assert_eq!(config.processes.len(), 2);
        match config.policy {
            PolicyConfig::Mlfq {
                ref levels,
                boost_interval,
            } => {
                assert_eq!(levels.len(), 2);
                assert_eq!(levels[0].allotment, Some(4));
                assert_eq!(levels[1].allotment, None);
                assert_eq!(boost_interval, 20);
            }
            _ => panic!("expected mlfq"),
        }
    }
}
