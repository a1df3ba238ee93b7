//! Cross-field validation helpers for workload files.

use validator::ValidationError;

use schedlab_core::process::ProcessRequest;

use crate::PolicyConfig;

/// Rejects processes the engine cannot make progress on: zero-length
/// bursts, I/O offsets at or beyond the burst length (such an event could
/// never fire before completion), out-of-order offsets, and zero-length
/// I/O waits.
pub fn validate_processes(processes: &[ProcessRequest]) -> Result<(), ValidationError> {
    for (index, process) in processes.iter().enumerate() {
        if process.burst == 0 {
            return Err(field_error(
                "burst",
                format!("process {index}: burst must be at least 1"),
            ));
        }
        let mut last_offset = 0;
        for io in &process.io_events {
            if io.offset == 0 || io.offset >= process.burst {
                return Err(field_error(
                    "io_events",
                    format!(
                        "process {index}: I/O offset {} outside burst of length {}",
                        io.offset, process.burst
                    ),
                ));
            }
            if io.offset <= last_offset {
                return Err(field_error(
                    "io_events",
                    format!("process {index}: I/O offsets must be strictly increasing"),
                ));
            }
            if io.duration == 0 {
                return Err(field_error(
                    "io_events",
                    format!("process {index}: I/O duration must be at least 1"),
                ));
            }
            last_offset = io.offset;
        }
    }
    Ok(())
}

/// Rejects degenerate policy parameters: an MLFQ with no queues, a zero
/// quantum or allotment, or a zero boost interval.
pub fn validate_policy(policy: &PolicyConfig) -> Result<(), ValidationError> {
    let PolicyConfig::Mlfq {
        levels,
        boost_interval,
    } = policy
    else {
        return Ok(());
    };
    if levels.is_empty() {
        return Err(field_error("policy", "mlfq requires at least one queue".into()));
    }
    if *boost_interval == 0 {
        return Err(field_error("policy", "boost interval must be at least 1".into()));
    }
    for (level, params) in levels.iter().enumerate() {
        if params.quantum == 0 {
            return Err(field_error(
                "policy",
                format!("queue {level}: quantum must be at least 1"),
            ));
        }
        if params.allotment == Some(0) {
            return Err(field_error(
                "policy",
                format!("queue {level}: allotment must be at least 1"),
            ));
        }
    }
    Ok(())
}

fn field_error(code: &'static str, message: String) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(message.into());
    error
}
