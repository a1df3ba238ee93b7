//! Run results: the finalized trace, the flat metrics table, and the
//! deterministic trace hash used for grading.

use serde::Serialize;

use schedlab_trace::{MetricsRow, TraceStep};

/// How a run ended. Tripping the safety bound is a distinguishable result,
/// not an error: the caller gets the partial trace and can warn the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "lowercase")]
pub enum RunOutcome {
    /// Every process reached `DONE`.
    Completed,
    /// The safety bound was exceeded; the trace is partial and processes
    /// remain in their last simulated state.
    Aborted { at_tick: u64 },
}

/// Everything a consumer (CLI, grader, UI renderer) needs from one run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub outcome: RunOutcome,
    /// Step-indexed replay log.
    pub steps: Vec<TraceStep>,
    /// Final per-process metrics, in pid order.
    pub metrics: Vec<MetricsRow>,
}

impl RunReport {
    pub fn is_complete(&self) -> bool {
        self.outcome == RunOutcome::Completed
    }

    /// Mean waiting time over processes that were dispatched at least
    /// once. `None` when no process was.
    pub fn average_waiting(&self) -> Option<f64> {
        mean(self.metrics.iter().filter_map(|row| row.waiting))
    }

    /// Mean turnaround time over completed processes.
    pub fn average_turnaround(&self) -> Option<f64> {
        mean(self.metrics.iter().filter_map(|row| row.turnaround))
    }

    /// BLAKE3 hash of the serialized step log, in hex. Two runs over the
    /// same workload and policy must produce the same hash; graders compare
    /// it against a recorded expectation.
    pub fn trace_hash(&self) -> Result<String, serde_yaml::Error> {
        let serialized = serde_yaml::to_string(&self.steps)?;
        Ok(hex::encode(blake3::hash(serialized.as_bytes()).as_bytes()))
    }
}

fn mean(values: impl Iterator<Item = u64>) -> Option<f64> {
    let (sum, count) = values.fold((0u64, 0u64), |(s, c), v| (s + v, c + 1));
    (count > 0).then(|| sum as f64 / count as f64)
}
