//! Snapshot types making up one replay step.

use std::collections::BTreeMap;

use serde::Serialize;

use schedlab_core::process::{Pid, ProcState, Process};

/// One marker on the CPU-occupancy (Gantt) timeline. `pid = None` marks an
/// idle tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimelinePoint {
    pub pid: Option<Pid>,
    pub time: u64,
}

impl TimelinePoint {
    pub fn running(pid: Pid, time: u64) -> Self {
        Self {
            pid: Some(pid),
            time,
        }
    }

    pub fn idle(time: u64) -> Self {
        Self { pid: None, time }
    }
}

/// Flat per-process metrics as known at some point in the run. Fields stay
/// `None` until the corresponding event happened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricsRow {
    pub pid: Pid,
    pub arrival: u64,
    pub scheduled: Option<u64>,
    pub waiting: Option<u64>,
    pub turnaround: Option<u64>,
    pub end: Option<u64>,
}

impl MetricsRow {
    pub fn from_process(process: &Process) -> Self {
        Self {
            pid: process.pid,
            arrival: process.arrival,
            scheduled: process.scheduled,
            waiting: process.waiting_time(),
            turnaround: process.turnaround_time(),
            end: process.end,
        }
    }
}

/// One unit of the replay log, closed on every state transition.
#[derive(Debug, Clone, Serialize)]
pub struct TraceStep {
    pub index: usize,
    /// Human-readable account of what happened during this step, in order.
    pub explanations: Vec<String>,
    /// Ready queues at close, head first, indexed by level.
    pub queues: Vec<Vec<Pid>>,
    /// Pids in `Wait` at close, in pid order.
    pub waiting: Vec<Pid>,
    /// Pids that arrived during this step.
    pub arrived: Vec<Pid>,
    /// State of every process at close. `BTreeMap` keeps serialization
    /// order stable.
    pub states: BTreeMap<Pid, ProcState>,
    /// Metrics as known so far, in pid order.
    pub metrics: Vec<MetricsRow>,
    /// Occupancy timeline accumulated up to and including this step.
    pub timeline: Vec<TimelinePoint>,
}
