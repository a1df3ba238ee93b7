//! Per-process records: the submitted request and the live control block.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// Stable process identifier, assigned 1..N in arrival order.
pub type Pid = u32;

/// Run state of a process. `Done` is terminal and reachable only from
/// `Running`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ProcState {
    New,
    Ready,
    Running,
    Wait,
    Done,
}

impl ProcState {
    /// Whether `self -> next` is one of the legal edges:
    /// `NEW->READY`, `READY->RUNNING`, `RUNNING->{READY,WAIT,DONE}`,
    /// `WAIT->READY`.
    pub fn can_transition_to(self, next: ProcState) -> bool {
        use ProcState::*;
        matches!(
            (self, next),
            (New, Ready) | (Ready, Running) | (Running, Ready) | (Running, Wait) | (Running, Done) | (Wait, Ready)
        )
    }
}

/// One simulated I/O request, consumed when the process has executed
/// `offset` units of its burst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IoEvent {
    /// CPU units the process must have consumed before this I/O starts.
    pub offset: u64,
    /// Ticks the process stays in `Wait` once the I/O begins.
    pub duration: u64,
}

/// A process as submitted by the caller, before pid assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessRequest {
    pub arrival: u64,
    pub burst: u64,
    #[serde(default)]
    pub io_events: Vec<IoEvent>,
}

/// Live control block for one process. Identity is the pid; everything
/// under "run state" mutates as the simulation progresses, while the
/// derived metrics are each set at most once.
#[derive(Debug, Clone)]
pub struct Process {
    pub pid: Pid,
    pub arrival: u64,
    pub burst: u64,
    /// Pending I/O events, consumed strictly in order as `cpu_consumed`
    /// reaches each offset.
    pub io_events: VecDeque<IoEvent>,

    // Run state.
    pub state: ProcState,
    pub cpu_consumed: u64,
    pub io_remaining: u64,
    /// Current priority level (index into the ready-queue set).
    pub level: usize,
    /// Ticks left in the current quantum; `None` when the policy has no
    /// quantum at this level.
    pub quantum_remaining: Option<u64>,
    /// Ticks left in the current allotment; `None` means unlimited.
    pub allotment_remaining: Option<u64>,

    // Derived metrics, set at most once.
    pub scheduled: Option<u64>,
    pub end: Option<u64>,
}

impl Process {
    pub fn new(pid: Pid, request: &ProcessRequest) -> Self {
        Self {
            pid,
            arrival: request.arrival,
            burst: request.burst,
            io_events: request.io_events.iter().copied().collect(),
            state: ProcState::New,
            cpu_consumed: 0,
            io_remaining: 0,
            level: 0,
            quantum_remaining: None,
            allotment_remaining: None,
            scheduled: None,
            end: None,
        }
    }

    /// CPU units still owed.
    #[inline]
    pub fn remaining(&self) -> u64 {
        self.burst - self.cpu_consumed
    }

    /// `scheduled - arrival`, available once the process was first
    /// dispatched.
    pub fn waiting_time(&self) -> Option<u64> {
        self.scheduled.map(|s| s - self.arrival)
    }

    /// `end - arrival`, available once the process completed.
    pub fn turnaround_time(&self) -> Option<u64> {
        self.end.map(|e| e - self.arrival)
    }
}
