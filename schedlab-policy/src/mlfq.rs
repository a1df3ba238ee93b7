//! Multi-level feedback queue.
//!
//! K queues, each with a quantum and an allotment. Selection is strict
//! priority: head of the first non-empty queue, scanning from level 0.
//! Quantum expiry re-enqueues at the same level; allotment exhaustion
//! demotes one level, clamped at the bottom. Every `boost_interval` ticks
//! the engine promotes everything back to level 0 so demoted processes
//! cannot starve.

use schedlab_core::process::Pid;
use schedlab_core::queue::ReadyQueueSet;
use schedlab_core::table::ProcessTable;

use crate::Policy;

/// Per-level configuration.
#[derive(Debug, Clone, Copy)]
pub struct MlfqLevel {
    pub quantum: u64,
    /// `None` pins processes at this level until a boost.
    pub allotment: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct Mlfq {
    levels: Vec<MlfqLevel>,
    boost_interval: u64,
}

impl Mlfq {
    pub fn new(levels: Vec<MlfqLevel>, boost_interval: u64) -> Self {
        Self {
            levels,
            boost_interval,
        }
    }
}

impl Policy for Mlfq {
    fn name(&self) -> &'static str {
        "mlfq"
    }

    fn queue_count(&self) -> usize {
        self.levels.len()
    }

    fn quantum(&self, level: usize) -> Option<u64> {
        self.levels.get(level).map(|l| l.quantum)
    }

    fn allotment(&self, level: usize) -> Option<u64> {
        self.levels.get(level).and_then(|l| l.allotment)
    }

    fn boost_interval(&self) -> Option<u64> {
        Some(self.boost_interval)
    }

    fn select_next(&self, queues: &ReadyQueueSet, _table: &ProcessTable) -> Option<Pid> {
        (0..queues.levels()).find_map(|level| queues.front(level))
    }

    fn preempts_on_arrival(&self, running_level: usize) -> bool {
        // Anything below the top queue loses the CPU to a fresh arrival.
        running_level > 0
    }

    fn preempts_on_timeout(&self) -> bool {
        true
    }
}
