//! Shortest-time-to-completion-first (preemptive SRTF).
//!
//! The single queue acts as a membership set rather than an ordering:
//! selection scans it for the minimum remaining burst, with ties going to
//! the earliest-enqueued candidate. Every arrival deschedules the running
//! process unconditionally; selection immediately re-evaluates, so the net
//! schedule matches true SRTF while the trace keeps the deschedule event.

use schedlab_core::process::Pid;
use schedlab_core::queue::ReadyQueueSet;
use schedlab_core::table::ProcessTable;

use crate::Policy;

#[derive(Debug, Default, Clone, Copy)]
pub struct Stcf;

impl Policy for Stcf {
    fn name(&self) -> &'static str {
        "stcf"
    }

    fn queue_count(&self) -> usize {
        1
    }

    fn select_next(&self, queues: &ReadyQueueSet, table: &ProcessTable) -> Option<Pid> {
        let mut best: Option<(Pid, u64)> = None;
        for pid in queues.level_iter(0) {
            let remaining = table.get(pid).remaining();
            // Strict comparison keeps the earliest queue position on ties.
            if best.map_or(true, |(_, r)| remaining < r) {
                best = Some((pid, remaining));
            }
        }
        best.map(|(pid, _)| pid)
    }

    fn preempts_on_arrival(&self, _running_level: usize) -> bool {
        true
    }
}
