//! # schedlab-policy
//!
//! Scheduling policies as pure decision values injected into the engine.
//!
//! A policy holds no simulation state of its own: everything it decides on
//! lives in the process control table and the ready queues. The engine
//! consults it for queue topology, initial priority, next-process
//! selection, and the preemption predicates.

use schedlab_core::process::Pid;
use schedlab_core::queue::ReadyQueueSet;
use schedlab_core::table::ProcessTable;

mod fcfs;
mod mlfq;
mod stcf;

pub use fcfs::Fcfs;
pub use mlfq::{Mlfq, MlfqLevel};
pub use stcf::Stcf;

pub trait Policy {
    fn name(&self) -> &'static str;

    /// Number of ready queues the engine must allocate. Level 0 is the
    /// highest priority.
    fn queue_count(&self) -> usize;

    /// Level assigned to a freshly arrived process.
    fn initial_level(&self) -> usize {
        0
    }

    /// Quantum for a process dispatched from `level`; `None` disables the
    /// timeout check at that level.
    fn quantum(&self, _level: usize) -> Option<u64> {
        None
    }

    /// Allotment granted when a process is assigned `level`; `None` means
    /// the process can never be demoted out of it.
    fn allotment(&self, _level: usize) -> Option<u64> {
        None
    }

    /// Tick period of the starvation-prevention boost, if the policy has
    /// one.
    fn boost_interval(&self) -> Option<u64> {
        None
    }

    /// Picks the next process to dispatch, or `None` to leave the CPU
    /// idle. Must not mutate anything; the engine performs the dequeue.
    fn select_next(&self, queues: &ReadyQueueSet, table: &ProcessTable) -> Option<Pid>;

    /// Whether a new arrival deschedules the process currently running at
    /// `running_level`.
    fn preempts_on_arrival(&self, _running_level: usize) -> bool {
        false
    }

    /// Whether quantum expiry deschedules the running process.
    fn preempts_on_timeout(&self) -> bool {
        false
    }
}
