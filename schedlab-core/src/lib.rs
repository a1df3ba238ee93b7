//! # schedlab-core
//!
//! Foundation layer for the scheduling simulator: the simulated clock, the
//! process control table, and the ready-queue set.
//!
//! Determinism is the primary design constraint. Every container in this
//! crate iterates in a fixed, reproducible order so that two runs over the
//! same workload observe byte-identical state at every tick.

pub mod clock;
pub mod process;
pub mod queue;
pub mod table;

pub mod prelude {
    pub use crate::clock::SimClock;
    pub use crate::process::{IoEvent, ProcState, Process, ProcessRequest};
    pub use crate::queue::ReadyQueueSet;
    pub use crate::table::ProcessTable;
}

pub use clock::SimClock;
pub use process::{IoEvent, Pid, ProcState, Process, ProcessRequest};
pub use queue::ReadyQueueSet;
pub use table::ProcessTable;
