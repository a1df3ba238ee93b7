//! # schedlab-engine
//!
//! The tick-loop scheduling engine. One `Engine` instance owns the clock,
//! the process control table, the ready queues, and the trace recorder for
//! exactly one run; the caller reads the resulting `RunReport` after the
//! run completes or trips the safety bound.
//!
//! The engine is single-threaded and cooperative: the entire per-tick body
//! runs to completion before the clock advances, and the per-tick phase
//! order (arrivals, timeout check, dispatch, execute, I/O completion,
//! boost) is part of the observable contract — swapping any two phases
//! changes which process runs in a tie.

pub mod engine;
pub mod report;
pub mod runner;

pub use engine::{Engine, DEFAULT_SAFETY_BOUND};
pub use report::{RunOutcome, RunReport};
pub use runner::{build_policy, run_workload, SimulationError};
