//! The tick-loop driver.
//!
//! Per-tick phase order is fixed: arrivals, timeout/preemption check,
//! dispatch, execute, I/O completion, then the MLFQ boost check. Each state
//! transition goes through `transition`, which pairs the control-table
//! mutation with a trace-step close so every observable event lands in the
//! replay log.

use tracing::{debug, warn};

use schedlab_core::clock::SimClock;
use schedlab_core::process::{Pid, ProcState, ProcessRequest};
use schedlab_core::queue::ReadyQueueSet;
use schedlab_core::table::ProcessTable;
use schedlab_policy::Policy;
use schedlab_trace::{MetricsRow, TraceRecorder};

use crate::report::{RunOutcome, RunReport};

/// Default tick cap guarding against non-terminating configurations.
pub const DEFAULT_SAFETY_BOUND: u64 = 10_000;

pub struct Engine {
    clock: SimClock,
    table: ProcessTable,
    queues: ReadyQueueSet,
    trace: TraceRecorder,
    policy: Box<dyn Policy>,
    safety_bound: u64,
}

impl Engine {
    /// Builds an engine for one run. `requests` must already be validated;
    /// see `schedlab-config`.
    pub fn new(requests: &[ProcessRequest], policy: Box<dyn Policy>, safety_bound: u64) -> Self {
        // A policy reporting zero queues can never dispatch; give it one
        // level so arrivals still have somewhere to sit until the safety
        // bound trips.
        let queues = ReadyQueueSet::new(policy.queue_count().max(1));
        Self {
            clock: SimClock::new(),
            table: ProcessTable::build(requests),
            queues,
            trace: TraceRecorder::new(),
            policy,
            safety_bound,
        }
    }

    /// Simulates to completion or to the safety bound and returns the
    /// finalized trace and metrics. Consumes the engine: one instance, one
    /// run.
    pub fn run(mut self) -> RunReport {
        self.trace.reset();
        self.clock.reset();
        debug!(
            policy = self.policy.name(),
            processes = self.table.len(),
            "simulation start"
        );

        let mut outcome = RunOutcome::Completed;
        while !self.table.is_all_done() {
            if self.clock.current() > self.safety_bound {
                warn!(tick = self.clock.current(), "safety bound exceeded, aborting run");
                outcome = RunOutcome::Aborted {
                    at_tick: self.clock.current(),
                };
                break;
            }
            self.tick();
            if !self.table.is_all_done() {
                self.maybe_boost();
            }
            self.clock.advance();
        }

        debug!(?outcome, steps = self.trace.step_count(), "simulation end");
        let metrics: Vec<MetricsRow> = self.table.iter().map(MetricsRow::from_process).collect();
        RunReport {
            outcome,
            steps: self.trace.finalize(),
            metrics,
        }
    }

    fn tick(&mut self) {
        let tick = self.clock.current();
        self.trace.open_step();
        self.handle_arrivals(tick);
        self.check_timeout();
        self.dispatch(tick);
        let worked = self.execute(tick);
        if !worked && !self.table.is_all_done() {
            self.trace.mark_idle_point(tick);
        }
        self.complete_io();
    }

    /// Applies a validated state transition and closes the current trace
    /// step. Every state change in the simulation goes through here.
    fn transition(&mut self, pid: Pid, next: ProcState) {
        self.table.set_state(pid, next);
        self.trace.close_step(&self.table, &self.queues);
    }

    /// Phase 1: admit every process arriving at `tick`, then give the
    /// policy a chance to deschedule the running process.
    fn handle_arrivals(&mut self, tick: u64) {
        while let Some(pid) = self.table.next_arrival(tick) {
            let level = self.policy.initial_level();
            self.table.set_level(pid, level);
            self.table.set_allotment(pid, self.policy.allotment(level));
            self.queues.enqueue(level, pid);
            self.trace.mark_arrival(pid);
            self.trace
                .log_explanation(format!("P{pid} arrives and joins queue {level}"));
            self.transition(pid, ProcState::Ready);

            if let Some(running) = self.table.running_pid() {
                let running_level = self.table.get(running).level;
                if self.policy.preempts_on_arrival(running_level) {
                    self.trace.log_explanation(format!(
                        "P{running} is descheduled by the arrival of P{pid}"
                    ));
                    self.queues.enqueue(running_level, running);
                    self.transition(running, ProcState::Ready);
                }
            }
        }
    }

    /// Phase 2: evaluate quantum and allotment counters for the running
    /// process. Skipped when this tick will finish the burst or block on
    /// I/O. Allotment exhaustion demotes (clamped at the bottom level);
    /// quantum exhaustion alone re-enqueues at the same level.
    fn check_timeout(&mut self) {
        if !self.policy.preempts_on_timeout() {
            return;
        }
        let Some(running) = self.table.running_pid() else {
            return;
        };
        let process = self.table.get(running);
        if process.remaining() <= 1 || self.table.has_io_now(running) {
            return;
        }
        let level = process.level;

        if process.allotment_remaining == Some(0) {
            let new_level = (level + 1).min(self.queues.levels() - 1);
            self.table.set_level(running, new_level);
            self.table
                .set_allotment(running, self.policy.allotment(new_level));
            self.trace.log_explanation(format!(
                "P{running} used up its allotment and is demoted to queue {new_level}"
            ));
            self.queues.enqueue(new_level, running);
            self.transition(running, ProcState::Ready);
        } else if process.quantum_remaining == Some(0) {
            self.trace
                .log_explanation(format!("P{running}'s quantum expired; it re-enters queue {level}"));
            self.queues.enqueue(level, running);
            self.transition(running, ProcState::Ready);
        }
    }

    /// Phase 3: if the CPU is idle, ask the policy for the next process.
    fn dispatch(&mut self, tick: u64) {
        if self.table.is_any_running() {
            return;
        }
        let Some(pid) = self.policy.select_next(&self.queues, &self.table) else {
            return;
        };
        let level = self
            .queues
            .take(pid)
            .unwrap_or_else(|| panic!("policy selected pid {pid} which is not in any ready queue"));
        debug_assert_eq!(level, self.table.get(pid).level);
        self.table.mark_scheduled(pid, tick);
        self.table.set_quantum(pid, self.policy.quantum(level));
        self.trace
            .log_explanation(format!("P{pid} is dispatched from queue {level}"));
        self.transition(pid, ProcState::Running);
    }

    /// Phase 4: run the CPU for one tick. Returns whether a unit of work
    /// was consumed.
    fn execute(&mut self, tick: u64) -> bool {
        loop {
            let Some(running) = self.table.running_pid() else {
                return false;
            };
            let process = self.table.get(running);

            if process.remaining() == 0 {
                // The burst was already complete when this process got the
                // CPU; mark it done and re-enter dispatch within the same
                // tick.
                self.table.mark_ended(running, tick);
                self.trace.mark_point(running, tick);
                self.trace.log_explanation(format!("P{running} completes"));
                self.transition(running, ProcState::Done);
                self.dispatch(tick);
                continue;
            }

            if self.table.has_io_now(running) {
                self.table.begin_io(running);
                self.trace
                    .log_explanation(format!("P{running} blocks for I/O"));
                self.transition(running, ProcState::Wait);
                return false;
            }

            self.table.tick_cpu(running);
            self.trace.buffer_running_segment(running, tick);
            self.table.consume_counters(running);
            if self.table.get(running).remaining() == 0 {
                // The last unit completes at the end of this tick, hence
                // the +1 on the end time and the timeline marker.
                self.table.mark_ended(running, tick + 1);
                self.trace.mark_point(running, tick + 1);
                self.trace
                    .log_explanation(format!("P{running} finishes its burst"));
                self.transition(running, ProcState::Done);
            }
            return true;
        }
    }

    /// Phase 5: count down I/O and wake every process whose countdown
    /// reached zero.
    fn complete_io(&mut self) {
        for pid in self.table.tick_io_all() {
            let level = self.table.get(pid).level;
            self.queues.enqueue(level, pid);
            self.trace
                .log_explanation(format!("P{pid} finishes I/O and re-enters queue {level}"));
            self.transition(pid, ProcState::Ready);
        }
    }

    /// Boost check, run after the main tick body. Every queued process and
    /// the running process return to level 0 with a fresh allotment.
    fn maybe_boost(&mut self) {
        let Some(interval) = self.policy.boost_interval() else {
            return;
        };
        let tick = self.clock.current();
        if tick == 0 || tick % interval != 0 {
            return;
        }

        let queued: Vec<Pid> = self.queues.snapshot().into_iter().flatten().collect();
        let promoted = self.queues.promote_all_to_top();
        for &pid in &queued {
            self.table.set_level(pid, 0);
            self.table.set_allotment(pid, self.policy.allotment(0));
        }

        let mut boosted = !promoted.is_empty();
        if let Some(running) = self.table.running_pid() {
            if self.table.get(running).level != 0 {
                boosted = true;
            }
            self.table.set_level(running, 0);
            self.table.set_allotment(running, self.policy.allotment(0));
        }

        if boosted {
            self.trace
                .log_explanation(format!("priority boost at tick {tick}: everyone returns to queue 0"));
        }
    }
}
