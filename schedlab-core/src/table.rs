//! Process control table.
//!
//! Owns one control block per submitted process. Built once per run in
//! arrival-time order (ties broken by submission order) with pids assigned
//! 1..N in that order, so pid order doubles as arrival order everywhere a
//! tie-break is needed.
//!
//! Invalid pids and illegal state transitions panic: they mean a policy or
//! engine bug, not a user-input problem, and are never retried.

use tracing::trace;

use crate::process::{Pid, ProcState, Process, ProcessRequest};

#[derive(Debug, Clone)]
pub struct ProcessTable {
    procs: Vec<Process>,
}

impl ProcessTable {
    /// Builds the table from the submitted list. Sorting is stable, so
    /// processes with equal arrival times keep their submission order.
    pub fn build(requests: &[ProcessRequest]) -> Self {
        let mut ordered: Vec<&ProcessRequest> = requests.iter().collect();
        ordered.sort_by_key(|r| r.arrival);
        let procs = ordered
            .into_iter()
            .enumerate()
            .map(|(i, request)| Process::new(i as Pid + 1, request))
            .collect();
        Self { procs }
    }

    pub fn len(&self) -> usize {
        self.procs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.procs.is_empty()
    }

    /// Control blocks in pid order.
    pub fn iter(&self) -> impl Iterator<Item = &Process> {
        self.procs.iter()
    }

    /// # Panics
    /// On an unknown pid.
    pub fn get(&self, pid: Pid) -> &Process {
        (pid as usize)
            .checked_sub(1)
            .and_then(|i| self.procs.get(i))
            .unwrap_or_else(|| panic!("unknown pid {pid}"))
    }

    fn get_mut(&mut self, pid: Pid) -> &mut Process {
        (pid as usize)
            .checked_sub(1)
            .and_then(|i| self.procs.get_mut(i))
            .unwrap_or_else(|| panic!("unknown pid {pid}"))
    }

    pub fn is_all_done(&self) -> bool {
        self.procs.iter().all(|p| p.state == ProcState::Done)
    }

    pub fn is_any_running(&self) -> bool {
        self.running_pid().is_some()
    }

    /// The pid currently holding the CPU, if any. At most one process may
    /// be `Running` at a time.
    pub fn running_pid(&self) -> Option<Pid> {
        self.procs
            .iter()
            .find(|p| p.state == ProcState::Running)
            .map(|p| p.pid)
    }

    /// The lowest-pid `New` process arriving exactly at `tick`.
    pub fn next_arrival(&self, tick: u64) -> Option<Pid> {
        self.procs
            .iter()
            .find(|p| p.state == ProcState::New && p.arrival == tick)
            .map(|p| p.pid)
    }

    /// Applies a state transition after validating it against the legal
    /// edges. Every caller must follow this with a trace-step close; the
    /// engine's `transition` helper enforces that pairing.
    ///
    /// # Panics
    /// On an unknown pid or an illegal edge.
    pub fn set_state(&mut self, pid: Pid, next: ProcState) {
        let process = self.get_mut(pid);
        assert!(
            process.state.can_transition_to(next),
            "illegal state transition for pid {pid}: {:?} -> {next:?}",
            process.state
        );
        trace!(pid, from = ?process.state, to = ?next, "state transition");
        process.state = next;
    }

    /// Consumes one unit of CPU for `pid`. Returns whether a unit of work
    /// was actually done (false once the burst is exhausted).
    pub fn tick_cpu(&mut self, pid: Pid) -> bool {
        let process = self.get_mut(pid);
        if process.remaining() == 0 {
            return false;
        }
        process.cpu_consumed += 1;
        true
    }

    /// True iff the next pending I/O event fires at the current progress
    /// point.
    pub fn has_io_now(&self, pid: Pid) -> bool {
        let process = self.get(pid);
        process
            .io_events
            .front()
            .is_some_and(|io| io.offset == process.cpu_consumed)
    }

    /// Consumes the pending I/O event whose offset matches the current
    /// progress point and starts its countdown.
    ///
    /// # Panics
    /// If no I/O event is due for `pid`; callers must check `has_io_now`.
    pub fn begin_io(&mut self, pid: Pid) {
        let process = self.get_mut(pid);
        let io = process
            .io_events
            .front()
            .filter(|io| io.offset == process.cpu_consumed)
            .copied()
            .unwrap_or_else(|| panic!("begin_io called for pid {pid} with no I/O due"));
        process.io_events.pop_front();
        process.io_remaining = io.duration;
    }

    /// Counts down I/O for every waiting process and returns, in pid
    /// order, those whose countdown just reached zero.
    pub fn tick_io_all(&mut self) -> Vec<Pid> {
        let mut woken = Vec::new();
        for process in &mut self.procs {
            if process.state == ProcState::Wait && process.io_remaining > 0 {
                process.io_remaining -= 1;
                if process.io_remaining == 0 {
                    woken.push(process.pid);
                }
            }
        }
        woken
    }

    /// Records the first-dispatch tick. A no-op on re-dispatch.
    pub fn mark_scheduled(&mut self, pid: Pid, tick: u64) {
        let process = self.get_mut(pid);
        if process.scheduled.is_none() {
            process.scheduled = Some(tick);
        }
    }

    /// Records the completion tick. A no-op if already set.
    pub fn mark_ended(&mut self, pid: Pid, tick: u64) {
        let process = self.get_mut(pid);
        if process.end.is_none() {
            process.end = Some(tick);
        }
    }

    pub fn set_level(&mut self, pid: Pid, level: usize) {
        self.get_mut(pid).level = level;
    }

    pub fn set_quantum(&mut self, pid: Pid, quantum: Option<u64>) {
        self.get_mut(pid).quantum_remaining = quantum;
    }

    pub fn set_allotment(&mut self, pid: Pid, allotment: Option<u64>) {
        self.get_mut(pid).allotment_remaining = allotment;
    }

    /// Decrements the quantum and allotment countdowns after a unit of
    /// work. Saturates at zero; exhaustion is detected by the engine's
    /// timeout check on the following tick.
    pub fn consume_counters(&mut self, pid: Pid) {
        let process = self.get_mut(pid);
        if let Some(q) = process.quantum_remaining.as_mut() {
            *q = q.saturating_sub(1);
        }
        if let Some(a) = process.allotment_remaining.as_mut() {
            *a = a.saturating_sub(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::IoEvent;

    fn requests() -> Vec<ProcessRequest> {
        vec![
            ProcessRequest {
                arrival: 2,
                burst: 3,
                io_events: vec![],
            },
            ProcessRequest {
                arrival: 0,
                burst: 4,
                io_events: vec![IoEvent {
                    offset: 2,
                    duration: 3,
                }],
            },
            ProcessRequest {
                arrival: 2,
                burst: 1,
                io_events: vec![],
            },
        ]
    }

    #[test]
    fn test_pids_follow_arrival_then_submission_order() {
        let table = ProcessTable::build(&requests());
        let arrivals: Vec<(Pid, u64)> = table.iter().map(|p| (p.pid, p.arrival)).collect();
        // Earliest arrival gets pid 1; the two tick-2 arrivals keep their
        // submission order.
        assert_eq!(arrivals, vec![(1, 0), (2, 2), (3, 2)]);
        assert_eq!(table.get(2).burst, 3);
        assert_eq!(table.get(3).burst, 1);
    }

    #[test]
    fn test_next_arrival_prefers_lowest_pid() {
        let table = ProcessTable::build(&requests());
        assert_eq!(table.next_arrival(0), Some(1));
        assert_eq!(table.next_arrival(1), None);
        assert_eq!(table.next_arrival(2), Some(2));
    }

    #[test]
    fn test_io_lifecycle() {
        let mut table = ProcessTable::build(&requests());
        assert!(!table.has_io_now(1));
        assert!(table.tick_cpu(1));
        assert!(table.tick_cpu(1));
        assert!(table.has_io_now(1));
        table.begin_io(1);
        table.set_state(1, ProcState::Ready); // build state up to Wait
        table.set_state(1, ProcState::Running);
        table.set_state(1, ProcState::Wait);
        assert_eq!(table.tick_io_all(), Vec::<Pid>::new());
        assert_eq!(table.tick_io_all(), Vec::<Pid>::new());
        assert_eq!(table.tick_io_all(), vec![1]);
        assert!(!table.has_io_now(1));
    }

    #[test]
    fn test_tick_cpu_stops_at_burst() {
        let mut table = ProcessTable::build(&requests());
        assert!(table.tick_cpu(3));
        assert!(!table.tick_cpu(3));
        assert_eq!(table.get(3).remaining(), 0);
    }

    #[test]
    fn test_marks_are_idempotent() {
        let mut table = ProcessTable::build(&requests());
        table.mark_scheduled(1, 4);
        table.mark_scheduled(1, 9);
        table.mark_ended(1, 10);
        table.mark_ended(1, 20);
        assert_eq!(table.get(1).scheduled, Some(4));
        assert_eq!(table.get(1).end, Some(10));
    }

    #[test]
    #[should_panic(expected = "illegal state transition")]
    fn test_illegal_transition_panics() {
        let mut table = ProcessTable::build(&requests());
        table.set_state(1, ProcState::Running);
    }

    #[test]
    #[should_panic(expected = "unknown pid")]
    fn test_unknown_pid_panics() {
        let table = ProcessTable::build(&requests());
        table.get(42);
    }
}
