//! Trace recorder.
//!
//! Owned by one engine instance per run and reset at run start. The
//! recorder buffers explanations, arrivals, and timeline markers between
//! state transitions; closing a step snapshots the observable simulation
//! state and advances the step index. The final, always-incomplete step is
//! discarded by `finalize`.

use std::collections::BTreeMap;
use std::mem;

use schedlab_core::process::{Pid, ProcState};
use schedlab_core::queue::ReadyQueueSet;
use schedlab_core::table::ProcessTable;

use crate::step::{MetricsRow, TimelinePoint, TraceStep};

#[derive(Debug, Default)]
struct OpenStep {
    explanations: Vec<String>,
    arrived: Vec<Pid>,
}

#[derive(Debug, Default)]
pub struct TraceRecorder {
    steps: Vec<TraceStep>,
    open: Option<OpenStep>,
    /// In-progress running markers, flushed into the timeline by the next
    /// point or step close.
    pending_segments: Vec<TimelinePoint>,
    /// Cumulative occupancy timeline across the whole run.
    point_log: Vec<TimelinePoint>,
    next_index: usize,
}

impl TraceRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears all accumulated state. Called once at run start.
    pub fn reset(&mut self) {
        self.steps.clear();
        self.open = None;
        self.pending_segments.clear();
        self.point_log.clear();
        self.next_index = 0;
    }

    /// Opens the current step if none is in progress. Idempotent; the
    /// engine calls this at the top of every tick, and `log_explanation`
    /// and `mark_arrival` open lazily for callers that skip it.
    pub fn open_step(&mut self) {
        self.open.get_or_insert_with(OpenStep::default);
    }

    fn open_mut(&mut self) -> &mut OpenStep {
        self.open.get_or_insert_with(OpenStep::default)
    }

    /// Appends one line to the current step's explanation log.
    pub fn log_explanation(&mut self, text: impl Into<String>) {
        self.open_mut().explanations.push(text.into());
    }

    /// Records that `pid` arrived during the current step.
    pub fn mark_arrival(&mut self, pid: Pid) {
        self.open_mut().arrived.push(pid);
    }

    /// Records a discrete occupancy marker at `time`. The caller applies
    /// the `+1` offset for events that complete at the end of a tick, such
    /// as a process finishing its last unit of work.
    pub fn mark_point(&mut self, pid: Pid, time: u64) {
        self.flush_segments();
        self.point_log.push(TimelinePoint::running(pid, time));
    }

    /// Records an idle-CPU marker at `time`.
    pub fn mark_idle_point(&mut self, time: u64) {
        self.flush_segments();
        self.point_log.push(TimelinePoint::idle(time));
    }

    /// Accumulates a running marker for a tick of work in progress; it is
    /// flushed into the timeline when the enclosing step closes.
    pub fn buffer_running_segment(&mut self, pid: Pid, time: u64) {
        self.pending_segments.push(TimelinePoint::running(pid, time));
    }

    fn flush_segments(&mut self) {
        self.point_log.append(&mut self.pending_segments);
    }

    /// Closes the current step with a snapshot of the observable state.
    /// Paired with every state transition by the engine.
    pub fn close_step(&mut self, table: &ProcessTable, queues: &ReadyQueueSet) {
        self.flush_segments();
        let open = self.open.take().unwrap_or_default();

        let waiting = table
            .iter()
            .filter(|p| p.state == ProcState::Wait)
            .map(|p| p.pid)
            .collect();
        let states: BTreeMap<Pid, ProcState> = table.iter().map(|p| (p.pid, p.state)).collect();
        let metrics = table.iter().map(MetricsRow::from_process).collect();

        self.steps.push(TraceStep {
            index: self.next_index,
            explanations: open.explanations,
            arrived: open.arrived,
            queues: queues.snapshot(),
            waiting,
            states,
            metrics,
            timeline: self.point_log.clone(),
        });
        self.next_index += 1;
    }

    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    /// Returns the full step log, discarding any still-open step.
    pub fn finalize(mut self) -> Vec<TraceStep> {
        self.open = None;
        self.pending_segments.clear();
        mem::take(&mut self.steps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use schedlab_core::process::ProcessRequest;

    fn fixtures() -> (ProcessTable, ReadyQueueSet) {
        let table = ProcessTable::build(&[
            ProcessRequest {
                arrival: 0,
                burst: 2,
                io_events: vec![],
            },
            ProcessRequest {
                arrival: 1,
                burst: 1,
                io_events: vec![],
            },
        ]);
        (table, ReadyQueueSet::new(1))
    }

    #[test]
    fn test_steps_snapshot_queue_and_states() {
        let (mut table, mut queues) = fixtures();
        let mut recorder = TraceRecorder::new();
        recorder.reset();

        queues.enqueue(0, 1);
        table.set_state(1, ProcState::Ready);
        recorder.mark_arrival(1);
        recorder.log_explanation("P1 arrives");
        recorder.close_step(&table, &queues);

        queues.dequeue(0);
        table.set_state(1, ProcState::Running);
        recorder.close_step(&table, &queues);

        let steps = recorder.finalize();
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0].index, 0);
        assert_eq!(steps[0].arrived, vec![1]);
        assert_eq!(steps[0].queues, vec![vec![1]]);
        assert_eq!(steps[0].explanations, vec!["P1 arrives".to_string()]);
        assert_eq!(steps[1].queues, vec![Vec::<Pid>::new()]);
        assert_eq!(steps[1].states[&1], ProcState::Running);
        assert_eq!(steps[1].states[&2], ProcState::New);
        // Arrival buffer does not leak into the next step.
        assert!(steps[1].arrived.is_empty());
    }

    #[test]
    fn test_open_step_is_idempotent() {
        let (table, queues) = fixtures();
        let mut recorder = TraceRecorder::new();
        recorder.reset();

        recorder.open_step();
        recorder.log_explanation("tick 0");
        // A repeat open must not start a fresh step or drop the buffer.
        recorder.open_step();
        recorder.close_step(&table, &queues);

        let steps = recorder.finalize();
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].explanations, vec!["tick 0".to_string()]);
    }

    #[test]
    fn test_buffered_segments_flush_in_order() {
        let (table, queues) = fixtures();
        let mut recorder = TraceRecorder::new();
        recorder.reset();

        recorder.buffer_running_segment(1, 3);
        recorder.mark_point(1, 4);
        recorder.close_step(&table, &queues);

        let steps = recorder.finalize();
        assert_eq!(
            steps[0].timeline,
            vec![TimelinePoint::running(1, 3), TimelinePoint::running(1, 4)]
        );
    }

    #[test]
    fn test_finalize_drops_incomplete_step() {
        let (table, queues) = fixtures();
        let mut recorder = TraceRecorder::new();
        recorder.reset();
        recorder.close_step(&table, &queues);
        recorder.log_explanation("never closed");
        let steps = recorder.finalize();
        assert_eq!(steps.len(), 1);
    }

    #[test]
    fn test_timeline_is_cumulative_per_step() {
        let (table, queues) = fixtures();
        let mut recorder = TraceRecorder::new();
        recorder.reset();
        recorder.mark_idle_point(0);
        recorder.close_step(&table, &queues);
        recorder.mark_point(1, 1);
        recorder.close_step(&table, &queues);
        let steps = recorder.finalize();
        assert_eq!(steps[0].timeline.len(), 1);
        assert_eq!(steps[1].timeline.len(), 2);
        assert_eq!(steps[1].timeline[0], TimelinePoint::idle(0));
    }
}
