//! Ready-queue set: a fixed-size array of FIFO queues indexed by priority
//! level. Level 0 is the highest priority. Under FCFS and STCF there is a
//! single queue; MLFQ configures one per feedback level.

use std::collections::VecDeque;

use crate::process::Pid;

#[derive(Debug, Clone)]
pub struct ReadyQueueSet {
    queues: Vec<VecDeque<Pid>>,
}

impl ReadyQueueSet {
    /// Creates `levels` empty queues. The level count is fixed for the
    /// lifetime of a run; demotion clamps at `levels - 1`.
    pub fn new(levels: usize) -> Self {
        Self {
            queues: vec![VecDeque::new(); levels],
        }
    }

    #[inline]
    pub fn levels(&self) -> usize {
        self.queues.len()
    }

    /// Appends `pid` at the tail of the queue for `level`.
    ///
    /// # Panics
    /// If `level` is out of range or `pid` is already queued somewhere;
    /// both indicate a broken policy contract.
    pub fn enqueue(&mut self, level: usize, pid: Pid) {
        assert!(
            !self.contains(pid),
            "pid {pid} enqueued twice (already in a ready queue)"
        );
        self.queues[level].push_back(pid);
    }

    /// Pops the head of the queue for `level`.
    pub fn dequeue(&mut self, level: usize) -> Option<Pid> {
        self.queues[level].pop_front()
    }

    pub fn front(&self, level: usize) -> Option<Pid> {
        self.queues[level].front().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.queues.iter().all(VecDeque::is_empty)
    }

    pub fn contains(&self, pid: Pid) -> bool {
        self.queues.iter().any(|q| q.contains(&pid))
    }

    /// Removes `pid` from whichever queue holds it, returning that queue's
    /// level. Used by dispatch, where the policy may pick a pid that is not
    /// at the head of its queue.
    pub fn take(&mut self, pid: Pid) -> Option<usize> {
        for (level, queue) in self.queues.iter_mut().enumerate() {
            if let Some(pos) = queue.iter().position(|&p| p == pid) {
                queue.remove(pos);
                return Some(level);
            }
        }
        None
    }

    /// In-order view of one level, head first.
    pub fn level_iter(&self, level: usize) -> impl Iterator<Item = Pid> + '_ {
        self.queues[level].iter().copied()
    }

    /// Moves every queued pid to level 0, scanning levels top-down so FIFO
    /// order within each level is preserved. Returns the pids that were
    /// queued below level 0.
    pub fn promote_all_to_top(&mut self) -> Vec<Pid> {
        let mut promoted = Vec::new();
        for level in 1..self.queues.len() {
            let drained: Vec<Pid> = self.queues[level].drain(..).collect();
            promoted.extend_from_slice(&drained);
            self.queues[0].extend(drained);
        }
        promoted
    }

    /// Copies the current contents of every queue, head first.
    pub fn snapshot(&self) -> Vec<Vec<Pid>> {
        self.queues.iter().map(|q| q.iter().copied().collect()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fifo_within_level() {
        let mut queues = ReadyQueueSet::new(1);
        queues.enqueue(0, 1);
        queues.enqueue(0, 2);
        queues.enqueue(0, 3);
        assert_eq!(queues.dequeue(0), Some(1));
        assert_eq!(queues.dequeue(0), Some(2));
        assert_eq!(queues.dequeue(0), Some(3));
        assert_eq!(queues.dequeue(0), None);
    }

    #[test]
    fn test_take_removes_mid_queue() {
        let mut queues = ReadyQueueSet::new(2);
        queues.enqueue(1, 4);
        queues.enqueue(1, 5);
        assert_eq!(queues.take(5), Some(1));
        assert!(!queues.contains(5));
        assert_eq!(queues.take(5), None);
        assert_eq!(queues.front(1), Some(4));
    }

    #[test]
    #[should_panic(expected = "enqueued twice")]
    fn test_double_enqueue_panics() {
        let mut queues = ReadyQueueSet::new(2);
        queues.enqueue(0, 7);
        queues.enqueue(1, 7);
    }

    #[test]
    fn test_promote_all_preserves_order() {
        let mut queues = ReadyQueueSet::new(3);
        queues.enqueue(0, 1);
        queues.enqueue(1, 2);
        queues.enqueue(1, 3);
        queues.enqueue(2, 4);
        let promoted = queues.promote_all_to_top();
        assert_eq!(promoted, vec![2, 3, 4]);
        assert_eq!(queues.snapshot(), vec![vec![1, 2, 3, 4], vec![], vec![]]);
    }
}
