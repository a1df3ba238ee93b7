//! First-come-first-served: one queue, no preemption, pure arrival order.
//! Enqueue order matches arrival order and ties are broken by pid, so the
//! head of the queue is always the right pick.

use schedlab_core::process::Pid;
use schedlab_core::queue::ReadyQueueSet;
use schedlab_core::table::ProcessTable;

use crate::Policy;

#[derive(Debug, Default, Clone, Copy)]
pub struct Fcfs;

impl Policy for Fcfs {
    fn name(&self) -> &'static str {
        "fcfs"
    }

    fn queue_count(&self) -> usize {
        1
    }

    fn select_next(&self, queues: &ReadyQueueSet, _table: &ProcessTable) -> Option<Pid> {
        queues.front(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use schedlab_core::process::ProcessRequest;

    #[test]
    fn test_selects_head_of_queue() {
        let table = ProcessTable::build(&[
            ProcessRequest {
                arrival: 0,
                burst: 3,
                io_events: vec![],
            },
            ProcessRequest {
                arrival: 0,
                burst: 1,
                io_events: vec![],
            },
        ]);
        let mut queues = ReadyQueueSet::new(1);
        queues.enqueue(0, 1);
        queues.enqueue(0, 2);
        let policy = Fcfs;
        assert_eq!(policy.select_next(&queues, &table), Some(1));
        assert!(!policy.preempts_on_arrival(0));
        assert!(!policy.preempts_on_timeout());
        assert_eq!(policy.quantum(0), None);
    }

    #[test]
    fn test_idles_on_empty_queue() {
        let table = ProcessTable::build(&[ProcessRequest {
            arrival: 5,
            burst: 1,
            io_events: vec![],
        }]);
        let queues = ReadyQueueSet::new(1);
        assert_eq!(Fcfs.select_next(&queues, &table), None);
    }
}
