//! Worker pool
//!
//! A worker is a resumable execution context modeled as an explicit state
//! machine. Its saved continuation is the `WorkerPhase::Suspended` resume
//! point; everything it needs after a resume lives in this struct or in the
//! task table, never in a call frame that was active when it suspended.

use abbey_core::id::WorkerId;
use abbey_core::state::{ResumePoint, TurnOutcome, WorkerPhase};
use abbey_core::task::TaskTable;

use crate::context::TaskCx;
use crate::job::Task;

/// Per-worker counters
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WorkerStats {
    /// Times resumed by the scheduler
    pub turns: u64,
    /// Turns that executed a task
    pub executed: u64,
    /// Turns that found nothing ready
    pub idle: u64,
}

/// One worker ("monk") of the pool
#[derive(Debug)]
pub struct Worker {
    id: WorkerId,
    phase: WorkerPhase,
    stats: WorkerStats,
}

impl Worker {
    pub fn new(id: WorkerId) -> Self {
        Self {
            id,
            phase: WorkerPhase::Created,
            stats: WorkerStats::default(),
        }
    }

    #[inline]
    pub fn id(&self) -> WorkerId {
        self.id
    }

    #[inline]
    pub fn phase(&self) -> WorkerPhase {
        self.phase
    }

    #[inline]
    pub fn stats(&self) -> WorkerStats {
        self.stats
    }

    /// Initial entry: capture the first continuation and yield straight back
    ///
    /// Separates "worker exists and is resumable" from "worker has been
    /// scheduled". No task is looked at.
    ///
    /// # Panics
    ///
    /// If the worker was already entered.
    pub fn enter(&mut self) {
        assert_eq!(
            self.phase,
            WorkerPhase::Created,
            "worker {} entered twice",
            self.id
        );
        self.phase = WorkerPhase::Suspended(ResumePoint::AfterEntry);
    }

    /// Resume at the saved continuation and run one turn
    ///
    /// Scans the table once and runs at most one ready task to completion
    /// before re-capturing the continuation.
    ///
    /// # Panics
    ///
    /// If the worker is not suspended (never entered, or already running).
    pub fn resume<S>(&mut self, table: &mut TaskTable<Task<S>>, shared: &mut S) -> TurnOutcome {
        assert!(
            self.phase.is_resumable(),
            "resume of worker {} in phase {:?}",
            self.id,
            self.phase
        );
        self.phase = WorkerPhase::Running;
        self.stats.turns += 1;

        let outcome = match table.take_ready() {
            Some(slot) => {
                let task = table.claim(slot);
                {
                    let mut cx = TaskCx::new(self.id, slot, table, shared);
                    task.run(&mut cx);
                }
                table.release(slot);
                self.stats.executed += 1;
                TurnOutcome::Executed(slot)
            }
            None => {
                self.stats.idle += 1;
                TurnOutcome::Idle
            }
        };

        self.suspend();
        outcome
    }

    fn suspend(&mut self) {
        debug_assert_eq!(self.phase, WorkerPhase::Running);
        self.phase = WorkerPhase::Suspended(ResumePoint::AfterTurn);
    }
}

/// Fixed-size set of workers, created once and never shrunk
#[derive(Debug)]
pub struct WorkerPool {
    workers: Vec<Worker>,
}

impl WorkerPool {
    /// Create `num_workers` workers with ids `0..num_workers`
    pub fn new(num_workers: usize) -> Self {
        let workers = (0..num_workers)
            .map(|i| Worker::new(WorkerId::new(i as u32)))
            .collect();
        Self { workers }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.workers.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.workers.is_empty()
    }

    #[inline]
    pub fn get(&self, id: WorkerId) -> Option<&Worker> {
        self.workers.get(id.as_usize())
    }

    #[inline]
    pub fn get_mut(&mut self, id: WorkerId) -> Option<&mut Worker> {
        self.workers.get_mut(id.as_usize())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Worker> + '_ {
        self.workers.iter()
    }

    /// True once every worker has captured a continuation
    pub fn all_entered(&self) -> bool {
        self.workers.iter().all(|w| w.phase != WorkerPhase::Created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatcher;
    use abbey_core::id::SlotIndex;
    use abbey_core::state::SlotState;

    #[test]
    fn test_pool_ids() {
        let pool = WorkerPool::new(3);
        let ids: Vec<_> = pool.iter().map(|w| w.id().as_u32()).collect();
        assert_eq!(ids, vec![0, 1, 2]);
        assert!(!pool.all_entered());
        assert!(pool.get(WorkerId::new(3)).is_none());
    }

    #[test]
    fn test_enter_captures_continuation() {
        let mut worker = Worker::new(WorkerId::new(0));
        assert_eq!(worker.phase(), WorkerPhase::Created);

        worker.enter();
        assert_eq!(worker.phase(), WorkerPhase::Suspended(ResumePoint::AfterEntry));
        assert_eq!(worker.stats(), WorkerStats::default());
    }

    #[test]
    #[should_panic(expected = "entered twice")]
    fn test_enter_twice_panics() {
        let mut worker = Worker::new(WorkerId::new(0));
        worker.enter();
        worker.enter();
    }

    #[test]
    #[should_panic(expected = "in phase Created")]
    fn test_resume_before_enter_panics() {
        let mut worker = Worker::new(WorkerId::new(1));
        let mut table: TaskTable<Task<()>> = TaskTable::new(1);
        worker.resume(&mut table, &mut ());
    }

    #[test]
    fn test_resume_runs_at_most_one_task() {
        let mut worker = Worker::new(WorkerId::new(0));
        worker.enter();

        let mut table: TaskTable<Task<Vec<u32>>> = TaskTable::new(4);
        let mut log = Vec::new();
        for n in 0..2u32 {
            dispatcher::dispatch_into(&mut table, |cx: &mut TaskCx<'_, Vec<u32>>, n| {
                cx.shared_mut().push(n)
            }, n)
            .unwrap();
        }

        let first = worker.resume(&mut table, &mut log);
        assert_eq!(first, TurnOutcome::Executed(SlotIndex::new(0)));
        assert_eq!(log, vec![0]);
        assert_eq!(table.state(SlotIndex::new(0)), Some(SlotState::Free));
        assert_eq!(table.state(SlotIndex::new(1)), Some(SlotState::Ready));
        assert_eq!(worker.phase(), WorkerPhase::Suspended(ResumePoint::AfterTurn));

        assert_eq!(worker.resume(&mut table, &mut log), TurnOutcome::Executed(SlotIndex::new(1)));
        assert_eq!(worker.resume(&mut table, &mut log), TurnOutcome::Idle);
        assert_eq!(log, vec![0, 1]);

        let stats = worker.stats();
        assert_eq!(stats.turns, 3);
        assert_eq!(stats.executed, 2);
        assert_eq!(stats.idle, 1);
    }

    #[test]
    fn test_task_sees_its_own_slot_ready() {
        let mut worker = Worker::new(WorkerId::new(2));
        worker.enter();

        let mut table: TaskTable<Task<Option<(WorkerId, SlotIndex, usize)>>> = TaskTable::new(2);
        dispatcher::dispatch_into(&mut table, |cx: &mut TaskCx<'_, _>, ()| {
            let seen = (cx.worker_id(), cx.slot(), cx.ready_count());
            *cx.shared_mut() = Some(seen);
        }, ())
        .unwrap();

        let mut seen = None;
        worker.resume(&mut table, &mut seen);
        assert_eq!(seen, Some((WorkerId::new(2), SlotIndex::new(0), 1)));
        assert_eq!(table.ready_count(), 0);
    }
}
