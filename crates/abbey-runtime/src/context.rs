//! Task execution context
//!
//! Every work function receives a `TaskCx`. It is the only handle a running
//! task has on the system: the shared state object, the identity of the
//! worker running it, and the dispatcher for chaining more work.

use abbey_core::error::AbbeyResult;
use abbey_core::id::{SlotIndex, WorkerId};
use abbey_core::task::TaskTable;

use crate::dispatcher::{self, Dispatch};
use crate::job::Task;

/// Context handed to a task while it runs on a worker
pub struct TaskCx<'a, S> {
    worker: WorkerId,
    slot: SlotIndex,
    table: &'a mut TaskTable<Task<S>>,
    shared: &'a mut S,
}

impl<'a, S> TaskCx<'a, S> {
    pub(crate) fn new(
        worker: WorkerId,
        slot: SlotIndex,
        table: &'a mut TaskTable<Task<S>>,
        shared: &'a mut S,
    ) -> Self {
        Self {
            worker,
            slot,
            table,
            shared,
        }
    }

    /// Worker executing this task
    #[inline]
    pub fn worker_id(&self) -> WorkerId {
        self.worker
    }

    /// Slot this task was dispatched into; it stays Ready until we return
    #[inline]
    pub fn slot(&self) -> SlotIndex {
        self.slot
    }

    #[inline]
    pub fn shared(&self) -> &S {
        &*self.shared
    }

    #[inline]
    pub fn shared_mut(&mut self) -> &mut S {
        &mut *self.shared
    }

    /// Ready slots, this task's own slot included
    #[inline]
    pub fn ready_count(&self) -> usize {
        self.table.ready_count()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// Enqueue further work from inside a running task
    ///
    /// Subject to the same capacity limit as the bootstrap; the new task
    /// runs on some later turn, never inside this one.
    pub fn dispatch<F, T, R>(&mut self, work: F, context: T) -> AbbeyResult<SlotIndex>
    where
        F: FnOnce(&mut TaskCx<'_, S>, T) -> R + 'static,
        T: 'static,
    {
        dispatcher::dispatch_into(&mut *self.table, work, context)
    }
}

impl<S> Dispatch<S> for TaskCx<'_, S> {
    fn dispatch<F, T, R>(&mut self, work: F, context: T) -> AbbeyResult<SlotIndex>
    where
        F: FnOnce(&mut TaskCx<'_, S>, T) -> R + 'static,
        T: 'static,
    {
        TaskCx::dispatch(self, work, context)
    }
}
