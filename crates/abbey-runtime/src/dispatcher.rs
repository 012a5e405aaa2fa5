//! Dispatcher: the producer-facing entry point
//!
//! Work enters the system only through `Dispatch::dispatch`, whether the
//! caller is the bootstrap (via the scheduler or facade) or a running task
//! (via its `TaskCx`). Both land in `dispatch_into`.

use abbey_core::error::{AbbeyError, AbbeyResult};
use abbey_core::id::SlotIndex;
use abbey_core::task::TaskTable;
use abbey_core::{kdebug, ktrace};

use crate::context::TaskCx;
use crate::job::{Job, Task};

/// Anything that can enqueue work into an abbey's task table
pub trait Dispatch<S> {
    /// Install `work` to be called with `context` on some later turn
    ///
    /// Returns the slot used, or `AbbeyError::Full` when every slot is Ready.
    fn dispatch<F, T, R>(&mut self, work: F, context: T) -> AbbeyResult<SlotIndex>
    where
        F: FnOnce(&mut TaskCx<'_, S>, T) -> R + 'static,
        T: 'static;
}

pub(crate) fn dispatch_into<S, F, T, R>(
    table: &mut TaskTable<Task<S>>,
    work: F,
    context: T,
) -> AbbeyResult<SlotIndex>
where
    F: FnOnce(&mut TaskCx<'_, S>, T) -> R + 'static,
    T: 'static,
{
    match table.allocate(Job::boxed(work, context)) {
        Ok(slot) => {
            ktrace!("dispatched into {} ({}/{} ready)", slot, table.ready_count(), table.capacity());
            Ok(slot)
        }
        Err(AbbeyError::Full) => {
            kdebug!("dispatch rejected, all {} slots ready", table.capacity());
            Err(AbbeyError::Full)
        }
        Err(e) => Err(e),
    }
}
