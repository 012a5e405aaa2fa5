//! Scheduler observation hooks
//!
//! The runtime calls these at each control transfer. They run on the
//! scheduler's side of the transfer, never inside a task.

use crate::id::WorkerId;
use crate::state::TurnOutcome;

/// Callback interface for observing the scheduler
///
/// All methods default to no-ops.
pub trait SchedulerHooks {
    /// A worker captured its first continuation during boot
    fn on_worker_entered(&mut self, _worker: WorkerId) {}

    /// The scheduler is about to resume `worker` for cycle number `cycle`
    fn on_resume(&mut self, _cycle: u64, _worker: WorkerId) {}

    /// `worker` suspended back to the scheduler
    fn on_turn_complete(&mut self, _worker: WorkerId, _outcome: TurnOutcome) {}

    /// The cycle budget ran out after `resumes` resumes
    fn on_terminate(&mut self, _resumes: u64) {}
}

/// Hooks that do nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopHooks;

impl SchedulerHooks for NoopHooks {}
