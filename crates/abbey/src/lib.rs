//! # abbey - cooperative round-robin task scheduler
//!
//! A fixed pool of workers ("monks") takes turns draining a fixed-capacity
//! task table. The scheduler resumes workers in strict cyclic order; each
//! resumed worker executes at most one ready task to completion, frees its
//! slot and suspends back. After a bounded number of cycles the scheduler
//! terminates the process.
//!
//! Everything is single-threaded and deterministic: given the same
//! dispatches, the sequence of (worker, task) executions is always the same.
//!
//! ## Quick Start
//!
//! ```ignore
//! use abbey::{Abbey, TaskCx};
//!
//! #[derive(Default)]
//! struct Counter(u32);
//!
//! fn main() {
//!     let mut abbey: Abbey<Counter> = Abbey::initialize(2, 4).unwrap();
//!
//!     for _ in 0..3 {
//!         abbey.dispatch(|cx: &mut TaskCx<'_, Counter>, ()| cx.shared_mut().0 += 1, ()).unwrap();
//!     }
//!
//!     // Never returns: exits once the cycle budget is spent
//!     abbey.run();
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//!   bootstrap ──dispatch──▶ ┌──────────────────────────┐ ◀──dispatch── running task
//!                           │  TaskTable (C slots)     │
//!                           │  Free | Ready            │
//!                           └──────────────────────────┘
//!                                      ▲ take one
//!                                      │
//!   Scheduler ──resume w0, w1, .., wN-1, w0, ..──▶ Worker ──suspend──▶ Scheduler
//! ```
//!
//! Limitations:
//! - an idle worker yields immediately; there is no I/O readiness tracking
//! - a worker runs at most one task per turn
//! - tasks cannot suspend or await sub-task results

// Re-export core types
pub use abbey_core::{
    AbbeyError,
    AbbeyResult,
    ActiveContext,
    NoopHooks,
    ResumePoint,
    SchedulerHooks,
    SchedulerPhase,
    SlotIndex,
    SlotState,
    TurnOutcome,
    WorkerId,
    WorkerPhase,
};

// Re-export kprint macros for debug logging
pub use abbey_core::{kprint, kprintln, kerror, kwarn, kinfo, kdebug, ktrace};
pub use abbey_core::kprint::{LogLevel, init as init_logging, set_log_level, set_flush_enabled};

// Re-export env utilities
pub use abbey_core::{env_get, env_get_bool, env_get_opt};

// Re-export runtime types
pub use abbey_runtime::{
    AbbeyConfig,
    ConfigError,
    Cycle,
    Dispatch,
    RunReport,
    Scheduler,
    TaskCx,
    TurnReport,
    WorkerStats,
};

/// The abbey: one self-contained scheduler instance
///
/// Lifecycle: `initialize` → any number of `dispatch` → `run` (process
/// exit). Embedders and tests can drive it with `step` or
/// `run_until_exhausted` instead of `run`. Independent instances share
/// nothing.
pub struct Abbey<S = ()> {
    scheduler: Scheduler<S>,
}

impl<S: Default> Abbey<S> {
    /// Allocate `workers` workers and `capacity` task slots
    ///
    /// The cycle budget comes from `ABBEY_CYCLE_BUDGET` or the default.
    pub fn initialize(workers: usize, capacity: usize) -> AbbeyResult<Self> {
        let config = AbbeyConfig::from_env()
            .num_workers(workers)
            .task_capacity(capacity);
        Self::with_config(config, S::default())
    }
}

impl<S> Abbey<S> {
    /// Build an abbey from a full configuration and initial shared state
    pub fn with_config(config: AbbeyConfig, shared: S) -> AbbeyResult<Self> {
        Ok(Self {
            scheduler: Scheduler::new(config, shared)?,
        })
    }

    /// Install scheduler observation hooks
    pub fn with_hooks<H>(self, hooks: H) -> Self
    where
        H: SchedulerHooks + 'static,
    {
        Self {
            scheduler: self.scheduler.with_hooks(hooks),
        }
    }

    /// Enqueue one unit of work
    ///
    /// `work` is called once with `context` on a later worker turn; its
    /// return value is discarded. Fails with `AbbeyError::Full` when every
    /// slot is Ready.
    pub fn dispatch<F, T, R>(&mut self, work: F, context: T) -> AbbeyResult<SlotIndex>
    where
        F: FnOnce(&mut TaskCx<'_, S>, T) -> R + 'static,
        T: 'static,
    {
        self.scheduler.dispatch(work, context)
    }

    /// Boot and cycle until the budget is spent, then exit the process
    pub fn run(self) -> ! {
        self.scheduler.run()
    }

    /// Boot if needed and cycle until the budget is spent
    pub fn run_until_exhausted(&mut self) -> AbbeyResult<RunReport> {
        self.scheduler.run_until_exhausted()
    }

    /// Run a single scheduling cycle
    pub fn step(&mut self) -> Cycle {
        self.scheduler.step()
    }

    #[inline]
    pub fn phase(&self) -> SchedulerPhase {
        self.scheduler.phase()
    }

    #[inline]
    pub fn slot_state(&self, slot: SlotIndex) -> Option<SlotState> {
        self.scheduler.slot_state(slot)
    }

    #[inline]
    pub fn ready_count(&self) -> usize {
        self.scheduler.ready_count()
    }

    #[inline]
    pub fn worker_stats(&self, id: WorkerId) -> Option<WorkerStats> {
        self.scheduler.worker_stats(id)
    }

    #[inline]
    pub fn shared(&self) -> &S {
        self.scheduler.shared()
    }

    #[inline]
    pub fn shared_mut(&mut self) -> &mut S {
        self.scheduler.shared_mut()
    }

    #[inline]
    pub fn scheduler(&self) -> &Scheduler<S> {
        &self.scheduler
    }

    pub fn into_shared(self) -> S {
        self.scheduler.into_shared()
    }
}

impl<S> Dispatch<S> for Abbey<S> {
    fn dispatch<F, T, R>(&mut self, work: F, context: T) -> AbbeyResult<SlotIndex>
    where
        F: FnOnce(&mut TaskCx<'_, S>, T) -> R + 'static,
        T: 'static,
    {
        Abbey::dispatch(self, work, context)
    }
}
