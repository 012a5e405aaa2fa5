//! # abbey-core
//!
//! Core types for the abbey cooperative scheduler.
//!
//! This crate holds no scheduling policy. It defines the shared vocabulary
//! used by `abbey-runtime`: identifiers, the fixed-capacity task table,
//! state enums, the error taxonomy and the logging/env helpers.
//!
//! ## Modules
//!
//! - `id` - Worker and task slot identifiers
//! - `state` - Slot, worker and scheduler state enums
//! - `task` - Fixed-capacity task slot table
//! - `error` - Error types
//! - `traits` - Scheduler observation hooks
//! - `kprint` - Kernel-style debug printing macros
//! - `env` - Environment variable utilities

pub mod id;
pub mod state;
pub mod task;
pub mod error;
pub mod traits;
pub mod kprint;
pub mod env;

// Re-exports for convenience
pub use id::{SlotIndex, WorkerId};
pub use state::{ActiveContext, ResumePoint, SchedulerPhase, SlotState, TurnOutcome, WorkerPhase};
pub use task::{TaskEntry, TaskTable};
pub use error::{AbbeyError, AbbeyResult};
pub use traits::{NoopHooks, SchedulerHooks};
pub use env::{env_get, env_get_bool, env_get_opt};

/// Sizing limits
pub mod constants {
    /// Maximum workers in one pool
    pub const MAX_WORKERS: usize = 256;

    /// Maximum task slots in one table
    pub const MAX_TASK_SLOTS: usize = 1 << 20;

    /// Sentinel for "no id"
    pub const ID_NONE: u32 = u32::MAX;
}
