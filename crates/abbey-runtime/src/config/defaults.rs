//! Library defaults, overridable through `ABBEY_*` environment variables.

/// Workers in the pool
pub const NUM_WORKERS: usize = 2;

/// Task table slots
pub const TASK_CAPACITY: usize = 4;

/// Scheduling cycles before the scheduler terminates
pub const CYCLE_BUDGET: u64 = 8;

pub const DEBUG_LOGGING: bool = false;
