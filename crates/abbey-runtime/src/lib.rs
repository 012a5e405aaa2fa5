//! # abbey-runtime
//!
//! Cooperative round-robin scheduler over a fixed pool of workers.
//!
//! This crate provides:
//! - Configuration with environment overrides
//! - The worker suspend/resume state machine and the worker pool
//! - The scheduler state machine and its cycle budget
//! - The dispatcher and the context handed to running tasks
//!
//! Everything runs on the caller's thread. One context is active at a time,
//! so the task table needs no locking; code that moves workers onto other
//! threads would have to add it.

pub mod config;
pub mod job;
pub mod context;
pub mod dispatcher;
pub mod worker;
pub mod scheduler;

// Re-exports
pub use config::{AbbeyConfig, ConfigError};
pub use context::TaskCx;
pub use dispatcher::Dispatch;
pub use job::{Runnable, Task};
pub use scheduler::{Cycle, RunReport, Scheduler, TurnReport};
pub use worker::{Worker, WorkerPool, WorkerStats};
