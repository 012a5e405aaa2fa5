//! Slot, worker and scheduler state types

use core::fmt;

use crate::id::{SlotIndex, WorkerId};

/// State of a task slot
///
/// There is no "running" state: a task executes to completion
/// inside a single worker turn, so nothing else can observe it mid-flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum SlotState {
    /// Slot can accept a new task
    #[default]
    Free = 0,

    /// Slot holds a task waiting to be executed
    Ready = 1,
}

impl SlotState {
    #[inline]
    pub const fn is_free(&self) -> bool {
        matches!(self, SlotState::Free)
    }

    #[inline]
    pub const fn is_ready(&self) -> bool {
        matches!(self, SlotState::Ready)
    }
}

/// Where a suspended worker picks up again when resumed
///
/// This is the worker's saved continuation. Every resume point re-enters at
/// the top of the table scan; the variant only records how it got there.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResumePoint {
    /// Captured during the initial entry from the boot sequence
    AfterEntry,

    /// Captured when yielding back to the scheduler after a turn
    AfterTurn,
}

/// Lifecycle phase of a worker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerPhase {
    /// Allocated, never entered
    Created,

    /// Parked at a saved continuation, resumable
    Suspended(ResumePoint),

    /// Currently the active context
    Running,
}

impl WorkerPhase {
    #[inline]
    pub const fn is_resumable(&self) -> bool {
        matches!(self, WorkerPhase::Suspended(_))
    }
}

/// Scheduler state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerPhase {
    /// Workers not yet entered
    Booting,

    /// Steady-state round-robin loop
    Cycling,

    /// Cycle budget exhausted
    Terminated,
}

impl fmt::Display for SchedulerPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchedulerPhase::Booting => write!(f, "BOOTING"),
            SchedulerPhase::Cycling => write!(f, "CYCLING"),
            SchedulerPhase::Terminated => write!(f, "TERMINATED"),
        }
    }
}

/// The one logical thread of control that is active at any instant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveContext {
    /// Whoever built the system and drives it
    Bootstrap,

    /// The round-robin loop
    Scheduler,

    /// A worker, possibly executing a task
    Worker(WorkerId),
}

impl fmt::Display for ActiveContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActiveContext::Bootstrap => write!(f, "bootstrap"),
            ActiveContext::Scheduler => write!(f, "scheduler"),
            ActiveContext::Worker(id) => write!(f, "worker {}", id),
        }
    }
}

/// What a worker did with one scheduling turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOutcome {
    /// Ran the task in this slot and freed it
    Executed(SlotIndex),

    /// Found no ready task
    Idle,
}

impl TurnOutcome {
    #[inline]
    pub const fn did_work(&self) -> bool {
        matches!(self, TurnOutcome::Executed(_))
    }
}
