//! Round-robin scheduler
//!
//! Owns the worker pool, the task table, the shared state object and the
//! cycle budget, and drives the suspend/resume protocol:
//!
//! ```text
//! Booting ──enter each worker once──▶ Cycling ──budget spent──▶ Terminated
//!                                       │  ▲
//!                          resume(next) │  │ worker suspends
//!                                       ▼  │
//!                                     Worker
//! ```
//!
//! Exactly one of {bootstrap, scheduler, one worker} is active at any time.
//! `active` tracks which, and every control transfer asserts it.

use abbey_core::error::{AbbeyError, AbbeyResult};
use abbey_core::id::{SlotIndex, WorkerId};
use abbey_core::kprint;
use abbey_core::state::{ActiveContext, SchedulerPhase, SlotState, TurnOutcome};
use abbey_core::task::TaskTable;
use abbey_core::traits::{NoopHooks, SchedulerHooks};
use abbey_core::{kdebug, kinfo, kwarn};

use crate::config::AbbeyConfig;
use crate::context::TaskCx;
use crate::dispatcher::{self, Dispatch};
use crate::job::Task;
use crate::worker::{WorkerPool, WorkerStats};

/// What one scheduling cycle did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnReport {
    /// 1-based resume count since boot
    pub cycle: u64,
    pub worker: WorkerId,
    pub outcome: TurnOutcome,
}

/// Result of `Scheduler::step`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cycle {
    /// A worker was resumed and suspended back
    Turn(TurnReport),
    /// The budget is spent; the scheduler is Terminated
    Exhausted,
}

/// Totals for one `run_until_exhausted` call
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunReport {
    pub resumes: u64,
    pub executed: u64,
    pub idle: u64,
}

/// Main scheduler
pub struct Scheduler<S> {
    config: AbbeyConfig,

    /// Pending work, shared by dispatchers and the running worker
    table: TaskTable<Task<S>>,

    pool: WorkerPool,

    /// State handed to every task through its `TaskCx`
    shared: S,

    hooks: Box<dyn SchedulerHooks>,

    phase: SchedulerPhase,
    active: ActiveContext,

    /// Round-robin cursor; `None` until the first resume
    current: Option<WorkerId>,
    cycles_remaining: u64,
    resumes: u64,

    debug: bool,
}

impl<S> Scheduler<S> {
    /// Create a scheduler with the given configuration and shared state
    pub fn new(config: AbbeyConfig, shared: S) -> AbbeyResult<Self> {
        config.validate()?;

        let debug = config.debug_logging || cfg!(feature = "debug-logging");

        Ok(Self {
            table: TaskTable::new(config.task_capacity),
            pool: WorkerPool::new(config.num_workers),
            shared,
            hooks: Box::new(NoopHooks),
            phase: SchedulerPhase::Booting,
            active: ActiveContext::Bootstrap,
            current: None,
            cycles_remaining: config.cycle_budget,
            resumes: 0,
            debug,
            config,
        })
    }

    /// Replace the observation hooks
    pub fn with_hooks<H>(mut self, hooks: H) -> Self
    where
        H: SchedulerHooks + 'static,
    {
        self.hooks = Box::new(hooks);
        self
    }

    /// Run one scheduling cycle and hand control back to the caller
    ///
    /// The first call boots the pool. Once the budget is spent every call
    /// returns `Cycle::Exhausted`.
    pub fn step(&mut self) -> Cycle {
        if self.phase == SchedulerPhase::Booting {
            self.boot();
        }
        self.transfer(ActiveContext::Bootstrap, ActiveContext::Scheduler);
        let cycle = self.cycle();
        self.transfer(ActiveContext::Scheduler, ActiveContext::Bootstrap);
        cycle
    }

    /// Cycle until the budget is spent
    ///
    /// Performs exactly `cycles_remaining` resumes. Fails with
    /// `AbbeyError::Terminated` if the budget was already spent by an
    /// earlier call.
    pub fn run_until_exhausted(&mut self) -> AbbeyResult<RunReport> {
        if self.phase == SchedulerPhase::Terminated {
            return Err(AbbeyError::Terminated);
        }

        if self.phase == SchedulerPhase::Booting {
            self.boot();
        }

        let mut report = RunReport::default();
        self.transfer(ActiveContext::Bootstrap, ActiveContext::Scheduler);
        while let Cycle::Turn(turn) = self.cycle() {
            report.resumes += 1;
            match turn.outcome {
                TurnOutcome::Executed(_) => report.executed += 1,
                TurnOutcome::Idle => report.idle += 1,
            }
        }
        self.transfer(ActiveContext::Scheduler, ActiveContext::Bootstrap);

        Ok(report)
    }

    /// Cycle until the budget is spent, then exit the process with success
    pub fn run(mut self) -> ! {
        if let Err(e) = self.run_until_exhausted() {
            kwarn!("{}, exiting", e);
        }
        std::process::exit(0)
    }

    fn cycle(&mut self) -> Cycle {
        debug_assert_eq!(self.active, ActiveContext::Scheduler);
        debug_assert_ne!(self.phase, SchedulerPhase::Booting);

        if self.phase == SchedulerPhase::Terminated {
            return Cycle::Exhausted;
        }
        if self.cycles_remaining == 0 {
            self.terminate();
            return Cycle::Exhausted;
        }
        self.cycles_remaining -= 1;

        let worker = self
            .current
            .unwrap_or(WorkerId::NONE)
            .next_in(self.pool.len());
        self.current = Some(worker);

        let outcome = self.resume(worker);
        Cycle::Turn(TurnReport {
            cycle: self.resumes,
            worker,
            outcome,
        })
    }

    /// Enter every worker once so each captures its first continuation
    ///
    /// Runs on the bootstrap side: each worker is entered from the
    /// bootstrap and hands control straight back to it.
    fn boot(&mut self) {
        kinfo!(
            "abbey booting: {} workers, {} task slots, budget {}",
            self.pool.len(),
            self.table.capacity(),
            self.cycles_remaining
        );
        if self.debug {
            self.config.print();
        }

        for index in 0..self.pool.len() {
            let id = WorkerId::new(index as u32);
            self.transfer(ActiveContext::Bootstrap, ActiveContext::Worker(id));
            if let Some(worker) = self.pool.get_mut(id) {
                worker.enter();
            }
            self.transfer(ActiveContext::Worker(id), ActiveContext::Bootstrap);
            self.hooks.on_worker_entered(id);

            if self.debug {
                kdebug!("entered worker {}", id);
            }
        }

        debug_assert!(self.pool.all_entered());
        self.phase = SchedulerPhase::Cycling;
    }

    /// Resume one worker and take control back when it suspends
    ///
    /// # Panics
    ///
    /// If `id` is not in the pool.
    fn resume(&mut self, id: WorkerId) -> TurnOutcome {
        self.resumes += 1;
        self.hooks.on_resume(self.resumes, id);
        if self.debug {
            kdebug!("cycle {}: resume {}", self.resumes, id);
        }

        self.transfer(ActiveContext::Scheduler, ActiveContext::Worker(id));
        kprint::set_worker_id(id.as_u32());

        let Some(worker) = self.pool.get_mut(id) else {
            panic!("resume of unknown worker {}", id)
        };
        let outcome = worker.resume(&mut self.table, &mut self.shared);

        kprint::clear_worker_id();
        self.transfer(ActiveContext::Worker(id), ActiveContext::Scheduler);

        if self.debug {
            match outcome {
                TurnOutcome::Executed(slot) => kdebug!("{} executed {} and suspended", id, slot),
                TurnOutcome::Idle => kdebug!("{} found no ready task and suspended", id),
            }
        }
        self.hooks.on_turn_complete(id, outcome);

        outcome
    }

    fn terminate(&mut self) {
        self.phase = SchedulerPhase::Terminated;
        self.hooks.on_terminate(self.resumes);
        kinfo!("cycle budget exhausted after {} resumes", self.resumes);
    }

    #[inline]
    fn transfer(&mut self, from: ActiveContext, to: ActiveContext) {
        assert_eq!(
            self.active, from,
            "control transfer to {} while {} is active",
            to, self.active
        );
        self.active = to;
    }

    /// Enqueue work from the bootstrap side
    pub fn dispatch<F, T, R>(&mut self, work: F, context: T) -> AbbeyResult<SlotIndex>
    where
        F: FnOnce(&mut TaskCx<'_, S>, T) -> R + 'static,
        T: 'static,
    {
        debug_assert_eq!(self.active, ActiveContext::Bootstrap);
        dispatcher::dispatch_into(&mut self.table, work, context)
    }

    #[inline]
    pub fn config(&self) -> &AbbeyConfig {
        &self.config
    }

    #[inline]
    pub fn phase(&self) -> SchedulerPhase {
        self.phase
    }

    #[inline]
    pub fn active(&self) -> ActiveContext {
        self.active
    }

    /// Worker resumed most recently
    #[inline]
    pub fn current_worker(&self) -> Option<WorkerId> {
        self.current
    }

    #[inline]
    pub fn cycles_remaining(&self) -> u64 {
        self.cycles_remaining
    }

    /// Resumes performed since boot
    #[inline]
    pub fn resumes(&self) -> u64 {
        self.resumes
    }

    #[inline]
    pub fn num_workers(&self) -> usize {
        self.pool.len()
    }

    #[inline]
    pub fn workers(&self) -> &WorkerPool {
        &self.pool
    }

    pub fn worker_stats(&self, id: WorkerId) -> Option<WorkerStats> {
        self.pool.get(id).map(|w| w.stats())
    }

    #[inline]
    pub fn table(&self) -> &TaskTable<Task<S>> {
        &self.table
    }

    #[inline]
    pub fn slot_state(&self, slot: SlotIndex) -> Option<SlotState> {
        self.table.state(slot)
    }

    #[inline]
    pub fn ready_count(&self) -> usize {
        self.table.ready_count()
    }

    #[inline]
    pub fn shared(&self) -> &S {
        &self.shared
    }

    #[inline]
    pub fn shared_mut(&mut self) -> &mut S {
        &mut self.shared
    }

    pub fn into_shared(self) -> S {
        self.shared
    }
}

impl<S> Dispatch<S> for Scheduler<S> {
    fn dispatch<F, T, R>(&mut self, work: F, context: T) -> AbbeyResult<SlotIndex>
    where
        F: FnOnce(&mut TaskCx<'_, S>, T) -> R + 'static,
        T: 'static,
    {
        Scheduler::dispatch(self, work, context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn config(workers: usize, capacity: usize, budget: u64) -> AbbeyConfig {
        AbbeyConfig::new()
            .num_workers(workers)
            .task_capacity(capacity)
            .cycle_budget(budget)
    }

    fn turns<S>(sched: &mut Scheduler<S>) -> Vec<TurnReport> {
        let mut out = Vec::new();
        while let Cycle::Turn(turn) = sched.step() {
            out.push(turn);
        }
        out
    }

    #[derive(Default)]
    struct Trace {
        events: Vec<String>,
    }

    struct Recorder(Rc<RefCell<Trace>>);

    impl SchedulerHooks for Recorder {
        fn on_worker_entered(&mut self, worker: WorkerId) {
            self.0.borrow_mut().events.push(format!("enter {}", worker));
        }

        fn on_resume(&mut self, cycle: u64, worker: WorkerId) {
            self.0.borrow_mut().events.push(format!("resume {} {}", cycle, worker));
        }

        fn on_terminate(&mut self, resumes: u64) {
            self.0.borrow_mut().events.push(format!("terminate {}", resumes));
        }
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let result = Scheduler::new(config(0, 4, 8), ());
        assert!(matches!(result, Err(AbbeyError::InvalidConfig(_))));
    }

    #[test]
    fn test_round_robin_order() {
        let mut sched = Scheduler::new(config(3, 2, 7), ()).unwrap();
        let order: Vec<u32> = turns(&mut sched).iter().map(|t| t.worker.as_u32()).collect();

        assert_eq!(order, vec![0, 1, 2, 0, 1, 2, 0]);
        assert_eq!(sched.phase(), SchedulerPhase::Terminated);
        assert_eq!(sched.current_worker(), Some(WorkerId::new(0)));
    }

    #[test]
    fn test_zero_budget_terminates_without_resume() {
        let mut sched = Scheduler::new(config(2, 4, 0), ()).unwrap();
        assert_eq!(sched.step(), Cycle::Exhausted);
        assert_eq!(sched.resumes(), 0);
        assert_eq!(sched.phase(), SchedulerPhase::Terminated);

        // Boot still entered every worker
        assert!(sched.workers().all_entered());
    }

    #[test]
    fn test_boot_then_cycles_observed_by_hooks() {
        let trace = Rc::new(RefCell::new(Trace::default()));
        let mut sched = Scheduler::new(config(2, 1, 3), ())
            .unwrap()
            .with_hooks(Recorder(trace.clone()));

        let report = sched.run_until_exhausted().unwrap();
        assert_eq!(report.resumes, 3);

        let events = trace.borrow().events.clone();
        assert_eq!(
            events,
            vec![
                "enter w0",
                "enter w1",
                "resume 1 w0",
                "resume 2 w1",
                "resume 3 w0",
                "terminate 3",
            ]
        );
    }

    #[test]
    fn test_run_twice_reports_terminated() {
        let mut sched = Scheduler::new(config(1, 1, 2), ()).unwrap();
        assert_eq!(sched.run_until_exhausted().unwrap().resumes, 2);
        assert_eq!(sched.run_until_exhausted(), Err(AbbeyError::Terminated));
        assert_eq!(sched.step(), Cycle::Exhausted);
        assert_eq!(sched.resumes(), 2);
    }

    #[test]
    fn test_termination_reported_once() {
        let trace = Rc::new(RefCell::new(Trace::default()));
        let mut sched = Scheduler::new(config(1, 1, 1), ())
            .unwrap()
            .with_hooks(Recorder(trace.clone()));

        sched.run_until_exhausted().unwrap();
        assert_eq!(sched.step(), Cycle::Exhausted);
        assert_eq!(sched.step(), Cycle::Exhausted);

        let terminations = trace
            .borrow()
            .events
            .iter()
            .filter(|e| e.starts_with("terminate"))
            .count();
        assert_eq!(terminations, 1);
    }

    #[test]
    fn test_boot_enters_workers_from_bootstrap() {
        let mut sched = Scheduler::new(config(3, 1, 4), ()).unwrap();
        sched.boot();

        assert_eq!(sched.active(), ActiveContext::Bootstrap);
        assert_eq!(sched.phase(), SchedulerPhase::Cycling);
        assert!(sched.workers().all_entered());
        assert_eq!(sched.resumes(), 0);

        // A booted pool goes straight to cycling
        assert!(matches!(sched.step(), Cycle::Turn(t) if t.worker == WorkerId::new(0)));
    }

    #[test]
    #[should_panic(expected = "resume of unknown worker")]
    fn test_resume_unknown_worker_panics() {
        let mut sched = Scheduler::new(config(2, 1, 4), ()).unwrap();
        sched.step();

        sched.active = ActiveContext::Scheduler;
        sched.resume(WorkerId::new(9));
    }

    #[test]
    fn test_active_context_returns_to_bootstrap() {
        let mut sched = Scheduler::new(config(2, 2, 4), 0u32).unwrap();
        assert_eq!(sched.active(), ActiveContext::Bootstrap);

        sched
            .dispatch(|cx: &mut TaskCx<'_, u32>, ()| *cx.shared_mut() += 1, ())
            .unwrap();
        sched.step();
        assert_eq!(sched.active(), ActiveContext::Bootstrap);
        assert_eq!(*sched.shared(), 1);
    }

    #[test]
    fn test_worker_stats_accumulate() {
        let mut sched = Scheduler::new(config(2, 4, 6), 0u32).unwrap();
        for _ in 0..3 {
            sched.dispatch(|cx: &mut TaskCx<'_, u32>, ()| *cx.shared_mut() += 1, ()).unwrap();
        }

        let report = sched.run_until_exhausted().unwrap();
        assert_eq!(report, RunReport { resumes: 6, executed: 3, idle: 3 });

        let w0 = sched.worker_stats(WorkerId::new(0)).unwrap();
        let w1 = sched.worker_stats(WorkerId::new(1)).unwrap();
        assert_eq!((w0.turns, w0.executed, w0.idle), (3, 2, 1));
        assert_eq!((w1.turns, w1.executed, w1.idle), (3, 1, 2));
        assert_eq!(sched.into_shared(), 3);
    }
}
