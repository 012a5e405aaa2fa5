//! Basic abbey example
//!
//! Two workers, four task slots. The bootstrap dispatches one "main" task;
//! that task dispatches three increments, which run on later turns. The
//! process exits once the cycle budget is spent.
//!
//! # Environment Variables
//!
//! - `ABBEY_LOG_LEVEL=debug` - Set log level (off, error, warn, info, debug, trace)
//! - `ABBEY_CYCLE_BUDGET=<n>` - Scheduling cycles before exit (default 8)
//! - `ABBEY_DEBUG=1` - Log every resume and suspend

use abbey::{Abbey, SchedulerHooks, TaskCx, TurnOutcome, WorkerId};
use abbey::{kdebug, kinfo};

/// Counters that must survive across scheduling turns
#[derive(Debug)]
struct Counters {
    value1: i32,
    value2: i32,
}

impl Default for Counters {
    fn default() -> Self {
        Self { value1: 16, value2: 19 }
    }
}

/// What an increment task works on
#[derive(Debug)]
enum Target {
    Value1,
    Value2,
    /// A value owned by the task itself
    Owned(i32),
}

fn inc(cx: &mut TaskCx<'_, Counters>, target: Target) {
    let value = match target {
        Target::Value1 => {
            cx.shared_mut().value1 += 1;
            cx.shared().value1
        }
        Target::Value2 => {
            cx.shared_mut().value2 += 1;
            cx.shared().value2
        }
        Target::Owned(v) => v + 1,
    };
    println!("The value is incremented to {} (on {}).", value, cx.worker_id());
}

fn real_main(cx: &mut TaskCx<'_, Counters>, _: ()) {
    // Moved into the task's context, so it survives until the task runs
    let value3 = 22;

    println!("\nDispatch increment tasks.");
    for target in [Target::Value1, Target::Value2, Target::Owned(value3)] {
        if let Err(e) = cx.dispatch(inc, target) {
            kinfo!("increment dropped: {}", e);
        }
    }
    println!("Tasks dispatched. Their execution happens on later turns.\n");
}

struct Narrator;

impl SchedulerHooks for Narrator {
    fn on_worker_entered(&mut self, worker: WorkerId) {
        kdebug!("initialized {}", worker);
    }

    fn on_resume(&mut self, cycle: u64, worker: WorkerId) {
        println!("Cycle {}: jump to {}.", cycle, worker);
    }

    fn on_turn_complete(&mut self, worker: WorkerId, outcome: TurnOutcome) {
        if let TurnOutcome::Idle = outcome {
            println!("No task found on {}, back to scheduler.", worker);
        }
    }

    fn on_terminate(&mut self, resumes: u64) {
        println!("\nJust quit after {} scheduling cycles in this demo.", resumes);
    }
}

// ABBEY_LOG_LEVEL=debug cargo run -p abbey-basic
fn main() {
    println!("=== Abbey Basic Example ===\n");

    let abbey: Abbey<Counters> = match Abbey::initialize(2, 4) {
        Ok(abbey) => abbey,
        Err(e) => {
            eprintln!("failed to initialize abbey: {}", e);
            std::process::exit(1);
        }
    };
    let mut abbey = abbey.with_hooks(Narrator);

    println!("Dispatch main task.");
    if let Err(e) = abbey.dispatch(real_main, ()) {
        eprintln!("failed to dispatch main task: {}", e);
        std::process::exit(1);
    }

    abbey.run();
}
