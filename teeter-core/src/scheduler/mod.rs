//! Cooperative periodic scheduler
//!
//! Runs a fixed, ordered list of tasks on one thread. Each task owns its
//! state machine and is offered exactly one dispatch per pass; it runs only
//! when its own period has elapsed.

pub mod gate;
pub mod task;

pub use gate::PeriodGate;
pub use task::{SchedulerError, Task, TaskError};

use core::future::Future;

use teeter_hal::Clock;

use crate::mailbox::Slot;
use crate::time::Instant;

struct Entry<'a> {
    task: &'a mut dyn Task,
    gate: PeriodGate,
}

/// Round-robin dispatcher over `N` tasks
///
/// Order in the array is the dispatch order within a pass. A task placed
/// after the producer of a slot sees the value written in the same pass;
/// one placed before it sees the previous pass's value.
pub struct Scheduler<'a, const N: usize> {
    entries: [Entry<'a>; N],
}

impl<'a, const N: usize> Scheduler<'a, N> {
    /// Create a scheduler; each task first becomes due one period after `start`
    pub fn new(tasks: [&'a mut dyn Task; N], start: Instant) -> Self {
        Self {
            entries: tasks.map(|task| {
                let gate = PeriodGate::new(task.period_us(), start);
                Entry { task, gate }
            }),
        }
    }

    /// Offer every task one dispatch at time `now`
    ///
    /// Returns the number of tasks that ran. Stops at the first fatal task
    /// error; tasks later in the list are not dispatched in that pass.
    pub fn run_once(&mut self, now: Instant) -> Result<usize, SchedulerError> {
        let mut dispatched = 0;

        for entry in self.entries.iter_mut() {
            if !entry.gate.poll(now) {
                continue;
            }

            entry.task.step(now).map_err(|error| {
                error!("task {} failed: {}", entry.task.name(), error);
                SchedulerError {
                    task: entry.task.name(),
                    error,
                }
            })?;
            dispatched += 1;
        }

        Ok(dispatched)
    }

    /// Run passes until `abort` reads true
    ///
    /// `hook` runs after every pass, including the one in which abort was
    /// raised. The abort flag is checked between passes only; a pass that
    /// has started always completes.
    pub async fn run_until_abort<C: Clock, H: PassHook>(
        &mut self,
        clock: &mut C,
        abort: &Slot<bool>,
        hook: &mut H,
    ) -> Result<(), SchedulerError> {
        while !abort.read_or(false) {
            let now = Instant::from_micros(clock.now_us());
            self.run_once(now)?;
            hook.after_pass().await;
        }
        info!("scheduler stopped on abort");
        Ok(())
    }
}

/// Work the caller does between scheduler passes
///
/// Anything that may block for longer than a tick (flash commits, yielding
/// to the executor) belongs here rather than inside a task.
pub trait PassHook {
    fn after_pass(&mut self) -> impl Future<Output = ()>;
}
