//! Task contract and task errors

use crate::control::ControllerState;
use crate::time::Instant;

/// A resumable periodic unit of work
///
/// Each dispatch runs one step of the task's state machine to completion
/// and returns. Persistent locals live in the implementing struct.
pub trait Task {
    /// Name used in logs and errors
    fn name(&self) -> &'static str;

    /// Dispatch period in microseconds
    fn period_us(&self) -> u32;

    /// Run one step
    ///
    /// `now` is the scheduler's timestamp for this pass. An error is fatal
    /// for the whole scheduler.
    fn step(&mut self, now: Instant) -> Result<(), TaskError>;
}

/// Fatal task failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TaskError {
    /// Controller mode machine computed an edge it does not allow
    InvalidTransition {
        from: ControllerState,
        to: ControllerState,
    },
    /// A peripheral could not be brought up
    Peripheral,
}

/// Task failure reported by the scheduler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SchedulerError {
    /// Name of the failing task
    pub task: &'static str,
    pub error: TaskError,
}
