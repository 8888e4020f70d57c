//! Cascaded closed-loop control
//!
//! Two PID stages per platform axis: the outer stage turns ball position
//! error into a tilt reference, the inner stage turns tilt error into a
//! motor duty. A contact vote decides whether position readings are
//! trusted, and a small mode machine selects between holding, levelling
//! an empty platform, and balancing.

pub mod cascade;
pub mod mode;
pub mod pid;
pub mod vote;

pub use cascade::AxisController;
pub use mode::{ControllerState, ModeInputs};
pub use pid::{saturate, PidStage};
pub use vote::ContactVote;
