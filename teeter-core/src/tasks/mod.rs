//! The platform's periodic tasks
//!
//! Dispatch order used by the firmware, with the slots each task writes:
//!
//! ```text
//! imu         → euler, rates, imu_notice
//! panel       → position, contact, panel_notice
//! user        → closed_loop, gains, abort, duty1/duty2 (manual)
//! motor       (reads duty1, duty2)
//! controller  → duty1, duty2
//! ```
//!
//! The motor task runs before the controller, so it applies the duties
//! computed on the previous pass.

pub mod controller;
pub mod imu;
pub mod motor;
pub mod panel;
pub mod recorder;
pub mod user;

pub use controller::{ControllerTask, TiltRefs};
pub use imu::{ImuNotice, ImuTask};
pub use motor::MotorTask;
pub use panel::{PanelNotice, PanelTask};
pub use recorder::Recorder;
pub use user::UserTask;
