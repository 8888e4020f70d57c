//! Hardware seams used by the tasks
//!
//! Board crates implement these over concrete drivers; tests implement
//! them with hand mocks.

pub mod actuator;
pub mod imu;
pub mod panel;

pub use actuator::DutyActuator;
pub use imu::{CalibrationStatus, OrientationSensor, SensorEuler, SensorRates};
pub use panel::{RawScan, TouchScanner};
