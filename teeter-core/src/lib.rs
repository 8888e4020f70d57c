//! Board-agnostic core logic for the ball-balancing platform
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Shared mailbox slots between tasks
//! - Cooperative fixed-period scheduler
//! - Cascaded PID control with contact-vote hysteresis
//! - Touch panel filtering and affine calibration
//! - Calibration record formats and tuning defaults
//! - Sensor and actuator traits, and the five periodic tasks

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

// Must come first so the log macros are visible to every module
mod fmt;

pub mod config;
pub mod control;
pub mod mailbox;
pub mod readings;
pub mod scheduler;
pub mod tasks;
pub mod time;
pub mod touch;
pub mod traits;
