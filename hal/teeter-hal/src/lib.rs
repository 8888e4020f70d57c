//! Teeter Hardware Abstraction Layer
//!
//! This crate defines the narrow hardware traits the balancing platform
//! needs. Chip-specific HALs implement them so the drivers and the control
//! loop can be exercised on the host with mock peripherals.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (teeter-firmware)          │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  teeter-drivers / teeter-core           │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  teeter-hal (this crate - traits)       │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//!             ┌───────────────┐
//!             │ teeter-hal-   │
//!             │    rp2040     │
//!             └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::OutputPin`], [`gpio::TriStatePin`] - Digital I/O and panel electrodes
//! - [`adc::AdcReader`] - Blocking single-shot analog conversions
//! - [`uart::UartTx`], [`uart::UartRx`] - Operator console
//! - [`storage::CalibrationStore`] - Persistent calibration lines
//! - [`time::Clock`] - Wrapping microsecond tick source

#![no_std]
#![deny(unsafe_code)]

pub mod adc;
pub mod gpio;
pub mod storage;
pub mod time;
pub mod uart;

// Re-export key traits at crate root for convenience
pub use adc::AdcReader;
pub use gpio::{OutputPin, TriStatePin};
pub use storage::{CalibrationStore, StorageError, StorageKey};
pub use time::Clock;
pub use uart::{UartRx, UartTx};
