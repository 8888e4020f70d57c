//! RP2040-specific HAL for the balancing platform firmware
//!
//! This crate provides RP2040-specific implementations of the shared
//! `teeter-hal` traits:
//!
//! - Touch panel electrodes on flexible GPIO (implements `TriStatePin`)
//! - Blocking ADC conversions (implements `AdcReader`)
//! - Buffered UART operator console (implements `UartTx` / `UartRx`)
//! - Embassy uptime clock (implements `Clock`)
//! - Flash storage behind the core `RecordCache`
//!
//! The BNO055 bus and the motor PWM slices use embassy-rp's own
//! `embedded-hal` implementations directly.

#![no_std]
#![deny(unsafe_code)]

pub mod adc;
pub mod flash;
pub mod gpio;
pub mod time;
pub mod uart;

// Re-export shared types from teeter-hal for convenience
pub use teeter_hal::{StorageError, StorageKey};
