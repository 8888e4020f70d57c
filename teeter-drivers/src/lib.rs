//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in teeter-core for the platform's hardware:
//!
//! - BNO055 absolute orientation sensor (I2C)
//! - Four-wire resistive touch panel (GPIO + ADC)
//! - H-bridge DC motor on two PWM channels

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod bno055;
pub mod motor;
pub mod touch;
