//! Operator Console Protocol
//!
//! This crate defines the single-character command protocol spoken over the
//! platform's serial console, the line editor used for numeric entry, and
//! the row format of recorded data.
//!
//! # Protocol Overview
//!
//! ```text
//! ┌─────┬─────────────────────────────┬──────────────────────────────┐
//! │ KEY │ ACTION                      │ FOLLOW-UP                    │
//! ├─────┼─────────────────────────────┼──────────────────────────────┤
//! │ p P │ print position and angles   │                              │
//! │ v V │ print angular rates         │                              │
//! │ m   │ set motor 1 duty            │ number + Enter, ±100 %       │
//! │ M   │ set motor 2 duty            │ number + Enter, ±100 %       │
//! │ g G │ start recording             │ stops itself after 1001 rows │
//! │ s S │ stop recording and dump     │                              │
//! │ k K │ enter cascade gains         │ six numbers, each + Enter    │
//! │ w W │ toggle closed-loop control  │                              │
//! │ h H │ print help                  │                              │
//! │ ^C  │ terminate the scheduler     │                              │
//! └─────┴─────────────────────────────┴──────────────────────────────┘
//! ```
//!
//! Numbers accept digits, one leading `-`, one `.`, and backspace. Enter
//! (`\r` or `\n`) commits.

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod command;
pub mod entry;
pub mod gains;
pub mod record;

pub use command::{Command, HELP_TEXT};
pub use entry::{clamp_duty, EntryEvent, NumberEntry, DUTY_LIMIT};
pub use gains::{CascadeGains, GainEntry, GainField, PidGains};
pub use record::{Sample, RECORD_HEADER};
