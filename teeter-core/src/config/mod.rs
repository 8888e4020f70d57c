//! Configuration types
//!
//! Compile-time tuning defaults and the text format of the calibration
//! records kept in persistent storage.

pub mod cache;
pub mod persist;
pub mod tuning;

pub use cache::RecordCache;
pub use persist::*;
pub use tuning::*;
