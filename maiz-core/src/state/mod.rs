//! Device-state cache
//!
//! Holds the last observed board state. Fields are only overwritten by a
//! successfully decoded response; the error field additionally records
//! responses that failed validation.

pub mod cache;

pub use cache::DeviceState;
