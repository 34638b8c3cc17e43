//! Safety sensing
//!
//! Debounces the cliff sensor before it is reported to callers.

pub mod cliff;

pub use cliff::{CliffFilter, CLIFF_CLEAR_READINGS};
