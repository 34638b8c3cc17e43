//! Configuration types
//!
//! Driver settings plus the fixed conversion tables the board expects.

pub mod colours;
pub mod types;
pub mod units;

pub use colours::{colour_id, rgb, COLOUR_TABLE};
pub use types::*;
pub use units::{brightness_to_device, clamp_percent, Units};
