//! Unit conversions and input clamping
//!
//! The board always works in hundredths of a centimetre. The units
//! preference only changes how caller-facing distances are converted.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Hundredths per whole unit on the wire
pub const RAW_PER_UNIT: u32 = 100;

/// Centimetres per inch, ×100
const CM_PER_INCH_X100: u32 = 254;

/// Full-scale brightness value understood by the board
pub const BRIGHTNESS_MAX: u32 = 128;

/// Caller-selected distance units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Units {
    #[default]
    Centimetres,
    Inches,
}

impl Units {
    /// Convert a distance in whole units to the raw wire value
    ///
    /// Imperial distances are scaled by 2.54 and truncated.
    pub fn to_raw(self, distance: u16) -> u32 {
        let raw = distance as u32 * RAW_PER_UNIT;
        match self {
            Units::Centimetres => raw,
            Units::Inches => raw * CM_PER_INCH_X100 / RAW_PER_UNIT,
        }
    }

    /// Convert a raw reading (hundredths of a cm) to whole units, truncated
    pub fn from_raw(self, raw: u16) -> u16 {
        match self {
            Units::Centimetres => (raw as u32 / RAW_PER_UNIT) as u16,
            Units::Inches => (raw as u32 / CM_PER_INCH_X100) as u16,
        }
    }
}

/// Clamp a speed or brightness percentage to 1..=100
pub fn clamp_percent(value: i32) -> u8 {
    value.clamp(1, 100) as u8
}

/// Scale a brightness percentage to the board range 0..=128
pub fn brightness_to_device(percent: i32) -> u8 {
    (clamp_percent(percent) as u32 * BRIGHTNESS_MAX / 100) as u8
}
