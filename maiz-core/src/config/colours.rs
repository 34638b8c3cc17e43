//! Colour lookup table
//!
//! The board only knows a handful of palette ids. 24-bit RGB values are
//! mapped through a fixed table; anything not listed turns the LED off.

/// Common RGB values accepted by the LED commands
pub mod rgb {
    pub const OFF: u32 = 0x00_0000;
    pub const GREEN: u32 = 0x00_FF00;
    pub const YELLOW: u32 = 0xFF_FF00;
    pub const CYAN: u32 = 0x00_FFFF;
    pub const BLUE: u32 = 0x00_00FF;
    pub const MAGENTA: u32 = 0xFF_00FF;
}

/// Palette id meaning "off"
pub const COLOUR_OFF_ID: u8 = 0;

/// RGB value → board palette id
pub const COLOUR_TABLE: [(u32, u8); 6] = [
    (rgb::GREEN, 5),
    (rgb::YELLOW, 3),
    (rgb::CYAN, 7),
    (rgb::BLUE, 10),
    (rgb::MAGENTA, 13),
    (rgb::OFF, COLOUR_OFF_ID),
];

/// Look up the board palette id for an RGB value
pub fn colour_id(colour: u32) -> u8 {
    COLOUR_TABLE
        .iter()
        .find(|(rgb, _)| *rgb == colour)
        .map(|&(_, id)| id)
        .unwrap_or(COLOUR_OFF_ID)
}
