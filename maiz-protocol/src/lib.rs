//! MAI-z accessory board protocol
//!
//! This crate defines the I2C message format between the host
//! microcontroller and the MAI-z motor board. The board sits at a single
//! fixed 7-bit address and every exchange is a short framed message.
//!
//! # Protocol Overview
//!
//! Requests and responses share one frame format:
//! ```text
//! ┌────────┬─────────┬─────────────┬──────────┐
//! │ LENGTH │ COMMAND │ PAYLOAD     │ CHECKSUM │
//! │ 1B     │ 1B      │ 0–16B       │ 1B       │
//! └────────┴─────────┴─────────────┴──────────┘
//! ```
//!
//! The checksum is the one's complement of the byte sum of everything
//! before it. Actuation commands are written and forgotten; sensor and
//! diagnostic commands write an empty request and read back a fixed-size
//! response (4 bytes, or 5 for the front distance measurement).

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod commands;
pub mod frame;
pub mod response;

pub use commands::{
    CommandId, CommandKind, ErrorCode, IndicatorSide, MoveDirection, SpinDirection,
};
pub use frame::{
    checksum, encode, int_to_le_bytes, Frame, FrameError, MAX_FRAME_SIZE, MAX_PARAMS,
};
pub use response::{decode, Response, SensorFlag, MAX_RESPONSE_SIZE};

/// 7-bit I2C address of the accessory board
pub const DEVICE_ADDRESS: u8 = 0x17;
