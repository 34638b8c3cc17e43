//! Typed interpretation of RX responses
//!
//! Every RX command is answered with a frame echoing the command id.
//! The payload is interpreted by command id once the frame has been
//! validated.

use heapless::Vec;

use crate::commands::{CommandId, ErrorCode};
use crate::frame::{Frame, MAX_PARAMS};

/// Largest response the board sends (front distance)
pub const MAX_RESPONSE_SIZE: usize = 5;

/// Completion byte value while a motion command is still executing
const OUTSTANDING: u8 = 1;

/// Bits of the sensor bitmask returned by [`CommandId::Sensors`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum SensorFlag {
    LineLeft = 0x01,
    LineCentre = 0x02,
    LineRight = 0x04,
    Cliff = 0x08,
}

impl SensorFlag {
    pub const fn mask(self) -> u8 {
        self as u8
    }
}

/// A decoded response
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Response {
    /// Sensor bitmask, see [`SensorFlag`]
    Sensors(u8),
    /// Front distance in hundredths of a centimetre
    FrontDistance(u16),
    /// Error register
    Error(ErrorCode),
    /// Completion flag, `true` while a motion command is outstanding
    Done(bool),
    /// Comms reset acknowledgement
    CommsReset(u8),
    /// Firmware version
    Version(u8),
    /// Payload of a command with no typed interpretation
    Payload(Vec<u8, MAX_PARAMS>),
}

/// Validate a raw response against the command that was requested
pub fn decode(raw: &[u8], expected: CommandId) -> Result<Response, ErrorCode> {
    let frame = Frame::parse(raw)?;
    if frame.command != expected {
        return Err(ErrorCode::RxCommandError);
    }

    // parse() guarantees at least one payload byte
    let first = frame.params[0];
    match frame.command {
        CommandId::Sensors => Ok(Response::Sensors(first)),
        CommandId::FrontDistance => {
            let high = *frame.params.get(1).ok_or(ErrorCode::ReadError)?;
            Ok(Response::FrontDistance(u16::from_le_bytes([first, high])))
        }
        CommandId::Error => ErrorCode::from_byte(first)
            .map(Response::Error)
            .ok_or(ErrorCode::InvalidData),
        CommandId::Done => Ok(Response::Done(first == OUTSTANDING)),
        CommandId::CommsReset => Ok(Response::CommsReset(first)),
        CommandId::Version => Ok(Response::Version(first)),
        CommandId::Move
        | CommandId::Spin
        | CommandId::Stop
        | CommandId::GradualStop
        | CommandId::SetAllLeds
        | CommandId::SetLed
        | CommandId::SetBrightness
        | CommandId::Indicator
        | CommandId::BrakeLight
        | CommandId::AutoCliff
        | CommandId::Horn
        | CommandId::Start => Ok(Response::Payload(frame.params)),
    }
}
