//! Command identifiers, error codes and parameter enums
//!
//! Commands fall into two categories:
//! - TX: actuation, written and never answered directly
//! - RX: an empty request followed by a fixed-size response

/// Command identifier carried in the second byte of every frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum CommandId {
    // Motion
    Move = 0x01,
    Spin = 0x02,
    Stop = 0x03,
    GradualStop = 0x04,
    // Lights
    SetAllLeds = 0x10,
    SetLed = 0x11,
    SetBrightness = 0x12,
    Indicator = 0x13,
    BrakeLight = 0x14,
    // Sensing
    Sensors = 0x20,
    FrontDistance = 0x21,
    AutoCliff = 0x22,
    Horn = 0x30,
    // Diagnostics
    Error = 0x40,
    Done = 0x41,
    CommsReset = 0x42,
    Version = 0x43,
    // Lifecycle
    Start = 0x60,
}

/// Direction of a command exchange
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommandKind {
    /// Write only
    Tx,
    /// Write an empty request, then read the response
    Rx,
}

impl CommandId {
    /// Every command, in wire order
    pub const ALL: [CommandId; 18] = [
        CommandId::Move,
        CommandId::Spin,
        CommandId::Stop,
        CommandId::GradualStop,
        CommandId::SetAllLeds,
        CommandId::SetLed,
        CommandId::SetBrightness,
        CommandId::Indicator,
        CommandId::BrakeLight,
        CommandId::Sensors,
        CommandId::FrontDistance,
        CommandId::AutoCliff,
        CommandId::Horn,
        CommandId::Error,
        CommandId::Done,
        CommandId::CommsReset,
        CommandId::Version,
        CommandId::Start,
    ];

    pub const fn to_byte(self) -> u8 {
        self as u8
    }

    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0x01 => Some(CommandId::Move),
            0x02 => Some(CommandId::Spin),
            0x03 => Some(CommandId::Stop),
            0x04 => Some(CommandId::GradualStop),
            0x10 => Some(CommandId::SetAllLeds),
            0x11 => Some(CommandId::SetLed),
            0x12 => Some(CommandId::SetBrightness),
            0x13 => Some(CommandId::Indicator),
            0x14 => Some(CommandId::BrakeLight),
            0x20 => Some(CommandId::Sensors),
            0x21 => Some(CommandId::FrontDistance),
            0x22 => Some(CommandId::AutoCliff),
            0x30 => Some(CommandId::Horn),
            0x40 => Some(CommandId::Error),
            0x41 => Some(CommandId::Done),
            0x42 => Some(CommandId::CommsReset),
            0x43 => Some(CommandId::Version),
            0x60 => Some(CommandId::Start),
            _ => None,
        }
    }

    /// Whether this command is fire-and-forget or request/response
    pub const fn kind(self) -> CommandKind {
        match self {
            CommandId::Sensors
            | CommandId::FrontDistance
            | CommandId::Error
            | CommandId::Done
            | CommandId::CommsReset
            | CommandId::Version => CommandKind::Rx,
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
            | CommandId::Start => CommandKind::Tx,
        }
    }

    /// Number of bytes the board sends back for an RX command
    ///
    /// The front distance reading carries a 16-bit value, everything else
    /// a single payload byte.
    pub const fn response_len(self) -> usize {
        match self {
            CommandId::FrontDistance => 5,
            _ => 4,
        }
    }
}

/// Status codes, as reported by the board's error register or produced
/// locally when a response fails validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ErrorCode {
    #[default]
    None,
    Timeout,
    TxChecksum,
    UnknownCommand,
    InvalidData,
    /// Response was shorter than a minimal frame
    ReadError,
    /// Response checksum did not match (host side only)
    RxChecksumError,
    /// Response answered a different command (host side only)
    RxCommandError,
    /// Start key interlock tripped, only a host restart recovers
    StartKeyInterlock,
    /// Cliff sensor lockout is active
    CliffDetected,
}

impl ErrorCode {
    /// Parse a code from the board's error register
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0 => Some(ErrorCode::None),
            1 => Some(ErrorCode::Timeout),
            2 => Some(ErrorCode::TxChecksum),
            3 => Some(ErrorCode::UnknownCommand),
            4 => Some(ErrorCode::InvalidData),
            5 => Some(ErrorCode::ReadError),
            6 => Some(ErrorCode::StartKeyInterlock),
            7 => Some(ErrorCode::CliffDetected),
            _ => None,
        }
    }

    /// Wire value, or `None` for codes that only exist on the host
    pub fn to_byte(self) -> Option<u8> {
        match self {
            ErrorCode::None => Some(0),
            ErrorCode::Timeout => Some(1),
            ErrorCode::TxChecksum => Some(2),
            ErrorCode::UnknownCommand => Some(3),
            ErrorCode::InvalidData => Some(4),
            ErrorCode::ReadError => Some(5),
            ErrorCode::StartKeyInterlock => Some(6),
            ErrorCode::CliffDetected => Some(7),
            ErrorCode::RxChecksumError | ErrorCode::RxCommandError => None,
        }
    }

    pub fn is_ok(self) -> bool {
        self == ErrorCode::None
    }
}

/// Straight-line motion direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum MoveDirection {
    Forwards = 1,
    Backwards = 2,
}

/// On-the-spot rotation direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum SpinDirection {
    Right = 1,
    Left = 2,
}

/// Which indicator lamp(s) a command addresses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum IndicatorSide {
    Left = 1,
    Right = 2,
    Both = 3,
}
