//! Last observed board state
//!
//! One `DeviceState` lives for the whole session and is owned by the
//! driver instance; nothing here is global.

use maiz_protocol::{ErrorCode, Response, SensorFlag};

use crate::config::Units;
use crate::safety::CliffFilter;

/// Cached board state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceState {
    /// Last error register value or local decode failure
    pub error: ErrorCode,
    /// A motion command is still executing on the board
    pub command_outstanding: bool,
    /// Last sensor bitmask
    pub sensors: u8,
    /// Raw cliff bit from the last sensor read
    pub cliff_raw: bool,
    /// Debounced cliff status
    pub cliff: CliffFilter,
    /// Front distance in hundredths of a centimetre
    pub front_distance: u16,
    /// Automatic cliff detection is enabled on the board
    pub auto_cliff_enabled: bool,
    /// Caller's distance units
    pub units: Units,
    /// Board firmware version
    pub firmware_version: u8,
    /// Last comms reset acknowledgement
    pub comms_reset_ack: u8,
}

impl DeviceState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a successfully decoded response
    pub fn apply(&mut self, response: &Response) {
        match response {
            Response::Sensors(mask) => {
                self.sensors = *mask;
                self.cliff_raw = mask & SensorFlag::Cliff.mask() != 0;
            }
            Response::FrontDistance(raw) => self.front_distance = *raw,
            Response::Error(code) => self.error = *code,
            Response::Done(outstanding) => self.command_outstanding = *outstanding,
            Response::CommsReset(ack) => self.comms_reset_ack = *ack,
            Response::Version(version) => self.firmware_version = *version,
            Response::Payload(_) => {}
        }
    }

    /// Record a response that failed validation
    pub fn record_failure(&mut self, code: ErrorCode) {
        self.error = code;
    }

    /// Test one line-follow sensor against the cached bitmask
    pub fn sensor(&self, flag: SensorFlag) -> bool {
        self.sensors & flag.mask() != 0
    }

    /// Front distance in the caller's units
    pub fn front_distance_in_units(&self) -> u16 {
        self.units.from_raw(self.front_distance)
    }
}
