//! Driver configuration
//!
//! The defaults reproduce the timing the board firmware was tuned against.
//! All delays are cooperative waits between exchanges, not timeouts.

use maiz_protocol::DEVICE_ADDRESS;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Retries per exchange after the first attempt
pub const DEFAULT_MAX_RETRIES: u8 = 3;

/// Presence-scan attempts made by `init`
pub const DEFAULT_INIT_RETRIES: u8 = 8;

/// Wait between presence-scan attempts (ms)
pub const DEFAULT_INIT_DELAY_MS: u32 = 120;

/// Driver configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DriverConfig {
    /// 7-bit bus address of the board
    pub address: u8,
    /// Retries per exchange; an exchange makes at most `max_retries + 1` attempts
    pub max_retries: u8,
    /// Wait after the board failed to acknowledge its address (ms)
    pub absent_retry_delay_ms: u32,
    /// Wait after the board reported a protocol error (ms)
    pub protocol_retry_delay_ms: u32,
    /// Error register poll interval during a cliff lockout (ms)
    pub cliff_poll_ms: u32,
    /// Pause once a cliff lockout clears, before resuming (ms, 0 = none)
    pub cliff_clear_pause_ms: u32,
    /// Completion flag poll interval (ms)
    pub completion_poll_ms: u32,
    /// Maximum completion polls per motion command (`None` = unbounded)
    pub completion_poll_limit: Option<u32>,
    /// Wait after motion commands for the mechanics to settle (ms)
    pub settle_ms: u32,
    /// Presence-scan attempts made by `init`
    pub init_retries: u8,
    /// Wait between presence-scan attempts (ms)
    pub init_delay_ms: u32,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            address: DEVICE_ADDRESS,
            max_retries: DEFAULT_MAX_RETRIES,
            absent_retry_delay_ms: 20,
            protocol_retry_delay_ms: 5,
            cliff_poll_ms: 5,
            cliff_clear_pause_ms: 0,
            completion_poll_ms: 10,
            completion_poll_limit: None,
            settle_ms: 100,
            init_retries: DEFAULT_INIT_RETRIES,
            init_delay_ms: DEFAULT_INIT_DELAY_MS,
        }
    }
}

impl DriverConfig {
    /// Bound the completion poll
    pub fn with_completion_poll_limit(mut self, limit: u32) -> Self {
        self.completion_poll_limit = Some(limit);
        self
    }

    /// Total attempts one exchange may make before it is abandoned
    pub fn max_attempts(&self) -> u32 {
        self.max_retries as u32 + 1
    }
}
