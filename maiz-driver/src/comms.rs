//! Retry and escalation engine
//!
//! [`Link::exchange`] runs one logical command against the board:
//!
//! ```text
//!            ┌──────────── retry (attempts += 1) ─────────────┐
//!            ▼                                                │
//!   ┌─────────────────┐  device absent / other error   ┌────────────┐
//!   │ Attempt         │──────────────────────────────▶│ backoff    │
//!   │ (TX or RX,      │                                └────────────┘
//!   │  then poll the  │  None ───────────▶ Completed
//!   │  error register)│  StartKeyInterlock ─▶ host reset (no return)
//!   └─────────────────┘  CliffDetected ─▶ lockout loop, attempts = 0
//!                        attempts > max_retries ─▶ Abandoned
//! ```
//!
//! The error-register poll follows every attempt, whether or not the
//! attempt itself looked fine. Only a transport fault other than "device
//! not present" is returned as an error.

use maiz_core::config::DriverConfig;
use maiz_core::state::DeviceState;
use maiz_hal::{BusError, DelayNs, I2cBus, SystemReset};
use maiz_protocol::{
    decode, encode, CommandId, CommandKind, ErrorCode, Frame, FrameError, MAX_RESPONSE_SIZE,
};

/// Result of a logical operation that did not hit a transport fault
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Outcome {
    /// The board accepted the command (and finished it, if it was waited on)
    Completed,
    /// Every retry failed; the command may not have taken effect
    Abandoned,
    /// The completion poll hit the configured limit while still outstanding
    PollLimit,
}

impl Outcome {
    pub fn is_completed(self) -> bool {
        self == Outcome::Completed
    }

    /// The first non-completed outcome of a two-step operation
    pub fn and(self, next: Outcome) -> Outcome {
        match self {
            Outcome::Completed => next,
            Outcome::Abandoned | Outcome::PollLimit => self,
        }
    }
}

/// Failures surfaced to the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommsError<E> {
    /// The bus itself failed; nothing is retried
    Bus(E),
    /// Params did not fit in a frame
    Frame(FrameError),
}

/// Exclusive handle on the board's bus, delay and host reset
pub struct Link<BUS, DELAY, RESET> {
    bus: BUS,
    delay: DELAY,
    reset: RESET,
    config: DriverConfig,
}

impl<BUS, DELAY, RESET> Link<BUS, DELAY, RESET>
where
    BUS: I2cBus,
    DELAY: DelayNs,
    RESET: SystemReset,
{
    pub fn new(bus: BUS, delay: DELAY, reset: RESET, config: DriverConfig) -> Self {
        Self {
            bus,
            delay,
            reset,
            config,
        }
    }

    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    /// Give back the owned peripherals
    pub fn release(self) -> (BUS, DELAY, RESET) {
        (self.bus, self.delay, self.reset)
    }

    /// Cooperative wait
    pub fn delay_ms(&mut self, ms: u32) {
        if ms > 0 {
            self.delay.delay_ms(ms);
        }
    }

    /// Whether the board answers an address scan
    ///
    /// A failing scan reads as "not connected".
    pub fn is_connected(&mut self) -> bool {
        match self.bus.scan() {
            Ok(found) => found.contains(&self.config.address),
            Err(_) => false,
        }
    }

    /// Send the start-key/wake command once, without retries or polling
    pub fn send_start(&mut self) -> Result<(), CommsError<BUS::Error>> {
        let request = encode(CommandId::Start, &[]).map_err(CommsError::Frame)?;
        self.bus
            .write(self.config.address, &request)
            .map_err(CommsError::Bus)
    }

    /// Run one logical command with retries and escalation
    ///
    /// RX responses are decoded into `state`. The error register is polled
    /// into `state` after every attempt. On `StartKeyInterlock` the host is
    /// reset and this never returns.
    pub fn exchange(
        &mut self,
        state: &mut DeviceState,
        command: CommandId,
        params: &[u8],
    ) -> Result<Outcome, CommsError<BUS::Error>> {
        let request = encode(command, params).map_err(CommsError::Frame)?;
        let mut attempts: u32 = 0;

        while attempts <= self.config.max_retries as u32 {
            let rejected = match self.attempt(state, command, &request) {
                Ok(rejected) => rejected,
                Err(e) if e.is_device_absent() => {
                    attempts += 1;
                    debug!("{:?}: board not present, attempt {}", command, attempts);
                    self.delay_ms(self.config.absent_retry_delay_ms);
                    continue;
                }
                Err(e) => return Err(CommsError::Bus(e)),
            };

            // A rejected response stays visible unless the board reported worse
            if let Some(code) = rejected {
                if state.error.is_ok() {
                    state.record_failure(code);
                }
            }

            match state.error {
                ErrorCode::None => return Ok(Outcome::Completed),
                ErrorCode::StartKeyInterlock => {
                    error!("Start key interlock during {:?}, restarting", command);
                    self.reset.reset()
                }
                ErrorCode::CliffDetected => {
                    self.cliff_lockout(state)?;
                    attempts = 0;
                }
                ErrorCode::Timeout
                | ErrorCode::TxChecksum
                | ErrorCode::UnknownCommand
                | ErrorCode::InvalidData
                | ErrorCode::ReadError
                | ErrorCode::RxChecksumError
                | ErrorCode::RxCommandError => {
                    attempts += 1;
                    debug!("{:?}: {:?}, attempt {}", command, state.error, attempts);
                    self.delay_ms(self.config.protocol_retry_delay_ms);
                }
            }
        }

        warn!("{:?} abandoned after {} attempts", command, attempts);
        Ok(Outcome::Abandoned)
    }

    /// One transport operation followed by the error-register poll
    ///
    /// Returns the code of a rejected RX response, if the primary exchange
    /// was an RX that failed validation.
    fn attempt(
        &mut self,
        state: &mut DeviceState,
        command: CommandId,
        request: &[u8],
    ) -> Result<Option<ErrorCode>, BUS::Error> {
        let rejected = match command.kind() {
            CommandKind::Tx => {
                self.bus.write(self.config.address, request)?;
                None
            }
            CommandKind::Rx => self.receive(state, command)?,
        };
        // A failed error poll is already recorded in the cache
        let _ = self.receive(state, CommandId::Error)?;
        Ok(rejected)
    }

    /// Request an RX command and decode the answer into the cache
    ///
    /// A response that fails validation is recorded in the error field and
    /// its code returned.
    fn receive(
        &mut self,
        state: &mut DeviceState,
        command: CommandId,
    ) -> Result<Option<ErrorCode>, BUS::Error> {
        let mut request = [0u8; 3];
        // An empty request always fits
        let _ = Frame::request(command).encode(&mut request);
        self.bus.write(self.config.address, &request)?;

        let mut response = [0u8; MAX_RESPONSE_SIZE];
        let len = command.response_len();
        self.bus.read(self.config.address, &mut response[..len])?;

        match decode(&response[..len], command) {
            Ok(decoded) => {
                state.apply(&decoded);
                Ok(None)
            }
            Err(code) => {
                debug!("{:?} response rejected: {:?}", command, code);
                state.record_failure(code);
                Ok(Some(code))
            }
        }
    }

    /// Block until the board stops reporting a cliff
    ///
    /// The error register is re-polled every `cliff_poll_ms`. A missing
    /// board or a rejected response is polled through; a bus fault ends the
    /// lockout with an error.
    fn cliff_lockout(&mut self, state: &mut DeviceState) -> Result<(), CommsError<BUS::Error>> {
        warn!("Cliff detected, holding until clear");
        while state.error == ErrorCode::CliffDetected {
            self.delay_ms(self.config.cliff_poll_ms);
            match self.receive(state, CommandId::Error) {
                Ok(None) => {}
                // Only a valid reading can end the lockout
                Ok(Some(_)) => state.error = ErrorCode::CliffDetected,
                Err(e) if e.is_device_absent() => {}
                Err(e) => return Err(CommsError::Bus(e)),
            }
        }
        info!("Cliff cleared");
        self.delay_ms(self.config.cliff_clear_pause_ms);
        Ok(())
    }
}
