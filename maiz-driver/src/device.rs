//! MAI-z board facade
//!
//! This driver provides:
//! - Straight-line moves and rotations in caller units, waiting for the
//!   board to report completion
//! - LED, indicator, brake light and buzzer control
//! - Line-follow, cliff and front distance sensing
//! - Start-up with a bounded presence scan
//!
//! Every operation is one or more [`Link::exchange`] calls, so they all
//! share the same retry and escalation behaviour. Apart from `init`, failures
//! are reported through [`Outcome`] and the cached [`DeviceState`] rather
//! than as errors.
//!
//! # Waiting
//!
//! Moves with a nonzero distance, rotations by angle and gradual stops poll
//! the board's completion flag every `completion_poll_ms`. The poll has no
//! upper bound unless `completion_poll_limit` is configured: a board that
//! stops answering after accepting a move keeps the caller waiting.

use maiz_core::config::{brightness_to_device, clamp_percent, colour_id, DriverConfig, Units};
use maiz_core::state::DeviceState;
use maiz_hal::{BusError, DelayNs, I2cBus, SystemReset};
use maiz_protocol::{
    int_to_le_bytes, CommandId, ErrorCode, IndicatorSide, MoveDirection, SensorFlag,
    SpinDirection,
};

use crate::comms::{CommsError, Link, Outcome};

/// Wire value for a continuous (unbounded) move
const CONTINUOUS: u8 = 0;

/// MAI-z board session
///
/// Owns the bus, the delay provider, the host reset and all cached board
/// state. Independent instances share nothing.
pub struct MaiZ<BUS, DELAY, RESET> {
    link: Link<BUS, DELAY, RESET>,
    state: DeviceState,
}

impl<BUS, DELAY, RESET> MaiZ<BUS, DELAY, RESET>
where
    BUS: I2cBus,
    DELAY: DelayNs,
    RESET: SystemReset,
{
    /// Create a session with the default configuration
    pub fn new(bus: BUS, delay: DELAY, reset: RESET) -> Self {
        Self::with_config(bus, delay, reset, DriverConfig::default())
    }

    pub fn with_config(bus: BUS, delay: DELAY, reset: RESET, config: DriverConfig) -> Self {
        Self {
            link: Link::new(bus, delay, reset, config),
            state: DeviceState::new(),
        }
    }

    /// Cached board state
    pub fn state(&self) -> &DeviceState {
        &self.state
    }

    pub fn config(&self) -> &DriverConfig {
        self.link.config()
    }

    /// End the session and give back the peripherals
    pub fn release(self) -> (BUS, DELAY, RESET) {
        self.link.release()
    }

    // Lifecycle

    /// Whether the board answers an address scan
    pub fn is_connected(&mut self) -> bool {
        self.link.is_connected()
    }

    /// Wake the board using the configured retry count and delay
    pub fn init(&mut self) -> Result<bool, CommsError<BUS::Error>> {
        let config = *self.link.config();
        self.init_with_retries(config.init_retries, config.init_delay_ms)
    }

    /// Scan for the board and send the start command
    ///
    /// Returns `Ok(false)` if the board never answered within `retries`
    /// attempts. This is the only operation that reports failure directly.
    pub fn init_with_retries(
        &mut self,
        retries: u8,
        delay_ms: u32,
    ) -> Result<bool, CommsError<BUS::Error>> {
        for _ in 0..retries {
            if self.link.is_connected() {
                match self.link.send_start() {
                    Ok(()) => {
                        info!("MAI-z board started");
                        return Ok(true);
                    }
                    Err(CommsError::Bus(e)) if e.is_device_absent() => {}
                    Err(e) => return Err(e),
                }
            }
            self.link.delay_ms(delay_ms);
        }
        warn!("MAI-z board not found after {} attempts", retries);
        Ok(false)
    }

    /// Choose the units used by distance arguments and readings
    pub fn select_units(&mut self, units: Units) {
        self.state.units = units;
    }

    // Motion

    /// Drive straight for `distance` whole units, or continuously if 0
    ///
    /// Speed is a percentage clamped to 1..=100. A bounded move waits for
    /// the board to finish it.
    pub fn move_distance(
        &mut self,
        direction: MoveDirection,
        speed: i32,
        distance: u16,
    ) -> Result<Outcome, CommsError<BUS::Error>> {
        let speed = clamp_percent(speed);
        let raw = self.state.units.to_raw(distance);

        let outcome = if raw == 0 {
            self.send(CommandId::Move, &[direction as u8, speed, CONTINUOUS])?
        } else {
            let params = motion_params(direction as u8, speed, raw);
            let sent = self.send(CommandId::Move, &params)?;
            sent.and(self.wait_for_completion()?)
        };

        self.settle();
        Ok(outcome)
    }

    /// Rotate on the spot by `ratio` of a full turn
    ///
    /// Positive ratios turn right, negative left. The magnitude is sent in
    /// hundredths. A zero magnitude sends nothing.
    pub fn rotate_angle(
        &mut self,
        ratio: f32,
        speed: i32,
    ) -> Result<Outcome, CommsError<BUS::Error>> {
        let speed = clamp_percent(speed);
        let direction = if ratio > 0.0 {
            SpinDirection::Right
        } else {
            SpinDirection::Left
        };
        let magnitude = if ratio < 0.0 { -ratio } else { ratio };
        // Float to int casts saturate, NaN becomes 0
        let raw = (magnitude * 100.0) as u32;
        if raw == 0 {
            return Ok(Outcome::Completed);
        }

        let params = motion_params(direction as u8, speed, raw);
        let sent = self.send(CommandId::Spin, &params)?;
        let outcome = sent.and(self.wait_for_completion()?);

        self.settle();
        Ok(outcome)
    }

    /// Spin until told otherwise
    pub fn rotate_continuous(
        &mut self,
        direction: SpinDirection,
        speed: i32,
    ) -> Result<Outcome, CommsError<BUS::Error>> {
        let speed = clamp_percent(speed);
        self.send(CommandId::Spin, &[direction as u8, speed, CONTINUOUS])
    }

    /// Stop both motors immediately
    pub fn stop(&mut self) -> Result<Outcome, CommsError<BUS::Error>> {
        let outcome = self.send(CommandId::Stop, &[])?;
        self.settle();
        Ok(outcome)
    }

    /// Ramp both motors down and wait until they have stopped
    pub fn gradual_stop(&mut self) -> Result<Outcome, CommsError<BUS::Error>> {
        let sent = self.send(CommandId::GradualStop, &[])?;
        let outcome = sent.and(self.wait_for_completion()?);
        self.settle();
        Ok(outcome)
    }

    // Lights and sound

    /// Set every LED to an RGB colour (unknown colours turn LEDs off)
    pub fn set_leds(&mut self, colour: u32) -> Result<Outcome, CommsError<BUS::Error>> {
        self.send(CommandId::SetAllLeds, &[colour_id(colour)])
    }

    /// Set one LED to an RGB colour
    pub fn set_led(
        &mut self,
        index: u8,
        colour: u32,
    ) -> Result<Outcome, CommsError<BUS::Error>> {
        self.send(CommandId::SetLed, &[index, colour_id(colour)])
    }

    /// LED brightness as a percentage, clamped to 1..=100
    pub fn set_led_brightness(
        &mut self,
        percent: i32,
    ) -> Result<Outcome, CommsError<BUS::Error>> {
        self.send(CommandId::SetBrightness, &[brightness_to_device(percent)])
    }

    pub fn set_indicator(
        &mut self,
        side: IndicatorSide,
        on: bool,
    ) -> Result<Outcome, CommsError<BUS::Error>> {
        self.send(CommandId::Indicator, &[side as u8, on as u8])
    }

    pub fn set_brake_light(&mut self, on: bool) -> Result<Outcome, CommsError<BUS::Error>> {
        self.send(CommandId::BrakeLight, &[on as u8])
    }

    pub fn sound_buzzer(&mut self) -> Result<Outcome, CommsError<BUS::Error>> {
        self.send(CommandId::Horn, &[])
    }

    // Sensing

    /// Whether a line-follow sensor currently sees the line
    pub fn line_follow_status(
        &mut self,
        sensor: SensorFlag,
    ) -> Result<bool, CommsError<BUS::Error>> {
        self.send(CommandId::Sensors, &[])?;
        Ok(self.state.sensor(sensor))
    }

    /// Debounced cliff status
    ///
    /// Each call is one reading. A detection reports `true` at once; the
    /// status only returns to `false` after three consecutive clear readings.
    /// An abandoned read leaves the filter untouched.
    pub fn cliff_detection_status(&mut self) -> Result<bool, CommsError<BUS::Error>> {
        if !self.send(CommandId::Sensors, &[])?.is_completed() {
            return Ok(self.state.cliff.is_active());
        }
        let raw = self.state.cliff_raw;
        Ok(self.state.cliff.update(raw))
    }

    /// Distance to the nearest obstacle ahead, in the selected units
    pub fn measure_front_distance(&mut self) -> Result<u16, CommsError<BUS::Error>> {
        self.send(CommandId::FrontDistance, &[])?;
        Ok(self.state.front_distance_in_units())
    }

    /// Enable or disable the board's own cliff stop
    pub fn auto_cliff_detection(
        &mut self,
        enable: bool,
    ) -> Result<Outcome, CommsError<BUS::Error>> {
        let outcome = self.send(CommandId::AutoCliff, &[enable as u8])?;
        if outcome.is_completed() {
            self.state.auto_cliff_enabled = enable;
        }
        Ok(outcome)
    }

    // Diagnostics

    /// Board firmware version
    pub fn software_version(&mut self) -> Result<u8, CommsError<BUS::Error>> {
        self.send(CommandId::Version, &[])?;
        Ok(self.state.firmware_version)
    }

    /// Reset the board's comms state, returning its acknowledgement
    pub fn reset_comms(&mut self) -> Result<u8, CommsError<BUS::Error>> {
        self.send(CommandId::CommsReset, &[])?;
        Ok(self.state.comms_reset_ack)
    }

    /// Poll the error register
    pub fn error_status(&mut self) -> Result<ErrorCode, CommsError<BUS::Error>> {
        self.send(CommandId::Error, &[])?;
        Ok(self.state.error)
    }

    // Internals

    fn send(
        &mut self,
        command: CommandId,
        params: &[u8],
    ) -> Result<Outcome, CommsError<BUS::Error>> {
        self.link.exchange(&mut self.state, command, params)
    }

    /// Poll the completion flag until the board reports nothing outstanding
    fn wait_for_completion(&mut self) -> Result<Outcome, CommsError<BUS::Error>> {
        let config = *self.link.config();
        let mut polls: u32 = 0;
        loop {
            let polled = self.send(CommandId::Done, &[])?;
            if !polled.is_completed() {
                // The cached flag is stale
                return Ok(polled);
            }
            self.link.delay_ms(config.completion_poll_ms);
            polls = polls.saturating_add(1);

            if !self.state.command_outstanding {
                return Ok(Outcome::Completed);
            }
            if let Some(limit) = config.completion_poll_limit {
                if polls >= limit {
                    warn!("Completion poll gave up after {} polls", polls);
                    return Ok(Outcome::PollLimit);
                }
            }
        }
    }

    fn settle(&mut self) {
        let settle_ms = self.link.config().settle_ms;
        self.link.delay_ms(settle_ms);
    }
}

/// `[direction, speed, distance LE…]`
fn motion_params(direction: u8, speed: u8, raw: u32) -> heapless::Vec<u8, 6> {
    let mut params = heapless::Vec::new();
    // 2 + at most 4 distance bytes
    let _ = params.push(direction);
    let _ = params.push(speed);
    let _ = params.extend_from_slice(&int_to_le_bytes(raw));
    params
}
