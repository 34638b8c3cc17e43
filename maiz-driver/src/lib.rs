//! Blocking driver for the MAI-z robot accessory board
//!
//! The board is a motor and LED controller on the host's I2C bus. This
//! crate provides:
//!
//! - [`comms::Link`]: one logical command per call, with bounded retries,
//!   an error-register poll after every exchange, the cliff lockout loop and
//!   the start-key restart
//! - [`device::MaiZ`]: typed, unit-converting operations (motion, lights,
//!   sensors, configuration) built on the link
//!
//! Everything is blocking and single-threaded. Waits go through the
//! caller-supplied [`maiz_hal::DelayNs`].
//!
//! # Usage
//!
//! ```ignore
//! let mut robot = MaiZ::new(i2c, delay, reset);
//! if robot.init()? {
//!     robot.move_distance(MoveDirection::Forwards, 60, 10)?;
//!     robot.rotate_angle(0.25, 40)?;
//!     robot.set_leds(rgb::GREEN)?;
//! }
//! ```

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

#[macro_use]
mod fmt;

pub mod comms;
pub mod device;

#[cfg(test)]
mod mock;

pub use comms::{CommsError, Link, Outcome};
pub use device::MaiZ;

pub use maiz_core::config::{rgb, DriverConfig, Units};
pub use maiz_core::state::DeviceState;
pub use maiz_protocol::{ErrorCode, IndicatorSide, MoveDirection, SensorFlag, SpinDirection};
