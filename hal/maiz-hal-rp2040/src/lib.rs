//! RP2040 bindings for the MAI-z board driver
//!
//! This crate provides the RP2040-specific pieces the driver is generic over:
//!
//! - Blocking I2C bus construction (implements `maiz_hal::I2cBus` through
//!   embedded-hal)
//! - Cortex-M system reset (implements `maiz_hal::SystemReset`)
//! - Delay provider backed by the embassy time driver

#![no_std]

pub mod i2c;
pub mod reset;

pub use i2c::{new_bus, Rp2040Bus};
pub use reset::Rp2040Reset;

// Re-export shared traits from maiz-hal for convenience
pub use maiz_hal::{DelayNs, I2cBus, SystemReset};

/// Delay provider for the driver's retry and poll waits
pub type Rp2040Delay = embassy_time::Delay;
