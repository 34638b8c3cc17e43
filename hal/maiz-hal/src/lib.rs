//! MAI-z Hardware Abstraction Layer
//!
//! This crate defines the host-side services the board driver needs, so the
//! same driver runs on any microcontroller with an `embedded-hal` I2C bus.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  maiz-driver (retry engine, facade)     │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  maiz-hal (this crate - traits)         │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │ maiz-hal-     │       │ any embedded- │
//! │    rp2040     │       │ hal I2C impl  │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`i2c::I2cBus`] - scan/write/read at a 7-bit address
//! - [`i2c::BusError`] - "device not present" vs. bus fault
//! - [`reset::SystemReset`] - full host restart
//!
//! Delays use [`embedded_hal::delay::DelayNs`] directly.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod i2c;
pub mod reset;

// Re-export key traits at crate root for convenience
pub use embedded_hal::delay::DelayNs;
pub use i2c::{BusError, I2cBus, I2cConfig, MAX_SCAN_RESULTS};
pub use reset::SystemReset;
