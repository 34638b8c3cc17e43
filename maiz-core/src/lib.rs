//! Board-agnostic state and configuration for the MAI-z driver
//!
//! This crate contains everything the driver keeps between bus exchanges
//! that does not depend on a transport:
//!
//! - Driver configuration (address, retry bounds, delays)
//! - Unit and colour conversion tables
//! - The device-state cache populated by RX decoding
//! - Cliff sensor debouncing

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod config;
pub mod safety;
pub mod state;
