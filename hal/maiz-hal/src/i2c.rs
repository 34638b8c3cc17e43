//! I2C bus abstractions
//!
//! Every `embedded_hal::i2c::I2c` implementation is an [`I2cBus`]; the only
//! addition over embedded-hal is an address scan and the classification of
//! errors into "device not present" and everything else.

use embedded_hal::i2c::{Error, ErrorKind, I2c};
use heapless::Vec;

/// First and last addresses probed by a scan (reserved ranges excluded)
const SCAN_FIRST: u8 = 0x08;
const SCAN_LAST: u8 = 0x77;

/// Upper bound on the number of addresses a scan can report
pub const MAX_SCAN_RESULTS: usize = (SCAN_LAST - SCAN_FIRST + 1) as usize;

/// Classification of bus errors
///
/// A device that does not acknowledge its address is a transient condition
/// the driver retries. Any other error means the bus itself is unusable.
pub trait BusError {
    fn is_device_absent(&self) -> bool;
}

impl<E: Error> BusError for E {
    fn is_device_absent(&self) -> bool {
        matches!(self.kind(), ErrorKind::NoAcknowledge(_))
    }
}

/// I2C bus master
///
/// Provides the three primitives the board driver uses.
pub trait I2cBus {
    /// Error type for I2C operations
    type Error: BusError;

    /// Addresses of all devices that acknowledge a probe
    fn scan(&mut self) -> Result<Vec<u8, MAX_SCAN_RESULTS>, Self::Error>;

    /// Write data to a device at the given address
    ///
    /// # Arguments
    /// * `address` - 7-bit I2C address
    /// * `data` - Bytes to write
    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), Self::Error>;

    /// Read data from a device at the given address
    ///
    /// # Arguments
    /// * `address` - 7-bit I2C address
    /// * `buf` - Buffer to read into
    fn read(&mut self, address: u8, buf: &mut [u8]) -> Result<(), Self::Error>;
}

impl<T: I2c> I2cBus for T {
    type Error = T::Error;

    fn scan(&mut self) -> Result<Vec<u8, MAX_SCAN_RESULTS>, Self::Error> {
        let mut found = Vec::new();
        let mut probe = [0u8; 1];
        for address in SCAN_FIRST..=SCAN_LAST {
            match I2c::read(self, address, &mut probe) {
                // Capacity covers the whole probed range
                Ok(()) => {
                    let _ = found.push(address);
                }
                Err(e) if e.is_device_absent() => {}
                Err(e) => return Err(e),
            }
        }
        Ok(found)
    }

    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), Self::Error> {
        I2c::write(self, address, data)
    }

    fn read(&mut self, address: u8, buf: &mut [u8]) -> Result<(), Self::Error> {
        I2c::read(self, address, buf)
    }
}

/// I2C configuration
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct I2cConfig {
    /// Clock frequency in Hz
    pub frequency: u32,
}

impl Default for I2cConfig {
    fn default() -> Self {
        Self::STANDARD
    }
}

impl I2cConfig {
    /// Standard mode (100 kHz)
    pub const STANDARD: Self = Self { frequency: 100_000 };

    /// Fast mode (400 kHz)
    pub const FAST: Self = Self { frequency: 400_000 };
}
