//! Blocking I2C bus for the accessory connector
//!
//! The driver is strictly request/response with fixed waits in between, so
//! the blocking peripheral mode is used rather than the async one.

use embassy_rp::i2c::{Blocking, Config, I2c, Instance, SclPin, SdaPin};
use embassy_rp::Peri;
use maiz_hal::I2cConfig;

/// Bus type handed to the driver
pub type Rp2040Bus<'d, T> = I2c<'d, T, Blocking>;

/// Create the blocking I2C bus
///
/// # Arguments
/// * `peri` - I2C0 or I2C1
/// * `scl`, `sda` - pins routed to the accessory connector
/// * `config` - bus clock
pub fn new_bus<'d, T: Instance>(
    peri: Peri<'d, T>,
    scl: Peri<'d, impl SclPin<T>>,
    sda: Peri<'d, impl SdaPin<T>>,
    config: I2cConfig,
) -> Rp2040Bus<'d, T> {
    let mut rp_config = Config::default();
    rp_config.frequency = config.frequency;
    I2c::new_blocking(peri, scl, sda, rp_config)
}
