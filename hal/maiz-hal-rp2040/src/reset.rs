//! Host restart via the Cortex-M system control block

use cortex_m::peripheral::SCB;
use maiz_hal::SystemReset;

/// Requests a system reset through AIRCR
#[derive(Debug, Default, Clone, Copy)]
pub struct Rp2040Reset;

impl SystemReset for Rp2040Reset {
    fn reset(&mut self) -> ! {
        #[cfg(feature = "defmt")]
        defmt::error!("Start key interlock: resetting host");
        SCB::sys_reset()
    }
}
