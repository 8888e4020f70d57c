//! Uptime clock

use embassy_time::Instant;
use teeter_hal::Clock;

/// Microsecond clock on the embassy time driver
///
/// Truncated to 32 bits; the scheduler compares ticks with wrapping
/// arithmetic, so the wrap every ~71 minutes is harmless.
#[derive(Debug, Default, Clone, Copy)]
pub struct UptimeClock;

impl Clock for UptimeClock {
    fn now_us(&mut self) -> u32 {
        Instant::now().as_micros() as u32
    }
}
