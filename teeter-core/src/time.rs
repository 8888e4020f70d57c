//! Wrapping microsecond timestamps

/// Point in time on a free-running 32-bit microsecond counter
///
/// The counter wraps roughly every 71.6 minutes. Two instants can be
/// compared as long as they are less than half the range (~35.8 minutes)
/// apart, which holds for anything measured within a few control ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Instant(u32);

impl Instant {
    pub const fn from_micros(us: u32) -> Self {
        Self(us)
    }

    pub const fn as_micros(self) -> u32 {
        self.0
    }

    /// Instant `us` microseconds later, wrapping
    pub const fn add_micros(self, us: u32) -> Self {
        Self(self.0.wrapping_add(us))
    }

    /// Signed microseconds from `earlier` to `self`
    ///
    /// Negative when `self` is before `earlier`.
    pub const fn ticks_since(self, earlier: Instant) -> i32 {
        self.0.wrapping_sub(earlier.0) as i32
    }

    /// Seconds from `earlier` to `self`
    pub fn secs_since(self, earlier: Instant) -> f32 {
        self.ticks_since(earlier) as f32 / 1_000_000.0
    }
}
