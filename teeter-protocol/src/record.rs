//! Recorded sample rows

use core::fmt;

/// Header printed before a dump
pub const RECORD_HEADER: &str =
    "Outputting Data: (time [s], (x-position, y-position) [mm], (x-angle, y-angle) [deg])";

/// One recorded tick
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Sample {
    /// Milliseconds since recording started
    pub time_ms: u32,
    pub x_mm: f32,
    pub y_mm: f32,
    pub x_deg: f32,
    pub y_deg: f32,
}

impl fmt::Display for Sample {
    /// `time_s, x_mm, y_mm, x_deg, y_deg`, two decimals each
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.2}, {:.2}, {:.2}, {:.2}, {:.2}",
            self.time_ms as f32 / 1000.0,
            self.x_mm,
            self.y_mm,
            self.x_deg,
            self.y_deg
        )
    }
}
