//! Sensor reading records shared between tasks

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Platform orientation in degrees, platform frame
///
/// `x` and `y` are the two tilt axes; `z` is the heading and is not used
/// by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EulerAngles {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// Platform angular rates in degrees per second, platform frame
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AngularRates {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// Ball position on the panel in millimetres, origin at the centre
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Position {
    pub x_mm: f32,
    pub y_mm: f32,
}

impl Position {
    pub const ORIGIN: Position = Position { x_mm: 0.0, y_mm: 0.0 };

    pub const fn new(x_mm: f32, y_mm: f32) -> Self {
        Self { x_mm, y_mm }
    }
}

/// Output of one touch panel update
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PanelReading {
    /// Calibrated, filtered position; last contact position when `contact` is false
    pub position: Position,
    /// Ball touching the panel
    pub contact: bool,
    /// Duration of the electrode scan in microseconds
    pub scan_time_us: u32,
}
