//! Tuning defaults
//!
//! Defaults for the reference platform: a resistive panel on two DC motors
//! with a BNO055 underneath.

use teeter_protocol::{CascadeGains, PidGains};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Dispatch period of every task (100 Hz)
pub const TICK_PERIOD_US: u32 = 10_000;

/// Samples held by the recorder (10 s at the tick rate, plus the first)
pub const RECORD_CAPACITY: usize = 1001;

/// Gains loaded at start-up
pub const DEFAULT_GAINS: CascadeGains = CascadeGains {
    outer: PidGains::new(0.16, 0.01, 0.02),
    inner: PidGains::new(11.0, 0.0, 0.2),
};

/// Controller limits and hysteresis
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ControlConfig {
    /// Outer stage output limit (degrees of tilt)
    pub tilt_limit_deg: f32,
    /// Inner stage output limit (% duty)
    pub duty_limit: f32,
    /// Inner gains used while levelling an empty platform
    pub leveling_gains: PidGains,
    /// Lead at which the contact vote is rebalanced
    pub vote_window: u16,
    /// Count given to the leading side after rebalancing
    pub vote_rebalance: u16,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            tilt_limit_deg: 10.0,
            duty_limit: 40.0,
            leveling_gains: PidGains::new(4.0, 2.0, 0.2),
            vote_window: 10,
            vote_rebalance: 3,
        }
    }
}

/// Touch panel scan and filter settings
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PanelConfig {
    /// Z-axis reading below which the panel is touched (ADC counts)
    pub contact_threshold: u16,
    /// Position correction gain
    pub alpha: f32,
    /// Velocity correction gain
    pub beta: f32,
    /// Scale applied to the first sample
    pub initial_gain: f32,
    /// Output rounding step (mm)
    pub resolution_mm: f32,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            contact_threshold: 4080,
            alpha: 0.85,
            beta: 0.005,
            initial_gain: 0.85,
            resolution_mm: 0.1,
        }
    }
}

/// How the IMU is mounted under the platform
///
/// The driver reports sensor-frame heading/roll/pitch and gyro x/y/z in
/// degrees. The platform x tilt is the sensor roll and the platform y
/// tilt the sensor pitch, both scaled by `angle_sign`. Rates are rotated a
/// quarter turn: platform x rate is sensor y rate and platform y rate is
/// sensor x rate, each with its own sign.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ImuMounting {
    pub angle_sign: f32,
    pub rate_x_sign: f32,
    pub rate_y_sign: f32,
}

impl Default for ImuMounting {
    fn default() -> Self {
        Self {
            angle_sign: -1.0,
            rate_x_sign: 1.0,
            rate_y_sign: -1.0,
        }
    }
}

/// Motor output settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MotorConfig {
    /// Negate commanded duty before driving (linkage reverses direction)
    pub invert: bool,
}

impl Default for MotorConfig {
    fn default() -> Self {
        Self { invert: true }
    }
}
