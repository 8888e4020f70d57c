//! Orientation sensor seam

use crate::config::IMU_PROFILE_LEN;

/// Per-subsystem calibration levels, each `0..=3`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CalibrationStatus {
    pub system: u8,
    pub gyro: u8,
    pub accel: u8,
    pub mag: u8,
}

impl CalibrationStatus {
    /// Highest level a subsystem reports
    pub const FULL: u8 = 3;

    /// Magnetometer, accelerometer and gyroscope all fully calibrated
    ///
    /// The system level is not required; it follows the other three.
    pub fn is_complete(&self) -> bool {
        self.mag == Self::FULL && self.accel == Self::FULL && self.gyro == Self::FULL
    }
}

/// Fused orientation in the sensor frame, degrees
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SensorEuler {
    pub heading: f32,
    pub roll: f32,
    pub pitch: f32,
}

/// Gyroscope rates in the sensor frame, degrees per second
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SensorRates {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// Absolute orientation sensor with an on-chip fusion engine
pub trait OrientationSensor {
    type Error;

    /// Put the sensor in fusion mode
    fn start(&mut self) -> Result<(), Self::Error>;

    fn calibration_status(&mut self) -> Result<CalibrationStatus, Self::Error>;

    /// Read the calibration offsets and radii
    fn read_profile(&mut self) -> Result<[u8; IMU_PROFILE_LEN], Self::Error>;

    /// Restore a profile previously read with [`read_profile`](Self::read_profile)
    ///
    /// The sensor is back in fusion mode on success.
    fn write_profile(&mut self, profile: &[u8; IMU_PROFILE_LEN]) -> Result<(), Self::Error>;

    fn read_euler(&mut self) -> Result<SensorEuler, Self::Error>;

    fn read_gyro(&mut self) -> Result<SensorRates, Self::Error>;
}
