//! BNO055 absolute orientation sensor (I2C)
//!
//! The BNO055 runs its own fusion engine. In NDOF mode it reports fused
//! Euler angles and calibrated gyro rates, both as little-endian `i16` at
//! 16 LSB per degree (per degree per second for the gyro).
//!
//! # Register Map (page 0, subset)
//!
//! ```text
//! 0x14..0x19  GYR_DATA    x, y, z
//! 0x1A..0x1F  EUL_DATA    heading, roll, pitch
//! 0x35        CALIB_STAT  [7:6] sys  [5:4] gyr  [3:2] acc  [1:0] mag
//! 0x3D        OPR_MODE    0x00 config, 0x0C NDOF
//! 0x55..0x6A  calibration profile (offsets and radii, 22 bytes)
//! ```
//!
//! The profile registers are only writable in config mode.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;
use teeter_core::config::IMU_PROFILE_LEN;
use teeter_core::traits::{CalibrationStatus, OrientationSensor, SensorEuler, SensorRates};

/// Default address (COM3 low)
pub const ADDRESS: u8 = 0x28;
/// Address with COM3 high
pub const ADDRESS_ALT: u8 = 0x29;

/// BNO055 register addresses
pub mod reg {
    /// Gyroscope x, y, z
    pub const GYR_DATA: u8 = 0x14;
    /// Euler heading, roll, pitch
    pub const EUL_DATA: u8 = 0x1A;
    /// Calibration status
    pub const CALIB_STAT: u8 = 0x35;
    /// Operating mode
    pub const OPR_MODE: u8 = 0x3D;
    /// First calibration profile register
    pub const PROFILE: u8 = 0x55;
}

/// Operating modes
pub mod mode {
    pub const CONFIG: u8 = 0x00;
    pub const NDOF: u8 = 0x0C;
}

/// Data sheet switching times, any mode to config and config to any mode
const TO_CONFIG_MS: u32 = 19;
const FROM_CONFIG_MS: u32 = 7;

/// LSB per degree and per degree per second
const LSB_PER_UNIT: f32 = 16.0;

/// BNO055 errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Bno055Error<E> {
    /// I2C transfer failed
    I2c(E),
}

impl<E> From<E> for Bno055Error<E> {
    fn from(e: E) -> Self {
        Bno055Error::I2c(e)
    }
}

/// Decode three little-endian `i16` values scaled by 1/16
fn decode_triple(raw: &[u8; 6]) -> [f32; 3] {
    let word = |i: usize| i16::from_le_bytes([raw[2 * i], raw[2 * i + 1]]) as f32 / LSB_PER_UNIT;
    [word(0), word(1), word(2)]
}

/// Split `CALIB_STAT` into its four 2-bit fields
pub fn decode_status(byte: u8) -> CalibrationStatus {
    CalibrationStatus {
        system: (byte >> 6) & 0b11,
        gyro: (byte >> 4) & 0b11,
        accel: (byte >> 2) & 0b11,
        mag: byte & 0b11,
    }
}

/// BNO055 on an I2C bus
pub struct Bno055<I, D> {
    i2c: I,
    delay: D,
    address: u8,
}

impl<I: I2c, D: DelayNs> Bno055<I, D> {
    pub fn new(i2c: I, delay: D, address: u8) -> Self {
        Self {
            i2c,
            delay,
            address,
        }
    }

    /// Release the bus and delay
    pub fn release(self) -> (I, D) {
        (self.i2c, self.delay)
    }

    fn write_reg(&mut self, reg: u8, value: u8) -> Result<(), Bno055Error<I::Error>> {
        self.i2c.write(self.address, &[reg, value])?;
        Ok(())
    }

    fn read_regs(&mut self, reg: u8, buf: &mut [u8]) -> Result<(), Bno055Error<I::Error>> {
        self.i2c.write_read(self.address, &[reg], buf)?;
        Ok(())
    }

    /// Switch operating mode and wait for the switch to complete
    pub fn set_mode(&mut self, mode: u8) -> Result<(), Bno055Error<I::Error>> {
        self.write_reg(reg::OPR_MODE, mode)?;
        let wait = if mode == mode::CONFIG {
            TO_CONFIG_MS
        } else {
            FROM_CONFIG_MS
        };
        self.delay.delay_ms(wait);
        Ok(())
    }
}

impl<I: I2c, D: DelayNs> OrientationSensor for Bno055<I, D> {
    type Error = Bno055Error<I::Error>;

    fn start(&mut self) -> Result<(), Self::Error> {
        self.set_mode(mode::CONFIG)?;
        self.set_mode(mode::NDOF)
    }

    fn calibration_status(&mut self) -> Result<CalibrationStatus, Self::Error> {
        let mut buf = [0u8; 1];
        self.read_regs(reg::CALIB_STAT, &mut buf)?;
        Ok(decode_status(buf[0]))
    }

    fn read_profile(&mut self) -> Result<[u8; IMU_PROFILE_LEN], Self::Error> {
        let mut profile = [0u8; IMU_PROFILE_LEN];
        self.read_regs(reg::PROFILE, &mut profile)?;
        Ok(profile)
    }

    fn write_profile(&mut self, profile: &[u8; IMU_PROFILE_LEN]) -> Result<(), Self::Error> {
        let mut frame = [0u8; IMU_PROFILE_LEN + 1];
        frame[0] = reg::PROFILE;
        frame[1..].copy_from_slice(profile);

        self.set_mode(mode::CONFIG)?;
        self.i2c.write(self.address, &frame)?;
        self.set_mode(mode::NDOF)
    }

    fn read_euler(&mut self) -> Result<SensorEuler, Self::Error> {
        let mut raw = [0u8; 6];
        self.read_regs(reg::EUL_DATA, &mut raw)?;
        let [heading, roll, pitch] = decode_triple(&raw);
        Ok(SensorEuler {
            heading,
            roll,
            pitch,
        })
    }

    fn read_gyro(&mut self) -> Result<SensorRates, Self::Error> {
        let mut raw = [0u8; 6];
        self.read_regs(reg::GYR_DATA, &mut raw)?;
        let [x, y, z] = decode_triple(&raw);
        Ok(SensorRates { x, y, z })
    }
}
