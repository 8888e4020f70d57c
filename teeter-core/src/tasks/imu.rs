//! Orientation task
//!
//! Brings the sensor up with a stored calibration profile, or waits for
//! the operator to calibrate it by hand and stores the result. Once
//! running it publishes platform-frame angles and rates every tick.

use teeter_hal::CalibrationStore;

use crate::config::{load_imu_profile, save_imu_profile, ImuMounting, TICK_PERIOD_US};
use crate::mailbox::Shares;
use crate::readings::{AngularRates, EulerAngles};
use crate::scheduler::{Task, TaskError};
use crate::time::Instant;
use crate::traits::{CalibrationStatus, OrientationSensor, SensorEuler, SensorRates};

/// Operator-facing events from the IMU task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ImuNotice {
    /// Calibration levels changed while waiting for manual calibration
    Status(CalibrationStatus),
    /// Stored profile written to the sensor
    ProfileLoaded,
    /// Manual calibration finished and the profile was stored
    ProfileSaved,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
enum ImuState {
    Start,
    Calibrating { last: Option<CalibrationStatus> },
    Running,
}

/// Rotate sensor-frame readings into the platform frame
pub fn to_platform(
    mounting: &ImuMounting,
    euler: SensorEuler,
    rates: SensorRates,
) -> (EulerAngles, AngularRates) {
    let angles = EulerAngles {
        x: mounting.angle_sign * euler.roll,
        y: mounting.angle_sign * euler.pitch,
        z: mounting.angle_sign * euler.heading,
    };
    let rates = AngularRates {
        x: mounting.rate_x_sign * rates.y,
        y: mounting.rate_y_sign * rates.x,
        z: rates.z,
    };
    (angles, rates)
}

pub struct ImuTask<'a, I, S> {
    shares: &'a Shares,
    sensor: I,
    store: S,
    mounting: ImuMounting,
    state: ImuState,
}

impl<'a, I, S> ImuTask<'a, I, S>
where
    I: OrientationSensor,
    S: CalibrationStore,
{
    pub fn new(shares: &'a Shares, sensor: I, store: S, mounting: ImuMounting) -> Self {
        Self {
            shares,
            sensor,
            store,
            mounting,
            state: ImuState::Start,
        }
    }

    /// True once readings are being published
    pub fn is_running(&self) -> bool {
        self.state == ImuState::Running
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn start(&mut self) -> Result<ImuState, TaskError> {
        self.sensor.start().map_err(|_| {
            error!("IMU did not enter fusion mode");
            TaskError::Peripheral
        })?;

        let Some(profile) = load_imu_profile(&mut self.store) else {
            info!("IMU needs manual calibration");
            return Ok(ImuState::Calibrating { last: None });
        };

        if self.sensor.write_profile(&profile).is_err() {
            warn!("IMU rejected stored profile, calibrating manually");
            return Ok(ImuState::Calibrating { last: None });
        }

        self.shares.imu_notice.write(ImuNotice::ProfileLoaded);
        Ok(ImuState::Running)
    }

    fn calibrate(&mut self, last: Option<CalibrationStatus>) -> ImuState {
        let Ok(status) = self.sensor.calibration_status() else {
            warn!("IMU calibration status read failed");
            return ImuState::Calibrating { last };
        };

        if !status.is_complete() {
            if last != Some(status) {
                self.shares.imu_notice.write(ImuNotice::Status(status));
            }
            return ImuState::Calibrating { last: Some(status) };
        }

        match self.sensor.read_profile() {
            Ok(profile) => {
                if let Err(e) = save_imu_profile(&mut self.store, &profile) {
                    warn!("IMU profile not saved: {}", e);
                }
            }
            Err(_) => warn!("IMU profile read failed, not saved"),
        }
        self.shares.imu_notice.write(ImuNotice::ProfileSaved);
        ImuState::Running
    }

    fn publish(&mut self) {
        let (euler, rates) = match (self.sensor.read_euler(), self.sensor.read_gyro()) {
            (Ok(euler), Ok(rates)) => (euler, rates),
            // Consumers keep the previous readings
            _ => {
                debug!("IMU read failed");
                return;
            }
        };

        let (angles, rates) = to_platform(&self.mounting, euler, rates);
        self.shares.euler.write(angles);
        self.shares.rates.write(rates);
    }
}

impl<I, S> Task for ImuTask<'_, I, S>
where
    I: OrientationSensor,
    S: CalibrationStore,
{
    fn name(&self) -> &'static str {
        "imu"
    }

    fn period_us(&self) -> u32 {
        TICK_PERIOD_US
    }

    fn step(&mut self, _now: Instant) -> Result<(), TaskError> {
        self.state = match self.state {
            ImuState::Start => self.start()?,
            ImuState::Calibrating { last } => self.calibrate(last),
            ImuState::Running => {
                self.publish();
                ImuState::Running
            }
        };
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::persist::tests::MemoryStore;
    use crate::config::{format_imu_profile, DEFAULT_GAINS, IMU_PROFILE_LEN};
    use teeter_hal::StorageKey;

    #[derive(Default)]
    struct MockSensor {
        started: bool,
        fail_start: bool,
        statuses: std::vec::Vec<CalibrationStatus>,
        written: Option<[u8; IMU_PROFILE_LEN]>,
        euler: SensorEuler,
        rates: SensorRates,
        fail_reads: bool,
    }

    impl OrientationSensor for MockSensor {
        type Error = ();

        fn start(&mut self) -> Result<(), ()> {
            if self.fail_start {
                return Err(());
            }
            self.started = true;
            Ok(())
        }

        fn calibration_status(&mut self) -> Result<CalibrationStatus, ()> {
            if self.statuses.len() > 1 {
                Ok(self.statuses.remove(0))
            } else {
                self.statuses.first().copied().ok_or(())
            }
        }

        fn read_profile(&mut self) -> Result<[u8; IMU_PROFILE_LEN], ()> {
            Ok([0x42; IMU_PROFILE_LEN])
        }

        fn write_profile(&mut self, profile: &[u8; IMU_PROFILE_LEN]) -> Result<(), ()> {
            self.written = Some(*profile);
            Ok(())
        }

        fn read_euler(&mut self) -> Result<SensorEuler, ()> {
            if self.fail_reads {
                return Err(());
            }
            Ok(self.euler)
        }

        fn read_gyro(&mut self) -> Result<SensorRates, ()> {
            if self.fail_reads {
                return Err(());
            }
            Ok(self.rates)
        }
    }

    fn status(mag: u8, accel: u8, gyro: u8) -> CalibrationStatus {
        CalibrationStatus {
            system: 0,
            gyro,
            accel,
            mag,
        }
    }

    fn tick<T: Task>(task: &mut T) {
        task.step(Instant::from_micros(0)).unwrap();
    }

    #[test]
    fn test_mounting_rotation() {
        let (angles, rates) = to_platform(
            &ImuMounting::default(),
            SensorEuler {
                heading: 90.0,
                roll: 2.0,
                pitch: -3.0,
            },
            SensorRates {
                x: 10.0,
                y: 20.0,
                z: 30.0,
            },
        );
        assert_eq!(angles, EulerAngles { x: -2.0, y: 3.0, z: -90.0 });
        assert_eq!(rates, AngularRates { x: 20.0, y: -10.0, z: 30.0 });
    }

    #[test]
    fn test_loads_stored_profile() {
        let shares = Shares::new(DEFAULT_GAINS);
        let mut store = MemoryStore::default();
        let profile = [7u8; IMU_PROFILE_LEN];
        store
            .store(
                StorageKey::ImuCalibration,
                format_imu_profile(&profile).unwrap().as_bytes(),
            )
            .unwrap();

        let mut task = ImuTask::new(&shares, MockSensor::default(), store, ImuMounting::default());
        tick(&mut task);

        assert!(task.is_running());
        assert_eq!(task.sensor.written, Some(profile));
        assert_eq!(shares.imu_notice.take(), Some(ImuNotice::ProfileLoaded));
    }

    #[test]
    fn test_manual_calibration_saves_profile() {
        let shares = Shares::new(DEFAULT_GAINS);
        let sensor = MockSensor {
            statuses: std::vec![status(0, 1, 3), status(0, 1, 3), status(2, 3, 3), status(3, 3, 3)],
            ..Default::default()
        };
        let mut task = ImuTask::new(&shares, sensor, MemoryStore::default(), ImuMounting::default());

        tick(&mut task);
        assert!(!task.is_running());

        tick(&mut task);
        assert_eq!(shares.imu_notice.take(), Some(ImuNotice::Status(status(0, 1, 3))));
        // Unchanged status is not re-announced
        tick(&mut task);
        assert_eq!(shares.imu_notice.take(), None);
        tick(&mut task);
        assert_eq!(shares.imu_notice.take(), Some(ImuNotice::Status(status(2, 3, 3))));

        tick(&mut task);
        assert!(task.is_running());
        assert_eq!(shares.imu_notice.take(), Some(ImuNotice::ProfileSaved));
        assert_eq!(task.store().writes, 1);
        assert!(task.store().imu.as_ref().unwrap().starts_with("0x42,0x42"));
    }

    #[test]
    fn test_failed_start_is_fatal() {
        let shares = Shares::new(DEFAULT_GAINS);
        let sensor = MockSensor {
            fail_start: true,
            ..Default::default()
        };
        let mut task = ImuTask::new(&shares, sensor, MemoryStore::default(), ImuMounting::default());
        assert_eq!(task.step(Instant::from_micros(0)), Err(TaskError::Peripheral));
    }

    #[test]
    fn test_read_failure_keeps_last_readings() {
        let shares = Shares::new(DEFAULT_GAINS);
        let sensor = MockSensor {
            statuses: std::vec![status(3, 3, 3)],
            euler: SensorEuler {
                heading: 0.0,
                roll: 1.5,
                pitch: 0.5,
            },
            ..Default::default()
        };
        let mut task = ImuTask::new(&shares, sensor, MemoryStore::default(), ImuMounting::default());
        tick(&mut task);
        tick(&mut task);
        tick(&mut task);
        assert_eq!(shares.euler.read().unwrap().x, -1.5);

        task.sensor.fail_reads = true;
        task.sensor.euler.roll = 9.0;
        tick(&mut task);
        assert_eq!(shares.euler.read().unwrap().x, -1.5);
    }
}
