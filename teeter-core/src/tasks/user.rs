//! Operator console task
//!
//! Reads at most one byte per tick from a polled console and runs the
//! command protocol from `teeter-protocol`. Also relays calibration notices
//! from the sensor tasks and drives the sample recorder.

use core::fmt::{self, Write};

use heapless::String;
use teeter_hal::{UartRx, UartTx};
use teeter_protocol::{
    clamp_duty, Command, EntryEvent, GainEntry, NumberEntry, Sample, HELP_TEXT, RECORD_HEADER,
};

use super::imu::ImuNotice;
use super::panel::PanelNotice;
use super::recorder::Recorder;
use crate::config::TICK_PERIOD_US;
use crate::mailbox::Shares;
use crate::readings::Position;
use crate::scheduler::{Task, TaskError};
use crate::time::Instant;

const LINE_CAPACITY: usize = 128;

fn send<U: UartTx>(console: &mut U, bytes: &[u8]) {
    if console.write_blocking(bytes).is_err() {
        debug!("console write failed");
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
enum Motor {
    One,
    Two,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
enum UserState {
    Init,
    Idle,
    Duty(Motor),
    Gains { prompted: bool },
}

pub struct UserTask<'a, U> {
    shares: &'a Shares,
    console: U,
    state: UserState,
    entry: NumberEntry,
    gains: GainEntry,
    recorder: Recorder,
}

impl<'a, U> UserTask<'a, U>
where
    U: UartTx + UartRx,
{
    pub fn new(shares: &'a Shares, console: U) -> Self {
        Self {
            shares,
            console,
            state: UserState::Init,
            entry: NumberEntry::new(),
            gains: GainEntry::new(),
            recorder: Recorder::new(),
        }
    }

    pub fn console(&self) -> &U {
        &self.console
    }

    pub fn recorder(&self) -> &Recorder {
        &self.recorder
    }

    fn write_raw(&mut self, text: &str) {
        send(&mut self.console, text.as_bytes());
    }

    /// Write one formatted line
    fn say(&mut self, args: fmt::Arguments<'_>) {
        let mut line: String<LINE_CAPACITY> = String::new();
        if line.write_fmt(args).is_err() {
            warn!("console line truncated");
        }
        self.write_raw(line.as_str());
        self.write_raw("\r\n");
    }

    fn relay_notices(&mut self) {
        if let Some(notice) = self.shares.imu_notice.take() {
            match notice {
                ImuNotice::Status(s) => self.say(format_args!(
                    "IMU calibration: mag {}, accel {}, gyro {}, system {}.",
                    s.mag, s.accel, s.gyro, s.system
                )),
                ImuNotice::ProfileLoaded => self.say(format_args!("IMU calibration loaded.")),
                ImuNotice::ProfileSaved => {
                    self.say(format_args!("IMU calibration complete and saved."))
                }
            }
        }

        if let Some(notice) = self.shares.panel_notice.take() {
            match notice {
                PanelNotice::Prompt(point) => self.say(format_args!("{}", point.prompt())),
                PanelNotice::Calibrated => self.say(format_args!("Calibration complete.")),
                PanelNotice::Degenerate => self.say(format_args!(
                    "Calibration points were unusable. Starting over."
                )),
                PanelNotice::Loaded => self.say(format_args!("Panel calibration loaded.")),
            }
        }
    }

    fn record(&mut self, now: Instant) {
        let position = self.shares.position.read_or(Position::ORIGIN);
        let euler = self.shares.euler.read().unwrap_or_default();
        let sample = Sample {
            time_ms: 0,
            x_mm: position.x_mm,
            y_mm: position.y_mm,
            x_deg: euler.x,
            y_deg: euler.y,
        };

        if self.recorder.record(now, sample) {
            self.say(format_args!("Data collection complete."));
        }
    }

    fn dump(&mut self) {
        let Some((header, rows)) = self.recorder.next_chunk() else {
            return;
        };

        if header {
            send(&mut self.console, RECORD_HEADER.as_bytes());
            send(&mut self.console, b"\r\n");
        }

        let mut out: String<LINE_CAPACITY> = String::new();
        for row in rows {
            out.clear();
            if write!(out, "{}\r\n", row).is_err() {
                warn!("row truncated");
            }
            send(&mut self.console, out.as_bytes());
        }
    }

    fn prompt_duty(&mut self, motor: Motor) {
        self.say(format_args!(
            "Enter a duty cycle for motor {} (-100 to 100).",
            motor.number()
        ));
    }

    fn command(&mut self, byte: u8, now: Instant) {
        let Some(command) = Command::from_byte(byte) else {
            self.say(format_args!("You typed {}.", byte as char));
            return;
        };

        match command {
            Command::ShowPosition => {
                let p = self.shares.position.read_or(Position::ORIGIN);
                let e = self.shares.euler.read().unwrap_or_default();
                self.say(format_args!(
                    "The current position is ({}, {}) mm.",
                    p.x_mm, p.y_mm
                ));
                self.say(format_args!(
                    "The current Euler angles are ({}, {}, {}) degrees.",
                    e.x, e.y, e.z
                ));
            }
            Command::ShowRates => {
                let r = self.shares.rates.read().unwrap_or_default();
                self.say(format_args!(
                    "The current angular velocities are ({}, {}, {}) deg/s.",
                    r.x, r.y, r.z
                ));
            }
            Command::SetDutyMotor1 => {
                self.entry.clear();
                self.prompt_duty(Motor::One);
                self.state = UserState::Duty(Motor::One);
            }
            Command::SetDutyMotor2 => {
                self.entry.clear();
                self.prompt_duty(Motor::Two);
                self.state = UserState::Duty(Motor::Two);
            }
            Command::StartRecording => {
                if self.recorder.start(now) {
                    self.say(format_args!("Collecting data..."));
                } else {
                    self.say(format_args!("Still outputting data."));
                }
            }
            Command::StopRecording => {
                if self.recorder.is_recording() {
                    self.say(format_args!("Stopping data collection."));
                    self.recorder.stop();
                }
            }
            Command::EnterGains => {
                self.entry.clear();
                self.gains = GainEntry::new();
                self.state = UserState::Gains { prompted: false };
            }
            Command::ToggleClosedLoop => {
                let active = !self.shares.closed_loop.read_or(false);
                self.shares.closed_loop.write(active);
                if active {
                    self.say(format_args!("Closed-loop is now active."));
                } else {
                    self.say(format_args!("Closed-loop is now inactive."));
                }
            }
            Command::Help => self.write_raw(HELP_TEXT),
            Command::Abort => self.abort(),
        }
    }

    fn abort(&mut self) {
        info!("abort requested from console");
        self.say(format_args!("Terminating program."));
        self.shares.abort.write(true);
    }

    fn duty_entry(&mut self, motor: Motor, byte: u8) {
        match self.entry.push(byte) {
            EntryEvent::Committed(value) => {
                let duty = clamp_duty(value);
                match motor {
                    Motor::One => self.shares.duty1.write(duty),
                    Motor::Two => self.shares.duty2.write(duty),
                }
                self.say(format_args!("Motor {} duty set to {}%.", motor.number(), duty));
                self.state = UserState::Idle;
            }
            EntryEvent::Invalid => {
                self.say(format_args!("Not a number."));
                self.prompt_duty(motor);
            }
            EntryEvent::Edited | EntryEvent::Ignored => {}
        }
    }

    fn gain_entry(&mut self, byte: u8) {
        let field = self.gains.field();
        match self.entry.push(byte) {
            EntryEvent::Committed(value) => {
                self.say(format_args!("Setting {} to {}.", field.label(), value));
                match self.gains.accept(value) {
                    Some(gains) => {
                        self.shares.gains.write(gains);
                        self.say(format_args!("Gains updated."));
                        self.state = UserState::Idle;
                    }
                    None => self.state = UserState::Gains { prompted: false },
                }
            }
            EntryEvent::Invalid => {
                self.say(format_args!("Not a number."));
                self.state = UserState::Gains { prompted: false };
            }
            EntryEvent::Edited | EntryEvent::Ignored => {}
        }
    }

    fn read_byte(&mut self) -> Option<u8> {
        match self.console.try_read_byte() {
            Ok(byte) => byte,
            Err(_) => {
                debug!("console read failed");
                None
            }
        }
    }
}

impl Motor {
    fn number(self) -> u8 {
        match self {
            Motor::One => 1,
            Motor::Two => 2,
        }
    }
}

impl<U> Task for UserTask<'_, U>
where
    U: UartTx + UartRx,
{
    fn name(&self) -> &'static str {
        "user"
    }

    fn period_us(&self) -> u32 {
        TICK_PERIOD_US
    }

    fn step(&mut self, now: Instant) -> Result<(), TaskError> {
        if self.state == UserState::Init {
            self.write_raw(HELP_TEXT);
            self.state = UserState::Idle;
            return Ok(());
        }

        self.relay_notices();
        self.record(now);
        self.dump();

        if let UserState::Gains { prompted: false } = self.state {
            let label = self.gains.field().label();
            self.say(format_args!("Enter a value for {}.", label));
            self.state = UserState::Gains { prompted: true };
        }

        let Some(byte) = self.read_byte() else {
            return Ok(());
        };

        if Command::from_byte(byte) == Some(Command::Abort) {
            self.abort();
            return Ok(());
        }

        match self.state {
            UserState::Idle | UserState::Init => self.command(byte, now),
            UserState::Duty(motor) => self.duty_entry(motor, byte),
            UserState::Gains { .. } => self.gain_entry(byte),
        }
        Ok(())
    }
}
