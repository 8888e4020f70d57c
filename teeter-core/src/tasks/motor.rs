//! Motor output task
//!
//! Re-issues both duty slots to the actuators every tick, so a duty
//! written by either the controller or the operator takes effect within
//! one period.

use crate::config::{MotorConfig, TICK_PERIOD_US};
use crate::mailbox::Shares;
use crate::scheduler::{Task, TaskError};
use crate::time::Instant;
use crate::traits::DutyActuator;

pub struct MotorTask<'a, M> {
    shares: &'a Shares,
    motor1: M,
    motor2: M,
    config: MotorConfig,
}

impl<'a, M: DutyActuator> MotorTask<'a, M> {
    pub fn new(shares: &'a Shares, motor1: M, motor2: M, config: MotorConfig) -> Self {
        Self {
            shares,
            motor1,
            motor2,
            config,
        }
    }

    fn output(&self, duty: f32) -> f32 {
        if self.config.invert {
            -duty
        } else {
            duty
        }
    }
}

impl<M: DutyActuator> Task for MotorTask<'_, M> {
    fn name(&self) -> &'static str {
        "motor"
    }

    fn period_us(&self) -> u32 {
        TICK_PERIOD_US
    }

    fn step(&mut self, _now: Instant) -> Result<(), TaskError> {
        let duty1 = self.output(self.shares.duty1.read_or(0.0));
        let duty2 = self.output(self.shares.duty2.read_or(0.0));

        if self.motor1.set_duty(duty1).is_err() {
            warn!("motor 1 duty not applied");
        }
        if self.motor2.set_duty(duty2).is_err() {
            warn!("motor 2 duty not applied");
        }
        Ok(())
    }
}
