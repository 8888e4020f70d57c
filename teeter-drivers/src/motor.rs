//! DC motor on a two-input H-bridge
//!
//! Each bridge input takes its own PWM channel. The sign of the commanded
//! duty picks which input is pulsed while the other is held at zero, so
//! the motor coasts between pulses (slow decay).
//!
//! ```text
//! duty    in_a        in_b
//! > 0     0           |duty|
//! < 0     |duty|      0
//! 0       0           0
//! ```

use embedded_hal::pwm::SetDutyCycle;
use teeter_core::traits::DutyActuator;

/// Resolution of the duty written to the PWM channels (per mille)
const DUTY_STEPS: u16 = 1000;

/// Magnitude of a duty percentage in per mille, saturated at 100%
pub fn duty_permille(percent: f32) -> u16 {
    let magnitude = if percent < 0.0 { -percent } else { percent };
    if magnitude.is_nan() {
        return 0;
    }
    // Float to int casts saturate
    ((magnitude.min(100.0) * 10.0 + 0.5) as u16).min(DUTY_STEPS)
}

/// H-bridge driven by two PWM channels
pub struct HBridgeMotor<P> {
    in_a: P,
    in_b: P,
    duty: f32,
}

impl<P: SetDutyCycle> HBridgeMotor<P> {
    /// Create the driver with both inputs off
    pub fn new(mut in_a: P, mut in_b: P) -> Result<Self, P::Error> {
        in_a.set_duty_cycle_fully_off()?;
        in_b.set_duty_cycle_fully_off()?;
        Ok(Self {
            in_a,
            in_b,
            duty: 0.0,
        })
    }

    /// Last duty applied, clamped to [-100, 100]
    pub fn duty(&self) -> f32 {
        self.duty
    }

    pub fn release(self) -> (P, P) {
        (self.in_a, self.in_b)
    }
}

impl<P: SetDutyCycle> DutyActuator for HBridgeMotor<P> {
    type Error = P::Error;

    fn set_duty(&mut self, percent: f32) -> Result<(), Self::Error> {
        let level = duty_permille(percent);
        if level == 0 {
            self.in_a.set_duty_cycle_fully_off()?;
            self.in_b.set_duty_cycle_fully_off()?;
        } else if percent > 0.0 {
            self.in_a.set_duty_cycle_fully_off()?;
            self.in_b.set_duty_cycle_fraction(level, DUTY_STEPS)?;
        } else {
            self.in_b.set_duty_cycle_fully_off()?;
            self.in_a.set_duty_cycle_fraction(level, DUTY_STEPS)?;
        }

        self.duty = if level == 0 {
            0.0
        } else {
            percent.clamp(-100.0, 100.0)
        };
        Ok(())
    }
}
