//! Single PID stage
//!
//! The derivative term uses a measured rate rather than differencing the
//! error, so there is no derivative kick when the reference jumps:
//! `output = Kp·e + Ki·∫e·dt − Kd·rate`.

use teeter_protocol::PidGains;

/// Limit `value` to `±limit`, mapping NaN to zero
///
/// `limit` must be non-negative.
pub fn saturate(value: f32, limit: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.max(-limit).min(limit)
    }
}

/// PID stage with a symmetric output limit
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PidStage {
    gains: PidGains,
    integral: f32,
    limit: f32,
}

impl PidStage {
    /// Create a stage with a zeroed integrator
    pub const fn new(gains: PidGains, limit: f32) -> Self {
        Self {
            gains,
            integral: 0.0,
            limit,
        }
    }

    /// Replace the gains
    ///
    /// The integrator is kept, so a large Ki change can cause a step in
    /// the output.
    pub fn set_gains(&mut self, gains: PidGains) {
        self.gains = gains;
    }

    pub fn gains(&self) -> PidGains {
        self.gains
    }

    pub fn integral(&self) -> f32 {
        self.integral
    }

    /// Zero the integrator
    pub fn reset(&mut self) {
        self.integral = 0.0;
    }

    /// Advance the stage by `dt` seconds
    ///
    /// `rate` is the measured rate of change of `measured`. The result is
    /// always within `±limit`.
    pub fn update(&mut self, reference: f32, measured: f32, rate: f32, dt: f32) -> f32 {
        let error = reference - measured;

        self.integral += error * dt;
        // An overflowed integrator would pin the output at zero forever
        if !self.integral.is_finite() {
            self.integral = 0.0;
        }

        let output =
            self.gains.kp * error + self.gains.ki * self.integral - self.gains.kd * rate;

        saturate(output, self.limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::format;

    #[test]
    fn test_proportional_only() {
        let mut stage = PidStage::new(PidGains::new(2.0, 0.0, 0.0), 40.0);
        assert_eq!(stage.update(5.0, 2.0, 0.0, 0.01), 6.0);
        assert_eq!(stage.update(-5.0, 2.0, 0.0, 0.01), -14.0);
    }

    #[test]
    fn test_integral_accumulates() {
        let mut stage = PidStage::new(PidGains::new(0.0, 1.0, 0.0), 40.0);
        stage.update(1.0, 0.0, 0.0, 0.5);
        stage.update(1.0, 0.0, 0.0, 0.5);
        assert!((stage.integral() - 1.0).abs() < 1e-6);
        stage.reset();
        assert_eq!(stage.integral(), 0.0);
    }

    #[test]
    fn test_derivative_opposes_rate() {
        let mut stage = PidStage::new(PidGains::new(0.0, 0.0, 0.5), 40.0);
        assert_eq!(stage.update(0.0, 0.0, 4.0, 0.01), -2.0);
    }

    #[test]
    fn test_output_clamped() {
        let mut stage = PidStage::new(PidGains::new(100.0, 0.0, 0.0), 10.0);
        assert_eq!(stage.update(1.0, 0.0, 0.0, 0.01), 10.0);
        assert_eq!(stage.update(-1.0, 0.0, 0.0, 0.01), -10.0);
    }

    #[test]
    fn test_nan_output_is_zero() {
        let mut stage = PidStage::new(PidGains::new(f32::INFINITY, f32::INFINITY, 0.0), 40.0);
        // inf·0 = NaN
        assert_eq!(stage.update(0.0, 0.0, 0.0, 0.01), 0.0);
        assert_eq!(saturate(f32::NAN, 5.0), 0.0);
    }

    #[test]
    fn test_gain_change_keeps_integral() {
        let mut stage = PidStage::new(PidGains::new(0.0, 1.0, 0.0), 40.0);
        stage.update(2.0, 0.0, 0.0, 1.0);
        stage.set_gains(PidGains::new(1.0, 1.0, 0.0));
        assert_eq!(stage.integral(), 2.0);
    }

    fn any_f32() -> impl Strategy<Value = f32> {
        prop_oneof![
            -1.0e6f32..1.0e6f32,
            Just(f32::MAX),
            Just(f32::MIN),
            Just(f32::INFINITY),
            Just(f32::NEG_INFINITY),
            Just(f32::NAN),
        ]
    }

    proptest! {
        #[test]
        fn prop_output_within_limit(
            kp in any_f32(), ki in any_f32(), kd in any_f32(),
            reference in any_f32(), measured in any_f32(), rate in any_f32(),
            dt in 0.0001f32..1.0,
            limit in prop_oneof![Just(10.0f32), Just(40.0f32)],
            steps in 1usize..20,
        ) {
            let mut stage = PidStage::new(PidGains::new(kp, ki, kd), limit);
            for _ in 0..steps {
                let out = stage.update(reference, measured, rate, dt);
                prop_assert!(out >= -limit && out <= limit);
            }
        }
    }
}
