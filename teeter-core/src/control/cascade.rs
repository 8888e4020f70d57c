//! One axis of the position → tilt → duty cascade

use teeter_protocol::{CascadeGains, PidGains};

use super::pid::PidStage;
use crate::config::ControlConfig;

/// Outer and inner PID stages for one motor
///
/// The two platform axes respond to tilt with opposite sign, so one of the
/// two controllers runs its outer stage with negated gains (`mirrored`).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AxisController {
    outer: PidStage,
    inner: PidStage,
    mirrored: bool,
}

impl AxisController {
    pub fn new(gains: &CascadeGains, mirrored: bool, config: &ControlConfig) -> Self {
        let mut axis = Self {
            outer: PidStage::new(PidGains::default(), config.tilt_limit_deg),
            inner: PidStage::new(PidGains::default(), config.duty_limit),
            mirrored,
        };
        axis.set_gains(gains);
        axis
    }

    /// Load operator gains into both stages
    pub fn set_gains(&mut self, gains: &CascadeGains) {
        let outer = if self.mirrored {
            gains.outer.negated()
        } else {
            gains.outer
        };
        self.outer.set_gains(outer);
        self.inner.set_gains(gains.inner);
    }

    /// Override only the inner stage gains
    pub fn set_inner_gains(&mut self, gains: PidGains) {
        self.inner.set_gains(gains);
    }

    pub fn outer(&self) -> &PidStage {
        &self.outer
    }

    pub fn inner(&self) -> &PidStage {
        &self.inner
    }

    /// Tilt reference (degrees) that drives the ball towards the centre
    pub fn update_outer(&mut self, position_mm: f32, velocity_mm_s: f32, dt: f32) -> f32 {
        self.outer.update(0.0, position_mm, velocity_mm_s, dt)
    }

    /// Motor duty (%) that tracks `tilt_ref_deg`
    pub fn update_inner(&mut self, tilt_ref_deg: f32, tilt_deg: f32, rate_deg_s: f32, dt: f32) -> f32 {
        self.inner.update(tilt_ref_deg, tilt_deg, rate_deg_s, dt)
    }

    /// Zero the outer integrator
    pub fn reset_outer(&mut self) {
        self.outer.reset();
    }
}
