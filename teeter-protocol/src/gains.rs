//! Controller gains and the operator gain-entry sequence

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Gains of a single PID stage
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PidGains {
    /// Proportional gain
    pub kp: f32,
    /// Integral gain
    pub ki: f32,
    /// Derivative gain
    pub kd: f32,
}

impl PidGains {
    pub const fn new(kp: f32, ki: f32, kd: f32) -> Self {
        Self { kp, ki, kd }
    }

    /// Same gains with every sign flipped
    pub fn negated(self) -> Self {
        Self {
            kp: -self.kp,
            ki: -self.ki,
            kd: -self.kd,
        }
    }
}

/// Gains for both stages of the cascade
///
/// The outer stage maps ball position to a tilt reference, the inner stage
/// maps tilt error to motor duty.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CascadeGains {
    pub outer: PidGains,
    pub inner: PidGains,
}

/// Field prompted for during gain entry, in prompt order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GainField {
    OuterKp,
    OuterKi,
    OuterKd,
    InnerKp,
    InnerKi,
    InnerKd,
}

impl GainField {
    /// Label used in prompts ("Enter a value for Kp outer.")
    pub fn label(&self) -> &'static str {
        match self {
            GainField::OuterKp => "Kp outer",
            GainField::OuterKi => "Ki outer",
            GainField::OuterKd => "Kd outer",
            GainField::InnerKp => "Kp inner",
            GainField::InnerKi => "Ki inner",
            GainField::InnerKd => "Kd inner",
        }
    }

    /// Field that follows this one, or `None` after the last
    pub fn next(self) -> Option<Self> {
        match self {
            GainField::OuterKp => Some(GainField::OuterKi),
            GainField::OuterKi => Some(GainField::OuterKd),
            GainField::OuterKd => Some(GainField::InnerKp),
            GainField::InnerKp => Some(GainField::InnerKi),
            GainField::InnerKi => Some(GainField::InnerKd),
            GainField::InnerKd => None,
        }
    }
}

/// Collects six gains and yields them as one [`CascadeGains`]
///
/// Nothing is published until the last field is accepted, so the controller
/// never runs with a half-updated set.
#[derive(Debug, Clone)]
pub struct GainEntry {
    field: GainField,
    pending: CascadeGains,
}

impl Default for GainEntry {
    fn default() -> Self {
        Self::new()
    }
}

impl GainEntry {
    pub fn new() -> Self {
        Self {
            field: GainField::OuterKp,
            pending: CascadeGains::default(),
        }
    }

    /// Field waiting for a value
    pub fn field(&self) -> GainField {
        self.field
    }

    /// Accept a value for the current field
    ///
    /// Returns the complete set once all six fields are filled; the entry
    /// then starts over at the first field.
    pub fn accept(&mut self, value: f32) -> Option<CascadeGains> {
        match self.field {
            GainField::OuterKp => self.pending.outer.kp = value,
            GainField::OuterKi => self.pending.outer.ki = value,
            GainField::OuterKd => self.pending.outer.kd = value,
            GainField::InnerKp => self.pending.inner.kp = value,
            GainField::InnerKi => self.pending.inner.ki = value,
            GainField::InnerKd => self.pending.inner.kd = value,
        }

        match self.field.next() {
            Some(next) => {
                self.field = next;
                None
            }
            None => {
                let done = self.pending;
                *self = Self::new();
                Some(done)
            }
        }
    }
}
