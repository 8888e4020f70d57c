//! Motor output seam

/// Signed PWM output
pub trait DutyActuator {
    type Error;

    /// Drive at `percent` duty in `[-100, 100]`; the sign selects direction
    ///
    /// Values outside the range are clamped by the implementation.
    fn set_duty(&mut self, percent: f32) -> Result<(), Self::Error>;
}
