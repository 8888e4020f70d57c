//! GPIO pin abstractions
//!
//! Provides traits for digital outputs and for the tri-state electrodes of
//! a 4-wire resistive touch panel.

/// Digital output pin
///
/// Implementations should handle the actual hardware register manipulation
/// for the specific chip.
pub trait OutputPin {
    /// Set the pin high (logic 1)
    fn set_high(&mut self);

    /// Set the pin low (logic 0)
    fn set_low(&mut self);

    /// Set the pin to a specific state
    fn set_state(&mut self, high: bool) {
        if high {
            self.set_high();
        } else {
            self.set_low();
        }
    }
}

/// Pin that can be driven or released to high impedance
///
/// The touch panel scan reconfigures each electrode between a driven
/// output and a floating input several times per measurement. Driving a
/// floating pin through [`OutputPin`] switches it back to output mode.
pub trait TriStatePin: OutputPin {
    /// Release the pin (input, no pull)
    fn set_floating(&mut self);

    /// Check if the pin is currently released
    fn is_floating(&self) -> bool;
}
