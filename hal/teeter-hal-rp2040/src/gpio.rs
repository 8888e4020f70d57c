//! Touch panel electrodes on RP2040 GPIO
//!
//! Each electrode is a [`Flex`] pin switched between push-pull output and
//! input without pulls. The two sensed electrodes are also wired to an
//! ADC-capable GPIO, which stays a high-impedance analog input while the
//! electrode pin drives.

use embassy_rp::gpio::{Flex, Level, Pull};
use teeter_hal::{OutputPin, TriStatePin};

/// Panel electrode
pub struct PanelPin<'d> {
    pin: Flex<'d>,
    floating: bool,
}

impl<'d> PanelPin<'d> {
    /// Wrap a flexible pin, starting released
    pub fn new(mut pin: Flex<'d>) -> Self {
        pin.set_pull(Pull::None);
        pin.set_as_input();
        Self {
            pin,
            floating: true,
        }
    }

    fn drive(&mut self, level: Level) {
        self.pin.set_level(level);
        if self.floating {
            self.pin.set_as_output();
            self.floating = false;
        }
    }
}

impl OutputPin for PanelPin<'_> {
    fn set_high(&mut self) {
        self.drive(Level::High);
    }

    fn set_low(&mut self) {
        self.drive(Level::Low);
    }
}

impl TriStatePin for PanelPin<'_> {
    fn set_floating(&mut self) {
        if !self.floating {
            self.pin.set_as_input();
            self.floating = true;
        }
    }

    fn is_floating(&self) -> bool {
        self.floating
    }
}
