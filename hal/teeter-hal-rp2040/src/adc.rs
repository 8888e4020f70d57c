//! Blocking ADC conversions
//!
//! RP2040 has a single 12-bit ADC shared by four GPIO inputs:
//! - ADC0: GPIO26
//! - ADC1: GPIO27
//! - ADC2: GPIO28
//! - ADC3: GPIO29

use embassy_rp::adc::{Adc, Blocking, Channel, Error};
use teeter_hal::AdcReader;

/// One-shot converter for the touch panel
pub struct PanelAdc<'d> {
    adc: Adc<'d, Blocking>,
}

impl<'d> PanelAdc<'d> {
    pub fn new(adc: Adc<'d, Blocking>) -> Self {
        Self { adc }
    }
}

impl<'d> AdcReader for PanelAdc<'d> {
    type Channel = Channel<'d>;
    type Error = Error;

    const FULL_SCALE: u16 = 4095;

    fn read(&mut self, channel: &mut Channel<'d>) -> Result<u16, Error> {
        self.adc.blocking_read(channel)
    }
}

