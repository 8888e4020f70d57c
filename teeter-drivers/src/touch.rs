//! 4-wire resistive touch panel
//!
//! The panel is two resistive sheets, one with electrodes on its x edges
//! (`xm`, `xp`) and one on its y edges (`ym`, `yp`). Driving one sheet as a
//! voltage divider and reading the other sheet through a floating
//! electrode gives the position along the driven axis. Pressing the
//! sheets together also pulls the floating electrode away from the rail,
//! which is how contact is detected.
//!
//! One scan reconfigures the electrodes three times:
//!
//! ```text
//!        xm     xp     ym     yp      read
//! X      low    high   float  float   ym
//! Z      low    float  float  high    ym   (contact when below threshold)
//! Y      float  float  low    high    xm
//! ```
//!
//! The order keeps each step to one or two pin changes.

use teeter_core::traits::{RawScan, TouchScanner};
use teeter_hal::{AdcReader, TriStatePin};

/// Touch panel errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ScanError<E> {
    /// ADC conversion failed
    Adc(E),
}

/// Panel electrodes
pub struct Electrodes<XM, XP, YM, YP> {
    pub xm: XM,
    pub xp: XP,
    pub ym: YM,
    pub yp: YP,
}

/// Resistive panel read through a shared ADC
///
/// `xm` and `ym` double as analog inputs, so the ADC channels passed in
/// must sample those two electrodes.
pub struct ResistivePanel<XM, XP, YM, YP, A: AdcReader> {
    pins: Electrodes<XM, XP, YM, YP>,
    adc: A,
    xm_channel: A::Channel,
    ym_channel: A::Channel,
    contact_threshold: u16,
}

impl<XM, XP, YM, YP, A> ResistivePanel<XM, XP, YM, YP, A>
where
    XM: TriStatePin,
    XP: TriStatePin,
    YM: TriStatePin,
    YP: TriStatePin,
    A: AdcReader,
{
    pub fn new(
        pins: Electrodes<XM, XP, YM, YP>,
        adc: A,
        xm_channel: A::Channel,
        ym_channel: A::Channel,
        contact_threshold: u16,
    ) -> Self {
        Self {
            pins,
            adc,
            xm_channel,
            ym_channel,
            contact_threshold,
        }
    }

    pub fn contact_threshold(&self) -> u16 {
        self.contact_threshold
    }

    fn read_ym(&mut self) -> Result<u16, ScanError<A::Error>> {
        self.adc.read(&mut self.ym_channel).map_err(ScanError::Adc)
    }

    fn read_xm(&mut self) -> Result<u16, ScanError<A::Error>> {
        self.adc.read(&mut self.xm_channel).map_err(ScanError::Adc)
    }
}

impl<XM, XP, YM, YP, A> TouchScanner for ResistivePanel<XM, XP, YM, YP, A>
where
    XM: TriStatePin,
    XP: TriStatePin,
    YM: TriStatePin,
    YP: TriStatePin,
    A: AdcReader,
{
    type Error = ScanError<A::Error>;

    fn scan(&mut self) -> Result<RawScan, Self::Error> {
        // X: gradient across the x sheet, sensed through ym
        self.pins.xm.set_low();
        self.pins.xp.set_high();
        self.pins.yp.set_floating();
        self.pins.ym.set_floating();
        let x = self.read_ym()?;

        // Z: pull the y sheet up, the x sheet holds ym down on contact
        self.pins.yp.set_high();
        self.pins.xp.set_floating();
        let z = self.read_ym()?;

        // Y: gradient across the y sheet, sensed through xm
        self.pins.ym.set_low();
        self.pins.xm.set_floating();
        let y = self.read_xm()?;

        Ok(RawScan {
            x,
            y,
            contact: z < self.contact_threshold,
        })
    }
}
