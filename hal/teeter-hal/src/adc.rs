//! Analog-to-digital converter abstraction
//!
//! A single converter is shared by several input channels, so the channel
//! is passed to each read instead of being owned by the reader.

/// Blocking single-shot ADC
pub trait AdcReader {
    /// Channel handle accepted by [`AdcReader::read`]
    type Channel;

    /// Error type for conversions
    type Error;

    /// Full-scale count of a conversion (4095 for a 12-bit ADC)
    const FULL_SCALE: u16;

    /// Perform one conversion on the given channel
    fn read(&mut self, channel: &mut Self::Channel) -> Result<u16, Self::Error>;
}
