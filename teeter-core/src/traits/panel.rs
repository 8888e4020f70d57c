//! Touch panel seam

/// One electrode scan of a resistive panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RawScan {
    /// X-axis ADC reading
    pub x: u16,
    /// Y-axis ADC reading
    pub y: u16,
    /// Z-axis reading was below the contact threshold
    pub contact: bool,
}

/// Scans the panel electrodes
pub trait TouchScanner {
    type Error;

    /// Perform one X, Z, Y scan
    ///
    /// `x` and `y` are only meaningful when `contact` is true.
    fn scan(&mut self) -> Result<RawScan, Self::Error>;
}
