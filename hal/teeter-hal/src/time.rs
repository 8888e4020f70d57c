//! Monotonic tick source

/// Free-running microsecond counter
///
/// The value wraps at `u32::MAX`. Consumers compare ticks with a signed
/// wrapping difference, so wrap-around is not an error.
pub trait Clock {
    /// Current time in microseconds
    fn now_us(&mut self) -> u32;
}
