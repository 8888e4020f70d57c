//! Per-task period gating

use crate::time::Instant;

/// Decides when a periodic task is due
///
/// The due time advances by exactly one period per firing, so a task that
/// is slightly late keeps its long-term rate. After a stall longer than a
/// full period the gate re-anchors to `now + period` and skips the missed
/// ticks instead of firing them back to back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PeriodGate {
    period_us: u32,
    next_due: Instant,
}

impl PeriodGate {
    /// Gate whose first firing is one period after `start`
    pub const fn new(period_us: u32, start: Instant) -> Self {
        Self {
            period_us,
            next_due: start.add_micros(period_us),
        }
    }

    pub const fn period_us(&self) -> u32 {
        self.period_us
    }

    pub const fn next_due(&self) -> Instant {
        self.next_due
    }

    /// Check whether the task is due at `now`, advancing if so
    pub fn poll(&mut self, now: Instant) -> bool {
        if now.ticks_since(self.next_due) < 0 {
            return false;
        }

        self.next_due = self.next_due.add_micros(self.period_us);

        // Still a whole period behind: drop the backlog
        if now.ticks_since(self.next_due) >= self.period_us as i32 {
            self.next_due = now.add_micros(self.period_us);
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(us: u32) -> Instant {
        Instant::from_micros(us)
    }

    #[test]
    fn test_fires_once_per_period() {
        let mut gate = PeriodGate::new(10_000, at(0));
        assert!(!gate.poll(at(5_000)));
        assert!(gate.poll(at(10_000)));
        assert!(!gate.poll(at(10_000)));
        assert!(!gate.poll(at(19_999)));
        assert!(gate.poll(at(20_000)));
    }

    #[test]
    fn test_late_firing_keeps_cadence() {
        let mut gate = PeriodGate::new(10_000, at(0));
        // 3 ms late; next due time is still on the 10 ms grid
        assert!(gate.poll(at(13_000)));
        assert_eq!(gate.next_due(), at(20_000));
        // Behind by less than a period: catches up with one firing
        assert!(gate.poll(at(28_000)));
        assert_eq!(gate.next_due(), at(30_000));
    }

    #[test]
    fn test_long_stall_skips_ahead() {
        let mut gate = PeriodGate::new(10_000, at(0));
        assert!(gate.poll(at(10_000)));
        // Stalled for 5 periods
        assert!(gate.poll(at(65_000)));
        assert_eq!(gate.next_due(), at(75_000));
        assert!(!gate.poll(at(70_000)));
    }

    #[test]
    fn test_wraparound() {
        let start = at(u32::MAX - 2_000);
        let mut gate = PeriodGate::new(10_000, start);
        assert!(!gate.poll(start.add_micros(9_999)));
        assert!(gate.poll(start.add_micros(10_000)));
        assert_eq!(gate.next_due().as_micros(), 17_999);
    }
}
