//! Ball-presence majority vote
//!
//! The panel occasionally reports no contact while the ball is still on
//! it. The vote counts contact and no-contact ticks and only declares the
//! ball gone once no-contact ticks outnumber contact ticks. When one side
//! leads by `window` ticks the counts are reset to `rebalance : 0` in its
//! favour, so the vote remembers roughly the last `window` ticks.

/// Majority vote over recent contact samples
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ContactVote {
    present: u16,
    absent: u16,
    window: u16,
    rebalance: u16,
}

impl ContactVote {
    /// Create a vote; `rebalance` must be less than `window`
    pub const fn new(window: u16, rebalance: u16) -> Self {
        Self {
            present: 0,
            absent: 0,
            window,
            rebalance,
        }
    }

    /// Contact and no-contact tick counts
    #[cfg(test)]
    pub(crate) fn counts(&self) -> (u16, u16) {
        (self.present, self.absent)
    }

    /// True while contact ticks are at least as many as no-contact ticks
    pub fn ball_present(&self) -> bool {
        self.present >= self.absent
    }

    /// Count one sample and return the vote
    ///
    /// The returned decision includes `contact`; rebalancing happens
    /// afterwards and never changes which side leads.
    pub fn update(&mut self, contact: bool) -> bool {
        if contact {
            self.present = self.present.saturating_add(1);
        } else {
            self.absent = self.absent.saturating_add(1);
        }

        let present = self.ball_present();
        self.rebalance();
        present
    }

    fn rebalance(&mut self) {
        if self.present.abs_diff(self.absent) >= self.window {
            if self.absent > self.present {
                self.absent = self.rebalance;
                self.present = 0;
            } else {
                self.present = self.rebalance;
                self.absent = 0;
            }
        } else if self.present.min(self.absent) >= self.window {
            // Alternating samples grow both counts without bound; only
            // the difference matters
            let common = self.present.min(self.absent);
            self.present -= common;
            self.absent -= common;
        }
    }
}
