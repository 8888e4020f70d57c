//! Touch panel signal chain
//!
//! ```text
//! RawScan ──▶ AlphaBetaFilter (x, y) ──▶ Beta ──▶ round to resolution ──▶ Position
//! ```
//!
//! The filters only see samples taken while the ball is in contact; without
//! contact the last position is held.

pub mod calibration;
pub mod filter;
pub mod wizard;

pub use calibration::{solve, Beta, CalibrationError, RawPoint};
pub use filter::AlphaBetaFilter;
pub use wizard::{CalibrationPoint, CalibrationWizard, WizardEvent};

#[allow(unused_imports)]
use micromath::F32Ext;

use crate::config::PanelConfig;
use crate::readings::{PanelReading, Position};
use crate::time::Instant;
use crate::traits::RawScan;

/// Round `value` to the nearest multiple of `step`
///
/// A non-positive step leaves the value unchanged.
pub fn quantize(value: f32, step: f32) -> f32 {
    if step > 0.0 {
        (value / step).round() * step
    } else {
        value
    }
}

/// Filtered, calibrated panel position
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PanelPipeline {
    x: AlphaBetaFilter,
    y: AlphaBetaFilter,
    beta: Beta,
    resolution_mm: f32,
    last: Position,
}

impl PanelPipeline {
    pub fn new(beta: Beta, config: &PanelConfig) -> Self {
        let filter = AlphaBetaFilter::new(config.alpha, config.beta, config.initial_gain);
        Self {
            x: filter,
            y: filter,
            beta,
            resolution_mm: config.resolution_mm,
            last: Position::ORIGIN,
        }
    }

    /// Last published position
    pub fn position(&self) -> Position {
        self.last
    }

    /// Process one scan taken at `now`
    pub fn process(&mut self, scan: RawScan, now: Instant, scan_time_us: u32) -> PanelReading {
        if scan.contact {
            let fx = self.x.update(scan.x as f32, now);
            let fy = self.y.update(scan.y as f32, now);
            let mm = self.beta.apply(fx, fy);
            self.last = Position::new(
                quantize(mm.x_mm, self.resolution_mm),
                quantize(mm.y_mm, self.resolution_mm),
            );
        }

        PanelReading {
            position: self.last,
            contact: scan.contact,
            scan_time_us,
        }
    }
}
