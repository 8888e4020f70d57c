//! Interactive panel calibration
//!
//! The operator touches five reference points in turn. A point's raw
//! reading is captured while the panel is pressed and the wizard moves on
//! when it is released, so holding a finger down never skips ahead.

use super::calibration::{solve, Beta, CalibrationError, RawPoint};
use crate::readings::Position;
use crate::traits::RawScan;

/// Reference points in the order they are requested
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CalibrationPoint {
    BottomLeft,
    TopLeft,
    TopRight,
    BottomRight,
    Centre,
}

impl CalibrationPoint {
    pub const ALL: [CalibrationPoint; 5] = [
        CalibrationPoint::BottomLeft,
        CalibrationPoint::TopLeft,
        CalibrationPoint::TopRight,
        CalibrationPoint::BottomRight,
        CalibrationPoint::Centre,
    ];

    /// Panel coordinates of the point in millimetres
    pub const fn target(self) -> Position {
        match self {
            CalibrationPoint::BottomLeft => Position::new(-80.0, -40.0),
            CalibrationPoint::TopLeft => Position::new(-80.0, 40.0),
            CalibrationPoint::TopRight => Position::new(80.0, 40.0),
            CalibrationPoint::BottomRight => Position::new(80.0, -40.0),
            CalibrationPoint::Centre => Position::new(0.0, 0.0),
        }
    }

    /// Operator instruction
    pub const fn prompt(self) -> &'static str {
        match self {
            CalibrationPoint::BottomLeft => "Touch the bottom left corner.",
            CalibrationPoint::TopLeft => "Touch the top left corner.",
            CalibrationPoint::TopRight => "Touch the top right corner.",
            CalibrationPoint::BottomRight => "Touch the bottom right corner.",
            CalibrationPoint::Centre => "Touch the middle.",
        }
    }
}

/// What a wizard step produced
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WizardEvent {
    /// Nothing new
    Idle,
    /// Ask the operator to touch this point
    Prompt(CalibrationPoint),
    /// The point was pressed and released
    Captured(CalibrationPoint),
    /// All points captured and the fit succeeded
    Complete(Beta),
    /// All points captured but the fit failed; the wizard starts over
    Failed(CalibrationError),
}

/// Five-point calibration sequence
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CalibrationWizard {
    index: usize,
    prompted: bool,
    pressed: bool,
    raw: [RawPoint; 5],
}

impl Default for CalibrationWizard {
    fn default() -> Self {
        Self::new()
    }
}

impl CalibrationWizard {
    pub const fn new() -> Self {
        Self {
            index: 0,
            prompted: false,
            pressed: false,
            raw: [RawPoint { x: 0.0, y: 0.0 }; 5],
        }
    }

    /// Point currently being collected
    pub fn point(&self) -> CalibrationPoint {
        CalibrationPoint::ALL[self.index]
    }

    /// Advance with one panel scan
    ///
    /// The first call for each point only emits the prompt.
    pub fn update(&mut self, scan: RawScan) -> WizardEvent {
        let point = self.point();

        if !self.prompted {
            self.prompted = true;
            return WizardEvent::Prompt(point);
        }

        if scan.contact {
            self.raw[self.index] = RawPoint {
                x: scan.x as f32,
                y: scan.y as f32,
            };
            self.pressed = true;
            return WizardEvent::Idle;
        }

        if !self.pressed {
            return WizardEvent::Idle;
        }

        debug!("captured {} at {}, {}", point, self.raw[self.index].x, self.raw[self.index].y);
        self.pressed = false;
        self.prompted = false;
        self.index += 1;

        if self.index < CalibrationPoint::ALL.len() {
            return WizardEvent::Captured(point);
        }

        let targets = CalibrationPoint::ALL.map(CalibrationPoint::target);
        let result = solve(&self.raw, &targets);
        *self = Self::new();

        match result {
            Ok(beta) => WizardEvent::Complete(beta),
            Err(e) => WizardEvent::Failed(e),
        }
    }
}
