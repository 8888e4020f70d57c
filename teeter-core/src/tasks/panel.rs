//! Touch panel task
//!
//! ```text
//! Start ──stored line──▶ Running
//!   │                      ▲
//!   └──none──▶ Calibrating ┘ (wizard complete, line saved)
//! ```

use teeter_hal::{CalibrationStore, Clock};

use crate::config::{load_panel_beta, save_panel_beta, PanelConfig, TICK_PERIOD_US};
use crate::mailbox::Shares;
use crate::scheduler::{Task, TaskError};
use crate::time::Instant;
use crate::touch::{CalibrationPoint, CalibrationWizard, PanelPipeline, WizardEvent};
use crate::traits::{RawScan, TouchScanner};

/// Operator-facing events from the panel task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PanelNotice {
    /// Touch this point next
    Prompt(CalibrationPoint),
    /// Wizard finished and the fit was stored
    Calibrated,
    /// Wizard points were unusable; starting over
    Degenerate,
    /// Stored calibration loaded
    Loaded,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum PanelState {
    Start,
    Calibrating(CalibrationWizard),
    Running(PanelPipeline),
}

pub struct PanelTask<'a, P, C, S> {
    shares: &'a Shares,
    scanner: P,
    clock: C,
    store: S,
    config: PanelConfig,
    state: PanelState,
}

impl<'a, P, C, S> PanelTask<'a, P, C, S>
where
    P: TouchScanner,
    C: Clock,
    S: CalibrationStore,
{
    pub fn new(shares: &'a Shares, scanner: P, clock: C, store: S, config: PanelConfig) -> Self {
        Self {
            shares,
            scanner,
            clock,
            store,
            config,
            state: PanelState::Start,
        }
    }

    /// True once positions are being published
    pub fn is_running(&self) -> bool {
        matches!(self.state, PanelState::Running(_))
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Scan once, returning the scan and when it started
    ///
    /// A failed conversion reads as no contact.
    fn scan(&mut self) -> (RawScan, Instant, u32) {
        let start = self.clock.now_us();
        let scan = self.scanner.scan().unwrap_or_else(|_| {
            debug!("panel scan failed");
            RawScan::default()
        });
        let elapsed = self.clock.now_us().wrapping_sub(start);
        (scan, Instant::from_micros(start), elapsed)
    }

    fn start(&mut self) -> PanelState {
        match load_panel_beta(&mut self.store) {
            Some(beta) => {
                self.shares.panel_notice.write(PanelNotice::Loaded);
                PanelState::Running(PanelPipeline::new(beta, &self.config))
            }
            None => {
                info!("panel needs calibration");
                PanelState::Calibrating(CalibrationWizard::new())
            }
        }
    }

    fn calibrate(&mut self, mut wizard: CalibrationWizard) -> PanelState {
        let (scan, _, _) = self.scan();

        match wizard.update(scan) {
            WizardEvent::Prompt(point) => {
                self.shares.panel_notice.write(PanelNotice::Prompt(point));
            }
            WizardEvent::Complete(beta) => {
                if let Err(e) = save_panel_beta(&mut self.store, &beta) {
                    warn!("panel calibration not saved: {}", e);
                }
                self.shares.panel_notice.write(PanelNotice::Calibrated);
                return PanelState::Running(PanelPipeline::new(beta, &self.config));
            }
            WizardEvent::Failed(e) => {
                warn!("panel calibration rejected: {}", e);
                self.shares.panel_notice.write(PanelNotice::Degenerate);
            }
            WizardEvent::Idle | WizardEvent::Captured(_) => {}
        }

        PanelState::Calibrating(wizard)
    }

    fn track(&mut self, mut pipeline: PanelPipeline) -> PanelState {
        let (scan, at, scan_time_us) = self.scan();
        let reading = pipeline.process(scan, at, scan_time_us);

        self.shares.position.write(reading.position);
        self.shares.contact.write(reading.contact);

        PanelState::Running(pipeline)
    }
}

impl<P, C, S> Task for PanelTask<'_, P, C, S>
where
    P: TouchScanner,
    C: Clock,
    S: CalibrationStore,
{
    fn name(&self) -> &'static str {
        "panel"
    }

    fn period_us(&self) -> u32 {
        TICK_PERIOD_US
    }

    fn step(&mut self, _now: Instant) -> Result<(), TaskError> {
        self.state = match self.state {
            PanelState::Start => self.start(),
            PanelState::Calibrating(wizard) => self.calibrate(wizard),
            PanelState::Running(pipeline) => self.track(pipeline),
        };
        Ok(())
    }
}
