//! Shared single-value slots between tasks
//!
//! Every task runs to completion on one thread, so a slot is a plain
//! [`Cell`]: a write replaces the value in place and a read copies it out.
//! There is no notification; consumers see whatever was last written when
//! they run. Each slot has one writer by convention (see [`Shares`]).

use core::cell::Cell;

use teeter_protocol::CascadeGains;

use crate::readings::{AngularRates, EulerAngles, Position};
use crate::tasks::imu::ImuNotice;
use crate::tasks::panel::PanelNotice;

/// Single-value mailbox
///
/// `None` from [`Slot::read`] means the slot has never been written (or was
/// taken).
#[derive(Debug, Default)]
pub struct Slot<T: Copy> {
    value: Cell<Option<T>>,
}

impl<T: Copy> Slot<T> {
    /// Slot with no value
    pub const fn empty() -> Self {
        Self {
            value: Cell::new(None),
        }
    }

    /// Slot holding `initial`
    pub const fn new(initial: T) -> Self {
        Self {
            value: Cell::new(Some(initial)),
        }
    }

    /// Overwrite the stored value
    pub fn write(&self, value: T) {
        self.value.set(Some(value));
    }

    /// Copy of the stored value, or `None` if unset
    pub fn read(&self) -> Option<T> {
        self.value.get()
    }

    /// Stored value, or `default` if unset
    pub fn read_or(&self, default: T) -> T {
        self.value.get().unwrap_or(default)
    }

    /// Remove and return the stored value
    pub fn take(&self) -> Option<T> {
        self.value.take()
    }
}

/// All slots shared by the platform tasks
///
/// ```text
/// slot          writer       readers
/// euler         imu          controller, user
/// rates         imu          controller, user
/// position      panel        controller, user
/// contact       panel        controller
/// duty1/duty2   controller   motor        (user writes in manual mode)
/// closed_loop   user         controller
/// gains         user         controller
/// abort         user         scheduler loop
/// imu_notice    imu          user (take)
/// panel_notice  panel        user (take)
/// ```
pub struct Shares {
    pub euler: Slot<EulerAngles>,
    pub rates: Slot<AngularRates>,
    pub position: Slot<Position>,
    pub contact: Slot<bool>,
    pub duty1: Slot<f32>,
    pub duty2: Slot<f32>,
    pub closed_loop: Slot<bool>,
    pub gains: Slot<CascadeGains>,
    pub abort: Slot<bool>,
    pub imu_notice: Slot<ImuNotice>,
    pub panel_notice: Slot<PanelNotice>,
}

impl Shares {
    /// Create the slot set with start-up values
    ///
    /// Position starts at the origin, both duties at zero and closed-loop
    /// control disabled. Sensor slots stay unset until first measured.
    pub const fn new(gains: CascadeGains) -> Self {
        Self {
            euler: Slot::empty(),
            rates: Slot::empty(),
            position: Slot::new(Position::ORIGIN),
            contact: Slot::new(false),
            duty1: Slot::new(0.0),
            duty2: Slot::new(0.0),
            closed_loop: Slot::new(false),
            gains: Slot::new(gains),
            abort: Slot::new(false),
            imu_notice: Slot::empty(),
            panel_notice: Slot::empty(),
        }
    }
}
