//! Controller mode machine
//!
//! The controller's output depends on the current mode and two inputs:
//! whether the operator enabled closed-loop control and whether the panel
//! reports contact.

/// Controller modes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ControllerState {
    /// Before the first dispatch
    Init,
    /// Motors off, waiting for closed-loop enable
    Hold,
    /// Balancing the ball
    Active,
    /// Levelling the empty platform
    NoBall,
}

/// Inputs sampled once per controller tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ModeInputs {
    pub closed_loop: bool,
    pub contact: bool,
}

impl ControllerState {
    /// Mode for the next tick
    ///
    /// Disabling closed loop always wins. An active controller stays
    /// active through contact loss; the contact vote handles that case.
    pub fn transition(self, inputs: ModeInputs) -> Self {
        use ControllerState::*;

        match (self, inputs.closed_loop, inputs.contact) {
            (Init, _, _) => Hold,

            (Hold, true, true) => Active,
            (Hold, true, false) => NoBall,

            (NoBall, false, _) => Hold,
            (NoBall, true, true) => Active,

            (Active, false, _) => Hold,

            // Default: stay in current mode
            _ => self,
        }
    }

    /// Check whether moving from `self` to `to` is a permitted edge
    ///
    /// Staying put is always permitted except in `Init`, which must
    /// leave on its first tick.
    pub fn allows(self, to: ControllerState) -> bool {
        use ControllerState::*;

        matches!(
            (self, to),
            (Init, Hold)
                | (Hold, Hold)
                | (Hold, Active)
                | (Hold, NoBall)
                | (NoBall, NoBall)
                | (NoBall, Active)
                | (NoBall, Hold)
                | (Active, Active)
                | (Active, Hold)
        )
    }
}
