//! Balance controller task
//!
//! Each due tick acts on the current mode, then computes the next mode
//! from the closed-loop flag and the panel contact. Motor 1 tilts the
//! platform about its y axis and moves the ball along x; motor 2 tilts it
//! about x and moves the ball along y.

use teeter_protocol::CascadeGains;

use crate::config::{ControlConfig, TICK_PERIOD_US};
use crate::control::{AxisController, ContactVote, ControllerState, ModeInputs};
use crate::mailbox::Shares;
use crate::readings::{AngularRates, EulerAngles, Position};
use crate::scheduler::{Task, TaskError};
use crate::time::Instant;

/// Tilt references handed from the outer to the inner loops, degrees
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TiltRefs {
    pub x_deg: f32,
    pub y_deg: f32,
}

pub struct ControllerTask<'a> {
    shares: &'a Shares,
    config: ControlConfig,
    state: ControllerState,
    /// Drives motor 1 from the x position (y tilt)
    x_axis: AxisController,
    /// Drives motor 2 from the y position (x tilt), outer gains mirrored
    y_axis: AxisController,
    vote: ContactVote,
    /// Last refs computed while the vote said present
    held: TiltRefs,
    /// Refs applied on the last active tick
    #[cfg(test)]
    applied: TiltRefs,
    prev_pos: Position,
    prev_time: Option<Instant>,
    prev_contact: bool,
}

impl<'a> ControllerTask<'a> {
    pub fn new(shares: &'a Shares, gains: &CascadeGains, config: ControlConfig) -> Self {
        Self {
            shares,
            state: ControllerState::Init,
            x_axis: AxisController::new(gains, false, &config),
            y_axis: AxisController::new(gains, true, &config),
            vote: ContactVote::new(config.vote_window, config.vote_rebalance),
            held: TiltRefs::default(),
            #[cfg(test)]
            applied: TiltRefs::default(),
            prev_pos: Position::ORIGIN,
            prev_time: None,
            prev_contact: false,
            config,
        }
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    /// Tilt references used on the most recent active tick
    #[cfg(test)]
    pub(crate) fn tilt_refs(&self) -> TiltRefs {
        self.applied
    }

    #[cfg(test)]
    pub(crate) fn vote(&self) -> &ContactVote {
        &self.vote
    }

    /// Seconds since the previous due tick, if positive
    fn interval(&self, now: Instant) -> Option<f32> {
        let prev = self.prev_time?;
        let dt = now.secs_since(prev);
        if dt > 0.0 {
            Some(dt)
        } else {
            warn!("controller tick with dt {} s skipped", dt);
            None
        }
    }

    fn sensors(&self) -> (EulerAngles, AngularRates) {
        (
            self.shares.euler.read().unwrap_or_default(),
            self.shares.rates.read().unwrap_or_default(),
        )
    }

    fn hold(&mut self) {
        self.shares.duty1.write(0.0);
        self.shares.duty2.write(0.0);
    }

    fn level(&mut self, dt: f32) {
        let (euler, rates) = self.sensors();

        self.x_axis.set_inner_gains(self.config.leveling_gains);
        self.y_axis.set_inner_gains(self.config.leveling_gains);

        let duty1 = self.x_axis.update_inner(0.0, euler.y, rates.y, dt);
        let duty2 = self.y_axis.update_inner(0.0, euler.x, rates.x, dt);
        self.shares.duty1.write(duty1);
        self.shares.duty2.write(duty2);
    }

    fn balance(&mut self, position: Position, contact: bool, dt: f32) {
        let (euler, rates) = self.sensors();

        if let Some(gains) = self.shares.gains.read() {
            self.x_axis.set_gains(&gains);
            self.y_axis.set_gains(&gains);
        }

        if contact && !self.prev_contact {
            self.x_axis.reset_outer();
            self.y_axis.reset_outer();
        }

        let refs = if self.vote.update(contact) {
            if contact {
                let vx = (position.x_mm - self.prev_pos.x_mm) / dt;
                let vy = (position.y_mm - self.prev_pos.y_mm) / dt;
                self.held = TiltRefs {
                    y_deg: self.x_axis.update_outer(position.x_mm, vx, dt),
                    x_deg: self.y_axis.update_outer(position.y_mm, vy, dt),
                };
            }
            self.held
        } else {
            TiltRefs::default()
        };
        #[cfg(test)]
        {
            self.applied = refs;
        }

        let duty1 = self.x_axis.update_inner(refs.y_deg, euler.y, rates.y, dt);
        let duty2 = self.y_axis.update_inner(refs.x_deg, euler.x, rates.x, dt);
        self.shares.duty1.write(duty1);
        self.shares.duty2.write(duty2);
    }
}

impl Task for ControllerTask<'_> {
    fn name(&self) -> &'static str {
        "controller"
    }

    fn period_us(&self) -> u32 {
        TICK_PERIOD_US
    }

    fn step(&mut self, now: Instant) -> Result<(), TaskError> {
        let closed_loop = self.shares.closed_loop.read_or(false);
        let contact = self.shares.contact.read_or(false);
        let position = self.shares.position.read_or(Position::ORIGIN);
        let dt = self.interval(now);

        match (self.state, dt) {
            (ControllerState::Init, _) => {}
            (ControllerState::Hold, _) => self.hold(),
            (ControllerState::Active, Some(dt)) => self.balance(position, contact, dt),
            (ControllerState::NoBall, Some(dt)) => self.level(dt),
            // Previous duties stay in the mailbox
            (ControllerState::Active | ControllerState::NoBall, None) => {}
        }

        self.prev_pos = position;
        self.prev_time = Some(now);
        self.prev_contact = contact;

        let from = self.state;
        let to = from.transition(ModeInputs {
            closed_loop,
            contact,
        });
        if !from.allows(to) {
            return Err(TaskError::InvalidTransition { from, to });
        }
        if from != to {
            info!("controller {} -> {}", from, to);
        }
        self.state = to;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_GAINS;

    const PERIOD: u32 = 10_000;

    #[derive(Default)]
    struct Ticker {
        now: Instant,
    }

    impl Ticker {
        fn tick(&mut self, task: &mut ControllerTask<'_>) {
            self.now = self.now.add_micros(PERIOD);
            task.step(self.now).unwrap();
        }
    }

    /// Level platform at rest
    fn shares() -> Shares {
        let shares = Shares::new(DEFAULT_GAINS);
        shares.euler.write(EulerAngles::default());
        shares.rates.write(AngularRates::default());
        shares
    }

    fn controller(shares: &Shares) -> ControllerTask<'_> {
        ControllerTask::new(shares, &DEFAULT_GAINS, ControlConfig::default())
    }

    #[test]
    fn test_hold_until_closed_loop() {
        let shares = shares();
        let mut task = controller(&shares);
        let mut t = Ticker::default();
        shares.duty1.write(30.0);

        t.tick(&mut task);
        assert_eq!(task.state(), ControllerState::Hold);
        // Init does not touch the motors
        assert_eq!(shares.duty1.read(), Some(30.0));

        t.tick(&mut task);
        assert_eq!(task.state(), ControllerState::Hold);
        assert_eq!(shares.duty1.read(), Some(0.0));
        assert_eq!(shares.duty2.read(), Some(0.0));
    }

    #[test]
    fn test_no_ball_levels_with_fixed_gains() {
        let shares = shares();
        let mut task = controller(&shares);
        let mut t = Ticker::default();
        shares.closed_loop.write(true);
        shares.euler.write(EulerAngles {
            x: 2.0,
            y: -1.0,
            z: 0.0,
        });

        t.tick(&mut task);
        t.tick(&mut task);
        assert_eq!(task.state(), ControllerState::NoBall);
        t.tick(&mut task);

        // Kp 4, Ki 2 with one 10 ms step of integral
        let duty1 = shares.duty1.read().unwrap();
        let duty2 = shares.duty2.read().unwrap();
        assert!((duty1 - (4.0 * 1.0 + 2.0 * 0.01)).abs() < 1e-4);
        assert!((duty2 - (4.0 * -2.0 + 2.0 * -0.02)).abs() < 1e-4);
    }

    #[test]
    fn test_active_drives_towards_centre() {
        let shares = shares();
        let mut task = controller(&shares);
        let mut t = Ticker::default();
        shares.closed_loop.write(true);
        shares.contact.write(true);
        shares.position.write(Position::new(20.0, -10.0));

        t.tick(&mut task);
        t.tick(&mut task);
        assert_eq!(task.state(), ControllerState::Active);
        t.tick(&mut task);

        let refs = task.tilt_refs();
        assert!(refs.y_deg < 0.0);
        // Mirrored axis: negative y position still gives a negative x tilt
        assert!(refs.x_deg < 0.0);
        let duty1 = shares.duty1.read().unwrap();
        assert!(duty1.abs() <= 40.0);
        assert!(duty1 < 0.0);
    }

    #[test]
    fn test_closed_loop_off_returns_to_hold() {
        let shares = shares();
        let mut task = controller(&shares);
        let mut t = Ticker::default();
        shares.closed_loop.write(true);
        shares.contact.write(true);
        for _ in 0..4 {
            t.tick(&mut task);
        }
        assert_eq!(task.state(), ControllerState::Active);

        shares.closed_loop.write(false);
        t.tick(&mut task);
        assert_eq!(task.state(), ControllerState::Hold);
        t.tick(&mut task);
        assert_eq!(shares.duty1.read(), Some(0.0));
    }

    #[test]
    fn test_contact_dropout_freezes_then_levels() {
        let shares = shares();
        let mut task = controller(&shares);
        let mut t = Ticker::default();
        shares.closed_loop.write(true);
        shares.contact.write(true);
        shares.position.write(Position::new(20.0, -10.0));

        // Init, Hold, then ten active ticks with contact
        t.tick(&mut task);
        t.tick(&mut task);
        for _ in 0..10 {
            t.tick(&mut task);
        }
        assert_eq!(task.vote().counts(), (3, 0));
        let last = task.tilt_refs();
        assert!(last.y_deg != 0.0);

        // Vote still says present for three misses: refs frozen
        shares.contact.write(false);
        for _ in 0..3 {
            t.tick(&mut task);
            assert_eq!(task.tilt_refs(), last);
        }
        // Misses outnumber hits: level the platform
        for _ in 3..15 {
            t.tick(&mut task);
            assert_eq!(task.tilt_refs(), TiltRefs::default());
        }
        assert_eq!(task.state(), ControllerState::Active);

        // Level until hits catch up again
        shares.contact.write(true);
        for _ in 0..4 {
            t.tick(&mut task);
            assert_eq!(task.tilt_refs(), TiltRefs::default());
        }
        t.tick(&mut task);
        let resumed = task.tilt_refs();
        assert!(resumed.y_deg < 0.0);
        assert!(resumed.x_deg < 0.0);
    }

    #[test]
    fn test_outer_integrator_reset_on_touchdown() {
        let shares = shares();
        let mut task = controller(&shares);
        let mut t = Ticker::default();
        shares.closed_loop.write(true);
        shares.contact.write(true);
        shares.position.write(Position::new(30.0, 30.0));
        for _ in 0..6 {
            t.tick(&mut task);
        }
        assert!(task.x_axis.outer().integral() != 0.0);

        shares.contact.write(false);
        t.tick(&mut task);
        shares.contact.write(true);
        t.tick(&mut task);
        // Reset, then one 10 ms step at −30 mm error
        assert!((task.x_axis.outer().integral() + 0.3).abs() < 1e-5);
    }

    #[test]
    fn test_zero_dt_skips_control() {
        let shares = shares();
        let mut task = controller(&shares);
        let mut t = Ticker::default();
        shares.closed_loop.write(true);
        shares.contact.write(true);
        for _ in 0..4 {
            t.tick(&mut task);
        }
        shares.duty1.write(12.0);
        task.step(t.now).unwrap();
        assert_eq!(shares.duty1.read(), Some(12.0));
        assert_eq!(task.state(), ControllerState::Active);
    }

    #[test]
    fn test_gain_change_applies_next_tick() {
        let shares = shares();
        let mut task = controller(&shares);
        let mut t = Ticker::default();
        shares.closed_loop.write(true);
        shares.contact.write(true);
        for _ in 0..3 {
            t.tick(&mut task);
        }
        let mut gains = DEFAULT_GAINS;
        gains.inner.kp = 2.0;
        shares.gains.write(gains);
        t.tick(&mut task);
        assert_eq!(task.x_axis.inner().gains().kp, 2.0);
        assert_eq!(task.y_axis.outer().gains(), gains.outer.negated());
    }
}
