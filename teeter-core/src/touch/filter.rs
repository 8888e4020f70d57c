//! Alpha-beta tracking filter
//!
//! Smooths one panel axis. Each update predicts the position forward by the
//! velocity estimate, corrects the prediction by `α` times the residual,
//! then nudges the velocity by `β/dt` times the remaining residual.

use crate::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
struct Estimate {
    position: f32,
    velocity: f32,
    updated: Instant,
}

/// Position and velocity estimator for one axis
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AlphaBetaFilter {
    alpha: f32,
    beta: f32,
    initial_gain: f32,
    estimate: Option<Estimate>,
}

impl AlphaBetaFilter {
    /// Create a filter
    ///
    /// The first sample seeds the position as `initial_gain × raw` with
    /// zero velocity.
    pub const fn new(alpha: f32, beta: f32, initial_gain: f32) -> Self {
        Self {
            alpha,
            beta,
            initial_gain,
            estimate: None,
        }
    }

    /// Current position estimate
    pub fn position(&self) -> Option<f32> {
        self.estimate.map(|e| e.position)
    }

    /// Current velocity estimate, units per second
    pub fn velocity(&self) -> Option<f32> {
        self.estimate.map(|e| e.velocity)
    }

    /// Forget the estimate; the next sample seeds it again
    pub fn reset(&mut self) {
        self.estimate = None;
    }

    /// Feed a raw sample taken at `now` and return the new position estimate
    ///
    /// With a non-positive interval since the previous sample the
    /// prediction and velocity steps are skipped and only the position is
    /// corrected.
    pub fn update(&mut self, raw: f32, now: Instant) -> f32 {
        let Some(mut est) = self.estimate else {
            let position = self.initial_gain * raw;
            self.estimate = Some(Estimate {
                position,
                velocity: 0.0,
                updated: now,
            });
            return position;
        };

        let dt = now.secs_since(est.updated);

        if dt > 0.0 {
            let predicted = est.position + est.velocity * dt;
            est.position = predicted + self.alpha * (raw - predicted);
            est.velocity += self.beta / dt * (raw - est.position);
        } else {
            est.position += self.alpha * (raw - est.position);
        }
        est.updated = now;

        self.estimate = Some(est);
        est.position
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter() -> AlphaBetaFilter {
        AlphaBetaFilter::new(0.85, 0.005, 0.85)
    }

    #[test]
    fn test_first_sample_scaled() {
        let mut f = filter();
        assert_eq!(f.update(1000.0, Instant::from_micros(0)), 850.0);
        assert_eq!(f.velocity(), Some(0.0));
    }

    #[test]
    fn test_second_sample() {
        let mut f = filter();
        f.update(1000.0, Instant::from_micros(0));
        let x = f.update(1000.0, Instant::from_micros(10_000));
        // 850 + 0.85 × 150
        assert!((x - 977.5).abs() < 1e-3);
        // 0.5 × (1000 − 977.5)
        assert!((f.velocity().unwrap() - 11.25).abs() < 1e-3);
    }

    #[test]
    fn test_converges_on_constant_input() {
        let mut f = filter();
        let mut now = Instant::from_micros(0);
        for _ in 0..10_000 {
            f.update(1000.0, now);
            now = now.add_micros(10_000);
        }
        assert!((f.position().unwrap() - 1000.0).abs() < 0.01);
        assert!(f.velocity().unwrap().abs() < 0.05);
    }

    #[test]
    fn test_zero_dt_corrects_only() {
        let mut f = filter();
        let t = Instant::from_micros(500);
        f.update(100.0, t);
        let before = f.velocity();
        let x = f.update(200.0, t);
        assert!((x - (85.0 + 0.85 * 115.0)).abs() < 1e-3);
        assert_eq!(f.velocity(), before);
    }

    #[test]
    fn test_reset_reseeds() {
        let mut f = filter();
        f.update(100.0, Instant::from_micros(0));
        f.reset();
        assert!(f.position().is_none());
        assert_eq!(f.update(200.0, Instant::from_micros(10)), 170.0);
    }
}
