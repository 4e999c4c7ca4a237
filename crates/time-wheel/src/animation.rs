//! Animation primitives
//!
//! Easing curves, fixed-duration tweens, damped springs, and inertial decay.
//! Every primitive is advanced by the host's frame timestamps (`Instant`)
//! rather than by its own timer, so a test can drive them with a synthetic
//! clock and get identical results on every run.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::config::positive;
use crate::error::{Result, WheelError};

/// Spring integration step
const SPRING_STEP: f32 = 0.001;

/// Longest gap a spring integrates step by step before jumping to rest
const SPRING_MAX_STEPS: u32 = 2_000;

// =============================================================================
// Easing
// =============================================================================

/// Easing curves
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Easing {
    /// Constant speed
    Linear,
    /// Slow start and end
    EaseInOut,
    /// Fast start, slow end
    #[default]
    EaseOutCubic,
}

impl Easing {
    /// Map linear progress `t` in [0, 1] onto the curve
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            Easing::EaseOutCubic => 1.0 - (1.0 - t).powi(3),
        }
    }
}

// =============================================================================
// Tween
// =============================================================================

/// Fixed-duration interpolation between two values
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween {
    from: f32,
    to: f32,
    start: Instant,
    duration: Duration,
    easing: Easing,
}

impl Tween {
    /// Start a tween at `start`
    pub fn new(from: f32, to: f32, start: Instant, duration: Duration, easing: Easing) -> Self {
        Self { from, to, start, duration, easing }
    }

    /// Linear progress in [0, 1]
    pub fn progress(&self, now: Instant) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.start);
        (elapsed.as_secs_f32() / self.duration.as_secs_f32()).min(1.0)
    }

    /// Value at `now`
    pub fn value_at(&self, now: Instant) -> f32 {
        let progress = self.progress(now);
        if progress >= 1.0 {
            return self.to;
        }
        self.from + (self.to - self.from) * self.easing.apply(progress)
    }

    /// Whether the full duration has elapsed
    pub fn is_finished(&self, now: Instant) -> bool {
        self.progress(now) >= 1.0
    }

    /// Final value
    pub fn target(&self) -> f32 {
        self.to
    }
}

// =============================================================================
// Spring
// =============================================================================

/// Damped spring parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpringConfig {
    /// Spring constant
    pub stiffness: f32,
    /// Damping coefficient
    pub damping: f32,
    /// Moving mass
    pub mass: f32,
}

impl SpringConfig {
    /// Create a spring configuration
    pub const fn new(stiffness: f32, damping: f32, mass: f32) -> Self {
        Self { stiffness, damping, mass }
    }

    /// Reject non-positive parameters
    pub fn validate(&self) -> Result<()> {
        if positive(self.stiffness) && positive(self.damping) && positive(self.mass) {
            Ok(())
        } else {
            Err(WheelError::InvalidConfig(format!(
                "spring parameters must be positive: {self:?}"
            )))
        }
    }
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self::new(200.0, 25.0, 1.0)
    }
}

/// A value pulled toward a target by a damped spring
///
/// Velocity is in units per second. Once both the displacement and the
/// speed fall under the rest thresholds the position is set exactly to the
/// target, so a spring never leaves residual drift.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spring {
    config: SpringConfig,
    position: f32,
    velocity: f32,
    target: f32,
    last: Instant,
    at_rest: bool,
}

impl Spring {
    /// Rest threshold for displacement
    pub const REST_DISPLACEMENT: f32 = 0.01;
    /// Rest threshold for speed (units per second)
    pub const REST_SPEED: f32 = 0.5;

    /// Start a spring from `from` toward `to`
    pub fn new(config: SpringConfig, from: f32, to: f32, velocity: f32, now: Instant) -> Self {
        let mut spring = Self {
            config,
            position: from,
            velocity,
            target: to,
            last: now,
            at_rest: false,
        };
        spring.check_rest();
        spring
    }

    /// Integrate up to `now` and return the new position
    pub fn advance(&mut self, now: Instant) -> f32 {
        if self.at_rest {
            return self.position;
        }
        let elapsed = now.saturating_duration_since(self.last);
        let steps = (elapsed.as_secs_f32() / SPRING_STEP).floor() as u32;
        if steps == 0 {
            return self.position;
        }
        self.last += Duration::from_secs_f32(steps as f32 * SPRING_STEP);

        if steps > SPRING_MAX_STEPS {
            self.rest();
            return self.position;
        }

        let SpringConfig { stiffness, damping, mass } = self.config;
        for _ in 0..steps {
            let force = -stiffness * (self.position - self.target) - damping * self.velocity;
            self.velocity += force / mass * SPRING_STEP;
            self.position += self.velocity * SPRING_STEP;
            if self.check_rest() {
                break;
            }
        }
        self.position
    }

    fn check_rest(&mut self) -> bool {
        if (self.position - self.target).abs() < Self::REST_DISPLACEMENT
            && self.velocity.abs() < Self::REST_SPEED
        {
            self.rest();
        }
        self.at_rest
    }

    fn rest(&mut self) {
        self.position = self.target;
        self.velocity = 0.0;
        self.at_rest = true;
    }

    /// Move both the position and the target by `delta`
    pub fn shift(&mut self, delta: f32) {
        self.position += delta;
        self.target += delta;
    }

    /// Current position
    pub fn position(&self) -> f32 {
        self.position
    }

    /// Current velocity (units per second)
    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    /// Resting position
    pub fn target(&self) -> f32 {
        self.target
    }

    /// Whether the spring has come to rest at its target
    pub fn is_at_rest(&self) -> bool {
        self.at_rest
    }
}

// =============================================================================
// Decay
// =============================================================================

/// Inertial coasting with per-millisecond exponential velocity decay
///
/// Each elapsed millisecond applies `position += velocity` and then
/// `velocity *= factor`, until the speed drops below the stop threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decay {
    position: f32,
    velocity: f32,
    factor: f32,
    stop_velocity: f32,
    last: Instant,
    finished: bool,
}

impl Decay {
    /// Start coasting from `from` at `velocity` (units per millisecond)
    pub fn new(from: f32, velocity: f32, factor: f32, stop_velocity: f32, now: Instant) -> Self {
        Self {
            position: from,
            velocity,
            factor,
            stop_velocity,
            last: now,
            finished: velocity.abs() < stop_velocity,
        }
    }

    /// Upper bound on the distance a decay starting at `velocity` can travel
    pub fn max_travel(velocity: f32, factor: f32) -> f32 {
        velocity.abs() / (1.0 - factor)
    }

    /// Advance whole milliseconds up to `now` and return the new position
    pub fn advance(&mut self, now: Instant) -> f32 {
        if self.finished {
            return self.position;
        }
        let elapsed_ms = now.saturating_duration_since(self.last).as_millis();
        self.last += Duration::from_millis(elapsed_ms as u64);

        for _ in 0..elapsed_ms {
            self.position += self.velocity;
            self.velocity *= self.factor;
            if self.velocity.abs() < self.stop_velocity {
                self.velocity = 0.0;
                self.finished = true;
                break;
            }
        }
        self.position
    }

    /// Move the position by `delta` without touching the velocity
    pub fn shift(&mut self, delta: f32) {
        self.position += delta;
    }

    /// Current position
    pub fn position(&self) -> f32 {
        self.position
    }

    /// Current velocity (units per millisecond)
    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    /// Whether coasting has stopped
    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    // ==========================================================================
    // Easing Tests
    // ==========================================================================

    #[test]
    fn test_easing_endpoints() {
        for easing in [Easing::Linear, Easing::EaseInOut, Easing::EaseOutCubic] {
            assert_eq!(easing.apply(0.0), 0.0);
            assert!((easing.apply(1.0) - 1.0).abs() < 1e-6);
            assert_eq!(easing.apply(-1.0), 0.0);
        }
        assert!(Easing::EaseOutCubic.apply(0.5) > 0.5);
        assert!((Easing::EaseInOut.apply(0.5) - 0.5).abs() < 1e-6);
    }

    // ==========================================================================
    // Tween Tests
    // ==========================================================================

    #[test]
    fn test_tween_progression() {
        let t0 = Instant::now();
        let tween = Tween::new(10.0, 110.0, t0, ms(300), Easing::Linear);
        assert_eq!(tween.value_at(t0), 10.0);
        assert!((tween.value_at(t0 + ms(150)) - 60.0).abs() < 0.01);
        assert!(!tween.is_finished(t0 + ms(299)));
        assert!(tween.is_finished(t0 + ms(300)));
        assert_eq!(tween.value_at(t0 + ms(1000)), 110.0);
    }

    #[test]
    fn test_zero_duration_tween_is_finished() {
        let t0 = Instant::now();
        let tween = Tween::new(0.0, 5.0, t0, Duration::ZERO, Easing::EaseOutCubic);
        assert!(tween.is_finished(t0));
        assert_eq!(tween.value_at(t0), 5.0);
    }

    // ==========================================================================
    // Spring Tests
    // ==========================================================================

    #[test]
    fn test_spring_comes_to_rest_exactly() {
        let t0 = Instant::now();
        let mut spring = Spring::new(SpringConfig::new(220.0, 28.0, 1.0), -40.0, 58.0, 0.0, t0);
        let mut now = t0;
        for _ in 0..200 {
            now += ms(16);
            spring.advance(now);
            if spring.is_at_rest() {
                break;
            }
        }
        assert!(spring.is_at_rest());
        assert_eq!(spring.position(), 58.0);
        assert_eq!(spring.velocity(), 0.0);
    }

    #[test]
    fn test_spring_moves_toward_target() {
        let t0 = Instant::now();
        let mut spring = Spring::new(SpringConfig::default(), 0.0, 100.0, 0.0, t0);
        let early = spring.advance(t0 + ms(16));
        let later = spring.advance(t0 + ms(100));
        assert!(early > 0.0);
        assert!(later > early);
    }

    #[test]
    fn test_spring_already_at_target() {
        let spring = Spring::new(SpringConfig::default(), 3.0, 3.0, 0.0, Instant::now());
        assert!(spring.is_at_rest());
    }

    #[test]
    fn test_spring_config_validation() {
        assert!(SpringConfig::new(200.0, 20.0, 0.8).validate().is_ok());
        assert!(SpringConfig::new(0.0, 20.0, 0.8).validate().is_err());
        assert!(SpringConfig::new(200.0, 20.0, f32::NAN).validate().is_err());
    }

    // ==========================================================================
    // Decay Tests
    // ==========================================================================

    #[test]
    fn test_decay_finishes_within_bound() {
        let t0 = Instant::now();
        let mut decay = Decay::new(0.0, 4.0, 0.993, 0.01, t0);
        let end = decay.advance(t0 + ms(5_000));
        assert!(decay.is_finished());
        assert!(end > 0.0);
        assert!(end <= Decay::max_travel(4.0, 0.993));
    }

    #[test]
    fn test_decay_advances_whole_milliseconds() {
        let t0 = Instant::now();
        let mut decay = Decay::new(0.0, -1.0, 0.5, 0.01, t0);
        decay.advance(t0 + Duration::from_micros(1_500));
        assert_eq!(decay.position(), -1.0);
        decay.advance(t0 + ms(2));
        assert_eq!(decay.position(), -1.5);
    }

    #[test]
    fn test_decay_below_stop_is_finished() {
        let decay = Decay::new(12.0, 0.001, 0.993, 0.01, Instant::now());
        assert!(decay.is_finished());
        assert_eq!(decay.position(), 12.0);
    }
}
