//! Granularity switch animation
//!
//! Replacing the item list when the unit changes is animated so the data
//! swap itself is never visible. In the roll-over style the old list slides
//! off one side, the data is swapped while nothing is on screen, and the new
//! list springs back in from the other side. In the fade style the list
//! fades out, the data is swapped, and fade-in waits for the new layout.

use std::fmt;
use std::time::{Duration, Instant};

use rand::Rng;
use tracing::{debug, warn};

use crate::animation::{Easing, Spring, Tween};
use crate::config::{SwitchConfig, SwitchStyle};
use crate::time::TimeUnit;

// =============================================================================
// Direction
// =============================================================================

/// Roll direction along the scroll axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Toward positive offsets
    Forward,
    /// Toward negative offsets
    Backward,
}

impl Direction {
    /// `1.0` or `-1.0`
    pub fn sign(self) -> f32 {
        match self {
            Direction::Forward => 1.0,
            Direction::Backward => -1.0,
        }
    }
}

/// Picks the direction of each roll-over
pub trait DirectionSource: Send {
    /// Direction of the next switch
    fn next_direction(&mut self) -> Direction;
}

/// Uniformly random direction
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomDirection;

impl DirectionSource for RandomDirection {
    fn next_direction(&mut self) -> Direction {
        if rand::rng().random_bool(0.5) {
            Direction::Forward
        } else {
            Direction::Backward
        }
    }
}

impl<F> DirectionSource for F
where
    F: FnMut() -> Direction + Send,
{
    fn next_direction(&mut self) -> Direction {
        self()
    }
}

// =============================================================================
// Animator
// =============================================================================

/// Switch phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchPhase {
    /// No switch in flight
    Stable,
    /// The old list is leaving
    ExitingOld,
    /// Data swapped; waiting for the new list to be laid out (fade style)
    AwaitingLayout,
    /// The new list is arriving
    EnteringNew,
}

/// Progress reported by [`UnitSwitchAnimator::tick`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchStep {
    /// The old list is out of sight; swap the data to this unit now
    Swap(TimeUnit),
    /// The new list is at rest
    Settled,
}

enum Motion {
    Stable,
    Exiting { target: TimeUnit, tween: Tween },
    AwaitingLayout { since: Instant },
    RollingIn(Spring),
    FadingIn(Tween),
}

/// Animates the item list out and back in around a unit swap
pub struct UnitSwitchAnimator {
    config: SwitchConfig,
    travel: f32,
    motion: Motion,
    shift: f32,
    opacity: f32,
    directions: Box<dyn DirectionSource>,
}

impl fmt::Debug for UnitSwitchAnimator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnitSwitchAnimator")
            .field("style", &self.config.style)
            .field("phase", &self.phase())
            .field("shift", &self.shift)
            .field("opacity", &self.opacity)
            .finish()
    }
}

impl UnitSwitchAnimator {
    /// Create an animator rolling by `travel_items` × `item_spacing`
    pub fn new(config: SwitchConfig, item_spacing: f32) -> Self {
        Self::with_directions(config, item_spacing, Box::new(RandomDirection))
    }

    /// Create an animator with an explicit direction source
    pub fn with_directions(
        config: SwitchConfig,
        item_spacing: f32,
        directions: Box<dyn DirectionSource>,
    ) -> Self {
        let travel = config.travel_items * item_spacing;
        Self {
            config,
            travel,
            motion: Motion::Stable,
            shift: 0.0,
            opacity: 1.0,
            directions,
        }
    }

    /// Current phase
    pub fn phase(&self) -> SwitchPhase {
        match self.motion {
            Motion::Stable => SwitchPhase::Stable,
            Motion::Exiting { .. } => SwitchPhase::ExitingOld,
            Motion::AwaitingLayout { .. } => SwitchPhase::AwaitingLayout,
            Motion::RollingIn(_) | Motion::FadingIn(_) => SwitchPhase::EnteringNew,
        }
    }

    /// Whether a switch is in flight
    pub fn is_switching(&self) -> bool {
        !matches!(self.motion, Motion::Stable)
    }

    /// Unit being switched to, until the swap happens
    pub fn pending_unit(&self) -> Option<TimeUnit> {
        match self.motion {
            Motion::Exiting { target, .. } => Some(target),
            _ => None,
        }
    }

    /// Whole-list displacement along the scroll axis
    pub fn list_shift(&self) -> f32 {
        self.shift
    }

    /// Whole-list opacity
    pub fn list_opacity(&self) -> f32 {
        self.opacity
    }

    /// Start switching to `target`
    ///
    /// Returns false, changing nothing, while another switch is in flight.
    pub fn request(&mut self, target: TimeUnit, now: Instant) -> bool {
        if self.is_switching() {
            return false;
        }
        let tween = match self.config.style {
            SwitchStyle::RollOver => {
                let direction = self.directions.next_direction();
                debug!(%target, ?direction, "rolling list out");
                Tween::new(
                    0.0,
                    direction.sign() * self.travel,
                    now,
                    Duration::from_millis(self.config.exit_duration_ms),
                    Easing::EaseOutCubic,
                )
            }
            SwitchStyle::Fade => {
                debug!(%target, "fading list out");
                Tween::new(
                    1.0,
                    0.0,
                    now,
                    Duration::from_millis(self.config.fade_out_ms),
                    Easing::EaseOutCubic,
                )
            }
        };
        self.motion = Motion::Exiting { target, tween };
        true
    }

    /// The swapped list has been laid out; fade it in
    pub fn layout_ready(&mut self, now: Instant) {
        if let Motion::AwaitingLayout { .. } = self.motion {
            debug!("new list laid out, fading in");
            self.fade_in(now);
        }
    }

    fn fade_in(&mut self, now: Instant) {
        self.motion = Motion::FadingIn(Tween::new(
            0.0,
            1.0,
            now,
            Duration::from_millis(self.config.fade_in_ms),
            Easing::EaseOutCubic,
        ));
    }

    /// Advance to `now`
    pub fn tick(&mut self, now: Instant) -> Option<SwitchStep> {
        match &mut self.motion {
            Motion::Stable => None,
            Motion::Exiting { target, tween } => {
                let value = tween.value_at(now);
                let finished = tween.is_finished(now);
                let target = *target;
                match self.config.style {
                    SwitchStyle::RollOver => self.shift = value,
                    SwitchStyle::Fade => self.opacity = value,
                }
                if !finished {
                    return None;
                }
                self.motion = match self.config.style {
                    SwitchStyle::RollOver => {
                        // Re-enter from the opposite side
                        self.shift = -self.shift;
                        Motion::RollingIn(Spring::new(
                            self.config.enter_spring,
                            self.shift,
                            0.0,
                            0.0,
                            now,
                        ))
                    }
                    SwitchStyle::Fade => Motion::AwaitingLayout { since: now },
                };
                Some(SwitchStep::Swap(target))
            }
            Motion::AwaitingLayout { since } => {
                let waited = now.saturating_duration_since(*since);
                if waited >= Duration::from_millis(self.config.layout_timeout_ms) {
                    warn!(
                        waited_ms = waited.as_millis() as u64,
                        "no layout pass after unit swap, fading in anyway"
                    );
                    self.fade_in(now);
                }
                None
            }
            Motion::RollingIn(spring) => {
                self.shift = spring.advance(now);
                if !spring.is_at_rest() {
                    return None;
                }
                self.shift = 0.0;
                self.motion = Motion::Stable;
                debug!("list rolled in");
                Some(SwitchStep::Settled)
            }
            Motion::FadingIn(tween) => {
                self.opacity = tween.value_at(now);
                if !tween.is_finished(now) {
                    return None;
                }
                self.opacity = 1.0;
                self.motion = Motion::Stable;
                debug!("list faded in");
                Some(SwitchStep::Settled)
            }
        }
    }

    /// Abandon the switch and show the list at rest
    pub fn reset(&mut self) {
        self.motion = Motion::Stable;
        self.shift = 0.0;
        self.opacity = 1.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn animator(style: SwitchStyle, direction: Direction) -> UnitSwitchAnimator {
        let config = SwitchConfig {
            style,
            ..SwitchConfig::default()
        };
        UnitSwitchAnimator::with_directions(config, 58.0, Box::new(move || direction))
    }

    fn run(animator: &mut UnitSwitchAnimator, from: Instant, until: Instant) -> Vec<SwitchStep> {
        let mut steps = Vec::new();
        let mut now = from;
        while now < until {
            now += ms(16);
            steps.extend(animator.tick(now));
        }
        steps
    }

    // ==========================================================================
    // Roll-over Tests
    // ==========================================================================

    #[test]
    fn test_roll_over_sequence() {
        let t0 = Instant::now();
        let mut switch = animator(SwitchStyle::RollOver, Direction::Forward);
        assert!(switch.request(TimeUnit::Month, t0));
        assert_eq!(switch.phase(), SwitchPhase::ExitingOld);
        assert_eq!(switch.pending_unit(), Some(TimeUnit::Month));

        switch.tick(t0 + ms(75));
        assert!(switch.list_shift() > 0.0 && switch.list_shift() < 348.0);

        assert_eq!(switch.tick(t0 + ms(150)), Some(SwitchStep::Swap(TimeUnit::Month)));
        assert_eq!(switch.phase(), SwitchPhase::EnteringNew);
        assert_eq!(switch.pending_unit(), None);
        assert_eq!(switch.list_shift(), -348.0);

        let steps = run(&mut switch, t0 + ms(150), t0 + ms(3_000));
        assert_eq!(steps, vec![SwitchStep::Settled]);
        assert_eq!(switch.list_shift(), 0.0);
        assert_eq!(switch.phase(), SwitchPhase::Stable);
    }

    #[test]
    fn test_backward_roll_enters_from_positive_side() {
        let t0 = Instant::now();
        let mut switch = animator(SwitchStyle::RollOver, Direction::Backward);
        switch.request(TimeUnit::Week, t0);
        switch.tick(t0 + ms(150));
        assert_eq!(switch.list_shift(), 348.0);
    }

    #[test]
    fn test_second_request_ignored_mid_switch() {
        let t0 = Instant::now();
        let mut switch = animator(SwitchStyle::RollOver, Direction::Forward);
        assert!(switch.request(TimeUnit::Month, t0));
        assert!(!switch.request(TimeUnit::Year, t0 + ms(10)));
        assert_eq!(switch.tick(t0 + ms(150)), Some(SwitchStep::Swap(TimeUnit::Month)));
        assert!(!switch.request(TimeUnit::Year, t0 + ms(160)));
    }

    // ==========================================================================
    // Fade Tests
    // ==========================================================================

    #[test]
    fn test_fade_waits_for_layout() {
        let t0 = Instant::now();
        let mut switch = animator(SwitchStyle::Fade, Direction::Forward);
        switch.request(TimeUnit::Hour, t0);
        assert_eq!(switch.tick(t0 + ms(150)), Some(SwitchStep::Swap(TimeUnit::Hour)));
        assert_eq!(switch.list_opacity(), 0.0);
        assert_eq!(switch.phase(), SwitchPhase::AwaitingLayout);

        assert_eq!(switch.tick(t0 + ms(300)), None);
        assert_eq!(switch.phase(), SwitchPhase::AwaitingLayout);

        switch.layout_ready(t0 + ms(310));
        assert_eq!(switch.phase(), SwitchPhase::EnteringNew);
        assert_eq!(switch.tick(t0 + ms(410)), None);
        assert!(switch.list_opacity() > 0.0 && switch.list_opacity() < 1.0);
        assert_eq!(switch.tick(t0 + ms(510)), Some(SwitchStep::Settled));
        assert_eq!(switch.list_opacity(), 1.0);
        assert_eq!(switch.list_shift(), 0.0);
    }

    #[test]
    fn test_fade_safety_timeout() {
        let t0 = Instant::now();
        let mut switch = animator(SwitchStyle::Fade, Direction::Forward);
        switch.request(TimeUnit::Hour, t0);
        switch.tick(t0 + ms(150));
        assert_eq!(switch.tick(t0 + ms(649)), None);
        assert_eq!(switch.phase(), SwitchPhase::AwaitingLayout);
        switch.tick(t0 + ms(650));
        assert_eq!(switch.phase(), SwitchPhase::EnteringNew);
        assert_eq!(switch.tick(t0 + ms(850)), Some(SwitchStep::Settled));
    }

    #[test]
    fn test_random_direction_produces_both() {
        let mut source = RandomDirection;
        let draws: Vec<Direction> = (0..200).map(|_| source.next_direction()).collect();
        assert!(draws.contains(&Direction::Forward));
        assert!(draws.contains(&Direction::Backward));
    }
}
