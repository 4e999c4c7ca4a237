//! Drag, inertia, and snap controller
//!
//! Owns the wheel's continuous scroll offset. A drag moves the offset
//! directly, a release coasts under exponential decay, and once coasting
//! stops the offset springs onto the nearest item. Starting a new drag
//! interrupts whatever motion is in flight and keeps no velocity from it.

use std::time::Instant;

use tracing::debug;

use crate::animation::{Decay, Spring, SpringConfig};
use crate::config::GestureConfig;

/// Coarse gesture state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GesturePhase {
    /// No motion
    Idle,
    /// A touch is down and following the finger
    Dragging,
    /// Coasting after release
    Decaying,
    /// Springing onto an item
    Settling,
}

#[derive(Debug, Clone)]
enum Motion {
    Idle,
    Dragging { start_offset: f32, captured: bool },
    Decaying(Decay),
    Settling { spring: Spring, index: usize },
}

/// Converts gestures into a scroll offset
#[derive(Debug, Clone)]
pub struct GestureController {
    config: GestureConfig,
    spacing: f32,
    item_count: usize,
    offset: f32,
    motion: Motion,
}

impl GestureController {
    /// Create a controller for a window of `item_count` items
    pub fn new(config: GestureConfig, spacing: f32, item_count: usize) -> Self {
        Self {
            config,
            spacing,
            item_count: item_count.max(1),
            offset: 0.0,
            motion: Motion::Idle,
        }
    }

    /// Current scroll offset
    pub fn offset(&self) -> f32 {
        self.offset
    }

    /// Current phase
    pub fn phase(&self) -> GesturePhase {
        match self.motion {
            Motion::Idle => GesturePhase::Idle,
            Motion::Dragging { .. } => GesturePhase::Dragging,
            Motion::Decaying(_) => GesturePhase::Decaying,
            Motion::Settling { .. } => GesturePhase::Settling,
        }
    }

    /// Whether a touch is down
    pub fn is_dragging(&self) -> bool {
        matches!(self.motion, Motion::Dragging { .. })
    }

    /// Whether nothing is moving
    pub fn is_idle(&self) -> bool {
        matches!(self.motion, Motion::Idle)
    }

    /// Index of the item on the selection line at rest
    pub fn center_index(&self) -> usize {
        self.item_count / 2
    }

    /// Offset at which `index` rests on the selection line
    pub fn rest_offset(&self, index: usize) -> f32 {
        -(index as f32 - self.center_index() as f32) * self.spacing
    }

    /// Whether the offset sits exactly on an item
    pub fn is_at_rest_position(&self) -> bool {
        self.offset == self.rest_offset(self.nearest_index())
    }

    /// `round(-offset / spacing) + center`, clamped into the window
    pub fn nearest_index(&self) -> usize {
        let steps = (-self.offset / self.spacing).round() as i64;
        let last = self.item_count as i64 - 1;
        (steps + self.center_index() as i64).clamp(0, last) as usize
    }

    // =========================================================================
    // Drag
    // =========================================================================

    /// A touch went down; any motion in flight stops where it is
    pub fn drag_start(&mut self) {
        if !self.is_idle() {
            debug!(offset = self.offset, phase = ?self.phase(), "motion interrupted by drag");
        }
        self.motion = Motion::Dragging {
            start_offset: self.offset,
            captured: false,
        };
    }

    /// The touch moved by `total_delta` since it went down
    ///
    /// Returns whether the offset changed. Movement inside the drag slop
    /// does not capture the gesture.
    pub fn drag_move(&mut self, total_delta: f32) -> bool {
        let Motion::Dragging { start_offset, captured } = &mut self.motion else {
            return false;
        };
        if !*captured && total_delta.abs() <= self.config.drag_slop {
            return false;
        }
        *captured = true;
        self.offset = *start_offset + total_delta;
        true
    }

    /// The touch lifted with `velocity` in px/ms
    pub fn drag_end(&mut self, velocity: f32, now: Instant) {
        if !self.is_dragging() {
            return;
        }
        let max = self.config.max_velocity;
        let velocity = velocity.clamp(-max, max);
        if velocity.abs() < self.config.stop_velocity {
            self.settle_nearest(now);
            return;
        }
        debug!(offset = self.offset, velocity, "coasting");
        self.motion = Motion::Decaying(Decay::new(
            self.offset,
            velocity,
            self.config.decay_factor,
            self.config.stop_velocity,
            now,
        ));
    }

    // =========================================================================
    // Programmatic motion
    // =========================================================================

    /// Spring onto the nearest item
    pub fn settle_nearest(&mut self, now: Instant) {
        let index = self.nearest_index();
        let spring = self.config.snap_spring;
        self.snap_to(index, spring, now);
    }

    /// Spring onto `index` (clamped into the window)
    pub fn snap_to(&mut self, index: usize, spring: SpringConfig, now: Instant) {
        let index = index.min(self.item_count - 1);
        let target = self.rest_offset(index);
        debug!(from = self.offset, target, index, "settling");
        self.motion = Motion::Settling {
            spring: Spring::new(spring, self.offset, target, 0.0, now),
            index,
        };
    }

    /// Jump to `offset` with no motion
    pub fn place(&mut self, offset: f32) {
        self.offset = offset;
        self.motion = Motion::Idle;
    }

    /// Stop coasting or settling where it is; a touch that is down stays down
    pub fn cancel(&mut self) {
        if let Motion::Dragging { .. } = self.motion {
            return;
        }
        self.motion = Motion::Idle;
    }

    /// Shift everything by `steps` items after the window was regenerated
    /// around an item `steps` away from the old centre
    ///
    /// Positions on screen do not change: the item that was at index
    /// `i` is now at `i - steps`, and the offset moves by the same amount.
    pub fn rebase(&mut self, steps: i64) {
        let delta = steps as f32 * self.spacing;
        self.offset += delta;
        let last = self.item_count as i64 - 1;
        match &mut self.motion {
            Motion::Idle => {}
            Motion::Dragging { start_offset, .. } => *start_offset += delta,
            Motion::Decaying(decay) => decay.shift(delta),
            Motion::Settling { spring, index } => {
                spring.shift(delta);
                *index = (*index as i64 - steps).clamp(0, last) as usize;
            }
        }
    }

    /// Advance motion to `now`
    ///
    /// Returns the item index when a settle completes; the offset is then
    /// exactly that item's rest offset.
    pub fn tick(&mut self, now: Instant) -> Option<usize> {
        let coasted_out = match &mut self.motion {
            Motion::Decaying(decay) => {
                self.offset = decay.advance(now);
                decay.is_finished()
            }
            _ => false,
        };
        if coasted_out {
            self.settle_nearest(now);
        }

        let settled = match &mut self.motion {
            Motion::Settling { spring, index } => {
                self.offset = spring.advance(now);
                spring.is_at_rest().then_some(*index)
            }
            _ => None,
        };
        if let Some(index) = settled {
            self.offset = self.rest_offset(index);
            self.motion = Motion::Idle;
            debug!(index, offset = self.offset, "settled");
        }
        settled
    }
}
