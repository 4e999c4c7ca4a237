//! Selection transition orchestration
//!
//! A selection runs through fixed phases: the indicator slides to the
//! chosen item, then a scroll brings that item to the centre, then the
//! orchestrator waits for the scroll to settle before handing the
//! selection back for commit. Each phase starts when the previous one
//! reports completion; there are no assumed durations between phases.
//!
//! Item geometry comes in through [`LayoutBook`], filled from layout
//! callbacks the host reports. Nothing here measures a view tree.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::animation::Tween;
use crate::config::{ScrollSurface, TransitionConfig};

// =============================================================================
// Layout
// =============================================================================

/// Measured extent of one item along the scroll axis, in content coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemLayout {
    /// Leading edge
    pub position: f32,
    /// Extent
    pub size: f32,
}

impl ItemLayout {
    /// Create a layout
    pub fn new(position: f32, size: f32) -> Self {
        Self { position, size }
    }

    /// Midpoint
    pub fn center(&self) -> f32 {
        self.position + self.size / 2.0
    }
}

/// Latest reported item layouts and viewport size
#[derive(Debug, Clone, Default)]
pub struct LayoutBook {
    layouts: HashMap<usize, ItemLayout>,
    viewport: f32,
}

impl LayoutBook {
    /// Empty book
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the layout of `index`, replacing any earlier report
    pub fn record(&mut self, index: usize, layout: ItemLayout) {
        self.layouts.insert(index, layout);
    }

    /// Layout of `index`, if reported since the last clear
    pub fn get(&self, index: usize) -> Option<ItemLayout> {
        self.layouts.get(&index).copied()
    }

    /// Forget every item layout; the viewport is kept
    pub fn clear(&mut self) {
        self.layouts.clear();
    }

    /// Number of recorded items
    pub fn len(&self) -> usize {
        self.layouts.len()
    }

    /// Whether no items are recorded
    pub fn is_empty(&self) -> bool {
        self.layouts.is_empty()
    }

    /// Record the viewport size along the scroll axis
    pub fn set_viewport(&mut self, size: f32) {
        self.viewport = size;
    }

    /// Viewport size along the scroll axis
    pub fn viewport(&self) -> f32 {
        self.viewport
    }
}

/// Scroll position that centres `layout` on the given surface
///
/// Host scroll views cannot scroll before their start, so their targets
/// are clamped to `min_position`. The wheel surface scrolls in item space
/// where the layout centre already is the target.
pub fn recenter_target(layout: ItemLayout, viewport: f32, surface: ScrollSurface) -> f32 {
    match surface {
        ScrollSurface::Wheel => layout.center(),
        ScrollSurface::Host { min_position } => {
            (layout.center() - viewport / 2.0).max(min_position)
        }
    }
}

/// Position and size of the highlight indicator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndicatorGeometry {
    /// Leading edge
    pub position: f32,
    /// Extent
    pub size: f32,
}

impl From<ItemLayout> for IndicatorGeometry {
    fn from(layout: ItemLayout) -> Self {
        Self {
            position: layout.position,
            size: layout.size,
        }
    }
}

// =============================================================================
// Settle detection
// =============================================================================

/// Why a scroll counts as settled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SettleReason {
    /// Position came within tolerance of the target
    Reached,
    /// Position stopped moving
    Idle,
    /// Detection gave up
    TimedOut,
}

/// Decides when a scroll has come to rest
///
/// Whichever happens first wins: the position reaches the target, the
/// position stays still for the idle window, or the hard timeout expires.
#[derive(Debug, Clone)]
pub struct SettleDetector {
    target: f32,
    close: f32,
    idle_distance: f32,
    idle_window: Duration,
    timeout: Duration,
    started: Instant,
    last_position: Option<f32>,
    last_moved: Instant,
}

impl SettleDetector {
    /// Start watching a scroll toward `target`
    pub fn new(target: f32, config: &TransitionConfig, now: Instant) -> Self {
        Self {
            target,
            close: config.settle_close_px,
            idle_distance: config.settle_idle_px,
            idle_window: config.settle_idle(),
            timeout: config.settle_timeout(),
            started: now,
            last_position: None,
            last_moved: now,
        }
    }

    /// Target position
    pub fn target(&self) -> f32 {
        self.target
    }

    /// Feed one position sample
    pub fn observe(&mut self, position: f32, now: Instant) -> Option<SettleReason> {
        if (position - self.target).abs() < self.close {
            return Some(SettleReason::Reached);
        }
        if now.saturating_duration_since(self.started) >= self.timeout {
            return Some(SettleReason::TimedOut);
        }
        match self.last_position {
            Some(last) if (position - last).abs() <= self.idle_distance => {
                if now.saturating_duration_since(self.last_moved) >= self.idle_window {
                    return Some(SettleReason::Idle);
                }
            }
            _ => {
                self.last_position = Some(position);
                self.last_moved = now;
            }
        }
        None
    }
}

// =============================================================================
// Orchestrator
// =============================================================================

/// Selection transition phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionPhase {
    /// Nothing pending
    Idle,
    /// The indicator is sliding to the chosen item
    MovingIndicator,
    /// Waiting for the recentering scroll to settle
    Recentering,
}

/// Progress reported by [`SelectionOrchestrator::tick`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransitionStep {
    /// The indicator arrived; start the recentering scroll
    IndicatorArrived {
        /// Chosen item
        index: usize,
    },
    /// The scroll settled; commit the selection
    Settled {
        /// Chosen item
        index: usize,
        /// Its date
        date: NaiveDateTime,
        /// What ended the wait
        reason: SettleReason,
    },
}

#[derive(Debug, Clone)]
enum Stage {
    Idle,
    MovingIndicator {
        position: Tween,
        size: Tween,
    },
    Recentering {
        detector: SettleDetector,
    },
}

/// Runs one selection at a time from indicator slide to commit
#[derive(Debug, Clone)]
pub struct SelectionOrchestrator {
    config: TransitionConfig,
    stage: Stage,
    target: Option<(usize, NaiveDateTime)>,
}

impl SelectionOrchestrator {
    /// Create an idle orchestrator
    pub fn new(config: TransitionConfig) -> Self {
        Self {
            config,
            stage: Stage::Idle,
            target: None,
        }
    }

    /// Current phase
    pub fn phase(&self) -> TransitionPhase {
        match self.stage {
            Stage::Idle => TransitionPhase::Idle,
            Stage::MovingIndicator { .. } => TransitionPhase::MovingIndicator,
            Stage::Recentering { .. } => TransitionPhase::Recentering,
        }
    }

    /// Whether a selection is in flight
    pub fn is_pending(&self) -> bool {
        self.target.is_some()
    }

    /// Date of the selection in flight
    pub fn pending_selection(&self) -> Option<NaiveDateTime> {
        self.target.map(|(_, date)| date)
    }

    /// Item of the selection in flight
    pub fn target_index(&self) -> Option<usize> {
        self.target.map(|(index, _)| index)
    }

    /// Start a selection of `index`
    ///
    /// The indicator slides from `from` to `to`, or jumps there when
    /// `animate` is false. Returns false, changing nothing, if a selection
    /// is already pending.
    pub fn begin(
        &mut self,
        index: usize,
        date: NaiveDateTime,
        from: IndicatorGeometry,
        to: IndicatorGeometry,
        animate: bool,
        now: Instant,
    ) -> bool {
        if self.is_pending() {
            return false;
        }
        let duration = if animate {
            self.config.indicator_duration()
        } else {
            Duration::ZERO
        };
        let easing = self.config.indicator_easing;
        self.stage = Stage::MovingIndicator {
            position: Tween::new(from.position, to.position, now, duration, easing),
            size: Tween::new(from.size, to.size, now, duration, easing),
        };
        self.target = Some((index, date));
        debug!(index, %date, animate, "selection started");
        true
    }

    /// Indicator geometry while it is sliding
    pub fn indicator_at(&self, now: Instant) -> Option<IndicatorGeometry> {
        match &self.stage {
            Stage::MovingIndicator { position, size } => Some(IndicatorGeometry {
                position: position.value_at(now),
                size: size.value_at(now),
            }),
            _ => None,
        }
    }

    /// The recentering scroll toward `target_position` has been started
    pub fn start_recenter(&mut self, target_position: f32, now: Instant) {
        if !matches!(self.stage, Stage::MovingIndicator { .. }) {
            return;
        }
        debug!(target_position, "recentering");
        self.stage = Stage::Recentering {
            detector: SettleDetector::new(target_position, &self.config, now),
        };
    }

    /// Advance to `now` given the current scroll position
    pub fn tick(&mut self, now: Instant, scroll_position: f32) -> Option<TransitionStep> {
        let (index, date) = self.target?;
        match &mut self.stage {
            Stage::Idle => None,
            Stage::MovingIndicator { position, .. } => position
                .is_finished(now)
                .then_some(TransitionStep::IndicatorArrived { index }),
            Stage::Recentering { detector } => {
                let reason = detector.observe(scroll_position, now)?;
                debug!(index, ?reason, scroll_position, "scroll settled");
                Some(TransitionStep::Settled { index, date, reason })
            }
        }
    }

    /// The settled selection has been committed; clear it
    pub fn complete(&mut self) {
        self.stage = Stage::Idle;
        self.target = None;
    }

    /// Drop the selection in flight without committing it
    pub fn cancel(&mut self) {
        if let Some((index, _)) = self.target {
            debug!(index, "selection cancelled");
        }
        self.complete();
    }
}
