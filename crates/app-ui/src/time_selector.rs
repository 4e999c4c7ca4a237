//! Full-screen time selector overlay
//!
//! Wraps a [`TimeWheel`] in the modal the whole app opens from its header:
//! an animated scrim and content scale, the year caption beside the
//! selection line, a unit column on the right and a close button below the
//! header safe area.
//!
//! Times committed on the wheel are reported as they happen. A unit picked
//! in the column is only a local preview until the overlay closes; closing
//! commits whatever the wheel is pointing at, reports the unit if it
//! changed, then reports the close itself.

use std::sync::Arc;
use std::time::Instant;

use app_platform::{header_safe_area, InsetsProvider};
use app_state::TimeSelectorStore;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use time_wheel::{
    format_caption, format_title, Admission, ArcGeometry, Easing, Spring, TimeUnit, TimeWheel,
    Tween, WheelConfig, WheelEffect, WheelFrame,
};

use crate::tokens::{duration, overlay, spring};

// =============================================================================
// Types
// =============================================================================

/// Visibility of the overlay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayPhase {
    /// Not shown
    Hidden,
    /// Animating in; already interactive
    Opening,
    /// Fully shown
    Open,
    /// Animating out; input ignored
    Closing,
}

/// Something the parent has to act on
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SelectorEvent {
    /// A time was committed
    TimeChange(NaiveDateTime),
    /// A unit was committed on close
    TimeUnitChange(TimeUnit),
    /// The overlay was dismissed
    Close,
    /// The host scroll view should scroll (host-scrolled wheels only)
    ScrollTo {
        /// Target scroll position
        position: f32,
        /// Smooth scroll, or jump
        animated: bool,
    },
}

impl SelectorEvent {
    /// Apply the event to the app-wide selection store
    pub async fn apply_to(self, store: &TimeSelectorStore) {
        match self {
            SelectorEvent::TimeChange(time) => store.set_selected_time(time).await,
            SelectorEvent::TimeUnitChange(unit) => store.set_time_unit(unit).await,
            SelectorEvent::Close => store.close_selector().await,
            SelectorEvent::ScrollTo { .. } => {}
        }
    }
}

/// Positions derived from the viewport
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlayLayout {
    /// Left edge of the selected item's text
    pub anchor_x: f32,
    /// Vertical position of the selection line
    pub anchor_y: f32,
    /// Centre of the text arc, x
    pub arc_center_x: f32,
    /// Left edge of the selection line
    pub indicator_left: f32,
    /// Width of the selection line
    pub indicator_width: f32,
    /// Left edge of the year caption
    pub caption_left: f32,
    /// Top of the unit column
    pub unit_column_top: f32,
    /// Top of the close button
    pub close_button_top: f32,
}

impl OverlayLayout {
    /// Lay out a `width` x `height` viewport with the given header inset
    pub fn compute(width: f32, height: f32, header_inset: f32, arc_radius: f32) -> Self {
        let anchor_x = width * overlay::ANCHOR_X_FRACTION;
        let indicator_left = anchor_x - overlay::INDICATOR_LINE_INSET;
        let indicator_width = width * overlay::INDICATOR_LINE_FRACTION;
        Self {
            anchor_x,
            anchor_y: height * overlay::ANCHOR_Y_FRACTION - overlay::ANCHOR_Y_LIFT,
            arc_center_x: anchor_x - arc_radius,
            indicator_left,
            indicator_width,
            caption_left: indicator_left + indicator_width + overlay::CAPTION_GAP,
            unit_column_top: height * overlay::UNIT_COLUMN_FRACTION,
            close_button_top: header_inset + overlay::CLOSE_BUTTON_GAP,
        }
    }
}

/// One entry of the unit column
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitColumnEntry {
    /// Unit shown
    pub unit: TimeUnit,
    /// Label scale
    pub scale: f32,
    /// Label opacity
    pub opacity: f32,
    /// Whether the wheel shows (or is switching to) this unit
    pub is_active: bool,
}

/// Everything needed to draw the overlay
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayFrame<'a> {
    /// Visibility
    pub phase: OverlayPhase,
    /// Scrim and content opacity
    pub opacity: f32,
    /// Content scale
    pub content_scale: f32,
    /// Header title for the item under the selection line
    pub title: String,
    /// Year caption beside the selection line
    pub caption: String,
    /// Caption opacity, dimming while the wheel is off rest
    pub caption_opacity: f32,
    /// Positions
    pub layout: OverlayLayout,
    /// Unit column
    pub units: Vec<UnitColumnEntry>,
    /// The wheel itself
    pub wheel: WheelFrame<'a>,
}

enum ScaleMotion {
    Spring(Spring),
    Tween(Tween),
}

impl ScaleMotion {
    fn advance(&mut self, now: Instant) -> f32 {
        match self {
            ScaleMotion::Spring(spring) => spring.advance(now),
            ScaleMotion::Tween(tween) => tween.value_at(now),
        }
    }
}

// =============================================================================
// Overlay
// =============================================================================

/// Full-screen selector state
pub struct TimeSelectorOverlay {
    wheel: TimeWheel,
    insets: Arc<dyn InsetsProvider>,
    viewport: (f32, f32),
    phase: OverlayPhase,
    committed_unit: TimeUnit,
    opacity_tween: Option<Tween>,
    scale_motion: Option<ScaleMotion>,
    opacity: f32,
    scale: f32,
    events: Vec<SelectorEvent>,
}

impl TimeSelectorOverlay {
    /// Create a hidden overlay
    pub fn new(
        config: WheelConfig,
        selected: NaiveDateTime,
        unit: TimeUnit,
        insets: Arc<dyn InsetsProvider>,
    ) -> time_wheel::Result<Self> {
        Ok(Self::from_wheel(TimeWheel::new(config, selected, unit)?, insets))
    }

    /// Create a hidden overlay around an existing wheel
    pub fn from_wheel(wheel: TimeWheel, insets: Arc<dyn InsetsProvider>) -> Self {
        Self {
            committed_unit: wheel.time_unit(),
            wheel,
            insets,
            viewport: (0.0, 0.0),
            phase: OverlayPhase::Hidden,
            opacity_tween: None,
            scale_motion: None,
            opacity: 0.0,
            scale: overlay::CLOSED_SCALE,
            events: Vec::new(),
        }
    }

    /// Visibility
    pub fn phase(&self) -> OverlayPhase {
        self.phase
    }

    /// Whether the overlay accepts input
    pub fn is_interactive(&self) -> bool {
        matches!(self.phase, OverlayPhase::Opening | OverlayPhase::Open)
    }

    /// The wheel, for reading state
    pub fn wheel(&self) -> &TimeWheel {
        &self.wheel
    }

    /// The wheel, for feeding gestures; `None` unless interactive
    pub fn wheel_mut(&mut self) -> Option<&mut TimeWheel> {
        if self.is_interactive() {
            Some(&mut self.wheel)
        } else {
            None
        }
    }

    /// Take the events produced since the last call
    pub fn drain_events(&mut self) -> Vec<SelectorEvent> {
        std::mem::take(&mut self.events)
    }

    /// The screen size changed
    pub fn set_viewport(&mut self, width: f32, height: f32) {
        self.viewport = (width, height);
        self.wheel.set_viewport(width);
    }

    /// The parent's committed selection changed
    pub fn set_props(
        &mut self,
        time: NaiveDateTime,
        unit: TimeUnit,
        now: Instant,
    ) -> time_wheel::Result<()> {
        self.committed_unit = unit;
        self.wheel.set_props(time, unit, now)
    }

    /// Show the overlay on the parent's committed selection
    pub fn open(&mut self, selected: NaiveDateTime, unit: TimeUnit, now: Instant) -> time_wheel::Result<()> {
        if self.is_interactive() {
            return Ok(());
        }
        if unit != self.wheel.time_unit() {
            let mut wheel = TimeWheel::new(self.wheel.config().clone(), selected, unit)?;
            wheel.set_viewport(self.viewport.0);
            self.wheel = wheel;
        } else {
            self.wheel.set_props(selected, unit, now)?;
        }
        self.committed_unit = unit;

        tracing::debug!(%selected, %unit, "Opening time selector");
        self.phase = OverlayPhase::Opening;
        self.opacity_tween = Some(Tween::new(
            self.opacity,
            1.0,
            now,
            duration::as_duration(duration::OVERLAY_OPEN),
            Easing::EaseOutCubic,
        ));
        self.scale_motion = Some(ScaleMotion::Spring(Spring::new(
            spring::OVERLAY_SCALE,
            self.scale,
            1.0,
            0.0,
            now,
        )));
        Ok(())
    }

    /// Pick a unit in the column
    ///
    /// The wheel switches immediately; the parent hears about it on close.
    pub fn request_unit(&mut self, unit: TimeUnit, now: Instant) -> Option<Admission> {
        self.wheel_mut().map(|wheel| wheel.request_unit(unit, now))
    }

    /// Dismiss the overlay, committing what the wheel points at
    pub fn close(&mut self, now: Instant) {
        if !self.is_interactive() {
            return;
        }

        self.wheel.flush_selection(now);
        self.collect_wheel_effects();

        let unit = self.wheel.target_unit();
        if unit != self.committed_unit {
            self.committed_unit = unit;
            self.events.push(SelectorEvent::TimeUnitChange(unit));
        }
        self.events.push(SelectorEvent::Close);

        tracing::debug!("Closing time selector");
        self.phase = OverlayPhase::Closing;
        let close = duration::as_duration(duration::OVERLAY_CLOSE);
        self.opacity_tween = Some(Tween::new(self.opacity, 0.0, now, close, Easing::EaseInOut));
        self.scale_motion = Some(ScaleMotion::Tween(Tween::new(
            self.scale,
            overlay::CLOSED_SCALE,
            now,
            close,
            Easing::EaseInOut,
        )));
    }

    /// Advance the overlay and its wheel to `now`
    pub fn tick(&mut self, now: Instant) {
        if self.phase == OverlayPhase::Hidden {
            return;
        }
        if self.is_interactive() {
            self.wheel.tick(now);
            self.collect_wheel_effects();
        }

        if let Some(motion) = self.scale_motion.as_mut() {
            self.scale = motion.advance(now);
        }
        let Some(tween) = self.opacity_tween else {
            return;
        };
        self.opacity = tween.value_at(now);
        if !tween.is_finished(now) {
            return;
        }
        self.opacity_tween = None;
        match self.phase {
            OverlayPhase::Opening => self.phase = OverlayPhase::Open,
            OverlayPhase::Closing => {
                self.phase = OverlayPhase::Hidden;
                self.scale_motion = None;
                self.scale = overlay::CLOSED_SCALE;
            }
            _ => {}
        }
    }

    /// Render-ready snapshot at `now`
    pub fn frame(&self, now: Instant) -> OverlayFrame<'_> {
        let (width, height) = self.viewport;
        let config = self.wheel.config();
        let spacing = config.geometry.item_spacing;
        let radius = ArcGeometry::new(config.geometry.clone(), width).radius();
        let layout =
            OverlayLayout::compute(width, height, header_safe_area(self.insets.as_ref()), radius);

        let unit = self.wheel.time_unit();
        let nearest = self
            .wheel
            .nearest_item()
            .map(|item| item.date)
            .unwrap_or_else(|| self.wheel.selected_time());
        let dim = (self.wheel.offset().abs() / (2.0 * spacing)).min(1.0);

        OverlayFrame {
            phase: self.phase,
            opacity: self.opacity,
            content_scale: self.scale,
            title: format_title(nearest, unit),
            caption: format_caption(nearest, unit),
            caption_opacity: 1.0 - (1.0 - overlay::CAPTION_MIN_OPACITY) * dim,
            layout,
            units: self.unit_column(),
            wheel: self.wheel.frame(now),
        }
    }

    /// Styles for the unit column
    pub fn unit_column(&self) -> Vec<UnitColumnEntry> {
        let active = self.wheel.target_unit();
        TimeUnit::ALL
            .iter()
            .map(|&unit| {
                let is_active = unit == active;
                UnitColumnEntry {
                    unit,
                    scale: if is_active { overlay::ACTIVE_UNIT_SCALE } else { 1.0 },
                    opacity: if is_active { 1.0 } else { overlay::INACTIVE_UNIT_OPACITY },
                    is_active,
                }
            })
            .collect()
    }

    fn collect_wheel_effects(&mut self) {
        for effect in self.wheel.drain_effects() {
            match effect {
                WheelEffect::TimeChanged(time) => self.events.push(SelectorEvent::TimeChange(time)),
                WheelEffect::TimeUnitChanged(unit) => {
                    tracing::debug!(%unit, "Unit change deferred until close");
                }
                WheelEffect::ScrollTo { position, animated } => {
                    self.events.push(SelectorEvent::ScrollTo { position, animated });
                }
            }
        }
    }
}
