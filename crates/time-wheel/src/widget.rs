//! The time wheel state machine
//!
//! [`TimeWheel`] composes the item window, arc geometry, gesture controller,
//! selection orchestrator and switch animator into one widget core. The host
//! drives it with three kinds of input:
//!
//! - gestures and taps (`drag_*`, [`TimeWheel::tap`], [`TimeWheel::request_unit`])
//! - environment reports (viewport size, item layouts, layout passes, host
//!   scroll positions)
//! - frame timestamps ([`TimeWheel::tick`])
//!
//! and reads back a [`WheelFrame`] to render plus [`WheelEffect`]s for the
//! parent. The committed `(time, unit)` pair belongs to the parent; the
//! wheel reports changes and waits for them to come back through
//! [`TimeWheel::set_props`], which is a no-op for values it already shows.

use std::time::Instant;

use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::config::{ScrollSurface, WheelConfig};
use crate::error::Result;
use crate::geometry::{ArcGeometry, ItemTransform};
use crate::gesture::{GestureController, GesturePhase};
use crate::items::{WheelItem, WheelWindow};
use crate::switch::{DirectionSource, SwitchPhase, SwitchStep, UnitSwitchAnimator};
use crate::time::TimeUnit;
use crate::transition::{
    recenter_target, IndicatorGeometry, ItemLayout, LayoutBook, SelectionOrchestrator,
    TransitionPhase, TransitionStep,
};

/// Viewport width assumed until the host reports one
const DEFAULT_VIEWPORT: f32 = 390.0;

// =============================================================================
// Outputs
// =============================================================================

/// Something the parent or host has to act on
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WheelEffect {
    /// The user committed a new time
    TimeChanged(NaiveDateTime),
    /// The user switched granularity
    TimeUnitChanged(TimeUnit),
    /// The host scroll view should scroll (host surface only)
    ScrollTo {
        /// Target scroll position
        position: f32,
        /// Smooth scroll, or jump
        animated: bool,
    },
}

/// Outcome of a user request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// The request started something
    Accepted,
    /// The request was dropped
    Rejected(RejectReason),
}

impl Admission {
    /// Whether the request was accepted
    pub fn is_accepted(self) -> bool {
        matches!(self, Admission::Accepted)
    }
}

/// Why a request was dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RejectReason {
    /// A selection is already in flight
    TransitionPending,
    /// A granularity switch is in flight
    SwitchInFlight,
    /// The item is already the active one
    AlreadyActive,
    /// The unit is already the active one
    SameUnit,
    /// The item has not been laid out yet
    LayoutUnavailable,
    /// No such item
    OutOfRange,
}

/// One item ready to render
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemFrame<'a> {
    /// Position in the window
    pub index: usize,
    /// Dated item
    pub item: &'a WheelItem,
    /// Whether this is the visually active item
    pub is_active: bool,
    /// Arc transform
    pub transform: ItemTransform,
}

/// Everything needed to draw one frame
#[derive(Debug, Clone, PartialEq)]
pub struct WheelFrame<'a> {
    /// Scroll offset the transforms were computed for, including the list shift
    pub offset: f32,
    /// Whole-list shift from a roll-over switch
    pub list_shift: f32,
    /// Whole-list opacity from a fade switch
    pub list_opacity: f32,
    /// Highlighted item
    pub visual_active_index: usize,
    /// Indicator geometry, once measured
    pub indicator: Option<IndicatorGeometry>,
    /// Whether indicator changes should animate; when false they snap
    pub indicator_animated: bool,
    /// Every item of the window
    pub items: Vec<ItemFrame<'a>>,
    /// Decorative arc radii
    pub decoration_radii: Vec<f32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Readiness {
    Disabled,
    Aligned,
    Ready,
}

// =============================================================================
// Widget
// =============================================================================

/// Headless time wheel
#[derive(Debug)]
pub struct TimeWheel {
    config: WheelConfig,
    selected: NaiveDateTime,
    unit: TimeUnit,
    window: WheelWindow,
    geometry: ArcGeometry,
    gesture: GestureController,
    orchestrator: SelectionOrchestrator,
    switcher: UnitSwitchAnimator,
    layouts: LayoutBook,
    visual_active: usize,
    indicator: Option<IndicatorGeometry>,
    readiness: Readiness,
    host_position: f32,
    props_time: NaiveDateTime,
    props_unit: TimeUnit,
    report_swap: bool,
    effects: Vec<WheelEffect>,
}

impl TimeWheel {
    /// Create a wheel showing `selected` at `unit` granularity
    pub fn new(config: WheelConfig, selected: NaiveDateTime, unit: TimeUnit) -> Result<Self> {
        config.validate()?;
        let window = WheelWindow::generate(selected, unit, config.window_radius)?;
        let spacing = config.geometry.item_spacing;
        let mut layouts = LayoutBook::new();
        layouts.set_viewport(DEFAULT_VIEWPORT);

        Ok(Self {
            geometry: ArcGeometry::new(config.geometry.clone(), DEFAULT_VIEWPORT),
            gesture: GestureController::new(config.gesture.clone(), spacing, window.len()),
            orchestrator: SelectionOrchestrator::new(config.transition.clone()),
            switcher: UnitSwitchAnimator::new(config.switch.clone(), spacing),
            visual_active: window.center_index(),
            layouts,
            window,
            selected,
            unit,
            config,
            indicator: None,
            readiness: Readiness::Disabled,
            host_position: 0.0,
            props_time: selected,
            props_unit: unit,
            report_swap: false,
            effects: Vec::new(),
        })
    }

    /// Replace the roll-over direction source
    pub fn with_directions(mut self, directions: Box<dyn DirectionSource>) -> Self {
        self.switcher = UnitSwitchAnimator::with_directions(
            self.config.switch.clone(),
            self.config.geometry.item_spacing,
            directions,
        );
        self
    }

    // =========================================================================
    // State
    // =========================================================================

    /// Configuration in use
    pub fn config(&self) -> &WheelConfig {
        &self.config
    }

    /// Current item window
    pub fn window(&self) -> &WheelWindow {
        &self.window
    }

    /// Time the window is centred on
    pub fn selected_time(&self) -> NaiveDateTime {
        self.selected
    }

    /// Granularity shown
    pub fn time_unit(&self) -> TimeUnit {
        self.unit
    }

    /// Granularity the wheel is showing or switching to
    pub fn target_unit(&self) -> TimeUnit {
        self.switcher.pending_unit().unwrap_or(self.unit)
    }

    /// Item closest to the selection line
    ///
    /// Follows the finger and inertia on the wheel surface; host surfaces
    /// report the highlighted item.
    pub fn nearest_item(&self) -> Option<&WheelItem> {
        let index = match self.config.surface {
            ScrollSurface::Wheel => self.gesture.nearest_index(),
            ScrollSurface::Host { .. } => self.visual_active,
        };
        self.window.get(index)
    }

    /// Highlighted item
    pub fn visual_active_index(&self) -> usize {
        self.visual_active
    }

    /// Date of the selection in flight
    pub fn pending_selection(&self) -> Option<NaiveDateTime> {
        self.orchestrator.pending_selection()
    }

    /// Whether indicator movement animates
    pub fn is_indicator_ready(&self) -> bool {
        self.readiness == Readiness::Ready
    }

    /// Selection transition phase
    pub fn transition_phase(&self) -> TransitionPhase {
        self.orchestrator.phase()
    }

    /// Gesture phase
    pub fn gesture_phase(&self) -> GesturePhase {
        self.gesture.phase()
    }

    /// Granularity switch phase
    pub fn switch_phase(&self) -> SwitchPhase {
        self.switcher.phase()
    }

    /// Wheel scroll offset
    pub fn offset(&self) -> f32 {
        self.gesture.offset()
    }

    /// Current position on the active scroll surface
    pub fn scroll_position(&self) -> f32 {
        match self.config.surface {
            ScrollSurface::Wheel => -self.gesture.offset(),
            ScrollSurface::Host { .. } => self.host_position,
        }
    }

    /// Take the effects produced since the last call
    pub fn drain_effects(&mut self) -> Vec<WheelEffect> {
        std::mem::take(&mut self.effects)
    }

    fn is_wheel_surface(&self) -> bool {
        matches!(self.config.surface, ScrollSurface::Wheel)
    }

    /// Item extent on the active surface
    ///
    /// The wheel surface derives extents from the item spacing, measured
    /// from the selection line; host surfaces use reported layouts.
    fn layout_of(&self, index: usize) -> Option<ItemLayout> {
        match self.config.surface {
            ScrollSurface::Wheel => {
                if index >= self.window.len() {
                    return None;
                }
                let spacing = self.config.geometry.item_spacing;
                let steps = self.window.steps_from_center(index) as f32;
                Some(ItemLayout::new(steps * spacing - spacing / 2.0, spacing))
            }
            ScrollSurface::Host { .. } => self.layouts.get(index),
        }
    }

    // =========================================================================
    // Environment reports
    // =========================================================================

    /// Viewport size along the scroll axis changed
    pub fn set_viewport(&mut self, width: f32) {
        self.layouts.set_viewport(width);
        self.geometry = ArcGeometry::new(self.config.geometry.clone(), width);
    }

    /// An item was laid out at `position` with extent `size`
    ///
    /// Only host surfaces use these reports.
    pub fn report_layout(&mut self, index: usize, position: f32, size: f32) {
        if self.is_wheel_surface() || index >= self.window.len() {
            return;
        }
        self.layouts.record(index, ItemLayout::new(position, size));
    }

    /// The host scroll view moved
    pub fn report_scroll(&mut self, position: f32) {
        if let ScrollSurface::Host { .. } = self.config.surface {
            self.host_position = position;
        }
    }

    /// The host finished laying out the current window
    ///
    /// Aligns the indicator with the active item if it was disabled;
    /// animation is re-enabled on the following tick.
    pub fn finish_layout_pass(&mut self, now: Instant) {
        self.switcher.layout_ready(now);
        if self.readiness != Readiness::Disabled {
            return;
        }
        let Some(layout) = self.layout_of(self.visual_active) else {
            debug!(index = self.visual_active, "active item not laid out yet");
            return;
        };
        self.indicator = Some(layout.into());
        if let ScrollSurface::Host { .. } = self.config.surface {
            let position = recenter_target(layout, self.layouts.viewport(), self.config.surface);
            self.host_position = position;
            self.effects.push(WheelEffect::ScrollTo {
                position,
                animated: false,
            });
        }
        self.readiness = Readiness::Aligned;
        debug!(index = self.visual_active, "indicator aligned");
    }

    // =========================================================================
    // User input
    // =========================================================================

    /// A touch went down on the list
    pub fn drag_start(&mut self) -> Admission {
        if self.switcher.is_switching() {
            return Admission::Rejected(RejectReason::SwitchInFlight);
        }
        if self.is_wheel_surface() {
            self.gesture.drag_start();
        }
        Admission::Accepted
    }

    /// The touch moved `total_delta` since it went down
    pub fn drag_move(&mut self, total_delta: f32) {
        if self.is_wheel_surface() {
            self.gesture.drag_move(total_delta);
        }
    }

    /// The touch lifted with `velocity` px/ms
    pub fn drag_end(&mut self, velocity: f32, now: Instant) {
        if self.is_wheel_surface() {
            self.gesture.drag_end(velocity, now);
        }
    }

    /// An item was tapped
    pub fn tap(&mut self, index: usize, now: Instant) -> Admission {
        let admission = self.begin_selection(index, now);
        if admission.is_accepted() {
            self.gesture.cancel();
        } else {
            debug!(index, ?admission, "tap ignored");
        }
        admission
    }

    /// The user asked for another granularity
    pub fn request_unit(&mut self, unit: TimeUnit, now: Instant) -> Admission {
        if self.switcher.is_switching() {
            return Admission::Rejected(RejectReason::SwitchInFlight);
        }
        if self.orchestrator.is_pending() {
            return Admission::Rejected(RejectReason::TransitionPending);
        }
        if unit == self.unit {
            return Admission::Rejected(RejectReason::SameUnit);
        }
        self.start_switch(unit, true, now);
        Admission::Accepted
    }

    /// Commit whatever the user is pointing at right now
    ///
    /// A pending selection commits immediately; otherwise the item nearest
    /// the selection line commits if it differs from the active one. Used
    /// when the wheel is dismissed mid-motion.
    pub fn flush_selection(&mut self, now: Instant) -> Option<NaiveDateTime> {
        if let (Some(index), Some(date)) = (
            self.orchestrator.target_index(),
            self.orchestrator.pending_selection(),
        ) {
            if !self.commit(index, date, now) {
                return None;
            }
            // A follow-up selection of the item left on the line commits too
            return self.flush_selection(now).or(Some(date));
        }
        if !self.is_wheel_surface() || self.switcher.is_switching() {
            return None;
        }
        let index = self.gesture.nearest_index();
        if index == self.visual_active {
            return None;
        }
        let date = self.window.get(index)?.date;
        self.gesture.place(self.gesture.offset());
        self.commit(index, date, now).then_some(date)
    }

    // =========================================================================
    // Parent props
    // =========================================================================

    /// The parent's committed time or unit changed
    ///
    /// Only values that differ from the previous props are acted on. A new
    /// time silently recentres the window; a new unit runs the switch
    /// animation without reporting the unit back.
    pub fn set_props(&mut self, time: NaiveDateTime, unit: TimeUnit, now: Instant) -> Result<()> {
        let unit_changed = unit != self.props_unit;
        let time_changed = time != self.props_time;
        self.props_unit = unit;
        self.props_time = time;

        if unit_changed && unit != self.target_unit() {
            if self.switcher.is_switching() {
                debug!(%unit, "parent chose another unit, abandoning switch in flight");
                self.switcher.reset();
                self.report_swap = false;
                self.gesture.place(0.0);
                if unit == self.unit {
                    self.regenerate()?;
                }
            }
            if unit != self.unit {
                self.abandon_selection();
                self.start_switch(unit, false, now);
            }
        }

        if time_changed && time != self.selected && Some(time) != self.pending_selection() {
            debug!(%time, "recentring on new time");
            self.abandon_selection();
            self.selected = time;
            if !self.switcher.is_switching() {
                self.regenerate()?;
                self.gesture.place(0.0);
            }
        }
        Ok(())
    }

    // =========================================================================
    // Frames
    // =========================================================================

    /// Advance every animation to `now`
    pub fn tick(&mut self, now: Instant) {
        if self.readiness == Readiness::Aligned {
            self.readiness = Readiness::Ready;
        }

        match self.switcher.tick(now) {
            Some(SwitchStep::Swap(unit)) => self.swap_unit(unit),
            Some(SwitchStep::Settled) | None => {}
        }

        if self.is_wheel_surface() {
            if let Some(index) = self.gesture.tick(now) {
                if !self.orchestrator.is_pending()
                    && !self.switcher.is_switching()
                    && index != self.visual_active
                {
                    self.begin_selection(index, now);
                }
            }
        }

        let position = self.scroll_position();
        match self.orchestrator.tick(now, position) {
            Some(TransitionStep::IndicatorArrived { index }) => self.start_recenter(index, now),
            Some(TransitionStep::Settled { index, date, .. }) => {
                self.commit(index, date, now);
            }
            None => {}
        }
    }

    /// Render-ready snapshot at `now`
    pub fn frame(&self, now: Instant) -> WheelFrame<'_> {
        let offset = self.gesture.offset() + self.switcher.list_shift();
        let center = self.window.center_index();
        let items = self
            .window
            .items()
            .iter()
            .enumerate()
            .map(|(index, item)| ItemFrame {
                index,
                item,
                is_active: index == self.visual_active,
                transform: self.geometry.item_transform(index, center, offset),
            })
            .collect();

        WheelFrame {
            offset,
            list_shift: self.switcher.list_shift(),
            list_opacity: self.switcher.list_opacity(),
            visual_active_index: self.visual_active,
            indicator: self.orchestrator.indicator_at(now).or(self.indicator),
            indicator_animated: self.is_indicator_ready(),
            items,
            decoration_radii: self.geometry.decoration_radii(),
        }
    }

    // =========================================================================
    // Transitions
    // =========================================================================

    fn begin_selection(&mut self, index: usize, now: Instant) -> Admission {
        if self.switcher.is_switching() {
            return Admission::Rejected(RejectReason::SwitchInFlight);
        }
        if self.orchestrator.is_pending() {
            return Admission::Rejected(RejectReason::TransitionPending);
        }
        let Some(date) = self.window.get(index).map(|item| item.date) else {
            return Admission::Rejected(RejectReason::OutOfRange);
        };
        if index == self.visual_active {
            return Admission::Rejected(RejectReason::AlreadyActive);
        }
        let Some(to) = self.layout_of(index) else {
            return Admission::Rejected(RejectReason::LayoutUnavailable);
        };
        let to = IndicatorGeometry::from(to);
        let from = self
            .indicator
            .or_else(|| self.layout_of(self.visual_active).map(IndicatorGeometry::from))
            .unwrap_or(to);
        let animate = self.is_indicator_ready();

        if !self.orchestrator.begin(index, date, from, to, animate, now) {
            return Admission::Rejected(RejectReason::TransitionPending);
        }
        self.visual_active = index;
        self.indicator = Some(to);
        Admission::Accepted
    }

    fn start_recenter(&mut self, index: usize, now: Instant) {
        let target = match self.layout_of(index) {
            Some(layout) => recenter_target(layout, self.layouts.viewport(), self.config.surface),
            None => {
                warn!(index, "selected item lost its layout, settling in place");
                self.scroll_position()
            }
        };
        self.orchestrator.start_recenter(target, now);

        match self.config.surface {
            ScrollSurface::Wheel => {
                if self.gesture.is_dragging() {
                    debug!(index, "drag in progress, recenter left to settle detection");
                } else {
                    let spring = self.config.gesture.tap_spring;
                    self.gesture.snap_to(index, spring, now);
                }
            }
            ScrollSurface::Host { .. } => self.effects.push(WheelEffect::ScrollTo {
                position: target,
                animated: true,
            }),
        }
    }

    /// Silent recenter and commit
    ///
    /// Returns whether the window could be rebuilt around `date`; nothing
    /// is reported otherwise.
    fn commit(&mut self, index: usize, date: NaiveDateTime, now: Instant) -> bool {
        self.readiness = Readiness::Disabled;
        self.orchestrator.complete();
        let steps = self.window.steps_from_center(index);

        let previous = self.selected;
        self.selected = date;
        if let Err(err) = self.regenerate() {
            error!(%err, %date, "could not regenerate window, keeping previous time");
            self.selected = previous;
            self.visual_active = self.window.center_index();
            self.indicator = self.layout_of(self.visual_active).map(IndicatorGeometry::from);
            if self.is_wheel_surface() && !self.gesture.is_dragging() {
                let spring = self.config.gesture.tap_spring;
                self.gesture.snap_to(self.window.center_index(), spring, now);
            }
            return false;
        }

        self.effects.push(WheelEffect::TimeChanged(date));
        info!(%date, unit = %self.unit, steps, "time committed");

        if !self.is_wheel_surface() {
            return true;
        }
        self.gesture.rebase(steps);
        if !self.gesture.is_idle() {
            return true;
        }
        if !self.gesture.is_at_rest_position() {
            self.gesture.settle_nearest(now);
            return true;
        }
        // The user may have left a different item on the line during the recenter
        let nearest = self.gesture.nearest_index();
        if nearest != self.window.center_index() {
            debug!(index = nearest, "wheel rests on another item, selecting it");
            self.begin_selection(nearest, now);
        }
        true
    }

    fn abandon_selection(&mut self) {
        if self.orchestrator.is_pending() {
            self.orchestrator.cancel();
            self.visual_active = self.window.center_index();
            self.indicator = None;
            self.readiness = Readiness::Disabled;
        }
    }

    fn start_switch(&mut self, unit: TimeUnit, report: bool, now: Instant) {
        self.gesture.cancel();
        self.readiness = Readiness::Disabled;
        self.report_swap = report;
        if self.switcher.request(unit, now) {
            debug!(from = %self.unit, to = %unit, report, "unit switch started");
        }
    }

    fn swap_unit(&mut self, unit: TimeUnit) {
        let previous = self.unit;
        self.unit = unit;
        if let Err(err) = self.regenerate() {
            error!(%err, %unit, "could not regenerate window, keeping previous unit");
            self.unit = previous;
            return;
        }
        self.gesture.place(0.0);
        if self.report_swap {
            self.effects.push(WheelEffect::TimeUnitChanged(unit));
            info!(%unit, "time unit committed");
        }
        self.report_swap = false;
    }

    /// Rebuild the window around the selected time; item layouts and the
    /// indicator are stale afterward until the next layout pass
    fn regenerate(&mut self) -> Result<()> {
        self.window = WheelWindow::generate(self.selected, self.unit, self.config.window_radius)?;
        self.visual_active = self.window.center_index();
        self.layouts.clear();
        self.indicator = None;
        self.readiness = Readiness::Disabled;
        Ok(())
    }
}
