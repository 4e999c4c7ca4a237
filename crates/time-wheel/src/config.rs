//! Wheel configuration
//!
//! Every tunable constant of the wheel lives here. All structs deserialize
//! with camelCase keys and fall back to defaults for missing fields, so a
//! host can override a single value from JSON.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::animation::{Easing, SpringConfig};
use crate::error::{Result, WheelError};

// =============================================================================
// Geometry
// =============================================================================

/// Arc layout constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeometryConfig {
    /// Distance between adjacent items along the scroll axis (px)
    pub item_spacing: f32,
    /// Half-width of the visible band, in items
    pub visible_items: f32,
    /// Virtual arc radius as a multiple of the viewport width
    pub arc_radius_factor: f32,
    /// Scale at the edge of the visible band
    pub min_scale: f32,
    /// Fraction of the visible band where opacity reaches `knee_opacity`
    pub knee_fraction: f32,
    /// Opacity at the knee
    pub knee_opacity: f32,
    /// Sub-label fades out over this many items from the centre
    pub sub_label_fade_items: f32,
    /// Highlight colour fades out over this many items from the centre
    pub highlight_fade_items: f32,
    /// Radii of the decorative arcs, as offsets beyond the text arc (px)
    pub decoration_offsets: Vec<f32>,
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            item_spacing: 58.0,
            visible_items: 7.0,
            arc_radius_factor: 1.6,
            min_scale: 0.38,
            knee_fraction: 0.65,
            knee_opacity: 0.3,
            sub_label_fade_items: 1.0,
            highlight_fade_items: 0.8,
            decoration_offsets: vec![100.0, 30.0],
        }
    }
}

impl GeometryConfig {
    /// Half-width of the visible band (px)
    pub fn visible_range(&self) -> f32 {
        self.item_spacing * self.visible_items
    }
}

// =============================================================================
// Gesture
// =============================================================================

/// Drag, inertia, and snap constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GestureConfig {
    /// Per-millisecond velocity multiplier while coasting
    pub decay_factor: f32,
    /// Release velocity ceiling (px/ms)
    pub max_velocity: f32,
    /// Coasting stops below this speed (px/ms)
    pub stop_velocity: f32,
    /// Movement needed before a touch becomes a drag (px)
    pub drag_slop: f32,
    /// Spring used to snap to the nearest item after coasting
    pub snap_spring: SpringConfig,
    /// Spring used for taps and recentering scrolls
    pub tap_spring: SpringConfig,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            decay_factor: 0.993,
            max_velocity: 4.0,
            stop_velocity: 0.01,
            drag_slop: 8.0,
            snap_spring: SpringConfig::new(220.0, 28.0, 1.0),
            tap_spring: SpringConfig::new(200.0, 25.0, 1.0),
        }
    }
}

// =============================================================================
// Selection transition
// =============================================================================

/// Selection transition timing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TransitionConfig {
    /// Indicator slide duration (ms)
    pub indicator_duration_ms: u64,
    /// Indicator slide curve
    pub indicator_easing: Easing,
    /// Scroll counts as arrived within this distance of the target (px)
    pub settle_close_px: f32,
    /// Movements below this are treated as stillness (px)
    pub settle_idle_px: f32,
    /// Stillness needed to count as settled (ms)
    pub settle_idle_ms: u64,
    /// Settle detection gives up after this long (ms)
    pub settle_timeout_ms: u64,
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            indicator_duration_ms: 300,
            indicator_easing: Easing::EaseOutCubic,
            settle_close_px: 1.0,
            settle_idle_px: 0.5,
            settle_idle_ms: 120,
            settle_timeout_ms: 900,
        }
    }
}

impl TransitionConfig {
    /// Indicator slide duration
    pub fn indicator_duration(&self) -> Duration {
        Duration::from_millis(self.indicator_duration_ms)
    }

    /// Stillness window
    pub fn settle_idle(&self) -> Duration {
        Duration::from_millis(self.settle_idle_ms)
    }

    /// Settle detection timeout
    pub fn settle_timeout(&self) -> Duration {
        Duration::from_millis(self.settle_timeout_ms)
    }
}

// =============================================================================
// Granularity switch
// =============================================================================

/// How the list is replaced when the unit changes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SwitchStyle {
    /// Slide the old list off one side and spring the new one in from the other
    #[default]
    RollOver,
    /// Fade out, swap, wait for the new layout, fade in
    Fade,
}

/// Granularity switch timing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SwitchConfig {
    /// Animation style
    pub style: SwitchStyle,
    /// Roll-over exit duration (ms)
    pub exit_duration_ms: u64,
    /// Roll-over travel, in items
    pub travel_items: f32,
    /// Roll-over entry spring
    pub enter_spring: SpringConfig,
    /// Fade-out duration (ms)
    pub fade_out_ms: u64,
    /// Fade-in duration (ms)
    pub fade_in_ms: u64,
    /// Fade-in starts anyway if no layout pass arrives within this (ms)
    pub layout_timeout_ms: u64,
}

impl Default for SwitchConfig {
    fn default() -> Self {
        Self {
            style: SwitchStyle::RollOver,
            exit_duration_ms: 150,
            travel_items: 6.0,
            enter_spring: SpringConfig::new(200.0, 20.0, 0.8),
            fade_out_ms: 150,
            fade_in_ms: 200,
            layout_timeout_ms: 500,
        }
    }
}

// =============================================================================
// Scroll surface
// =============================================================================

/// What performs recentering scrolls
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum ScrollSurface {
    /// The wheel's own gesture controller scrolls; positions are unbounded
    #[default]
    Wheel,
    /// A host scroll view scrolls on request and reports positions back
    #[serde(rename_all = "camelCase")]
    Host {
        /// Lowest reachable scroll position
        min_position: f32,
    },
}

// =============================================================================
// Wheel
// =============================================================================

/// Complete wheel configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WheelConfig {
    /// Items on each side of the centre
    pub window_radius: usize,
    /// Scroll surface
    pub surface: ScrollSurface,
    /// Arc layout
    pub geometry: GeometryConfig,
    /// Gesture physics
    pub gesture: GestureConfig,
    /// Selection transition
    pub transition: TransitionConfig,
    /// Granularity switch
    pub switch: SwitchConfig,
}

impl Default for WheelConfig {
    fn default() -> Self {
        Self {
            window_radius: 30,
            surface: ScrollSurface::Wheel,
            geometry: GeometryConfig::default(),
            gesture: GestureConfig::default(),
            transition: TransitionConfig::default(),
            switch: SwitchConfig::default(),
        }
    }
}

impl WheelConfig {
    /// Default full-screen wheel configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Horizontal strip preset: 41 items, host-driven scrolling, fade switch
    pub fn strip() -> Self {
        Self::default()
            .window_radius(20)
            .surface(ScrollSurface::Host { min_position: 0.0 })
            .switch_style(SwitchStyle::Fade)
    }

    /// Set the window radius
    pub fn window_radius(mut self, radius: usize) -> Self {
        self.window_radius = radius;
        self
    }

    /// Set the scroll surface
    pub fn surface(mut self, surface: ScrollSurface) -> Self {
        self.surface = surface;
        self
    }

    /// Set the granularity switch style
    pub fn switch_style(mut self, style: SwitchStyle) -> Self {
        self.switch.style = style;
        self
    }

    /// Set the item spacing
    pub fn item_spacing(mut self, spacing: f32) -> Self {
        self.geometry.item_spacing = spacing;
        self
    }

    /// Parse and validate a JSON configuration
    pub fn from_json(json: &str) -> Result<Self> {
        let config: WheelConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every constant is usable
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: &str| Err(WheelError::InvalidConfig(msg.to_string()));

        if self.window_radius == 0 || self.window_radius > 1000 {
            return invalid("window radius must be between 1 and 1000");
        }
        let geometry = &self.geometry;
        if !positive(geometry.item_spacing) || !positive(geometry.visible_items) {
            return invalid("item spacing and visible items must be positive");
        }
        if !positive(geometry.arc_radius_factor) {
            return invalid("arc radius factor must be positive");
        }
        if !(0.0..=1.0).contains(&geometry.min_scale)
            || !(0.0..1.0).contains(&geometry.knee_fraction)
        {
            return invalid("min scale and knee fraction must lie in [0, 1]");
        }
        let gesture = &self.gesture;
        if !positive(gesture.decay_factor) || gesture.decay_factor >= 1.0 {
            return invalid("decay factor must lie in (0, 1)");
        }
        if !positive(gesture.max_velocity) || !positive(gesture.stop_velocity) {
            return invalid("velocities must be positive");
        }
        for spring in [&gesture.snap_spring, &gesture.tap_spring, &self.switch.enter_spring] {
            spring.validate()?;
        }
        if self.transition.settle_timeout_ms == 0 {
            return invalid("settle timeout must be positive");
        }
        Ok(())
    }
}

pub(crate) fn positive(value: f32) -> bool {
    value.is_finite() && value > 0.0
}
