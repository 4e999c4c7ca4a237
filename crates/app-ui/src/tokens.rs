//! Design tokens for the time selector
//!
//! Motion timings, spring presets, and layout proportions shared by the
//! selector overlay and the unit stepper. Durations are milliseconds, as
//! hosts pass them straight to their animation drivers.

use std::time::Duration;

use time_wheel::SpringConfig;

// =============================================================================
// Motion
// =============================================================================

/// Animation durations in milliseconds
pub mod duration {
    /// Overlay fade-in
    pub const OVERLAY_OPEN: u32 = 400;
    /// Overlay fade-out and shrink
    pub const OVERLAY_CLOSE: u32 = 280;
    /// Selection indicator slide
    pub const INDICATOR_MOVE: u32 = 300;
    /// Wheel roll-out before a granularity swap
    pub const UNIT_EXIT: u32 = 150;
    /// Strip fade-out before a granularity swap
    pub const FADE_OUT: u32 = 150;
    /// Strip fade-in after a granularity swap
    pub const FADE_IN: u32 = 200;
    /// Bound on waiting for a layout pass after a swap
    pub const LAYOUT_SAFETY: u32 = 500;

    /// Convert a token to a [`std::time::Duration`]
    pub fn as_duration(ms: u32) -> super::Duration {
        super::Duration::from_millis(u64::from(ms))
    }
}

/// CSS easing curves for hosts that animate in a web view
pub mod easing {
    /// Matches [`time_wheel::Easing::EaseOutCubic`]
    pub const EASE_OUT_CUBIC: &str = "cubic-bezier(0.33, 1, 0.68, 1)";
    /// Matches [`time_wheel::Easing::EaseInOut`]
    pub const EASE_IN_OUT: &str = "cubic-bezier(0.65, 0, 0.35, 1)";
    /// Matches [`time_wheel::Easing::Linear`]
    pub const LINEAR: &str = "linear";
}

/// Spring presets
pub mod spring {
    use super::SpringConfig;

    /// Overlay content scaling in on open
    pub const OVERLAY_SCALE: SpringConfig = SpringConfig::new(130.0, 22.0, 0.8);
    /// Unit stepper sliding to a new index
    pub const UNIT_INDEX: SpringConfig = SpringConfig::new(150.0, 20.0, 0.8);
}

// =============================================================================
// Overlay Layout
// =============================================================================

/// Proportions of the full-screen selector
pub mod overlay {
    /// Content scale while hidden
    pub const CLOSED_SCALE: f32 = 0.9;
    /// Anchor x as a fraction of the viewport width
    pub const ANCHOR_X_FRACTION: f32 = 0.1;
    /// Anchor y as a fraction of the viewport height
    pub const ANCHOR_Y_FRACTION: f32 = 0.46;
    /// Lift applied to the anchor y
    pub const ANCHOR_Y_LIFT: f32 = 20.0;
    /// Selection line starts this far left of the anchor
    pub const INDICATOR_LINE_INSET: f32 = 15.0;
    /// Selection line width as a fraction of the viewport width
    pub const INDICATOR_LINE_FRACTION: f32 = 0.45;
    /// Gap between the selection line and the year caption
    pub const CAPTION_GAP: f32 = 12.0;
    /// Caption opacity once the wheel is two items off rest
    pub const CAPTION_MIN_OPACITY: f32 = 0.5;
    /// Unit column top as a fraction of the viewport height
    pub const UNIT_COLUMN_FRACTION: f32 = 0.33;
    /// Close button offset below the header safe area
    pub const CLOSE_BUTTON_GAP: f32 = 12.0;
    /// Scale of the active unit in the column
    pub const ACTIVE_UNIT_SCALE: f32 = 1.15;
    /// Opacity of inactive units in the column
    pub const INACTIVE_UNIT_OPACITY: f32 = 0.45;
}

/// Proportions of the unit stepper
pub mod unit_stepper {
    /// Horizontal distance between neighbouring units
    pub const ITEM_OFFSET: f32 = 60.0;
    /// Scale of a unit one step away
    pub const NEIGHBOUR_SCALE: f32 = 0.8;
    /// Opacity of a unit one step away
    pub const NEIGHBOUR_OPACITY: f32 = 0.3;
    /// Opacity of a disabled chevron
    pub const DISABLED_CHEVRON_OPACITY: f32 = 0.2;
    /// Visible window width
    pub const WINDOW_WIDTH: f32 = 160.0;
}

/// Layering
pub mod z_index {
    /// Selector overlay, above the tab bar
    pub const SELECTOR_OVERLAY: i32 = 50;
    /// Active unit in the stepper
    pub const ACTIVE_UNIT: i32 = 10;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_conversion() {
        assert_eq!(duration::as_duration(duration::OVERLAY_OPEN), Duration::from_millis(400));
        assert!(duration::OVERLAY_CLOSE < duration::OVERLAY_OPEN);
        assert!(duration::FADE_OUT < duration::LAYOUT_SAFETY);
    }

    #[test]
    fn test_spring_presets_are_valid() {
        assert!(spring::OVERLAY_SCALE.validate().is_ok());
        assert!(spring::UNIT_INDEX.validate().is_ok());
    }

    #[test]
    fn test_overlay_fractions() {
        assert!(overlay::ANCHOR_X_FRACTION + overlay::INDICATOR_LINE_FRACTION < 1.0);
        assert!(overlay::CLOSED_SCALE < 1.0);
    }
}
