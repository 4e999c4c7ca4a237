//! Granularity stepper
//!
//! A row of unit labels behind a narrow window with chevrons either side.
//! The row slides on a spring so the selected unit always sits centred;
//! neighbours shrink and fade with their distance from it.

use std::time::Instant;

use serde::{Deserialize, Serialize};
use time_wheel::{Spring, TimeUnit};

use crate::tokens::{spring, unit_stepper, z_index};

/// Render style for one unit label
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitItemStyle {
    /// Unit shown
    pub unit: TimeUnit,
    /// Horizontal offset from the window centre
    pub translate_x: f32,
    /// Scale
    pub scale: f32,
    /// Opacity
    pub opacity: f32,
    /// Stacking order
    pub z_index: i32,
    /// Whether this is the committed unit
    pub is_selected: bool,
}

/// Granularity stepper state
#[derive(Debug, Clone)]
pub struct UnitSelector {
    current: TimeUnit,
    index: Spring,
}

impl UnitSelector {
    /// Create a stepper resting on `unit`
    pub fn new(unit: TimeUnit, now: Instant) -> Self {
        let position = unit.position() as f32;
        Self {
            current: unit,
            index: Spring::new(spring::UNIT_INDEX, position, position, 0.0, now),
        }
    }

    /// Selected unit
    pub fn current(&self) -> TimeUnit {
        self.current
    }

    /// Whether the left chevron is enabled
    pub fn can_go_prev(&self) -> bool {
        self.current.prev().is_some()
    }

    /// Whether the right chevron is enabled
    pub fn can_go_next(&self) -> bool {
        self.current.next().is_some()
    }

    /// Opacity for the left and right chevrons
    pub fn chevron_opacity(&self) -> (f32, f32) {
        let opacity = |enabled| if enabled { 1.0 } else { unit_stepper::DISABLED_CHEVRON_OPACITY };
        (opacity(self.can_go_prev()), opacity(self.can_go_next()))
    }

    /// Step to the previous unit, returning it for the parent
    pub fn prev(&mut self, now: Instant) -> Option<TimeUnit> {
        let unit = self.current.prev()?;
        self.select(unit, now)
    }

    /// Step to the next unit, returning it for the parent
    pub fn next(&mut self, now: Instant) -> Option<TimeUnit> {
        let unit = self.current.next()?;
        self.select(unit, now)
    }

    /// Select a unit directly (a tapped label)
    ///
    /// Returns the unit when it differs from the current one.
    pub fn select(&mut self, unit: TimeUnit, now: Instant) -> Option<TimeUnit> {
        if unit == self.current {
            return None;
        }
        self.set_current(unit, now);
        Some(unit)
    }

    /// Follow a unit committed elsewhere, animating without reporting
    pub fn set_current(&mut self, unit: TimeUnit, now: Instant) {
        if unit == self.current && self.index.target() == unit.position() as f32 {
            return;
        }
        tracing::debug!(from = %self.current, to = %unit, "Unit stepper moving");
        self.current = unit;
        self.index = Spring::new(
            spring::UNIT_INDEX,
            self.index.advance(now),
            unit.position() as f32,
            self.index.velocity(),
            now,
        );
    }

    /// Advance the index spring
    pub fn tick(&mut self, now: Instant) {
        self.index.advance(now);
    }

    /// Whether the row is still sliding
    pub fn is_animating(&self) -> bool {
        !self.index.is_at_rest()
    }

    /// Animated (fractional) index of the row
    pub fn animated_index(&self) -> f32 {
        self.index.position()
    }

    /// Styles for every unit at the current animated index
    pub fn styles(&self) -> Vec<UnitItemStyle> {
        let index = self.index.position();
        TimeUnit::ALL
            .iter()
            .map(|&unit| {
                let distance = unit.position() as f32 - index;
                let falloff = distance.abs().min(1.0);
                let is_selected = unit == self.current;
                UnitItemStyle {
                    unit,
                    translate_x: distance * unit_stepper::ITEM_OFFSET,
                    scale: 1.0 - (1.0 - unit_stepper::NEIGHBOUR_SCALE) * falloff,
                    opacity: 1.0 - (1.0 - unit_stepper::NEIGHBOUR_OPACITY) * falloff,
                    z_index: if is_selected { z_index::ACTIVE_UNIT } else { 0 },
                    is_selected,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn style_of(selector: &UnitSelector, unit: TimeUnit) -> UnitItemStyle {
        selector
            .styles()
            .into_iter()
            .find(|s| s.unit == unit)
            .unwrap()
    }

    // ==========================================================================
    // Navigation Tests
    // ==========================================================================

    #[test]
    fn test_chevrons_disabled_at_ends() {
        let t0 = Instant::now();
        let hour = UnitSelector::new(TimeUnit::Hour, t0);
        assert!(!hour.can_go_prev());
        assert!(hour.can_go_next());
        assert_eq!(hour.chevron_opacity(), (0.2, 1.0));

        let mut year = UnitSelector::new(TimeUnit::Year, t0);
        assert_eq!(year.next(t0), None);
        assert_eq!(year.chevron_opacity(), (1.0, 0.2));
    }

    #[test]
    fn test_prev_next_report_units() {
        let t0 = Instant::now();
        let mut selector = UnitSelector::new(TimeUnit::Day, t0);
        assert_eq!(selector.next(t0), Some(TimeUnit::Week));
        assert_eq!(selector.prev(t0), Some(TimeUnit::Day));
        assert_eq!(selector.prev(t0), Some(TimeUnit::Hour));
        assert_eq!(selector.prev(t0), None);
        assert_eq!(selector.current(), TimeUnit::Hour);
    }

    #[test]
    fn test_select_same_unit_is_silent() {
        let t0 = Instant::now();
        let mut selector = UnitSelector::new(TimeUnit::Month, t0);
        assert_eq!(selector.select(TimeUnit::Month, t0), None);
        assert!(!selector.is_animating());
    }

    // ==========================================================================
    // Animation Tests
    // ==========================================================================

    #[test]
    fn test_resting_styles() {
        let selector = UnitSelector::new(TimeUnit::Week, Instant::now());
        let week = style_of(&selector, TimeUnit::Week);
        assert_eq!(week.translate_x, 0.0);
        assert_eq!(week.scale, 1.0);
        assert_eq!(week.opacity, 1.0);
        assert_eq!(week.z_index, 10);
        assert!(week.is_selected);

        let day = style_of(&selector, TimeUnit::Day);
        assert_eq!(day.translate_x, -60.0);
        assert!((day.scale - 0.8).abs() < 1e-6);
        assert!((day.opacity - 0.3).abs() < 1e-6);

        // translation keeps extrapolating, the fade does not
        let year = style_of(&selector, TimeUnit::Year);
        assert_eq!(year.translate_x, 120.0);
        assert!((year.opacity - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_index_springs_to_new_unit() {
        let t0 = Instant::now();
        let mut selector = UnitSelector::new(TimeUnit::Day, t0);
        selector.next(t0);
        assert!(selector.is_animating());
        assert_eq!(selector.animated_index(), 1.0);

        selector.tick(t0 + Duration::from_millis(100));
        let midway = selector.animated_index();
        assert!(midway > 1.0 && midway < 2.2);

        selector.tick(t0 + Duration::from_secs(3));
        assert!(!selector.is_animating());
        assert_eq!(selector.animated_index(), 2.0);
        assert_eq!(style_of(&selector, TimeUnit::Week).translate_x, 0.0);
    }

    #[test]
    fn test_external_unit_change_animates() {
        let t0 = Instant::now();
        let mut selector = UnitSelector::new(TimeUnit::Hour, t0);
        selector.set_current(TimeUnit::Year, t0);
        assert_eq!(selector.current(), TimeUnit::Year);
        assert!(selector.is_animating());
    }
}
