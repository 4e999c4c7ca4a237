//! Circular-arc item layout
//!
//! Maps the wheel's scroll offset onto a render transform for every item.
//! Items travel linearly along the scroll axis, but their cross-axis
//! position and rotation follow a circle of radius `R`, so the list bows
//! away from the selection line like a wheel seen edge-on. The exact
//! trigonometric functions are evaluated for every frame; nothing is
//! sampled, so the curve has no facets at intermediate drag positions.

use serde::{Deserialize, Serialize};

use crate::config::GeometryConfig;

/// Render transform for one item
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemTransform {
    /// Displacement along the scroll axis, clamped to the visible band
    pub translate_along: f32,
    /// Bow toward the arc's centre (zero or negative)
    pub translate_across: f32,
    /// Tangent rotation of the arc at this point (degrees)
    pub rotation_deg: f32,
    /// Scale factor
    pub scale: f32,
    /// Opacity
    pub opacity: f32,
    /// Sub-label opacity (only near the selection line)
    pub sub_label_opacity: f32,
    /// Highlight mix in [0, 1] for interpolating the text colour
    pub highlight: f32,
}

impl ItemTransform {
    /// Whether anything of the item is visible
    pub fn is_visible(&self) -> bool {
        self.opacity > 0.0
    }
}

/// Arc layout for a given viewport
#[derive(Debug, Clone, PartialEq)]
pub struct ArcGeometry {
    config: GeometryConfig,
    radius: f32,
}

impl ArcGeometry {
    /// Build the arc for a viewport of `viewport_width` pixels
    ///
    /// The radius never drops below the visible band, which keeps every
    /// clamped displacement inside the arc.
    pub fn new(config: GeometryConfig, viewport_width: f32) -> Self {
        let radius = (viewport_width * config.arc_radius_factor).max(config.visible_range());
        Self { config, radius }
    }

    /// Virtual arc radius `R`
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Half-width of the visible band
    pub fn visible_range(&self) -> f32 {
        self.config.visible_range()
    }

    /// Spacing between adjacent items
    pub fn item_spacing(&self) -> f32 {
        self.config.item_spacing
    }

    /// Scroll offset at which `index` sits on the selection line
    pub fn rest_offset(&self, index: usize, center: usize) -> f32 {
        -(index as f32 - center as f32) * self.config.item_spacing
    }

    /// `sqrt(R² - dy²) - R`: zero at the centre, growing toward the edges
    pub fn arc_horizontal_offset(&self, dy: f32) -> f32 {
        let r = self.radius;
        let dy = dy.clamp(-r, r);
        (r * r - dy * dy).sqrt() - r
    }

    /// `asin(dy / R)` in degrees
    pub fn tangent_rotation(&self, dy: f32) -> f32 {
        (dy / self.radius).clamp(-1.0, 1.0).asin().to_degrees()
    }

    /// Transform for `index` when the list is scrolled to `offset`
    pub fn item_transform(&self, index: usize, center: usize, offset: f32) -> ItemTransform {
        let range = self.visible_range();
        let dy = (offset - self.rest_offset(index, center)).clamp(-range, range);
        let distance = dy.abs();
        let spacing = self.config.item_spacing;

        ItemTransform {
            translate_along: dy,
            translate_across: self.arc_horizontal_offset(dy),
            rotation_deg: self.tangent_rotation(dy),
            scale: lerp(1.0, self.config.min_scale, distance / range),
            opacity: self.opacity_at(distance),
            sub_label_opacity: fade(distance, self.config.sub_label_fade_items * spacing),
            highlight: fade(distance, self.config.highlight_fade_items * spacing),
        }
    }

    /// Piecewise-linear opacity: 1 at the centre, the knee value at the
    /// knee, zero at the edge of the band
    fn opacity_at(&self, distance: f32) -> f32 {
        let range = self.visible_range();
        let knee = self.config.knee_fraction * range;
        if distance >= range {
            0.0
        } else if distance <= knee {
            lerp(1.0, self.config.knee_opacity, distance / knee)
        } else {
            lerp(self.config.knee_opacity, 0.0, (distance - knee) / (range - knee))
        }
    }

    /// Radii of the decorative arcs sharing the text arc's centre
    pub fn decoration_radii(&self) -> Vec<f32> {
        self.config
            .decoration_offsets
            .iter()
            .map(|extra| self.radius + extra)
            .collect()
    }
}

fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t.clamp(0.0, 1.0)
}

fn fade(distance: f32, width: f32) -> f32 {
    if width <= 0.0 {
        return if distance == 0.0 { 1.0 } else { 0.0 };
    }
    (1.0 - distance / width).clamp(0.0, 1.0)
}
