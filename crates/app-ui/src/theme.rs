//! Colours for the time selector
//!
//! A small night-sky palette plus the interpolation the wheel needs to
//! blend item text from muted to highlighted as it crosses the selection
//! line.

// =============================================================================
// Color Types
// =============================================================================

/// A color represented as a hex string (e.g., "#E4D5A8")
pub type Color = String;

/// Parse a hex color string to RGB components
pub fn parse_hex_color(hex: &str) -> Option<(u8, u8, u8)> {
    let hex = hex.trim_start_matches('#');
    if hex.len() < 6 || !hex.is_char_boundary(6) {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some((r, g, b))
}

/// Convert RGB to hex string
pub fn rgb_to_hex(r: u8, g: u8, b: u8) -> Color {
    format!("#{:02X}{:02X}{:02X}", r, g, b)
}

/// Blend two hex colours, `t = 0` giving `from` and `t = 1` giving `to`
///
/// Returns `None` if either colour fails to parse.
pub fn mix(from: &str, to: &str, t: f32) -> Option<Color> {
    let (r0, g0, b0) = parse_hex_color(from)?;
    let (r1, g1, b1) = parse_hex_color(to)?;
    let t = t.clamp(0.0, 1.0);
    let channel = |a: u8, b: u8| (f32::from(a) + (f32::from(b) - f32::from(a)) * t).round() as u8;
    Some(rgb_to_hex(channel(r0, r1), channel(g0, g1), channel(b0, b1)))
}

// =============================================================================
// Palette
// =============================================================================

/// Selector palette
pub mod palette {
    /// Highlighted text and the active unit
    pub const CREAM_GOLD: &str = "#E4D5A8";
    /// Item text away from the selection line
    pub const TEXT_MUTED: &str = "#7A7A82";
    /// Close button icon
    pub const CLOSE_ICON: &str = "#A8A8B0";
    /// Selection line
    pub const INDICATOR_LINE: &str = "rgba(228,213,168,0.12)";
    /// Overlay scrim
    pub const SCRIM: &str = "#05050A";
}

/// Text colour for a wheel item given its highlight mix
pub fn item_text_color(highlight: f32) -> Color {
    mix(palette::TEXT_MUTED, palette::CREAM_GOLD, highlight)
        .unwrap_or_else(|| palette::TEXT_MUTED.to_string())
}
