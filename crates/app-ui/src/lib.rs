//! User interface for the horoscope client's time selector
//!
//! This crate turns the headless [`time_wheel::TimeWheel`] into the
//! screens the app shows: the full-screen selector overlay and the compact
//! unit stepper, plus the tokens and colours they are drawn with.
//!
//! # Modules
//!
//! - [`tokens`] - Motion timings, spring presets, and layout proportions
//! - [`theme`] - Palette and text colour blending
//! - [`time_selector`] - Full-screen selector overlay
//! - [`unit_selector`] - Prev/next granularity stepper
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use std::time::Instant;
//!
//! use app_platform::{SafeAreaInsets, StaticInsets};
//! use app_ui::{OverlayPhase, TimeSelectorOverlay};
//! use chrono::NaiveDate;
//! use time_wheel::{TimeUnit, WheelConfig};
//!
//! let selected = NaiveDate::from_ymd_opt(2025, 3, 10)
//!     .and_then(|d| d.and_hms_opt(0, 0, 0))
//!     .unwrap();
//! let insets = Arc::new(StaticInsets(SafeAreaInsets::default()));
//! let mut overlay =
//!     TimeSelectorOverlay::new(WheelConfig::default(), selected, TimeUnit::Day, insets).unwrap();
//!
//! overlay.open(selected, TimeUnit::Day, Instant::now()).unwrap();
//! assert_eq!(overlay.phase(), OverlayPhase::Opening);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod theme;
pub mod time_selector;
pub mod tokens;
pub mod unit_selector;

pub use theme::{item_text_color, mix, palette, Color};
pub use time_selector::{
    OverlayFrame, OverlayLayout, OverlayPhase, SelectorEvent, TimeSelectorOverlay,
    UnitColumnEntry,
};
pub use tokens::{duration, easing, overlay, spring, unit_stepper, z_index};
pub use unit_selector::{UnitItemStyle, UnitSelector};
