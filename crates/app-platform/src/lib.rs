//! Platform integration for the horoscope client
//!
//! Hosts report the device's safe-area insets here; the selector overlay
//! reads them to keep its controls clear of notches and system bars.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod safe_area;

pub use safe_area::{
    header_safe_area, Edge, InsetsProvider, PlatformError, Result, SafeAreaInsets, StaticInsets,
    WatchedInsets,
};
