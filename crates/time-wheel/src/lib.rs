//! Headless time-wheel selection widget
//!
//! This crate implements the interaction core of the horoscope client's
//! time selector: a continuous, gesture-driven date/time wheel supporting
//! five granularities (hour, day, week, month, year). It owns no rendering
//! and never reaches into a view tree. The host feeds it gesture events,
//! measured item layouts, scroll positions and animation-frame timestamps,
//! and reads back a render-ready [`WheelFrame`] plus a queue of
//! [`WheelEffect`]s for the parent.
//!
//! # Modules
//!
//! - [`time`] - Calendar offsets, bucket equality, and label formatting
//! - [`items`] - Fixed-size item window centred on the selected value
//! - [`geometry`] - Circular-arc layout of items for a scroll offset
//! - [`animation`] - Easing curves, tweens, springs, and inertial decay
//! - [`gesture`] - Drag, inertia, and snap-to-item controller
//! - [`transition`] - Selection transition orchestrator and settle detection
//! - [`switch`] - Granularity switch animator
//! - [`config`] - Tunable constants with serde support
//! - [`widget`] - The [`TimeWheel`] state machine composing all of the above
//!
//! # Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use time_wheel::{TimeUnit, TimeWheel, WheelConfig};
//!
//! let selected = NaiveDate::from_ymd_opt(2025, 3, 10)
//!     .and_then(|d| d.and_hms_opt(0, 0, 0))
//!     .unwrap();
//! let wheel = TimeWheel::new(WheelConfig::default(), selected, TimeUnit::Day).unwrap();
//! assert_eq!(wheel.window().len(), 61);
//! assert_eq!(wheel.visual_active_index(), wheel.window().center_index());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod animation;
pub mod config;
pub mod error;
pub mod geometry;
pub mod gesture;
pub mod items;
pub mod switch;
pub mod time;
pub mod transition;
pub mod widget;

pub use animation::{Decay, Easing, Spring, SpringConfig, Tween};
pub use config::{
    GeometryConfig, GestureConfig, ScrollSurface, SwitchConfig, SwitchStyle, TransitionConfig,
    WheelConfig,
};
pub use error::{Result, WheelError};
pub use geometry::{ArcGeometry, ItemTransform};
pub use gesture::{GestureController, GesturePhase};
pub use items::{generate_items, WheelItem, WheelWindow};
pub use switch::{
    Direction, DirectionSource, RandomDirection, SwitchPhase, SwitchStep, UnitSwitchAnimator,
};
pub use time::{
    bucket_start, format_caption, format_label, format_sub_label, format_title, is_same_bucket,
    offset_date, TimeUnit,
};
pub use transition::{
    recenter_target, IndicatorGeometry, ItemLayout, LayoutBook, SelectionOrchestrator,
    SettleDetector, SettleReason, TransitionPhase, TransitionStep,
};
pub use widget::{Admission, ItemFrame, RejectReason, TimeWheel, WheelEffect, WheelFrame};
