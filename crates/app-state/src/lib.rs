//! Application state for the horoscope client
//!
//! This crate owns the committed time selection shared across screens and
//! the horoscope reading that follows it. Both are reactive: consumers
//! subscribe through `tokio::sync::watch` for the latest value and
//! `tokio::sync::broadcast` for discrete change events.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod horoscope;
pub mod time_selector;

pub use error::{Result, StoreError};
pub use horoscope::{FeedState, FollowHandle, HoroscopeFeed};
pub use time_selector::{TimeSelection, TimeSelectionEvent, TimeSelectorStore};
