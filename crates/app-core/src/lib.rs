//! Core domain logic for the horoscope client
//!
//! This crate holds the data the time selector drives: the user's birth
//! data, the daily horoscope reading, and the provider seam through which
//! readings are fetched for a committed date.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod horoscope;

pub use horoscope::{
    AiAnalysis, BirthData, DailyHoroscope, DimensionScore, GuidanceItem, GuidanceKind,
    HoroscopeError, HoroscopeProvider, Result, SampleHoroscopeProvider, TransitEvent, TransitKind,
    TrendDirection,
};
