//! Item window generation
//!
//! The wheel shows a fixed, odd-sized window of dated items centred on the
//! selected value. Items are value objects: the whole window is regenerated
//! whenever the base date or the unit changes, never patched in place.

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::{Result, WheelError};
use crate::time::{format_label, format_sub_label, is_same_bucket, offset_date, TimeUnit};

/// One dated, selectable position on the wheel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WheelItem {
    /// `base + (index - center) * unit`
    pub date: NaiveDateTime,
    /// Short display label
    pub label: String,
    /// Context shown only while the item is active (empty for years)
    pub sub_label: String,
    /// Whether this item's bucket contains the current moment
    pub is_today: bool,
}

/// Generate `2 * radius + 1` items around `base`, using the local clock for "today"
pub fn generate_items(base: NaiveDateTime, unit: TimeUnit, radius: usize) -> Result<Vec<WheelItem>> {
    generate_items_at(base, unit, radius, Local::now().naive_local())
}

/// Generate `2 * radius + 1` items around `base` relative to an explicit `now`
pub fn generate_items_at(
    base: NaiveDateTime,
    unit: TimeUnit,
    radius: usize,
    now: NaiveDateTime,
) -> Result<Vec<WheelItem>> {
    let radius = i32::try_from(radius)
        .map_err(|_| WheelError::InvalidConfig(format!("window radius {radius} too large")))?;

    (-radius..=radius)
        .map(|offset| {
            let date = offset_date(base, unit, offset)?;
            Ok(WheelItem {
                date,
                label: format_label(date, unit),
                sub_label: format_sub_label(date, unit),
                is_today: is_same_bucket(date, now, unit),
            })
        })
        .collect()
}

/// The current window of items together with what it was generated from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WheelWindow {
    base: NaiveDateTime,
    unit: TimeUnit,
    radius: usize,
    items: Vec<WheelItem>,
}

impl WheelWindow {
    /// Build a window around `base`
    pub fn generate(base: NaiveDateTime, unit: TimeUnit, radius: usize) -> Result<Self> {
        Self::generate_at(base, unit, radius, Local::now().naive_local())
    }

    /// Build a window around `base` relative to an explicit `now`
    pub fn generate_at(
        base: NaiveDateTime,
        unit: TimeUnit,
        radius: usize,
        now: NaiveDateTime,
    ) -> Result<Self> {
        let items = generate_items_at(base, unit, radius, now)?;
        Ok(Self { base, unit, radius, items })
    }

    /// The date the window is centred on
    pub fn base(&self) -> NaiveDateTime {
        self.base
    }

    /// The unit of every item
    pub fn unit(&self) -> TimeUnit {
        self.unit
    }

    /// Items on each side of the centre
    pub fn radius(&self) -> usize {
        self.radius
    }

    /// Number of items (always odd)
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Windows are never empty
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Index of the item equal to the base date
    pub fn center_index(&self) -> usize {
        self.radius
    }

    /// All items in increasing date order
    pub fn items(&self) -> &[WheelItem] {
        &self.items
    }

    /// Item at `index`
    pub fn get(&self, index: usize) -> Option<&WheelItem> {
        self.items.get(index)
    }

    /// Clamp a possibly out-of-range index into the window
    pub fn clamp_index(&self, index: i64) -> usize {
        let last = self.items.len().saturating_sub(1) as i64;
        index.clamp(0, last) as usize
    }

    /// Signed distance of `index` from the centre, in items
    pub fn steps_from_center(&self, index: usize) -> i64 {
        index as i64 - self.radius as i64
    }
}
