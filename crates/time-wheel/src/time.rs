//! Time arithmetic and label formatting
//!
//! Pure functions over local wall-clock dates (`NaiveDateTime`): offsetting a
//! date by a number of units, bucketing dates by granularity, and producing
//! the short labels shown on the wheel.
//!
//! Week buckets follow ISO weeks: they start on Monday, so a Sunday belongs to
//! the week that began six days earlier.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Days, Months, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::{Result, WheelError};

/// Short month names, January first
pub const MONTH_SHORT: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Full month names, January first
pub const MONTH_LONG: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

// =============================================================================
// Time Unit
// =============================================================================

/// Granularity of the wheel
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum TimeUnit {
    /// One hour per item
    Hour,
    /// One calendar day per item
    #[default]
    Day,
    /// One ISO week per item
    Week,
    /// One calendar month per item
    Month,
    /// One calendar year per item
    Year,
}

impl TimeUnit {
    /// All units in navigation order
    pub const ALL: [TimeUnit; 5] = [
        TimeUnit::Hour,
        TimeUnit::Day,
        TimeUnit::Week,
        TimeUnit::Month,
        TimeUnit::Year,
    ];

    /// Position of this unit in [`TimeUnit::ALL`]
    pub fn position(self) -> usize {
        match self {
            TimeUnit::Hour => 0,
            TimeUnit::Day => 1,
            TimeUnit::Week => 2,
            TimeUnit::Month => 3,
            TimeUnit::Year => 4,
        }
    }

    /// The next finer unit, if any
    pub fn prev(self) -> Option<TimeUnit> {
        self.position().checked_sub(1).map(|i| Self::ALL[i])
    }

    /// The next coarser unit, if any
    pub fn next(self) -> Option<TimeUnit> {
        Self::ALL.get(self.position() + 1).copied()
    }

    /// Display name
    pub fn as_str(self) -> &'static str {
        match self {
            TimeUnit::Hour => "Hour",
            TimeUnit::Day => "Day",
            TimeUnit::Week => "Week",
            TimeUnit::Month => "Month",
            TimeUnit::Year => "Year",
        }
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeUnit {
    type Err = WheelError;

    fn from_str(s: &str) -> Result<Self> {
        TimeUnit::ALL
            .into_iter()
            .find(|unit| unit.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| WheelError::UnknownUnit(s.to_string()))
    }
}

// =============================================================================
// Arithmetic
// =============================================================================

/// Offset `base` by `n` units
///
/// Hours, days and weeks are fixed-length steps. Months and years are
/// calendar steps that keep the time of day and clamp the day of month to
/// the target month's length (Jan 31 + 1 month = Feb 28).
pub fn offset_date(base: NaiveDateTime, unit: TimeUnit, n: i32) -> Result<NaiveDateTime> {
    let out_of_range = || WheelError::DateOutOfRange { unit, offset: i64::from(n) };
    let n64 = i64::from(n);

    let shifted = match unit {
        TimeUnit::Hour => TimeDelta::try_hours(n64).and_then(|d| base.checked_add_signed(d)),
        TimeUnit::Day => TimeDelta::try_days(n64).and_then(|d| base.checked_add_signed(d)),
        TimeUnit::Week => TimeDelta::try_weeks(n64).and_then(|d| base.checked_add_signed(d)),
        TimeUnit::Month => add_months(base, n64),
        TimeUnit::Year => n64.checked_mul(12).and_then(|months| add_months(base, months)),
    };

    shifted.ok_or_else(out_of_range)
}

fn add_months(base: NaiveDateTime, months: i64) -> Option<NaiveDateTime> {
    let magnitude = u32::try_from(months.unsigned_abs()).ok()?;
    if months >= 0 {
        base.checked_add_months(Months::new(magnitude))
    } else {
        base.checked_sub_months(Months::new(magnitude))
    }
}

/// First day (Monday) of the ISO week containing `date`
pub fn week_start(date: NaiveDate) -> NaiveDate {
    let back = u64::from(date.weekday().num_days_from_monday());
    date.checked_sub_days(Days::new(back)).unwrap_or(date)
}

/// Start of the bucket containing `date`
pub fn bucket_start(date: NaiveDateTime, unit: TimeUnit) -> NaiveDateTime {
    let day = date.date();
    match unit {
        TimeUnit::Hour => NaiveTime::from_hms_opt(date.hour(), 0, 0)
            .map(|t| day.and_time(t))
            .unwrap_or(date),
        TimeUnit::Day => day.and_time(NaiveTime::MIN),
        TimeUnit::Week => week_start(day).and_time(NaiveTime::MIN),
        TimeUnit::Month => NaiveDate::from_ymd_opt(day.year(), day.month(), 1)
            .map(|d| d.and_time(NaiveTime::MIN))
            .unwrap_or(date),
        TimeUnit::Year => NaiveDate::from_ymd_opt(day.year(), 1, 1)
            .map(|d| d.and_time(NaiveTime::MIN))
            .unwrap_or(date),
    }
}

/// Whether `a` and `b` fall in the same hour, day, ISO week, month or year
pub fn is_same_bucket(a: NaiveDateTime, b: NaiveDateTime, unit: TimeUnit) -> bool {
    bucket_start(a, unit) == bucket_start(b, unit)
}

// =============================================================================
// Formatting
// =============================================================================

fn month_short(date: NaiveDate) -> &'static str {
    MONTH_SHORT[date.month0() as usize]
}

fn month_long(date: NaiveDate) -> &'static str {
    MONTH_LONG[date.month0() as usize]
}

/// Short label shown on every wheel item ("14:00", "14", "W6", "Feb", "2025")
pub fn format_label(date: NaiveDateTime, unit: TimeUnit) -> String {
    match unit {
        TimeUnit::Hour => format!("{:02}:00", date.hour()),
        TimeUnit::Day => date.day().to_string(),
        TimeUnit::Week => format!("W{}", date.iso_week().week()),
        TimeUnit::Month => month_short(date.date()).to_string(),
        TimeUnit::Year => date.year().to_string(),
    }
}

/// Secondary label shown under the active item
///
/// Empty for [`TimeUnit::Year`], which has no coarser context to show.
pub fn format_sub_label(date: NaiveDateTime, unit: TimeUnit) -> String {
    let day = date.date();
    match unit {
        TimeUnit::Hour => format!("{} {}, {}", month_short(day), day.day(), day.year()),
        TimeUnit::Day => format!("{} {}", month_short(day), day.year()),
        TimeUnit::Week => {
            let start = week_start(day);
            let end = start.checked_add_days(Days::new(6)).unwrap_or(start);
            format!(
                "{}{}-{}{}",
                month_short(start),
                start.day(),
                month_short(end),
                end.day()
            )
        }
        TimeUnit::Month => day.year().to_string(),
        TimeUnit::Year => String::new(),
    }
}

/// Full title for the selected value
pub fn format_title(date: NaiveDateTime, unit: TimeUnit) -> String {
    let day = date.date();
    match unit {
        TimeUnit::Hour => format!(
            "{} {}, {} · {:02}:00",
            month_short(day),
            day.day(),
            day.year(),
            date.hour()
        ),
        TimeUnit::Day => format!("{} {}, {}", month_long(day), day.day(), day.year()),
        TimeUnit::Week => {
            let start = week_start(day);
            let end = start.checked_add_days(Days::new(6)).unwrap_or(start);
            format!(
                "{} {} - {} {}, {}",
                month_short(start),
                start.day(),
                month_short(end),
                end.day(),
                day.year()
            )
        }
        TimeUnit::Month => format!("{} {}", month_long(day), day.year()),
        TimeUnit::Year => day.year().to_string(),
    }
}

/// Year caption shown beside the selection line (empty for years)
pub fn format_caption(date: NaiveDateTime, unit: TimeUnit) -> String {
    match unit {
        TimeUnit::Year => String::new(),
        _ => date.year().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    // ==========================================================================
    // Time Unit Tests
    // ==========================================================================

    #[test]
    fn test_unit_navigation() {
        assert_eq!(TimeUnit::Hour.prev(), None);
        assert_eq!(TimeUnit::Hour.next(), Some(TimeUnit::Day));
        assert_eq!(TimeUnit::Month.prev(), Some(TimeUnit::Week));
        assert_eq!(TimeUnit::Year.next(), None);
        for (i, unit) in TimeUnit::ALL.iter().enumerate() {
            assert_eq!(unit.position(), i);
        }
    }

    #[test]
    fn test_unit_parse() {
        assert_eq!("week".parse::<TimeUnit>().unwrap(), TimeUnit::Week);
        assert_eq!(" Year ".parse::<TimeUnit>().unwrap(), TimeUnit::Year);
        assert!(matches!(
            "fortnight".parse::<TimeUnit>(),
            Err(WheelError::UnknownUnit(_))
        ));
    }

    #[test]
    fn test_unit_serialization() {
        let json = serde_json::to_string(&TimeUnit::Month).unwrap();
        assert_eq!(json, "\"Month\"");
        let back: TimeUnit = serde_json::from_str(&json).unwrap();
        assert_eq!(back, TimeUnit::Month);
    }

    // ==========================================================================
    // Arithmetic Tests
    // ==========================================================================

    #[test]
    fn test_offset_fixed_steps() {
        let base = at(2025, 3, 10, 23);
        assert_eq!(offset_date(base, TimeUnit::Hour, 2).unwrap(), at(2025, 3, 11, 1));
        assert_eq!(offset_date(base, TimeUnit::Day, 3).unwrap(), at(2025, 3, 13, 23));
        assert_eq!(offset_date(base, TimeUnit::Day, -10).unwrap(), at(2025, 2, 28, 23));
        assert_eq!(offset_date(base, TimeUnit::Week, -2).unwrap(), at(2025, 2, 24, 23));
    }

    #[test]
    fn test_offset_months_clamp_day() {
        let base = at(2025, 1, 31, 8);
        assert_eq!(offset_date(base, TimeUnit::Month, 1).unwrap(), at(2025, 2, 28, 8));
        assert_eq!(offset_date(base, TimeUnit::Month, 13).unwrap(), at(2026, 2, 28, 8));
        assert_eq!(offset_date(base, TimeUnit::Month, -2).unwrap(), at(2024, 11, 30, 8));
    }

    #[test]
    fn test_offset_years_across_leap_day() {
        let base = at(2024, 2, 29, 0);
        assert_eq!(offset_date(base, TimeUnit::Year, 1).unwrap(), at(2025, 2, 28, 0));
        assert_eq!(offset_date(base, TimeUnit::Year, 4).unwrap(), at(2028, 2, 29, 0));
    }

    #[test]
    fn test_offset_out_of_range() {
        let base = at(2025, 1, 1, 0);
        let err = offset_date(base, TimeUnit::Year, i32::MAX).unwrap_err();
        assert!(matches!(err, WheelError::DateOutOfRange { unit: TimeUnit::Year, .. }));
    }

    #[test]
    fn test_week_bucket_is_iso() {
        let monday = at(2025, 1, 6, 0);
        let sunday = NaiveDate::from_ymd_opt(2025, 1, 12)
            .unwrap()
            .and_hms_opt(23, 59, 59)
            .unwrap();
        let next_monday = at(2025, 1, 13, 0);

        assert!(is_same_bucket(monday, sunday, TimeUnit::Week));
        assert!(!is_same_bucket(monday, next_monday, TimeUnit::Week));
        assert_eq!(bucket_start(sunday, TimeUnit::Week), monday);
    }

    #[test]
    fn test_bucket_equality_per_unit() {
        let a = at(2025, 6, 15, 9);
        let b = NaiveDate::from_ymd_opt(2025, 6, 15)
            .unwrap()
            .and_hms_opt(9, 45, 0)
            .unwrap();
        assert!(is_same_bucket(a, b, TimeUnit::Hour));
        assert!(!is_same_bucket(a, at(2025, 6, 15, 10), TimeUnit::Hour));
        assert!(is_same_bucket(a, at(2025, 6, 15, 22), TimeUnit::Day));
        assert!(is_same_bucket(a, at(2025, 6, 1, 0), TimeUnit::Month));
        assert!(!is_same_bucket(a, at(2024, 6, 15, 9), TimeUnit::Month));
        assert!(is_same_bucket(a, at(2025, 12, 31, 23), TimeUnit::Year));
    }

    #[test]
    fn test_bucket_reflexive() {
        let dates = [at(2025, 1, 1, 0), at(2024, 2, 29, 13), at(2025, 12, 28, 23)];
        for date in dates {
            for unit in TimeUnit::ALL {
                assert!(is_same_bucket(date, date, unit), "{date} {unit}");
            }
        }
    }

    // ==========================================================================
    // Formatting Tests
    // ==========================================================================

    #[test]
    fn test_labels() {
        let date = at(2025, 2, 5, 14);
        assert_eq!(format_label(date, TimeUnit::Hour), "14:00");
        assert_eq!(format_label(at(2025, 2, 5, 7), TimeUnit::Hour), "07:00");
        assert_eq!(format_label(date, TimeUnit::Day), "5");
        assert_eq!(format_label(date, TimeUnit::Week), "W6");
        assert_eq!(format_label(date, TimeUnit::Month), "Feb");
        assert_eq!(format_label(date, TimeUnit::Year), "2025");
    }

    #[test]
    fn test_week_label_matches_bucket() {
        // Monday and Sunday of the same ISO week share a label
        assert_eq!(
            format_label(at(2025, 1, 6, 0), TimeUnit::Week),
            format_label(at(2025, 1, 12, 0), TimeUnit::Week)
        );
    }

    #[test]
    fn test_sub_labels() {
        let date = at(2025, 2, 12, 9);
        assert_eq!(format_sub_label(date, TimeUnit::Hour), "Feb 12, 2025");
        assert_eq!(format_sub_label(date, TimeUnit::Day), "Feb 2025");
        assert_eq!(format_sub_label(date, TimeUnit::Week), "Feb10-Feb16");
        assert_eq!(format_sub_label(date, TimeUnit::Month), "2025");
        assert_eq!(format_sub_label(date, TimeUnit::Year), "");
    }

    #[test]
    fn test_week_sub_label_crosses_month() {
        let sunday = at(2025, 3, 2, 0);
        assert_eq!(format_sub_label(sunday, TimeUnit::Week), "Feb24-Mar2");
    }

    #[test]
    fn test_titles() {
        let date = at(2025, 2, 14, 9);
        assert_eq!(format_title(date, TimeUnit::Hour), "Feb 14, 2025 · 09:00");
        assert_eq!(format_title(date, TimeUnit::Day), "February 14, 2025");
        assert_eq!(format_title(date, TimeUnit::Week), "Feb 10 - Feb 16, 2025");
        assert_eq!(format_title(date, TimeUnit::Month), "February 2025");
        assert_eq!(format_title(date, TimeUnit::Year), "2025");
    }

    #[test]
    fn test_caption() {
        let date = at(2025, 2, 14, 9);
        assert_eq!(format_caption(date, TimeUnit::Day), "2025");
        assert_eq!(format_caption(date, TimeUnit::Year), "");
    }
}
