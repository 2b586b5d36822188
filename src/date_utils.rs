//! Date arithmetic on naive local date-times.
//!
//! Month and year differences use fixed 30 and 365 day lengths; only
//! [`add`] and [`start_of`] are calendar aware.

use std::fmt;
use std::str::FromStr;

use chrono::{
    DateTime, Datelike, Months, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, TimeZone, Timelike,
    Utc,
};
use serde::{Deserialize, Serialize};

use crate::error::GanttError;
use crate::i18n;

/// Unit of a step, padding or difference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateScale {
    Year,
    Month,
    Week,
    Day,
    Hour,
    Minute,
    Second,
    Millisecond,
}

impl DateScale {
    /// Length of one unit in days (month = 30, year = 365).
    pub fn in_days(self) -> f64 {
        match self {
            Self::Year => 365.0,
            Self::Month => 30.0,
            Self::Week => 7.0,
            Self::Day => 1.0,
            Self::Hour => 1.0 / 24.0,
            Self::Minute => 1.0 / 60.0 / 24.0,
            Self::Second => 1.0 / 60.0 / 60.0 / 24.0,
            Self::Millisecond => 1.0 / 60.0 / 60.0 / 24.0 / 1000.0,
        }
    }

    fn suffix(self) -> &'static str {
        match self {
            Self::Year => "y",
            Self::Month => "m",
            Self::Week => "w",
            Self::Day => "d",
            Self::Hour => "h",
            Self::Minute => "min",
            Self::Second => "s",
            Self::Millisecond => "ms",
        }
    }
}

/// A quantity of a [`DateScale`], parsed from strings such as `"1d"` or `"6h"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Period {
    pub quantity: i64,
    pub unit: DateScale,
}

impl Period {
    pub const fn new(quantity: i64, unit: DateScale) -> Self {
        Self { quantity, unit }
    }
}

impl FromStr for Period {
    type Err = GanttError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_duration(s)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.quantity, self.unit.suffix())
    }
}

/// Parse `<integer><unit>` where unit is one of `y m w d h min s ms`.
pub fn parse_duration(s: &str) -> Result<Period, GanttError> {
    let invalid = || GanttError::InvalidDuration(s.to_string());
    let trimmed = s.trim();
    let split = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .ok_or_else(invalid)?;
    let (digits, unit) = trimmed.split_at(split);
    if digits.is_empty() {
        return Err(invalid());
    }
    let quantity: i64 = digits.parse().map_err(|_| invalid())?;
    let unit = match unit {
        "y" => DateScale::Year,
        "m" => DateScale::Month,
        "w" => DateScale::Week,
        "d" => DateScale::Day,
        "h" => DateScale::Hour,
        "min" => DateScale::Minute,
        "s" => DateScale::Second,
        "ms" => DateScale::Millisecond,
        _ => return Err(invalid()),
    };
    Ok(Period { quantity, unit })
}

/// Calendar-aware addition. Month and year additions clamp to the last day
/// of the target month.
pub fn add(date: NaiveDateTime, quantity: i64, unit: DateScale) -> NaiveDateTime {
    let months = |n: i64| -> Option<NaiveDateTime> {
        let magnitude = u32::try_from(n.unsigned_abs()).ok()?;
        if n >= 0 {
            date.checked_add_months(Months::new(magnitude))
        } else {
            date.checked_sub_months(Months::new(magnitude))
        }
    };
    let shifted = match unit {
        DateScale::Year => quantity.checked_mul(12).and_then(months),
        DateScale::Month => months(quantity),
        DateScale::Week => TimeDelta::try_weeks(quantity).and_then(|d| date.checked_add_signed(d)),
        DateScale::Day => TimeDelta::try_days(quantity).and_then(|d| date.checked_add_signed(d)),
        DateScale::Hour => TimeDelta::try_hours(quantity).and_then(|d| date.checked_add_signed(d)),
        DateScale::Minute => {
            TimeDelta::try_minutes(quantity).and_then(|d| date.checked_add_signed(d))
        }
        DateScale::Second => {
            TimeDelta::try_seconds(quantity).and_then(|d| date.checked_add_signed(d))
        }
        DateScale::Millisecond => {
            TimeDelta::try_milliseconds(quantity).and_then(|d| date.checked_add_signed(d))
        }
    };
    shifted.unwrap_or(date)
}

/// Addition of a fractional quantity: the whole part is added calendar-aware,
/// the remainder with fixed unit lengths.
pub fn add_fractional(date: NaiveDateTime, quantity: f64, unit: DateScale) -> NaiveDateTime {
    if !quantity.is_finite() {
        return date;
    }
    let whole = quantity.trunc();
    let date = add(date, whole as i64, unit);
    let remainder_ms = (quantity - whole) * unit.in_days() * 86_400_000.0;
    add(date, remainder_ms.round() as i64, DateScale::Millisecond)
}

/// `a - b` expressed in `unit`.
pub fn diff(a: NaiveDateTime, b: NaiveDateTime, unit: DateScale) -> f64 {
    let delta = a - b;
    match unit {
        DateScale::Year => delta.num_days() as f64 / 365.0,
        DateScale::Month => delta.num_days() as f64 / 30.0,
        DateScale::Week => delta.num_hours() as f64 / (24.0 * 7.0),
        DateScale::Day => delta.num_hours() as f64 / 24.0,
        DateScale::Hour => delta.num_hours() as f64,
        DateScale::Minute => delta.num_minutes() as f64,
        DateScale::Second => delta.num_seconds() as f64,
        DateScale::Millisecond => delta.num_milliseconds() as f64,
    }
}

/// Snap `date` down to the start of its `unit`. Weeks start on Monday.
pub fn start_of(date: NaiveDateTime, unit: DateScale) -> NaiveDateTime {
    let day = date.date();
    let at = |d: NaiveDate, h: u32, m: u32, s: u32| {
        d.and_time(NaiveTime::from_hms_opt(h, m, s).unwrap_or(NaiveTime::MIN))
    };
    match unit {
        DateScale::Year => at(day.with_ordinal(1).unwrap_or(day), 0, 0, 0),
        DateScale::Month => at(day.with_day(1).unwrap_or(day), 0, 0, 0),
        DateScale::Week => {
            let back = i64::from(day.weekday().num_days_from_monday());
            at(day - TimeDelta::days(back), 0, 0, 0)
        }
        DateScale::Day => at(day, 0, 0, 0),
        DateScale::Hour => at(day, date.hour(), 0, 0),
        DateScale::Minute => at(day, date.hour(), date.minute(), 0),
        DateScale::Second => at(day, date.hour(), date.minute(), date.second()),
        DateScale::Millisecond => date
            .with_nanosecond(date.nanosecond() / 1_000_000 * 1_000_000)
            .unwrap_or(date),
    }
}

/// Length of `period` expressed in `to`, using fixed unit lengths.
pub fn convert_scales(period: Period, to: DateScale) -> f64 {
    period.quantity as f64 * period.unit.in_days() / to.in_days()
}

pub fn days_in_month(date: NaiveDateTime) -> u32 {
    let (y, m) = (date.year(), date.month());
    let (ny, nm) = if m == 12 { (y + 1, 1) } else { (y, m + 1) };
    match (
        NaiveDate::from_ymd_opt(y, m, 1),
        NaiveDate::from_ymd_opt(ny, nm, 1),
    ) {
        (Some(first), Some(next)) => (next - first).num_days() as u32,
        _ => 30,
    }
}

pub fn days_in_year(date: NaiveDateTime) -> u32 {
    if NaiveDate::from_ymd_opt(date.year(), 2, 29).is_some() {
        366
    } else {
        365
    }
}

pub fn decade(date: NaiveDateTime) -> i32 {
    date.year() - date.year().rem_euclid(10)
}

/// Format with strftime syntax; month and weekday names follow `lang`.
pub fn format(date: NaiveDateTime, fmt: &str, lang: &str) -> String {
    let utc: DateTime<Utc> = Utc.from_utc_datetime(&date);
    utc.format_localized(fmt, i18n::chrono_locale(lang)).to_string()
}

/// Make a formatted date usable as a lookup key.
pub fn sanitize(s: &str) -> String {
    s.replace([' ', ':', '.'], "_")
}

/// Parse a date or date-time in any of the accepted input formats.
pub fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    for fmt in &[
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M",
    ] {
        if let Ok(d) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(d);
        }
    }
    for fmt in &["%Y-%m-%d", "%d/%m/%Y", "%m/%d/%Y", "%d-%m-%Y", "%d.%m.%Y", "%Y/%m/%d"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d.and_time(NaiveTime::MIN));
        }
    }
    None
}

/// The current local date-time.
pub fn now() -> NaiveDateTime {
    chrono::Local::now().naive_local()
}

/// Serde helper for optional date-times stored as strings.
pub mod opt_datetime {
    use chrono::NaiveDateTime;
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(date: &Option<NaiveDateTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match date {
            Some(d) => serializer.serialize_str(&d.format("%Y-%m-%d %H:%M:%S").to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw {
            None => Ok(None),
            Some(s) => super::parse_datetime(&s)
                .map(Some)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid date '{s}'"))),
        }
    }
}
