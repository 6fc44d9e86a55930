//! Time-of-day and calendar-date primitives.
//!
//! Every time in this crate is a naive wall-clock value in the business's own
//! frame. `HH:MM` strings become [`TimeOfDay`] (minutes since midnight) and
//! `YYYY-MM-DD` strings become [`NaiveDate`]. Intervals are half-open
//! `[start, end)`: two intervals that merely touch do not overlap.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{BookingError, Result};

pub const MINUTES_PER_DAY: u32 = 24 * 60;

const TIME_FORMAT: &str = "HH:MM";
const DATE_FORMAT: &str = "YYYY-MM-DD";

/// A minute-granular time of day in `0..=1439`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeOfDay(u32);

impl TimeOfDay {
    pub const MIDNIGHT: TimeOfDay = TimeOfDay(0);

    pub fn from_minutes(minutes: u32) -> Option<Self> {
        (minutes < MINUTES_PER_DAY).then_some(Self(minutes))
    }

    pub fn from_hm(hour: u32, minute: u32) -> Option<Self> {
        if hour < 24 && minute < 60 {
            Some(Self(hour * 60 + minute))
        } else {
            None
        }
    }

    pub fn minutes(self) -> u32 {
        self.0
    }

    pub fn hour(self) -> u32 {
        self.0 / 60
    }

    pub fn minute(self) -> u32 {
        self.0 % 60
    }

    /// Returns `None` when the result would cross midnight.
    pub fn add_minutes(self, minutes: u32) -> Option<Self> {
        self.0
            .checked_add(minutes)
            .and_then(TimeOfDay::from_minutes)
    }

    pub fn is_after(self, other: TimeOfDay) -> bool {
        self.0 > other.0
    }

    pub fn is_before(self, other: TimeOfDay) -> bool {
        self.0 < other.0
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl FromStr for TimeOfDay {
    type Err = BookingError;

    fn from_str(s: &str) -> Result<Self> {
        parse_time("time", s)
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = BookingError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<TimeOfDay> for String {
    fn from(value: TimeOfDay) -> Self {
        value.to_string()
    }
}

/// Parse a strict two-digit `HH:MM` string, naming `field` on failure.
pub fn parse_time(field: &str, value: &str) -> Result<TimeOfDay> {
    let invalid = || BookingError::InvalidFormat {
        field: field.to_string(),
        value: value.to_string(),
        expected: TIME_FORMAT,
    };

    let bytes = value.as_bytes();
    if bytes.len() != 5 || bytes[2] != b':' {
        return Err(invalid());
    }
    let digits = [bytes[0], bytes[1], bytes[3], bytes[4]];
    if !digits.iter().all(u8::is_ascii_digit) {
        return Err(invalid());
    }
    let hour = u32::from(digits[0] - b'0') * 10 + u32::from(digits[1] - b'0');
    let minute = u32::from(digits[2] - b'0') * 10 + u32::from(digits[3] - b'0');

    TimeOfDay::from_hm(hour, minute).ok_or_else(invalid)
}

/// Parse a strict `YYYY-MM-DD` string into a naive local date.
pub fn parse_date(field: &str, value: &str) -> Result<NaiveDate> {
    let invalid = || BookingError::InvalidFormat {
        field: field.to_string(),
        value: value.to_string(),
        expected: DATE_FORMAT,
    };

    if value.len() != 10 {
        return Err(invalid());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| invalid())
}

pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Day of week with 0 = Sunday, matching the weekly schedule rows.
pub fn day_of_week(date: NaiveDate) -> u8 {
    date.weekday().num_days_from_sunday() as u8
}

/// Half-open interval overlap: `[a_start, a_end)` and `[b_start, b_end)`
/// overlap iff `a_start < b_end && b_start < a_end`.
pub fn overlaps<T: PartialOrd>(a_start: T, a_end: T, b_start: T, b_end: T) -> bool {
    a_start < b_end && b_start < a_end
}

/// A half-open `[start, end)` range of minutes since midnight.
///
/// The end may run past 1440 when a booking is extended by a buffer or when a
/// requested appointment would finish after midnight; such ranges simply never
/// fit inside business hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MinuteRange {
    pub start: u32,
    pub end: u32,
}

impl MinuteRange {
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    pub fn between(start: TimeOfDay, end: TimeOfDay) -> Self {
        Self::new(start.minutes(), end.minutes())
    }

    pub fn duration_minutes(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    pub fn overlaps(&self, other: &MinuteRange) -> bool {
        overlaps(self.start, self.end, other.start, other.end)
    }

    pub fn contains(&self, other: &MinuteRange) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    pub fn overlap_minutes(&self, other: &MinuteRange) -> u32 {
        if !self.overlaps(other) {
            return 0;
        }
        self.end.min(other.end) - self.start.max(other.start)
    }
}

impl fmt::Display for MinuteRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", format_minutes(self.start), format_minutes(self.end))
    }
}

/// Format a raw minute count as `HH:MM`; values past midnight keep counting
/// hours (`24:15`) so over-long ranges stay readable.
fn format_minutes(minutes: u32) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}
