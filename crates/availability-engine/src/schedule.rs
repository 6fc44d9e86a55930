//! Recurring weekly opening hours.
//!
//! One row per weekday (0 = Sunday). A closed day has no hours; an open day
//! has `start < end`.

use serde::{Deserialize, Serialize};

use crate::error::{BookingError, Result};
use crate::time::{MinuteRange, TimeOfDay};

const DAY_NAMES: [&str; 7] = [
    "sunday",
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
];

/// A raw weekly schedule row as stored by the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyScheduleEntry {
    pub day_of_week: u8,
    pub is_available: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<TimeOfDay>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<TimeOfDay>,
}

impl WeeklyScheduleEntry {
    pub fn open(day_of_week: u8, start: TimeOfDay, end: TimeOfDay) -> Self {
        Self {
            day_of_week,
            is_available: true,
            start_time: Some(start),
            end_time: Some(end),
        }
    }

    pub fn closed(day_of_week: u8) -> Self {
        Self {
            day_of_week,
            is_available: false,
            start_time: None,
            end_time: None,
        }
    }
}

/// Open window for a single day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OpeningHours {
    pub start: TimeOfDay,
    pub end: TimeOfDay,
}

impl OpeningHours {
    /// Build hours from optional row fields; `field` names the row in errors.
    pub(crate) fn from_row(
        field: &str,
        start: Option<TimeOfDay>,
        end: Option<TimeOfDay>,
    ) -> Result<Self> {
        match (start, end) {
            (Some(start), Some(end)) if start < end => Ok(Self { start, end }),
            (Some(start), Some(end)) => Err(BookingError::validation(
                field,
                format!("start time {start} must be before end time {end}"),
            )),
            _ => Err(BookingError::validation(
                field,
                "start and end time are required when available",
            )),
        }
    }

    pub fn range(&self) -> MinuteRange {
        MinuteRange::between(self.start, self.end)
    }

    pub fn duration_minutes(&self) -> u32 {
        self.range().duration_minutes()
    }
}

/// Validated weekly schedule, indexed by day of week.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeeklySchedule {
    days: [Option<OpeningHours>; 7],
}

impl WeeklySchedule {
    /// Build a schedule that must contain exactly one row for each weekday.
    pub fn new(entries: &[WeeklyScheduleEntry]) -> Result<Self> {
        let (schedule, seen) = Self::collect(entries)?;
        if let Some(missing) = seen.iter().position(|s| !s) {
            return Err(BookingError::validation(
                DAY_NAMES[missing],
                "no schedule entry for this weekday",
            ));
        }
        Ok(schedule)
    }

    /// Build a schedule from stored rows, treating weekdays without a row as
    /// closed. Duplicate or malformed rows are still rejected.
    pub fn from_rows(entries: &[WeeklyScheduleEntry]) -> Result<Self> {
        Self::collect(entries).map(|(schedule, _)| schedule)
    }

    fn collect(entries: &[WeeklyScheduleEntry]) -> Result<(Self, [bool; 7])> {
        let mut days = [None; 7];
        let mut seen = [false; 7];

        for entry in entries {
            let day = usize::from(entry.day_of_week);
            if day >= 7 {
                return Err(BookingError::validation(
                    "dayOfWeek",
                    format!("must be 0-6, got {}", entry.day_of_week),
                ));
            }
            if seen[day] {
                return Err(BookingError::validation(
                    DAY_NAMES[day],
                    "duplicate schedule entry for this weekday",
                ));
            }
            seen[day] = true;

            if entry.is_available {
                days[day] = Some(OpeningHours::from_row(
                    DAY_NAMES[day],
                    entry.start_time,
                    entry.end_time,
                )?);
            }
        }

        Ok((Self { days }, seen))
    }

    pub fn is_open_on(&self, day_of_week: u8) -> bool {
        self.hours_for(day_of_week).is_some()
    }

    pub fn hours_for(&self, day_of_week: u8) -> Option<OpeningHours> {
        self.days.get(usize::from(day_of_week)).copied().flatten()
    }

    /// Rows suitable for writing back to a store, one per weekday.
    pub fn to_entries(&self) -> Vec<WeeklyScheduleEntry> {
        (0u8..7)
            .map(|day| match self.hours_for(day) {
                Some(hours) => WeeklyScheduleEntry::open(day, hours.start, hours.end),
                None => WeeklyScheduleEntry::closed(day),
            })
            .collect()
    }
}
