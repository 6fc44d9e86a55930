//! Date-specific overrides of the weekly schedule.
//!
//! An exception for a date decides that date's hours on its own: closed all
//! day, or open with its own window. The weekly schedule is only consulted
//! for dates without an exception.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{BookingError, Result};
use crate::schedule::{OpeningHours, WeeklySchedule};
use crate::time::{day_of_week, format_date, TimeOfDay};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExceptionDate {
    pub date: NaiveDate,
    /// `true` means special hours, `false` means closed all day.
    pub is_available: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<TimeOfDay>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<TimeOfDay>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl ExceptionDate {
    pub fn closed(date: NaiveDate) -> Self {
        Self {
            date,
            is_available: false,
            start_time: None,
            end_time: None,
            reason: None,
        }
    }

    pub fn special_hours(date: NaiveDate, start: TimeOfDay, end: TimeOfDay) -> Self {
        Self {
            date,
            is_available: true,
            start_time: Some(start),
            end_time: Some(end),
            reason: None,
        }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Hours in force on this date, `None` when closed.
    pub fn hours(&self) -> Result<Option<OpeningHours>> {
        if !self.is_available {
            return Ok(None);
        }
        OpeningHours::from_row(&format_date(self.date), self.start_time, self.end_time).map(Some)
    }
}

#[derive(Debug, Clone)]
struct Override {
    exception: ExceptionDate,
    hours: Option<OpeningHours>,
}

/// Validated set of exceptions, at most one per date.
#[derive(Debug, Clone, Default)]
pub struct ExceptionCalendar {
    by_date: BTreeMap<NaiveDate, Override>,
}

impl ExceptionCalendar {
    pub fn new(exceptions: &[ExceptionDate]) -> Result<Self> {
        let mut by_date = BTreeMap::new();
        for exception in exceptions {
            let hours = exception.hours()?;
            let previous = by_date.insert(
                exception.date,
                Override {
                    exception: exception.clone(),
                    hours,
                },
            );
            if previous.is_some() {
                return Err(BookingError::validation(
                    format_date(exception.date),
                    "duplicate exception for this date",
                ));
            }
        }
        Ok(Self { by_date })
    }

    pub fn lookup(&self, date: NaiveDate) -> Option<&ExceptionDate> {
        self.by_date.get(&date).map(|o| &o.exception)
    }

    pub fn len(&self) -> usize {
        self.by_date.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_date.is_empty()
    }

    fn override_for(&self, date: NaiveDate) -> Option<Option<OpeningHours>> {
        self.by_date.get(&date).map(|o| o.hours)
    }
}

/// Hours actually in force on `date`.
///
/// An exception for the date wins outright, whatever the weekly schedule
/// says for that weekday.
pub fn effective_hours_for(
    weekly: &WeeklySchedule,
    exceptions: &ExceptionCalendar,
    date: NaiveDate,
) -> Option<OpeningHours> {
    match exceptions.override_for(date) {
        Some(hours) => hours,
        None => weekly.hours_for(day_of_week(date)),
    }
}

/// A business's complete opening-hours picture.
#[derive(Debug, Clone, Default)]
pub struct BusinessHours {
    pub weekly: WeeklySchedule,
    pub exceptions: ExceptionCalendar,
}

impl BusinessHours {
    pub fn new(weekly: WeeklySchedule, exceptions: ExceptionCalendar) -> Self {
        Self { weekly, exceptions }
    }

    pub fn effective_hours(&self, date: NaiveDate) -> Option<OpeningHours> {
        effective_hours_for(&self.weekly, &self.exceptions, date)
    }
}
