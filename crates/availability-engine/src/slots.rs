//! Candidate slot generation from effective opening hours.
//!
//! For each date in the range, slots start at opening time and advance by
//! `duration + buffer`. A slot is emitted only while its end plus the buffer
//! still fits before closing, so there are no partial slots. Existing
//! appointments are not consulted here; see [`crate::validator`].

use chrono::{Days, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{BookingError, Result};
use crate::exceptions::BusinessHours;
use crate::model::{AvailabilitySlot, Service};
use crate::schedule::OpeningHours;
use crate::time::TimeOfDay;

/// Longest date range a single generation request may cover.
pub const MAX_RANGE_DAYS: i64 = 366;

/// Parameters for [`generate_slots`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotOptions {
    pub start_date: NaiveDate,
    pub days: i64,
    /// Overrides the service duration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slot_duration: Option<i64>,
    /// Overrides the service buffer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buffer_time: Option<i64>,
}

impl SlotOptions {
    pub fn new(start_date: NaiveDate, days: i64) -> Self {
        Self {
            start_date,
            days,
            slot_duration: None,
            buffer_time: None,
        }
    }

    pub fn with_slot_duration(mut self, minutes: i64) -> Self {
        self.slot_duration = Some(minutes);
        self
    }

    pub fn with_buffer_time(mut self, minutes: i64) -> Self {
        self.buffer_time = Some(minutes);
        self
    }

    /// Effective `(duration, buffer)` in minutes after applying overrides.
    pub fn resolve(&self, service: &Service) -> Result<(u32, u32)> {
        let duration = self.slot_duration.unwrap_or(service.duration);
        let buffer = self.buffer_time.unwrap_or(service.buffer_time);

        if duration <= 0 {
            return Err(BookingError::validation(
                "slotDuration",
                format!("must be positive, got {duration}"),
            ));
        }
        if buffer < 0 {
            return Err(BookingError::validation(
                "bufferTime",
                format!("must not be negative, got {buffer}"),
            ));
        }
        if self.days > MAX_RANGE_DAYS {
            return Err(BookingError::validation(
                "days",
                format!("must be at most {MAX_RANGE_DAYS}, got {}", self.days),
            ));
        }

        Ok((clamp_minutes(duration), clamp_minutes(buffer)))
    }
}

fn clamp_minutes(value: i64) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

/// Generate every candidate slot for the date range.
///
/// Pure: the same hours, service and options always produce the same slots.
///
/// # Errors
///
/// Returns [`BookingError::Validation`] for a non-positive slot duration, a
/// negative buffer or an over-long range. `days <= 0` is not an error and
/// yields no slots.
pub fn generate_slots(
    hours: &BusinessHours,
    service: &Service,
    options: &SlotOptions,
) -> Result<Vec<AvailabilitySlot>> {
    let (duration, buffer) = options.resolve(service)?;
    if options.days <= 0 {
        return Ok(Vec::new());
    }

    let mut slots = Vec::new();
    for offset in 0..options.days as u64 {
        let Some(date) = options.start_date.checked_add_days(Days::new(offset)) else {
            break;
        };
        match hours.effective_hours(date) {
            Some(open) => {
                let before = slots.len();
                slots.extend(slots_in_window(date, open, duration, buffer));
                debug!(%date, count = slots.len() - before, "generated slots");
            }
            None => debug!(%date, "closed, no slots"),
        }
    }
    Ok(slots)
}

/// Slots for one date's open window.
pub fn slots_in_window(
    date: NaiveDate,
    open: OpeningHours,
    duration: u32,
    buffer: u32,
) -> Vec<AvailabilitySlot> {
    let close = open.end.minutes();
    let step = duration.saturating_add(buffer);
    let mut slots = Vec::new();
    let mut start = open.start.minutes();

    while start.saturating_add(step) <= close {
        let (Some(start_time), Some(end_time)) = (
            TimeOfDay::from_minutes(start),
            TimeOfDay::from_minutes(start + duration),
        ) else {
            break;
        };
        slots.push(AvailabilitySlot {
            date,
            start_time,
            end_time,
        });
        start += step;
    }
    slots
}

/// Drop slots that start before `not_before`.
pub fn starting_from(slots: Vec<AvailabilitySlot>, not_before: NaiveDateTime) -> Vec<AvailabilitySlot> {
    slots
        .into_iter()
        .filter(|slot| slot.starts_at() >= not_before)
        .collect()
}
