//! Booking-conflict detection and alternative-slot suggestions.
//!
//! A request is bookable when its `[start, start + duration)` window lies
//! inside the date's effective hours and the time it occupies does not
//! overlap the time any non-cancelled appointment occupies. Occupied time
//! includes the buffer according to [`BufferPolicy`]. Adjacent bookings
//! (one occupied range ends exactly when the next begins) do not conflict.

use std::fmt;

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::BufferPolicy;
use crate::exceptions::BusinessHours;
use crate::model::{naive_datetime, Appointment, AvailabilitySlot};
use crate::schedule::OpeningHours;
use crate::slots::slots_in_window;
use crate::time::{MinuteRange, TimeOfDay};

/// A parsed, typed availability question for one service on one date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotCheck {
    pub date: NaiveDate,
    pub start_time: TimeOfDay,
    pub duration: u32,
    pub buffer: u32,
    /// Appointment being rescheduled; it never conflicts with itself.
    pub exclude_appointment_id: Option<String>,
}

impl SlotCheck {
    pub fn requested_range(&self) -> MinuteRange {
        let start = self.start_time.minutes();
        MinuteRange::new(start, start.saturating_add(self.duration))
    }
}

/// Why a requested slot cannot be booked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Conflict {
    OutsideBusinessHours {
        /// Hours in force that day; `None` when closed.
        hours: Option<OpeningHours>,
    },
    Overlap {
        appointment_id: String,
        start_time: TimeOfDay,
        end_time: TimeOfDay,
        overlap_minutes: u32,
    },
}

impl fmt::Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Conflict::OutsideBusinessHours { hours: Some(hours) } => write!(
                f,
                "outside business hours ({}-{})",
                hours.start, hours.end
            ),
            Conflict::OutsideBusinessHours { hours: None } => {
                write!(f, "outside business hours (closed)")
            }
            Conflict::Overlap {
                appointment_id,
                start_time,
                end_time,
                ..
            } => write!(
                f,
                "overlaps appointment {appointment_id} ({start_time}-{end_time})"
            ),
        }
    }
}

/// Outcome of an availability check. A conflict is a normal result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityReport {
    pub is_available: bool,
    pub conflicts: Vec<Conflict>,
    pub suggestions: Vec<AvailabilitySlot>,
}

impl AvailabilityReport {
    pub fn from_conflicts(conflicts: Vec<Conflict>) -> Self {
        Self {
            is_available: conflicts.is_empty(),
            conflicts,
            suggestions: Vec::new(),
        }
    }

    pub fn conflict_messages(&self) -> Vec<String> {
        self.conflicts.iter().map(ToString::to_string).collect()
    }
}

/// The minutes a booking holds on the calendar once its buffer is applied.
pub fn occupied_range(range: MinuteRange, buffer: u32, policy: BufferPolicy) -> MinuteRange {
    match policy {
        BufferPolicy::Trailing => MinuteRange::new(range.start, range.end.saturating_add(buffer)),
        BufferPolicy::Symmetric => MinuteRange::new(
            range.start.saturating_sub(buffer),
            range.end.saturating_add(buffer),
        ),
    }
}

/// Find every appointment on `date` whose occupied time overlaps `requested`.
///
/// Cancelled appointments and `exclude_id` are ignored.
pub fn find_overlaps(
    date: NaiveDate,
    requested: MinuteRange,
    appointments: &[Appointment],
    buffer: u32,
    policy: BufferPolicy,
    exclude_id: Option<&str>,
) -> Vec<Conflict> {
    let wanted = occupied_range(requested, buffer, policy);

    appointments
        .iter()
        .filter(|a| a.appointment_date == date && a.occupies_calendar())
        .filter(|a| exclude_id != Some(a.id.as_str()))
        .filter_map(|a| {
            let held = occupied_range(a.range(), buffer, policy);
            wanted.overlaps(&held).then(|| Conflict::Overlap {
                appointment_id: a.id.clone(),
                start_time: a.start_time,
                end_time: a.end_time,
                overlap_minutes: wanted.overlap_minutes(&held),
            })
        })
        .collect()
}

/// Check hours and existing bookings for one requested slot.
pub fn check_slot(
    hours: &BusinessHours,
    appointments: &[Appointment],
    check: &SlotCheck,
    policy: BufferPolicy,
) -> AvailabilityReport {
    let requested = check.requested_range();
    let mut conflicts = Vec::new();

    let open = hours.effective_hours(check.date);
    let within_hours = open.is_some_and(|h| h.range().contains(&requested));
    if !within_hours {
        conflicts.push(Conflict::OutsideBusinessHours { hours: open });
    }

    conflicts.extend(find_overlaps(
        check.date,
        requested,
        appointments,
        check.buffer,
        policy,
        check.exclude_appointment_id.as_deref(),
    ));

    if !conflicts.is_empty() {
        debug!(
            date = %check.date,
            start = %check.start_time,
            conflicts = conflicts.len(),
            "requested slot unavailable"
        );
    }
    AvailabilityReport::from_conflicts(conflicts)
}

/// Keep only slots that do not collide with an existing booking.
pub fn filter_available(
    slots: Vec<AvailabilitySlot>,
    appointments: &[Appointment],
    buffer: u32,
    policy: BufferPolicy,
    exclude_id: Option<&str>,
) -> Vec<AvailabilitySlot> {
    slots
        .into_iter()
        .filter(|slot| {
            find_overlaps(slot.date, slot.range(), appointments, buffer, policy, exclude_id)
                .is_empty()
        })
        .collect()
}

/// Nearest bookable alternatives to an unavailable request.
///
/// Candidates come from the slot grid of the requested date and of up to
/// `adjacent_days` days either side. They are ordered by absolute distance
/// from the requested start, earlier first on ties, and capped at `limit`.
pub fn suggest_alternatives(
    hours: &BusinessHours,
    appointments: &[Appointment],
    check: &SlotCheck,
    adjacent_days: u32,
    policy: BufferPolicy,
    limit: usize,
) -> Vec<AvailabilitySlot> {
    if limit == 0 {
        return Vec::new();
    }

    let requested_at = naive_datetime(check.date, check.start_time);
    let span = Days::new(u64::from(adjacent_days));
    let first = check.date.checked_sub_days(span).unwrap_or(check.date);
    let last = check.date.checked_add_days(span).unwrap_or(check.date);

    let mut candidates: Vec<AvailabilitySlot> = first
        .iter_days()
        .take_while(|d| *d <= last)
        .filter_map(|d| hours.effective_hours(d).map(|open| (d, open)))
        .flat_map(|(d, open)| slots_in_window(d, open, check.duration, check.buffer))
        .filter(|slot| !(slot.date == check.date && slot.start_time == check.start_time))
        .collect();

    candidates = filter_available(
        candidates,
        appointments,
        check.buffer,
        policy,
        check.exclude_appointment_id.as_deref(),
    );

    candidates.sort_by_key(|slot| {
        let distance = (slot.starts_at() - requested_at).num_minutes().abs();
        (distance, slot.starts_at())
    });
    candidates.truncate(limit);
    candidates
}
