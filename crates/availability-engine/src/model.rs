//! Booking domain records consumed by the scheduling core.
//!
//! These mirror the rows owned by the external schema. They are parsed and
//! validated at the boundary, so the rest of the crate can trust their shape.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::{BookingError, Result};
use crate::time::{MinuteRange, TimeOfDay};

/// A business that owns a schedule, services and appointments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Business {
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// IANA timezone of the business's wall clock, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
}

/// A bookable service. Only `duration` and `buffer_time` affect scheduling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: String,
    pub business_id: String,
    #[serde(default)]
    pub name: String,
    /// Slot length in minutes.
    pub duration: i64,
    /// Required gap after an appointment, in minutes.
    #[serde(default)]
    pub buffer_time: i64,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

fn default_true() -> bool {
    true
}

impl Service {
    /// Check the duration and buffer are usable for scheduling.
    pub fn validate(&self) -> Result<()> {
        if self.duration <= 0 {
            return Err(BookingError::validation(
                "duration",
                format!("must be positive, got {}", self.duration),
            ));
        }
        if self.buffer_time < 0 {
            return Err(BookingError::validation(
                "bufferTime",
                format!("must not be negative, got {}", self.buffer_time),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

impl AppointmentStatus {
    /// Whether an appointment in this state blocks the calendar.
    pub fn occupies_calendar(self) -> bool {
        !matches!(self, AppointmentStatus::Cancelled)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AppointmentStatus::Pending => "pending",
            AppointmentStatus::Confirmed => "confirmed",
            AppointmentStatus::Cancelled => "cancelled",
            AppointmentStatus::Completed => "completed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: String,
    pub business_id: String,
    pub service_id: String,
    pub appointment_date: NaiveDate,
    pub start_time: TimeOfDay,
    pub end_time: TimeOfDay,
    pub status: AppointmentStatus,
}

impl Appointment {
    pub fn occupies_calendar(&self) -> bool {
        self.status.occupies_calendar()
    }

    pub fn range(&self) -> MinuteRange {
        MinuteRange::between(self.start_time, self.end_time)
    }
}

/// A candidate bookable window. Derived on demand, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilitySlot {
    pub date: NaiveDate,
    pub start_time: TimeOfDay,
    pub end_time: TimeOfDay,
}

impl AvailabilitySlot {
    pub fn range(&self) -> MinuteRange {
        MinuteRange::between(self.start_time, self.end_time)
    }

    pub fn starts_at(&self) -> NaiveDateTime {
        naive_datetime(self.date, self.start_time)
    }
}

/// Combine a naive date and time of day into a naive datetime.
pub fn naive_datetime(date: NaiveDate, time: TimeOfDay) -> NaiveDateTime {
    // `TimeOfDay` is always below 24:00, so the conversion cannot fail.
    let time = chrono::NaiveTime::from_num_seconds_from_midnight_opt(time.minutes() * 60, 0)
        .unwrap_or(chrono::NaiveTime::MIN);
    date.and_time(time)
}
