//! Wire shapes for the `availability/check` and `availability/slots` surfaces.
//!
//! Requests carry raw strings and are parsed here, at the boundary, before
//! any store is touched.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::{BookingError, Result};
use crate::model::{naive_datetime, AvailabilitySlot};
use crate::slots::SlotOptions;
use crate::time::{parse_date, parse_time, TimeOfDay};
use crate::validator::AvailabilityReport;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckAvailabilityRequest {
    pub business_id: String,
    pub service_id: String,
    pub appointment_date: String,
    pub start_time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude_appointment_id: Option<String>,
    #[serde(default = "default_true")]
    pub include_suggestions: bool,
}

fn default_true() -> bool {
    true
}

/// A [`CheckAvailabilityRequest`] after boundary parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingRequest {
    pub business_id: String,
    pub service_id: String,
    pub appointment_date: NaiveDate,
    pub start_time: TimeOfDay,
    pub exclude_appointment_id: Option<String>,
    pub include_suggestions: bool,
}

impl CheckAvailabilityRequest {
    pub fn parse(&self) -> Result<BookingRequest> {
        require("businessId", &self.business_id)?;
        require("serviceId", &self.service_id)?;
        Ok(BookingRequest {
            business_id: self.business_id.clone(),
            service_id: self.service_id.clone(),
            appointment_date: parse_date("appointmentDate", &self.appointment_date)?,
            start_time: parse_time("startTime", &self.start_time)?,
            exclude_appointment_id: self.exclude_appointment_id.clone(),
            include_suggestions: self.include_suggestions,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotsRequest {
    pub business_id: String,
    pub service_id: String,
    pub start_date: String,
    pub days: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slot_duration: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buffer_time: Option<i64>,
    /// Hide slots that are already booked.
    #[serde(default = "default_true")]
    pub exclude_booked: bool,
    /// Business-local `YYYY-MM-DDTHH:MM`; earlier slots are hidden.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub not_before: Option<String>,
}

/// A [`SlotsRequest`] after boundary parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotQuery {
    pub business_id: String,
    pub service_id: String,
    pub options: SlotOptions,
    pub exclude_booked: bool,
    pub not_before: Option<NaiveDateTime>,
}

impl SlotsRequest {
    pub fn parse(&self) -> Result<SlotQuery> {
        require("businessId", &self.business_id)?;
        require("serviceId", &self.service_id)?;
        let options = SlotOptions {
            start_date: parse_date("startDate", &self.start_date)?,
            days: self.days,
            slot_duration: self.slot_duration,
            buffer_time: self.buffer_time,
        };
        let not_before = self
            .not_before
            .as_deref()
            .map(|value| parse_local_datetime("notBefore", value))
            .transpose()?;
        Ok(SlotQuery {
            business_id: self.business_id.clone(),
            service_id: self.service_id.clone(),
            options,
            exclude_booked: self.exclude_booked,
            not_before,
        })
    }
}

fn require(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(BookingError::validation(field, "must not be empty"));
    }
    Ok(())
}

/// Parse `YYYY-MM-DDTHH:MM` (a space separator is also accepted).
pub fn parse_local_datetime(field: &str, value: &str) -> Result<NaiveDateTime> {
    let (date, time) = value
        .split_once(['T', ' '])
        .ok_or_else(|| BookingError::InvalidFormat {
            field: field.to_string(),
            value: value.to_string(),
            expected: "YYYY-MM-DDTHH:MM",
        })?;
    let date = parse_date(field, date)?;
    let time = parse_time(field, time)?;
    Ok(naive_datetime(date, time))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityResponse {
    pub available: bool,
    pub conflicts: Vec<String>,
    pub suggestions: Vec<AvailabilitySlot>,
}

impl From<&AvailabilityReport> for AvailabilityResponse {
    fn from(report: &AvailabilityReport) -> Self {
        Self {
            available: report.is_available,
            conflicts: report.conflict_messages(),
            suggestions: report.suggestions.clone(),
        }
    }
}

impl From<AvailabilityReport> for AvailabilityResponse {
    fn from(report: AvailabilityReport) -> Self {
        Self::from(&report)
    }
}
