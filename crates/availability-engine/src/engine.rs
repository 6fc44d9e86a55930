//! Booking façade: parse at the boundary, load from the stores, compute purely.
//!
//! # Concurrency
//!
//! The engine does not serialise bookings. "Check availability, then write"
//! is only safe when the write itself rejects overlaps atomically: a
//! database exclusion constraint or a lock on business and date held across
//! the check and the insert. The [`AppointmentStore`] contract requires this
//! of `create_appointment` and `reschedule_appointment`, and the mutation
//! helpers here rely on it rather than on the preceding check. Both receive
//! a [`BufferRule`] so the write enforces the same occupied ranges the check
//! does.

use std::collections::BTreeSet;

use chrono::{Days, NaiveDate};
use tracing::{debug, warn};

use crate::api::{BookingRequest, CheckAvailabilityRequest, SlotQuery, SlotsRequest};
use crate::cache::{SlotCache, SlotCacheKey};
use crate::config::EngineConfig;
use crate::dst::DstPolicy;
use crate::error::{BookingError, Result};
use crate::exceptions::{BusinessHours, ExceptionCalendar, ExceptionDate};
use crate::model::{Appointment, AppointmentStatus, AvailabilitySlot, Business, Service};
use crate::schedule::{WeeklySchedule, WeeklyScheduleEntry};
use crate::slots::{self, SlotOptions};
use crate::store::{AppointmentStore, BufferRule, ScheduleStore, ServiceStore};
use crate::time::TimeOfDay;
use crate::timezone::{self, LocalizedSlot};
use crate::validator::{self, AvailabilityReport, SlotCheck};

pub struct BookingEngine<S> {
    store: S,
    config: EngineConfig,
    cache: SlotCache,
}

impl<S> BookingEngine<S>
where
    S: ScheduleStore + ServiceStore + AppointmentStore,
{
    /// Build an engine with a cache configured from `config.cache`.
    pub fn new(store: S, config: EngineConfig) -> Self {
        let cache = SlotCache::from_config(&config.cache);
        Self::with_cache(store, config, cache)
    }

    pub fn with_cache(store: S, config: EngineConfig, cache: SlotCache) -> Self {
        Self {
            store,
            config,
            cache,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn cache(&self) -> &SlotCache {
        &self.cache
    }

    // ── Loading ─────────────────────────────────────────────────────────────

    async fn load_business(&self, business_id: &str) -> Result<Business> {
        self.store
            .get_business(business_id)
            .await
            .inspect_err(|e| warn!(business = %business_id, error = %e, "business lookup failed"))?
            .ok_or_else(|| BookingError::not_found("business", business_id))
    }

    async fn load_service(&self, business_id: &str, service_id: &str) -> Result<Service> {
        let service = self
            .store
            .get_service(service_id)
            .await
            .inspect_err(|e| warn!(service = %service_id, error = %e, "service lookup failed"))?
            .filter(|s| s.business_id == business_id)
            .ok_or_else(|| BookingError::not_found("service", service_id))?;

        service.validate()?;
        if !service.is_active {
            return Err(BookingError::validation(
                "serviceId",
                format!("service {service_id} is not active"),
            ));
        }
        Ok(service)
    }

    async fn load_hours(&self, business_id: &str) -> Result<BusinessHours> {
        let weekly_rows = self
            .store
            .get_weekly_schedule(business_id)
            .await
            .inspect_err(|e| warn!(business = %business_id, error = %e, "schedule lookup failed"))?;
        let exception_rows = self
            .store
            .get_exceptions(business_id)
            .await
            .inspect_err(|e| warn!(business = %business_id, error = %e, "exception lookup failed"))?;

        Ok(BusinessHours::new(
            WeeklySchedule::from_rows(&weekly_rows)?,
            ExceptionCalendar::new(&exception_rows)?,
        ))
    }

    async fn load_appointments(
        &self,
        business_id: &str,
        dates: impl IntoIterator<Item = NaiveDate>,
        exclude_id: Option<&str>,
    ) -> Result<Vec<Appointment>> {
        let mut appointments = Vec::new();
        for date in dates {
            let day = self
                .store
                .list_appointments(business_id, date, exclude_id)
                .await
                .inspect_err(|e| {
                    warn!(business = %business_id, %date, error = %e, "appointment lookup failed")
                })?;
            appointments.extend(day);
        }
        Ok(appointments)
    }

    // ── Availability check ──────────────────────────────────────────────────

    /// Validate a raw availability request.
    ///
    /// Malformed dates and times fail before any store call. An unknown
    /// business or service is [`BookingError::NotFound`]; an unavailable slot
    /// is a successful report with `is_available == false`.
    pub async fn validate_booking_request(
        &self,
        request: &CheckAvailabilityRequest,
    ) -> Result<AvailabilityReport> {
        let request = request.parse()?;
        self.check(&request).await
    }

    /// Check a parsed request against live data. Never reads the slot cache.
    pub async fn check(&self, request: &BookingRequest) -> Result<AvailabilityReport> {
        self.load_business(&request.business_id).await?;
        let service = self
            .load_service(&request.business_id, &request.service_id)
            .await?;
        let hours = self.load_hours(&request.business_id).await?;

        let (duration, buffer) = SlotOptions::new(request.appointment_date, 1).resolve(&service)?;
        let check = SlotCheck {
            date: request.appointment_date,
            start_time: request.start_time,
            duration,
            buffer,
            exclude_appointment_id: request.exclude_appointment_id.clone(),
        };
        let exclude = request.exclude_appointment_id.as_deref();
        let policy = self.config.buffer_policy;

        let same_day = self
            .load_appointments(&request.business_id, [request.appointment_date], exclude)
            .await?;
        let mut report = validator::check_slot(&hours, &same_day, &check, policy);

        if !report.is_available && request.include_suggestions {
            let adjacent = self.config.suggestion_adjacent_days;
            let appointments = if adjacent == 0 {
                same_day
            } else {
                let dates = around(request.appointment_date, adjacent);
                self.load_appointments(&request.business_id, dates, exclude)
                    .await?
            };
            report.suggestions = validator::suggest_alternatives(
                &hours,
                &appointments,
                &check,
                adjacent,
                policy,
                self.config.max_suggestions,
            );
        }
        Ok(report)
    }

    // ── Slot listing ────────────────────────────────────────────────────────

    /// Candidate slots for a date range, before removing booked ones.
    ///
    /// Served from the cache when a fresh entry exists. Business and service
    /// lookups always run so errors do not depend on cache state.
    pub async fn generate_slots(
        &self,
        business_id: &str,
        service_id: &str,
        options: &SlotOptions,
    ) -> Result<Vec<AvailabilitySlot>> {
        // Taken before any store read: an invalidation racing with the reads
        // below must make the resulting entry stale.
        let ticket = self.cache.ticket(business_id, service_id);
        self.load_business(business_id).await?;
        let service = self.load_service(business_id, service_id).await?;
        options.resolve(&service)?;

        let key = SlotCacheKey::new(business_id, service_id, options);
        if let Some(slots) = self.cache.get(&key) {
            return Ok(slots);
        }

        let hours = self.load_hours(business_id).await?;
        let slots = slots::generate_slots(&hours, &service, options)?;
        debug!(
            business = %business_id,
            service = %service_id,
            count = slots.len(),
            "computed slots"
        );
        self.cache.insert(key, slots.clone(), ticket);
        Ok(slots)
    }

    /// Slots still open for booking: generated slots minus those colliding
    /// with live non-cancelled appointments, optionally minus past slots.
    pub async fn available_slots(&self, query: &SlotQuery) -> Result<Vec<AvailabilitySlot>> {
        let mut slots = self
            .generate_slots(&query.business_id, &query.service_id, &query.options)
            .await?;

        if let Some(not_before) = query.not_before {
            slots = slots::starting_from(slots, not_before);
        }

        if query.exclude_booked && !slots.is_empty() {
            let service = self
                .load_service(&query.business_id, &query.service_id)
                .await?;
            let (_, buffer) = query.options.resolve(&service)?;
            let dates: BTreeSet<NaiveDate> = slots.iter().map(|s| s.date).collect();
            let appointments = self
                .load_appointments(&query.business_id, dates, None)
                .await?;
            slots = validator::filter_available(
                slots,
                &appointments,
                buffer,
                self.config.buffer_policy,
                None,
            );
        }
        Ok(slots)
    }

    pub async fn slots(&self, request: &SlotsRequest) -> Result<Vec<AvailabilitySlot>> {
        let query = request.parse()?;
        self.available_slots(&query).await
    }

    /// Open slots rendered in a customer's timezone.
    pub async fn localized_slots(
        &self,
        query: &SlotQuery,
        customer_tz: &str,
        policy: DstPolicy,
    ) -> Result<Vec<LocalizedSlot>> {
        timezone::parse_timezone(customer_tz)?;
        let business = self.load_business(&query.business_id).await?;
        let business_tz = business.timezone.ok_or_else(|| {
            BookingError::validation("timezone", format!("business {} has no timezone", business.id))
        })?;
        let slots = self.available_slots(query).await?;
        timezone::localize_slots(&slots, &business_tz, customer_tz, policy)
    }

    // ── Mutations ───────────────────────────────────────────────────────────

    pub async fn upsert_weekly(&self, business_id: &str, entry: WeeklyScheduleEntry) -> Result<()> {
        WeeklySchedule::from_rows(std::slice::from_ref(&entry))?;
        self.load_business(business_id).await?;
        self.store.upsert_weekly(business_id, entry).await?;
        self.invalidate_business(business_id);
        Ok(())
    }

    pub async fn add_exception(&self, business_id: &str, exception: ExceptionDate) -> Result<()> {
        exception.hours()?;
        self.load_business(business_id).await?;
        self.store.add_exception(business_id, exception).await?;
        self.invalidate_business(business_id);
        Ok(())
    }

    pub async fn delete_exception(&self, business_id: &str, date: NaiveDate) -> Result<bool> {
        let removed = self.store.delete_exception(business_id, date).await?;
        if removed {
            self.invalidate_business(business_id);
        }
        Ok(removed)
    }

    pub async fn update_service(&self, service: Service) -> Result<()> {
        service.validate()?;
        let service_id = service.id.clone();
        self.store.save_service(service).await?;
        self.cache.invalidate_service(&service_id);
        self.cache.cleanup_expired();
        Ok(())
    }

    /// Validate and then create a pending appointment for the request.
    ///
    /// # Errors
    ///
    /// [`BookingError::Conflict`] with suggestions when the slot is taken or
    /// outside business hours.
    pub async fn book(
        &self,
        appointment_id: impl Into<String>,
        request: &BookingRequest,
    ) -> Result<Appointment> {
        let report = self.check(request).await?;
        ensure_available(&report)?;

        let service = self
            .load_service(&request.business_id, &request.service_id)
            .await?;
        let appointment = Appointment {
            id: appointment_id.into(),
            business_id: request.business_id.clone(),
            service_id: request.service_id.clone(),
            appointment_date: request.appointment_date,
            start_time: request.start_time,
            end_time: end_of(request.start_time, &service)?,
            status: AppointmentStatus::Pending,
        };

        self.store
            .create_appointment(appointment.clone(), self.buffer_rule(&service))
            .await?;
        self.invalidate_business(&appointment.business_id);
        Ok(appointment)
    }

    pub async fn cancel_appointment(&self, appointment_id: &str) -> Result<Appointment> {
        let cancelled = self.store.cancel_appointment(appointment_id).await?;
        self.invalidate_business(&cancelled.business_id);
        Ok(cancelled)
    }

    /// Move an appointment to a new date and start, keeping its id. The
    /// appointment's current position does not count as a conflict.
    pub async fn reschedule_appointment(
        &self,
        appointment_id: &str,
        date: NaiveDate,
        start_time: TimeOfDay,
    ) -> Result<Appointment> {
        let current = self
            .store
            .get_appointment(appointment_id)
            .await?
            .ok_or_else(|| BookingError::not_found("appointment", appointment_id))?;
        if !current.occupies_calendar() {
            return Err(BookingError::validation(
                "status",
                format!("appointment {appointment_id} is {}", current.status.as_str()),
            ));
        }

        let request = BookingRequest {
            business_id: current.business_id.clone(),
            service_id: current.service_id.clone(),
            appointment_date: date,
            start_time,
            exclude_appointment_id: Some(current.id.clone()),
            include_suggestions: true,
        };
        let report = self.check(&request).await?;
        ensure_available(&report)?;

        let service = self
            .load_service(&current.business_id, &current.service_id)
            .await?;
        let moved = self
            .store
            .reschedule_appointment(
                appointment_id,
                date,
                start_time,
                end_of(start_time, &service)?,
                self.buffer_rule(&service),
            )
            .await?;
        self.invalidate_business(&moved.business_id);
        Ok(moved)
    }

    fn buffer_rule(&self, service: &Service) -> BufferRule {
        BufferRule {
            buffer: u32::try_from(service.buffer_time).unwrap_or(0),
            policy: self.config.buffer_policy,
        }
    }

    /// Bump the business generation and drop the entries it made stale.
    fn invalidate_business(&self, business_id: &str) {
        self.cache.invalidate_business(business_id);
        self.cache.cleanup_expired();
    }
}

fn ensure_available(report: &AvailabilityReport) -> Result<()> {
    if report.is_available {
        return Ok(());
    }
    Err(BookingError::Conflict {
        conflicts: report.conflict_messages(),
        suggestions: report.suggestions.clone(),
    })
}

fn end_of(start: TimeOfDay, service: &Service) -> Result<TimeOfDay> {
    u32::try_from(service.duration)
        .ok()
        .and_then(|d| start.add_minutes(d))
        .ok_or_else(|| BookingError::validation("startTime", "appointment would end after midnight"))
}

/// `date` plus `adjacent` days on either side, in order.
fn around(date: NaiveDate, adjacent: u32) -> Vec<NaiveDate> {
    let span = Days::new(u64::from(adjacent));
    let first = date.checked_sub_days(span).unwrap_or(date);
    let last = date.checked_add_days(span).unwrap_or(date);
    first.iter_days().take_while(|d| *d <= last).collect()
}
