//! Tests for the async booking façade over the stores.

use availability_engine::error::Result;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use availability_engine::store::{AppointmentStore, ScheduleStore, ServiceStore};
use availability_engine::{
    Appointment, AppointmentStatus, BookingEngine, BookingError, BookingRequest, BufferPolicy,
    BufferRule, Business, BusinessBundle, CheckAvailabilityRequest, EngineConfig, ExceptionDate,
    MemoryStore, Service, SlotCache, SlotOptions, SlotsRequest, StoreError, TimeOfDay,
    WeeklyScheduleEntry,
};
use chrono::NaiveDate;
use tokio::sync::Notify;

// ── Helpers ─────────────────────────────────────────────────────────────────

fn t(s: &str) -> TimeOfDay {
    s.parse().unwrap()
}

fn date(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

const MONDAY: &str = "2026-03-16";

fn service(id: &str, duration: i64, buffer_time: i64) -> Service {
    Service {
        id: id.to_string(),
        business_id: "biz-1".to_string(),
        name: id.to_string(),
        duration,
        buffer_time,
        is_active: true,
        category: None,
    }
}

fn appointment(id: &str, day: &str, start: &str, end: &str) -> Appointment {
    Appointment {
        id: id.to_string(),
        business_id: "biz-1".to_string(),
        service_id: "cut".to_string(),
        appointment_date: date(day),
        start_time: t(start),
        end_time: t(end),
        status: AppointmentStatus::Confirmed,
    }
}

/// Mon–Fri 09:00–17:00; services: `cut` (60/0), `color` (60/15), `retired`.
fn bundle(appointments: Vec<Appointment>) -> BusinessBundle {
    let mut retired = service("retired", 30, 0);
    retired.is_active = false;
    BusinessBundle {
        business: Business {
            id: "biz-1".to_string(),
            name: "Salon".to_string(),
            timezone: Some("America/New_York".to_string()),
        },
        weekly_schedule: (0u8..7)
            .map(|day| match day {
                1..=5 => WeeklyScheduleEntry::open(day, t("09:00"), t("17:00")),
                _ => WeeklyScheduleEntry::closed(day),
            })
            .collect(),
        exceptions: vec![],
        services: vec![service("cut", 60, 0), service("color", 60, 15), retired],
        appointments,
    }
}

fn engine(appointments: Vec<Appointment>) -> BookingEngine<MemoryStore> {
    BookingEngine::new(
        MemoryStore::from_bundle(bundle(appointments)),
        EngineConfig::default(),
    )
}

fn check_request(service_id: &str, day: &str, start: &str) -> CheckAvailabilityRequest {
    CheckAvailabilityRequest {
        business_id: "biz-1".to_string(),
        service_id: service_id.to_string(),
        appointment_date: day.to_string(),
        start_time: start.to_string(),
        exclude_appointment_id: None,
        include_suggestions: true,
    }
}

fn booking(service_id: &str, day: &str, start: &str) -> BookingRequest {
    check_request(service_id, day, start).parse().unwrap()
}

// ── validate_booking_request ────────────────────────────────────────────────

#[tokio::test]
async fn overlapping_request_is_rejected_with_nearest_suggestions() {
    let engine = engine(vec![appointment("a-1", MONDAY, "10:00", "11:00")]);

    let report = engine
        .validate_booking_request(&check_request("cut", MONDAY, "10:30"))
        .await
        .unwrap();

    assert!(!report.is_available);
    assert_eq!(report.conflicts.len(), 1);
    assert!(report.suggestions.len() <= 5);
    assert_eq!(report.suggestions[0].start_time, t("11:00"));
    assert_eq!(report.suggestions[1].start_time, t("09:00"));
    assert!(report.suggestions.iter().all(|s| s.start_time != t("10:00")));
}

#[tokio::test]
async fn free_request_is_available_without_suggestions() {
    let engine = engine(vec![]);
    let report = engine
        .validate_booking_request(&check_request("cut", MONDAY, "10:00"))
        .await
        .unwrap();
    assert!(report.is_available);
    assert!(report.suggestions.is_empty());
}

#[tokio::test]
async fn suggestions_can_be_turned_off() {
    let engine = engine(vec![appointment("a-1", MONDAY, "10:00", "11:00")]);
    let mut request = check_request("cut", MONDAY, "10:30");
    request.include_suggestions = false;

    let report = engine.validate_booking_request(&request).await.unwrap();
    assert!(!report.is_available);
    assert!(report.suggestions.is_empty());
}

#[tokio::test]
async fn malformed_time_fails_before_any_store_call() {
    let engine = engine(vec![]);

    let err = engine
        .validate_booking_request(&check_request("cut", MONDAY, "25:00"))
        .await
        .unwrap_err();

    assert!(err.is_validation());
    assert_eq!(err.field(), Some("startTime"));
    assert_eq!(engine.store().call_count(), 0);
}

#[tokio::test]
async fn malformed_date_fails_before_any_store_call() {
    let engine = engine(vec![]);
    let err = engine
        .validate_booking_request(&check_request("cut", "2026-13-01", "10:00"))
        .await
        .unwrap_err();
    assert_eq!(err.field(), Some("appointmentDate"));
    assert_eq!(engine.store().call_count(), 0);
}

#[tokio::test]
async fn unknown_business_is_not_found() {
    let engine = engine(vec![]);
    let mut request = check_request("cut", MONDAY, "10:00");
    request.business_id = "nope".to_string();

    let err = engine.validate_booking_request(&request).await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(
        err,
        BookingError::NotFound {
            entity: "business",
            id: "nope".to_string()
        }
    );
}

#[tokio::test]
async fn unknown_service_is_not_found() {
    let engine = engine(vec![]);
    let err = engine
        .validate_booking_request(&check_request("massage", MONDAY, "10:00"))
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn inactive_service_is_rejected() {
    let engine = engine(vec![]);
    let err = engine
        .validate_booking_request(&check_request("retired", MONDAY, "10:00"))
        .await
        .unwrap_err();
    assert_eq!(err.field(), Some("serviceId"));
}

#[tokio::test]
async fn exclude_id_supports_reschedule_in_place() {
    let engine = engine(vec![appointment("a-1", MONDAY, "10:00", "11:00")]);
    let mut request = check_request("cut", MONDAY, "10:30");
    request.exclude_appointment_id = Some("a-1".to_string());

    let report = engine.validate_booking_request(&request).await.unwrap();
    assert!(report.is_available);
}

#[tokio::test]
async fn adjacent_day_suggestions_follow_config() {
    let store = MemoryStore::from_bundle(bundle(vec![]));
    store
        .add_exception("biz-1", ExceptionDate::closed(date(MONDAY)))
        .await
        .unwrap();
    let config = EngineConfig {
        suggestion_adjacent_days: 1,
        max_suggestions: 2,
        ..EngineConfig::default()
    };
    let engine = BookingEngine::new(store, config);

    let report = engine
        .validate_booking_request(&check_request("cut", MONDAY, "10:00"))
        .await
        .unwrap();

    assert!(!report.is_available);
    assert_eq!(report.suggestions.len(), 2);
    assert!(report.suggestions.iter().all(|s| s.date == date("2026-03-17")));
}

// ── Store failures ──────────────────────────────────────────────────────────

/// Serves everything from a [`MemoryStore`] except appointment listing.
struct BrokenAppointments(MemoryStore);

impl ScheduleStore for BrokenAppointments {
    async fn get_business(&self, id: &str) -> Result<Option<Business>> {
        self.0.get_business(id).await
    }
    async fn get_weekly_schedule(
        &self,
        id: &str,
    ) -> Result<Vec<WeeklyScheduleEntry>> {
        self.0.get_weekly_schedule(id).await
    }
    async fn get_exceptions(&self, id: &str) -> Result<Vec<ExceptionDate>> {
        self.0.get_exceptions(id).await
    }
    async fn upsert_weekly(
        &self,
        id: &str,
        entry: WeeklyScheduleEntry,
    ) -> Result<()> {
        self.0.upsert_weekly(id, entry).await
    }
    async fn add_exception(
        &self,
        id: &str,
        exception: ExceptionDate,
    ) -> Result<()> {
        self.0.add_exception(id, exception).await
    }
    async fn delete_exception(&self, id: &str, d: NaiveDate) -> Result<bool> {
        self.0.delete_exception(id, d).await
    }
}

impl ServiceStore for BrokenAppointments {
    async fn get_service(&self, id: &str) -> Result<Option<Service>> {
        self.0.get_service(id).await
    }
    async fn save_service(&self, service: Service) -> Result<()> {
        self.0.save_service(service).await
    }
}

impl AppointmentStore for BrokenAppointments {
    async fn list_appointments(
        &self,
        _business_id: &str,
        _date: NaiveDate,
        _exclude_id: Option<&str>,
    ) -> Result<Vec<Appointment>> {
        Err(StoreError::new("list_appointments", "connection reset").into())
    }
    async fn get_appointment(&self, id: &str) -> Result<Option<Appointment>> {
        self.0.get_appointment(id).await
    }
    async fn create_appointment(&self, a: Appointment, rule: BufferRule) -> Result<()> {
        self.0.create_appointment(a, rule).await
    }
    async fn cancel_appointment(&self, id: &str) -> Result<Appointment> {
        self.0.cancel_appointment(id).await
    }
    async fn reschedule_appointment(
        &self,
        id: &str,
        d: NaiveDate,
        start: TimeOfDay,
        end: TimeOfDay,
        rule: BufferRule,
    ) -> Result<Appointment> {
        self.0.reschedule_appointment(id, d, start, end, rule).await
    }
}

#[tokio::test]
async fn store_failure_propagates_instead_of_reporting_available() {
    let engine = BookingEngine::new(
        BrokenAppointments(MemoryStore::from_bundle(bundle(vec![]))),
        EngineConfig::default(),
    );

    let err = engine
        .validate_booking_request(&check_request("cut", MONDAY, "10:00"))
        .await
        .unwrap_err();
    assert!(matches!(err, BookingError::Store(_)));

    let err = engine.book("a-9", &booking("cut", MONDAY, "10:00")).await.unwrap_err();
    assert!(matches!(err, BookingError::Store(_)));
}

// ── Slot listing ────────────────────────────────────────────────────────────

#[tokio::test]
async fn available_slots_hide_booked_times() {
    let engine = engine(vec![appointment("a-1", MONDAY, "10:00", "11:00")]);
    let request = SlotsRequest {
        business_id: "biz-1".to_string(),
        service_id: "cut".to_string(),
        start_date: MONDAY.to_string(),
        days: 1,
        slot_duration: None,
        buffer_time: None,
        exclude_booked: true,
        not_before: None,
    };

    let open = engine.slots(&request).await.unwrap();
    assert_eq!(open.len(), 7);
    assert!(open.iter().all(|s| s.start_time != t("10:00")));

    let all = engine
        .slots(&SlotsRequest {
            exclude_booked: false,
            ..request
        })
        .await
        .unwrap();
    assert_eq!(all.len(), 8);
}

#[tokio::test]
async fn not_before_hides_past_slots() {
    let engine = engine(vec![]);
    let request = SlotsRequest {
        business_id: "biz-1".to_string(),
        service_id: "cut".to_string(),
        start_date: MONDAY.to_string(),
        days: 1,
        slot_duration: None,
        buffer_time: None,
        exclude_booked: true,
        not_before: Some("2026-03-16T12:30".to_string()),
    };
    let open = engine.slots(&request).await.unwrap();
    assert_eq!(open.first().unwrap().start_time, t("13:00"));
    assert_eq!(open.len(), 4);
}

#[tokio::test]
async fn cached_and_uncached_results_match() {
    let cached = engine(vec![appointment("a-1", MONDAY, "10:00", "11:00")]);
    let uncached = BookingEngine::with_cache(
        MemoryStore::from_bundle(bundle(vec![appointment("a-1", MONDAY, "10:00", "11:00")])),
        EngineConfig::default(),
        SlotCache::disabled(),
    );
    let options = SlotOptions::new(date(MONDAY), 7);

    for _ in 0..2 {
        let a = cached.generate_slots("biz-1", "color", &options).await.unwrap();
        let b = uncached.generate_slots("biz-1", "color", &options).await.unwrap();
        assert_eq!(a, b);
    }
    assert_eq!(cached.cache().stats().hits, 1);
    assert!(uncached.cache().is_empty());
}

#[tokio::test]
async fn schedule_change_invalidates_cached_slots() {
    let engine = engine(vec![]);
    let options = SlotOptions::new(date(MONDAY), 1);

    let before = engine.generate_slots("biz-1", "cut", &options).await.unwrap();
    assert_eq!(before.len(), 8);

    engine
        .upsert_weekly("biz-1", WeeklyScheduleEntry::open(1, t("09:00"), t("12:00")))
        .await
        .unwrap();
    let after = engine.generate_slots("biz-1", "cut", &options).await.unwrap();
    assert_eq!(after.len(), 3);

    engine
        .add_exception("biz-1", ExceptionDate::closed(date(MONDAY)))
        .await
        .unwrap();
    assert!(engine.generate_slots("biz-1", "cut", &options).await.unwrap().is_empty());

    assert!(engine.delete_exception("biz-1", date(MONDAY)).await.unwrap());
    assert_eq!(engine.generate_slots("biz-1", "cut", &options).await.unwrap().len(), 3);
}

#[tokio::test]
async fn service_change_invalidates_cached_slots() {
    let engine = engine(vec![]);
    let options = SlotOptions::new(date(MONDAY), 1);
    assert_eq!(engine.generate_slots("biz-1", "cut", &options).await.unwrap().len(), 8);

    engine.update_service(service("cut", 120, 0)).await.unwrap();
    assert_eq!(engine.generate_slots("biz-1", "cut", &options).await.unwrap().len(), 4);
}

/// Pauses the first armed `get_service` after it has read, until released.
struct GatedServices {
    inner: MemoryStore,
    armed: AtomicBool,
    entered: Notify,
    release: Notify,
}

impl ScheduleStore for GatedServices {
    async fn get_business(&self, id: &str) -> Result<Option<Business>> {
        self.inner.get_business(id).await
    }
    async fn get_weekly_schedule(&self, id: &str) -> Result<Vec<WeeklyScheduleEntry>> {
        self.inner.get_weekly_schedule(id).await
    }
    async fn get_exceptions(&self, id: &str) -> Result<Vec<ExceptionDate>> {
        self.inner.get_exceptions(id).await
    }
    async fn upsert_weekly(&self, id: &str, entry: WeeklyScheduleEntry) -> Result<()> {
        self.inner.upsert_weekly(id, entry).await
    }
    async fn add_exception(&self, id: &str, exception: ExceptionDate) -> Result<()> {
        self.inner.add_exception(id, exception).await
    }
    async fn delete_exception(&self, id: &str, d: NaiveDate) -> Result<bool> {
        self.inner.delete_exception(id, d).await
    }
}

impl ServiceStore for GatedServices {
    async fn get_service(&self, id: &str) -> Result<Option<Service>> {
        let service = self.inner.get_service(id).await;
        if self.armed.swap(false, Ordering::SeqCst) {
            self.entered.notify_one();
            self.release.notified().await;
        }
        service
    }
    async fn save_service(&self, service: Service) -> Result<()> {
        self.inner.save_service(service).await
    }
}

impl AppointmentStore for GatedServices {
    async fn list_appointments(
        &self,
        business_id: &str,
        date: NaiveDate,
        exclude_id: Option<&str>,
    ) -> Result<Vec<Appointment>> {
        self.inner.list_appointments(business_id, date, exclude_id).await
    }
    async fn get_appointment(&self, id: &str) -> Result<Option<Appointment>> {
        self.inner.get_appointment(id).await
    }
    async fn create_appointment(&self, a: Appointment, rule: BufferRule) -> Result<()> {
        self.inner.create_appointment(a, rule).await
    }
    async fn cancel_appointment(&self, id: &str) -> Result<Appointment> {
        self.inner.cancel_appointment(id).await
    }
    async fn reschedule_appointment(
        &self,
        id: &str,
        d: NaiveDate,
        start: TimeOfDay,
        end: TimeOfDay,
        rule: BufferRule,
    ) -> Result<Appointment> {
        self.inner.reschedule_appointment(id, d, start, end, rule).await
    }
}

#[tokio::test]
async fn service_change_during_generation_is_not_cached() {
    let engine = Arc::new(BookingEngine::new(
        GatedServices {
            inner: MemoryStore::from_bundle(bundle(vec![])),
            armed: AtomicBool::new(true),
            entered: Notify::new(),
            release: Notify::new(),
        },
        EngineConfig::default(),
    ));
    let options = SlotOptions::new(date(MONDAY), 1);

    let reader = {
        let engine = engine.clone();
        let options = options.clone();
        tokio::spawn(async move { engine.generate_slots("biz-1", "cut", &options).await })
    };

    // The reader holds the 60-minute service when the update lands.
    engine.store().entered.notified().await;
    engine.update_service(service("cut", 120, 0)).await.unwrap();
    engine.store().release.notify_one();
    assert_eq!(reader.await.unwrap().unwrap().len(), 8);

    assert_eq!(engine.generate_slots("biz-1", "cut", &options).await.unwrap().len(), 4);
}

#[tokio::test]
async fn invalidation_evicts_stale_entries() {
    let engine = engine(vec![]);
    let options = SlotOptions::new(date(MONDAY), 1);
    engine.generate_slots("biz-1", "cut", &options).await.unwrap();
    engine.generate_slots("biz-1", "color", &options).await.unwrap();
    assert_eq!(engine.cache().len(), 2);

    engine.update_service(service("color", 60, 30)).await.unwrap();
    assert_eq!(engine.cache().len(), 1);

    engine.book("a-1", &booking("cut", MONDAY, "09:00")).await.unwrap();
    assert!(engine.cache().is_empty());
}

#[tokio::test]
async fn invalid_weekly_row_is_rejected_before_writing() {
    let engine = engine(vec![]);
    let err = engine
        .upsert_weekly("biz-1", WeeklyScheduleEntry::open(1, t("12:00"), t("09:00")))
        .await
        .unwrap_err();
    assert!(err.is_validation());
    assert_eq!(engine.store().call_count(), 0);
}

// ── Booking flow ────────────────────────────────────────────────────────────

#[tokio::test]
async fn booking_then_rebooking_the_same_slot_conflicts() {
    let engine = engine(vec![]);

    let booked = engine.book("a-1", &booking("color", MONDAY, "10:00")).await.unwrap();
    assert_eq!(booked.end_time, t("11:00"));
    assert_eq!(booked.status, AppointmentStatus::Pending);

    let err = engine
        .book("a-2", &booking("color", MONDAY, "10:30"))
        .await
        .unwrap_err();
    match err {
        BookingError::Conflict {
            conflicts,
            suggestions,
        } => {
            assert_eq!(conflicts.len(), 1);
            assert!(!suggestions.is_empty());
        }
        other => panic!("expected conflict, got {other:?}"),
    }

    // Buffer of 15 blocks 11:00 but not 11:15.
    assert!(engine.book("a-3", &booking("color", MONDAY, "11:00")).await.is_err());
    assert!(engine.book("a-4", &booking("color", MONDAY, "11:15")).await.is_ok());
}

#[tokio::test]
async fn cancelling_frees_the_slot() {
    let engine = engine(vec![appointment("a-1", MONDAY, "10:00", "11:00")]);
    assert!(engine.book("a-2", &booking("cut", MONDAY, "10:00")).await.is_err());

    let cancelled = engine.cancel_appointment("a-1").await.unwrap();
    assert_eq!(cancelled.status, AppointmentStatus::Cancelled);
    assert!(engine.book("a-2", &booking("cut", MONDAY, "10:00")).await.is_ok());
}

#[tokio::test]
async fn booking_invalidates_cached_slot_listing() {
    let engine = engine(vec![]);
    let query = SlotsRequest {
        business_id: "biz-1".to_string(),
        service_id: "cut".to_string(),
        start_date: MONDAY.to_string(),
        days: 1,
        slot_duration: None,
        buffer_time: None,
        exclude_booked: true,
        not_before: None,
    };
    assert_eq!(engine.slots(&query).await.unwrap().len(), 8);

    engine.book("a-1", &booking("cut", MONDAY, "09:00")).await.unwrap();
    assert_eq!(engine.slots(&query).await.unwrap().len(), 7);
}

#[tokio::test]
async fn reschedule_keeps_identity_and_ignores_own_slot() {
    let engine = engine(vec![
        appointment("a-1", MONDAY, "10:00", "11:00"),
        appointment("a-2", MONDAY, "12:00", "13:00"),
    ]);

    let moved = engine
        .reschedule_appointment("a-1", date(MONDAY), t("10:30"))
        .await
        .unwrap();
    assert_eq!(moved.id, "a-1");
    assert_eq!(moved.start_time, t("10:30"));
    assert_eq!(moved.end_time, t("11:30"));

    let err = engine
        .reschedule_appointment("a-1", date(MONDAY), t("11:30"))
        .await
        .unwrap_err();
    assert!(matches!(err, BookingError::Conflict { .. }));

    let err = engine
        .reschedule_appointment("missing", date(MONDAY), t("14:00"))
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn store_rejects_overlapping_insert_even_without_a_check() {
    let store = MemoryStore::from_bundle(bundle(vec![appointment("a-1", MONDAY, "10:00", "11:00")]));
    let err = store
        .create_appointment(appointment("a-2", MONDAY, "10:30", "11:30"), BufferRule::default())
        .await
        .unwrap_err();
    assert!(matches!(err, BookingError::Conflict { .. }));
}

#[tokio::test]
async fn store_applies_the_buffer_to_writes_checked_concurrently() {
    let engine = engine(vec![]);

    // Both checks run before either write, as two racing requests would.
    for start in ["09:00", "10:00"] {
        let report = engine.check(&booking("color", MONDAY, start)).await.unwrap();
        assert!(report.is_available);
    }

    let rule = BufferRule {
        buffer: 15,
        policy: BufferPolicy::Trailing,
    };
    let mut first = appointment("a-1", MONDAY, "09:00", "10:00");
    first.service_id = "color".to_string();
    let mut second = appointment("a-2", MONDAY, "10:00", "11:00");
    second.service_id = "color".to_string();

    engine.store().create_appointment(first, rule).await.unwrap();
    let err = engine.store().create_appointment(second, rule).await.unwrap_err();
    match err {
        BookingError::Conflict { conflicts, .. } => {
            assert_eq!(conflicts, ["overlaps appointment a-1 (09:00-10:00)"]);
        }
        other => panic!("expected conflict, got {other:?}"),
    }

    // The same rule guards a move into the buffer.
    engine
        .store()
        .create_appointment(appointment("a-3", MONDAY, "13:00", "14:00"), rule)
        .await
        .unwrap();
    let err = engine
        .store()
        .reschedule_appointment("a-3", date(MONDAY), t("10:00"), t("11:00"), rule)
        .await
        .unwrap_err();
    assert!(matches!(err, BookingError::Conflict { .. }));
    assert!(engine
        .store()
        .reschedule_appointment("a-3", date(MONDAY), t("10:15"), t("11:15"), rule)
        .await
        .is_ok());
}

#[tokio::test]
async fn concurrent_bookings_for_one_slot_admit_exactly_one() {
    let engine = Arc::new(engine(vec![]));
    let mut handles = Vec::new();
    for i in 0..8 {
        let engine = engine.clone();
        handles.push(tokio::spawn(async move {
            engine
                .book(format!("a-{i}"), &booking("cut", MONDAY, "14:00"))
                .await
                .is_ok()
        }));
    }

    let mut admitted = 0;
    for handle in handles {
        if handle.await.unwrap() {
            admitted += 1;
        }
    }
    assert_eq!(admitted, 1);
}

// ── Config ──────────────────────────────────────────────────────────────────

#[test]
fn config_defaults_and_overrides_from_json() {
    let config = EngineConfig::from_json_str("{}").unwrap();
    assert_eq!(config, EngineConfig::default());
    assert_eq!(config.max_suggestions, 5);
    assert_eq!(config.cache.ttl_secs, 300);

    let config =
        EngineConfig::from_json_str(r#"{"buffer_policy": "symmetric", "cache": {"enabled": false}}"#)
            .unwrap();
    assert_eq!(config.buffer_policy, BufferPolicy::Symmetric);
    assert!(!config.cache.enabled);
    assert_eq!(config.cache.ttl_secs, 300);
}

#[test]
fn config_rejects_bad_values() {
    assert!(matches!(
        EngineConfig::from_json_str(r#"{"cache": {"ttl_secs": 0}}"#),
        Err(BookingError::Config(_))
    ));
    assert!(matches!(
        EngineConfig::from_json_str(r#"{"max_suggestions": "lots"}"#),
        Err(BookingError::Config(_))
    ));
}
