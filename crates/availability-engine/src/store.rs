//! Interfaces to the external schedule, service and appointment stores.
//!
//! The scheduling core only reads through these traits; writes are performed
//! by the booking layer. Store methods are the only asynchronous calls in the
//! crate. A failed call must surface as an error, never as an empty result:
//! an empty appointment list read from a broken store would look "available".
//!
//! [`MemoryStore`] is an in-process implementation used by the CLI and tests.

use std::collections::{BTreeMap, HashMap};
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::config::BufferPolicy;
use crate::error::{BookingError, Result};
use crate::exceptions::ExceptionDate;
use crate::model::{Appointment, AppointmentStatus, Business, Service};
use crate::schedule::WeeklyScheduleEntry;
use crate::time::TimeOfDay;
use crate::validator;

/// Calendar time a booking holds beyond its own `[start, end)`, applied to
/// the incoming appointment and to every appointment it is compared with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BufferRule {
    pub buffer: u32,
    pub policy: BufferPolicy,
}

pub trait ScheduleStore: Send + Sync {
    fn get_business(&self, business_id: &str)
        -> impl Future<Output = Result<Option<Business>>> + Send;

    fn get_weekly_schedule(
        &self,
        business_id: &str,
    ) -> impl Future<Output = Result<Vec<WeeklyScheduleEntry>>> + Send;

    fn get_exceptions(
        &self,
        business_id: &str,
    ) -> impl Future<Output = Result<Vec<ExceptionDate>>> + Send;

    fn upsert_weekly(
        &self,
        business_id: &str,
        entry: WeeklyScheduleEntry,
    ) -> impl Future<Output = Result<()>> + Send;

    fn add_exception(
        &self,
        business_id: &str,
        exception: ExceptionDate,
    ) -> impl Future<Output = Result<()>> + Send;

    /// Returns whether an exception existed for the date.
    fn delete_exception(
        &self,
        business_id: &str,
        date: NaiveDate,
    ) -> impl Future<Output = Result<bool>> + Send;
}

pub trait ServiceStore: Send + Sync {
    fn get_service(&self, service_id: &str)
        -> impl Future<Output = Result<Option<Service>>> + Send;

    fn save_service(&self, service: Service) -> impl Future<Output = Result<()>> + Send;
}

pub trait AppointmentStore: Send + Sync {
    /// Appointments of any status for the business on `date`, minus `exclude_id`.
    fn list_appointments(
        &self,
        business_id: &str,
        date: NaiveDate,
        exclude_id: Option<&str>,
    ) -> impl Future<Output = Result<Vec<Appointment>>> + Send;

    fn get_appointment(
        &self,
        appointment_id: &str,
    ) -> impl Future<Output = Result<Option<Appointment>>> + Send;

    /// Insert an appointment, rejecting it with [`BookingError::Conflict`]
    /// when its occupied time under `rule` overlaps that of a non-cancelled
    /// appointment. The overlap test and the insert must be atomic with
    /// respect to other writes for the same business and date.
    fn create_appointment(
        &self,
        appointment: Appointment,
        rule: BufferRule,
    ) -> impl Future<Output = Result<()>> + Send;

    fn cancel_appointment(
        &self,
        appointment_id: &str,
    ) -> impl Future<Output = Result<Appointment>> + Send;

    /// Move an appointment, keeping its id. Same atomicity rule as
    /// [`AppointmentStore::create_appointment`].
    fn reschedule_appointment(
        &self,
        appointment_id: &str,
        date: NaiveDate,
        start_time: TimeOfDay,
        end_time: TimeOfDay,
        rule: BufferRule,
    ) -> impl Future<Output = Result<Appointment>> + Send;
}

/// Everything one business owns, in the shape of an exported JSON file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessBundle {
    pub business: Business,
    #[serde(default)]
    pub weekly_schedule: Vec<WeeklyScheduleEntry>,
    #[serde(default)]
    pub exceptions: Vec<ExceptionDate>,
    #[serde(default)]
    pub services: Vec<Service>,
    #[serde(default)]
    pub appointments: Vec<Appointment>,
}

#[derive(Debug, Default)]
struct Tables {
    businesses: HashMap<String, Business>,
    weekly: HashMap<String, BTreeMap<u8, WeeklyScheduleEntry>>,
    exceptions: HashMap<String, BTreeMap<NaiveDate, ExceptionDate>>,
    services: HashMap<String, Service>,
    appointments: BTreeMap<String, Appointment>,
}

impl Tables {
    fn load(&mut self, bundle: BusinessBundle) {
        let id = bundle.business.id.clone();
        let weekly = self.weekly.entry(id.clone()).or_default();
        for entry in bundle.weekly_schedule {
            weekly.insert(entry.day_of_week, entry);
        }
        let exceptions = self.exceptions.entry(id.clone()).or_default();
        for exception in bundle.exceptions {
            exceptions.insert(exception.date, exception);
        }
        for service in bundle.services {
            self.services.insert(service.id.clone(), service);
        }
        for appointment in bundle.appointments {
            self.appointments.insert(appointment.id.clone(), appointment);
        }
        self.businesses.insert(id, bundle.business);
    }

    /// The overlap guard a database exclusion constraint would enforce,
    /// using the same occupied ranges as the validator.
    fn ensure_free(&self, candidate: &Appointment, rule: BufferRule) -> Result<()> {
        if !candidate.occupies_calendar() {
            return Ok(());
        }
        let same_day: Vec<Appointment> = self
            .appointments
            .values()
            .filter(|a| {
                a.business_id == candidate.business_id
                    && a.appointment_date == candidate.appointment_date
            })
            .cloned()
            .collect();
        let clashes = validator::find_overlaps(
            candidate.appointment_date,
            candidate.range(),
            &same_day,
            rule.buffer,
            rule.policy,
            Some(candidate.id.as_str()),
        );

        if clashes.is_empty() {
            Ok(())
        } else {
            Err(BookingError::Conflict {
                conflicts: clashes.iter().map(ToString::to_string).collect(),
                suggestions: Vec::new(),
            })
        }
    }
}

/// In-memory store guarded by a single async lock.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
    calls: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_bundles(bundles: impl IntoIterator<Item = BusinessBundle>) -> Self {
        let mut tables = Tables::default();
        for bundle in bundles {
            tables.load(bundle);
        }
        Self {
            tables: RwLock::new(tables),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn from_bundle(bundle: BusinessBundle) -> Self {
        Self::from_bundles([bundle])
    }

    /// Number of store calls served so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }

    fn record_call(&self) {
        self.calls.fetch_add(1, Ordering::Relaxed);
    }
}

impl ScheduleStore for MemoryStore {
    async fn get_business(&self, business_id: &str) -> Result<Option<Business>> {
        self.record_call();
        Ok(self.tables.read().await.businesses.get(business_id).cloned())
    }

    async fn get_weekly_schedule(&self, business_id: &str) -> Result<Vec<WeeklyScheduleEntry>> {
        self.record_call();
        let tables = self.tables.read().await;
        Ok(tables
            .weekly
            .get(business_id)
            .map(|rows| rows.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn get_exceptions(&self, business_id: &str) -> Result<Vec<ExceptionDate>> {
        self.record_call();
        let tables = self.tables.read().await;
        Ok(tables
            .exceptions
            .get(business_id)
            .map(|rows| rows.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn upsert_weekly(&self, business_id: &str, entry: WeeklyScheduleEntry) -> Result<()> {
        self.record_call();
        let mut tables = self.tables.write().await;
        tables
            .weekly
            .entry(business_id.to_string())
            .or_default()
            .insert(entry.day_of_week, entry);
        Ok(())
    }

    async fn add_exception(&self, business_id: &str, exception: ExceptionDate) -> Result<()> {
        self.record_call();
        let mut tables = self.tables.write().await;
        let rows = tables.exceptions.entry(business_id.to_string()).or_default();
        if rows.contains_key(&exception.date) {
            return Err(BookingError::validation(
                "date",
                format!("an exception already exists for {}", exception.date),
            ));
        }
        rows.insert(exception.date, exception);
        Ok(())
    }

    async fn delete_exception(&self, business_id: &str, date: NaiveDate) -> Result<bool> {
        self.record_call();
        let mut tables = self.tables.write().await;
        Ok(tables
            .exceptions
            .get_mut(business_id)
            .is_some_and(|rows| rows.remove(&date).is_some()))
    }
}

impl ServiceStore for MemoryStore {
    async fn get_service(&self, service_id: &str) -> Result<Option<Service>> {
        self.record_call();
        Ok(self.tables.read().await.services.get(service_id).cloned())
    }

    async fn save_service(&self, service: Service) -> Result<()> {
        self.record_call();
        let mut tables = self.tables.write().await;
        tables.services.insert(service.id.clone(), service);
        Ok(())
    }
}

impl AppointmentStore for MemoryStore {
    async fn list_appointments(
        &self,
        business_id: &str,
        date: NaiveDate,
        exclude_id: Option<&str>,
    ) -> Result<Vec<Appointment>> {
        self.record_call();
        let tables = self.tables.read().await;
        Ok(tables
            .appointments
            .values()
            .filter(|a| a.business_id == business_id && a.appointment_date == date)
            .filter(|a| exclude_id != Some(a.id.as_str()))
            .cloned()
            .collect())
    }

    async fn get_appointment(&self, appointment_id: &str) -> Result<Option<Appointment>> {
        self.record_call();
        Ok(self.tables.read().await.appointments.get(appointment_id).cloned())
    }

    async fn create_appointment(&self, appointment: Appointment, rule: BufferRule) -> Result<()> {
        self.record_call();
        let mut tables = self.tables.write().await;
        if tables.appointments.contains_key(&appointment.id) {
            return Err(BookingError::validation(
                "id",
                format!("appointment {} already exists", appointment.id),
            ));
        }
        tables.ensure_free(&appointment, rule)?;
        tables
            .appointments
            .insert(appointment.id.clone(), appointment);
        Ok(())
    }

    async fn cancel_appointment(&self, appointment_id: &str) -> Result<Appointment> {
        self.record_call();
        let mut tables = self.tables.write().await;
        let appointment = tables
            .appointments
            .get_mut(appointment_id)
            .ok_or_else(|| BookingError::not_found("appointment", appointment_id))?;
        appointment.status = AppointmentStatus::Cancelled;
        Ok(appointment.clone())
    }

    async fn reschedule_appointment(
        &self,
        appointment_id: &str,
        date: NaiveDate,
        start_time: TimeOfDay,
        end_time: TimeOfDay,
        rule: BufferRule,
    ) -> Result<Appointment> {
        self.record_call();
        let mut tables = self.tables.write().await;
        let mut moved = tables
            .appointments
            .get(appointment_id)
            .cloned()
            .ok_or_else(|| BookingError::not_found("appointment", appointment_id))?;
        moved.appointment_date = date;
        moved.start_time = start_time;
        moved.end_time = end_time;
        tables.ensure_free(&moved, rule)?;
        tables
            .appointments
            .insert(moved.id.clone(), moved.clone());
        Ok(moved)
    }
}
