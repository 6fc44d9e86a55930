//! # availability-engine
//!
//! Deterministic slot generation and booking-conflict resolution for
//! appointment scheduling.
//!
//! Given a business's weekly schedule, its exception dates, a service's
//! duration and buffer, and the appointments already on the books, the engine
//! computes bookable slots and decides whether a requested slot can be taken.
//! All of that is synchronous, pure computation; only the store lookups in
//! [`store`] are asynchronous.
//!
//! ## Modules
//!
//! - [`time`] — `HH:MM` / `YYYY-MM-DD` parsing, half-open interval overlap
//! - [`model`] — Business, service, appointment and slot records
//! - [`schedule`] — Weekly opening hours per weekday
//! - [`exceptions`] — Date overrides and effective hours
//! - [`slots`] — Candidate slot generation
//! - [`validator`] — Conflict detection and alternative suggestions
//! - [`cache`] — TTL slot cache with tag-based invalidation
//! - [`store`] — External store interfaces and an in-memory store
//! - [`engine`] — Async booking façade over the stores
//! - [`api`] — Request/response shapes for the availability surfaces
//! - [`timezone`] — Rendering slots in a customer's timezone
//! - [`dst`] — DST gap policies
//! - [`config`] — Engine configuration
//! - [`error`] — Error types

pub mod api;
pub mod cache;
pub mod config;
pub mod dst;
pub mod engine;
pub mod error;
pub mod exceptions;
pub mod model;
pub mod schedule;
pub mod slots;
pub mod store;
pub mod time;
pub mod timezone;
pub mod validator;

pub use api::{AvailabilityResponse, BookingRequest, CheckAvailabilityRequest, SlotQuery, SlotsRequest};
pub use cache::{CacheStats, SlotCache, SlotCacheKey};
pub use config::{BufferPolicy, CacheConfig, EngineConfig};
pub use dst::DstPolicy;
pub use engine::BookingEngine;
pub use error::{BookingError, StoreError};
pub use exceptions::{effective_hours_for, BusinessHours, ExceptionCalendar, ExceptionDate};
pub use model::{Appointment, AppointmentStatus, AvailabilitySlot, Business, Service};
pub use schedule::{OpeningHours, WeeklySchedule, WeeklyScheduleEntry};
pub use slots::{generate_slots, SlotOptions};
pub use store::{
    AppointmentStore, BufferRule, BusinessBundle, MemoryStore, ScheduleStore, ServiceStore,
};
pub use time::{overlaps, parse_date, parse_time, MinuteRange, TimeOfDay};
pub use timezone::{localize_slot, localize_slots, LocalizedSlot};
pub use validator::{check_slot, AvailabilityReport, Conflict, SlotCheck};
