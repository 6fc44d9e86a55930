//! TTL cache for generated slot sequences with tag-based invalidation.
//!
//! Entries are keyed by business, service and the generation options. The
//! key space is unbounded, so invalidation does not enumerate keys: each
//! business and each service carries a generation counter, every entry
//! records the counters it was computed under, and bumping a counter turns
//! all older entries into misses. Stale entries are evicted on read or by
//! [`SlotCache::cleanup_expired`].
//!
//! The cache is an optimisation only. Booking decisions always re-check live
//! appointment data.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use chrono::NaiveDate;
use dashmap::DashMap;
use tracing::{debug, info};

use crate::config::CacheConfig;
use crate::model::AvailabilitySlot;
use crate::slots::SlotOptions;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SlotCacheKey {
    pub business_id: String,
    pub service_id: String,
    pub start_date: NaiveDate,
    pub days: i64,
    pub slot_duration: Option<i64>,
    pub buffer_time: Option<i64>,
}

impl SlotCacheKey {
    pub fn new(business_id: &str, service_id: &str, options: &SlotOptions) -> Self {
        Self {
            business_id: business_id.to_string(),
            service_id: service_id.to_string(),
            start_date: options.start_date,
            days: options.days,
            slot_duration: options.slot_duration,
            buffer_time: options.buffer_time,
        }
    }
}

/// Generation counters observed before the cached data was loaded.
///
/// Take a ticket with [`SlotCache::ticket`] before reading the stores and
/// pass it to [`SlotCache::insert`]; an invalidation that lands while the
/// slots are being computed then makes the new entry stale immediately.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheTicket {
    business_generation: u64,
    service_generation: u64,
}

#[derive(Clone)]
struct CachedSlots {
    slots: Vec<AvailabilitySlot>,
    cached_at: Instant,
    ticket: CacheTicket,
}

pub struct SlotCache {
    entries: DashMap<SlotCacheKey, CachedSlots>,
    business_generations: DashMap<String, u64>,
    service_generations: DashMap<String, u64>,
    ttl: Duration,
    enabled: bool,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl SlotCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            business_generations: DashMap::new(),
            service_generations: DashMap::new(),
            ttl,
            enabled: true,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Creates a cache with a 5-minute TTL.
    pub fn with_default_ttl() -> Self {
        Self::new(Duration::from_secs(5 * 60))
    }

    /// A cache that never stores anything.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::new(Duration::ZERO)
        }
    }

    pub fn from_config(config: &CacheConfig) -> Self {
        if config.enabled {
            Self::new(config.ttl())
        } else {
            Self::disabled()
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn ticket(&self, business_id: &str, service_id: &str) -> CacheTicket {
        CacheTicket {
            business_generation: generation(&self.business_generations, business_id),
            service_generation: generation(&self.service_generations, service_id),
        }
    }

    pub fn get(&self, key: &SlotCacheKey) -> Option<Vec<AvailabilitySlot>> {
        if !self.enabled {
            return None;
        }

        let hit = self
            .entries
            .get(key)
            .and_then(|entry| self.is_fresh(key, &entry).then(|| entry.slots.clone()));

        match hit {
            Some(slots) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                debug!(business = %key.business_id, service = %key.service_id, "slot cache hit");
                Some(slots)
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                // A fresh entry may have been inserted since the read above.
                self.entries.remove_if(key, |k, entry| !self.is_fresh(k, entry));
                None
            }
        }
    }

    pub fn insert(&self, key: SlotCacheKey, slots: Vec<AvailabilitySlot>, ticket: CacheTicket) {
        if !self.enabled {
            return;
        }
        self.entries.insert(
            key,
            CachedSlots {
                slots,
                cached_at: Instant::now(),
                ticket,
            },
        );
    }

    /// Invalidate every entry for a business (schedule, exception or
    /// appointment change).
    pub fn invalidate_business(&self, business_id: &str) {
        bump(&self.business_generations, business_id);
        info!(business = %business_id, "slot cache invalidated for business");
    }

    /// Invalidate every entry for one service (duration or buffer change).
    pub fn invalidate_service(&self, service_id: &str) {
        bump(&self.service_generations, service_id);
        info!(service = %service_id, "slot cache invalidated for service");
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Number of stored entries, including expired and stale ones.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop expired and invalidated entries. The booking engine runs this
    /// after every invalidation.
    pub fn cleanup_expired(&self) {
        self.entries.retain(|key, entry| self.is_fresh(key, entry));
    }

    pub fn stats(&self) -> CacheStats {
        let mut total = 0;
        let mut expired = 0;
        for entry in self.entries.iter() {
            total += 1;
            if !self.is_fresh(entry.key(), entry.value()) {
                expired += 1;
            }
        }
        CacheStats {
            total_entries: total,
            expired_entries: expired,
            active_entries: total - expired,
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }

    fn is_fresh(&self, key: &SlotCacheKey, entry: &CachedSlots) -> bool {
        entry.cached_at.elapsed() < self.ttl
            && entry.ticket == self.ticket(&key.business_id, &key.service_id)
    }
}

impl Default for SlotCache {
    fn default() -> Self {
        Self::with_default_ttl()
    }
}

fn generation(counters: &DashMap<String, u64>, id: &str) -> u64 {
    counters.get(id).map(|g| *g).unwrap_or(0)
}

fn bump(counters: &DashMap<String, u64>, id: &str) {
    *counters.entry(id.to_string()).or_insert(0) += 1;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheStats {
    pub total_entries: usize,
    /// Entries past their TTL or invalidated by a generation bump.
    pub expired_entries: usize,
    pub active_entries: usize,
    pub hits: u64,
    pub misses: u64,
}
