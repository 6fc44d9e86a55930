//! Presenting business-local slots to customers in other timezones.
//!
//! Slots are generated in the business's naive wall-clock frame. This module
//! pins them to real instants with the business's IANA zone, then renders
//! them in the customer's zone.

use chrono::{DateTime, Duration, LocalResult, NaiveDateTime, Offset, TimeZone, Utc};
use chrono_tz::Tz;
use serde::Serialize;

use crate::dst::DstPolicy;
use crate::error::{BookingError, Result};
use crate::model::AvailabilitySlot;

/// Longest spring-forward gap searched when shifting forward.
const MAX_GAP_MINUTES: i64 = 180;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalizedSlot {
    /// The slot as generated, in business-local time.
    pub slot: AvailabilitySlot,
    pub start_utc: DateTime<Utc>,
    pub end_utc: DateTime<Utc>,
    pub timezone: String,
    /// Start in the customer's zone (RFC 3339 with offset).
    pub local_start: String,
    pub local_end: String,
    /// Customer's UTC offset at the slot start, e.g. `-05:00`.
    pub utc_offset: String,
}

pub fn parse_timezone(name: &str) -> Result<Tz> {
    name.parse::<Tz>()
        .map_err(|_| BookingError::InvalidTimezone(format!("'{}'", name)))
}

/// Resolve a naive local datetime in `tz` to an instant.
///
/// Ambiguous times take the earlier instant; times in a gap follow `policy`
/// and `None` means the policy dropped it.
pub fn resolve_local(tz: &Tz, naive: NaiveDateTime, policy: DstPolicy) -> Option<DateTime<Tz>> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Some(dt),
        LocalResult::Ambiguous(earliest, _) => Some(earliest),
        LocalResult::None => match policy {
            DstPolicy::Skip => None,
            DstPolicy::ShiftForward => (1..=MAX_GAP_MINUTES).find_map(|m| {
                tz.from_local_datetime(&(naive + Duration::minutes(m)))
                    .earliest()
            }),
            DstPolicy::WallClock => {
                let before = tz
                    .from_local_datetime(&(naive - Duration::minutes(MAX_GAP_MINUTES)))
                    .earliest()?;
                let offset = before.offset().fix();
                let utc = naive - Duration::seconds(i64::from(offset.local_minus_utc()));
                Some(tz.from_utc_datetime(&utc))
            }
        },
    }
}

/// Map one slot into `customer_tz`.
///
/// Returns `Ok(None)` when the slot starts in a DST gap and `policy` is
/// [`DstPolicy::Skip`].
///
/// # Errors
///
/// [`BookingError::InvalidTimezone`] if either zone is not a valid IANA name.
pub fn localize_slot(
    slot: &AvailabilitySlot,
    business_tz: &str,
    customer_tz: &str,
    policy: DstPolicy,
) -> Result<Option<LocalizedSlot>> {
    let business = parse_timezone(business_tz)?;
    let customer = parse_timezone(customer_tz)?;
    Ok(localize_with(slot, &business, &customer, customer_tz, policy))
}

/// Map a sequence of slots, dropping those the DST policy skips.
pub fn localize_slots(
    slots: &[AvailabilitySlot],
    business_tz: &str,
    customer_tz: &str,
    policy: DstPolicy,
) -> Result<Vec<LocalizedSlot>> {
    let business = parse_timezone(business_tz)?;
    let customer = parse_timezone(customer_tz)?;
    Ok(slots
        .iter()
        .filter_map(|slot| localize_with(slot, &business, &customer, customer_tz, policy))
        .collect())
}

fn localize_with(
    slot: &AvailabilitySlot,
    business: &Tz,
    customer: &Tz,
    customer_name: &str,
    policy: DstPolicy,
) -> Option<LocalizedSlot> {
    let start = resolve_local(business, slot.starts_at(), policy)?;
    let length = Duration::minutes(i64::from(slot.range().duration_minutes()));
    let start_utc = start.with_timezone(&Utc);
    let end_utc = start_utc + length;

    let local_start = start_utc.with_timezone(customer);
    let local_end = end_utc.with_timezone(customer);

    Some(LocalizedSlot {
        slot: slot.clone(),
        start_utc,
        end_utc,
        timezone: customer_name.to_string(),
        local_start: local_start.to_rfc3339(),
        local_end: local_end.to_rfc3339(),
        utc_offset: format_utc_offset(&local_start),
    })
}

fn format_utc_offset<T: TimeZone>(dt: &DateTime<T>) -> String {
    let offset_secs = dt.offset().fix().local_minus_utc();
    let sign = if offset_secs >= 0 { "+" } else { "-" };
    let abs_secs = offset_secs.unsigned_abs();
    let hours = abs_secs / 3600;
    let minutes = (abs_secs % 3600) / 60;
    format!("{sign}{hours:02}:{minutes:02}")
}
