use chrono::{DateTime, Utc};
use dhcpd_leases::Lease;

/// Shortest TTL published for a leased host.
pub const MIN_TTL: u32 = 60;
/// Longest TTL published for a leased host (one day).
pub const MAX_TTL: u32 = 24 * 60 * 60;

/// Seconds left until `expiration`, clamped to `MIN_TTL..=MAX_TTL`.
///
/// A lease with no end time is treated as open-ended and gets `MAX_TTL`.
pub fn ttl_seconds(expiration: Option<DateTime<Utc>>, now: DateTime<Utc>) -> u32 {
    let Some(expiration) = expiration else {
        return MAX_TTL;
    };
    let remaining = (expiration - now).num_seconds();
    // Bounds fit in u32.
    remaining.clamp(i64::from(MIN_TTL), i64::from(MAX_TTL)) as u32
}

pub fn lease_ttl(lease: &Lease, now: DateTime<Utc>) -> u32 {
    ttl_seconds(lease.expiration, now)
}
