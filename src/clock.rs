//! clock
//!
//! Wall-clock timestamps as fractional Unix seconds.
//!
//! Every expiry score in the store is an absolute `f64` Unix timestamp, so
//! all time math in the crate goes through this single helper. Expiry is
//! always computed from the acquiring caller's clock; there is no
//! store-side authoritative clock.

use chrono::Utc;

/// Current wall-clock time as fractional Unix seconds.
///
/// Microsecond resolution, which comfortably exceeds what TTL-based
/// expiry needs.
pub(crate) fn now() -> f64 {
    Utc::now().timestamp_micros() as f64 / 1_000_000.0
}
