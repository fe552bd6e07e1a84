//! Timestamp epoch conversion.
//!
//! macOS artifacts store times against three different epochs: Unix (1970),
//! Cocoa/Mac absolute time (2001-01-01), and the 1601 Gregorian epoch used
//! by formats inherited from Windows. Each converter maps an integer delta
//! to a UTC calendar time, returning `None` on overflow instead of
//! panicking; reports render `None` as an explicit marker.

use chrono::{DateTime, TimeZone, Utc};

/// Seconds between the 2001-01-01 Cocoa epoch and the Unix epoch
const COCOA_EPOCH_OFFSET: i64 = 978_307_200;

/// Seconds between the 1601-01-01 Gregorian epoch and the Unix epoch
const WINDOWS_EPOCH_OFFSET: i64 = 11_644_473_600;

/// Marker written into reports for values no epoch rule could convert
pub const UNCONVERTIBLE: &str = "<unconvertible>";

/// Seconds after the Unix epoch (1970-01-01)
pub fn unix_epoch_plus(secs: i64) -> Option<DateTime<Utc>> {
    Utc.timestamp_opt(secs, 0).single()
}

/// Milliseconds after the Unix epoch
pub fn unix_epoch_plus_millis(millis: i64) -> Option<DateTime<Utc>> {
    Utc.timestamp_millis_opt(millis).single()
}

/// Microseconds after the Unix epoch
pub fn unix_epoch_plus_micros(micros: i64) -> Option<DateTime<Utc>> {
    unix_epoch_plus_millis(micros.checked_div(1000)?)
}

/// Seconds after the Cocoa epoch (2001-01-01), a.k.a. Mac absolute time
pub fn cocoa_epoch_plus(secs: i64) -> Option<DateTime<Utc>> {
    unix_epoch_plus(secs.checked_add(COCOA_EPOCH_OFFSET)?)
}

/// Fractional seconds after the Cocoa epoch, as plists and quarantine
/// databases store them
pub fn cocoa_epoch_plus_f64(secs: f64) -> Option<DateTime<Utc>> {
    if !secs.is_finite() {
        return None;
    }
    cocoa_epoch_plus(secs as i64)
}

/// Seconds after the 1601-01-01 Gregorian epoch
pub fn windows_epoch_plus(secs: i64) -> Option<DateTime<Utc>> {
    unix_epoch_plus(secs.checked_sub(WINDOWS_EPOCH_OFFSET)?)
}

/// Render a converted timestamp, or the explicit unconvertible marker
pub fn format_timestamp(timestamp: Option<DateTime<Utc>>) -> String {
    match timestamp {
        Some(ts) => ts.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        None => UNCONVERTIBLE.to_string(),
    }
}
