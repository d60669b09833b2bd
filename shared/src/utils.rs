// Epoch/time helpers shared by the engine's cleaner and time-frame resolver.
use chrono::{DateTime, Utc};

/// Converts fractional epoch seconds to a UTC timestamp. Returns `None` for
/// NaN, infinities and values chrono cannot represent.
pub fn epoch_seconds_to_datetime(secs: f64) -> Option<DateTime<Utc>> {
    if !secs.is_finite() {
        return None;
    }
    let whole = secs.floor();
    let nanos = ((secs - whole) * 1_000_000_000.0).round() as i64;
    // Rounding can push the fraction to a full second.
    let (whole, nanos) = if nanos >= 1_000_000_000 {
        (whole + 1.0, nanos - 1_000_000_000)
    } else {
        (whole, nanos)
    };
    if whole < i64::MIN as f64 || whole > i64::MAX as f64 {
        return None;
    }
    DateTime::from_timestamp(whole as i64, nanos as u32)
}

/// Whole epoch seconds, truncating any sub-second part.
pub fn datetime_to_epoch_seconds(dt: &DateTime<Utc>) -> i64 {
    dt.timestamp()
}

/// Fractional epoch seconds.
pub fn datetime_to_epoch_f64(dt: &DateTime<Utc>) -> f64 {
    dt.timestamp() as f64 + f64::from(dt.timestamp_subsec_nanos()) / 1_000_000_000.0
}
