use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::types::Timestamp;

/// Naive date-time layouts accepted for publication timestamps.
const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Offset-carrying layouts; the offset is dropped and the wall-clock time kept.
const OFFSET_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f %:z", "%Y-%m-%d %H:%M:%S%.f %z"];

/// Parse a publication timestamp from its textual form.
///
/// Accepts `YYYY-MM-DD HH:MM:SS[.f]` (space or `T` separator, seconds
/// optional), RFC 3339, `YYYY-MM-DD HH:MM:SS +HH:MM`, and bare `YYYY-MM-DD`
/// (midnight). Offsets are discarded rather than converted. Returns `None`
/// when no layout matches.
pub fn parse_timestamp(value: &str) -> Option<Timestamp> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.naive_local());
    }
    for format in OFFSET_FORMATS {
        if let Ok(parsed) = DateTime::parse_from_str(value, format) {
            return Some(parsed.naive_local());
        }
    }
    for format in NAIVE_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(value, format) {
            return Some(parsed);
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

/// Interpret an integer as milliseconds since the Unix epoch.
pub fn timestamp_from_epoch_millis(millis: i64) -> Option<Timestamp> {
    DateTime::from_timestamp_millis(millis).map(|utc| utc.naive_utc())
}
