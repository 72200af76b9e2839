//! Date interval arithmetic for wardrobe analytics.
//!
//! Dates arrive as ISO-8601 strings from storage. Parsing never fails
//! outward: an unreadable date yields a zero-day interval so analytics always
//! have a displayable number.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Parse an ISO-8601 date or timestamp.
///
/// Accepts RFC 3339 (`2025-03-01T10:00:00Z`, with offset or fractional
/// seconds), naive timestamps (`2025-03-01T10:00:00`, read as UTC), and plain
/// calendar dates (`2025-03-01`, read as UTC midnight).
pub fn parse_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }

    if let Ok(parsed) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(parsed.and_utc());
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc())
}

/// Whole days elapsed from `date` to `now`, floored. Malformed input gives 0.
pub fn days_since(date: &str, now: DateTime<Utc>) -> i64 {
    match parse_date(date) {
        Some(start) => floor_days(start, now),
        None => 0,
    }
}

/// Whole days from `start` to `end`, floored. Malformed input gives 0.
pub fn days_between(start: &str, end: &str) -> i64 {
    match (parse_date(start), parse_date(end)) {
        (Some(start), Some(end)) => floor_days(start, end),
        _ => 0,
    }
}

fn floor_days(start: DateTime<Utc>, end: DateTime<Utc>) -> i64 {
    (end - start).num_milliseconds().div_euclid(MILLIS_PER_DAY)
}
