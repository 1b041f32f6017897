//! ISO-8601 date recognition.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;

// Cheap shape check before handing the string to chrono.
static ISO_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}(?:$|[T ]\d{2}:\d{2})").unwrap());

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parse an ISO-8601 date or date-time, keeping only the calendar day.
///
/// Offsets are dropped without conversion: the day is the one written in the string.
pub fn parse_iso_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if !ISO_PREFIX.is_match(value) {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(date);
    }
    for format in DATETIME_FORMATS {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(value, format) {
            return Some(datetime.date());
        }
    }
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.naive_local().date())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_plain_date() {
        assert_eq!(parse_iso_date("2021-05-17"), Some(day(2021, 5, 17)));
    }

    #[test]
    fn test_datetime_variants() {
        assert_eq!(parse_iso_date("2021-05-17T08:30:00"), Some(day(2021, 5, 17)));
        assert_eq!(parse_iso_date("2021-05-17 08:30:00.123"), Some(day(2021, 5, 17)));
        assert_eq!(parse_iso_date("2021-05-17T23:30:00+05:00"), Some(day(2021, 5, 17)));
        assert_eq!(parse_iso_date("2021-05-17T23:30:00Z"), Some(day(2021, 5, 17)));
    }

    #[test]
    fn test_rejects_non_iso() {
        assert_eq!(parse_iso_date("17/05/2021"), None);
        assert_eq!(parse_iso_date("2021-13-01"), None);
        assert_eq!(parse_iso_date("POPC bilayer"), None);
        assert_eq!(parse_iso_date("2021"), None);
    }
}
