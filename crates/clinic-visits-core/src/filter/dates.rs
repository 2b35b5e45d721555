//! Date resolution for records with inconsistent date formats.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::models::{is_present, VisitRecord};

/// Date-time layouts accepted for the timestamp field.
const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
    "%d-%m-%Y %H:%M:%S",
];

/// Best available date for a record.
///
/// The timestamp field is tried first, as a full date-time and then as a bare
/// date at midnight, then the date field as a date-only value. Returns `None`
/// when neither field parses.
pub fn resolve_date(record: &VisitRecord) -> Option<NaiveDateTime> {
    parse_date_time(&record.timestamp)
        .or_else(|| midnight(&record.timestamp))
        .or_else(|| midnight(&record.date))
}

fn midnight(value: &str) -> Option<NaiveDateTime> {
    parse_date_only(value).and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Parse a full date-time, keeping the wall-clock time of any given offset.
pub fn parse_date_time(value: &str) -> Option<NaiveDateTime> {
    if !is_present(value) {
        return None;
    }
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_local());
    }

    DATE_TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
}

/// Parse a date-only value split on `-` or `/`.
///
/// Year-first or year-last is decided by which component has four digits.
/// Any time part after `T` or a space is ignored.
pub fn parse_date_only(value: &str) -> Option<NaiveDate> {
    if !is_present(value) {
        return None;
    }
    let date_part = value
        .trim()
        .split(|ch: char| ch == 'T' || ch == ' ')
        .next()
        .unwrap_or_default();

    let parts: Vec<&str> = date_part.split(|ch: char| ch == '-' || ch == '/').collect();
    let [a, b, c] = parts.as_slice() else {
        return None;
    };

    let (year, month, day) = if a.len() == 4 {
        (a, b, c)
    } else if c.len() == 4 {
        (c, b, a)
    } else {
        return None;
    };

    NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, day.parse().ok()?)
}
