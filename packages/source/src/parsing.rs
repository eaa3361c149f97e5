//! Field parsing for dataset columns.
//!
//! Every parser returns `None` for unparseable input so the loader can mark
//! the field absent and keep the row.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Date-only layouts accepted in the `date` column, tried in order.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d-%m-%Y", "%d.%m.%Y"];

/// Date-time layouts accepted in the `date` column. The time is discarded.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Parses an incident date, accepting plain dates, naive date-times, and
/// RFC 3339 timestamps.
#[must_use]
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Some(date) = DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
    {
        return Some(date);
    }
    if let Some(dt) = DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
    {
        return Some(dt.date());
    }
    DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive())
}

/// Parses a latitude in decimal degrees. Returns `None` if the value is
/// unparseable, non-finite, or outside -90..=90.
#[must_use]
pub fn parse_latitude(s: &str) -> Option<f64> {
    parse_degrees(s, 90.0)
}

/// Parses a longitude in decimal degrees. Returns `None` if the value is
/// unparseable, non-finite, or outside -180..=180.
#[must_use]
pub fn parse_longitude(s: &str) -> Option<f64> {
    parse_degrees(s, 180.0)
}

fn parse_degrees(s: &str, limit: f64) -> Option<f64> {
    let value = s.trim().parse::<f64>().ok()?;
    (value.is_finite() && (-limit..=limit).contains(&value)).then_some(value)
}
