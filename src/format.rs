//! Display formatting for percentages and timestamps
//!
//! Every formatter is total: absent or unparseable input yields
//! [`PLACEHOLDER`] instead of an error.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};

/// Shown wherever a value is missing or unusable
pub const PLACEHOLDER: &str = "–";

const LONG_DATE_FORMAT: &str = "%b %d, %H:%M";
const SHORT_DATE_FORMAT: &str = "%b %d";

/// ISO-8601 local date-time forms without an offset
const NAIVE_DATE_TIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// Format a percentage with three decimal places
pub fn format_percent(value: Option<f64>) -> String {
    match value {
        Some(v) if !v.is_nan() => format!("{:.3}%", v),
        _ => PLACEHOLDER.to_string(),
    }
}

/// Month, day, hour and minute in the local time zone
pub fn format_date(value: Option<&str>) -> String {
    format_date_in(value, &Local)
}

pub fn format_date_in<Tz: TimeZone>(value: Option<&str>, tz: &Tz) -> String {
    match value.and_then(|v| parse_wall_time(v, tz)) {
        Some(wall) => wall.format(LONG_DATE_FORMAT).to_string(),
        None => PLACEHOLDER.to_string(),
    }
}

/// Month and day in the local time zone
pub fn format_short_date(value: Option<&str>) -> String {
    format_short_date_in(value, &Local)
}

pub fn format_short_date_in<Tz: TimeZone>(value: Option<&str>, tz: &Tz) -> String {
    short_date_in(value, tz).unwrap_or_else(|| PLACEHOLDER.to_string())
}

/// Month and day, or `None` when the value cannot be parsed
pub fn short_date_in<Tz: TimeZone>(value: Option<&str>, tz: &Tz) -> Option<String> {
    value
        .and_then(|v| parse_wall_time(v, tz))
        .map(|wall| wall.format(SHORT_DATE_FORMAT).to_string())
}

/// Resolve a timestamp to wall-clock time in `tz`.
///
/// Accepts RFC 3339 timestamps, `Z` timestamps without seconds, offset-less
/// date-times and bare `YYYY-MM-DD` dates. Offset-less values and bare dates
/// are already wall time and are not shifted between zones.
fn parse_wall_time<Tz: TimeZone>(value: &str, tz: &Tz) -> Option<NaiveDateTime> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(tz).naive_local());
    }

    if let Some(utc) = value.strip_suffix('Z') {
        return parse_naive_date_time(utc)
            .map(|naive| Utc.from_utc_datetime(&naive).with_timezone(tz).naive_local());
    }

    if let Some(naive) = parse_naive_date_time(value) {
        return Some(naive);
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

fn parse_naive_date_time(value: &str) -> Option<NaiveDateTime> {
    NAIVE_DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(Some(99.982)), "99.982%");
        assert_eq!(format_percent(Some(100.0)), "100.000%");
        assert_eq!(format_percent(None), PLACEHOLDER);
        assert_eq!(format_percent(Some(f64::NAN)), PLACEHOLDER);
    }

    #[test]
    fn test_format_date() {
        assert_eq!(
            format_date_in(Some("2026-01-15T09:30:00Z"), &Utc),
            "Jan 15, 09:30"
        );

        let east = FixedOffset::east_opt(2 * 3600).unwrap();
        assert_eq!(
            format_date_in(Some("2026-01-15T23:30:00Z"), &east),
            "Jan 16, 01:30"
        );
    }

    #[test]
    fn test_format_date_without_offset_or_seconds() {
        assert_eq!(
            format_date_in(Some("2026-01-15T09:30:00"), &Utc),
            "Jan 15, 09:30"
        );
        assert_eq!(
            format_date_in(Some("2026-01-15T09:30:00.250"), &Utc),
            "Jan 15, 09:30"
        );
        assert_eq!(format_date_in(Some("2026-01-15T09:30"), &Utc), "Jan 15, 09:30");
        assert_eq!(
            format_short_date_in(Some("2026-01-15T09:30Z"), &Utc),
            "Jan 15"
        );

        // Offset-less values are wall time; `Z` values are shifted
        let east = FixedOffset::east_opt(2 * 3600).unwrap();
        assert_eq!(
            format_date_in(Some("2026-01-15T23:30:00"), &east),
            "Jan 15, 23:30"
        );
        assert_eq!(format_date_in(Some("2026-01-15T23:30Z"), &east), "Jan 16, 01:30");
    }

    #[test]
    fn test_format_short_date() {
        assert_eq!(
            format_short_date_in(Some("2026-01-08T14:10:00Z"), &Utc),
            "Jan 08"
        );
        assert_eq!(format_short_date_in(Some("2026-03-02"), &Utc), "Mar 02");
    }

    #[test]
    fn test_invalid_dates_degrade_to_placeholder() {
        assert_eq!(format_date(None), PLACEHOLDER);
        assert_eq!(format_date(Some("")), PLACEHOLDER);
        assert_eq!(format_date(Some("yesterday")), PLACEHOLDER);
        assert_eq!(format_short_date(Some("2026-13-40")), PLACEHOLDER);
    }
}
