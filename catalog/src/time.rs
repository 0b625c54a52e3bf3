//! Timestamp parsing and ISO-8601 rendering.

use chrono::{DateTime, FixedOffset, NaiveDateTime, SecondsFormat};

/// Naive forms accepted from the dataset store; interpreted as UTC.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
];

/// Parses a stored timestamp.
///
/// Accepts RFC 3339 (`2020-06-01T00:00:00Z`, `2020-06-01T02:00:00+02:00`) and
/// offset-less SQL forms (`2020-06-01 00:00:00`), which are taken as UTC.
///
/// # Errors
///
/// Returns the RFC 3339 parse error when no accepted form matches.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<FixedOffset>, chrono::ParseError> {
    let raw = raw.trim();
    match DateTime::parse_from_rfc3339(raw) {
        Ok(ts) => Ok(ts),
        Err(err) => NAIVE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
            .map(|naive| DateTime::<FixedOffset>::from(naive.and_utc()))
            .ok_or(err),
    }
}

/// Renders `ts` as `YYYY-MM-DDTHH:MM:SS±HH:MM`, using `Z` for a zero offset.
#[must_use]
pub fn to_iso8601(ts: &DateTime<FixedOffset>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utc_keeps_zulu_designator() {
        let ts = parse_timestamp("2020-06-01T00:00:00Z").expect("valid timestamp");
        assert_eq!(to_iso8601(&ts), "2020-06-01T00:00:00Z");
    }

    #[test]
    fn offsets_are_preserved() {
        let ts = parse_timestamp("2020-06-01T02:30:00+02:00").expect("valid timestamp");
        assert_eq!(to_iso8601(&ts), "2020-06-01T02:30:00+02:00");
    }

    #[test]
    fn sql_timestamps_are_utc() {
        let ts = parse_timestamp("2013-05-14 09:12:45").expect("valid timestamp");
        assert_eq!(to_iso8601(&ts), "2013-05-14T09:12:45Z");
    }

    #[test]
    fn fractional_seconds_are_dropped() {
        let ts = parse_timestamp("2013-05-14 09:12:45.123456").expect("valid timestamp");
        assert_eq!(to_iso8601(&ts), "2013-05-14T09:12:45Z");
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(parse_timestamp("last tuesday").is_err());
        assert!(parse_timestamp("").is_err());
    }
}
