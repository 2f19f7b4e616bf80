//! # Temporal Types — UTC Timestamps
//!
//! Defines `UtcTimestamp`, the normalized form produced by the
//! `utcdatetime` coercion: ISO8601 with `Z` suffix, truncated to seconds.
//!
//! Incoming data is loosely formatted, so parsing is lenient:
//!
//! - RFC 3339 with any offset is converted to UTC.
//! - A naive `YYYY-MM-DDTHH:MM:SS` (or with a space separator) is assumed UTC.
//! - A bare `YYYY-MM-DD` is midnight UTC.
//!
//! The rendered form is itself accepted by the parser and renders back to
//! the same string, which keeps the coercion idempotent.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoercionError;

const TARGET: &str = "utcdatetime";

/// A UTC timestamp, truncated to seconds precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UtcTimestamp(DateTime<Utc>);

impl UtcTimestamp {
    /// Create a timestamp from a `chrono::DateTime<Utc>`, truncating sub-seconds.
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self(truncate_to_seconds(dt))
    }

    /// Parse any of the accepted textual forms.
    ///
    /// # Errors
    ///
    /// Returns `CoercionError::Unparseable` if the text matches none of them.
    pub fn parse(s: &str) -> Result<Self, CoercionError> {
        let s = s.trim();

        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Ok(Self::from_utc(dt.with_timezone(&Utc)));
        }

        for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
            if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
                return Ok(Self::from_utc(naive.and_utc()));
            }
        }

        match NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            Ok(date) => match date.and_hms_opt(0, 0, 0) {
                Some(naive) => Ok(Self(naive.and_utc())),
                None => Err(unparseable(s, "date has no midnight")),
            },
            Err(e) => Err(unparseable(s, &e.to_string())),
        }
    }

    /// Access the inner `DateTime<Utc>`.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Render as ISO8601 with Z suffix (e.g., `2026-01-15T12:00:00Z`).
    pub fn to_iso8601(&self) -> String {
        self.0.format("%Y-%m-%dT%H:%M:%SZ").to_string()
    }
}

impl std::fmt::Display for UtcTimestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_iso8601())
    }
}

fn unparseable(input: &str, reason: &str) -> CoercionError {
    CoercionError::Unparseable {
        target: TARGET,
        input: input.to_string(),
        reason: reason.to_string(),
    }
}

/// Truncate a `DateTime<Utc>` to seconds precision (discard nanoseconds).
fn truncate_to_seconds(dt: DateTime<Utc>) -> DateTime<Utc> {
    dt.with_nanosecond(0).unwrap_or(dt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_from_utc_truncates() {
        let dt = Utc.with_ymd_and_hms(2026, 1, 15, 12, 30, 45).unwrap();
        let dt_with_nanos = dt.with_nanosecond(123_456_789).unwrap();
        let ts = UtcTimestamp::from_utc(dt_with_nanos);
        assert_eq!(ts.to_iso8601(), "2026-01-15T12:30:45Z");
    }

    #[test]
    fn test_parse_z_suffix() {
        let ts = UtcTimestamp::parse("2026-01-15T12:00:00Z").unwrap();
        assert_eq!(ts.to_iso8601(), "2026-01-15T12:00:00Z");
    }

    #[test]
    fn test_parse_converts_offset() {
        let ts = UtcTimestamp::parse("2026-01-15T17:00:00+05:00").unwrap();
        assert_eq!(ts.to_iso8601(), "2026-01-15T12:00:00Z");
    }

    #[test]
    fn test_parse_naive_assumed_utc() {
        let ts = UtcTimestamp::parse("2026-01-15T08:15:00").unwrap();
        assert_eq!(ts.to_iso8601(), "2026-01-15T08:15:00Z");
        let ts = UtcTimestamp::parse("2026-01-15 08:15:00.250").unwrap();
        assert_eq!(ts.to_iso8601(), "2026-01-15T08:15:00Z");
    }

    #[test]
    fn test_parse_date_only() {
        let ts = UtcTimestamp::parse("2026-03-01").unwrap();
        assert_eq!(ts.to_iso8601(), "2026-03-01T00:00:00Z");
    }

    #[test]
    fn test_parse_rendered_form_is_stable() {
        let once = UtcTimestamp::parse("2026-01-15T17:00:00.999+05:00").unwrap();
        let twice = UtcTimestamp::parse(&once.to_iso8601()).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_parse_invalid() {
        assert!(UtcTimestamp::parse("not-a-date").is_err());
        assert!(UtcTimestamp::parse("").is_err());
        assert!(UtcTimestamp::parse("2026-13-45").is_err());
    }

    #[test]
    fn test_display_matches_iso8601() {
        let dt = Utc.with_ymd_and_hms(2026, 6, 30, 23, 59, 59).unwrap();
        let ts = UtcTimestamp::from_utc(dt);
        assert_eq!(format!("{ts}"), ts.to_iso8601());
    }
}
