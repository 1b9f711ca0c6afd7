//! Timestamp value object for immutable points in time.

use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ValidationError;

/// Wire format used for every timestamp the API emits.
pub const API_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6fZ";

/// Immutable point in time, always UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Creates a timestamp for the current moment.
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Creates a timestamp from a DateTime<Utc>.
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    /// Returns the inner DateTime.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Checks if this timestamp is after another.
    pub fn is_after(&self, other: &Timestamp) -> bool {
        self.0 > other.0
    }

    /// Creates a new timestamp by subtracting the specified number of days.
    pub fn minus_days(&self, days: i64) -> Self {
        Self(self.0 - Duration::days(days))
    }

    /// Formats the timestamp the way API responses expect it.
    pub fn to_api_string(&self) -> String {
        self.0.format(API_DATETIME_FORMAT).to_string()
    }

    /// Parses a client supplied timestamp.
    ///
    /// Accepts RFC 3339 and the `YYYY-MM-DDTHH:MM:SS[.ffffff]Z` form used by
    /// exported services.
    pub fn parse_api(value: &str) -> Result<Self, ValidationError> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
            return Ok(Self(dt.with_timezone(&Utc)));
        }
        for format in [API_DATETIME_FORMAT, "%Y-%m-%dT%H:%M:%SZ"] {
            if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
                return Ok(Self(naive.and_utc()));
            }
        }
        Err(ValidationError::invalid_format(
            "timestamp",
            format!("'{}' is not a valid timestamp", value),
        ))
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn api_string_has_microseconds_and_zulu_suffix() {
        let ts = Timestamp::from_datetime(Utc.with_ymd_and_hms(2015, 6, 1, 12, 30, 5).unwrap());
        assert_eq!(ts.to_api_string(), "2015-06-01T12:30:05.000000Z");
    }

    #[test]
    fn parse_api_accepts_exported_formats() {
        let short = Timestamp::parse_api("2014-12-23T14:46:22Z").unwrap();
        let long = Timestamp::parse_api("2014-12-23T14:46:22.000000Z").unwrap();
        let rfc = Timestamp::parse_api("2014-12-23T14:46:22+00:00").unwrap();
        assert_eq!(short, long);
        assert_eq!(short, rfc);
    }

    #[test]
    fn parse_api_rejects_garbage() {
        assert!(Timestamp::parse_api("yesterday").is_err());
    }

    #[test]
    fn minus_days_moves_backwards() {
        let now = Timestamp::now();
        let week_ago = now.minus_days(7);
        assert!(now.is_after(&week_ago));
    }
}
