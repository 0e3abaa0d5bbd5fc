//! Timestamp value object for immutable points in time.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Immutable point in time, always UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Creates a timestamp for the current moment.
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Creates a timestamp from Unix seconds, as sent by payment providers.
    ///
    /// Returns `None` when the value is outside chrono's representable range.
    pub fn from_unix_secs(secs: i64) -> Option<Self> {
        Utc.timestamp_opt(secs, 0).single().map(Self)
    }

    /// Returns the inner DateTime.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Returns the timestamp as Unix seconds.
    pub fn as_unix_secs(&self) -> i64 {
        self.0.timestamp()
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn timestamp_now_creates_current_time() {
        let before = Utc::now();
        let ts = Timestamp::now();
        let after = Utc::now();

        assert!(ts.as_datetime() >= &before);
        assert!(ts.as_datetime() <= &after);
    }

    #[test]
    fn timestamp_serializes_as_rfc3339() {
        let ts = Timestamp::from_unix_secs(1705276800).unwrap();
        let json = serde_json::to_string(&ts).unwrap();
        assert!(json.contains("2024-01-15T00:00:00"));
    }

    #[test]
    fn timestamp_from_unix_secs_works() {
        let ts = Timestamp::from_unix_secs(1705276800).unwrap();
        assert_eq!(ts.as_datetime().year(), 2024);
        assert_eq!(ts.as_datetime().month(), 1);
        assert_eq!(ts.as_datetime().day(), 15);
        assert_eq!(ts.as_unix_secs(), 1705276800);
    }

    #[test]
    fn timestamp_from_out_of_range_secs_is_none() {
        assert!(Timestamp::from_unix_secs(i64::MAX).is_none());
    }
}
