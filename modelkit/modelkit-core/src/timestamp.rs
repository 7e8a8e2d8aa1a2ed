//! Millisecond-precision instant used by the `Timestamp` scalar kind.

use std::fmt;

use chrono::{DateTime, NaiveDateTime, Utc};

/// Default pattern for display and text literals.
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Milliseconds since the Unix epoch, interpreted in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Timestamp(i64);

impl Timestamp {
    pub const fn from_millis(millis: i64) -> Self {
        Self(millis)
    }

    pub const fn millis(self) -> i64 {
        self.0
    }

    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(dt.timestamp_millis())
    }

    /// `None` when the instant is outside chrono's representable range.
    pub fn to_datetime(self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.0)
    }

    /// Format with a chrono pattern; instants chrono cannot represent fall
    /// back to the raw millisecond count.
    pub fn format(self, pattern: &str) -> String {
        match self.to_datetime() {
            Some(dt) => dt.format(pattern).to_string(),
            None => self.0.to_string(),
        }
    }

    pub fn parse(text: &str, pattern: &str) -> Result<Self, chrono::ParseError> {
        let naive = NaiveDateTime::parse_from_str(text, pattern)?;
        Ok(Self(naive.and_utc().timestamp_millis()))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format(DEFAULT_TIMESTAMP_FORMAT))
    }
}
