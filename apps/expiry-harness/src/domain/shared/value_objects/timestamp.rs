//! Timestamp value object for simulated exchange time.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A point on the simulated timeline, in exchange-local time.
///
/// Backtests run on the exchange calendar, so timestamps carry no offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(NaiveDateTime);

impl Timestamp {
    /// Create a new Timestamp from a NaiveDateTime.
    #[must_use]
    pub const fn new(dt: NaiveDateTime) -> Self {
        Self(dt)
    }

    /// Combine a calendar date with a time of day.
    #[must_use]
    pub const fn at(date: NaiveDate, time: NaiveTime) -> Self {
        Self(NaiveDateTime::new(date, time))
    }

    /// Midnight at the start of `date`.
    #[must_use]
    pub const fn start_of_day(date: NaiveDate) -> Self {
        Self::at(date, NaiveTime::MIN)
    }

    /// Parse from `YYYY-MM-DDTHH:MM:SS` or `YYYY-MM-DD HH:MM:SS`.
    ///
    /// # Errors
    ///
    /// Returns error if the string is not a valid timestamp.
    pub fn parse(s: &str) -> Result<Self, chrono::ParseError> {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
            .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S"))
            .map(Self)
    }

    /// Get the inner NaiveDateTime.
    #[must_use]
    pub const fn as_datetime(&self) -> NaiveDateTime {
        self.0
    }

    /// Calendar date of this timestamp.
    #[must_use]
    pub const fn date(&self) -> NaiveDate {
        self.0.date()
    }

    /// Time of day of this timestamp.
    #[must_use]
    pub const fn time(&self) -> NaiveTime {
        self.0.time()
    }

    /// Calculate duration since another timestamp.
    #[must_use]
    pub fn duration_since(&self, other: Self) -> chrono::Duration {
        self.0 - other.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%dT%H:%M:%S"))
    }
}

impl From<NaiveDateTime> for Timestamp {
    fn from(dt: NaiveDateTime) -> Self {
        Self(dt)
    }
}

impl From<Timestamp> for NaiveDateTime {
    fn from(ts: Timestamp) -> Self {
        ts.0
    }
}
