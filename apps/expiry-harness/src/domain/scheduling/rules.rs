//! Date and time rules for scheduled actions.
//!
//! Rules are intents. Resolving them against a trading calendar is the
//! scheduler's job.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which trading day an action fires on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DateRule {
    /// A fixed calendar date.
    #[serde(rename = "ON_DATE")]
    On {
        /// Date to fire on.
        date: NaiveDate,
    },
    /// The first trading day after the run starts.
    Tomorrow,
}

impl DateRule {
    /// Fire on a fixed date.
    #[must_use]
    pub const fn on(date: NaiveDate) -> Self {
        Self::On { date }
    }
}

impl fmt::Display for DateRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::On { date } => write!(f, "on {date}"),
            Self::Tomorrow => write!(f, "tomorrow"),
        }
    }
}

/// When during the trading day an action fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TimeRule {
    /// A fixed exchange-local time.
    At {
        /// Time to fire at.
        time: NaiveTime,
    },
    /// A number of minutes after the open.
    AfterMarketOpen {
        /// Offset from the open.
        minutes: u32,
    },
    /// A number of minutes before the close.
    BeforeMarketClose {
        /// Offset from the close.
        minutes: u32,
    },
}

impl TimeRule {
    /// Fire at a fixed time.
    #[must_use]
    pub const fn at(time: NaiveTime) -> Self {
        Self::At { time }
    }

    /// Fire `minutes` after the open.
    #[must_use]
    pub const fn after_market_open(minutes: u32) -> Self {
        Self::AfterMarketOpen { minutes }
    }

    /// Resolve against a session's open and close.
    #[must_use]
    pub fn resolve(&self, open: NaiveTime, close: NaiveTime) -> NaiveTime {
        match *self {
            Self::At { time } => time,
            Self::AfterMarketOpen { minutes } => {
                open + chrono::Duration::minutes(i64::from(minutes))
            }
            Self::BeforeMarketClose { minutes } => {
                close - chrono::Duration::minutes(i64::from(minutes))
            }
        }
    }
}

impl fmt::Display for TimeRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::At { time } => write!(f, "at {time}"),
            Self::AfterMarketOpen { minutes } => write!(f, "{minutes}m after open"),
            Self::BeforeMarketClose { minutes } => write!(f, "{minutes}m before close"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn hm(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test_case(TimeRule::at(hm(10, 0)), hm(10, 0) ; "fixed time")]
    #[test_case(TimeRule::after_market_open(1), hm(9, 31) ; "after open")]
    #[test_case(TimeRule::BeforeMarketClose { minutes: 15 }, hm(15, 45) ; "before close")]
    fn resolves_within_session(rule: TimeRule, expected: NaiveTime) {
        assert_eq!(rule.resolve(hm(9, 30), hm(16, 0)), expected);
    }

    #[test]
    fn yaml_shape() {
        let rule: DateRule = serde_yaml_bw::from_str("type: ON_DATE\ndate: 2021-01-05\n").unwrap();
        assert_eq!(rule, DateRule::on(NaiveDate::from_ymd_opt(2021, 1, 5).unwrap()));

        let rule: TimeRule =
            serde_yaml_bw::from_str("type: AFTER_MARKET_OPEN\nminutes: 1\n").unwrap();
        assert_eq!(rule, TimeRule::after_market_open(1));

        let rule: DateRule = serde_yaml_bw::from_str("type: TOMORROW\n").unwrap();
        assert_eq!(rule, DateRule::Tomorrow);
    }

    #[test]
    fn display() {
        assert_eq!(TimeRule::after_market_open(1).to_string(), "1m after open");
        assert_eq!(DateRule::Tomorrow.to_string(), "tomorrow");
    }
}
