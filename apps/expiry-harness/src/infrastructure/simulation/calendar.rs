//! Trading calendar and schedule rule resolution.

use std::collections::BTreeSet;

use chrono::{Datelike, Duration, NaiveDate, NaiveTime, Weekday};

use crate::domain::scheduling::{DateRule, TimeRule};
use crate::domain::shared::Timestamp;

/// Weekday sessions minus holidays, with fixed open and close times.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TradingCalendar {
    holidays: BTreeSet<NaiveDate>,
    open: NaiveTime,
    close: NaiveTime,
}

impl TradingCalendar {
    /// Create a calendar.
    #[must_use]
    pub fn new(
        holidays: impl IntoIterator<Item = NaiveDate>,
        open: NaiveTime,
        close: NaiveTime,
    ) -> Self {
        Self {
            holidays: holidays.into_iter().collect(),
            open,
            close,
        }
    }

    /// Session open.
    #[must_use]
    pub const fn open(&self) -> NaiveTime {
        self.open
    }

    /// Session close.
    #[must_use]
    pub const fn close(&self) -> NaiveTime {
        self.close
    }

    /// Check if the exchange trades on `date`.
    #[must_use]
    pub fn is_trading_day(&self, date: NaiveDate) -> bool {
        !matches!(date.weekday(), Weekday::Sat | Weekday::Sun) && !self.holidays.contains(&date)
    }

    /// First trading day strictly after `date`.
    #[must_use]
    pub fn next_trading_day(&self, date: NaiveDate) -> Option<NaiveDate> {
        date.iter_days().skip(1).take(14).find(|d| self.is_trading_day(*d))
    }

    /// Tick times for one session, from the first step after the open up
    /// to and including the close.
    #[must_use]
    pub fn session_ticks(&self, date: NaiveDate, step_minutes: u32) -> Vec<Timestamp> {
        if !self.is_trading_day(date) || step_minutes == 0 {
            return Vec::new();
        }
        let step = Duration::minutes(i64::from(step_minutes));
        let open = date.and_time(self.open);
        let close = date.and_time(self.close);

        let mut ticks = Vec::new();
        let mut t = open + step;
        while t <= close {
            ticks.push(Timestamp::new(t));
            t += step;
        }
        ticks
    }

    /// Resolve scheduling rules relative to the first day of the run.
    ///
    /// Returns `None` when the date rule lands on a day the exchange is
    /// closed or the time falls outside the session.
    #[must_use]
    pub fn resolve(
        &self,
        date_rule: DateRule,
        time_rule: TimeRule,
        run_start: NaiveDate,
    ) -> Option<Timestamp> {
        let date = match date_rule {
            DateRule::On { date } => Some(date).filter(|d| self.is_trading_day(*d))?,
            DateRule::Tomorrow => self.next_trading_day(run_start)?,
        };
        let time = time_rule.resolve(self.open, self.close);
        (self.open..=self.close)
            .contains(&time)
            .then(|| Timestamp::at(date, time))
    }
}
