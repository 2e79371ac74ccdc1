//! Reference simulation engine configuration.

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::domain::contract::{Market, OptionStyle};

/// How in-the-money contracts settle at expiry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SettlementStyle {
    /// Intrinsic value paid in cash (index options).
    #[default]
    Cash,
    /// Underlying delivered at the strike (equity options).
    Physical,
}

/// Simulation configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// First simulated calendar day.
    pub start_date: NaiveDate,
    /// Last simulated calendar day (inclusive).
    pub end_date: NaiveDate,
    /// Exchange-local session open.
    pub market_open: NaiveTime,
    /// Exchange-local session close.
    pub market_close: NaiveTime,
    /// Minutes between ticks.
    pub step_minutes: u32,
    /// Exchange holidays (weekends are always closed).
    pub holidays: Vec<NaiveDate>,
    /// Underlying price used for fills and expiry settlement.
    pub underlying_price: Decimal,
    /// Price at which option market orders fill.
    pub option_price: Decimal,
    /// Shares delivered per contract on physical settlement.
    pub contract_multiplier: Decimal,
    /// Listing market of the chain.
    pub market: Market,
    /// Exercise style of every contract in the chain.
    pub chain_style: OptionStyle,
    /// Listed contracts as OCC tickers.
    pub chain: Vec<String>,
    /// Settlement of in-the-money contracts.
    pub settlement: SettlementStyle,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            start_date: date(2021, 1, 4),
            end_date: date(2021, 1, 29),
            market_open: time(9, 30),
            market_close: time(16, 0),
            step_minutes: 1,
            // MLK day
            holidays: vec![date(2021, 1, 18)],
            underlying_price: dec!(3768.25),
            option_price: dec!(1.20),
            contract_multiplier: dec!(100),
            market: Market::Usa,
            chain_style: OptionStyle::European,
            chain: vec![
                "SPX   210115P03100000".to_string(),
                "SPX   210115P03150000".to_string(),
                "SPX   210115P03200000".to_string(),
            ],
            settlement: SettlementStyle::Cash,
        }
    }
}

impl SimulationConfig {
    pub(super) fn validate(&self) -> Result<(), String> {
        if self.end_date < self.start_date {
            return Err("simulation.end_date must not be before simulation.start_date".to_string());
        }
        if self.market_close <= self.market_open {
            return Err("simulation.market_close must be after simulation.market_open".to_string());
        }
        if self.step_minutes == 0 {
            return Err("simulation.step_minutes must be positive".to_string());
        }
        if self.underlying_price <= Decimal::ZERO {
            return Err("simulation.underlying_price must be positive".to_string());
        }
        if self.option_price < Decimal::ZERO {
            return Err("simulation.option_price must not be negative".to_string());
        }
        if self.contract_multiplier <= Decimal::ZERO {
            return Err("simulation.contract_multiplier must be positive".to_string());
        }
        if self.chain.is_empty() {
            return Err("simulation.chain must list at least one contract".to_string());
        }
        Ok(())
    }
}

#[allow(clippy::expect_used)] // Only called with literal defaults; a bad literal is a bug
fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("default date literal is valid")
}

#[allow(clippy::expect_used)] // Only called with literal defaults; a bad literal is a bug
fn time(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).expect("default time literal is valid")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_january_2021() {
        let config = SimulationConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.chain.len(), 3);
        assert_eq!(config.settlement, SettlementStyle::Cash);
        assert!(config.holidays.contains(&date(2021, 1, 18)));
    }

    #[test]
    #[should_panic(expected = "default date literal is valid")]
    fn bad_date_literal_panics() {
        let _ = date(2021, 2, 30);
    }

    #[test]
    #[should_panic(expected = "default time literal is valid")]
    fn bad_time_literal_panics() {
        let _ = time(24, 30);
    }

    #[test]
    fn validation_rejects_inverted_session() {
        let config = SimulationConfig {
            market_close: time(9, 0),
            ..SimulationConfig::default()
        };
        assert!(config.validate().unwrap_err().contains("market_close"));
    }
}
