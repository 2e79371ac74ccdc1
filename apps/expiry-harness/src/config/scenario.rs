//! Scenario configuration: what to select, what to expect, when to enter.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::application::scenario::ScenarioParams;
use crate::domain::contract::{ContractIdentifier, Market, OptionRight, OptionStyle};
use crate::domain::scheduling::{DateRule, TimeRule};
use crate::domain::selection::SelectionCriteria;
use crate::domain::shared::Symbol;

/// Scenario configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    /// Underlying symbol.
    pub underlying: String,
    /// Listing market.
    pub market: Market,
    /// Contract selection criteria.
    pub criteria: SelectionCriteria,
    /// Contract the selection must resolve to.
    pub expected_contract: ExpectedContractConfig,
    /// Date the delisting warning must arrive.
    pub warning_date: NaiveDate,
    /// Date the delisted notice must arrive.
    pub delisting_date: NaiveDate,
    /// When the entry order fires.
    pub entry: EntryScheduleConfig,
    /// Contracts bought at entry.
    pub order_quantity: Decimal,
}

/// Literal description of the expected contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpectedContractConfig {
    /// Strike price.
    pub strike: Decimal,
    /// Call or put.
    pub right: OptionRight,
    /// Exercise style.
    pub style: OptionStyle,
    /// Expiration date.
    pub expiration: NaiveDate,
}

/// Date and time rules for the entry order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryScheduleConfig {
    /// Day rule.
    pub date_rule: DateRule,
    /// Time-of-day rule.
    pub time_rule: TimeRule,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        let params = ScenarioParams::spx_january_2021();
        let expected = &params.expected_contract;
        Self {
            underlying: params.underlying.to_string(),
            market: expected.market(),
            criteria: params.criteria.clone(),
            expected_contract: ExpectedContractConfig {
                strike: expected.strike(),
                right: expected.right(),
                style: expected.style(),
                expiration: expected.expiration(),
            },
            warning_date: params.warning_date,
            delisting_date: params.delisting_date,
            entry: EntryScheduleConfig {
                date_rule: params.entry_date_rule,
                time_rule: params.entry_time_rule,
            },
            order_quantity: params.order_quantity,
        }
    }
}

impl ScenarioConfig {
    /// Build scenario parameters.
    #[must_use]
    pub fn to_params(&self) -> ScenarioParams {
        let underlying = Symbol::new(&self.underlying);
        ScenarioParams {
            expected_contract: ContractIdentifier::new(
                underlying.clone(),
                self.market,
                self.expected_contract.style,
                self.expected_contract.right,
                self.expected_contract.strike,
                self.expected_contract.expiration,
            ),
            underlying,
            criteria: self.criteria.clone(),
            warning_date: self.warning_date,
            delisting_date: self.delisting_date,
            entry_date_rule: self.entry.date_rule,
            entry_time_rule: self.entry.time_rule,
            order_quantity: self.order_quantity,
        }
    }

    pub(super) fn validate(&self) -> Result<(), String> {
        Symbol::new(&self.underlying)
            .validate()
            .map_err(|e| format!("scenario.underlying: {e}"))?;

        if self.order_quantity <= Decimal::ZERO {
            return Err("scenario.order_quantity must be positive".to_string());
        }
        if !self.order_quantity.fract().is_zero() {
            return Err("scenario.order_quantity must be a whole number of contracts".to_string());
        }
        if self.criteria.max_strike <= Decimal::ZERO {
            return Err("scenario.criteria.max_strike must be positive".to_string());
        }
        if !(1..=12).contains(&self.criteria.expiration_month) {
            return Err("scenario.criteria.expiration_month must be between 1 and 12".to_string());
        }
        if self.expected_contract.strike <= Decimal::ZERO {
            return Err("scenario.expected_contract.strike must be positive".to_string());
        }
        if self.delisting_date <= self.warning_date {
            return Err("scenario.delisting_date must be after scenario.warning_date".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_round_trips_into_params() {
        let params = ScenarioConfig::default().to_params();
        assert_eq!(params, ScenarioParams::spx_january_2021());
        assert_eq!(params.criteria.max_strike, Decimal::from(3150));
    }

    #[test]
    fn validation_rejects_bad_quantity() {
        let config = ScenarioConfig {
            order_quantity: Decimal::ZERO,
            ..ScenarioConfig::default()
        };
        assert!(config.validate().unwrap_err().contains("order_quantity"));

        let config = ScenarioConfig {
            order_quantity: Decimal::new(15, 1),
            ..ScenarioConfig::default()
        };
        assert!(config.validate().unwrap_err().contains("whole number"));
    }

    #[test]
    fn order_quantity_reaches_params() {
        let config = ScenarioConfig {
            order_quantity: Decimal::from(2),
            ..ScenarioConfig::default()
        };
        assert!(config.validate().is_ok());
        assert_eq!(config.to_params().order_quantity, Decimal::from(2));
    }

    #[test]
    fn validation_rejects_inverted_notice_dates() {
        let config = ScenarioConfig {
            delisting_date: NaiveDate::from_ymd_opt(2021, 1, 14).unwrap(),
            ..ScenarioConfig::default()
        };
        assert!(config.validate().unwrap_err().contains("delisting_date"));
    }
}
