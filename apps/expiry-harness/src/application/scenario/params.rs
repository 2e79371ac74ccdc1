//! Parameters of the OTM expiry scenario.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::domain::contract::{ContractIdentifier, OptionStyle};
use crate::domain::scheduling::{DateRule, TimeRule};
use crate::domain::selection::SelectionCriteria;
use crate::domain::shared::Symbol;

/// Everything the OTM expiry scenario needs to know up front.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioParams {
    /// Underlying whose chain is searched.
    pub underlying: Symbol,
    /// Contract selection criteria.
    pub criteria: SelectionCriteria,
    /// Contract the selection must produce, built from literals.
    pub expected_contract: ContractIdentifier,
    /// Date the delisting warning must arrive.
    pub warning_date: NaiveDate,
    /// Date the delisted notice must arrive.
    pub delisting_date: NaiveDate,
    /// Day the entry order fires.
    pub entry_date_rule: DateRule,
    /// Time the entry order fires.
    pub entry_time_rule: TimeRule,
    /// Contracts bought at entry.
    pub order_quantity: Decimal,
}

impl ScenarioParams {
    /// January 2021 SPX weekly put that expires worthless.
    ///
    /// Put with strike at or below 3150, expiring 2021-01; the chain is
    /// expected to resolve to the European 3150 put expiring 2021-01-15.
    #[must_use]
    #[allow(clippy::expect_used)] // Literal dates; a bad literal is a bug
    pub fn spx_january_2021() -> Self {
        let expiry = NaiveDate::from_ymd_opt(2021, 1, 15).expect("expiry literal is valid");
        Self {
            underlying: Symbol::new("SPX"),
            criteria: SelectionCriteria::put_at_or_below(dec!(3150), 2021, 1),
            expected_contract: ContractIdentifier::european_put("SPX", dec!(3150), expiry),
            warning_date: expiry,
            delisting_date: expiry.succ_opt().expect("expiry is not the last representable date"),
            entry_date_rule: DateRule::Tomorrow,
            entry_time_rule: TimeRule::after_market_open(1),
            order_quantity: Decimal::ONE,
        }
    }

    /// Exercise style of the expected contract.
    #[must_use]
    pub const fn expected_style(&self) -> OptionStyle {
        self.expected_contract.style()
    }
}

impl Default for ScenarioParams {
    fn default() -> Self {
        Self::spx_january_2021()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spx_defaults() {
        let params = ScenarioParams::default();
        assert_eq!(params.expected_contract.occ_ticker(), "SPX   210115P03150000");
        assert_eq!(params.warning_date.to_string(), "2021-01-15");
        assert_eq!(params.delisting_date.to_string(), "2021-01-16");
        assert_eq!(params.expected_style(), OptionStyle::European);
        assert_eq!(params.order_quantity, Decimal::ONE);
    }
}
