//! OCC ticker rendering and parsing.
//!
//! OCC layout: `{ROOT padded to 6}{YYMMDD}{C|P}{strike × 1000, 8 digits}`,
//! e.g. `SPX   210115P03150000`. Style and market are not encoded, so parsing
//! takes them from the caller.

use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use super::value_objects::{ContractIdentifier, Market, OptionRight, OptionStyle};
use crate::domain::shared::{DomainError, MAX_ROOT_LEN, Symbol};

/// Largest strike representable in the 8-digit OCC strike field.
const MAX_STRIKE_MILLIS: u64 = 99_999_999;

#[allow(clippy::expect_used)] // Pattern is a compile-time constant
fn occ_regex() -> &'static Regex {
    static OCC_REGEX: OnceLock<Regex> = OnceLock::new();
    OCC_REGEX.get_or_init(|| {
        Regex::new(r"^([A-Z0-9]{1,6})\s*(\d{6})([CP])(\d{8})$").expect("OCC regex is valid")
    })
}

impl ContractIdentifier {
    /// Render the OCC ticker for this contract.
    #[must_use]
    pub fn occ_ticker(&self) -> String {
        let millis = (self.strike() * Decimal::ONE_THOUSAND).trunc();
        let strike_field = millis
            .to_u64()
            .filter(|m| *m <= MAX_STRIKE_MILLIS)
            .map_or_else(|| millis.to_string(), |m| format!("{m:08}"));

        format!(
            "{:<width$}{}{}{}",
            self.underlying().as_str(),
            self.expiration().format("%y%m%d"),
            self.right().occ_code(),
            strike_field,
            width = MAX_ROOT_LEN,
        )
    }

    /// Parse an OCC ticker.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidTicker` if the ticker does not follow the
    /// OCC layout or encodes an impossible date.
    pub fn from_occ(ticker: &str, market: Market, style: OptionStyle) -> Result<Self, DomainError> {
        let normalized = ticker.trim().to_uppercase();
        let invalid = |reason: &str| DomainError::InvalidTicker {
            ticker: ticker.to_string(),
            reason: reason.to_string(),
        };

        let caps = occ_regex()
            .captures(&normalized)
            .ok_or_else(|| invalid("does not match OCC layout"))?;

        let (Some(root), Some(date), Some(right), Some(strike)) =
            (caps.get(1), caps.get(2), caps.get(3), caps.get(4))
        else {
            return Err(invalid("does not match OCC layout"));
        };

        let expiration = NaiveDate::parse_from_str(date.as_str(), "%y%m%d")
            .map_err(|e| invalid(&format!("bad expiration date: {e}")))?;

        let right = match right.as_str() {
            "C" => OptionRight::Call,
            _ => OptionRight::Put,
        };

        let millis: i64 = strike
            .as_str()
            .parse()
            .map_err(|_| invalid("bad strike field"))?;

        Ok(Self::new(
            Symbol::new(root.as_str()),
            market,
            style,
            right,
            Decimal::new(millis, 3),
            expiration,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use test_case::test_case;

    fn spx_put_3150() -> ContractIdentifier {
        ContractIdentifier::european_put(
            "SPX",
            dec!(3150),
            NaiveDate::from_ymd_opt(2021, 1, 15).unwrap(),
        )
    }

    #[test]
    fn renders_padded_ticker() {
        assert_eq!(spx_put_3150().occ_ticker(), "SPX   210115P03150000");
        assert_eq!(spx_put_3150().to_string(), "SPX   210115P03150000");
    }

    #[test]
    fn renders_fractional_strike() {
        let contract = ContractIdentifier::new(
            "SPY",
            Market::Usa,
            OptionStyle::American,
            OptionRight::Call,
            dec!(372.5),
            NaiveDate::from_ymd_opt(2021, 1, 15).unwrap(),
        );
        assert_eq!(contract.occ_ticker(), "SPY   210115C00372500");
    }

    #[test_case("SPX   210115P03150000" ; "padded")]
    #[test_case("SPX210115P03150000" ; "compact")]
    #[test_case("spx   210115p03150000" ; "lowercase")]
    fn parses_ticker(ticker: &str) {
        let parsed = ContractIdentifier::from_occ(ticker, Market::Usa, OptionStyle::European).unwrap();
        assert_eq!(parsed, spx_put_3150());
    }

    #[test_case("" ; "empty")]
    #[test_case("SPX 210115X03150000" ; "bad right")]
    #[test_case("SPX 211315P03150000" ; "bad month")]
    #[test_case("SPX 210115P3150000" ; "short strike")]
    #[test_case("TOOLONGX210115P03150000" ; "long root")]
    fn rejects_malformed_ticker(ticker: &str) {
        let err = ContractIdentifier::from_occ(ticker, Market::Usa, OptionStyle::European)
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidTicker { .. }));
    }

    #[test]
    fn parse_uses_caller_style() {
        let parsed =
            ContractIdentifier::from_occ("SPX   210115P03150000", Market::Usa, OptionStyle::American)
                .unwrap();
        assert_eq!(parsed.style(), OptionStyle::American);
        assert_ne!(parsed, spx_put_3150());
    }
}
