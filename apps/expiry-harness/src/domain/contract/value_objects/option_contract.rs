//! Option Contract Identifier Value Object

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::shared::Symbol;

/// Option right (call or put).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OptionRight {
    /// Call option (right to buy).
    Call,
    /// Put option (right to sell).
    Put,
}

impl OptionRight {
    /// Single-letter code used in OCC tickers.
    #[must_use]
    pub const fn occ_code(&self) -> char {
        match self {
            Self::Call => 'C',
            Self::Put => 'P',
        }
    }
}

impl std::fmt::Display for OptionRight {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Call => write!(f, "CALL"),
            Self::Put => write!(f, "PUT"),
        }
    }
}

/// Exercise style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OptionStyle {
    /// Exercisable only at expiration (index options).
    European,
    /// Exercisable any time up to expiration (equity options).
    American,
}

impl std::fmt::Display for OptionStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::European => write!(f, "EUROPEAN"),
            Self::American => write!(f, "AMERICAN"),
        }
    }
}

/// Market an instrument is listed on.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Market {
    /// United States listed markets.
    #[default]
    Usa,
}

impl std::fmt::Display for Market {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Usa => write!(f, "USA"),
        }
    }
}

/// Identifies one tradable option contract.
///
/// Equality is structural: two identifiers built from the same parameters are
/// the same contract, whether they came from a chain or from literals.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ContractIdentifier {
    /// Underlying symbol.
    underlying: Symbol,
    /// Listing market.
    market: Market,
    /// Exercise style.
    style: OptionStyle,
    /// Call or put.
    right: OptionRight,
    /// Strike price.
    strike: Decimal,
    /// Expiration date.
    expiration: NaiveDate,
}

impl ContractIdentifier {
    /// Create a new contract identifier.
    #[must_use]
    pub fn new(
        underlying: impl Into<Symbol>,
        market: Market,
        style: OptionStyle,
        right: OptionRight,
        strike: Decimal,
        expiration: NaiveDate,
    ) -> Self {
        Self {
            underlying: underlying.into(),
            market,
            style,
            right,
            strike: strike.normalize(),
            expiration,
        }
    }

    /// Create a European put on a US-listed underlying.
    #[must_use]
    pub fn european_put(underlying: impl Into<Symbol>, strike: Decimal, expiration: NaiveDate) -> Self {
        Self::new(
            underlying,
            Market::Usa,
            OptionStyle::European,
            OptionRight::Put,
            strike,
            expiration,
        )
    }

    /// Get the underlying symbol.
    #[must_use]
    pub const fn underlying(&self) -> &Symbol {
        &self.underlying
    }

    /// Get the listing market.
    #[must_use]
    pub const fn market(&self) -> Market {
        self.market
    }

    /// Get the exercise style.
    #[must_use]
    pub const fn style(&self) -> OptionStyle {
        self.style
    }

    /// Get the option right.
    #[must_use]
    pub const fn right(&self) -> OptionRight {
        self.right
    }

    /// Get the strike price.
    #[must_use]
    pub const fn strike(&self) -> Decimal {
        self.strike
    }

    /// Get the expiration date.
    #[must_use]
    pub const fn expiration(&self) -> NaiveDate {
        self.expiration
    }

    /// Check if the contract expires in the given year and month.
    #[must_use]
    pub fn expires_in(&self, year: i32, month: u32) -> bool {
        self.expiration.year() == year && self.expiration.month() == month
    }

    /// Intrinsic value per unit at the given underlying price.
    ///
    /// Zero means the contract is out of (or exactly at) the money.
    #[must_use]
    pub fn intrinsic_value(&self, underlying_price: Decimal) -> Decimal {
        let raw = match self.right {
            OptionRight::Call => underlying_price - self.strike,
            OptionRight::Put => self.strike - underlying_price,
        };
        raw.max(Decimal::ZERO)
    }

    /// Check if the contract would expire worthless at the given price.
    #[must_use]
    pub fn is_out_of_the_money(&self, underlying_price: Decimal) -> bool {
        self.intrinsic_value(underlying_price).is_zero()
    }

    /// OCC ticker followed by the fields the ticker does not carry.
    #[must_use]
    pub fn describe(&self) -> String {
        format!("{} ({} {})", self.occ_ticker(), self.style, self.market)
    }

    /// Check if the option has expired.
    #[must_use]
    pub fn is_expired(&self, as_of: NaiveDate) -> bool {
        self.expiration < as_of
    }
}

impl std::fmt::Display for ContractIdentifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.occ_ticker())
    }
}
