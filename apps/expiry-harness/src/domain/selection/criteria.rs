//! Selection criteria for picking a contract out of a chain.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::contract::{ContractIdentifier, OptionRight, OptionStyle};

/// What to do when several candidates share the highest surviving strike.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TieBreak {
    /// Fail with an ambiguity error.
    #[default]
    Reject,
    /// Prefer the earliest expiration, then the lowest ticker.
    EarliestExpiration,
    /// Prefer the lexicographically lowest OCC ticker.
    LowestTicker,
}

/// Predicate, ordering, and cardinality for contract selection.
///
/// Survivors of the predicate are ordered by strike descending and exactly
/// one is taken.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionCriteria {
    /// Inclusive upper bound on strike.
    pub max_strike: Decimal,
    /// Required right.
    pub right: OptionRight,
    /// Required expiration year.
    pub expiration_year: i32,
    /// Required expiration month (1-12).
    pub expiration_month: u32,
    /// Required exercise style, if any.
    #[serde(default)]
    pub style: Option<OptionStyle>,
    /// Policy for ties at the top strike.
    #[serde(default)]
    pub tie_break: TieBreak,
}

impl SelectionCriteria {
    /// Criteria for a put at or below `max_strike` expiring in `year`/`month`.
    #[must_use]
    pub const fn put_at_or_below(max_strike: Decimal, year: i32, month: u32) -> Self {
        Self {
            max_strike,
            right: OptionRight::Put,
            expiration_year: year,
            expiration_month: month,
            style: None,
            tie_break: TieBreak::Reject,
        }
    }

    /// Restrict to one exercise style.
    #[must_use]
    pub const fn with_style(mut self, style: OptionStyle) -> Self {
        self.style = Some(style);
        self
    }

    /// Set the tie-break policy.
    #[must_use]
    pub const fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }

    /// Check whether a candidate passes the predicate.
    #[must_use]
    pub fn matches(&self, contract: &ContractIdentifier) -> bool {
        contract.strike() <= self.max_strike
            && contract.right() == self.right
            && contract.expires_in(self.expiration_year, self.expiration_month)
            && self.style.is_none_or(|style| contract.style() == style)
    }
}

impl std::fmt::Display for SelectionCriteria {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} strike <= {} expiring {:04}-{:02}",
            self.right, self.max_strike, self.expiration_year, self.expiration_month
        )?;
        if let Some(style) = self.style {
            write!(f, " ({style})")?;
        }
        Ok(())
    }
}
