//! Selection Errors

use rust_decimal::Decimal;
use thiserror::Error;

use crate::domain::contract::ContractIdentifier;

/// Errors raised while picking a contract from a chain.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SelectionError {
    /// No candidate satisfied the criteria.
    #[error("No contract matches {criteria} among {candidates} candidates")]
    NoMatch {
        /// Description of the criteria.
        criteria: String,
        /// Size of the candidate set.
        candidates: usize,
    },

    /// Several candidates share the top strike and no tie-break applies.
    #[error("Ambiguous selection at strike {strike}: {tied:?}")]
    Ambiguous {
        /// The shared strike.
        strike: Decimal,
        /// Tickers of the tied contracts.
        tied: Vec<String>,
    },
}

/// The selected contract differs from the independently expected one.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error(
    "Selected contract {} does not match expected contract {}",
    .actual.describe(),
    .expected.describe()
)]
pub struct ContractMismatchError {
    /// Contract built from literal parameters.
    pub expected: ContractIdentifier,
    /// Contract returned by selection.
    pub actual: ContractIdentifier,
}
