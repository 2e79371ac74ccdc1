//! Security identifier covering every instrument a scenario can touch.

use serde::{Deserialize, Serialize};

use super::option_contract::ContractIdentifier;
use crate::domain::shared::Symbol;

/// Any instrument an order, fill, or holding can refer to.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SecurityId {
    /// The underlying index or equity.
    Underlying {
        /// Underlying ticker.
        symbol: Symbol,
    },
    /// A listed option contract.
    Option {
        /// Contract identity.
        contract: ContractIdentifier,
    },
}

impl SecurityId {
    /// Identifier for an underlying.
    #[must_use]
    pub fn underlying(symbol: impl Into<Symbol>) -> Self {
        Self::Underlying {
            symbol: symbol.into(),
        }
    }

    /// Identifier for an option contract.
    #[must_use]
    pub const fn option(contract: ContractIdentifier) -> Self {
        Self::Option { contract }
    }

    /// The option contract, if this is one.
    #[must_use]
    pub const fn as_option(&self) -> Option<&ContractIdentifier> {
        match self {
            Self::Option { contract } => Some(contract),
            Self::Underlying { .. } => None,
        }
    }

    /// Check if this identifies the given underlying ticker.
    #[must_use]
    pub fn is_underlying(&self, symbol: &Symbol) -> bool {
        matches!(self, Self::Underlying { symbol: s } if s == symbol)
    }
}

impl std::fmt::Display for SecurityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Underlying { symbol } => write!(f, "{symbol}"),
            Self::Option { contract } => write!(f, "{contract}"),
        }
    }
}

impl From<ContractIdentifier> for SecurityId {
    fn from(contract: ContractIdentifier) -> Self {
        Self::option(contract)
    }
}
