//! Delisting notices.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::contract::ContractIdentifier;
use crate::domain::shared::Timestamp;

/// Phase of a two-step delisting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DelistingKind {
    /// The contract will stop trading.
    Warning,
    /// The contract has stopped trading.
    Delisted,
}

impl fmt::Display for DelistingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Warning => write!(f, "WARNING"),
            Self::Delisted => write!(f, "DELISTED"),
        }
    }
}

/// A delisting notice for one contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelistingNotice {
    /// Contract being delisted.
    pub contract: ContractIdentifier,
    /// Warning or delisted.
    pub kind: DelistingKind,
    /// Simulated time of the notice.
    pub timestamp: Timestamp,
}

impl DelistingNotice {
    /// Create a new notice.
    #[must_use]
    pub const fn new(contract: ContractIdentifier, kind: DelistingKind, timestamp: Timestamp) -> Self {
        Self {
            contract,
            kind,
            timestamp,
        }
    }
}
