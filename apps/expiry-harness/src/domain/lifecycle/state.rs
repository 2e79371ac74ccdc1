//! Contract lifecycle state machine.
//!
//! `NotYetFilled --BUY--> Opened --SELL--> Closed`. Nothing else is legal.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::errors::{InvariantViolation, ViolationKind};
use crate::domain::events::OrderSide;

/// Where the traded contract is in its life cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContractLifecycle {
    /// No entry fill seen yet.
    #[default]
    NotYetFilled,
    /// Entry filled; one contract held.
    Opened,
    /// Expired out of the money; flat again.
    Closed,
}

impl ContractLifecycle {
    /// Check if a fill in `side` is a legal step from `self`.
    #[must_use]
    pub const fn is_valid_transition(self, side: OrderSide) -> bool {
        matches!(
            (self, side),
            (Self::NotYetFilled, OrderSide::Buy) | (Self::Opened, OrderSide::Sell)
        )
    }

    /// Apply a fill and return the next state.
    ///
    /// # Errors
    ///
    /// Returns `IllegalLifecycleTransition` if the fill does not advance the
    /// lifecycle by exactly one step.
    pub fn transition(self, side: OrderSide) -> Result<Self, InvariantViolation> {
        match (self, side) {
            (Self::NotYetFilled, OrderSide::Buy) => Ok(Self::Opened),
            (Self::Opened, OrderSide::Sell) => Ok(Self::Closed),
            (from, side) => Err(InvariantViolation::new(
                ViolationKind::IllegalLifecycleTransition,
                format!("{side} fill while contract is {from}"),
            )),
        }
    }

    /// Returns true once the contract has been bought.
    #[must_use]
    pub const fn has_started(self) -> bool {
        !matches!(self, Self::NotYetFilled)
    }

    /// Returns true if the lifecycle reached its terminal state.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Closed)
    }
}

impl fmt::Display for ContractLifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::NotYetFilled => "NOT_YET_FILLED",
            Self::Opened => "OPENED",
            Self::Closed => "CLOSED",
        };
        write!(f, "{s}")
    }
}
