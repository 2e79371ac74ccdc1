//! In-memory holdings book.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::PortfolioView;
use crate::domain::contract::SecurityId;
use crate::domain::events::OrderSide;

/// Holdings keyed by instrument.
///
/// Flat instruments are removed so that `open_positions` only reports real
/// exposure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortfolioSnapshot {
    positions: BTreeMap<SecurityId, Decimal>,
}

impl PortfolioSnapshot {
    /// Create an empty (flat) portfolio.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the quantity held in an instrument.
    #[must_use]
    pub fn with_position(mut self, security: SecurityId, quantity: Decimal) -> Self {
        self.set(security, quantity);
        self
    }

    /// Overwrite the quantity held in an instrument.
    pub fn set(&mut self, security: SecurityId, quantity: Decimal) {
        if quantity.is_zero() {
            self.positions.remove(&security);
        } else {
            self.positions.insert(security, quantity);
        }
    }

    /// Apply a fill and return the post-fill quantity.
    pub fn apply_fill(&mut self, security: &SecurityId, side: OrderSide, quantity: Decimal) -> Decimal {
        let delta = match side {
            OrderSide::Buy => quantity,
            OrderSide::Sell => -quantity,
        };
        let updated = self.holdings(security) + delta;
        self.set(security.clone(), updated);
        updated
    }
}

impl PortfolioView for PortfolioSnapshot {
    fn holdings(&self, security: &SecurityId) -> Decimal {
        self.positions.get(security).copied().unwrap_or(Decimal::ZERO)
    }

    fn open_positions(&self) -> Vec<(SecurityId, Decimal)> {
        self.positions
            .iter()
            .map(|(security, quantity)| (security.clone(), *quantity))
            .collect()
    }
}
