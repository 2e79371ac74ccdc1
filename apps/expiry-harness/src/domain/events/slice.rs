//! Per-tick data slice and the closed set of engine events.

use std::collections::BTreeMap;

use super::{DelistingNotice, OrderFillEvent};
use crate::domain::contract::ContractIdentifier;
use crate::domain::shared::Timestamp;

/// Data delivered to the scenario for one tick.
///
/// Price data is the engine's concern; the slice only exposes what the
/// lifecycle checks consume.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slice {
    /// Simulated time of the tick.
    pub time: Timestamp,
    /// Delisting notices raised on this tick, by contract.
    pub delistings: BTreeMap<ContractIdentifier, DelistingNotice>,
}

impl Slice {
    /// A slice with no notices.
    #[must_use]
    pub const fn empty(time: Timestamp) -> Self {
        Self {
            time,
            delistings: BTreeMap::new(),
        }
    }

    /// Add a notice to the slice.
    #[must_use]
    pub fn with_delisting(mut self, notice: DelistingNotice) -> Self {
        self.delistings.insert(notice.contract.clone(), notice);
        self
    }

    /// Check if the slice carries any notice.
    #[must_use]
    pub fn has_delistings(&self) -> bool {
        !self.delistings.is_empty()
    }
}

/// Every event category the engine can deliver to a scenario.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// A data slice.
    Data(Slice),
    /// An order event.
    Order(OrderFillEvent),
}
