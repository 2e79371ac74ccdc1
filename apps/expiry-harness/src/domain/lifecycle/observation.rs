//! Record of what the observer has accepted so far.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::state::ContractLifecycle;
use crate::domain::events::OrderSide;
use crate::domain::shared::{OrderId, Timestamp};

/// A fill accepted by the observer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservedFill {
    /// Engine order id.
    pub order_id: OrderId,
    /// Buy or sell.
    pub direction: OrderSide,
    /// Contract holdings right after the fill.
    pub holdings_after: Decimal,
    /// Lifecycle state the fill moved the contract into.
    pub lifecycle_after: ContractLifecycle,
    /// Simulated time of the fill.
    pub timestamp: Timestamp,
}

/// Everything the observer accepted, in arrival order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservationLog {
    /// Current lifecycle state of the traded contract.
    pub lifecycle: ContractLifecycle,
    /// Time of the first accepted warning notice.
    pub warning_at: Option<Timestamp>,
    /// Time of the first accepted delisted notice.
    pub delisted_at: Option<Timestamp>,
    /// Accepted fills.
    pub fills: Vec<ObservedFill>,
}

impl ObservationLog {
    /// Pieces of a started lifecycle that never showed up.
    ///
    /// Empty when the lifecycle never started, since an entry that was never
    /// filled has nothing to complete.
    #[must_use]
    pub fn missing(&self) -> Vec<&'static str> {
        if !self.lifecycle.has_started() {
            return Vec::new();
        }

        let mut missing = Vec::new();
        if !self.lifecycle.is_terminal() {
            missing.push("closing OTM expiry fill");
        }
        if self.warning_at.is_none() {
            missing.push("delisting warning");
        }
        if self.delisted_at.is_none() {
            missing.push("delisted notice");
        }
        missing
    }

    /// Directions of accepted fills, in order.
    #[must_use]
    pub fn fill_sequence(&self) -> Vec<OrderSide> {
        self.fills.iter().map(|f| f.direction).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unstarted_log_has_nothing_missing() {
        assert!(ObservationLog::default().missing().is_empty());
    }

    #[test]
    fn opened_log_reports_everything_missing() {
        let log = ObservationLog {
            lifecycle: ContractLifecycle::Opened,
            ..ObservationLog::default()
        };
        assert_eq!(
            log.missing(),
            vec!["closing OTM expiry fill", "delisting warning", "delisted notice"]
        );
    }

    #[test]
    fn complete_log() {
        let ts = Timestamp::parse("2021-01-15T00:00:00").unwrap();
        let log = ObservationLog {
            lifecycle: ContractLifecycle::Closed,
            warning_at: Some(ts),
            delisted_at: Some(ts),
            fills: Vec::new(),
        };
        assert!(log.missing().is_empty());
    }
}
