//! Order fill notification.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{OrderSide, OrderStatus};
use crate::domain::contract::SecurityId;
use crate::domain::shared::{OrderId, Timestamp};

/// An order event delivered by the engine.
///
/// Only `Filled` events carry meaning for lifecycle validation; the rest are
/// delivered so that observers can log them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderFillEvent {
    /// Engine order id.
    pub order_id: OrderId,
    /// Instrument the order traded.
    pub security: SecurityId,
    /// Buy or sell.
    pub direction: OrderSide,
    /// Order status after this event.
    pub status: OrderStatus,
    /// Quantity filled by this event (unsigned).
    pub fill_quantity: Decimal,
    /// Fill price.
    pub fill_price: Decimal,
    /// Free-text description from the engine (e.g. expiry or exercise notes).
    pub message: String,
    /// Simulated time of the event.
    pub timestamp: Timestamp,
}

impl OrderFillEvent {
    /// Build a `Filled` event.
    #[must_use]
    pub fn filled(
        order_id: OrderId,
        security: SecurityId,
        direction: OrderSide,
        fill_quantity: Decimal,
        fill_price: Decimal,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            order_id,
            security,
            direction,
            status: OrderStatus::Filled,
            fill_quantity,
            fill_price,
            message: String::new(),
            timestamp,
        }
    }

    /// Attach a descriptive message.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Override the status.
    #[must_use]
    pub const fn with_status(mut self, status: OrderStatus) -> Self {
        self.status = status;
        self
    }

    /// Check if this event reports a completed fill.
    #[must_use]
    pub fn is_filled(&self) -> bool {
        self.status == OrderStatus::Filled
    }

    /// Check if the message describes an exercise or assignment.
    #[must_use]
    pub fn mentions_exercise(&self) -> bool {
        let message = self.message.to_ascii_lowercase();
        message.contains("exercise") || message.contains("assignment")
    }

    /// Check if the message describes an out-of-the-money expiry.
    #[must_use]
    pub fn mentions_otm_expiry(&self) -> bool {
        self.message.contains("OTM")
    }
}
