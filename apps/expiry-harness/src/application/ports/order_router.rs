//! Order Router Port (Driven Port)

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::EngineError;
use crate::domain::contract::SecurityId;
use crate::domain::events::{OrderSide, OrderStatus};
use crate::domain::shared::{OrderId, Timestamp};

/// Acknowledgment returned when an order is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderTicket {
    /// Engine-assigned order ID.
    pub order_id: OrderId,
    /// Instrument ordered.
    pub security: SecurityId,
    /// Signed quantity (positive buys).
    pub quantity: Decimal,
    /// Status at submission.
    pub status: OrderStatus,
    /// Simulated submission time.
    pub submitted_at: Timestamp,
}

impl OrderTicket {
    /// Direction implied by the signed quantity.
    #[must_use]
    pub fn side(&self) -> OrderSide {
        OrderSide::from_signed(self.quantity)
    }
}

/// Port for submitting orders.
pub trait OrderRouter {
    /// Submit a market order. Positive quantities buy, negative sell.
    fn submit_market_order(
        &mut self,
        security: SecurityId,
        quantity: Decimal,
    ) -> Result<OrderTicket, EngineError>;
}
