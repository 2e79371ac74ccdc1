//! Engine Events
//!
//! Closed set of event types the engine delivers: data slices carrying
//! delisting notices, and order events.

mod delisting;
mod fill;
mod order_side;
mod order_status;
mod slice;

pub use delisting::{DelistingKind, DelistingNotice};
pub use fill::OrderFillEvent;
pub use order_side::OrderSide;
pub use order_status::OrderStatus;
pub use slice::{EngineEvent, Slice};
