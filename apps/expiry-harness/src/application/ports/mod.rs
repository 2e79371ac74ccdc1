//! Application Ports (Driven)
//!
//! Explicit handles the engine gives a scenario. Nothing is ambient: every
//! callback receives the port it needs.

mod engine_context;
mod order_router;
mod scheduler_port;

pub use crate::domain::portfolio::PortfolioView;
pub use engine_context::{EngineContext, EngineError};
pub use order_router::{OrderRouter, OrderTicket};
pub use scheduler_port::{ActionCallback, ScheduledAction, SchedulerPort};
