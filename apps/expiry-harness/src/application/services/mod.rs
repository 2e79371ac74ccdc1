//! Application Services
//!
//! Services coordinate domain logic with the engine ports.

mod scheduled_action_registry;

pub use scheduled_action_registry::ScheduledActionRegistry;
