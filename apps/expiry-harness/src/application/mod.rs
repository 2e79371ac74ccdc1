//! Application Layer
//!
//! Orchestrates the domain through explicit engine ports:
//!
//! - **Ports**: Handles the engine passes into scenario callbacks
//! - **Services**: Scheduled action registration
//! - **Scenario**: The `Scenario` trait and the OTM expiry scenario

pub mod ports;
pub mod scenario;
pub mod services;

pub use ports::*;
pub use scenario::{OtmExpiryScenario, Scenario, ScenarioParams};
pub use services::ScheduledActionRegistry;
