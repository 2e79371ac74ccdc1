//! Engine Context Port (Driven Port)
//!
//! Handle the engine passes to a scenario during initialization.

use chrono::NaiveDate;

use super::SchedulerPort;
use crate::domain::contract::{ContractIdentifier, SecurityId};
use crate::domain::shared::{Symbol, Timestamp};

/// Engine port error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// The engine does not know the instrument.
    #[error("Unknown security: {security}")]
    UnknownSecurity {
        /// The unknown instrument.
        security: String,
    },

    /// An order was submitted for an instrument nobody subscribed to.
    #[error("Security not subscribed: {security}")]
    NotSubscribed {
        /// The instrument.
        security: String,
    },

    /// Order rejected by the engine.
    #[error("Order rejected: {reason}")]
    OrderRejected {
        /// Rejection reason.
        reason: String,
    },

    /// A scheduled action's rules never resolve inside the run window.
    #[error("Schedule '{name}' cannot fire: {reason}")]
    Unschedulable {
        /// Action name.
        name: String,
        /// Why the rules do not resolve.
        reason: String,
    },

    /// Unknown error.
    #[error("Engine error: {message}")]
    Unknown {
        /// Error details.
        message: String,
    },
}

/// Services the engine offers a scenario while it initializes.
pub trait EngineContext {
    /// Current simulated time.
    fn current_time(&self) -> Timestamp;

    /// Request data and tradability for an instrument.
    fn subscribe(&mut self, security: SecurityId) -> Result<(), EngineError>;

    /// Option contracts on `underlying` listed as of `as_of`.
    fn list_available_contracts(
        &self,
        underlying: &Symbol,
        as_of: NaiveDate,
    ) -> Result<Vec<ContractIdentifier>, EngineError>;

    /// Scheduler for deferred actions.
    fn scheduler(&mut self) -> &mut dyn SchedulerPort;
}
