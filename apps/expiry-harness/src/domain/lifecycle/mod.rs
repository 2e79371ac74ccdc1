//! Lifecycle Bounded Context
//!
//! Tracks the traded contract through `NotYetFilled -> Opened -> Closed`,
//! validates delisting notices, and runs the end-of-run checks.

mod checker;
mod errors;
mod observation;
mod observer;
mod state;

pub use checker::InvariantChecker;
pub use errors::{InvariantViolation, ViolationKind};
pub use observation::{ObservationLog, ObservedFill};
pub use observer::{EventObserver, ExpectedLifecycle};
pub use state::ContractLifecycle;
