//! Reference simulation engine.
//!
//! A small deterministic engine behind the same ports the scenario consumes.
//! It exists to drive scenarios end to end in tests and in the binary.

mod calendar;
mod engine;
mod runner;

pub use calendar::TradingCalendar;
pub use engine::{
    EXERCISE_DELIVERY_MESSAGE, EXERCISE_MESSAGE, OTM_EXPIRY_MESSAGE, SimulatedEngine,
};
pub use runner::{RunSummary, SimulationRunner};
