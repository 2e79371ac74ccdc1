//! Scheduling Bounded Context
//!
//! Rules describing when a deferred action should fire.

mod rules;

pub use rules::{DateRule, TimeRule};
