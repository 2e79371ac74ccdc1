//! Domain Layer
//!
//! Pure scenario logic with zero infrastructure dependencies.
//!
//! # Bounded Contexts
//!
//! - [`contract`]: Option contract identity and OCC tickers
//! - [`selection`]: Resolving exactly one contract from a chain
//! - [`events`]: Slices, delisting notices and order fills
//! - [`lifecycle`]: Per-contract state machine and invariant checks
//! - [`portfolio`]: Read-only holdings
//! - [`scheduling`]: Date and time rules for deferred actions

pub mod contract;
pub mod events;
pub mod lifecycle;
pub mod portfolio;
pub mod scheduling;
pub mod selection;
pub mod shared;
