//! Infrastructure Layer
//!
//! Adapters for the ports defined in the application layer.
//!
//! - `simulation/`: Deterministic reference engine and run loop

pub mod simulation;
