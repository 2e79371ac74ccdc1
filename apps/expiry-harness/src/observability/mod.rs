//! Observability module for harness metrics.
//!
//! Logging setup lives in [`crate::telemetry`].

mod metrics;

pub use metrics::{
    record_delisting_notice, record_fill_observed, record_run_outcome, record_violation,
};
