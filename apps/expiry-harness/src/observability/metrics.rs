//! Harness metrics.
//!
//! Recorded through the `metrics` facade. The library installs no exporter,
//! so recording is a no-op until the host application installs a recorder.

use metrics::counter;

// ============================================================================
// Event Metrics
// ============================================================================

/// Record a fill delivered to the scenario.
///
/// # Arguments
///
/// * `instrument` - `"underlying"` or `"option"`
/// * `direction` - `"BUY"` or `"SELL"`
pub fn record_fill_observed(instrument: &'static str, direction: &str) {
    counter!(
        "harness_fills_observed_total",
        "instrument" => instrument,
        "direction" => direction.to_string()
    )
    .increment(1);
}

/// Record a delisting notice delivered to the scenario.
///
/// # Arguments
///
/// * `kind` - `"WARNING"` or `"DELISTED"`
pub fn record_delisting_notice(kind: &str) {
    counter!(
        "harness_delisting_notices_total",
        "kind" => kind.to_string()
    )
    .increment(1);
}

// ============================================================================
// Failure Metrics
// ============================================================================

/// Record a fatal scenario failure.
///
/// # Arguments
///
/// * `reason` - Stable reason code (e.g., `"EXERCISED_OTM_CONTRACT"`)
pub fn record_violation(reason: &'static str) {
    counter!("harness_violations_total", "reason" => reason).increment(1);
}

/// Record the outcome of a complete run.
///
/// # Arguments
///
/// * `passed` - Whether every check passed
pub fn record_run_outcome(passed: bool) {
    let outcome = if passed { "passed" } else { "failed" };
    counter!("harness_runs_total", "outcome" => outcome).increment(1);
}
