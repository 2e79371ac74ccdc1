//! End-of-run checks.

use tracing::{info, warn};

use super::errors::{InvariantViolation, ViolationKind};
use super::observation::ObservationLog;
use crate::domain::portfolio::PortfolioView;

/// Stateless end-of-run validation.
#[derive(Debug, Clone, Copy, Default)]
pub struct InvariantChecker;

impl InvariantChecker {
    /// Validate the final portfolio and the completeness of the lifecycle.
    ///
    /// Holdings are checked first. A run whose entry never filled passes
    /// the completeness check trivially.
    ///
    /// # Errors
    ///
    /// Returns `UnexpectedHoldingsAtEnd` if anything is still held, then
    /// `LifecycleIncomplete` if a started lifecycle is missing a step.
    pub fn check_final(
        portfolio: &dyn PortfolioView,
        log: &ObservationLog,
    ) -> Result<(), InvariantViolation> {
        let open = portfolio.open_positions();
        if !open.is_empty() {
            let listing = open
                .iter()
                .map(|(security, quantity)| format!("{security}={quantity}"))
                .collect::<Vec<_>>()
                .join(", ");
            warn!(positions = %listing, "Portfolio still invested at end of run");
            let mut violation =
                InvariantViolation::new(ViolationKind::UnexpectedHoldingsAtEnd, listing);
            if let [(security, _)] = open.as_slice() {
                violation = violation.with_instrument(security);
            }
            return Err(violation);
        }

        let missing = log.missing();
        if !missing.is_empty() {
            warn!(
                lifecycle = %log.lifecycle,
                missing = ?missing,
                "Lifecycle incomplete at end of run"
            );
            return Err(InvariantViolation::new(
                ViolationKind::LifecycleIncomplete,
                format!("lifecycle {} is missing {}", log.lifecycle, missing.join(", ")),
            ));
        }

        info!(
            lifecycle = %log.lifecycle,
            fills = log.fills.len(),
            "End-of-run checks passed"
        );
        Ok(())
    }
}
