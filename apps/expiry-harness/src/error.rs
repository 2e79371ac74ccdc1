//! Top-level error for a scenario run.
//!
//! Every error is fatal: the run is marked failed with the first diagnostic.
//! Each variant maps to a stable reason code so that logs and metrics can be
//! grouped without parsing messages.

use thiserror::Error;

use crate::application::ports::EngineError;
use crate::domain::lifecycle::InvariantViolation;
use crate::domain::selection::{ContractMismatchError, SelectionError};

/// Reason code reported for engine port failures.
pub const ENGINE_ERROR_REASON: &str = "ENGINE_ERROR";

/// Why a scenario run failed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScenarioError {
    /// Contract selection failed before any order was placed.
    #[error("Contract selection failed: {0}")]
    Selection(#[from] SelectionError),

    /// The selected contract is not the expected one.
    #[error(transparent)]
    ContractMismatch(#[from] ContractMismatchError),

    /// A runtime assertion failed.
    #[error("Invariant violated: {0}")]
    Invariant(#[from] InvariantViolation),

    /// An engine port call failed.
    #[error(transparent)]
    Engine(#[from] EngineError),
}

impl ScenarioError {
    /// Machine-readable reason code.
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::Selection(SelectionError::NoMatch { .. }) => "SELECTION_NO_MATCH",
            Self::Selection(SelectionError::Ambiguous { .. }) => "SELECTION_AMBIGUOUS",
            Self::ContractMismatch(_) => "CONTRACT_MISMATCH",
            Self::Invariant(violation) => violation.kind.reason(),
            Self::Engine(_) => ENGINE_ERROR_REASON,
        }
    }

    /// The invariant violation, if this is one.
    #[must_use]
    pub const fn as_violation(&self) -> Option<&InvariantViolation> {
        match self {
            Self::Invariant(violation) => Some(violation),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::contract::ContractIdentifier;
    use crate::domain::lifecycle::ViolationKind;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    #[test]
    fn reason_codes() {
        let err: ScenarioError = SelectionError::NoMatch {
            criteria: "x".to_string(),
            candidates: 0,
        }
        .into();
        assert_eq!(err.reason(), "SELECTION_NO_MATCH");

        let err: ScenarioError =
            InvariantViolation::new(ViolationKind::ExercisedOtmContract, "x").into();
        assert_eq!(err.reason(), "EXERCISED_OTM_CONTRACT");
        assert!(err.as_violation().is_some());

        let err: ScenarioError = EngineError::Unknown {
            message: "x".to_string(),
        }
        .into();
        assert_eq!(err.reason(), ENGINE_ERROR_REASON);
        assert!(err.as_violation().is_none());
    }

    #[test]
    fn mismatch_display_names_both_contracts() {
        let expiry = NaiveDate::from_ymd_opt(2021, 1, 15).unwrap();
        let err: ScenarioError = ContractMismatchError {
            expected: ContractIdentifier::european_put("SPX", dec!(3150), expiry),
            actual: ContractIdentifier::european_put("SPX", dec!(3100), expiry),
        }
        .into();
        let text = err.to_string();
        assert!(text.contains("SPX   210115P03150000"));
        assert!(text.contains("SPX   210115P03100000"));
        assert_eq!(err.reason(), "CONTRACT_MISMATCH");
    }

    #[test]
    fn invariant_display() {
        let err: ScenarioError =
            InvariantViolation::new(ViolationKind::UnexpectedHoldingsAtEnd, "SPX=100").into();
        assert_eq!(
            err.to_string(),
            "Invariant violated: unexpected holdings at end of run: SPX=100"
        );
    }
}
