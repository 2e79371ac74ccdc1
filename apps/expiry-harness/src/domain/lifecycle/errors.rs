//! Invariant violations raised while validating a scenario.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::shared::Timestamp;

/// Stable classification of every runtime assertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ViolationKind {
    /// The underlying received a fill.
    UnexpectedUnderlyingFill,
    /// The entry fill left holdings other than one contract.
    EntryFillDidNotOpen,
    /// The closing fill left a non-zero position.
    ExitFillDidNotClose,
    /// The closing fill describes an exercise.
    ExercisedOtmContract,
    /// The closing fill is neither an exercise nor an OTM expiry.
    ClosingFillNotOtmExpiry,
    /// A fill does not correspond to a legal lifecycle step.
    IllegalLifecycleTransition,
    /// A fill arrived for an instrument the scenario does not trade.
    UnknownInstrumentFill,
    /// Warning notice on the wrong date.
    WarningAtWrongTime,
    /// Delisted notice on the wrong date.
    DelistedAtWrongTime,
    /// Delisted notice before any warning.
    DelistedBeforeWarning,
    /// Non-zero holdings at run end.
    UnexpectedHoldingsAtEnd,
    /// The lifecycle did not finish by run end.
    LifecycleIncomplete,
    /// The entry action was registered more than once.
    ScheduleRegisteredTwice,
}

impl ViolationKind {
    /// Machine-readable reason code.
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::UnexpectedUnderlyingFill => "UNEXPECTED_UNDERLYING_FILL",
            Self::EntryFillDidNotOpen => "ENTRY_FILL_DID_NOT_OPEN",
            Self::ExitFillDidNotClose => "EXIT_FILL_DID_NOT_CLOSE",
            Self::ExercisedOtmContract => "EXERCISED_OTM_CONTRACT",
            Self::ClosingFillNotOtmExpiry => "CLOSING_FILL_NOT_OTM_EXPIRY",
            Self::IllegalLifecycleTransition => "ILLEGAL_LIFECYCLE_TRANSITION",
            Self::UnknownInstrumentFill => "UNKNOWN_INSTRUMENT_FILL",
            Self::WarningAtWrongTime => "WARNING_AT_WRONG_TIME",
            Self::DelistedAtWrongTime => "DELISTED_AT_WRONG_TIME",
            Self::DelistedBeforeWarning => "DELISTED_BEFORE_WARNING",
            Self::UnexpectedHoldingsAtEnd => "UNEXPECTED_HOLDINGS_AT_END",
            Self::LifecycleIncomplete => "LIFECYCLE_INCOMPLETE",
            Self::ScheduleRegisteredTwice => "SCHEDULE_REGISTERED_TWICE",
        }
    }

    /// One-line human summary.
    #[must_use]
    pub const fn summary(&self) -> &'static str {
        match self {
            Self::UnexpectedUnderlyingFill => "unexpected underlying fill",
            Self::EntryFillDidNotOpen => "entry fill did not open position",
            Self::ExitFillDidNotClose => "closing fill did not flatten position",
            Self::ExercisedOtmContract => "exercised an OTM contract",
            Self::ClosingFillNotOtmExpiry => "closing fill was not an OTM expiry",
            Self::IllegalLifecycleTransition => "illegal lifecycle transition",
            Self::UnknownInstrumentFill => "fill for unknown instrument",
            Self::WarningAtWrongTime => "delisting warning at wrong time",
            Self::DelistedAtWrongTime => "delisting at wrong time",
            Self::DelistedBeforeWarning => "delisted before warning",
            Self::UnexpectedHoldingsAtEnd => "unexpected holdings at end of run",
            Self::LifecycleIncomplete => "lifecycle incomplete at end of run",
            Self::ScheduleRegisteredTwice => "entry action registered twice",
        }
    }
}

impl std::fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.reason())
    }
}

/// A failed runtime assertion, with the context needed to diagnose it.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{}: {}", .kind.summary(), .detail)]
pub struct InvariantViolation {
    /// What was violated.
    pub kind: ViolationKind,
    /// Expected vs. actual values.
    pub detail: String,
    /// Instrument involved, if any.
    pub instrument: Option<String>,
    /// Simulated time of the offending event, if any.
    pub timestamp: Option<Timestamp>,
}

impl InvariantViolation {
    /// Create a violation with a detail message.
    #[must_use]
    pub fn new(kind: ViolationKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
            instrument: None,
            timestamp: None,
        }
    }

    /// Attach the offending instrument.
    #[must_use]
    pub fn with_instrument(mut self, instrument: impl std::fmt::Display) -> Self {
        self.instrument = Some(instrument.to_string());
        self
    }

    /// Attach the offending event time.
    #[must_use]
    pub const fn at(mut self, timestamp: Timestamp) -> Self {
        self.timestamp = Some(timestamp);
        self
    }
}
