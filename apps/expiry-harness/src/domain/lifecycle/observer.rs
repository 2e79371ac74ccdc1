//! Event observer for a single OTM-expiry contract.
//!
//! Validates every fill and delisting notice against the expected lifecycle
//! the moment it arrives. The first violation is returned to the caller and
//! the observer's state is left untouched by the offending event.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use super::errors::{InvariantViolation, ViolationKind};
use super::observation::{ObservationLog, ObservedFill};
use super::state::ContractLifecycle;
use crate::domain::contract::{ContractIdentifier, SecurityId};
use crate::domain::events::{DelistingKind, DelistingNotice, OrderFillEvent, OrderSide, Slice};
use crate::domain::portfolio::PortfolioView;
use crate::domain::shared::Symbol;

/// What the observer expects to see for the traded contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpectedLifecycle {
    /// Underlying that must never receive a fill.
    pub underlying: Symbol,
    /// Contract that is bought once and expires worthless.
    pub contract: ContractIdentifier,
    /// Date the delisting warning must arrive.
    pub warning_date: NaiveDate,
    /// Date the delisted notice must arrive.
    pub delisting_date: NaiveDate,
    /// Holdings the entry fill must leave.
    pub quantity: Decimal,
}

/// Validates the stream of engine events for one contract.
#[derive(Debug, Clone)]
pub struct EventObserver {
    expected: ExpectedLifecycle,
    log: ObservationLog,
}

impl EventObserver {
    /// Create an observer in the `NotYetFilled` state.
    #[must_use]
    pub fn new(expected: ExpectedLifecycle) -> Self {
        Self {
            expected,
            log: ObservationLog::default(),
        }
    }

    /// Expected lifecycle parameters.
    #[must_use]
    pub const fn expected(&self) -> &ExpectedLifecycle {
        &self.expected
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn lifecycle(&self) -> ContractLifecycle {
        self.log.lifecycle
    }

    /// Everything accepted so far.
    #[must_use]
    pub const fn log(&self) -> &ObservationLog {
        &self.log
    }

    /// Validate the delisting notices carried by a slice.
    ///
    /// # Errors
    ///
    /// Returns the first notice that arrives on the wrong date or out of order.
    pub fn on_slice(&mut self, slice: &Slice) -> Result<(), InvariantViolation> {
        for notice in slice.delistings.values() {
            self.on_delisting(notice)?;
        }
        Ok(())
    }

    /// Validate one delisting notice.
    ///
    /// # Errors
    ///
    /// Returns `WarningAtWrongTime`, `DelistedAtWrongTime`, or
    /// `DelistedBeforeWarning`.
    pub fn on_delisting(&mut self, notice: &DelistingNotice) -> Result<(), InvariantViolation> {
        if notice.contract != self.expected.contract {
            debug!(
                contract = %notice.contract,
                kind = %notice.kind,
                "Ignoring delisting notice for untraded contract"
            );
            return Ok(());
        }

        let date = notice.timestamp.date();
        match notice.kind {
            DelistingKind::Warning => {
                if date != self.expected.warning_date {
                    return Err(self.notice_violation(
                        ViolationKind::WarningAtWrongTime,
                        notice,
                        self.expected.warning_date,
                    ));
                }
                self.log.warning_at.get_or_insert(notice.timestamp);
            }
            DelistingKind::Delisted => {
                if date != self.expected.delisting_date {
                    return Err(self.notice_violation(
                        ViolationKind::DelistedAtWrongTime,
                        notice,
                        self.expected.delisting_date,
                    ));
                }
                match self.log.warning_at {
                    Some(warned) if warned < notice.timestamp => {}
                    warned => {
                        let detail = warned.map_or_else(
                            || "no warning was received first".to_string(),
                            |w| format!("warning at {w} is not before delisting"),
                        );
                        return Err(InvariantViolation::new(
                            ViolationKind::DelistedBeforeWarning,
                            detail,
                        )
                        .with_instrument(&notice.contract)
                        .at(notice.timestamp));
                    }
                }
                self.log.delisted_at.get_or_insert(notice.timestamp);
            }
        }

        info!(
            contract = %notice.contract,
            kind = %notice.kind,
            time = %notice.timestamp,
            "Delisting notice accepted"
        );
        Ok(())
    }

    /// Validate an order event against the lifecycle.
    ///
    /// `portfolio` must reflect holdings after the event was applied.
    ///
    /// # Errors
    ///
    /// Returns the violation raised by the fill; non-`Filled` events never fail.
    pub fn on_order_event(
        &mut self,
        event: &OrderFillEvent,
        portfolio: &dyn PortfolioView,
    ) -> Result<(), InvariantViolation> {
        if !event.is_filled() {
            debug!(
                order_id = %event.order_id,
                security = %event.security,
                status = %event.status,
                "Ignoring non-fill order event"
            );
            return Ok(());
        }

        match &event.security {
            security if security.is_underlying(&self.expected.underlying) => {
                Err(self.fill_violation(
                    ViolationKind::UnexpectedUnderlyingFill,
                    event,
                    format!(
                        "{} {} {security} at {}; the option must never be exercised into the underlying",
                        event.direction, event.fill_quantity, event.fill_price
                    ),
                ))
            }
            SecurityId::Option { contract } if *contract == self.expected.contract => {
                let holdings = portfolio.holdings(&event.security);
                self.on_contract_fill(event, holdings)
            }
            other => Err(self.fill_violation(
                ViolationKind::UnknownInstrumentFill,
                event,
                format!("{} fill for {other}", event.direction),
            )),
        }
    }

    fn on_contract_fill(
        &mut self,
        event: &OrderFillEvent,
        holdings: Decimal,
    ) -> Result<(), InvariantViolation> {
        match event.direction {
            OrderSide::Buy => {
                let expected = self.expected.quantity;
                if holdings != expected {
                    return Err(self.fill_violation(
                        ViolationKind::EntryFillDidNotOpen,
                        event,
                        format!("expected holdings {expected} after entry, found {holdings}"),
                    ));
                }
            }
            OrderSide::Sell => {
                if event.mentions_exercise() {
                    return Err(self.fill_violation(
                        ViolationKind::ExercisedOtmContract,
                        event,
                        format!("closing fill message '{}'", event.message),
                    ));
                }
                if !holdings.is_zero() {
                    return Err(self.fill_violation(
                        ViolationKind::ExitFillDidNotClose,
                        event,
                        format!("expected holdings 0 after expiry, found {holdings}"),
                    ));
                }
                if !event.mentions_otm_expiry() {
                    return Err(self.fill_violation(
                        ViolationKind::ClosingFillNotOtmExpiry,
                        event,
                        format!("closing fill message '{}' does not mention OTM", event.message),
                    ));
                }
            }
        }

        let next = self
            .log
            .lifecycle
            .transition(event.direction)
            .map_err(|e| e.with_instrument(&event.security).at(event.timestamp))?;

        info!(
            order_id = %event.order_id,
            contract = %event.security,
            direction = %event.direction,
            holdings = %holdings,
            from = %self.log.lifecycle,
            to = %next,
            "Contract lifecycle advanced"
        );

        self.log.lifecycle = next;
        self.log.fills.push(ObservedFill {
            order_id: event.order_id.clone(),
            direction: event.direction,
            holdings_after: holdings,
            lifecycle_after: next,
            timestamp: event.timestamp,
        });
        Ok(())
    }

    fn fill_violation(
        &self,
        kind: ViolationKind,
        event: &OrderFillEvent,
        detail: String,
    ) -> InvariantViolation {
        warn!(
            reason = kind.reason(),
            order_id = %event.order_id,
            security = %event.security,
            lifecycle = %self.log.lifecycle,
            "Fill rejected"
        );
        InvariantViolation::new(kind, detail)
            .with_instrument(&event.security)
            .at(event.timestamp)
    }

    fn notice_violation(
        &self,
        kind: ViolationKind,
        notice: &DelistingNotice,
        expected: NaiveDate,
    ) -> InvariantViolation {
        warn!(
            reason = kind.reason(),
            contract = %notice.contract,
            expected = %expected,
            actual = %notice.timestamp,
            "Delisting notice rejected"
        );
        InvariantViolation::new(
            kind,
            format!("expected {} on {expected}, received at {}", notice.kind, notice.timestamp),
        )
        .with_instrument(&notice.contract)
        .at(notice.timestamp)
    }
}
