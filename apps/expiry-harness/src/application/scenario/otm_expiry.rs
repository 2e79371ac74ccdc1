//! OTM Expiry Scenario
//!
//! Selects a put from the chain, buys one contract on a schedule, and
//! verifies that the contract expires worthless: no exercise, no underlying
//! fills, delisting notices on the expected dates, flat at the end.

use tracing::{error, info};

use super::{Scenario, ScenarioParams};
use crate::application::ports::{EngineContext, PortfolioView, ScheduledAction};
use crate::application::services::ScheduledActionRegistry;
use crate::domain::contract::{ContractIdentifier, SecurityId};
use crate::domain::events::{OrderFillEvent, Slice};
use crate::domain::lifecycle::{
    EventObserver, ExpectedLifecycle, InvariantChecker, InvariantViolation, ObservationLog,
    ViolationKind,
};
use crate::domain::selection::ContractSelector;
use crate::error::ScenarioError;
use crate::observability;

/// Name of the scheduled entry action.
pub const ENTRY_ACTION_NAME: &str = "otm-expiry-entry";

/// Buy-and-expire scenario for a single OTM option.
#[derive(Debug)]
pub struct OtmExpiryScenario {
    params: ScenarioParams,
    selected: Option<ContractIdentifier>,
    observer: Option<EventObserver>,
    registry: ScheduledActionRegistry,
}

impl OtmExpiryScenario {
    /// Create a scenario that has not yet been initialized.
    #[must_use]
    pub fn new(params: ScenarioParams) -> Self {
        Self {
            params,
            selected: None,
            observer: None,
            registry: ScheduledActionRegistry::new(),
        }
    }

    /// Scenario parameters.
    #[must_use]
    pub const fn params(&self) -> &ScenarioParams {
        &self.params
    }

    /// Contract picked during initialization.
    #[must_use]
    pub const fn selected(&self) -> Option<&ContractIdentifier> {
        self.selected.as_ref()
    }

    /// What the observer accepted so far, if selection succeeded.
    #[must_use]
    pub fn observation(&self) -> Option<&ObservationLog> {
        self.observer.as_ref().map(EventObserver::log)
    }

    fn initialize(&mut self, ctx: &mut dyn EngineContext) -> Result<(), ScenarioError> {
        let underlying = self.params.underlying.clone();
        ctx.subscribe(SecurityId::underlying(underlying.clone()))?;

        let as_of = ctx.current_time().date();
        let chain = ctx.list_available_contracts(&underlying, as_of)?;
        info!(
            underlying = %underlying,
            as_of = %as_of,
            candidates = chain.len(),
            "Option chain loaded"
        );

        let selected = ContractSelector::select(&chain, &self.params.criteria)?;
        ContractSelector::verify(&selected, &self.params.expected_contract)?;
        info!(
            contract = %selected,
            style = %selected.style(),
            expiration = %selected.expiration(),
            "Contract selected"
        );

        let security = SecurityId::option(selected.clone());
        ctx.subscribe(security.clone())?;

        self.observer = Some(EventObserver::new(ExpectedLifecycle {
            underlying,
            contract: selected.clone(),
            warning_date: self.params.warning_date,
            delisting_date: self.params.delisting_date,
            quantity: self.params.order_quantity,
        }));
        self.selected = Some(selected);

        let quantity = self.params.order_quantity;
        let action = ScheduledAction::new(
            ENTRY_ACTION_NAME,
            self.params.entry_date_rule,
            self.params.entry_time_rule,
            move |router| {
                let ticket = router.submit_market_order(security, quantity)?;
                info!(
                    order_id = %ticket.order_id,
                    security = %ticket.security,
                    quantity = %ticket.quantity,
                    time = %ticket.submitted_at,
                    "Entry order submitted"
                );
                Ok(())
            },
        );
        self.registry.register(ctx.scheduler(), action)
    }

    fn handle_order_event(
        &mut self,
        event: &OrderFillEvent,
        portfolio: &dyn PortfolioView,
    ) -> Result<(), ScenarioError> {
        if event.is_filled() {
            let instrument = if event.security.as_option().is_some() {
                "option"
            } else {
                "underlying"
            };
            observability::record_fill_observed(instrument, &event.direction.to_string());
        }

        match self.observer.as_mut() {
            Some(observer) => Ok(observer.on_order_event(event, portfolio)?),
            None if event.is_filled() => Err(InvariantViolation::new(
                ViolationKind::UnknownInstrumentFill,
                format!(
                    "{} fill for {} before any contract was selected",
                    event.direction, event.security
                ),
            )
            .with_instrument(&event.security)
            .at(event.timestamp)
            .into()),
            None => Ok(()),
        }
    }

    fn handle_slice(&mut self, slice: &Slice) -> Result<(), ScenarioError> {
        for notice in slice.delistings.values() {
            observability::record_delisting_notice(&notice.kind.to_string());
        }
        if let Some(observer) = self.observer.as_mut() {
            observer.on_slice(slice)?;
        }
        Ok(())
    }

    fn finish(&self, portfolio: &dyn PortfolioView) -> Result<(), ScenarioError> {
        let empty = ObservationLog::default();
        let log = self.observation().unwrap_or(&empty);
        InvariantChecker::check_final(portfolio, log)?;
        info!(
            selected = ?self.selected.as_ref().map(ContractIdentifier::occ_ticker),
            fills = log.fills.len(),
            invested = portfolio.invested(),
            "OTM expiry scenario passed"
        );
        Ok(())
    }
}

/// Log and count a failure on its way out.
fn report(result: Result<(), ScenarioError>, stage: &'static str) -> Result<(), ScenarioError> {
    if let Err(err) = &result {
        observability::record_violation(err.reason());
        error!(stage, reason = err.reason(), error = %err, "Scenario failed");
    }
    result
}

impl Scenario for OtmExpiryScenario {
    fn on_initialize(&mut self, ctx: &mut dyn EngineContext) -> Result<(), ScenarioError> {
        report(self.initialize(ctx), "initialize")
    }

    fn on_data(
        &mut self,
        slice: &Slice,
        _portfolio: &dyn PortfolioView,
    ) -> Result<(), ScenarioError> {
        report(self.handle_slice(slice), "data")
    }

    fn on_order_event(
        &mut self,
        event: &OrderFillEvent,
        portfolio: &dyn PortfolioView,
    ) -> Result<(), ScenarioError> {
        report(self.handle_order_event(event, portfolio), "order_event")
    }

    fn on_end_of_run(&mut self, portfolio: &dyn PortfolioView) -> Result<(), ScenarioError> {
        report(self.finish(portfolio), "end_of_run")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    use crate::application::ports::{EngineError, OrderRouter, OrderTicket, SchedulerPort};
    use crate::domain::events::{DelistingKind, DelistingNotice, OrderSide, OrderStatus};
    use crate::domain::lifecycle::ContractLifecycle;
    use crate::domain::portfolio::PortfolioSnapshot;
    use crate::domain::selection::SelectionError;
    use crate::domain::shared::{OrderId, Symbol, Timestamp};

    #[derive(Default)]
    struct FakeScheduler {
        actions: Vec<ScheduledAction>,
    }

    impl SchedulerPort for FakeScheduler {
        fn schedule(&mut self, action: ScheduledAction) -> Result<(), EngineError> {
            self.actions.push(action);
            Ok(())
        }
    }

    #[derive(Default)]
    struct FakeRouter {
        orders: Vec<(SecurityId, Decimal)>,
    }

    impl OrderRouter for FakeRouter {
        fn submit_market_order(
            &mut self,
            security: SecurityId,
            quantity: Decimal,
        ) -> Result<OrderTicket, EngineError> {
            self.orders.push((security.clone(), quantity));
            Ok(OrderTicket {
                order_id: OrderId::sequential(1),
                security,
                quantity,
                status: OrderStatus::Submitted,
                submitted_at: ts("2021-01-05T09:31:00"),
            })
        }
    }

    struct FakeContext {
        chain: Vec<ContractIdentifier>,
        subscriptions: Vec<SecurityId>,
        scheduler: FakeScheduler,
    }

    impl FakeContext {
        fn with_strikes(strikes: &[Decimal]) -> Self {
            Self {
                chain: strikes.iter().map(|s| put(*s)).collect(),
                subscriptions: Vec::new(),
                scheduler: FakeScheduler::default(),
            }
        }
    }

    impl EngineContext for FakeContext {
        fn current_time(&self) -> Timestamp {
            ts("2021-01-04T00:00:00")
        }

        fn subscribe(&mut self, security: SecurityId) -> Result<(), EngineError> {
            self.subscriptions.push(security);
            Ok(())
        }

        fn list_available_contracts(
            &self,
            _underlying: &Symbol,
            _as_of: NaiveDate,
        ) -> Result<Vec<ContractIdentifier>, EngineError> {
            Ok(self.chain.clone())
        }

        fn scheduler(&mut self) -> &mut dyn SchedulerPort {
            &mut self.scheduler
        }
    }

    fn ts(s: &str) -> Timestamp {
        Timestamp::parse(s).unwrap()
    }

    fn put(strike: Decimal) -> ContractIdentifier {
        ContractIdentifier::european_put(
            "SPX",
            strike,
            NaiveDate::from_ymd_opt(2021, 1, 15).unwrap(),
        )
    }

    fn fill(direction: OrderSide, message: &str, at: &str) -> OrderFillEvent {
        OrderFillEvent::filled(
            OrderId::sequential(1),
            SecurityId::option(put(dec!(3150))),
            direction,
            dec!(1),
            dec!(0),
            ts(at),
        )
        .with_message(message)
    }

    #[test]
    fn initialize_selects_subscribes_and_schedules() {
        let mut ctx = FakeContext::with_strikes(&[dec!(3100), dec!(3150), dec!(3200)]);
        let mut scenario = OtmExpiryScenario::new(ScenarioParams::default());

        scenario.on_initialize(&mut ctx).unwrap();

        assert_eq!(scenario.selected(), Some(&put(dec!(3150))));
        assert_eq!(
            ctx.subscriptions,
            vec![
                SecurityId::underlying("SPX"),
                SecurityId::option(put(dec!(3150)))
            ]
        );
        assert_eq!(ctx.scheduler.actions.len(), 1);
        assert_eq!(ctx.scheduler.actions[0].name, ENTRY_ACTION_NAME);

        let mut router = FakeRouter::default();
        let action = ctx.scheduler.actions.pop().unwrap();
        action.fire(&mut router).unwrap();
        assert_eq!(
            router.orders,
            vec![(SecurityId::option(put(dec!(3150))), dec!(1))]
        );
    }

    #[test]
    fn empty_chain_fails_selection_and_end_of_run_passes() {
        let mut ctx = FakeContext::with_strikes(&[dec!(3200), dec!(3300)]);
        let mut scenario = OtmExpiryScenario::new(ScenarioParams::default());

        let err = scenario.on_initialize(&mut ctx).unwrap_err();

        assert!(matches!(
            err,
            ScenarioError::Selection(SelectionError::NoMatch { .. })
        ));
        assert!(ctx.scheduler.actions.is_empty());
        scenario.on_end_of_run(&PortfolioSnapshot::new()).unwrap();
    }

    #[test]
    fn wrong_selection_is_a_mismatch() {
        let mut ctx = FakeContext::with_strikes(&[dec!(3100), dec!(3200)]);
        let mut scenario = OtmExpiryScenario::new(ScenarioParams::default());

        let err = scenario.on_initialize(&mut ctx).unwrap_err();

        match err {
            ScenarioError::ContractMismatch(mismatch) => {
                assert_eq!(mismatch.actual, put(dec!(3100)));
                assert_eq!(mismatch.expected, put(dec!(3150)));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(ctx.scheduler.actions.is_empty());
    }

    #[test]
    fn full_lifecycle_passes() {
        let mut ctx = FakeContext::with_strikes(&[dec!(3100), dec!(3150), dec!(3200)]);
        let mut scenario = OtmExpiryScenario::new(ScenarioParams::default());
        scenario.on_initialize(&mut ctx).unwrap();

        let security = SecurityId::option(put(dec!(3150)));
        let mut portfolio = PortfolioSnapshot::new();

        portfolio.apply_fill(&security, OrderSide::Buy, dec!(1));
        scenario
            .on_order_event(&fill(OrderSide::Buy, "", "2021-01-05T09:32:00"), &portfolio)
            .unwrap();

        let warning = Slice::empty(ts("2021-01-15T00:00:00")).with_delisting(
            DelistingNotice::new(put(dec!(3150)), DelistingKind::Warning, ts("2021-01-15T00:00:00")),
        );
        scenario.on_data(&warning, &portfolio).unwrap();

        portfolio.apply_fill(&security, OrderSide::Sell, dec!(1));
        scenario
            .on_order_event(
                &fill(
                    OrderSide::Sell,
                    "Option expiry: OTM contract expired worthless",
                    "2021-01-15T16:00:00",
                ),
                &portfolio,
            )
            .unwrap();

        let delisted = Slice::empty(ts("2021-01-16T00:00:00")).with_delisting(
            DelistingNotice::new(put(dec!(3150)), DelistingKind::Delisted, ts("2021-01-16T00:00:00")),
        );
        scenario.on_data(&delisted, &portfolio).unwrap();

        scenario.on_end_of_run(&portfolio).unwrap();
        assert_eq!(
            scenario.observation().unwrap().lifecycle,
            ContractLifecycle::Closed
        );
    }

    #[test]
    fn fill_before_selection_is_unknown() {
        let mut scenario = OtmExpiryScenario::new(ScenarioParams::default());
        let err = scenario
            .on_order_event(
                &fill(OrderSide::Buy, "", "2021-01-05T09:32:00"),
                &PortfolioSnapshot::new(),
            )
            .unwrap_err();
        assert_eq!(err.reason(), "UNKNOWN_INSTRUMENT_FILL");
    }
}
