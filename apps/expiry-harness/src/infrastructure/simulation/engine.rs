//! Deterministic reference engine.
//!
//! Implements every port a scenario consumes. Market orders fill on the
//! tick after submission at a fixed price; held options settle at the close
//! of their expiration date against a fixed underlying price.

use std::collections::{BTreeSet, VecDeque};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::{debug, info};

use super::calendar::TradingCalendar;
use crate::application::ports::{
    EngineContext, EngineError, OrderRouter, OrderTicket, PortfolioView, ScheduledAction,
    SchedulerPort,
};
use crate::config::{SettlementStyle, SimulationConfig};
use crate::domain::contract::{ContractIdentifier, OptionRight, SecurityId};
use crate::domain::events::{
    DelistingKind, DelistingNotice, OrderFillEvent, OrderSide, OrderStatus,
};
use crate::domain::portfolio::PortfolioSnapshot;
use crate::domain::shared::{OrderId, Symbol, Timestamp};

/// Message attached to the closing fill of a contract that expires worthless.
pub const OTM_EXPIRY_MESSAGE: &str = "Option expiry: OTM contract expired worthless";

/// Message attached to the closing fill of an exercised contract.
pub const EXERCISE_MESSAGE: &str = "Automatic Exercise";

/// Message attached to the underlying leg of a physical exercise.
pub const EXERCISE_DELIVERY_MESSAGE: &str = "Option Exercise: underlying delivered at strike";

#[derive(Debug)]
struct PendingAction {
    fire_at: Timestamp,
    action: ScheduledAction,
}

#[derive(Debug)]
struct PendingOrder {
    order_id: OrderId,
    security: SecurityId,
    quantity: Decimal,
}

/// Reference simulation engine.
#[derive(Debug)]
pub struct SimulatedEngine {
    config: SimulationConfig,
    calendar: TradingCalendar,
    chain: Vec<ContractIdentifier>,
    subscriptions: BTreeSet<SecurityId>,
    scheduled: Vec<PendingAction>,
    pending_orders: VecDeque<PendingOrder>,
    events: VecDeque<OrderFillEvent>,
    portfolio: PortfolioSnapshot,
    order_counter: u64,
    now: Timestamp,
}

impl SimulatedEngine {
    /// Create an engine positioned at midnight of the first simulated day.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::UnknownSecurity` if a chain ticker is not a
    /// valid OCC ticker.
    pub fn new(config: SimulationConfig) -> Result<Self, EngineError> {
        let chain = config
            .chain
            .iter()
            .map(|ticker| {
                ContractIdentifier::from_occ(ticker, config.market, config.chain_style).map_err(
                    |e| EngineError::UnknownSecurity {
                        security: format!("{ticker}: {e}"),
                    },
                )
            })
            .collect::<Result<Vec<_>, _>>()?;

        let calendar = TradingCalendar::new(
            config.holidays.iter().copied(),
            config.market_open,
            config.market_close,
        );

        info!(
            start = %config.start_date,
            end = %config.end_date,
            contracts = chain.len(),
            settlement = ?config.settlement,
            "Simulated engine created"
        );

        Ok(Self {
            now: Timestamp::start_of_day(config.start_date),
            config,
            calendar,
            chain,
            subscriptions: BTreeSet::new(),
            scheduled: Vec::new(),
            pending_orders: VecDeque::new(),
            events: VecDeque::new(),
            portfolio: PortfolioSnapshot::new(),
            order_counter: 0,
        })
    }

    /// Engine configuration.
    #[must_use]
    pub const fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Trading calendar.
    #[must_use]
    pub const fn calendar(&self) -> &TradingCalendar {
        &self.calendar
    }

    /// Current holdings.
    #[must_use]
    pub const fn portfolio(&self) -> &PortfolioSnapshot {
        &self.portfolio
    }

    /// Instruments a scenario subscribed to.
    #[must_use]
    pub const fn subscriptions(&self) -> &BTreeSet<SecurityId> {
        &self.subscriptions
    }

    /// Move the clock.
    pub const fn advance_to(&mut self, time: Timestamp) {
        self.now = time;
    }

    /// Remove and return actions due at or before `now`.
    pub fn take_due_actions(&mut self) -> Vec<ScheduledAction> {
        let now = self.now;
        let (due, waiting): (Vec<_>, Vec<_>) = std::mem::take(&mut self.scheduled)
            .into_iter()
            .partition(|p| p.fire_at <= now);
        self.scheduled = waiting;
        due.into_iter()
            .map(|p| {
                info!(action = %p.action.name, time = %now, "Scheduled action firing");
                p.action
            })
            .collect()
    }

    /// Number of actions that have not fired yet.
    #[must_use]
    pub fn pending_actions(&self) -> usize {
        self.scheduled.len()
    }

    /// Queue fills for every order submitted before this tick.
    pub fn fill_pending_orders(&mut self) {
        while let Some(order) = self.pending_orders.pop_front() {
            let price = match &order.security {
                SecurityId::Underlying { .. } => self.config.underlying_price,
                SecurityId::Option { .. } => self.config.option_price,
            };
            let side = OrderSide::from_signed(order.quantity);
            self.events.push_back(OrderFillEvent::filled(
                order.order_id,
                order.security,
                side,
                order.quantity.abs(),
                price,
                self.now,
            ));
        }
    }

    /// Queue settlement fills for held options expiring on `date`.
    ///
    /// Out-of-the-money contracts close at zero with an OTM expiry message.
    /// In-the-money contracts are exercised: cash settlement closes at
    /// intrinsic value, physical settlement also moves the underlying.
    pub fn settle_expirations(&mut self, date: NaiveDate) {
        let expiring: Vec<(ContractIdentifier, Decimal)> = self
            .portfolio
            .open_positions()
            .into_iter()
            .filter_map(|(security, quantity)| match security {
                SecurityId::Option { contract } if contract.expiration() == date => {
                    Some((contract, quantity))
                }
                _ => None,
            })
            .collect();

        let price = self.config.underlying_price;
        for (contract, held) in expiring {
            let closing_side = OrderSide::from_signed(-held);
            if contract.is_out_of_the_money(price) {
                info!(
                    contract = %contract,
                    underlying_price = %price,
                    held = %held,
                    "Contract expired out of the money"
                );
                self.queue_fill(
                    SecurityId::option(contract),
                    closing_side,
                    held.abs(),
                    Decimal::ZERO,
                    OTM_EXPIRY_MESSAGE,
                );
                continue;
            }

            let intrinsic = contract.intrinsic_value(price);
            info!(
                contract = %contract,
                underlying_price = %price,
                intrinsic = %intrinsic,
                settlement = ?self.config.settlement,
                "Contract exercised in the money"
            );
            match self.config.settlement {
                SettlementStyle::Cash => self.queue_fill(
                    SecurityId::option(contract),
                    closing_side,
                    held.abs(),
                    intrinsic,
                    EXERCISE_MESSAGE,
                ),
                SettlementStyle::Physical => {
                    let delivery_side = match (contract.right(), closing_side) {
                        (OptionRight::Call, OrderSide::Sell) | (OptionRight::Put, OrderSide::Buy) => {
                            OrderSide::Buy
                        }
                        (OptionRight::Call, OrderSide::Buy) | (OptionRight::Put, OrderSide::Sell) => {
                            OrderSide::Sell
                        }
                    };
                    let underlying = SecurityId::underlying(contract.underlying().clone());
                    let shares = held.abs() * self.config.contract_multiplier;
                    let strike = contract.strike();
                    self.queue_fill(
                        SecurityId::option(contract),
                        closing_side,
                        held.abs(),
                        Decimal::ZERO,
                        EXERCISE_MESSAGE,
                    );
                    self.queue_fill(
                        underlying,
                        delivery_side,
                        shares,
                        strike,
                        EXERCISE_DELIVERY_MESSAGE,
                    );
                }
            }
        }
    }

    /// Apply and return the next queued order event.
    ///
    /// Holdings are updated before the event is returned, so callers see the
    /// post-fill portfolio.
    pub fn next_order_event(&mut self) -> Option<OrderFillEvent> {
        let event = self.events.pop_front()?;
        if event.is_filled() {
            let held = self
                .portfolio
                .apply_fill(&event.security, event.direction, event.fill_quantity);
            info!(
                order_id = %event.order_id,
                security = %event.security,
                direction = %event.direction,
                quantity = %event.fill_quantity,
                price = %event.fill_price,
                held = %held,
                time = %event.timestamp,
                "Order filled"
            );
        }
        Some(event)
    }

    /// Delisting notices raised at midnight of `date` for subscribed options.
    ///
    /// Warnings arrive on the expiration date, delisted notices the day after.
    #[must_use]
    pub fn delisting_notices(&self, date: NaiveDate) -> Vec<DelistingNotice> {
        let at = Timestamp::start_of_day(date);
        self.subscriptions
            .iter()
            .filter_map(SecurityId::as_option)
            .filter_map(|contract| {
                let expiration = contract.expiration();
                let kind = if expiration == date {
                    DelistingKind::Warning
                } else if expiration.succ_opt() == Some(date) {
                    DelistingKind::Delisted
                } else {
                    return None;
                };
                Some(DelistingNotice::new(contract.clone(), kind, at))
            })
            .collect()
    }

    fn queue_fill(
        &mut self,
        security: SecurityId,
        side: OrderSide,
        quantity: Decimal,
        price: Decimal,
        message: &str,
    ) {
        let order_id = self.next_order_id();
        self.events.push_back(
            OrderFillEvent::filled(order_id, security, side, quantity, price, self.now)
                .with_message(message),
        );
    }

    fn next_order_id(&mut self) -> OrderId {
        self.order_counter += 1;
        OrderId::sequential(self.order_counter)
    }

    fn is_listed(&self, security: &SecurityId) -> bool {
        match security {
            SecurityId::Underlying { symbol } => {
                self.chain.iter().any(|c| c.underlying() == symbol)
            }
            SecurityId::Option { contract } => self.chain.contains(contract),
        }
    }
}

impl EngineContext for SimulatedEngine {
    fn current_time(&self) -> Timestamp {
        self.now
    }

    fn subscribe(&mut self, security: SecurityId) -> Result<(), EngineError> {
        if !self.is_listed(&security) {
            return Err(EngineError::UnknownSecurity {
                security: security.to_string(),
            });
        }
        debug!(security = %security, "Subscribed");
        self.subscriptions.insert(security);
        Ok(())
    }

    fn list_available_contracts(
        &self,
        underlying: &Symbol,
        as_of: NaiveDate,
    ) -> Result<Vec<ContractIdentifier>, EngineError> {
        Ok(self
            .chain
            .iter()
            .filter(|c| c.underlying() == underlying && !c.is_expired(as_of))
            .cloned()
            .collect())
    }

    fn scheduler(&mut self) -> &mut dyn SchedulerPort {
        self
    }
}

impl SchedulerPort for SimulatedEngine {
    fn schedule(&mut self, action: ScheduledAction) -> Result<(), EngineError> {
        let fire_at = self
            .calendar
            .resolve(action.date_rule, action.time_rule, self.config.start_date)
            .filter(|t| *t >= self.now && t.date() <= self.config.end_date)
            .ok_or_else(|| EngineError::Unschedulable {
                name: action.name.clone(),
                reason: format!(
                    "{} {} does not fall on a session between {} and {}",
                    action.date_rule, action.time_rule, self.config.start_date, self.config.end_date
                ),
            })?;

        info!(action = %action.name, fire_at = %fire_at, "Action scheduled");
        self.scheduled.push(PendingAction { fire_at, action });
        Ok(())
    }
}

impl OrderRouter for SimulatedEngine {
    fn submit_market_order(
        &mut self,
        security: SecurityId,
        quantity: Decimal,
    ) -> Result<OrderTicket, EngineError> {
        if !self.subscriptions.contains(&security) {
            return Err(EngineError::NotSubscribed {
                security: security.to_string(),
            });
        }
        if quantity.is_zero() {
            return Err(EngineError::OrderRejected {
                reason: format!("zero quantity for {security}"),
            });
        }
        if let Some(contract) = security.as_option()
            && contract.is_expired(self.now.date())
        {
            return Err(EngineError::OrderRejected {
                reason: format!("{contract} expired on {}", contract.expiration()),
            });
        }

        let order_id = self.next_order_id();
        let ticket = OrderTicket {
            order_id: order_id.clone(),
            security: security.clone(),
            quantity,
            status: OrderStatus::Submitted,
            submitted_at: self.now,
        };

        self.events.push_back(
            OrderFillEvent::filled(
                order_id.clone(),
                security.clone(),
                ticket.side(),
                Decimal::ZERO,
                Decimal::ZERO,
                self.now,
            )
            .with_status(OrderStatus::Submitted),
        );
        self.pending_orders.push_back(PendingOrder {
            order_id,
            security,
            quantity,
        });

        info!(
            order_id = %ticket.order_id,
            security = %ticket.security,
            quantity = %quantity,
            time = %self.now,
            "Market order accepted"
        );
        Ok(ticket)
    }
}

impl PortfolioView for SimulatedEngine {
    fn holdings(&self, security: &SecurityId) -> Decimal {
        self.portfolio.holdings(security)
    }

    fn open_positions(&self) -> Vec<(SecurityId, Decimal)> {
        self.portfolio.open_positions()
    }
}
