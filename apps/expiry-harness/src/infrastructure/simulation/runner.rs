//! Drives a scenario through the simulated calendar.
//!
//! Per calendar day:
//!
//! 1. Midnight slice carrying delisting notices, if any.
//! 2. For every session tick: queued orders fill, the tick's slice is
//!    delivered, due scheduled actions fire.
//! 3. At the close of a trading day, expiring positions settle.
//!
//! Orders submitted from a callback are queued and fill on the next tick, so
//! the engine never re-enters the scenario. The first error stops delivery;
//! `on_end_of_run` still runs.

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{error, info};

use super::engine::SimulatedEngine;
use crate::application::ports::{EngineContext, EngineError, PortfolioView};
use crate::application::scenario::Scenario;
use crate::config::SimulationConfig;
use crate::domain::contract::SecurityId;
use crate::domain::events::{EngineEvent, Slice};
use crate::domain::shared::Timestamp;
use crate::error::ScenarioError;
use crate::observability;

/// Counters for a completed run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// First simulated instant.
    pub started: Timestamp,
    /// Last simulated instant reached.
    pub finished: Timestamp,
    /// Session ticks delivered.
    pub ticks: usize,
    /// Order events delivered (any status).
    pub order_events: usize,
    /// Delisting notices delivered.
    pub notices: usize,
    /// Holdings at the end of the run.
    pub final_positions: Vec<(SecurityId, Decimal)>,
}

impl RunSummary {
    fn starting_at(started: Timestamp) -> Self {
        Self {
            started,
            finished: started,
            ticks: 0,
            order_events: 0,
            notices: 0,
            final_positions: Vec::new(),
        }
    }
}

/// Runs one scenario against a [`SimulatedEngine`].
#[derive(Debug)]
pub struct SimulationRunner {
    engine: SimulatedEngine,
}

impl SimulationRunner {
    /// Create a runner with a fresh engine.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine rejects the configuration.
    pub fn new(config: SimulationConfig) -> Result<Self, EngineError> {
        Ok(Self::from_engine(SimulatedEngine::new(config)?))
    }

    /// Wrap an existing engine.
    #[must_use]
    pub const fn from_engine(engine: SimulatedEngine) -> Self {
        Self { engine }
    }

    /// The engine, for post-run inspection.
    #[must_use]
    pub const fn engine(&self) -> &SimulatedEngine {
        &self.engine
    }

    /// Run `scenario` from the first to the last configured day.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by the scenario or the engine. An error
    /// from `on_end_of_run` is returned only if nothing failed earlier.
    pub fn run(&mut self, scenario: &mut dyn Scenario) -> Result<RunSummary, ScenarioError> {
        let mut summary = RunSummary::starting_at(self.engine.current_time());

        let outcome = self.drive(scenario, &mut summary);
        let end_of_run = scenario.on_end_of_run(&self.engine);
        let result = outcome.and(end_of_run);

        summary.finished = self.engine.current_time();
        summary.final_positions = self.engine.open_positions();
        observability::record_run_outcome(result.is_ok());

        match &result {
            Ok(()) => info!(
                ticks = summary.ticks,
                order_events = summary.order_events,
                notices = summary.notices,
                finished = %summary.finished,
                "Simulation run passed"
            ),
            Err(err) => error!(
                reason = err.reason(),
                error = %err,
                at = %self.engine.current_time(),
                "Simulation run failed"
            ),
        }

        result.map(|()| summary)
    }

    fn drive(
        &mut self,
        scenario: &mut dyn Scenario,
        summary: &mut RunSummary,
    ) -> Result<(), ScenarioError> {
        scenario.on_initialize(&mut self.engine)?;
        self.deliver_order_events(scenario, summary)?;

        let config = self.engine.config();
        let (start, end, step) = (config.start_date, config.end_date, config.step_minutes);
        let close = self.engine.calendar().close();

        for date in start.iter_days().take_while(|d| *d <= end) {
            let midnight = Timestamp::start_of_day(date);
            self.engine.advance_to(midnight);

            let slice = self
                .engine
                .delisting_notices(date)
                .into_iter()
                .fold(Slice::empty(midnight), Slice::with_delisting);
            if slice.has_delistings() {
                summary.notices += slice.delistings.len();
                scenario.on_event(&EngineEvent::Data(slice), &self.engine)?;
            }

            for tick in self.engine.calendar().session_ticks(date, step) {
                self.engine.advance_to(tick);
                self.engine.fill_pending_orders();
                self.deliver_order_events(scenario, summary)?;

                scenario.on_event(&EngineEvent::Data(Slice::empty(tick)), &self.engine)?;
                summary.ticks += 1;

                for action in self.engine.take_due_actions() {
                    action.fire(&mut self.engine)?;
                }
                self.deliver_order_events(scenario, summary)?;
            }

            if self.engine.calendar().is_trading_day(date) {
                self.engine.advance_to(Timestamp::at(date, close));
                self.engine.settle_expirations(date);
                self.deliver_order_events(scenario, summary)?;
            }
        }

        Ok(())
    }

    fn deliver_order_events(
        &mut self,
        scenario: &mut dyn Scenario,
        summary: &mut RunSummary,
    ) -> Result<(), ScenarioError> {
        while let Some(event) = self.engine.next_order_event() {
            summary.order_events += 1;
            scenario.on_event(&EngineEvent::Order(event), &self.engine)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    use crate::domain::events::{DelistingKind, OrderFillEvent};

    /// Records what it sees and never fails.
    #[derive(Default)]
    struct Recorder {
        initialized: usize,
        slices: usize,
        notices: Vec<(DelistingKind, Timestamp)>,
        order_events: Vec<OrderFillEvent>,
        ended: usize,
        fail_on_data: bool,
    }

    impl Scenario for Recorder {
        fn on_initialize(&mut self, ctx: &mut dyn EngineContext) -> Result<(), ScenarioError> {
            self.initialized += 1;
            assert_eq!(ctx.current_time().to_string(), "2021-01-04T00:00:00");
            Ok(())
        }

        fn on_data(
            &mut self,
            slice: &Slice,
            _portfolio: &dyn PortfolioView,
        ) -> Result<(), ScenarioError> {
            self.slices += 1;
            self.notices
                .extend(slice.delistings.values().map(|n| (n.kind, n.timestamp)));
            if self.fail_on_data {
                return Err(EngineError::Unknown {
                    message: "stop".to_string(),
                }
                .into());
            }
            Ok(())
        }

        fn on_order_event(
            &mut self,
            event: &OrderFillEvent,
            _portfolio: &dyn PortfolioView,
        ) -> Result<(), ScenarioError> {
            self.order_events.push(event.clone());
            Ok(())
        }

        fn on_end_of_run(&mut self, _portfolio: &dyn PortfolioView) -> Result<(), ScenarioError> {
            self.ended += 1;
            Ok(())
        }
    }

    fn short_config() -> SimulationConfig {
        SimulationConfig {
            end_date: NaiveDate::from_ymd_opt(2021, 1, 8).unwrap(),
            step_minutes: 30,
            ..SimulationConfig::default()
        }
    }

    #[test]
    fn every_trading_day_is_ticked() {
        let mut runner = SimulationRunner::new(short_config()).unwrap();
        let mut recorder = Recorder::default();

        let summary = runner.run(&mut recorder).unwrap();

        // Jan 4-8 2021: five sessions of 13 half-hour ticks
        assert_eq!(summary.ticks, 65);
        assert_eq!(recorder.slices, 65);
        assert_eq!(recorder.initialized, 1);
        assert_eq!(recorder.ended, 1);
        assert!(recorder.order_events.is_empty());
        assert_eq!(summary.finished.to_string(), "2021-01-08T16:00:00");
    }

    #[test]
    fn unsubscribed_run_sees_no_notices() {
        let mut runner = SimulationRunner::new(SimulationConfig::default()).unwrap();
        let mut recorder = Recorder::default();
        let summary = runner.run(&mut recorder).unwrap();
        assert_eq!(summary.notices, 0);
        assert!(recorder.notices.is_empty());
    }

    #[test]
    fn first_error_stops_delivery_but_end_of_run_still_runs() {
        let mut runner = SimulationRunner::new(short_config()).unwrap();
        let mut recorder = Recorder {
            fail_on_data: true,
            ..Recorder::default()
        };

        let err = runner.run(&mut recorder).unwrap_err();

        assert!(matches!(err, ScenarioError::Engine(EngineError::Unknown { .. })));
        assert_eq!(recorder.slices, 1);
        assert_eq!(recorder.ended, 1);
    }
}
