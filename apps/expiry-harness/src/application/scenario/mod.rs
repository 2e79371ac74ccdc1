//! Scenarios
//!
//! A scenario is driven by the engine through four callbacks. The portfolio
//! is passed explicitly into each one; nothing is read from ambient state.

mod otm_expiry;
mod params;

pub use otm_expiry::OtmExpiryScenario;
pub use params::ScenarioParams;

use crate::application::ports::{EngineContext, PortfolioView};
use crate::domain::events::{EngineEvent, OrderFillEvent, Slice};
use crate::error::ScenarioError;

/// Inbound port implemented by every scenario.
///
/// The engine calls `on_initialize` once, then `on_data` and
/// `on_order_event` in simulated-time order, and `on_end_of_run` last.
/// Callbacks never run concurrently.
pub trait Scenario {
    /// Select instruments and register scheduled actions.
    fn on_initialize(&mut self, ctx: &mut dyn EngineContext) -> Result<(), ScenarioError>;

    /// Handle one data slice.
    fn on_data(&mut self, slice: &Slice, portfolio: &dyn PortfolioView)
    -> Result<(), ScenarioError>;

    /// Handle one order event. `portfolio` already reflects the event.
    fn on_order_event(
        &mut self,
        event: &OrderFillEvent,
        portfolio: &dyn PortfolioView,
    ) -> Result<(), ScenarioError>;

    /// Route an engine event to `on_data` or `on_order_event`.
    fn on_event(
        &mut self,
        event: &EngineEvent,
        portfolio: &dyn PortfolioView,
    ) -> Result<(), ScenarioError> {
        match event {
            EngineEvent::Data(slice) => self.on_data(slice, portfolio),
            EngineEvent::Order(order) => self.on_order_event(order, portfolio),
        }
    }

    /// Final checks, run exactly once.
    fn on_end_of_run(&mut self, portfolio: &dyn PortfolioView) -> Result<(), ScenarioError>;
}
