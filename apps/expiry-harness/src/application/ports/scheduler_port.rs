//! Scheduler Port (Driven Port)
//!
//! Scheduling is an intent handed to the engine, which fires it once on its
//! own timeline.

use std::fmt;

use super::{EngineError, OrderRouter};
use crate::domain::scheduling::{DateRule, TimeRule};

/// Callback run when a scheduled action fires.
pub type ActionCallback = Box<dyn FnOnce(&mut dyn OrderRouter) -> Result<(), EngineError>>;

/// A deferred action with the rules that decide when it fires.
pub struct ScheduledAction {
    /// Name used in logs.
    pub name: String,
    /// Day the action fires.
    pub date_rule: DateRule,
    /// Time of day the action fires.
    pub time_rule: TimeRule,
    callback: ActionCallback,
}

impl ScheduledAction {
    /// Package a callback with its rules.
    pub fn new(
        name: impl Into<String>,
        date_rule: DateRule,
        time_rule: TimeRule,
        callback: impl FnOnce(&mut dyn OrderRouter) -> Result<(), EngineError> + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            date_rule,
            time_rule,
            callback: Box::new(callback),
        }
    }

    /// Run the callback, consuming the action.
    pub fn fire(self, router: &mut dyn OrderRouter) -> Result<(), EngineError> {
        (self.callback)(router)
    }
}

impl fmt::Debug for ScheduledAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScheduledAction")
            .field("name", &self.name)
            .field("date_rule", &self.date_rule)
            .field("time_rule", &self.time_rule)
            .finish_non_exhaustive()
    }
}

/// Port for registering deferred actions.
pub trait SchedulerPort {
    /// Hand an action to the scheduler.
    fn schedule(&mut self, action: ScheduledAction) -> Result<(), EngineError>;
}
