//! Scheduled Action Registry
//!
//! Hands the scenario's single deferred action to the scheduler, once.

use tracing::{info, warn};

use crate::application::ports::{ScheduledAction, SchedulerPort};
use crate::domain::lifecycle::{InvariantViolation, ViolationKind};
use crate::error::ScenarioError;

/// Registers exactly one scheduled action per scenario.
#[derive(Debug, Default)]
pub struct ScheduledActionRegistry {
    registered: Option<String>,
}

impl ScheduledActionRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Name of the registered action, if any.
    #[must_use]
    pub fn registered(&self) -> Option<&str> {
        self.registered.as_deref()
    }

    /// Hand `action` to `scheduler`.
    ///
    /// # Errors
    ///
    /// Returns `ScheduleRegisteredTwice` on a second call, or the scheduler's
    /// own error if it refuses the action.
    pub fn register(
        &mut self,
        scheduler: &mut dyn SchedulerPort,
        action: ScheduledAction,
    ) -> Result<(), ScenarioError> {
        if let Some(existing) = &self.registered {
            warn!(
                existing = %existing,
                rejected = %action.name,
                "Scheduled action registered twice"
            );
            return Err(InvariantViolation::new(
                ViolationKind::ScheduleRegisteredTwice,
                format!("'{existing}' is already registered; rejected '{}'", action.name),
            )
            .into());
        }

        let name = action.name.clone();
        info!(
            action = %name,
            date_rule = %action.date_rule,
            time_rule = %action.time_rule,
            "Registering scheduled action"
        );
        scheduler.schedule(action)?;
        self.registered = Some(name);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::EngineError;
    use crate::domain::scheduling::{DateRule, TimeRule};

    #[derive(Default)]
    struct RecordingScheduler {
        actions: Vec<ScheduledAction>,
        refuse: bool,
    }

    impl SchedulerPort for RecordingScheduler {
        fn schedule(&mut self, action: ScheduledAction) -> Result<(), EngineError> {
            if self.refuse {
                return Err(EngineError::Unschedulable {
                    name: action.name,
                    reason: "closed".to_string(),
                });
            }
            self.actions.push(action);
            Ok(())
        }
    }

    fn action(name: &str) -> ScheduledAction {
        ScheduledAction::new(
            name,
            DateRule::Tomorrow,
            TimeRule::after_market_open(1),
            |_| Ok(()),
        )
    }

    #[test]
    fn registers_once() {
        let mut scheduler = RecordingScheduler::default();
        let mut registry = ScheduledActionRegistry::new();

        registry.register(&mut scheduler, action("entry")).unwrap();

        assert_eq!(scheduler.actions.len(), 1);
        assert_eq!(registry.registered(), Some("entry"));
    }

    #[test]
    fn second_registration_is_rejected() {
        let mut scheduler = RecordingScheduler::default();
        let mut registry = ScheduledActionRegistry::new();
        registry.register(&mut scheduler, action("entry")).unwrap();

        let err = registry
            .register(&mut scheduler, action("entry-again"))
            .unwrap_err();

        assert_eq!(err.reason(), "SCHEDULE_REGISTERED_TWICE");
        assert_eq!(scheduler.actions.len(), 1);
    }

    #[test]
    fn scheduler_refusal_leaves_registry_empty() {
        let mut scheduler = RecordingScheduler {
            refuse: true,
            ..RecordingScheduler::default()
        };
        let mut registry = ScheduledActionRegistry::new();

        let err = registry.register(&mut scheduler, action("entry")).unwrap_err();

        assert!(matches!(err, ScenarioError::Engine(EngineError::Unschedulable { .. })));
        assert!(registry.registered().is_none());
    }
}
