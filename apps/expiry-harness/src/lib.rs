// Allow unwrap/expect in tests - tests should panic on unexpected errors
// Allow test-specific patterns and pedantic lints in test code
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::too_many_lines,
        clippy::needless_pass_by_value,
        clippy::needless_collect,
        clippy::option_if_let_else,
        clippy::default_trait_access,
        clippy::items_after_statements,
        clippy::panic
    )
)]

//! Expiry Harness - Rust Core Library
//!
//! Deterministic verification of an option contract's life cycle inside an
//! event-driven backtesting engine. The harness checks that the engine
//!
//! - resolves the right contract from a chain,
//! - raises delisting notices on the right simulated dates,
//! - never exercises an out-of-the-money contract,
//! - leaves the portfolio flat at the end of the run.
//!
//! # Architecture (Clean Architecture + DDD + Hexagonal)
//!
//! ## Layers (inside → outside)
//!
//! - **Domain**: Pure scenario logic
//!   - `contract`: `ContractIdentifier`, `SecurityId`, OCC tickers
//!   - `selection`: `ContractSelector`, `SelectionCriteria`
//!   - `events`: Slices, delisting notices, order fills
//!   - `lifecycle`: `EventObserver`, `InvariantChecker`
//!   - `portfolio`, `scheduling`
//!
//! - **Application**: Ports and orchestration
//!   - `ports`: `EngineContext`, `OrderRouter`, `SchedulerPort`, `PortfolioView`
//!   - `services`: `ScheduledActionRegistry`
//!   - `scenario`: `Scenario` trait, `OtmExpiryScenario`
//!
//! - **Infrastructure**: Adapters
//!   - `simulation`: Deterministic reference engine and runner

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

// =============================================================================
// Clean Architecture Layers
// =============================================================================

/// Domain layer - Core scenario logic with no external dependencies.
pub mod domain;

/// Application layer - Scenario orchestration and port definitions.
pub mod application;

/// Infrastructure layer - Reference engine adapter.
pub mod infrastructure;

// =============================================================================
// Cross-cutting Concerns
// =============================================================================

/// YAML configuration with environment interpolation.
pub mod config;

/// Top-level scenario error.
pub mod error;

/// Metrics recording.
pub mod observability;

/// Logging setup.
pub mod telemetry;

// =============================================================================
// Re-exports
// =============================================================================

// Domain re-exports
pub use domain::contract::{ContractIdentifier, Market, OptionRight, OptionStyle, SecurityId};
pub use domain::events::{DelistingKind, DelistingNotice, OrderFillEvent, OrderSide, OrderStatus, Slice};
pub use domain::lifecycle::{
    ContractLifecycle, EventObserver, InvariantChecker, InvariantViolation, ViolationKind,
};
pub use domain::selection::{ContractSelector, SelectionCriteria, SelectionError, TieBreak};
pub use domain::shared::{OrderId, Symbol, Timestamp};

// Application re-exports
pub use application::ports::{
    EngineContext, EngineError, OrderRouter, OrderTicket, PortfolioView, ScheduledAction,
    SchedulerPort,
};
pub use application::scenario::{OtmExpiryScenario, Scenario, ScenarioParams};

// Infrastructure re-exports
pub use infrastructure::simulation::{RunSummary, SimulatedEngine, SimulationRunner};

pub use config::{Config, ConfigError, load_config, load_config_from_string};
pub use error::ScenarioError;
