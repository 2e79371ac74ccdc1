//! End-to-end runs of the OTM expiry scenario against the reference engine.
//!
//! Each test wires config → scenario → runner the same way the binary does
//! and checks the outcome of the whole run.

#![allow(clippy::unwrap_used)]

use std::io::Write;

use chrono::NaiveDate;
use rust_decimal_macros::dec;
use tempfile::NamedTempFile;

use expiry_harness::config::{SettlementStyle, SimulationConfig, load_config};
use expiry_harness::domain::scheduling::DateRule;
use expiry_harness::{
    ContractIdentifier, ContractLifecycle, EngineError, OptionStyle, OrderSide, OtmExpiryScenario,
    PortfolioView, RunSummary, ScenarioError, ScenarioParams, SelectionError, SimulationRunner, TieBreak,
    ViolationKind,
};

// =============================================================================
// Helpers
// =============================================================================

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

/// Default simulation at a coarse step so runs stay quick.
fn simulation() -> SimulationConfig {
    SimulationConfig {
        step_minutes: 15,
        ..SimulationConfig::default()
    }
}

fn run(
    params: ScenarioParams,
    config: SimulationConfig,
) -> (OtmExpiryScenario, SimulationRunner, Result<RunSummary, ScenarioError>) {
    let mut scenario = OtmExpiryScenario::new(params);
    let mut runner = SimulationRunner::new(config).unwrap();
    let result = runner.run(&mut scenario);
    (scenario, runner, result)
}

fn violation_kind(err: &ScenarioError) -> ViolationKind {
    err.as_violation()
        .map(|v| v.kind)
        .unwrap_or_else(|| panic!("expected an invariant violation, got {err}"))
}

// =============================================================================
// Passing run
// =============================================================================

#[test]
fn spx_put_expires_worthless() {
    let (scenario, runner, result) = run(ScenarioParams::spx_january_2021(), simulation());

    let summary = result.unwrap();
    assert_eq!(
        scenario.selected().map(ContractIdentifier::occ_ticker).as_deref(),
        Some("SPX   210115P03150000")
    );

    let log = scenario.observation().unwrap();
    assert_eq!(log.lifecycle, ContractLifecycle::Closed);
    assert_eq!(log.fill_sequence(), vec![OrderSide::Buy, OrderSide::Sell]);
    assert_eq!(log.fills[0].timestamp.date(), d(2021, 1, 5));
    assert_eq!(log.fills[1].timestamp.date(), d(2021, 1, 15));

    let warning = log.warning_at.unwrap();
    let delisted = log.delisted_at.unwrap();
    assert!(warning < delisted);
    assert_eq!(warning.date(), d(2021, 1, 15));
    assert_eq!(delisted.date(), d(2021, 1, 16));

    assert!(!runner.engine().invested());
    assert!(summary.final_positions.is_empty());
    assert_eq!(summary.notices, 2);
    assert_eq!(summary.finished.date(), d(2021, 1, 29));
}

#[test]
fn entry_on_explicit_date_still_passes() {
    let params = ScenarioParams {
        entry_date_rule: DateRule::on(d(2021, 1, 11)),
        ..ScenarioParams::spx_january_2021()
    };
    let (scenario, _runner, result) = run(params, simulation());

    result.unwrap();
    let log = scenario.observation().unwrap();
    assert_eq!(log.fills[0].timestamp.date(), d(2021, 1, 11));
}

// =============================================================================
// Exercise detection
// =============================================================================

#[test]
fn itm_cash_settlement_is_flagged_as_exercise() {
    let config = SimulationConfig {
        underlying_price: dec!(3000),
        ..simulation()
    };
    let (_scenario, runner, result) = run(ScenarioParams::spx_january_2021(), config);

    let err = result.unwrap_err();
    assert_eq!(violation_kind(&err), ViolationKind::ExercisedOtmContract);
    assert_eq!(err.reason(), "EXERCISED_OTM_CONTRACT");
    // The settlement fill is applied before the check rejects it
    assert_eq!(runner.engine().portfolio().open_positions().len(), 0);
}

#[test]
fn itm_physical_settlement_is_flagged_as_exercise() {
    let config = SimulationConfig {
        underlying_price: dec!(3000),
        settlement: SettlementStyle::Physical,
        ..simulation()
    };
    let (scenario, _runner, result) = run(ScenarioParams::spx_january_2021(), config);

    let err = result.unwrap_err();
    assert_eq!(violation_kind(&err), ViolationKind::ExercisedOtmContract);
    let log = scenario.observation().unwrap();
    assert_eq!(log.lifecycle, ContractLifecycle::Opened);
    assert!(log.delisted_at.is_none());
}

// =============================================================================
// Selection failures
// =============================================================================

fn ambiguous_chain() -> SimulationConfig {
    SimulationConfig {
        chain: vec![
            "SPX   210108P03150000".to_string(),
            "SPX   210115P03150000".to_string(),
            "SPX   210115P03100000".to_string(),
        ],
        ..simulation()
    }
}

#[test]
fn tied_strikes_are_rejected_by_default() {
    let (scenario, runner, result) = run(ScenarioParams::spx_january_2021(), ambiguous_chain());

    let err = result.unwrap_err();
    match &err {
        ScenarioError::Selection(SelectionError::Ambiguous { strike, tied }) => {
            assert_eq!(*strike, dec!(3150));
            assert_eq!(tied.len(), 2);
        }
        other => panic!("expected ambiguity, got {other}"),
    }
    assert_eq!(err.reason(), "SELECTION_AMBIGUOUS");
    assert!(scenario.selected().is_none());
    assert!(!runner.engine().invested());
}

#[test]
fn earliest_expiration_breaks_the_tie() {
    let weekly = d(2021, 1, 8);
    let mut params = ScenarioParams::spx_january_2021();
    params.criteria = params
        .criteria
        .clone()
        .with_tie_break(TieBreak::EarliestExpiration);
    params.expected_contract = ContractIdentifier::european_put("SPX", dec!(3150), weekly);
    params.warning_date = weekly;
    params.delisting_date = d(2021, 1, 9);

    let (scenario, _runner, result) = run(params, ambiguous_chain());

    result.unwrap();
    let log = scenario.observation().unwrap();
    assert_eq!(log.fills[1].timestamp.date(), weekly);
    // Saturday notice is still delivered
    assert_eq!(log.delisted_at.unwrap().date(), d(2021, 1, 9));
}

#[test]
fn lowest_ticker_breaks_the_tie() {
    let mut params = ScenarioParams::spx_january_2021();
    params.criteria = params.criteria.clone().with_tie_break(TieBreak::LowestTicker);

    let (scenario, _runner, result) = run(params, ambiguous_chain());

    // Lowest ticker is the 8 January weekly, not the expected contract
    let err = result.unwrap_err();
    assert_eq!(err.reason(), "CONTRACT_MISMATCH");
    assert!(scenario.selected().is_none());
}

#[test]
fn nothing_below_the_strike_cap_fails_selection() {
    let mut params = ScenarioParams::spx_january_2021();
    params.criteria.max_strike = dec!(3000);

    let (scenario, runner, result) = run(params, simulation());

    let err = result.unwrap_err();
    assert!(matches!(
        err,
        ScenarioError::Selection(SelectionError::NoMatch { candidates: 3, .. })
    ));
    assert!(scenario.observation().is_none());
    assert!(!runner.engine().invested());
}

#[test]
fn selection_must_match_expected_literal() {
    let mut params = ScenarioParams::spx_january_2021();
    params.expected_contract = ContractIdentifier::european_put("SPX", dec!(3100), d(2021, 1, 15));

    let (_scenario, _runner, result) = run(params, simulation());

    match result.unwrap_err() {
        ScenarioError::ContractMismatch(mismatch) => {
            assert_eq!(mismatch.expected.strike(), dec!(3100));
            assert_eq!(mismatch.actual.strike(), dec!(3150));
        }
        other => panic!("expected mismatch, got {other}"),
    }
}

#[test]
fn style_mismatch_names_both_styles() {
    let config = SimulationConfig {
        chain_style: OptionStyle::American,
        ..simulation()
    };
    let (_scenario, _runner, result) = run(ScenarioParams::spx_january_2021(), config);

    let err = result.unwrap_err();
    assert_eq!(err.reason(), "CONTRACT_MISMATCH");
    let text = err.to_string();
    assert!(text.contains("AMERICAN"));
    assert!(text.contains("EUROPEAN"));
}

// =============================================================================
// Scheduling and timing
// =============================================================================

#[test]
fn entry_after_the_run_is_unschedulable() {
    let params = ScenarioParams {
        entry_date_rule: DateRule::on(d(2021, 2, 10)),
        ..ScenarioParams::spx_january_2021()
    };
    let (_scenario, _runner, result) = run(params, simulation());

    let err = result.unwrap_err();
    assert!(matches!(
        err,
        ScenarioError::Engine(EngineError::Unschedulable { .. })
    ));
    assert_eq!(err.reason(), "ENGINE_ERROR");
}

#[test]
fn wrong_expected_warning_date_is_caught() {
    let params = ScenarioParams {
        warning_date: d(2021, 1, 14),
        ..ScenarioParams::spx_january_2021()
    };
    let (_scenario, _runner, result) = run(params, simulation());

    assert_eq!(
        violation_kind(&result.unwrap_err()),
        ViolationKind::WarningAtWrongTime
    );
}

#[test]
fn run_ending_before_delisting_is_incomplete() {
    let config = SimulationConfig {
        end_date: d(2021, 1, 15),
        ..simulation()
    };
    let (scenario, _runner, result) = run(ScenarioParams::spx_january_2021(), config);

    assert_eq!(
        violation_kind(&result.unwrap_err()),
        ViolationKind::LifecycleIncomplete
    );
    assert_eq!(
        scenario.observation().unwrap().lifecycle,
        ContractLifecycle::Closed
    );
}

// =============================================================================
// Configuration
// =============================================================================

#[test]
fn bundled_config_runs_clean() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/config/spx_put_otm.yaml");
    let config = load_config(Some(path)).unwrap();

    let mut scenario = OtmExpiryScenario::new(config.scenario.to_params());
    let mut runner = SimulationRunner::new(config.simulation).unwrap();

    runner.run(&mut scenario).unwrap();
}

#[test]
fn configured_quantity_is_bought_and_expires() {
    let config = expiry_harness::load_config_from_string(
        "scenario:\n  order_quantity: 2\nsimulation:\n  step_minutes: 30\n",
    )
    .unwrap();

    let mut scenario = OtmExpiryScenario::new(config.scenario.to_params());
    let mut runner = SimulationRunner::new(config.simulation).unwrap();
    runner.run(&mut scenario).unwrap();

    let log = scenario.observation().unwrap();
    assert_eq!(log.fills[0].holdings_after, dec!(2));
    assert_eq!(log.lifecycle, ContractLifecycle::Closed);
}

#[test]
fn config_file_drives_the_run() {
    let yaml = r#"
scenario:
  criteria:
    max_strike: 3150
    right: PUT
    expiration_year: 2021
    expiration_month: 1
simulation:
  step_minutes: 30
  underlying_price: 3000
  settlement: PHYSICAL
"#;
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(yaml.as_bytes()).unwrap();

    let config = load_config(Some(file.path().to_str().unwrap())).unwrap();
    assert_eq!(config.simulation.settlement, SettlementStyle::Physical);

    let mut scenario = OtmExpiryScenario::new(config.scenario.to_params());
    let mut runner = SimulationRunner::new(config.simulation).unwrap();
    let err = runner.run(&mut scenario).unwrap_err();

    assert_eq!(err.reason(), "EXERCISED_OTM_CONTRACT");
}
