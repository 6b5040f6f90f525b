//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use thermal_dispatch::config::CaseConfig;
use thermal_dispatch::dispatch::LambdaSolver;
use thermal_dispatch::fleet::{DemandProfile, Fleet, GeneratingUnit};
use thermal_dispatch::heuristics::HeuristicSettings;

/// Two-unit fleet: A (10–50 MW, 0.01/2/0) and B (10–50 MW, 0.02/1.5/0).
pub fn two_unit_fleet() -> Fleet {
    Fleet::new(vec![
        GeneratingUnit::new("A", 10.0, 50.0, 0.01, 2.0, 0.0),
        GeneratingUnit::new("B", 10.0, 50.0, 0.02, 1.5, 0.0),
    ])
    .expect("two-unit fleet should be valid")
}

/// Four-unit reference fleet and its eight-hour profile.
pub fn four_unit_case() -> (Fleet, DemandProfile) {
    let cfg = CaseConfig::four_unit();
    (
        cfg.fleet().expect("four_unit fleet should be valid"),
        cfg.profile().expect("four_unit profile should be valid"),
    )
}

/// Ten-unit reference fleet and its 24-hour profile with 10 % reserve.
pub fn ten_unit_case() -> (Fleet, DemandProfile) {
    let cfg = CaseConfig::ten_unit();
    (
        cfg.fleet().expect("ten_unit fleet should be valid"),
        cfg.profile().expect("ten_unit profile should be valid"),
    )
}

/// Default solver (1e-6 relative tolerance, 100 iterations).
pub fn default_solver() -> LambdaSolver {
    LambdaSolver::default()
}

/// Default heuristic settings with a fixed ITR seed.
pub fn seeded_settings(seed: u64) -> HeuristicSettings {
    HeuristicSettings {
        itr_seed: seed,
        ..HeuristicSettings::default()
    }
}
