//! Integration tests for the benchmark harness on the reference cases.

mod common;

use std::path::Path;

use thermal_dispatch::bench::{Benchmark, BenchmarkReport};
use thermal_dispatch::config::CaseConfig;
use thermal_dispatch::heuristics::Strategy;

fn run_four_unit(seed: u64) -> BenchmarkReport {
    let (fleet, profile) = common::four_unit_case();
    Benchmark::new(fleet, common::default_solver(), common::seeded_settings(seed)).run(&profile)
}

fn assert_optimality_bound(report: &BenchmarkReport) {
    for hour in &report.hours {
        let optimum = hour.optimum().expect("brute force should succeed").total_cost;
        for record in &hour.strategies {
            let cost = record.cost().expect("every strategy should succeed");
            assert!(
                cost >= optimum - 1e-9 * optimum.abs().max(1.0),
                "hour {}: {} cost {cost} below optimum {optimum}",
                hour.hour,
                record.strategy
            );
            assert!(record.deviation_pct.is_some_and(|d| d >= -1e-9));
        }
    }
}

#[test]
fn four_unit_heuristics_never_beat_brute_force() {
    let report = run_four_unit(42);
    assert_eq!(report.hours.len(), 8);
    assert_eq!(report.strategies.len(), 8);
    assert_eq!(report.failed_hours(), 0);
    assert_optimality_bound(&report);
}

#[test]
fn ten_unit_heuristics_never_beat_brute_force() {
    let (fleet, profile) = common::ten_unit_case();
    let report = Benchmark::new(fleet.clone(), common::default_solver(), common::seeded_settings(7))
        .run(&profile);
    assert_eq!(report.hours.len(), 24);
    assert_eq!(report.failed_hours(), 0);
    assert_optimality_bound(&report);

    // committed capacity always covers demand plus 10 % reserve
    for hour in &report.hours {
        for record in &hour.strategies {
            let commitment = record.commitment().expect("commitment");
            let (_, cap) = commitment.bound_sums(&fleet);
            assert!(cap + 1e-6 >= hour.demand.required_capacity_mw());
        }
    }
}

#[test]
fn brute_force_summary_is_exactly_optimal() {
    let report = run_four_unit(42);
    let ifb = report.summary(Strategy::Ifb).expect("IFB summary");
    assert_eq!(ifb.optimal_hours, 8);
    assert_eq!(ifb.mean_deviation_pct, Some(0.0));
    assert_eq!(ifb.failed_hours, 0);

    let isa = report.summary(Strategy::Isa).expect("ISA summary");
    assert!(isa.mean_deviation_pct.is_some_and(|d| d > 0.0));
    assert!(isa.mean_cost >= ifb.mean_cost);
}

#[test]
fn fixed_seed_reproduces_relevance_table() {
    let first = run_four_unit(1234);
    let second = run_four_unit(1234);

    for (a, b) in first.hours.iter().zip(&second.hours) {
        let ra = a.get(Strategy::Itr).expect("ITR record");
        let rb = b.get(Strategy::Itr).expect("ITR record");
        assert_eq!(ra.priority, rb.priority);
        assert_eq!(ra.commitment(), rb.commitment());
        assert_eq!(ra.cost(), rb.cost());
    }
}

#[test]
fn deterministic_heuristics_ignore_seed() {
    let first = run_four_unit(1);
    let second = run_four_unit(2);

    for (a, b) in first.hours.iter().zip(&second.hours) {
        for strategy in Strategy::HEURISTICS.into_iter().filter(|s| !s.is_stochastic()) {
            let ra = a.get(strategy).expect("record");
            let rb = b.get(strategy).expect("record");
            assert_eq!(ra.commitment(), rb.commitment(), "{strategy}");
            assert_eq!(ra.cost(), rb.cost(), "{strategy}");
        }
    }
}

#[test]
fn case_files_match_presets() {
    let root = Path::new(env!("CARGO_MANIFEST_DIR"));
    for name in CaseConfig::PRESETS {
        let path = root.join("cases").join(format!("{name}.toml"));
        let file = CaseConfig::from_toml_file(&path).expect("case file should parse");
        let preset = CaseConfig::from_preset(name).expect("preset");

        assert!(file.validate().is_empty(), "{name} case file should be valid");
        assert_eq!(file.units, preset.units, "{name} units");
        assert_eq!(
            file.profile().expect("profile"),
            preset.profile().expect("profile"),
            "{name} profile"
        );
        assert_eq!(file.benchmark.seed, preset.benchmark.seed);
    }
}

#[test]
fn strategy_subset_limits_columns() {
    let (fleet, profile) = common::four_unit_case();
    let report = Benchmark::with_strategies(
        fleet,
        common::default_solver(),
        common::seeded_settings(0),
        &[Strategy::Isg, Strategy::Ils],
    )
    .run(&profile);

    assert_eq!(report.strategies, vec![Strategy::Isg, Strategy::Ils, Strategy::Ifb]);
    assert!(report.hours.iter().all(|h| h.strategies.len() == 3));
}

#[test]
fn unseeded_runs_complete_and_report_their_seed() {
    let mut case = CaseConfig::four_unit();
    case.benchmark.seed = None;
    let fleet = case.fleet().expect("fleet");
    let profile = case.profile().expect("profile");

    for _ in 0..2 {
        let seed = case.resolve_seed();
        let report = Benchmark::new(fleet.clone(), case.solver(), case.heuristic_settings(seed))
            .run(&profile);
        assert_eq!(report.seed, seed);
        assert_eq!(report.failed_hours(), 0);
        assert_optimality_bound(&report);
    }
}
