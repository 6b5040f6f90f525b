//! Runs every configured strategy plus the brute-force baseline over a
//! demand profile.

use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use super::record::{HourRecord, StrategyRecord};
use super::report::BenchmarkReport;
use super::summary::StrategySummary;
use crate::brute_force;
use crate::dispatch::LambdaSolver;
use crate::fleet::{DemandProfile, Fleet, HourDemand};
use crate::heuristics::{self, HourContext, Heuristic, HeuristicSettings, Strategy};

/// Benchmark driver.
///
/// Owns the fleet, solver settings and one instance of each selected
/// heuristic. Hours are independent; with the `parallel` feature they run
/// on the rayon pool and are collected back in profile order.
pub struct Benchmark {
    fleet: Fleet,
    solver: LambdaSolver,
    settings: HeuristicSettings,
    heuristics: Vec<Box<dyn Heuristic>>,
}

impl Benchmark {
    /// Creates a benchmark over all seven heuristics.
    pub fn new(fleet: Fleet, solver: LambdaSolver, settings: HeuristicSettings) -> Self {
        Self::with_strategies(fleet, solver, settings, &Strategy::HEURISTICS)
    }

    /// Creates a benchmark over the given heuristics, in the given order.
    ///
    /// Brute force always runs as the baseline and is ignored if listed;
    /// duplicates keep their first position.
    pub fn with_strategies(
        fleet: Fleet,
        solver: LambdaSolver,
        settings: HeuristicSettings,
        strategies: &[Strategy],
    ) -> Self {
        let mut heuristics: Vec<Box<dyn Heuristic>> = Vec::with_capacity(strategies.len());
        for &strategy in strategies {
            if heuristics.iter().any(|h| h.strategy() == strategy) {
                continue;
            }
            if let Some(h) = heuristics::build(strategy, &settings) {
                heuristics.push(h);
            }
        }
        Self {
            fleet,
            solver,
            settings,
            heuristics,
        }
    }

    pub fn fleet(&self) -> &Fleet {
        &self.fleet
    }

    pub fn settings(&self) -> &HeuristicSettings {
        &self.settings
    }

    /// Report column order: heuristics first, brute force last.
    pub fn strategies(&self) -> Vec<Strategy> {
        self.heuristics
            .iter()
            .map(|h| h.strategy())
            .chain(std::iter::once(Strategy::Ifb))
            .collect()
    }

    /// Runs one heuristic for one hour.
    pub fn run_heuristic(
        &self,
        heuristic: &dyn Heuristic,
        index: usize,
        hour: HourDemand,
    ) -> StrategyRecord {
        let strategy = heuristic.strategy();
        let ctx = HourContext::new(&self.fleet, hour, index, &self.solver);

        let started = Instant::now();
        let selection = heuristic.select(&ctx);
        let ranking_time = started.elapsed();

        let (priority, outcome, solve_time) = match selection {
            Ok(selection) => {
                let started = Instant::now();
                let outcome = self
                    .solver
                    .solve(&self.fleet, selection.commitment, hour.demand_mw);
                (selection.priority, outcome, started.elapsed())
            }
            Err(err) => (Vec::new(), Err(err), Duration::ZERO),
        };

        match &outcome {
            Ok(result) => debug!(
                hour = index,
                strategy = %strategy,
                cost = result.total_cost,
                committed = result.commitment.len(),
                "heuristic dispatched"
            ),
            Err(err) => warn!(hour = index, strategy = %strategy, %err, "hour failed"),
        }

        StrategyRecord::new(strategy, priority, outcome, ranking_time, solve_time)
    }

    /// Runs the brute-force baseline for one hour.
    pub fn run_brute_force(&self, index: usize, hour: HourDemand) -> StrategyRecord {
        let started = Instant::now();
        let outcome = brute_force::optimum(&self.fleet, hour, &self.solver);
        let solve_time = started.elapsed();

        if let Err(err) = &outcome {
            warn!(hour = index, strategy = %Strategy::Ifb, %err, "hour failed");
        }

        StrategyRecord::new(Strategy::Ifb, Vec::new(), outcome, Duration::ZERO, solve_time)
    }

    /// Runs every strategy for one hour and scores them against the optimum.
    pub fn run_hour(&self, index: usize, hour: HourDemand) -> HourRecord {
        let mut strategies: Vec<StrategyRecord> = self
            .heuristics
            .iter()
            .map(|h| self.run_heuristic(h.as_ref(), index, hour))
            .collect();
        strategies.push(self.run_brute_force(index, hour));

        let optimum_cost = strategies.last().and_then(StrategyRecord::cost);
        for record in &mut strategies {
            record.compare_to(optimum_cost);
        }

        HourRecord {
            hour: index,
            demand: hour,
            strategies,
        }
    }

    /// Runs the whole profile.
    ///
    /// Per-hour failures are recorded in the report and never abort the run.
    pub fn run(&self, profile: &DemandProfile) -> BenchmarkReport {
        info!(
            units = self.fleet.len(),
            hours = profile.len(),
            heuristics = self.heuristics.len(),
            seed = self.settings.itr_seed,
            "starting benchmark"
        );

        #[cfg(feature = "parallel")]
        let hours: Vec<HourRecord> = profile
            .hours()
            .par_iter()
            .enumerate()
            .map(|(i, &hour)| self.run_hour(i, hour))
            .collect();

        #[cfg(not(feature = "parallel"))]
        let hours: Vec<HourRecord> = profile
            .iter()
            .enumerate()
            .map(|(i, &hour)| self.run_hour(i, hour))
            .collect();

        let strategies = self.strategies();
        let summaries: Vec<StrategySummary> = strategies
            .iter()
            .map(|&s| StrategySummary::from_records(s, &hours))
            .collect();

        for s in &summaries {
            info!(
                strategy = %s.strategy,
                mean_cost = s.mean_cost,
                mean_deviation_pct = s.mean_deviation_pct.unwrap_or(f64::NAN),
                failed_hours = s.failed_hours,
                total_ms = s.total_elapsed.as_secs_f64() * 1e3,
                "strategy summary"
            );
        }

        BenchmarkReport {
            seed: self.settings.itr_seed,
            units: self.fleet.iter().map(|u| u.id.clone()).collect(),
            strategies,
            hours,
            summaries,
        }
    }
}
