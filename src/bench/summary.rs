//! Per-strategy statistics derived from the hour records.

use std::fmt;
use std::time::Duration;

use super::record::HourRecord;
use crate::heuristics::Strategy;

/// Deviation (percent) at or below which an hour counts as matching the optimum.
const OPTIMAL_DEVIATION_PCT: f64 = 1e-6;

/// Aggregate figures for one strategy across a benchmark run.
///
/// Computed post-hoc from the hour records so the table and the records
/// can never disagree.
#[derive(Debug, Clone, PartialEq)]
pub struct StrategySummary {
    pub strategy: Strategy,
    /// Hours the strategy was run for.
    pub hours: usize,
    /// Hours that ended in an error.
    pub failed_hours: usize,
    /// Hours whose cost matched the brute-force optimum.
    pub optimal_hours: usize,
    /// Mean cost over successful hours ($/h).
    pub mean_cost: f64,
    /// Sum of cost over successful hours ($).
    pub total_cost: f64,
    /// Mean deviation from the optimum over hours where it is defined (%).
    pub mean_deviation_pct: Option<f64>,
    /// Worst deviation from the optimum (%).
    pub max_deviation_pct: Option<f64>,
    pub mean_elapsed: Duration,
    pub total_elapsed: Duration,
    pub total_ranking: Duration,
    pub total_solve: Duration,
}

impl StrategySummary {
    /// Aggregates every record of `strategy` in `hours`.
    ///
    /// # Arguments
    ///
    /// * `strategy` - Strategy to summarize
    /// * `hours` - Complete hour records of a run
    ///
    /// # Returns
    ///
    /// A summary with zeroed figures if the strategy never ran.
    pub fn from_records(strategy: Strategy, hours: &[HourRecord]) -> Self {
        let mut ran = 0_usize;
        let mut failed = 0_usize;
        let mut optimal = 0_usize;
        let mut cost_sum = 0.0;
        let mut cost_count = 0_usize;
        let mut dev_sum = 0.0;
        let mut dev_count = 0_usize;
        let mut dev_max: Option<f64> = None;
        let mut total_ranking = Duration::ZERO;
        let mut total_solve = Duration::ZERO;

        for record in hours.iter().filter_map(|h| h.get(strategy)) {
            ran += 1;
            total_ranking += record.ranking_time;
            total_solve += record.solve_time;

            match record.cost() {
                Some(cost) => {
                    cost_sum += cost;
                    cost_count += 1;
                }
                None => failed += 1,
            }

            if let Some(dev) = record.deviation_pct {
                dev_sum += dev;
                dev_count += 1;
                dev_max = Some(dev_max.map_or(dev, |m: f64| m.max(dev)));
                if dev <= OPTIMAL_DEVIATION_PCT {
                    optimal += 1;
                }
            }
        }

        let total_elapsed = total_ranking + total_solve;
        Self {
            strategy,
            hours: ran,
            failed_hours: failed,
            optimal_hours: optimal,
            mean_cost: if cost_count > 0 {
                cost_sum / cost_count as f64
            } else {
                0.0
            },
            total_cost: cost_sum,
            mean_deviation_pct: (dev_count > 0).then(|| dev_sum / dev_count as f64),
            max_deviation_pct: dev_max,
            mean_elapsed: if ran > 0 {
                total_elapsed / ran as u32
            } else {
                Duration::ZERO
            },
            total_elapsed,
            total_ranking,
            total_solve,
        }
    }
}

fn fmt_pct(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.3}%"))
}

impl fmt::Display for StrategySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<4} mean cost {:>12.3}  mean dev {:>9}  max dev {:>9}  \
             optimal {:>3}/{:<3} failed {:>3}  time {:>10.3} ms (rank {:.3} / solve {:.3})",
            self.strategy.code(),
            self.mean_cost,
            fmt_pct(self.mean_deviation_pct),
            fmt_pct(self.max_deviation_pct),
            self.optimal_hours,
            self.hours,
            self.failed_hours,
            self.total_elapsed.as_secs_f64() * 1e3,
            self.total_ranking.as_secs_f64() * 1e3,
            self.total_solve.as_secs_f64() * 1e3,
        )
    }
}
