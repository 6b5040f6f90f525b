use std::time::Duration;

use crate::dispatch::{Commitment, DispatchResult};
use crate::error::DispatchError;
use crate::fleet::HourDemand;
use crate::heuristics::Strategy;

/// One strategy's outcome for one hour.
#[derive(Debug, Clone, PartialEq)]
pub struct StrategyRecord {
    pub strategy: Strategy,
    /// Priority order the strategy produced (fleet indices, best first).
    /// Empty for brute force and for strategies that failed before ranking.
    pub priority: Vec<usize>,
    /// The dispatch, or why the hour failed for this strategy.
    pub outcome: Result<DispatchResult, DispatchError>,
    /// Ranking plus commitment time.
    pub ranking_time: Duration,
    /// Final dispatch (or full enumeration, for brute force) time.
    pub solve_time: Duration,
    /// `(cost − optimum) / optimum × 100`, when both succeeded and the
    /// optimum is non-zero.
    pub deviation_pct: Option<f64>,
}

impl StrategyRecord {
    pub fn new(
        strategy: Strategy,
        priority: Vec<usize>,
        outcome: Result<DispatchResult, DispatchError>,
        ranking_time: Duration,
        solve_time: Duration,
    ) -> Self {
        Self {
            strategy,
            priority,
            outcome,
            ranking_time,
            solve_time,
            deviation_pct: None,
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.ranking_time + self.solve_time
    }

    pub fn is_feasible(&self) -> bool {
        self.outcome.is_ok()
    }

    pub fn result(&self) -> Option<&DispatchResult> {
        self.outcome.as_ref().ok()
    }

    pub fn error(&self) -> Option<&DispatchError> {
        self.outcome.as_ref().err()
    }

    pub fn cost(&self) -> Option<f64> {
        self.result().map(|r| r.total_cost)
    }

    pub fn commitment(&self) -> Option<Commitment> {
        self.result().map(|r| r.commitment)
    }

    /// Fills `deviation_pct` against the hour's optimum cost.
    pub(crate) fn compare_to(&mut self, optimum_cost: Option<f64>) {
        self.deviation_pct = match (self.cost(), optimum_cost) {
            (Some(cost), Some(opt)) if opt != 0.0 => Some((cost - opt) / opt * 100.0),
            _ => None,
        };
    }
}

/// All strategy records for one hour, in benchmark column order.
#[derive(Debug, Clone, PartialEq)]
pub struct HourRecord {
    /// Position in the demand profile.
    pub hour: usize,
    pub demand: HourDemand,
    pub strategies: Vec<StrategyRecord>,
}

impl HourRecord {
    pub fn get(&self, strategy: Strategy) -> Option<&StrategyRecord> {
        self.strategies.iter().find(|r| r.strategy == strategy)
    }

    /// Brute-force result for the hour, if it ran and succeeded.
    pub fn optimum(&self) -> Option<&DispatchResult> {
        self.get(Strategy::Ifb).and_then(StrategyRecord::result)
    }

    /// Strategies that failed this hour.
    pub fn failures(&self) -> impl Iterator<Item = &StrategyRecord> {
        self.strategies.iter().filter(|r| !r.is_feasible())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(cost: f64) -> DispatchResult {
        DispatchResult {
            commitment: Commitment::from_indices([0]),
            outputs_mw: vec![10.0],
            total_cost: cost,
            lambda: 1.0,
            iterations: 3,
        }
    }

    fn record(
        strategy: Strategy,
        outcome: Result<DispatchResult, DispatchError>,
    ) -> StrategyRecord {
        StrategyRecord::new(
            strategy,
            vec![0],
            outcome,
            Duration::from_millis(2),
            Duration::from_millis(3),
        )
    }

    #[test]
    fn elapsed_sums_both_phases() {
        let r = record(Strategy::Isa, Ok(result(100.0)));
        assert_eq!(r.elapsed(), Duration::from_millis(5));
    }

    #[test]
    fn deviation_against_optimum() {
        let mut r = record(Strategy::Isa, Ok(result(110.0)));
        r.compare_to(Some(100.0));
        let dev = r.deviation_pct.unwrap();
        assert!((dev - 10.0).abs() < 1e-9);
    }

    #[test]
    fn deviation_skipped_on_failure_or_zero_optimum() {
        let mut failed = record(
            Strategy::Isb,
            Err(DispatchError::NoFeasibleCommitment {
                demand_mw: 1.0,
                reserve_mw: 0.0,
            }),
        );
        failed.compare_to(Some(100.0));
        assert_eq!(failed.deviation_pct, None);

        let mut zero = record(Strategy::Isa, Ok(result(0.0)));
        zero.compare_to(Some(0.0));
        assert_eq!(zero.deviation_pct, None);

        let mut no_opt = record(Strategy::Isa, Ok(result(5.0)));
        no_opt.compare_to(None);
        assert_eq!(no_opt.deviation_pct, None);
    }

    #[test]
    fn hour_record_lookup() {
        let hour = HourRecord {
            hour: 0,
            demand: HourDemand::demand_only(10.0),
            strategies: vec![
                record(Strategy::Isa, Ok(result(12.0))),
                record(
                    Strategy::Isb,
                    Err(DispatchError::NoFeasibleCommitment {
                        demand_mw: 10.0,
                        reserve_mw: 0.0,
                    }),
                ),
                record(Strategy::Ifb, Ok(result(11.0))),
            ],
        };
        assert_eq!(hour.optimum().map(|r| r.total_cost), Some(11.0));
        assert_eq!(hour.get(Strategy::Isa).and_then(StrategyRecord::cost), Some(12.0));
        assert!(hour.get(Strategy::Itr).is_none());
        assert_eq!(hour.failures().count(), 1);
    }
}
