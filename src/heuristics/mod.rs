//! Priority heuristics that pick the committed set for one hour.
//!
//! Every heuristic produces a priority order over the fleet (best unit
//! first). The shared [`commit_in_order`] rule then walks that order to
//! build the smallest prefix-like set that can serve the hour.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::dispatch::{Commitment, LambdaSolver};
use crate::error::DispatchError;
use crate::fleet::{Fleet, HourDemand};

/// ISA and ISD: average cost rankings.
pub mod average_cost;
/// Shared commitment rule.
pub mod commit;
/// ISB and ISC: incremental cost rankings.
pub mod marginal_cost;
/// ISG: greedy re-scoring with a per-unit penalty.
pub mod penalty;
/// ITR: relevance table built from random trials.
pub mod relevance;
/// ILS: incremental cost sensitivity ranking.
pub mod sensitivity;

pub use average_cost::{FullLoadAverageCost, OptimalAverageCost};
pub use commit::commit_in_order;
pub use marginal_cost::{FullLoadMarginalCost, MinLoadMarginalCost};
pub use penalty::MultiUnitPenalty;
pub use relevance::RelevanceTable;
pub use sensitivity::LagrangeSensitivity;

/// Everything a heuristic may read while ranking one hour.
///
/// # Fields
/// * `fleet` - The validated unit fleet
/// * `hour` - Demand and spinning reserve for this hour
/// * `index` - Position of the hour in the profile
/// * `solver` - Dispatch solver for heuristics that evaluate trial sets
pub struct HourContext<'a> {
    pub fleet: &'a Fleet,
    pub hour: HourDemand,
    pub index: usize,
    pub solver: &'a LambdaSolver,
}

impl<'a> HourContext<'a> {
    pub fn new(fleet: &'a Fleet, hour: HourDemand, index: usize, solver: &'a LambdaSolver) -> Self {
        Self {
            fleet,
            hour,
            index,
            solver,
        }
    }
}

/// Priority order plus the set committed from it.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    /// Fleet indices, best first.
    pub priority: Vec<usize>,
    pub commitment: Commitment,
}

/// A commitment strategy.
///
/// Implementations are stateless between calls; any working state lives
/// inside `priority`.
pub trait Heuristic: Send + Sync {
    /// Which strategy this is.
    fn strategy(&self) -> Strategy;

    /// Ranks every fleet index, best first.
    fn priority(&self, ctx: &HourContext<'_>) -> Vec<usize>;

    /// Ranks the fleet and applies the shared commitment rule.
    ///
    /// # Errors
    ///
    /// Returns `NoFeasibleCommitment` if no set built from the order can
    /// cover demand plus reserve.
    fn select(&self, ctx: &HourContext<'_>) -> Result<Selection, DispatchError> {
        let priority = self.priority(ctx);
        let commitment = commit_in_order(ctx.fleet, ctx.hour, &priority)?;
        Ok(Selection {
            priority,
            commitment,
        })
    }
}

/// Sorts fleet indices by ascending score; equal scores keep fleet order.
pub(crate) fn rank_ascending(scores: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&i, &j| scores[i].total_cmp(&scores[j]));
    order
}

/// Strategy identifiers used in reports, configuration and the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Average cost at full load.
    Isa,
    /// Incremental cost at minimum load.
    Isb,
    /// Incremental cost at full load.
    Isc,
    /// Optimal average cost point.
    Isd,
    /// Multiple-unit penalty.
    Isg,
    /// Lagrangian sensitivity.
    Ils,
    /// Relevance table via sampling.
    Itr,
    /// Brute force.
    Ifb,
}

impl Strategy {
    /// All heuristics, in report column order.
    pub const HEURISTICS: [Strategy; 7] = [
        Strategy::Isa,
        Strategy::Isb,
        Strategy::Isc,
        Strategy::Isd,
        Strategy::Isg,
        Strategy::Ils,
        Strategy::Itr,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Strategy::Isa => "ISA",
            Strategy::Isb => "ISB",
            Strategy::Isc => "ISC",
            Strategy::Isd => "ISD",
            Strategy::Isg => "ISG",
            Strategy::Ils => "ILS",
            Strategy::Itr => "ITR",
            Strategy::Ifb => "IFB",
        }
    }

    pub fn is_stochastic(self) -> bool {
        self == Strategy::Itr
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "isa" => Ok(Strategy::Isa),
            "isb" => Ok(Strategy::Isb),
            "isc" => Ok(Strategy::Isc),
            "isd" => Ok(Strategy::Isd),
            "isg" => Ok(Strategy::Isg),
            "ils" => Ok(Strategy::Ils),
            "itr" => Ok(Strategy::Itr),
            "ifb" => Ok(Strategy::Ifb),
            other => Err(format!(
                "unknown strategy '{other}', expected isa|isb|isc|isd|isg|ils|itr|ifb"
            )),
        }
    }
}

/// Tunables for the heuristics that take parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeuristicSettings {
    /// ISG penalty weight ($/MWh per committed unit per unit of shortfall share).
    pub penalty_per_mw: f64,
    /// ILS weight on the incremental cost rise across the operating band.
    pub odf_weight: f64,
    /// ITR trial count per hour.
    pub itr_trials: usize,
    /// ITR elite cut, as a percentile of successful trial costs.
    pub itr_elite_percentile: f64,
    /// ITR base seed; hour `h` uses `seed + h`.
    pub itr_seed: u64,
}

impl Default for HeuristicSettings {
    fn default() -> Self {
        Self {
            penalty_per_mw: 1000.0,
            odf_weight: 1.0,
            itr_trials: 200,
            itr_elite_percentile: 25.0,
            itr_seed: 0,
        }
    }
}

/// Builds the heuristic behind `strategy`; `None` for brute force.
pub fn build(strategy: Strategy, settings: &HeuristicSettings) -> Option<Box<dyn Heuristic>> {
    let heuristic: Box<dyn Heuristic> = match strategy {
        Strategy::Isa => Box::new(FullLoadAverageCost),
        Strategy::Isb => Box::new(MinLoadMarginalCost),
        Strategy::Isc => Box::new(FullLoadMarginalCost),
        Strategy::Isd => Box::new(OptimalAverageCost),
        Strategy::Isg => Box::new(MultiUnitPenalty::new(settings.penalty_per_mw)),
        Strategy::Ils => Box::new(LagrangeSensitivity::new(settings.odf_weight)),
        Strategy::Itr => Box::new(RelevanceTable::new(
            settings.itr_trials,
            settings.itr_elite_percentile,
            settings.itr_seed,
        )),
        Strategy::Ifb => return None,
    };
    Some(heuristic)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rank_ascending_is_stable_on_ties() {
        assert_eq!(rank_ascending(&[3.0, 1.0, 3.0, 1.0]), vec![1, 3, 0, 2]);
    }

    #[test]
    fn strategy_round_trips_through_text() {
        for s in Strategy::HEURISTICS {
            assert_eq!(s.to_string().parse::<Strategy>().unwrap(), s);
        }
        assert_eq!("IFB".parse::<Strategy>().unwrap(), Strategy::Ifb);
        assert!("greedy".parse::<Strategy>().is_err());
    }

    #[test]
    fn build_covers_every_heuristic() {
        let settings = HeuristicSettings::default();
        for s in Strategy::HEURISTICS {
            let h = build(s, &settings).expect("heuristic");
            assert_eq!(h.strategy(), s);
        }
        assert!(build(Strategy::Ifb, &settings).is_none());
    }
}
