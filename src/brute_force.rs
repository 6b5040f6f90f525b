//! Exhaustive commitment search (IFB), used as the optimality oracle.
//!
//! Every non-empty subset of the fleet is a bitmask in `1..2^N`. Subsets
//! that cannot serve the hour are pruned on their bound sums before the
//! solver runs; the rest are dispatched and the cheapest is kept. Equal
//! costs resolve to the lower bitmask, so the serial and `parallel`
//! builds return the same commitment.

use tracing::{debug, trace};

use crate::dispatch::{Commitment, DispatchResult, LambdaSolver};
use crate::error::DispatchError;
use crate::fleet::{Fleet, HourDemand};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Outcome of a full enumeration.
#[derive(Debug, Clone, PartialEq)]
pub struct Search {
    /// Cheapest feasible dispatch.
    pub best: DispatchResult,
    /// Subsets passed to the solver.
    pub solved: usize,
    /// Subsets the solver rejected.
    pub failed: usize,
    /// Subsets skipped on bound sums.
    pub pruned: u64,
}

#[derive(Debug, Default)]
struct Tally {
    best: Option<DispatchResult>,
    solved: usize,
    failed: usize,
}

impl Tally {
    fn merge(self, other: Tally) -> Tally {
        let best = match (self.best, other.best) {
            (Some(a), Some(b)) => Some(cheaper(a, b)),
            (a, b) => a.or(b),
        };
        Tally {
            best,
            solved: self.solved + other.solved,
            failed: self.failed + other.failed,
        }
    }
}

fn cheaper(a: DispatchResult, b: DispatchResult) -> DispatchResult {
    match a.total_cost.total_cmp(&b.total_cost) {
        std::cmp::Ordering::Less => a,
        std::cmp::Ordering::Greater => b,
        std::cmp::Ordering::Equal if a.commitment <= b.commitment => a,
        std::cmp::Ordering::Equal => b,
    }
}

fn evaluate(fleet: &Fleet, hour: HourDemand, solver: &LambdaSolver, bits: u64) -> Tally {
    let commitment = Commitment::from_bits(bits);
    let (min_mw, max_mw) = commitment.bound_sums(fleet);
    if !hour.is_covered_by(min_mw, max_mw) {
        return Tally::default();
    }

    match solver.solve(fleet, commitment, hour.demand_mw) {
        Ok(result) => {
            trace!(subset = bits, cost = result.total_cost, "subset dispatched");
            Tally {
                best: Some(result),
                solved: 1,
                failed: 0,
            }
        }
        Err(err) => {
            trace!(subset = bits, %err, "subset rejected by solver");
            Tally {
                best: None,
                solved: 1,
                failed: 1,
            }
        }
    }
}

/// Enumerates every non-empty subset and keeps the cheapest dispatch.
///
/// # Errors
///
/// `NoFeasibleCommitment` if no subset covers the hour or every covering
/// subset fails to dispatch.
pub fn search(
    fleet: &Fleet,
    hour: HourDemand,
    solver: &LambdaSolver,
) -> Result<Search, DispatchError> {
    let last = Commitment::all(fleet.len()).bits();

    #[cfg(feature = "parallel")]
    let tally = (1..=last)
        .into_par_iter()
        .map(|bits| evaluate(fleet, hour, solver, bits))
        .reduce(Tally::default, Tally::merge);

    #[cfg(not(feature = "parallel"))]
    let tally = (1..=last)
        .map(|bits| evaluate(fleet, hour, solver, bits))
        .fold(Tally::default(), Tally::merge);

    let pruned = last - tally.solved as u64;
    debug!(
        demand_mw = hour.demand_mw,
        solved = tally.solved,
        failed = tally.failed,
        pruned,
        "brute force enumeration finished"
    );

    match tally.best {
        Some(best) => Ok(Search {
            best,
            solved: tally.solved,
            failed: tally.failed,
            pruned,
        }),
        None => Err(DispatchError::NoFeasibleCommitment {
            demand_mw: hour.demand_mw,
            reserve_mw: hour.reserve_mw,
        }),
    }
}

/// Global minimum-cost dispatch for the hour.
///
/// # Errors
///
/// See [`search`].
///
/// # Examples
///
/// ```
/// use thermal_dispatch::brute_force;
/// use thermal_dispatch::dispatch::{Commitment, LambdaSolver};
/// use thermal_dispatch::fleet::{Fleet, GeneratingUnit, HourDemand};
///
/// let fleet = Fleet::new(vec![
///     GeneratingUnit::new("A", 10.0, 50.0, 0.01, 2.0, 20.0),
///     GeneratingUnit::new("B", 10.0, 50.0, 0.02, 1.5, 0.0),
/// ])
/// .unwrap();
/// let best = brute_force::optimum(&fleet, HourDemand::demand_only(30.0), &LambdaSolver::default())
///     .unwrap();
/// assert_eq!(best.commitment, Commitment::from_indices([1]));
/// ```
pub fn optimum(
    fleet: &Fleet,
    hour: HourDemand,
    solver: &LambdaSolver,
) -> Result<DispatchResult, DispatchError> {
    search(fleet, hour, solver).map(|s| s.best)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fleet::GeneratingUnit;

    fn four_unit_fleet() -> Fleet {
        Fleet::new(vec![
            GeneratingUnit::new("GT01", 25.0, 80.0, 0.0070, 24.0, 120.0),
            GeneratingUnit::new("GT02", 60.0, 250.0, 0.0025, 20.0, 280.0),
            GeneratingUnit::new("GT03", 75.0, 300.0, 0.0018, 21.0, 350.0),
            GeneratingUnit::new("GT04", 20.0, 60.0, 0.0090, 27.0, 60.0),
        ])
        .unwrap()
    }

    #[test]
    fn picks_two_large_units_at_moderate_demand() {
        let fleet = four_unit_fleet();
        let s = search(&fleet, HourDemand::demand_only(450.0), &LambdaSolver::default()).unwrap();
        assert_eq!(s.best.commitment, Commitment::from_indices([1, 2]));
        assert!((s.best.total_cost - 10058.26).abs() < 0.01, "{}", s.best.total_cost);
        assert_eq!(s.solved as u64 + s.pruned, 15);
        assert_eq!(s.failed, 0);
    }

    #[test]
    fn optimum_is_no_worse_than_any_covering_subset() {
        let fleet = four_unit_fleet();
        let solver = LambdaSolver::default();
        let hour = HourDemand::demand_only(280.0);
        let best = optimum(&fleet, hour, &solver).unwrap();

        for bits in 1..16u64 {
            let c = Commitment::from_bits(bits);
            let (lo, hi) = c.bound_sums(&fleet);
            if hour.is_covered_by(lo, hi) {
                let r = solver.solve(&fleet, c, hour.demand_mw).unwrap();
                assert!(best.total_cost <= r.total_cost + 1e-9);
            }
        }
    }

    #[test]
    fn reserve_rules_out_tight_subsets() {
        let fleet = four_unit_fleet();
        let solver = LambdaSolver::default();
        let tight = optimum(&fleet, HourDemand::demand_only(280.0), &solver).unwrap();
        let reserved = optimum(&fleet, HourDemand::new(280.0, 100.0), &solver).unwrap();
        let (_, cap) = reserved.commitment.bound_sums(&fleet);
        assert!(cap >= 380.0);
        assert!(reserved.total_cost >= tight.total_cost);
    }

    #[test]
    fn uncoverable_demand_fails() {
        let fleet = four_unit_fleet();
        let err = optimum(&fleet, HourDemand::demand_only(1000.0), &LambdaSolver::default())
            .unwrap_err();
        assert!(matches!(err, DispatchError::NoFeasibleCommitment { .. }));
    }

    #[test]
    fn equal_costs_resolve_to_lower_mask() {
        let fleet = Fleet::new(vec![
            GeneratingUnit::new("X", 0.0, 50.0, 0.01, 2.0, 0.0),
            GeneratingUnit::new("Y", 0.0, 50.0, 0.01, 2.0, 0.0),
        ])
        .unwrap();
        // splitting 50 MW across both beats either unit alone
        let best =
            optimum(&fleet, HourDemand::demand_only(50.0), &LambdaSolver::default()).unwrap();
        assert_eq!(best.commitment, Commitment::from_indices([0, 1]));

        let a = cheaper(solve_single(&fleet, 1), solve_single(&fleet, 0));
        assert_eq!(a.commitment, Commitment::from_indices([0]));
    }

    fn solve_single(fleet: &Fleet, i: usize) -> DispatchResult {
        LambdaSolver::default()
            .solve(fleet, Commitment::from_indices([i]), 30.0)
            .unwrap()
    }
}
