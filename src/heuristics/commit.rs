use crate::dispatch::Commitment;
use crate::error::DispatchError;
use crate::fleet::{Fleet, HourDemand};

/// Walks `priority` and commits units until the set can serve the hour.
///
/// A unit whose `p_min` would push `Σ p_min` above demand is skipped. The
/// walk stops once the set is non-empty and `Σ p_max` covers demand plus
/// reserve.
///
/// # Errors
///
/// `NoFeasibleCommitment` if the order is exhausted first.
///
/// # Examples
///
/// ```
/// use thermal_dispatch::fleet::{Fleet, GeneratingUnit, HourDemand};
/// use thermal_dispatch::heuristics::commit_in_order;
///
/// let fleet = Fleet::new(vec![
///     GeneratingUnit::new("A", 10.0, 50.0, 0.01, 2.0, 0.0),
///     GeneratingUnit::new("B", 10.0, 50.0, 0.02, 1.5, 0.0),
/// ])
/// .unwrap();
/// let c = commit_in_order(&fleet, HourDemand::demand_only(40.0), &[1, 0]).unwrap();
/// assert_eq!(c.indices().collect::<Vec<_>>(), vec![1]);
/// ```
pub fn commit_in_order(
    fleet: &Fleet,
    hour: HourDemand,
    priority: &[usize],
) -> Result<Commitment, DispatchError> {
    let slack = hour.slack_mw();
    let mut commitment = Commitment::EMPTY;
    let mut min_sum = 0.0;
    let mut max_sum = 0.0;

    for &i in priority {
        let unit = &fleet[i];
        if min_sum + unit.p_min > hour.demand_mw + slack {
            continue;
        }
        commitment.insert(i);
        min_sum += unit.p_min;
        max_sum += unit.p_max;
        if hour.is_covered_by(min_sum, max_sum) {
            return Ok(commitment);
        }
    }

    Err(DispatchError::NoFeasibleCommitment {
        demand_mw: hour.demand_mw,
        reserve_mw: hour.reserve_mw,
    })
}
