use rand::{Rng, SeedableRng, rngs::StdRng, seq::SliceRandom};
use tracing::debug;

use super::{HourContext, Heuristic, Strategy, commit_in_order};

/// ITR: ranks units by how often they appear in cheap random commitments.
///
/// Each trial shuffles the fleet, commits from the shuffled order with
/// the shared rule and dispatches the result. Trials whose cost falls at
/// or below the `elite_percentile` of successful costs form the elite
/// set; units are ranked by how many elite trials include them.
///
/// The heuristic is reproducible for a fixed `seed`: hour `h` draws from
/// a generator seeded with `seed + h`.
#[derive(Debug, Clone, Copy)]
pub struct RelevanceTable {
    pub trials: usize,
    pub elite_percentile: f64,
    pub seed: u64,
}

impl RelevanceTable {
    pub fn new(trials: usize, elite_percentile: f64, seed: u64) -> Self {
        Self {
            trials,
            elite_percentile,
            seed,
        }
    }

    /// Generator used for the hour at `index`.
    pub fn hour_rng(&self, index: usize) -> StdRng {
        StdRng::seed_from_u64(self.seed.wrapping_add(index as u64))
    }

    /// Elite appearance count per fleet index, drawing trials from `rng`.
    pub fn frequencies<R: Rng + ?Sized>(&self, ctx: &HourContext<'_>, rng: &mut R) -> Vec<usize> {
        let fleet = ctx.fleet;
        let mut order: Vec<usize> = (0..fleet.len()).collect();
        let mut outcomes = Vec::with_capacity(self.trials);

        for _ in 0..self.trials {
            order.shuffle(rng);
            let Ok(commitment) = commit_in_order(fleet, ctx.hour, &order) else {
                continue;
            };
            if let Ok(result) = ctx.solver.solve(fleet, commitment, ctx.hour.demand_mw) {
                outcomes.push((commitment, result.total_cost));
            }
        }

        let mut counts = vec![0; fleet.len()];
        if outcomes.is_empty() {
            debug!(hour = ctx.index, "no successful relevance trials");
            return counts;
        }

        let mut costs: Vec<f64> = outcomes.iter().map(|&(_, cost)| cost).collect();
        costs.sort_by(f64::total_cmp);
        let cut = ((costs.len() as f64 * self.elite_percentile / 100.0).ceil() as usize)
            .clamp(1, costs.len());
        let threshold = costs[cut - 1];

        for (commitment, cost) in &outcomes {
            if *cost <= threshold {
                for i in commitment.indices() {
                    counts[i] += 1;
                }
            }
        }

        debug!(
            hour = ctx.index,
            successful = outcomes.len(),
            threshold,
            "relevance table built"
        );
        counts
    }

    /// Priority order drawn from an explicit generator.
    pub fn priority_with_rng<R: Rng + ?Sized>(
        &self,
        ctx: &HourContext<'_>,
        rng: &mut R,
    ) -> Vec<usize> {
        let counts = self.frequencies(ctx, rng);
        let mut order: Vec<usize> = (0..counts.len()).collect();
        order.sort_by(|&i, &j| counts[j].cmp(&counts[i]));
        order
    }
}

impl Default for RelevanceTable {
    fn default() -> Self {
        Self::new(200, 25.0, 0)
    }
}

impl Heuristic for RelevanceTable {
    fn strategy(&self) -> Strategy {
        Strategy::Itr
    }

    fn priority(&self, ctx: &HourContext<'_>) -> Vec<usize> {
        let mut rng = self.hour_rng(ctx.index);
        self.priority_with_rng(ctx, &mut rng)
    }
}
