use super::{HourContext, Heuristic, Strategy, rank_ascending};

/// ISB: ranks units by incremental cost at minimum load.
#[derive(Debug, Default, Clone, Copy)]
pub struct MinLoadMarginalCost;

impl Heuristic for MinLoadMarginalCost {
    fn strategy(&self) -> Strategy {
        Strategy::Isb
    }

    fn priority(&self, ctx: &HourContext<'_>) -> Vec<usize> {
        let scores: Vec<f64> = ctx
            .fleet
            .iter()
            .map(|u| u.marginal_cost(u.p_min))
            .collect();
        rank_ascending(&scores)
    }
}

/// ISC: ranks units by incremental cost at full load.
#[derive(Debug, Default, Clone, Copy)]
pub struct FullLoadMarginalCost;

impl Heuristic for FullLoadMarginalCost {
    fn strategy(&self) -> Strategy {
        Strategy::Isc
    }

    fn priority(&self, ctx: &HourContext<'_>) -> Vec<usize> {
        let scores: Vec<f64> = ctx
            .fleet
            .iter()
            .map(|u| u.marginal_cost(u.p_max))
            .collect();
        rank_ascending(&scores)
    }
}
