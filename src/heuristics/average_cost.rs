use super::{HourContext, Heuristic, Strategy, rank_ascending};

/// ISA: ranks units by average cost at full load, `cost(p_max) / p_max`.
#[derive(Debug, Default, Clone, Copy)]
pub struct FullLoadAverageCost;

impl Heuristic for FullLoadAverageCost {
    fn strategy(&self) -> Strategy {
        Strategy::Isa
    }

    fn priority(&self, ctx: &HourContext<'_>) -> Vec<usize> {
        let scores: Vec<f64> = ctx
            .fleet
            .iter()
            .map(|u| u.average_cost(u.p_max))
            .collect();
        rank_ascending(&scores)
    }
}

/// ISD: ranks units by the lowest average cost each can reach inside its
/// operating band.
///
/// The minimum of `a·P + b + c/P` sits at `P* = sqrt(c/a)`; it is clipped
/// to `[p_min, p_max]`, and linear units bottom out at `p_max`.
#[derive(Debug, Default, Clone, Copy)]
pub struct OptimalAverageCost;

impl Heuristic for OptimalAverageCost {
    fn strategy(&self) -> Strategy {
        Strategy::Isd
    }

    fn priority(&self, ctx: &HourContext<'_>) -> Vec<usize> {
        let scores: Vec<f64> = ctx
            .fleet
            .iter()
            .map(|u| u.average_cost(u.min_average_cost_output()))
            .collect();
        rank_ascending(&scores)
    }
}
