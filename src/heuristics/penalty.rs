use super::{HourContext, Heuristic, Strategy};

/// ISG: greedy ranking that re-scores the remaining candidates after each
/// pick.
///
/// With `r` the capacity still missing after the units picked so far, a
/// candidate is scored by its average cost when serving
/// `clamp(r, p_min, p_max)`, plus a penalty that grows with the number of
/// units already picked and with the part of `r` it cannot cover:
///
/// ```text
/// score = avg_cost(served) + penalty_per_mw · (k + 1) · max(r − p_max, 0) / (demand + reserve)
/// ```
///
/// Small units that leave most of the requirement uncovered are pushed
/// back, so the load is not spread across many of them.
#[derive(Debug, Clone, Copy)]
pub struct MultiUnitPenalty {
    pub penalty_per_mw: f64,
}

impl MultiUnitPenalty {
    pub fn new(penalty_per_mw: f64) -> Self {
        Self { penalty_per_mw }
    }
}

impl Default for MultiUnitPenalty {
    fn default() -> Self {
        Self::new(1000.0)
    }
}

impl Heuristic for MultiUnitPenalty {
    fn strategy(&self) -> Strategy {
        Strategy::Isg
    }

    fn priority(&self, ctx: &HourContext<'_>) -> Vec<usize> {
        let fleet = ctx.fleet;
        let required = ctx.hour.required_capacity_mw();
        let scale = required.max(1.0);

        let mut remaining: Vec<usize> = (0..fleet.len()).collect();
        let mut order = Vec::with_capacity(fleet.len());
        let mut picked_max = 0.0;

        while !remaining.is_empty() {
            let missing = required - picked_max;
            let picked = order.len() as f64;

            let mut best = 0;
            let mut best_score = f64::INFINITY;
            for (slot, &i) in remaining.iter().enumerate() {
                let unit = &fleet[i];
                let served = missing.clamp(unit.p_min, unit.p_max);
                let shortfall = (missing - unit.p_max).max(0.0);
                let score = unit.average_cost(served)
                    + self.penalty_per_mw * (picked + 1.0) * shortfall / scale;
                if score < best_score {
                    best = slot;
                    best_score = score;
                }
            }

            let i = remaining.remove(best);
            picked_max += fleet[i].p_max;
            order.push(i);
        }

        order
    }
}
