use super::{HourContext, Heuristic, Strategy, rank_ascending};

/// ILS: average cost at full load plus the rise in incremental cost across
/// the operating band.
///
/// `score = avg_cost(p_max) + odf_weight · 2a · (p_max − p_min)`
///
/// Units whose incremental cost climbs slowly stay cheap as the shared
/// λ moves, so they rank ahead of equally priced steep units.
#[derive(Debug, Clone, Copy)]
pub struct LagrangeSensitivity {
    pub odf_weight: f64,
}

impl LagrangeSensitivity {
    pub fn new(odf_weight: f64) -> Self {
        Self { odf_weight }
    }
}

impl Default for LagrangeSensitivity {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl Heuristic for LagrangeSensitivity {
    fn strategy(&self) -> Strategy {
        Strategy::Ils
    }

    fn priority(&self, ctx: &HourContext<'_>) -> Vec<usize> {
        let scores: Vec<f64> = ctx
            .fleet
            .iter()
            .map(|u| u.average_cost(u.p_max) + self.odf_weight * u.odf() * (u.p_max - u.p_min))
            .collect();
        rank_ascending(&scores)
    }
}
