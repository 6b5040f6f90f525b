use serde::Deserialize;

/// A thermal generating unit with a convex quadratic cost curve.
///
/// Cost of producing `p` MW for one hour is `a·p² + b·p + c`.
///
/// # Examples
///
/// ```
/// use thermal_dispatch::fleet::GeneratingUnit;
///
/// let unit = GeneratingUnit::new("GT01", 10.0, 50.0, 0.01, 2.0, 5.0);
/// assert_eq!(unit.cost(10.0), 26.0);
/// assert_eq!(unit.marginal_cost(10.0), 2.2);
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GeneratingUnit {
    /// Unique identifier within the fleet.
    pub id: String,
    /// Minimum stable output when committed (MW).
    pub p_min: f64,
    /// Maximum output (MW).
    pub p_max: f64,
    /// Quadratic cost coefficient ($/MW²h), must be >= 0.
    pub a: f64,
    /// Linear cost coefficient ($/MWh).
    pub b: f64,
    /// Fixed cost while committed ($/h).
    pub c: f64,
}

impl GeneratingUnit {
    /// Creates a unit. Validation happens when the unit joins a [`Fleet`](super::Fleet).
    pub fn new(id: impl Into<String>, p_min: f64, p_max: f64, a: f64, b: f64, c: f64) -> Self {
        Self {
            id: id.into(),
            p_min,
            p_max,
            a,
            b,
            c,
        }
    }

    /// Hourly cost at output `p`.
    pub fn cost(&self, p: f64) -> f64 {
        (self.a * p + self.b) * p + self.c
    }

    /// Incremental cost `2a·p + b` at output `p`.
    pub fn marginal_cost(&self, p: f64) -> f64 {
        2.0 * self.a * p + self.b
    }

    /// Average cost `cost(p) / p`; the limit `b` when `p` is zero.
    pub fn average_cost(&self, p: f64) -> f64 {
        if p > 0.0 { self.cost(p) / p } else { self.b }
    }

    /// Slope of the incremental cost curve (`2a`).
    pub fn odf(&self) -> f64 {
        2.0 * self.a
    }

    /// Output in `[p_min, p_max]` that minimizes average cost.
    ///
    /// Marginal equals average cost where `a·p² = c`. A linear curve has
    /// falling average cost everywhere, so it bottoms out at `p_max`.
    pub fn min_average_cost_output(&self) -> f64 {
        if self.a <= 0.0 {
            return self.p_max;
        }
        (self.c.max(0.0) / self.a)
            .sqrt()
            .clamp(self.p_min, self.p_max)
    }

    /// Output that equalizes this unit's incremental cost with `lambda`,
    /// clamped to the unit's bounds.
    ///
    /// Units with `a == 0` sit at `p_max` above their linear cost and at
    /// `p_min` otherwise.
    pub fn output_at(&self, lambda: f64) -> f64 {
        if self.a > 0.0 {
            ((lambda - self.b) / (2.0 * self.a)).clamp(self.p_min, self.p_max)
        } else if lambda > self.b {
            self.p_max
        } else {
            self.p_min
        }
    }

    pub(crate) fn validate(&self) -> Result<(), String> {
        let fields = [
            ("p_min", self.p_min),
            ("p_max", self.p_max),
            ("a", self.a),
            ("b", self.b),
            ("c", self.c),
        ];
        if let Some((name, _)) = fields.iter().find(|(_, v)| !v.is_finite()) {
            return Err(format!("{name} must be finite"));
        }
        if self.p_min < 0.0 {
            return Err(format!("p_min must be >= 0, got {}", self.p_min));
        }
        if self.p_min > self.p_max {
            return Err(format!(
                "p_min ({}) must be <= p_max ({})",
                self.p_min, self.p_max
            ));
        }
        if self.a < 0.0 {
            return Err(format!("a must be >= 0 for a convex cost curve, got {}", self.a));
        }
        if self.id.trim().is_empty() {
            return Err("id must not be empty".to_string());
        }
        Ok(())
    }
}
