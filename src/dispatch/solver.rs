//! Equal incremental cost dispatch by lambda bisection.
//!
//! For a committed set, the cost-minimizing split of demand puts every
//! unit that is not pinned at a bound on the same incremental cost λ:
//! `2aᵢPᵢ + bᵢ = λ`. The clamped output sum is non-decreasing in λ, so λ
//! is found by bisection and then refined in closed form over the free
//! units.

use tracing::debug;

use crate::error::DispatchError;
use crate::fleet::Fleet;

use super::types::{Commitment, DispatchResult};

/// Bracket width (relative to |λ|) below which bisection stops making progress.
const LAMBDA_EPS: f64 = 1e-12;

/// Lambda-iteration dispatch solver.
///
/// Stateless apart from its numerical settings; `solve` is deterministic
/// and may be called concurrently.
///
/// # Examples
///
/// ```
/// use thermal_dispatch::dispatch::{Commitment, LambdaSolver};
/// use thermal_dispatch::fleet::{Fleet, GeneratingUnit};
///
/// let fleet = Fleet::new(vec![
///     GeneratingUnit::new("A", 10.0, 50.0, 0.01, 2.0, 0.0),
///     GeneratingUnit::new("B", 10.0, 50.0, 0.02, 1.5, 0.0),
/// ])
/// .unwrap();
/// let result = LambdaSolver::default()
///     .solve(&fleet, Commitment::all(2), 60.0)
///     .unwrap();
/// assert!((result.total_output_mw() - 60.0).abs() < 1e-6);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LambdaSolver {
    /// Relative demand residual accepted as converged.
    pub tolerance: f64,
    /// Bisection step cap; exceeding it is a convergence failure.
    pub max_iterations: usize,
}

impl Default for LambdaSolver {
    fn default() -> Self {
        Self {
            tolerance: 1e-6,
            max_iterations: 100,
        }
    }
}

impl LambdaSolver {
    pub fn new(tolerance: f64, max_iterations: usize) -> Self {
        Self {
            tolerance,
            max_iterations,
        }
    }

    /// Splits `demand_mw` across the committed units at minimum total cost.
    ///
    /// # Errors
    ///
    /// * `InfeasibleDispatch` if demand lies outside `[Σ p_min, Σ p_max]`
    ///   of the committed units.
    /// * `Convergence` if bisection exhausts `max_iterations`, or the
    ///   bracket collapses with a residual no unit can absorb.
    /// * `UnknownUnits` if `commitment` has bits beyond the fleet.
    pub fn solve(
        &self,
        fleet: &Fleet,
        commitment: Commitment,
        demand_mw: f64,
    ) -> Result<DispatchResult, DispatchError> {
        if !commitment.fits(fleet.len()) {
            return Err(DispatchError::UnknownUnits {
                bits: commitment.bits(),
                units: fleet.len(),
            });
        }

        let units: Vec<usize> = commitment.indices().collect();
        let (min_mw, max_mw) = commitment.bound_sums(fleet);
        let tol = self.tolerance * demand_mw.max(1.0);

        if demand_mw < min_mw - tol || demand_mw > max_mw + tol {
            return Err(DispatchError::InfeasibleDispatch {
                demand_mw,
                min_mw,
                max_mw,
            });
        }

        let mut outputs = vec![0.0; fleet.len()];

        if units.is_empty() {
            return Ok(DispatchResult {
                commitment,
                outputs_mw: outputs,
                total_cost: 0.0,
                lambda: 0.0,
                iterations: 0,
            });
        }

        // Demand on a bound sum pins every unit to that bound.
        if (demand_mw - min_mw).abs() <= tol {
            for &i in &units {
                outputs[i] = fleet[i].p_min;
            }
            let lambda = units
                .iter()
                .map(|&i| fleet[i].marginal_cost(fleet[i].p_min))
                .fold(f64::INFINITY, f64::min);
            return Ok(finish(fleet, commitment, outputs, lambda, 0));
        }
        if (demand_mw - max_mw).abs() <= tol {
            for &i in &units {
                outputs[i] = fleet[i].p_max;
            }
            let lambda = units
                .iter()
                .map(|&i| fleet[i].marginal_cost(fleet[i].p_max))
                .fold(f64::NEG_INFINITY, f64::max);
            return Ok(finish(fleet, commitment, outputs, lambda, 0));
        }

        let mut lo = units
            .iter()
            .map(|&i| fleet[i].marginal_cost(fleet[i].p_min))
            .fold(f64::INFINITY, f64::min)
            - 1.0;
        let mut hi = units
            .iter()
            .map(|&i| fleet[i].marginal_cost(fleet[i].p_max))
            .fold(f64::NEG_INFINITY, f64::max)
            + 1.0;
        let mut residual = f64::NAN;

        for iteration in 1..=self.max_iterations {
            let mid = 0.5 * (lo + hi);
            let total: f64 = units.iter().map(|&i| fleet[i].output_at(mid)).sum();
            residual = demand_mw - total;

            if residual.abs() <= tol {
                let lambda = refine(fleet, &units, demand_mw, mid, &mut outputs);
                return Ok(finish(fleet, commitment, outputs, lambda, iteration));
            }

            if residual > 0.0 {
                lo = mid;
            } else {
                hi = mid;
            }

            if hi - lo <= LAMBDA_EPS * hi.abs().max(1.0) {
                // Collapsed onto a step in the supply curve (flat cost units).
                return absorb_step(fleet, &units, demand_mw, lo, hi, tol, &mut outputs)
                    .map(|()| finish(fleet, commitment, outputs, 0.5 * (lo + hi), iteration))
                    .map_err(|residual_mw| {
                        debug!(residual_mw, iteration, "lambda bracket collapsed");
                        DispatchError::Convergence {
                            iterations: iteration,
                            residual_mw,
                        }
                    });
            }
        }

        debug!(
            residual_mw = residual,
            max_iterations = self.max_iterations,
            "lambda iteration cap reached"
        );
        Err(DispatchError::Convergence {
            iterations: self.max_iterations,
            residual_mw: residual,
        })
    }
}

/// Writes outputs at `lambda` and re-solves λ exactly over the units that
/// are strictly inside their bounds, with pinned units held fixed.
fn refine(fleet: &Fleet, units: &[usize], demand_mw: f64, lambda: f64, outputs: &mut [f64]) -> f64 {
    let mut fixed_mw = 0.0;
    let mut inv_slope = 0.0;
    let mut offset = 0.0;
    let mut free = Vec::with_capacity(units.len());

    for &i in units {
        let unit = &fleet[i];
        let p = unit.output_at(lambda);
        outputs[i] = p;
        if unit.a > 0.0 && p > unit.p_min && p < unit.p_max {
            inv_slope += 1.0 / (2.0 * unit.a);
            offset += unit.b / (2.0 * unit.a);
            free.push(i);
        } else {
            fixed_mw += p;
        }
    }

    if free.is_empty() {
        return lambda;
    }

    let exact = (demand_mw - fixed_mw + offset) / inv_slope;
    for &i in &free {
        let unit = &fleet[i];
        outputs[i] = ((exact - unit.b) / (2.0 * unit.a)).clamp(unit.p_min, unit.p_max);
    }
    exact
}

/// Hands the remaining residual to units whose incremental cost range
/// overlaps the collapsed bracket, in fleet order.
///
/// Returns the leftover residual on failure.
fn absorb_step(
    fleet: &Fleet,
    units: &[usize],
    demand_mw: f64,
    lo: f64,
    hi: f64,
    tol: f64,
    outputs: &mut [f64],
) -> Result<(), f64> {
    for &i in units {
        outputs[i] = fleet[i].output_at(lo);
    }
    let mut residual = demand_mw - units.iter().map(|&i| outputs[i]).sum::<f64>();

    // Flat units priced inside the bracket first, then any sloped unit
    // whose range still overlaps it.
    for flat_pass in [true, false] {
        for &i in units {
            if residual <= tol {
                break;
            }
            let unit = &fleet[i];
            if (unit.a == 0.0) != flat_pass {
                continue;
            }
            let marginal =
                unit.marginal_cost(unit.p_min) <= hi && unit.marginal_cost(unit.p_max) >= lo;
            if marginal {
                let take = residual.min(unit.p_max - outputs[i]).max(0.0);
                outputs[i] += take;
                residual -= take;
            }
        }
    }

    if residual.abs() <= tol {
        Ok(())
    } else {
        Err(residual)
    }
}

fn finish(
    fleet: &Fleet,
    commitment: Commitment,
    outputs_mw: Vec<f64>,
    lambda: f64,
    iterations: usize,
) -> DispatchResult {
    let total_cost = commitment
        .indices()
        .map(|i| fleet[i].cost(outputs_mw[i]))
        .sum();
    DispatchResult {
        commitment,
        outputs_mw,
        total_cost,
        lambda,
        iterations,
    }
}
