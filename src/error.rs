//! Error types for fleet construction and per-hour dispatch.

use thiserror::Error;

/// Recoverable failures raised while committing or dispatching one hour.
///
/// The benchmark harness records these per (hour, strategy) and keeps going.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DispatchError {
    /// The committed set cannot meet demand within its output bounds.
    #[error(
        "infeasible dispatch: demand {demand_mw:.3} MW outside committed range \
         [{min_mw:.3}, {max_mw:.3}] MW"
    )]
    InfeasibleDispatch {
        demand_mw: f64,
        min_mw: f64,
        max_mw: f64,
    },

    /// No subset considered by a strategy can cover the hour.
    #[error("no feasible commitment for demand {demand_mw:.3} MW (reserve {reserve_mw:.3} MW)")]
    NoFeasibleCommitment { demand_mw: f64, reserve_mw: f64 },

    /// Lambda bisection hit its iteration cap before meeting tolerance.
    #[error(
        "lambda iteration did not converge after {iterations} iterations \
         (residual: {residual_mw:.2e} MW)"
    )]
    Convergence { iterations: usize, residual_mw: f64 },

    /// The commitment names units the fleet does not have.
    #[error("commitment {bits:#x} references units beyond a fleet of {units}")]
    UnknownUnits { bits: u64, units: usize },
}

impl DispatchError {
    /// Short machine-readable tag used in exported tables.
    pub fn kind(&self) -> &'static str {
        match self {
            DispatchError::InfeasibleDispatch { .. } => "infeasible_dispatch",
            DispatchError::NoFeasibleCommitment { .. } => "no_feasible_commitment",
            DispatchError::Convergence { .. } => "convergence",
            DispatchError::UnknownUnits { .. } => "unknown_units",
        }
    }
}

/// Fatal validation failures for fleet and demand data.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FleetError {
    #[error("fleet has no generating units")]
    Empty,

    #[error("fleet has {0} units, at most {max} are supported", max = crate::fleet::MAX_UNITS)]
    TooManyUnits(usize),

    #[error("duplicate unit id \"{0}\"")]
    DuplicateId(String),

    #[error("unit \"{id}\": {message}")]
    InvalidUnit { id: String, message: String },

    #[error("hour {hour}: {message}")]
    InvalidDemand { hour: usize, message: String },

    #[error("reserve profile has {reserve} entries but demand profile has {demand}")]
    LengthMismatch { demand: usize, reserve: usize },
}
