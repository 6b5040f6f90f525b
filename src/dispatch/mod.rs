//! Continuous economic dispatch for a fixed committed set.

/// Lambda-iteration solver.
pub mod solver;
/// Commitment bitmask and dispatch result.
pub mod types;

pub use solver::LambdaSolver;
pub use types::{Commitment, DispatchResult};
