//! Hourly economic dispatch for thermal units.
//!
//! Priority heuristics choose which units run each hour, a lambda-iteration
//! solver splits demand across the committed set, and a brute-force search
//! provides the optimum every heuristic is benchmarked against.

/// Benchmark harness, records and summaries.
pub mod bench;
pub mod brute_force;
pub mod cli;
pub mod config;
/// Continuous dispatch for a committed set.
pub mod dispatch;
pub mod error;
/// Units, fleet and demand.
pub mod fleet;
pub mod heuristics;
pub mod io;

pub use error::{DispatchError, FleetError};
