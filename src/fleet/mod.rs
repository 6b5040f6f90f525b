//! Unit registry: generating units, the validated fleet, and hourly demand.

/// Hourly demand and spinning reserve.
pub mod demand;
/// Validated, ordered unit collection.
pub mod registry;
/// Single-unit parameters and cost curve.
pub mod unit;

pub use demand::{DemandProfile, HourDemand};
pub use registry::Fleet;
pub use unit::GeneratingUnit;

/// Largest fleet a [`Commitment`](crate::dispatch::Commitment) bitmask can hold.
pub const MAX_UNITS: usize = 64;
