//! Benchmark harness comparing heuristics against the brute-force optimum.

/// Hour loop and per-strategy timing.
pub mod harness;
/// Per (hour, strategy) records.
pub mod record;
/// Run output and its text rendering.
pub mod report;
/// Per-strategy aggregates.
pub mod summary;

pub use harness::Benchmark;
pub use record::{HourRecord, StrategyRecord};
pub use report::BenchmarkReport;
pub use summary::StrategySummary;
