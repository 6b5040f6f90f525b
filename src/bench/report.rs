use std::fmt;

use super::record::HourRecord;
use super::summary::StrategySummary;
use crate::heuristics::Strategy;

/// Everything a benchmark run produced.
#[derive(Debug, Clone)]
pub struct BenchmarkReport {
    /// Base seed the relevance-table heuristic used.
    pub seed: u64,
    /// Unit ids in fleet order.
    pub units: Vec<String>,
    /// Column order of `hours[*].strategies` and `summaries`.
    pub strategies: Vec<Strategy>,
    pub hours: Vec<HourRecord>,
    pub summaries: Vec<StrategySummary>,
}

impl BenchmarkReport {
    pub fn summary(&self, strategy: Strategy) -> Option<&StrategySummary> {
        self.summaries.iter().find(|s| s.strategy == strategy)
    }

    /// Hours where at least one strategy failed.
    pub fn failed_hours(&self) -> usize {
        self.hours
            .iter()
            .filter(|h| h.failures().next().is_some())
            .count()
    }
}

impl fmt::Display for BenchmarkReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Hourly Cost ($/h) ---")?;
        write!(f, "{:>4} {:>10}", "hour", "demand")?;
        for s in &self.strategies {
            write!(f, " {:>12}", s.code())?;
        }
        writeln!(f)?;

        for hour in &self.hours {
            write!(f, "{:>4} {:>10.2}", hour.hour, hour.demand.demand_mw)?;
            for s in &self.strategies {
                match hour.get(*s).and_then(|r| r.cost()) {
                    Some(cost) => write!(f, " {cost:>12.3}")?,
                    None => write!(f, " {:>12}", "failed")?,
                }
            }
            writeln!(f)?;
        }

        writeln!(f)?;
        writeln!(f, "--- Strategy Summary (seed {}) ---", self.seed)?;
        for s in &self.summaries {
            writeln!(f, "{s}")?;
        }
        writeln!(f, "Hours with failures: {}", self.failed_hours())?;
        Ok(())
    }
}
