//! CSV export for benchmark records and strategy summaries.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::bench::{BenchmarkReport, StrategyRecord};
use crate::dispatch::Commitment;

/// Fixed leading columns of the record table; one `p_<unit id>` column
/// per unit follows.
const RECORD_HEADER: &str = "hour,strategy,demand_mw,reserve_mw,status,cost,deviation_pct,\
                             committed,priority,lambda,ranking_s,solve_s,elapsed_s";

/// Column header of the summary table.
const SUMMARY_HEADER: &str = "strategy,hours,failed_hours,optimal_hours,mean_cost,total_cost,\
                              mean_deviation_pct,max_deviation_pct,mean_elapsed_s,\
                              total_elapsed_s,total_ranking_s,total_solve_s";

/// Exports the hour × strategy record table to a CSV file.
///
/// # Arguments
///
/// * `report` - Complete benchmark report
/// * `path` - Output file path
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_records_csv(report: &BenchmarkReport, path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    write_records_csv(report, io::BufWriter::new(file))
}

/// Exports the per-strategy summary table to a CSV file.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_summary_csv(report: &BenchmarkReport, path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    write_summary_csv(report, io::BufWriter::new(file))
}

/// Writes one row per (hour, strategy) to any writer.
///
/// Failed records leave cost, deviation, commitment, lambda and unit
/// outputs empty; `status` carries the error kind. Apart from the timing
/// columns the output is deterministic for a fixed seed.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_records_csv(report: &BenchmarkReport, writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    let header: Vec<String> = RECORD_HEADER
        .split(',')
        .map(|h| h.trim().to_string())
        .chain(report.units.iter().map(|id| format!("p_{id}")))
        .collect();
    wtr.write_record(&header)?;

    for hour in &report.hours {
        for record in &hour.strategies {
            let mut row = vec![
                hour.hour.to_string(),
                record.strategy.code().to_string(),
                format!("{:.4}", hour.demand.demand_mw),
                format!("{:.4}", hour.demand.reserve_mw),
                status(record).to_string(),
                opt(record.cost(), 4),
                opt(record.deviation_pct, 6),
                record
                    .commitment()
                    .map(|c| label(c, &report.units))
                    .unwrap_or_default(),
                record
                    .priority
                    .iter()
                    .map(|&i| report.units[i].as_str())
                    .collect::<Vec<_>>()
                    .join(">"),
                opt(record.result().map(|r| r.lambda), 6),
                format!("{:.6}", record.ranking_time.as_secs_f64()),
                format!("{:.6}", record.solve_time.as_secs_f64()),
                format!("{:.6}", record.elapsed().as_secs_f64()),
            ];
            match record.result() {
                Some(r) => row.extend(r.outputs_mw.iter().map(|p| format!("{p:.4}"))),
                None => row.extend(report.units.iter().map(|_| String::new())),
            }
            wtr.write_record(&row)?;
        }
    }

    wtr.flush()?;
    Ok(())
}

/// Writes one row per strategy to any writer.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_summary_csv(report: &BenchmarkReport, writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    wtr.write_record(SUMMARY_HEADER.split(',').map(str::trim))?;

    for s in &report.summaries {
        wtr.write_record(&[
            s.strategy.code().to_string(),
            s.hours.to_string(),
            s.failed_hours.to_string(),
            s.optimal_hours.to_string(),
            format!("{:.4}", s.mean_cost),
            format!("{:.4}", s.total_cost),
            opt(s.mean_deviation_pct, 6),
            opt(s.max_deviation_pct, 6),
            format!("{:.6}", s.mean_elapsed.as_secs_f64()),
            format!("{:.6}", s.total_elapsed.as_secs_f64()),
            format!("{:.6}", s.total_ranking.as_secs_f64()),
            format!("{:.6}", s.total_solve.as_secs_f64()),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

fn status(record: &StrategyRecord) -> &'static str {
    record.error().map_or("ok", |e| e.kind())
}

fn opt(value: Option<f64>, precision: usize) -> String {
    value.map_or_else(String::new, |v| format!("{v:.precision$}"))
}

fn label(commitment: Commitment, units: &[String]) -> String {
    commitment
        .indices()
        .map(|i| units[i].as_str())
        .collect::<Vec<_>>()
        .join("+")
}
