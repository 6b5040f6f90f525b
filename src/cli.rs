//! Command-line parsing for the benchmark binary.

use std::env;
use std::path::PathBuf;

use crate::config::CaseConfig;

/// Parsed benchmark options.
#[derive(Debug, Clone, PartialEq)]
pub struct CliOptions {
    pub case: Option<PathBuf>,
    pub preset: Option<String>,
    pub seed: Option<u64>,
    pub records_out: Option<PathBuf>,
    pub summary_out: Option<PathBuf>,
}

/// What the binary should do.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Run(CliOptions),
    Help,
}

/// Parses the process arguments.
///
/// # Errors
///
/// Returns a message describing the first invalid argument.
pub fn parse_args() -> Result<Command, String> {
    let args: Vec<String> = env::args().skip(1).collect();
    parse_args_from(&args)
}

/// Parses an explicit argument list (without the program name).
///
/// # Errors
///
/// Returns a message for unknown flags, missing or malformed values,
/// repeated flags, or `--case` combined with `--preset`.
pub fn parse_args_from(args: &[String]) -> Result<Command, String> {
    let mut i = 0usize;
    let mut case = None;
    let mut preset = None;
    let mut seed = None;
    let mut records_out = None;
    let mut summary_out = None;

    while i < args.len() {
        match args[i].as_str() {
            "--case" => {
                i += 1;
                let path =
                    args.next_or_err(i, "missing value for --case (expected a TOML file path)")?;
                if case.replace(PathBuf::from(path)).is_some() {
                    return Err("--case provided more than once".to_string());
                }
            }
            "--preset" => {
                i += 1;
                let name =
                    args.next_or_err(i, "missing value for --preset (expected a preset name)")?;
                if preset.replace(name.to_string()).is_some() {
                    return Err("--preset provided more than once".to_string());
                }
            }
            "--seed" => {
                i += 1;
                let raw = args.next_or_err(i, "missing value for --seed (expected a u64)")?;
                let value = raw
                    .parse::<u64>()
                    .map_err(|_| format!("--seed value \"{raw}\" is not a valid u64"))?;
                if seed.replace(value).is_some() {
                    return Err("--seed provided more than once".to_string());
                }
            }
            "--records-out" => {
                i += 1;
                let path = args
                    .next_or_err(i, "missing value for --records-out (expected a file path)")?;
                if records_out.replace(PathBuf::from(path)).is_some() {
                    return Err("--records-out provided more than once".to_string());
                }
            }
            "--summary-out" => {
                i += 1;
                let path = args
                    .next_or_err(i, "missing value for --summary-out (expected a file path)")?;
                if summary_out.replace(PathBuf::from(path)).is_some() {
                    return Err("--summary-out provided more than once".to_string());
                }
            }
            "--help" | "-h" => return Ok(Command::Help),
            other => return Err(format!("unknown argument: {other}")),
        }
        i += 1;
    }

    if case.is_some() && preset.is_some() {
        return Err(
            "arguments `--case` and `--preset` are mutually exclusive; choose one source"
                .to_string(),
        );
    }

    if case.is_none() && preset.is_none() {
        preset = Some("four_unit".to_string());
    }

    Ok(Command::Run(CliOptions {
        case,
        preset,
        seed,
        records_out,
        summary_out,
    }))
}

trait SliceArgExt {
    fn next_or_err(&self, index: usize, err: &str) -> Result<&str, String>;
}

impl SliceArgExt for [String] {
    fn next_or_err(&self, index: usize, err: &str) -> Result<&str, String> {
        self.get(index)
            .map(String::as_str)
            .ok_or_else(|| err.to_string())
    }
}

pub fn print_usage() {
    eprintln!("thermal-dispatch: compare unit commitment heuristics against brute force");
    eprintln!();
    eprintln!("Usage: thermal-dispatch [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --case <path>            Load a case from a TOML file");
    eprintln!(
        "  --preset <name>          Use a built-in case ({})",
        CaseConfig::PRESETS.join(", ")
    );
    eprintln!("  --seed <u64>             Override the ITR seed");
    eprintln!("  --records-out <path>     Export hour x strategy records to CSV");
    eprintln!("  --summary-out <path>     Export strategy summaries to CSV");
    eprintln!("  --help                   Show this help message");
    eprintln!();
    eprintln!("If no --case or --preset is given, the four_unit preset is used.");
    eprintln!("Log verbosity follows RUST_LOG (default: info).");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn run(list: &[&str]) -> CliOptions {
        match parse_args_from(&args(list)).expect("parse should succeed") {
            Command::Run(opts) => opts,
            Command::Help => panic!("unexpected help"),
        }
    }

    #[test]
    fn defaults_to_four_unit_preset() {
        let opts = run(&[]);
        assert_eq!(opts.preset.as_deref(), Some("four_unit"));
        assert!(opts.case.is_none());
        assert!(opts.seed.is_none());
    }

    #[test]
    fn supports_case_cli() {
        let opts = run(&["--case", "cases/ten_unit.toml", "--seed", "9"]);
        assert_eq!(
            opts.case.as_deref().and_then(|p| p.to_str()),
            Some("cases/ten_unit.toml")
        );
        assert!(opts.preset.is_none());
        assert_eq!(opts.seed, Some(9));
    }

    #[test]
    fn supports_output_paths() {
        let opts = run(&[
            "--preset",
            "ten_unit",
            "--records-out",
            "r.csv",
            "--summary-out",
            "s.csv",
        ]);
        assert_eq!(opts.preset.as_deref(), Some("ten_unit"));
        assert_eq!(opts.records_out, Some(PathBuf::from("r.csv")));
        assert_eq!(opts.summary_out, Some(PathBuf::from("s.csv")));
    }

    #[test]
    fn help_flag() {
        assert_eq!(parse_args_from(&args(&["--help"])), Ok(Command::Help));
        assert_eq!(parse_args_from(&args(&["--seed", "1", "-h"])), Ok(Command::Help));
    }

    #[test]
    fn rejects_case_with_preset() {
        let err = parse_args_from(&args(&["--case", "a.toml", "--preset", "four_unit"]));
        assert!(err.is_err_and(|e| e.contains("mutually exclusive")));
    }

    #[test]
    fn rejects_bad_seed_and_missing_values() {
        assert!(parse_args_from(&args(&["--seed", "abc"])).is_err());
        assert!(parse_args_from(&args(&["--case"])).is_err());
        assert!(parse_args_from(&args(&["--preset", "a", "--preset", "b"])).is_err());
        assert!(parse_args_from(&args(&["--bogus"])).is_err());
    }
}
