//! Benchmark entry point: CLI wiring and config-driven harness construction.

use std::process;

use tracing_subscriber::EnvFilter;

use thermal_dispatch::bench::Benchmark;
use thermal_dispatch::cli::{self, Command};
use thermal_dispatch::config::CaseConfig;
use thermal_dispatch::io::export::{export_records_csv, export_summary_csv};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let opts = match cli::parse_args() {
        Ok(Command::Run(opts)) => opts,
        Ok(Command::Help) => {
            cli::print_usage();
            process::exit(0);
        }
        Err(e) => {
            eprintln!("error: {e}");
            cli::print_usage();
            process::exit(1);
        }
    };

    init_tracing();

    // --case takes priority, then --preset (defaulted to four_unit by the parser)
    let loaded = match (&opts.case, &opts.preset) {
        (Some(path), _) => CaseConfig::from_toml_file(path),
        (None, Some(name)) => CaseConfig::from_preset(name),
        (None, None) => Ok(CaseConfig::four_unit()),
    };
    let mut case = match loaded {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("{e}");
            process::exit(1);
        }
    };

    if let Some(seed) = opts.seed {
        case.benchmark.seed = Some(seed);
    }

    let errors = case.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }

    let (fleet, profile) = match (case.fleet(), case.profile()) {
        (Ok(fleet), Ok(profile)) => (fleet, profile),
        (Err(e), _) | (_, Err(e)) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    };

    let seed = case.resolve_seed();
    let bench = Benchmark::with_strategies(
        fleet,
        case.solver(),
        case.heuristic_settings(seed),
        &case.benchmark.strategies,
    );
    let report = bench.run(&profile);

    println!("{report}");

    if let Some(ref path) = opts.records_out {
        if let Err(e) = export_records_csv(&report, path) {
            eprintln!("error: failed to write records CSV: {e}");
            process::exit(1);
        }
        eprintln!("Records written to {}", path.display());
    }

    if let Some(ref path) = opts.summary_out {
        if let Err(e) = export_summary_csv(&report, path) {
            eprintln!("error: failed to write summary CSV: {e}");
            process::exit(1);
        }
        eprintln!("Summary written to {}", path.display());
    }
}
