use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use qsim::BackendKind;
use tracing::{debug, error};

/// Compile and execute an OPENQASM 2.0 source file against a simulation backend.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the OPENQASM source file.
    source: PathBuf,

    /// Which simulation backend to run against.
    #[arg(long, value_enum)]
    backend: BackendKind,

    /// Number of shots to execute.
    #[arg(long, default_value_t = 1000)]
    shots: u32,

    /// Seed the backend's PRNG for a reproducible run.
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let source = match std::fs::read_to_string(&cli.source) {
        Ok(s) => s,
        Err(e) => {
            error!(path = %cli.source.display(), error = %e, "failed to read source file");
            return ExitCode::FAILURE;
        }
    };

    debug!(path = %cli.source.display(), shots = cli.shots, "running circuit");

    match qsim::run_source(&source, cli.backend, cli.shots, cli.seed) {
        Ok(histogram) => {
            let mut outcomes: Vec<_> = histogram.into_iter().collect();
            outcomes.sort();
            for (outcome, count) in outcomes {
                println!("{outcome}: {count}");
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
