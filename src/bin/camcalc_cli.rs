//! camcalc CLI - Camera design report generator
//!
//! Reads input.json, writes results.json (sorted keys) by default.
//! Errors go to stdout as JSON; logs go to stderr.
//! Returns 2 when the design itself is rejected, 1 on I/O problems.

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

use camcalc::{
    hashing::sorted_pretty_json,
    io::{load_input, write_json},
    Calculator, PipelineError,
};

#[derive(Parser)]
#[command(name = "camcalc")]
#[command(about = "Machine-vision camera design calculator", version)]
struct Cli {
    /// Input parameters (JSON)
    #[arg(short, long, default_value = "input.json")]
    input: PathBuf,

    /// Where to write the report
    #[arg(short, long, default_value = "results.json")]
    output: PathBuf,

    /// Print the report to stdout instead of writing it
    #[arg(long)]
    stdout: bool,

    /// Also write a run manifest (hashes, timestamp, report)
    #[arg(long)]
    manifest: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn run(cli: &Cli) -> Result<(), PipelineError> {
    let raw = load_input(&cli.input)?;
    let calculator = Calculator::new();

    let manifest = calculator.run(&raw)?;
    log::info!("report {} for input {}", manifest.report_hash, manifest.input_hash);

    if cli.stdout {
        println!("{}", sorted_pretty_json(&manifest.report)?);
    } else {
        write_json(&cli.output, &manifest.report)?;
        println!("Wrote results to {}", cli.output.display());
    }

    if let Some(path) = &cli.manifest {
        write_json(path, &manifest)?;
    }

    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let output = serde_json::json!({ "error": e.to_string() });
            println!("{}", output);
            if e.is_design_error() {
                ExitCode::from(2)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}
