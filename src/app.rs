//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and parses CLI arguments
//! - installs the `tracing` subscriber
//! - validates the request and runs the WACC pipeline
//! - prints reports and writes optional exports

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command, ComputeArgs};
use crate::domain::{TableConfig, WaccRequest};
use crate::error::{AppError, WaccError};
use crate::events::TracingSink;
use crate::io::table::JsonDirSource;
use crate::math::parse_locale_number;

pub mod pipeline;

/// Entry point for the `wacc` binary.
pub fn run() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = table_config(cli.data_dir.clone(), |key| std::env::var(key).ok());
    let source = JsonDirSource::new(config);

    match cli.command {
        Command::Compute(args) => handle_compute(&source, args),
        Command::Activities => handle_activities(&source),
    }
}

fn handle_compute(source: &JsonDirSource, args: ComputeArgs) -> Result<(), AppError> {
    let request = request_from_args(&args)?;
    let result = pipeline::compute_wacc(source, &request, Some(&TracingSink))?;

    if args.json {
        println!("{}", crate::report::result_json(&result)?);
    } else {
        println!("{}", crate::report::format_result(&request, &result));
    }

    if let Some(path) = &args.export {
        crate::io::export::write_result_json(path, &request, &result)?;
    }

    Ok(())
}

fn handle_activities(source: &JsonDirSource) -> Result<(), AppError> {
    let activities = pipeline::list_activities(source)?;
    println!("{}", crate::report::format_activities(&activities));
    Ok(())
}

/// Build a validated request from CLI arguments.
pub fn request_from_args(args: &ComputeArgs) -> Result<WaccRequest, WaccError> {
    let revenue = parse_revenue(&args.revenue)?;
    WaccRequest::new(args.activity.as_str(), revenue, args.real_profit)
}

/// Parse a declared revenue written with `.` thousands and `,` decimals.
pub fn parse_revenue(text: &str) -> Result<f64, WaccError> {
    parse_locale_number(text).map_err(|_| WaccError::InvalidInput(format!("invalid revenue format: '{text}'")))
}

/// Resolve table locations: `--data-dir`, then environment, then defaults.
pub fn table_config(data_dir: Option<PathBuf>, env: impl Fn(&str) -> Option<String>) -> TableConfig {
    let defaults = TableConfig::default();
    TableConfig {
        data_dir: data_dir
            .or_else(|| env("WACC_DATA_DIR").map(PathBuf::from))
            .unwrap_or(defaults.data_dir),
        activity_file: env("WACC_ACTIVITY_TABLE").unwrap_or(defaults.activity_file),
        parameter_file: env("WACC_PARAMETER_TABLE").unwrap_or(defaults.parameter_file),
        ipca_file: env("WACC_IPCA_TABLE").unwrap_or(defaults.ipca_file),
        size_file: env("WACC_SIZE_TABLE").unwrap_or(defaults.size_file),
    }
}

/// Install a stderr `fmt` subscriber; `RUST_LOG` overrides the default filter.
fn init_tracing(verbose: bool) {
    let default = if verbose { "wacc_calc=debug" } else { "wacc_calc=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    // A subscriber may already be installed when embedded; keep the existing one.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
