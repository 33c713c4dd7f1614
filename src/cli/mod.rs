//! Command-line parsing for the WACC calculator.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the lookup/formula code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "wacc", version, about = "WACC calculator driven by activity and macro reference tables")]
pub struct Cli {
    /// Directory holding the reference tables (overrides `WACC_DATA_DIR`).
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Log resolution details to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Compute nominal and real WACC for an activity and revenue.
    Compute(ComputeArgs),
    /// List the activities available in the activity table.
    Activities,
}

#[derive(Debug, Args, Clone)]
pub struct ComputeArgs {
    /// Activity name, exactly as in the activity table.
    #[arg(short, long)]
    pub activity: String,

    /// Declared revenue. Accepts `10.000.000,00` style values.
    #[arg(short = 'f', long, allow_hyphen_values = true)]
    pub revenue: String,

    /// The company is taxed under the real-profit regime (keeps the table `IR`).
    #[arg(long)]
    pub real_profit: bool,

    /// Print the result as JSON instead of a report.
    #[arg(long)]
    pub json: bool,

    /// Write the request and result to a JSON file.
    #[arg(long)]
    pub export: Option<PathBuf>,
}
