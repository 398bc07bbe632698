//! Command-line interface

use std::path::PathBuf;

use clap::Parser;

pub mod commands;
pub mod formatters;
pub mod output;

pub use commands::Commands;

/// assessrec - recommend assessments for a hiring query or job posting
#[derive(Parser, Debug)]
#[command(name = "assessrec", version, about, long_about = None)]
pub struct Cli {
    /// Config file (replaces the global and project config files)
    #[arg(long, global = true, env = "ASSESSREC_CONFIG")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Disable logging
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Machine-readable JSON output on stdout
    #[arg(long, global = true)]
    pub robot: bool,

    #[command(subcommand)]
    pub command: Commands,
}
