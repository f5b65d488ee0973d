//! Command-line parsing for the `brian` binary.
//!
//! Parsing is kept apart from the check/capture flows so those stay callable
//! from tests without going through argv.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "brian",
    version,
    about = "Golden-file checks for the project-brian CSDB conversion service"
)]
pub struct Cli {
    #[command(flatten)]
    pub service: ServiceArgs,

    /// Log at debug level (overridden by RUST_LOG).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Convert fixtures and compare the responses with their golden files.
    Check(CheckArgs),
    /// Convert fixtures and overwrite their golden files with the responses.
    ///
    /// Aborts on the first failing dataset.
    Capture(CaptureArgs),
}

/// Overrides for the service/environment configuration.
#[derive(Debug, Args, Clone, Default)]
pub struct ServiceArgs {
    /// Service base URL (default: $PROJECT_BRIAN_URL or http://localhost:8083).
    #[arg(long, global = true, value_name = "URL")]
    pub url: Option<String>,

    /// Directory holding `inputs/` and `outputs/`.
    #[arg(long, global = true, value_name = "DIR")]
    pub resources: Option<PathBuf>,

    /// Request timeout in seconds.
    #[arg(long, global = true, value_name = "SECS")]
    pub timeout: Option<u64>,
}

#[derive(Debug, Args, Clone)]
pub struct CheckArgs {
    /// Dataset names (default: the standard capture set).
    pub datasets: Vec<String>,

    /// Report every mismatch rather than stopping at the first.
    #[arg(long)]
    pub all: bool,

    /// Compare whole records, including sourceDatasets and section.
    #[arg(long)]
    pub strict: bool,
}

#[derive(Debug, Args, Clone)]
pub struct CaptureArgs {
    /// Dataset names (default: the standard capture set).
    pub datasets: Vec<String>,
}
