//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - resolves configuration (defaults, `.env`/environment, flags)
//! - runs the check or capture flow
//! - prints a per-dataset summary

use std::time::Duration;

use clap::Parser;

use crate::capture::{self, DEFAULT_DATASETS};
use crate::cli::{CaptureArgs, CheckArgs, Command, ServiceArgs};
use crate::config::ServiceConfig;
use crate::data::BrianClient;
use crate::error::AppError;
use crate::io::FixtureLayout;

pub mod pipeline;

use pipeline::CheckOptions;

/// Entry point for the `brian` binary.
pub fn run() -> Result<(), AppError> {
    let cli = crate::cli::Cli::parse();
    crate::telemetry::init_tracing(if cli.verbose { "debug" } else { "info" });

    let config = resolve_config(&cli.service)?;
    match cli.command {
        Command::Check(args) => handle_check(&config, args),
        Command::Capture(args) => handle_capture(&config, args),
    }
}

/// Apply CLI overrides on top of the environment configuration.
pub fn resolve_config(args: &ServiceArgs) -> Result<ServiceConfig, AppError> {
    apply_overrides(ServiceConfig::from_env()?, args)
}

fn apply_overrides(
    mut config: ServiceConfig,
    args: &ServiceArgs,
) -> Result<ServiceConfig, AppError> {
    if let Some(url) = &args.url {
        config = config.with_base_url(url)?;
    }
    if let Some(dir) = &args.resources {
        config.resources_dir = dir.clone();
    }
    if let Some(secs) = args.timeout {
        if secs == 0 {
            return Err(AppError::Config("timeout must be at least one second".into()));
        }
        config.timeout = Duration::from_secs(secs);
    }
    Ok(config)
}

fn datasets_or_default(datasets: Vec<String>) -> Vec<String> {
    if datasets.is_empty() {
        DEFAULT_DATASETS.iter().map(|s| s.to_string()).collect()
    } else {
        datasets
    }
}

/// Check each dataset independently; the first failure decides the exit code.
fn handle_check(config: &ServiceConfig, args: CheckArgs) -> Result<(), AppError> {
    let client = BrianClient::new(config)?;
    let layout = FixtureLayout::from_config(config);
    let options = CheckOptions {
        strict: args.strict,
        all: args.all,
    };

    let datasets = datasets_or_default(args.datasets);
    let mut failures: Vec<(String, AppError)> = Vec::new();
    for dataset in &datasets {
        let outcome = pipeline::check_dataset(&client, &layout, dataset, options);
        match outcome {
            Ok(report) if report.passed() => {
                println!("ok    {dataset} ({} records)", report.records);
            }
            Ok(report) => {
                println!("FAIL  {dataset} ({} mismatches)", report.mismatches.len());
                for m in &report.mismatches {
                    println!("{m}\n");
                }
                if let Err(err) = report.into_result() {
                    failures.push((dataset.clone(), err));
                }
            }
            Err(err) => {
                println!("ERROR {dataset}: {err}");
                failures.push((dataset.clone(), err));
            }
        }
    }

    summarize_failures(datasets.len(), failures)
}

/// Collapse per-dataset failures into one short error for `main` to print.
///
/// `handle_check` has already printed each diagnostic to stdout; only the
/// dataset names travel in the error.
fn summarize_failures(total: usize, failures: Vec<(String, AppError)>) -> Result<(), AppError> {
    let Some(code) = failures.first().map(|(_, err)| err.exit_code()) else {
        return Ok(());
    };
    Err(AppError::ChecksFailed {
        total,
        datasets: failures.into_iter().map(|(dataset, _)| dataset).collect(),
        code,
    })
}

fn handle_capture(config: &ServiceConfig, args: CaptureArgs) -> Result<(), AppError> {
    let client = BrianClient::new(config)?;
    let layout = FixtureLayout::from_config(config);
    let datasets = datasets_or_default(args.datasets);

    for captured in capture::capture_all(&client, &layout, &datasets)? {
        println!(
            "captured {} ({} records) -> {}",
            captured.dataset,
            captured.records,
            captured.path.display()
        );
    }
    Ok(())
}
