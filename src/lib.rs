//! `brian-api-test` library crate.
//!
//! The binary (`brian`) is a thin wrapper around this library so that:
//!
//! - the check and capture flows are testable without spawning processes
//! - the integration suite under `tests/` drives the same code as the CLI
//! - the JSON diff stays usable on its own

pub mod app;
pub mod capture;
pub mod cli;
pub mod compare;
pub mod config;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod report;
pub mod telemetry;
