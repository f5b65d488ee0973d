//! Shared "check" workflow used by the CLI and the integration tests.
//!
//! golden load -> fixture upload -> typed decode -> positional comparison
//!
//! Strict mode skips the typed decode on both sides and compares raw JSON.

use serde_json::Value;
use tracing::{error, info};

use crate::compare::{self, Mismatch};
use crate::data::BrianClient;
use crate::domain::TimeSeriesRecord;
use crate::error::AppError;
use crate::io::FixtureLayout;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CheckOptions {
    /// Compare whole records as raw JSON instead of the typed field checks.
    pub strict: bool,
    /// Collect every mismatch instead of stopping at the first.
    pub all: bool,
}

/// Outcome of checking one dataset against its golden file.
#[derive(Debug, Clone)]
pub struct CheckReport {
    pub dataset: String,
    pub records: usize,
    pub mismatches: Vec<Mismatch>,
}

impl CheckReport {
    pub fn passed(&self) -> bool {
        self.mismatches.is_empty()
    }

    /// The first mismatch as an error, or the record count on success.
    pub fn into_result(self) -> Result<usize, AppError> {
        match self.mismatches.into_iter().next() {
            None => Ok(self.records),
            Some(mismatch) => Err(AppError::Mismatch {
                dataset: self.dataset,
                mismatch: Box::new(mismatch),
            }),
        }
    }
}

/// Convert `dataset` through the service and compare it with its golden file.
pub fn check_dataset(
    client: &BrianClient,
    layout: &FixtureLayout,
    dataset: &str,
    options: CheckOptions,
) -> Result<CheckReport, AppError> {
    layout.ensure_outputs_dir(dataset)?;
    if options.strict {
        let expected = layout.load_expected_raw(dataset)?;
        let actual = client.convert_records_raw(layout, dataset)?;
        return Ok(compare_raw_dataset(dataset, &actual, &expected, options));
    }
    let expected = layout.load_expected(dataset)?;
    let actual = client.convert(layout, dataset)?;
    Ok(compare_dataset(dataset, &actual, &expected, options))
}

/// Compare already-decoded records; no I/O.
pub fn compare_dataset(
    dataset: &str,
    actual: &[TimeSeriesRecord],
    expected: &[TimeSeriesRecord],
    options: CheckOptions,
) -> CheckReport {
    let mismatches = if options.all {
        compare::all_mismatches(actual, expected)
    } else {
        compare::first_mismatch(actual, expected).into_iter().collect()
    };
    finish(dataset, actual.len(), mismatches)
}

/// Strict counterpart of [`compare_dataset`] over untyped records.
pub fn compare_raw_dataset(
    dataset: &str,
    actual: &[Value],
    expected: &[Value],
    options: CheckOptions,
) -> CheckReport {
    let mismatches = if options.all {
        compare::all_raw_mismatches(actual, expected)
    } else {
        compare::first_raw_mismatch(actual, expected).into_iter().collect()
    };
    finish(dataset, actual.len(), mismatches)
}

fn finish(dataset: &str, records: usize, mismatches: Vec<Mismatch>) -> CheckReport {
    if mismatches.is_empty() {
        info!(dataset, records, "converted output matches golden file");
    }
    for m in &mismatches {
        error!(dataset, location = %m.location(), "mismatch against golden file");
    }

    CheckReport {
        dataset: dataset.to_string(),
        records,
        mismatches,
    }
}
