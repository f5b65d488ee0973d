//! Baseline capture: re-run conversions and store the responses as goldens.
//!
//! Baselines are regenerated as a batch. The first failure aborts the run;
//! datasets already written stay written, later ones are not attempted.

use std::path::PathBuf;

use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use crate::data::BrianClient;
use crate::domain::TimeSeriesRecord;
use crate::error::AppError;
use crate::io::{FixtureLayout, write_baseline};

/// Datasets captured when none are named explicitly.
pub const DEFAULT_DATASETS: [&str; 6] = ["ott", "bb", "berd", "ragv", "ukea", "sppi"];

/// One written baseline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Captured {
    pub dataset: String,
    pub path: PathBuf,
    pub records: usize,
}

/// Capture every dataset in order, stopping at the first error.
pub fn capture_all<S: AsRef<str>>(
    client: &BrianClient,
    layout: &FixtureLayout,
    datasets: &[S],
) -> Result<Vec<Captured>, AppError> {
    let mut out = Vec::with_capacity(datasets.len());
    for dataset in datasets {
        let dataset = dataset.as_ref();
        info!(dataset, "capturing project-brian response");
        out.push(capture_one(client, layout, dataset)?);
    }
    info!(count = out.len(), "finished capturing project-brian responses");
    Ok(out)
}

/// Convert `dataset` and overwrite its golden file with the response.
pub fn capture_one(
    client: &BrianClient,
    layout: &FixtureLayout,
    dataset: &str,
) -> Result<Captured, AppError> {
    let value = client.convert_raw(layout, dataset)?;
    let records = validate_shape(dataset, &value)?;
    let path = write_baseline(layout, dataset, &value)?;
    info!(dataset, records, path = %path.display(), "baseline written");
    Ok(Captured {
        dataset: dataset.to_string(),
        path,
        records,
    })
}

/// Check that an untyped response still decodes as records.
///
/// The untyped value is what gets written, so fields the typed shape does not
/// know about survive; this only refuses responses the comparator could not
/// read back.
pub fn validate_shape(dataset: &str, value: &Value) -> Result<usize, AppError> {
    let records = Vec::<TimeSeriesRecord>::deserialize(value)
        .map_err(|e| AppError::decode(dataset, "response as time series records", e))?;
    Ok(records.len())
}
