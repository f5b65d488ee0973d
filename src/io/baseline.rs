//! Golden file writes.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use serde_json::Value;

use crate::error::AppError;
use crate::io::fixtures::FixtureLayout;

/// Write `value` as the golden file for `dataset`, replacing any previous one.
///
/// The JSON goes to a sibling temp file first and is renamed into place, so
/// readers see either the old baseline or the complete new one.
pub fn write_baseline(
    layout: &FixtureLayout,
    dataset: &str,
    value: &Value,
) -> Result<PathBuf, AppError> {
    let dir = layout.outputs_dir();
    fs::create_dir_all(&dir)
        .map_err(|e| AppError::io(dataset, format!("failed to create '{}'", dir.display()), e))?;

    let path = layout.golden_path(dataset);
    let tmp = path.with_extension("json.tmp");

    let file = File::create(&tmp)
        .map_err(|e| AppError::io(dataset, format!("failed to create '{}'", tmp.display()), e))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value)
        .map_err(|e| AppError::io(dataset, "failed to serialize baseline", e.into()))?;
    writer
        .flush()
        .map_err(|e| AppError::io(dataset, format!("failed to write '{}'", tmp.display()), e))?;
    drop(writer);

    fs::rename(&tmp, &path).map_err(|e| {
        let _ = fs::remove_file(&tmp);
        AppError::io(dataset, format!("failed to replace '{}'", path.display()), e)
    })?;

    Ok(path)
}
