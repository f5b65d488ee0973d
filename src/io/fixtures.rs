//! Fixture layout and reads.
//!
//! ```text
//! <resources>/inputs/<name>.csdb        raw upload
//! <resources>/outputs/<name>-csdb.json  golden response
//! ```

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::config::ServiceConfig;
use crate::domain::TimeSeriesRecord;
use crate::error::AppError;

/// Where the golden files ship when they are not checked out unpacked.
const OUTPUTS_ARCHIVE: &str = "outputs.zip";

/// Resolves dataset names to fixture paths under a resources root.
#[derive(Debug, Clone)]
pub struct FixtureLayout {
    root: PathBuf,
}

impl FixtureLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn from_config(config: &ServiceConfig) -> Self {
        Self::new(config.resources_dir())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn inputs_dir(&self) -> PathBuf {
        self.root.join("inputs")
    }

    pub fn outputs_dir(&self) -> PathBuf {
        self.root.join("outputs")
    }

    pub fn input_path(&self, dataset: &str) -> PathBuf {
        self.inputs_dir().join(input_file_name(dataset))
    }

    pub fn golden_path(&self, dataset: &str) -> PathBuf {
        self.outputs_dir().join(format!("{dataset}-csdb.json"))
    }

    /// Read the raw `.csdb` bytes for `dataset`.
    pub fn read_input(&self, dataset: &str) -> Result<Vec<u8>, AppError> {
        let path = self.input_path(dataset);
        let expected_len = match fs::metadata(&path) {
            Ok(meta) => meta.len(),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(missing(dataset, path, None));
            }
            Err(e) => {
                let message = format!("failed to stat '{}'", path.display());
                return Err(AppError::io(dataset, message, e));
            }
        };

        let bytes = fs::read(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => missing(dataset, path.clone(), None),
            _ => AppError::io(dataset, format!("failed to read '{}'", path.display()), e),
        })?;

        if bytes.len() as u64 != expected_len {
            return Err(AppError::io(
                dataset,
                format!("incorrect number of bytes copied from '{}'", path.display()),
                std::io::Error::new(
                    ErrorKind::UnexpectedEof,
                    format!("read {} of {expected_len} bytes", bytes.len()),
                ),
            ));
        }

        Ok(bytes)
    }

    /// Fail early with an actionable hint when the golden directory is absent.
    pub fn ensure_outputs_dir(&self, dataset: &str) -> Result<(), AppError> {
        let dir = self.outputs_dir();
        if dir.is_dir() {
            return Ok(());
        }
        let archive = self.root.join(OUTPUTS_ARCHIVE);
        Err(missing(
            dataset,
            dir,
            Some(format!(
                "make sure you have unzipped '{}' before running the checks",
                archive.display()
            )),
        ))
    }

    /// Load the golden records for `dataset`.
    pub fn load_expected(&self, dataset: &str) -> Result<Vec<TimeSeriesRecord>, AppError> {
        let raw = self.read_golden(dataset)?;
        serde_json::from_slice(&raw).map_err(|e| AppError::decode(dataset, "golden file", e))
    }

    /// Load the golden records for `dataset` as untyped JSON, exactly as stored.
    pub fn load_expected_raw(&self, dataset: &str) -> Result<Vec<Value>, AppError> {
        let raw = self.read_golden(dataset)?;
        serde_json::from_slice(&raw).map_err(|e| AppError::decode(dataset, "golden file", e))
    }

    fn read_golden(&self, dataset: &str) -> Result<Vec<u8>, AppError> {
        let path = self.golden_path(dataset);
        fs::read(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => missing(dataset, path.clone(), None),
            _ => AppError::io(dataset, format!("failed to read '{}'", path.display()), e),
        })
    }
}

/// Upload file name for `dataset`.
pub fn input_file_name(dataset: &str) -> String {
    format!("{dataset}.csdb")
}

fn missing(dataset: &str, path: PathBuf, hint: Option<String>) -> AppError {
    AppError::MissingFixture {
        dataset: dataset.to_string(),
        path,
        hint,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> (tempfile::TempDir, FixtureLayout) {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("inputs")).unwrap();
        fs::create_dir_all(dir.path().join("outputs")).unwrap();
        let layout = FixtureLayout::new(dir.path());
        (dir, layout)
    }

    #[test]
    fn paths_follow_layout() {
        let layout = FixtureLayout::new("resources");
        assert_eq!(layout.input_path("ott"), PathBuf::from("resources/inputs/ott.csdb"));
        assert_eq!(
            layout.golden_path("ott"),
            PathBuf::from("resources/outputs/ott-csdb.json")
        );
    }

    #[test]
    fn read_input_returns_raw_bytes() {
        let (_dir, layout) = layout();
        fs::write(layout.input_path("bb"), [0u8, 1, 2, 255]).unwrap();
        assert_eq!(layout.read_input("bb").unwrap(), vec![0u8, 1, 2, 255]);
    }

    #[test]
    fn missing_input_is_missing_fixture() {
        let (_dir, layout) = layout();
        let err = layout.read_input("doesnotexist").unwrap_err();
        match err {
            AppError::MissingFixture { dataset, path, .. } => {
                assert_eq!(dataset, "doesnotexist");
                assert!(path.ends_with("inputs/doesnotexist.csdb"));
            }
            other => panic!("expected MissingFixture, got {other:?}"),
        }
    }

    #[test]
    fn missing_golden_is_missing_fixture() {
        let (_dir, layout) = layout();
        let err = layout.load_expected("ott").unwrap_err();
        assert!(matches!(err, AppError::MissingFixture { .. }));
    }

    #[test]
    fn malformed_golden_is_decode_error() {
        let (_dir, layout) = layout();
        fs::write(layout.golden_path("ott"), "{\"not\": \"an array\"}").unwrap();
        let err = layout.load_expected("ott").unwrap_err();
        assert!(matches!(err, AppError::Decode { what: "golden file", .. }));
    }

    #[test]
    fn load_expected_decodes_records() {
        let (_dir, layout) = layout();
        fs::write(
            layout.golden_path("ott"),
            r#"[{"type": "timeseries", "years": [{"date": "2000", "value": "12.3"}]}]"#,
        )
        .unwrap();
        let records = layout.load_expected("ott").unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].years[0].value, "12.3");
    }

    #[test]
    fn raw_golden_keeps_every_field() {
        let (_dir, layout) = layout();
        fs::write(
            layout.golden_path("ott"),
            r#"[{"type": "timeseries", "uri": "/ott/abmi", "description": {"unit": null}}]"#,
        )
        .unwrap();
        let records = layout.load_expected_raw("ott").unwrap();
        assert_eq!(records[0]["uri"], "/ott/abmi");
        assert!(records[0]["description"]["unit"].is_null());

        fs::write(layout.golden_path("bb"), "{}").unwrap();
        let err = layout.load_expected_raw("bb").unwrap_err();
        assert!(matches!(err, AppError::Decode { what: "golden file", .. }));
        let err = layout.load_expected_raw("berd").unwrap_err();
        assert!(matches!(err, AppError::MissingFixture { .. }));
    }

    #[test]
    fn absent_outputs_dir_points_at_archive() {
        let dir = tempfile::tempdir().unwrap();
        let layout = FixtureLayout::new(dir.path());
        let err = layout.ensure_outputs_dir("ott").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("outputs.zip"), "{msg}");
        assert_eq!(err.exit_code(), 3);
    }
}
