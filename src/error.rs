//! Error taxonomy for the check and capture flows.
//!
//! Every variant is terminal for the dataset being processed. The binary maps
//! each variant to its own exit code so scripted runs can tell a failed
//! comparison apart from an unreachable service.

use std::path::PathBuf;

use thiserror::Error;

use crate::compare::Mismatch;

#[derive(Debug, Error)]
pub enum AppError {
    /// Invalid base URL, timeout or other configuration input.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// An input `.csdb` fixture or a golden JSON file is absent.
    #[error("[{dataset}] missing fixture '{}'{}", .path.display(), format_hint(.hint))]
    MissingFixture {
        dataset: String,
        path: PathBuf,
        hint: Option<String>,
    },

    /// Network failure, timeout or a non-200 response.
    #[error("[{dataset}] conversion request failed: {message}")]
    Transport { dataset: String, message: String },

    /// The response body or a golden file is not the JSON we expect.
    #[error("[{dataset}] failed to decode {what}: {message}")]
    Decode {
        dataset: String,
        what: &'static str,
        message: String,
    },

    /// The converted output differs from the golden file.
    #[error("[{dataset}] {mismatch}")]
    Mismatch {
        dataset: String,
        mismatch: Box<Mismatch>,
    },

    /// One or more datasets in a `check` run failed. Details are reported per
    /// dataset as they happen; this only summarises them.
    #[error("{} of {total} dataset check(s) failed: {}", .datasets.len(), .datasets.join(", "))]
    ChecksFailed {
        total: usize,
        datasets: Vec<String>,
        /// Exit code of the first failure.
        code: u8,
    },

    /// Any other filesystem failure.
    #[error("[{dataset}] {message}: {source}")]
    Io {
        dataset: String,
        message: String,
        #[source]
        source: std::io::Error,
    },
}

fn format_hint(hint: &Option<String>) -> String {
    match hint {
        Some(h) => format!(" ({h})"),
        None => String::new(),
    }
}

impl AppError {
    pub fn exit_code(&self) -> u8 {
        match self {
            AppError::Mismatch { .. } => 1,
            AppError::Config(_) => 2,
            AppError::MissingFixture { .. } => 3,
            AppError::Transport { .. } => 4,
            AppError::Decode { .. } => 5,
            AppError::Io { .. } => 6,
            AppError::ChecksFailed { code, .. } => *code,
        }
    }

    pub(crate) fn transport(dataset: &str, message: impl Into<String>) -> Self {
        AppError::Transport {
            dataset: dataset.to_string(),
            message: message.into(),
        }
    }

    pub(crate) fn decode(dataset: &str, what: &'static str, err: impl std::fmt::Display) -> Self {
        AppError::Decode {
            dataset: dataset.to_string(),
            what,
            message: err.to_string(),
        }
    }

    pub(crate) fn io(dataset: &str, message: impl Into<String>, source: std::io::Error) -> Self {
        AppError::Io {
            dataset: dataset.to_string(),
            message: message.into(),
            source,
        }
    }
}
