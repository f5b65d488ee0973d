//! HTTP client for the project-brian CSDB conversion endpoint.
//!
//! One request per dataset, no retries: a failed upload is a failed check.

use std::time::Instant;

use reqwest::blocking::Client;
use reqwest::blocking::multipart::{Form, Part};
use reqwest::{StatusCode, Url};
use serde_json::Value;
use tracing::{debug, info};

use crate::config::ServiceConfig;
use crate::domain::TimeSeriesRecord;
use crate::error::AppError;
use crate::io::fixtures::{FixtureLayout, input_file_name};

/// Multipart field the service reads the upload from.
const FILE_FIELD: &str = "file";
/// How much of an error body is quoted back in a transport error.
const BODY_EXCERPT_CHARS: usize = 200;

pub struct BrianClient {
    client: Client,
    endpoint: Url,
}

impl BrianClient {
    pub fn new(config: &ServiceConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AppError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            endpoint: config.endpoint(),
        })
    }

    pub fn from_env() -> Result<Self, AppError> {
        Self::new(&ServiceConfig::from_env()?)
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Upload the fixture for `dataset` and decode the typed records.
    pub fn convert(
        &self,
        layout: &FixtureLayout,
        dataset: &str,
    ) -> Result<Vec<TimeSeriesRecord>, AppError> {
        let body = self.post_fixture(layout, dataset)?;
        decode_records(dataset, &body)
    }

    /// Upload the fixture for `dataset` and split the body into untyped records.
    pub fn convert_records_raw(
        &self,
        layout: &FixtureLayout,
        dataset: &str,
    ) -> Result<Vec<Value>, AppError> {
        let body = self.post_fixture(layout, dataset)?;
        decode_raw_records(dataset, &body)
    }

    /// Upload the fixture for `dataset` and decode the body as untyped JSON.
    pub fn convert_raw(&self, layout: &FixtureLayout, dataset: &str) -> Result<Value, AppError> {
        let body = self.post_fixture(layout, dataset)?;
        serde_json::from_slice(&body).map_err(|e| AppError::decode(dataset, "response body", e))
    }

    fn post_fixture(&self, layout: &FixtureLayout, dataset: &str) -> Result<Vec<u8>, AppError> {
        let bytes = layout.read_input(dataset)?;
        let size = bytes.len();

        let part = Part::bytes(bytes)
            .file_name(input_file_name(dataset))
            .mime_str("application/octet-stream")
            .map_err(|e| AppError::transport(dataset, format!("failed to build upload: {e}")))?;
        let form = Form::new().part(FILE_FIELD, part);

        info!(dataset, endpoint = %self.endpoint, bytes = size, "uploading fixture");
        let started = Instant::now();

        let resp = self
            .client
            .post(self.endpoint.clone())
            .multipart(form)
            .send()
            .map_err(|e| AppError::transport(dataset, describe_send_error(&e)))?;

        let status = resp.status();
        let body = resp
            .bytes()
            .map_err(|e| {
                AppError::transport(dataset, format!("failed to read response body: {e}"))
            })?;
        debug!(
            dataset,
            %status,
            bytes = body.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "conversion response received"
        );

        if status != StatusCode::OK {
            return Err(AppError::transport(
                dataset,
                format!("service returned {status}: {}", excerpt(&body)),
            ));
        }

        Ok(body.to_vec())
    }
}

/// Decode a conversion response into typed records.
pub fn decode_records(dataset: &str, body: &[u8]) -> Result<Vec<TimeSeriesRecord>, AppError> {
    serde_json::from_slice(body).map_err(|e| AppError::decode(dataset, "response body", e))
}

/// Decode a conversion response as a top-level array without applying the
/// record shape.
pub fn decode_raw_records(dataset: &str, body: &[u8]) -> Result<Vec<Value>, AppError> {
    serde_json::from_slice(body).map_err(|e| AppError::decode(dataset, "response body", e))
}

fn describe_send_error(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        format!("request timed out: {e}")
    } else if e.is_connect() {
        format!("could not connect: {e}")
    } else {
        format!("request failed: {e}")
    }
}

fn excerpt(body: &[u8]) -> String {
    let text = String::from_utf8_lossy(body);
    let text = text.trim();
    if text.is_empty() {
        return "<empty body>".to_string();
    }
    let mut out: String = text.chars().take(BODY_EXCERPT_CHARS).collect();
    if text.chars().count() > BODY_EXCERPT_CHARS {
        out.push_str("...");
    }
    out
}
