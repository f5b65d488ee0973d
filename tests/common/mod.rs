//! Shared helpers for the integration tests.
//!
//! The client under test is blocking, so each test owns a tokio runtime only
//! to start and program the wiremock server; requests are sent from the test
//! thread outside that runtime.

#![allow(dead_code)]

use std::fs;
use std::path::Path;

use brian_api_test::config::{SERVICE_PATH, ServiceConfig};
use brian_api_test::data::BrianClient;
use brian_api_test::io::FixtureLayout;
use serde_json::{Value, json};
use tempfile::TempDir;
use tokio::runtime::Runtime;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub struct Harness {
    // Dropped before `rt`.
    pub server: MockServer,
    pub rt: Runtime,
    pub resources: TempDir,
    pub layout: FixtureLayout,
    pub client: BrianClient,
}

impl Harness {
    pub fn start() -> Self {
        let rt = Runtime::new().unwrap();
        let server = rt.block_on(MockServer::start());

        let resources = tempfile::tempdir().unwrap();
        fs::create_dir_all(resources.path().join("inputs")).unwrap();
        fs::create_dir_all(resources.path().join("outputs")).unwrap();

        let mut config = ServiceConfig::default().with_base_url(&server.uri()).unwrap();
        config.resources_dir = resources.path().to_path_buf();

        let layout = FixtureLayout::from_config(&config);
        let client = BrianClient::new(&config).unwrap();

        Self {
            server,
            rt,
            resources,
            layout,
            client,
        }
    }

    pub fn root(&self) -> &Path {
        self.resources.path()
    }

    /// Drop a fake `.csdb` input for `dataset`.
    pub fn add_input(&self, dataset: &str, bytes: &[u8]) {
        fs::write(self.layout.input_path(dataset), bytes).unwrap();
    }

    pub fn add_golden(&self, dataset: &str, value: &Value) {
        fs::write(
            self.layout.golden_path(dataset),
            serde_json::to_string_pretty(value).unwrap(),
        )
        .unwrap();
    }

    /// Answer every conversion request with `status` and a JSON body.
    pub fn respond_json(&self, status: u16, body: &Value) {
        self.rt.block_on(
            Mock::given(method("POST"))
                .and(path(SERVICE_PATH))
                .respond_with(ResponseTemplate::new(status).set_body_json(body))
                .mount(&self.server),
        );
    }

    pub fn respond_raw(&self, status: u16, body: &str) {
        self.rt.block_on(
            Mock::given(method("POST"))
                .and(path(SERVICE_PATH))
                .respond_with(ResponseTemplate::new(status).set_body_string(body))
                .mount(&self.server),
        );
    }

    pub fn received(&self) -> Vec<wiremock::Request> {
        self.rt
            .block_on(self.server.received_requests())
            .unwrap_or_default()
    }
}

pub fn observation(period: &str, value: &str, dataset: &str) -> Value {
    json!({
        "date": period,
        "value": value,
        "year": period,
        "month": "",
        "quarter": "",
        "sourceDataset": dataset
    })
}

/// A one-record conversion response shaped like the service's output.
pub fn ott_response(first_value: &str) -> Value {
    json!([
        {
            "years": [
                observation("2000", first_value, "ott"),
                observation("2001", "13.1", "ott")
            ],
            "quarters": [],
            "months": [],
            "sourceDatasets": ["ott"],
            "section": null,
            "type": "timeseries",
            "description": {
                "title": "Overseas travel and tourism",
                "cdid": "GMAA",
                "unit": "Thousands",
                "preUnit": "",
                "source": "ONS",
                "date": "2001",
                "number": "",
                "sampleSize": 0
            }
        }
    ])
}
