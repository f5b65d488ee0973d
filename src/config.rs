//! Service and filesystem configuration.
//!
//! Resolution order: built-in defaults, then `.env` / process environment,
//! then CLI flags (applied by `app`).

use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::Url;

use crate::error::AppError;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8083";
pub const SERVICE_PATH: &str = "/Services/ConvertCSDB";
/// Conversions of the larger files (UKEA, RAGV) are slow.
pub const DEFAULT_TIMEOUT_SECS: u64 = 20;
pub const DEFAULT_RESOURCES_DIR: &str = "resources";

pub const ENV_BASE_URL: &str = "PROJECT_BRIAN_URL";
pub const ENV_RESOURCES_DIR: &str = "PROJECT_BRIAN_RESOURCES";
pub const ENV_TIMEOUT_SECS: &str = "PROJECT_BRIAN_TIMEOUT_SECS";

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub base_url: Url,
    pub resources_dir: PathBuf,
    pub timeout: Duration,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid"),
            resources_dir: PathBuf::from(DEFAULT_RESOURCES_DIR),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ServiceConfig {
    /// Load from the process environment, honouring a `.env` file if present.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let mut config = Self::default();

        if let Some(url) = lookup(ENV_BASE_URL).filter(|v| !v.trim().is_empty()) {
            config = config.with_base_url(&url)?;
        }
        if let Some(dir) = lookup(ENV_RESOURCES_DIR).filter(|v| !v.trim().is_empty()) {
            config.resources_dir = PathBuf::from(dir);
        }
        if let Some(secs) = lookup(ENV_TIMEOUT_SECS).filter(|v| !v.trim().is_empty()) {
            config.timeout = parse_timeout(&secs)?;
        }

        Ok(config)
    }

    pub fn with_base_url(mut self, raw: &str) -> Result<Self, AppError> {
        let url = Url::parse(raw.trim())
            .map_err(|e| AppError::Config(format!("base URL '{raw}' is not a valid URL: {e}")))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(AppError::Config(format!(
                "base URL '{raw}' must use http or https"
            )));
        }
        if url.query().is_some() || url.fragment().is_some() {
            return Err(AppError::Config(format!(
                "base URL '{raw}' must not carry a query string or fragment"
            )));
        }
        self.base_url = url;
        Ok(self)
    }

    /// Full conversion endpoint: base URL plus the fixed service path.
    ///
    /// Any path already on the base URL is kept as a prefix; a query string or
    /// fragment on the base is dropped.
    pub fn endpoint(&self) -> Url {
        let mut url = self.base_url.clone();
        let path = format!("{}{SERVICE_PATH}", url.path().trim_end_matches('/'));
        url.set_path(&path);
        url.set_query(None);
        url.set_fragment(None);
        url
    }

    pub fn resources_dir(&self) -> &Path {
        &self.resources_dir
    }
}

fn parse_timeout(raw: &str) -> Result<Duration, AppError> {
    let secs: u64 = raw.trim().parse().map_err(|_| {
        AppError::Config(format!("timeout '{raw}' is not a whole number of seconds"))
    })?;
    if secs == 0 {
        return Err(AppError::Config("timeout must be at least one second".into()));
    }
    Ok(Duration::from_secs(secs))
}
