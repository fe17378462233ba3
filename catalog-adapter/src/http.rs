//! Blocking HTTP data source.

use std::time::Duration;

use catalog::RawItem;
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, USER_AGENT};
use serde::{Deserialize, Serialize};

use crate::error::{FetchError, Result};
use crate::source::{DataSource, parse_batch};

/// Public catalog endpoint used when none is configured.
pub const DEFAULT_ENDPOINT: &str = "https://closet-recruiting-api.azurewebsites.net/api/data";

/// HTTP request timeout when none is configured.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

const USER_AGENT_VALUE: &str = concat!("catalog-adapter/", env!("CARGO_PKG_VERSION"));

/// Settings for [`HttpSource`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct HttpSourceConfig {
    /// URL answering `GET` with a JSON array of item records.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Whole-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for HttpSourceConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl HttpSourceConfig {
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    #[must_use]
    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    fn validate(&self) -> Result<url::Url> {
        let url = url::Url::parse(&self.endpoint)
            .map_err(|e| FetchError::Config(format!("endpoint {:?}: {e}", self.endpoint)))?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(FetchError::Config(format!(
                "endpoint scheme must be http or https, got {other:?}"
            ))),
        }
    }
}

/// Fetches the whole catalog snapshot with a blocking `GET`.
pub struct HttpSource {
    client: Client,
    endpoint: url::Url,
}

impl HttpSource {
    /// Creates a source for the default endpoint.
    pub fn new() -> Result<Self> {
        Self::from_config(&HttpSourceConfig::default())
    }

    pub fn from_config(config: &HttpSourceConfig) -> Result<Self> {
        let endpoint = config.validate()?;
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| FetchError::Config(format!("failed to create HTTP client: {e}")))?;

        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &str {
        self.endpoint.as_str()
    }
}

impl DataSource for HttpSource {
    fn fetch(&mut self) -> Result<Vec<RawItem>> {
        adebug!(endpoint = self.endpoint.as_str(), "HttpSource::fetch");

        let response = self
            .client
            .get(self.endpoint.as_str())
            .header(USER_AGENT, USER_AGENT_VALUE)
            .header(ACCEPT, "application/json")
            .send()?;

        let status = response.status();
        if !status.is_success() {
            awarn!(status = status.as_u16(), "HttpSource: non-success status");
            return Err(FetchError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.bytes()?;
        let items = parse_batch(&body)?;
        adebug!(items = items.len(), "HttpSource::fetch done");
        Ok(items)
    }
}

impl std::fmt::Debug for HttpSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpSource")
            .field("endpoint", &self.endpoint.as_str())
            .finish_non_exhaustive()
    }
}
