//! HTTP access to the case API.

use crate::models::{AvailableYears, CaseEnvelope, CaseRecord};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

/// Errors raised while talking to the case API.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Cannot connect to case API at {0}")]
    Connect(String),

    #[error("Request timed out after {0}s")]
    Timeout(u64),

    #[error("Case API error {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),
}

/// Anything that can supply case data to the dashboard.
#[async_trait]
pub trait CaseSource: Send + Sync {
    /// List the years that have case data.
    async fn available_years(&self) -> Result<Vec<String>, FetchError>;

    /// Load every case recorded in `year`.
    async fn cases_by_year(&self, year: &str) -> Result<Vec<CaseRecord>, FetchError>;
}

/// Connection settings for the case API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL of the API, e.g. `http://127.0.0.1:5000/api`.
    pub base_url: String,
    /// API version path segment.
    pub version: String,
    pub timeout_seconds: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000/api".to_string(),
            version: "v1.0".to_string(),
            timeout_seconds: 30,
        }
    }
}

/// reqwest-backed [`CaseSource`].
pub struct ApiClient {
    config: ApiConfig,
    http_client: reqwest::Client,
}

impl ApiClient {
    /// Create a client for the given API.
    pub fn new(config: ApiConfig) -> Result<Self, FetchError> {
        info!("Using case API {} ({})", config.base_url, config.version);

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            config,
            http_client,
        })
    }

    /// URL of the available-years endpoint.
    pub fn years_url(&self) -> String {
        format!(
            "{}/{}/year",
            self.config.base_url.trim_end_matches('/'),
            self.config.version
        )
    }

    /// URL of the cases endpoint for `year`.
    pub fn year_url(&self, year: &str) -> String {
        format!("{}/{}", self.years_url(), year)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, FetchError> {
        debug!("GET {}", url);

        let response = self.http_client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout(self.config.timeout_seconds)
            } else if e.is_connect() {
                FetchError::Connect(self.config.base_url.clone())
            } else {
                FetchError::Request(e)
            }
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Status { status, body });
        }

        response.json::<T>().await.map_err(|source| FetchError::Decode {
            url: url.to_string(),
            source,
        })
    }
}

#[async_trait]
impl CaseSource for ApiClient {
    async fn available_years(&self) -> Result<Vec<String>, FetchError> {
        let response: AvailableYears = self.get_json(&self.years_url()).await?;
        debug!("API reports {} years", response.available_years.len());
        Ok(response.available_years)
    }

    async fn cases_by_year(&self, year: &str) -> Result<Vec<CaseRecord>, FetchError> {
        let envelopes: Vec<CaseEnvelope> = self.get_json(&self.year_url(year)).await?;
        info!("Loaded {} cases for {}", envelopes.len(), year);
        Ok(envelopes.into_iter().map(|e| e.case).collect())
    }
}
