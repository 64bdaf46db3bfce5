//! HTTP client for the Picdrop signing/storage API.
//!
//! Provides a thin client over the two-call exchange: request a signed upload
//! target, then transfer the bytes. Domain methods live in `api`; this module
//! holds the HTTP plumbing.

pub mod api;

use std::time::Duration;

use picdrop_core::{UploadError, UploaderConfig};
use reqwest::Client;

/// HTTP client for the signing/storage API.
///
/// The configured endpoint doubles as the signing URL (queried with the
/// file's name, type, and size) and as the direct-upload target when the
/// service does not hand out presigned targets.
#[derive(Clone, Debug)]
pub struct TransferClient {
    client: Client,
    endpoint: String,
}

impl TransferClient {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, UploadError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| UploadError::Network(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
        })
    }

    /// Create a client from an `UploaderConfig` (endpoint and timeout).
    pub fn from_config(config: &UploaderConfig) -> Result<Self, UploadError> {
        Self::new(
            config.api_endpoint.clone(),
            Duration::from_secs(config.http_timeout_secs),
        )
    }

    /// Create a client from the environment. `PICDROP_API_URL` must be set;
    /// its absence is a startup failure.
    pub fn from_env() -> Result<Self, anyhow::Error> {
        let config = UploaderConfig::from_env()?;
        Ok(Self::from_config(&config)?)
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// GET the configured endpoint with query parameters and return the JSON
    /// body. Non-success statuses and non-JSON bodies are errors.
    pub(crate) async fn get_json(
        &self,
        query: &[(&str, String)],
    ) -> Result<serde_json::Value, UploadError> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(query)
            .send()
            .await
            .map_err(|e| UploadError::Network(format!("request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(UploadError::Network(format!(
                "request failed with status {}",
                status
            )));
        }

        response
            .json()
            .await
            .map_err(|e| UploadError::Schema(format!("response is not valid JSON: {}", e)))
    }

    /// POST a multipart form and return the response once the status is
    /// confirmed successful.
    pub(crate) async fn post_multipart(
        &self,
        url: &str,
        form: reqwest::multipart::Form,
    ) -> Result<reqwest::Response, UploadError> {
        let response = self
            .client
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| UploadError::Network(format!("upload request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(UploadError::Network(format!(
                "upload failed with status {}",
                status
            )));
        }

        Ok(response)
    }
}
