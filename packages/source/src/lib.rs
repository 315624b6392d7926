#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Remote territorial-control map source.
//!
//! Fetches the latest map payload over HTTP with a bounded, fixed-delay
//! retry loop ([`retry`]) and extracts the raw features from it
//! ([`payload`]). A saved payload can also be read from disk, which is how
//! past days are replayed without touching the network.

pub mod payload;
pub mod retry;
#[cfg(test)]
mod test_server;

use std::path::Path;
use std::time::Duration;

use frontline_models::{PipelineConfig, RawFeature};

pub use payload::parse_payload;
pub use retry::RetryPolicy;

/// Errors that can occur while fetching or parsing the remote payload.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error (reading a saved payload).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Every fetch attempt failed.
    #[error("API request failed after {attempts} attempt(s): {message}")]
    RetriesExhausted {
        /// Number of attempts made.
        attempts: u32,
        /// The last attempt's error.
        message: String,
    },

    /// The payload parsed as JSON but lacks the expected structure.
    #[error("Malformed payload: {message}")]
    MalformedPayload {
        /// Description of what is missing.
        message: String,
    },
}

/// Connection settings for the remote map endpoint.
#[derive(Debug, Clone)]
pub struct SourceOptions {
    /// Endpoint URL.
    pub url: String,
    /// `User-Agent` header value.
    pub user_agent: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Attempt budget and delay.
    pub retry: RetryPolicy,
}

impl SourceOptions {
    /// Extracts the source settings from the pipeline configuration.
    #[must_use]
    pub fn from_config(config: &PipelineConfig) -> Self {
        Self {
            url: config.api_url.clone(),
            user_agent: config.user_agent.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
            retry: RetryPolicy::new(
                config.max_attempts,
                Duration::from_secs(config.retry_delay_secs),
            ),
        }
    }
}

/// Builds the HTTP client used for every attempt.
///
/// # Errors
///
/// Returns [`SourceError::Http`] if the client cannot be constructed.
pub fn build_client(options: &SourceOptions) -> Result<reqwest::Client, SourceError> {
    Ok(client_builder(options).build()?)
}

fn client_builder(options: &SourceOptions) -> reqwest::ClientBuilder {
    reqwest::Client::builder()
        .user_agent(options.user_agent.as_str())
        .timeout(options.timeout)
}

/// Fetches the raw JSON payload from the remote endpoint.
///
/// # Errors
///
/// Returns [`SourceError::RetriesExhausted`] once the attempt budget is
/// spent.
pub async fn fetch_payload(
    client: &reqwest::Client,
    options: &SourceOptions,
) -> Result<serde_json::Value, SourceError> {
    log::info!("Requesting {}", options.url);
    retry::send_json(|| client.get(&options.url), &options.retry).await
}

/// Fetches the payload and extracts its features.
///
/// # Errors
///
/// Returns [`SourceError`] if the fetch fails or the payload is malformed.
pub async fn fetch_features(
    client: &reqwest::Client,
    options: &SourceOptions,
) -> Result<Vec<RawFeature>, SourceError> {
    let payload = fetch_payload(client, options).await?;
    parse_payload(&payload)
}

/// Reads a previously saved payload from disk.
///
/// # Errors
///
/// Returns [`SourceError`] if the file cannot be read or is not JSON.
pub fn read_payload(path: &Path) -> Result<serde_json::Value, SourceError> {
    let body = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&body)?)
}
