//! HTTP retry helper for the map fetch.
//!
//! The endpoint is polled once a day, so the retry budget is small and the
//! delay fixed: every failed attempt (connection error, timeout, non-2xx
//! status, unreadable or non-JSON body) waits [`RetryPolicy::delay`] and
//! tries again, up to [`RetryPolicy::max_attempts`] attempts in total.
//!
//! # Usage
//!
//! ```ignore
//! use crate::retry::{self, RetryPolicy};
//!
//! let policy = RetryPolicy::new(3, Duration::from_secs(5));
//! let body = retry::send_json(|| client.get(&url), &policy).await?;
//! ```

use std::time::Duration;

use crate::SourceError;

/// Maximum length of the response body preview included in error logs.
const BODY_PREVIEW_LEN: usize = 500;

/// Attempt budget and fixed delay between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    delay: Duration,
}

impl RetryPolicy {
    /// Creates a policy. A budget of zero is raised to one attempt.
    #[must_use]
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }

    /// Total number of attempts, including the first.
    #[must_use]
    pub const fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Delay between consecutive attempts.
    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }
}

/// Sends an HTTP request and parses the response body as JSON, retrying
/// on any failure.
///
/// The `build_request` closure is called on each attempt to construct a
/// fresh [`reqwest::RequestBuilder`] (since builders are consumed by
/// `.send()`).
///
/// # Errors
///
/// Returns [`SourceError::RetriesExhausted`] carrying the last attempt's
/// error once every attempt has failed.
#[allow(clippy::future_not_send)]
pub async fn send_json<F>(
    build_request: F,
    policy: &RetryPolicy,
) -> Result<serde_json::Value, SourceError>
where
    F: Fn() -> reqwest::RequestBuilder,
{
    let max_attempts = policy.max_attempts();
    let mut last_error: Option<SourceError> = None;

    for attempt in 1..=max_attempts {
        match send_once(&build_request).await {
            Ok(value) => return Ok(value),
            Err(e) => {
                log::warn!("API request failed (attempt {attempt}/{max_attempts}): {e}");
                last_error = Some(e);
                if attempt < max_attempts {
                    log::info!("Retrying in {:?}...", policy.delay());
                    tokio::time::sleep(policy.delay()).await;
                }
            }
        }
    }

    log::error!("All {max_attempts} API request attempts failed");

    Err(SourceError::RetriesExhausted {
        attempts: max_attempts,
        message: last_error.map_or_else(|| "no attempt was made".to_string(), |e| e.to_string()),
    })
}

/// One attempt: send, require a success status, decode the body as JSON.
#[allow(clippy::future_not_send)]
async fn send_once<F>(build_request: &F) -> Result<serde_json::Value, SourceError>
where
    F: Fn() -> reqwest::RequestBuilder,
{
    let response = build_request().send().await?.error_for_status()?;

    let url = response.url().to_string();
    let status = response.status();
    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(String::from);

    // Read the raw body as text first, then parse as JSON.
    // This lets us log the actual response content on failure.
    let text = response.text().await?;

    serde_json::from_str(&text).map_err(|json_err| {
        let preview: String = text.chars().take(BODY_PREVIEW_LEN).collect();
        log::debug!(
            "JSON parse failed\n  \
             url: {url}\n  \
             status: {status}\n  \
             content-type: {content_type:?}\n  \
             received: {} bytes\n  \
             parse error: {json_err}\n  \
             body preview: {preview}",
            text.len(),
        );
        SourceError::Json(json_err)
    })
}
