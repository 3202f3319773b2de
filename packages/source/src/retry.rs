//! HTTP download with retry on transient errors.
//!
//! [`download_bytes`] retries connection failures, timeouts, HTTP 429 and
//! HTTP 5xx with exponential backoff (2s, 4s, 8s, ...). Other 4xx responses
//! are permanent and returned immediately.

use std::sync::Arc;
use std::time::Duration;

use crate::SourceError;
use crate::progress::ProgressCallback;

/// Downloads the full response body, reporting bytes received to
/// `progress`.
///
/// `build_request` is called once per attempt since a
/// [`reqwest::RequestBuilder`] is consumed by `send()`. A body that fails
/// mid-stream re-runs the whole request, counting against the same
/// `max_retries` budget.
///
/// # Errors
///
/// Returns [`SourceError::Http`] if the request or body read still fails
/// after `max_retries` retries, or [`SourceError::Status`] for a
/// non-success status.
#[allow(clippy::future_not_send)]
pub async fn download_bytes<F>(
    build_request: F,
    max_retries: u32,
    progress: &Arc<dyn ProgressCallback>,
) -> Result<Vec<u8>, SourceError>
where
    F: Fn() -> reqwest::RequestBuilder,
{
    let mut attempt = 0;

    loop {
        let mut response = send_inner(&build_request, max_retries.saturating_sub(attempt)).await?;

        if let Some(total) = response.content_length() {
            progress.set_total(total);
        }

        let mut body = Vec::new();
        let read = loop {
            match response.chunk().await {
                Ok(Some(chunk)) => {
                    progress.inc(chunk.len() as u64);
                    body.extend_from_slice(&chunk);
                }
                Ok(None) => break Ok(()),
                Err(e) => break Err(e),
            }
        };

        match read {
            Ok(()) => return Ok(body),
            Err(e) if attempt < max_retries && is_transient(&e) => {
                attempt += 1;
                let delay = backoff(attempt);
                log::warn!(
                    "Body read failed after {} bytes (retry {attempt}/{max_retries}), re-fetching in {delay:?}: {e}",
                    body.len()
                );
                tokio::time::sleep(delay).await;
            }
            Err(e) => return Err(SourceError::Http(e)),
        }
    }
}

/// Sends the request, retrying transient failures up to `max_retries`
/// times. Returns the first 2xx/3xx response.
#[allow(clippy::future_not_send)]
async fn send_inner<F>(build_request: &F, max_retries: u32) -> Result<reqwest::Response, SourceError>
where
    F: Fn() -> reqwest::RequestBuilder,
{
    let mut attempt = 0;

    loop {
        match build_request().send().await {
            Err(e) => {
                if !(is_transient(&e) && attempt < max_retries) {
                    return Err(SourceError::Http(e));
                }
                log::warn!("  transient error: {e}");
            }
            Ok(response) => {
                let status = response.status();
                let retryable =
                    status == reqwest::StatusCode::TOO_MANY_REQUESTS || status.is_server_error();

                if retryable && attempt < max_retries {
                    log::warn!("  HTTP {status}");
                } else if retryable || status.is_client_error() {
                    return Err(SourceError::Status {
                        status: status.as_u16(),
                        url: response.url().to_string(),
                    });
                } else {
                    return Ok(response);
                }
            }
        }

        attempt += 1;
        let delay = backoff(attempt);
        log::warn!("  retry {attempt}/{max_retries} in {delay:?}...");
        tokio::time::sleep(delay).await;
    }
}

fn backoff(attempt: u32) -> Duration {
    Duration::from_secs(1u64 << attempt.min(6))
}

/// Returns `true` if the error is likely transient and worth retrying.
fn is_transient(e: &reqwest::Error) -> bool {
    e.is_timeout() || e.is_connect() || e.is_body() || e.is_request()
}
