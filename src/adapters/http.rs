//! Shared HTTP retry policy
//!
//! Rate limits (429) back off exponentially, server errors and transport
//! failures back off linearly. Any other status is handed back to the caller.

use std::time::Duration;

use reqwest::{RequestBuilder, Response, StatusCode};
use tracing::warn;

/// Send `request`, retrying up to `max_retries` attempts.
///
/// The request body must be cloneable (JSON bodies are).
pub async fn send_with_retry(request: RequestBuilder, max_retries: u32) -> Result<Response, String> {
    let attempts = max_retries.max(1);
    let mut last_error = None;

    for attempt in 0..attempts {
        let req = request
            .try_clone()
            .ok_or_else(|| "request body cannot be retried".to_string())?;

        match req.send().await {
            Ok(response) => {
                let status = response.status();

                if status == StatusCode::TOO_MANY_REQUESTS {
                    last_error = Some("rate limit exceeded".to_string());
                    if let Some(backoff) = pause_before_retry(rate_limit_backoff(attempt), attempt, attempts) {
                        warn!(
                            "Rate limited (429), backing off for {:?} (attempt {}/{})",
                            backoff,
                            attempt + 1,
                            attempts
                        );
                        tokio::time::sleep(backoff).await;
                    }
                    continue;
                }

                if status.is_server_error() {
                    last_error = Some(format!("server error: {}", status));
                    if let Some(backoff) = pause_before_retry(retry_backoff(attempt), attempt, attempts) {
                        tokio::time::sleep(backoff).await;
                    }
                    continue;
                }

                return Ok(response);
            }
            Err(e) => {
                last_error = Some(e.to_string());
                if let Some(backoff) = pause_before_retry(retry_backoff(attempt), attempt, attempts) {
                    tokio::time::sleep(backoff).await;
                }
            }
        }
    }

    Err(last_error.unwrap_or_else(|| "max retries exceeded".to_string()))
}

/// No pause after the final attempt; the error goes straight back.
fn pause_before_retry(backoff: Duration, attempt: u32, attempts: u32) -> Option<Duration> {
    (attempt + 1 < attempts).then_some(backoff)
}

/// 2s, 4s, 8s, ...
fn rate_limit_backoff(attempt: u32) -> Duration {
    Duration::from_secs(2u64.saturating_pow(attempt + 1))
}

/// 500ms, 1s, 1.5s, ...
fn retry_backoff(attempt: u32) -> Duration {
    Duration::from_millis(500 * (attempt as u64 + 1))
}
