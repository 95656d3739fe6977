//! Bounded retry with a fixed delay between attempts.

use std::future::Future;
use std::time::Duration;

use crate::error::ClientError;

/// Returns `true` for errors worth another attempt: network failures,
/// throttling and 5xx responses.
pub(crate) fn is_retriable(err: &ClientError) -> bool {
    match err {
        ClientError::Http(e) => {
            e.is_timeout() || e.is_connect() || e.status().is_some_and(|s| s.is_server_error())
        }
        ClientError::UnexpectedStatus { status, .. } => *status == 429 || *status >= 500,
        ClientError::NotFound { .. }
        | ClientError::Deserialize { .. }
        | ClientError::Api { .. }
        | ClientError::InvalidCredential(_)
        | ClientError::InvalidBaseUrl { .. } => false,
    }
}

/// Runs `operation` up to `max_attempts` times, sleeping `delay` between
/// attempts on transient errors. Non-retriable errors return immediately.
pub(crate) async fn retry_with_delay<T, F, Fut>(
    max_attempts: u32,
    delay: Duration,
    mut operation: F,
) -> Result<T, ClientError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ClientError>>,
{
    let mut attempt = 1u32;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_retriable(&err) || attempt >= max_attempts {
                    return Err(err);
                }
                tracing::warn!(
                    attempt,
                    max_attempts,
                    delay_secs = delay.as_secs(),
                    error = %err,
                    "request failed; retrying after delay"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}
