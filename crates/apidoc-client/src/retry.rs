//! Retry logic with exponential backoff for read-only Apifox calls.
//!
//! Retries on transport errors (connection failures, timeouts) and on
//! transient statuses (429, 502, 503, 504). Any other response is returned
//! immediately. Mutations never go through this path.

use std::time::Duration;

use crate::error::is_transient_status;

/// Maximum number of retry attempts after the initial request.
pub(crate) const MAX_RETRIES: u32 = 3;

/// Base delay between retries (doubles each attempt: 200ms, 400ms, 800ms).
const BASE_DELAY_MS: u64 = 200;

/// Send an HTTP request with exponential backoff retry.
///
/// The closure `f` is called up to `MAX_RETRIES + 1` times. The final
/// attempt's outcome is returned as-is, so a persistent 503 reaches the
/// caller as a response for status inspection.
pub(crate) async fn retry_send<F, Fut>(f: F) -> Result<reqwest::Response, reqwest::Error>
where
    F: Fn() -> Fut,
    Fut: std::future::Future<Output = Result<reqwest::Response, reqwest::Error>>,
{
    for attempt in 0..MAX_RETRIES {
        let delay = Duration::from_millis(BASE_DELAY_MS * 2u64.pow(attempt));
        match f().await {
            Ok(resp) if is_transient_status(resp.status().as_u16()) => {
                tracing::warn!(
                    attempt = attempt + 1,
                    max_retries = MAX_RETRIES,
                    status = resp.status().as_u16(),
                    "Apifox returned a transient status, retrying in {delay:?}"
                );
            }
            Ok(resp) => return Ok(resp),
            Err(e) => {
                tracing::warn!(
                    attempt = attempt + 1,
                    max_retries = MAX_RETRIES,
                    "Apifox HTTP request failed, retrying in {delay:?}: {e}"
                );
            }
        }
        tokio::time::sleep(delay).await;
    }
    // Final attempt, no more retries.
    f().await
}
