//! Retry helper for transient fetch failures.
//!
//! Transport errors and 5xx statuses are retried; everything else (4xx, page
//! shape, field format) would fail the same way on a retry and is propagated
//! immediately.

use std::future::Future;
use std::time::Duration;

use crate::error::ScraperError;

fn is_retriable(err: &ScraperError) -> bool {
    match err {
        ScraperError::Transport(_) => true,
        ScraperError::UnexpectedStatus { status, .. } => *status >= 500,
        _ => false,
    }
}

/// Executes `operation` with exponential backoff retries on transient errors.
///
/// On a retriable error the function sleeps `backoff_base_secs * 2^attempt`
/// seconds and tries again, up to `max_retries` additional attempts after
/// the first try. The last error is returned when retries are exhausted.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_secs: u64,
    mut operation: F,
) -> Result<T, ScraperError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ScraperError>>,
{
    let mut attempt: u32 = 0;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) if is_retriable(&err) && attempt < max_retries => {
                let delay_secs = backoff_base_secs.saturating_mul(1_u64 << attempt.min(16));
                tracing::warn!(
                    attempt = attempt + 1,
                    max_retries,
                    delay_secs,
                    error = %err,
                    "transient fetch failure, backing off"
                );
                tokio::time::sleep(Duration::from_secs(delay_secs)).await;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;

    #[tokio::test]
    async fn success_is_returned_immediately() {
        let calls = AtomicU32::new(0);
        let result = retry_with_backoff(3, 0, || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok::<_, ScraperError>(42)
        })
        .await;
        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn non_retriable_error_is_not_retried() {
        let calls = AtomicU32::new(0);
        let result = retry_with_backoff(3, 0, || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err::<u32, _>(ScraperError::UnexpectedStatus {
                status: 404,
                url: "https://example.test/".to_owned(),
            })
        })
        .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn server_errors_are_retried_until_exhaustion() {
        let calls = AtomicU32::new(0);
        let result = retry_with_backoff(2, 0, || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err::<u32, _>(ScraperError::UnexpectedStatus {
                status: 503,
                url: "https://example.test/".to_owned(),
            })
        })
        .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }
}
