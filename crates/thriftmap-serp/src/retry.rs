//! Retry with exponential back-off for the SerpAPI client.
//!
//! Both the store search and the business-detail lookup hit the same
//! rate-limited upstream, so transient failures (429, network errors) are
//! retried with a growing delay. Anything else is returned immediately:
//! a 4xx or a malformed body will not get better on a second attempt.

use std::future::Future;
use std::time::Duration;

use crate::error::SerpError;

/// Returns `true` for errors worth retrying after a back-off delay.
pub(crate) fn is_retriable(err: &SerpError) -> bool {
    match err {
        SerpError::RateLimited { .. } => true,
        SerpError::Http(e) => e.is_timeout() || e.is_connect(),
        SerpError::UnexpectedStatus { status, .. } => *status >= 500,
        SerpError::Deserialize { .. } | SerpError::InvalidBaseUrl { .. } => false,
    }
}

/// Runs `operation` with up to `max_retries` additional attempts on
/// transient errors, sleeping `backoff_base_secs * 2^(attempt-1)` seconds
/// before each retry. The last error is returned once retries are exhausted;
/// non-retriable errors are returned without sleeping.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_secs: u64,
    mut operation: F,
) -> Result<T, SerpError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, SerpError>>,
{
    let mut attempt = 0u32;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_retriable(&err) || attempt >= max_retries {
                    return Err(err);
                }
                attempt += 1;
                let delay_secs = backoff_base_secs.saturating_mul(1u64 << (attempt - 1).min(10));
                tracing::warn!(
                    attempt,
                    max_retries,
                    delay_secs,
                    error = %err,
                    "transient SerpAPI error, retrying after back-off"
                );
                tokio::time::sleep(Duration::from_secs(delay_secs)).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    use super::*;

    fn rate_limited() -> SerpError {
        SerpError::RateLimited {
            retry_after_secs: 0,
        }
    }

    fn deserialize_err() -> SerpError {
        let source = serde_json::from_str::<()>("not json").unwrap_err();
        SerpError::Deserialize {
            context: "test".to_owned(),
            source,
        }
    }

    #[test]
    fn server_errors_are_retriable() {
        assert!(is_retriable(&SerpError::UnexpectedStatus {
            status: 503,
            url: "https://serpapi.com/search.json".to_owned(),
        }));
    }

    #[test]
    fn client_errors_are_not_retriable() {
        assert!(!is_retriable(&SerpError::UnexpectedStatus {
            status: 401,
            url: "https://serpapi.com/search.json".to_owned(),
        }));
    }

    #[test]
    fn deserialize_errors_are_not_retriable() {
        assert!(!is_retriable(&deserialize_err()));
    }

    #[tokio::test]
    async fn succeeds_immediately_on_first_try() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_with_backoff(3, 0, || {
            let c = Arc::clone(&c);
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                Ok::<u32, SerpError>(7)
            }
        })
        .await;
        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn retries_rate_limited_then_succeeds() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_with_backoff(3, 0, || {
            let c = Arc::clone(&c);
            async move {
                if c.fetch_add(1, Ordering::SeqCst) < 2 {
                    Err(rate_limited())
                } else {
                    Ok::<u32, SerpError>(9)
                }
            }
        })
        .await;
        assert_eq!(result.unwrap(), 9);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn returns_last_error_after_exhausting_retries() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_with_backoff(2, 0, || {
            let c = Arc::clone(&c);
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                Err::<u32, SerpError>(rate_limited())
            }
        })
        .await;
        // max_retries = 2 means 3 attempts in total.
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert!(matches!(result, Err(SerpError::RateLimited { .. })));
    }

    #[tokio::test]
    async fn does_not_retry_deserialize_errors() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_with_backoff(3, 0, || {
            let c = Arc::clone(&c);
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                Err::<u32, SerpError>(deserialize_err())
            }
        })
        .await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(matches!(result, Err(SerpError::Deserialize { .. })));
    }
}
