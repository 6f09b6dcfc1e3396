//! Bounded retry for upstream calls.

use super::MarketDataError;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// How often and how patiently an upstream call is retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub max_retries: u32,
    /// Pause between attempts.
    pub delay: Duration,
}

impl RetryPolicy {
    /// Creates a policy.
    #[must_use]
    pub fn new(max_retries: u32, delay: Duration) -> Self {
        Self { max_retries, delay }
    }

    /// Total number of attempts, first one included.
    #[must_use]
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_millis(250))
    }
}

/// Runs `op` until it succeeds or the policy is exhausted.
///
/// Errors that retrying cannot fix (see [`MarketDataError::is_retryable`])
/// are returned immediately.
///
/// # Errors
/// Returns [`MarketDataError::RetriesExhausted`] wrapping the last failure
/// once every attempt has failed.
pub async fn with_retry<T, F, Fut>(
    policy: RetryPolicy,
    label: &str,
    mut op: F,
) -> Result<T, MarketDataError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, MarketDataError>>,
{
    let max_attempts = policy.max_attempts();
    let mut attempt = 0;

    loop {
        attempt += 1;
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) if !err.is_retryable() => return Err(err),
            Err(err) if attempt >= max_attempts => {
                return Err(MarketDataError::RetriesExhausted {
                    attempts: attempt,
                    last: Box::new(err),
                });
            }
            Err(err) => {
                warn!(
                    "{} failed (attempt {}/{}): {}",
                    label, attempt, max_attempts, err
                );
                if !policy.delay.is_zero() {
                    tokio::time::sleep(policy.delay).await;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn transient() -> MarketDataError {
        MarketDataError::Status {
            status: 503,
            url: "https://example.test".to_string(),
        }
    }

    #[tokio::test]
    async fn test_succeeds_after_transient_failures() {
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy::new(3, Duration::ZERO);

        let counter = &calls;

        let result = with_retry(policy, "test", move || async move {
            if counter.fetch_add(1, Ordering::SeqCst) < 2 {
                Err(transient())
            } else {
                Ok(42)
            }
        })
        .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_attempts() {
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy::new(3, Duration::ZERO);

        let counter = &calls;

        let result: Result<(), _> = with_retry(policy, "test", move || async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Err(transient())
        })
        .await;

        assert_eq!(calls.load(Ordering::SeqCst), 4);
        match result {
            Err(MarketDataError::RetriesExhausted { attempts, last }) => {
                assert_eq!(attempts, 4);
                assert!(matches!(*last, MarketDataError::Status { status: 503, .. }));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_non_retryable_error_returns_immediately() {
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy::new(5, Duration::ZERO);

        let counter = &calls;

        let result: Result<(), _> = with_retry(policy, "test", move || async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Err(MarketDataError::NoData("XYZ".to_string()))
        })
        .await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(matches!(result, Err(MarketDataError::NoData(_))));
    }

    #[test]
    fn test_max_attempts() {
        assert_eq!(RetryPolicy::new(0, Duration::ZERO).max_attempts(), 1);
        assert_eq!(RetryPolicy::default().max_attempts(), 4);
    }
}
