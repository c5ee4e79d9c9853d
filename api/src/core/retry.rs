//! Exponential backoff around transient orchestrator failures.

use std::{future::Future, time::Duration};

use contextor::ContextorError;
use tracing::warn;

/// How often and how patiently a request is retried.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one.
    pub max_attempts: u32,
    /// Delay before the second attempt; doubles after each failure.
    pub initial_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(1000),
        }
    }
}

/// Runs `op` until it succeeds, fails deterministically, or attempts run out.
///
/// Only [`ContextorError::is_transient`] failures are retried. There is no
/// sleep after the last attempt; its error is returned as-is.
pub async fn retry_with_backoff<T, F, Fut>(
    policy: RetryPolicy,
    label: &str,
    mut op: F,
) -> Result<T, ContextorError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ContextorError>>,
{
    let attempts = policy.max_attempts.max(1);
    let mut delay = policy.initial_delay;

    let mut attempt = 1;
    loop {
        match op().await {
            Ok(v) => return Ok(v),
            Err(e) if e.is_transient() && attempt < attempts => {
                warn!(
                    op = label,
                    attempt,
                    max_attempts = attempts,
                    delay_ms = delay.as_millis() as u64,
                    error = %e,
                    "transient failure, retrying"
                );
                tokio::time::sleep(delay).await;
                delay = delay.saturating_mul(2);
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use tokio::time::Instant;

    fn policy() -> RetryPolicy {
        RetryPolicy {
            max_attempts: 3,
            initial_delay: Duration::from_millis(1000),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn retries_transient_errors_with_doubling_delay() {
        let calls = AtomicU32::new(0);
        let started = Instant::now();

        let out = retry_with_backoff(policy(), "ask", || async {
            let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
            if n < 3 {
                Err(ContextorError::Synthesis("overloaded".into()))
            } else {
                Ok(n)
            }
        })
        .await
        .unwrap();

        assert_eq!(out, 3);
        // 1s + 2s of backoff, no sleep after the successful attempt.
        let waited = started.elapsed();
        assert!(waited >= Duration::from_millis(3000) && waited < Duration::from_millis(3100));
    }

    #[tokio::test(start_paused = true)]
    async fn gives_up_after_max_attempts_without_trailing_sleep() {
        let calls = AtomicU32::new(0);
        let started = Instant::now();

        let err = retry_with_backoff(policy(), "ask", || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err::<(), _>(ContextorError::Synthesis("still down".into()))
        })
        .await
        .unwrap_err();

        assert!(matches!(err, ContextorError::Synthesis(_)));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        let waited = started.elapsed();
        assert!(waited >= Duration::from_millis(3000) && waited < Duration::from_millis(3100));
    }

    #[tokio::test(start_paused = true)]
    async fn deterministic_errors_are_not_retried() {
        let calls = AtomicU32::new(0);
        let err = retry_with_backoff(policy(), "ask", || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err::<(), _>(ContextorError::InvalidQuery("empty".into()))
        })
        .await
        .unwrap_err();

        assert!(matches!(err, ContextorError::InvalidQuery(_)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
