//! Bounded retry with a fixed delay.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::error::SourceError;

/// Suspension primitive used between attempts.
///
/// Sessions take it as a parameter so tests can swap in [`NoDelay`].
#[async_trait]
pub trait Delay: Send + Sync {
    async fn wait(&self, duration: Duration);
}

/// Sleeps on the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioDelay;

#[async_trait]
impl Delay for TokioDelay {
    async fn wait(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Returns immediately.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDelay;

#[async_trait]
impl Delay for NoDelay {
    async fn wait(&self, _duration: Duration) {}
}

/// How often and how far apart a failing call is repeated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub max_retries: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// Last error of a call that did not succeed.
#[derive(Debug, Clone, Error)]
#[error("{source} (after {attempts} attempt(s))")]
pub struct RetryError {
    pub attempts: u32,
    pub source: SourceError,
}

/// Runs `op` until it succeeds, fails with a non-retryable error, or
/// exhausts the policy's retries.
pub async fn retry<T, F, Fut>(
    policy: &RetryPolicy,
    delay: &(impl Delay + ?Sized),
    mut op: F,
) -> Result<T, RetryError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, SourceError>>,
{
    let mut attempts = 0;
    loop {
        attempts += 1;
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) if err.is_retryable() && attempts <= policy.max_retries => {
                tracing::warn!(
                    attempt = attempts,
                    max_retries = policy.max_retries,
                    error = %err,
                    "source call failed, retrying"
                );
                delay.wait(policy.delay).await;
            }
            Err(source) => return Err(RetryError { attempts, source }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn succeeds_after_transient_failures() {
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let result = retry(&RetryPolicy::default(), &NoDelay, || async move {
            if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                Err(SourceError::Transient("flaky".into()))
            } else {
                Ok(7)
            }
        })
        .await;
        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn gives_up_after_max_retries() {
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let err = retry(&RetryPolicy::default(), &NoDelay, || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Err::<(), _>(SourceError::Transient("down".into()))
        })
        .await
        .unwrap_err();
        assert_eq!(err.attempts, 4);
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn permanent_errors_are_not_retried() {
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let err = retry(&RetryPolicy::default(), &NoDelay, || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Err::<(), _>(SourceError::FieldNotFound("fld".into()))
        })
        .await
        .unwrap_err();
        assert_eq!(err.attempts, 1);
        assert_eq!(err.source, SourceError::FieldNotFound("fld".into()));
    }

    #[tokio::test(start_paused = true)]
    async fn waits_fixed_delay_between_attempts() {
        let started = tokio::time::Instant::now();
        let policy = RetryPolicy::default().with_max_retries(2);
        let _ = retry(&policy, &TokioDelay, || async {
            Err::<(), _>(SourceError::Transient("down".into()))
        })
        .await;
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_secs(2) && elapsed < Duration::from_secs(3));
    }
}
