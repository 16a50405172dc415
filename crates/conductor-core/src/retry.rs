//! Bounded retry with linear backoff and jitter.
//!
//! Attempt `n` (1-based) that fails is followed by a sleep of
//! `n * backoff + jitter`, jitter drawn uniformly from `[0, max_jitter)`.
//! After `max_attempts` failed attempts the most recent error is returned.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;
use std::time::Duration;

/// Attempt cap and delay parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff: Duration,
    pub max_jitter: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff: Duration::from_millis(500),
            max_jitter: Duration::from_millis(100),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            ..Self::default()
        }
    }

    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    pub fn with_max_jitter(mut self, max_jitter: Duration) -> Self {
        self.max_jitter = max_jitter;
        self
    }

    /// Base delay after the given failed attempt, without jitter.
    pub fn base_delay(&self, attempt: u32) -> Duration {
        self.backoff.saturating_mul(attempt)
    }

    /// Full delay after the given failed attempt: base delay plus jitter,
    /// saturating at `Duration::MAX`.
    pub fn delay(&self, attempt: u32) -> Duration {
        self.base_delay(attempt).saturating_add(self.jitter())
    }

    fn jitter(&self) -> Duration {
        let max_ms = self.max_jitter.as_millis() as u64;
        if max_ms == 0 {
            return Duration::ZERO;
        }
        Duration::from_millis(rand::rng().random_range(0..max_ms))
    }
}

/// Failure of a retried operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryError<E> {
    /// Every attempt failed. Carries the last error.
    Exhausted { attempts: u32, source: E },
    /// The loop ended without capturing any error.
    Unknown,
}

impl<E> RetryError<E> {
    /// Number of attempts made before giving up.
    pub fn attempts(&self) -> u32 {
        match self {
            RetryError::Exhausted { attempts, .. } => *attempts,
            RetryError::Unknown => 0,
        }
    }

    /// The last error raised by the operation, if any.
    pub fn into_source(self) -> Option<E> {
        match self {
            RetryError::Exhausted { source, .. } => Some(source),
            RetryError::Unknown => None,
        }
    }
}

impl<E: fmt::Display> fmt::Display for RetryError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RetryError::Exhausted { attempts, source } => {
                write!(f, "gave up after {} attempts: {}", attempts, source)
            }
            RetryError::Unknown => f.write_str("unknown retry error"),
        }
    }
}

impl<E> std::error::Error for RetryError<E>
where
    E: std::error::Error + 'static,
{
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RetryError::Exhausted { source, .. } => Some(source),
            RetryError::Unknown => None,
        }
    }
}

type RetryObserver<'a, E> = Box<dyn Fn(u32, &E) + Send + Sync + 'a>;

/// Retry executor.
///
/// ```rust,ignore
/// let value = Retry::new(RetryPolicy::default())
///     .on_retry(|attempt, err| warn!(attempt, %err, "retrying"))
///     .run(|| client.fetch())
///     .await?;
/// ```
pub struct Retry<'a, E> {
    policy: RetryPolicy,
    on_retry: Option<RetryObserver<'a, E>>,
}

impl<'a, E> Retry<'a, E> {
    pub fn new(policy: RetryPolicy) -> Self {
        Self {
            policy,
            on_retry: None,
        }
    }

    /// Observer called before each backoff with the 1-based number of the
    /// attempt that just failed.
    pub fn on_retry(mut self, observer: impl Fn(u32, &E) + Send + Sync + 'a) -> Self {
        self.on_retry = Some(Box::new(observer));
        self
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Run `operation` until it succeeds or the attempt cap is reached.
    pub async fn run<T, F, Fut>(&self, mut operation: F) -> Result<T, RetryError<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let mut attempt = 0;
        let mut last_error = None;

        while attempt < self.policy.max_attempts {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(err) => {
                    attempt += 1;
                    if attempt >= self.policy.max_attempts {
                        last_error = Some(err);
                        break;
                    }

                    if let Some(observer) = &self.on_retry {
                        observer(attempt, &err);
                    }
                    last_error = Some(err);

                    tokio::time::sleep(self.policy.delay(attempt)).await;
                }
            }
        }

        match last_error {
            Some(source) => Err(RetryError::Exhausted {
                attempts: attempt,
                source,
            }),
            None => Err(RetryError::Unknown),
        }
    }
}

/// Run `operation` under `policy` without a retry observer.
pub async fn with_retries<T, E, F, Fut>(operation: F, policy: RetryPolicy) -> Result<T, RetryError<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    Retry::new(policy).run(operation).await
}
