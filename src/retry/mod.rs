//! Retry with backoff
//!
//! A single retry primitive shared by the generation and publication legs.
//! The caller supplies the operation, a predicate that decides which errors
//! are worth another attempt, and a [`RetryPolicy`].

mod policy;

pub use policy::{Backoff, RetryPolicy};

use std::fmt;
use std::future::Future;

/// Terminal failure of a retried operation
#[derive(Debug)]
pub enum RetryError<E> {
    /// Every attempt failed with a retryable error
    Exhausted { attempts: u32, last: E },
    /// An attempt failed with an error the predicate refused to retry
    Aborted { attempt: u32, error: E },
}

impl<E> RetryError<E> {
    /// Number of calls made before giving up
    pub fn attempts(&self) -> u32 {
        match self {
            RetryError::Exhausted { attempts, .. } => *attempts,
            RetryError::Aborted { attempt, .. } => *attempt,
        }
    }

    /// Whether the budget ran out (as opposed to a non-retryable failure)
    pub fn is_exhausted(&self) -> bool {
        matches!(self, RetryError::Exhausted { .. })
    }

    /// The last error observed
    pub fn into_inner(self) -> E {
        match self {
            RetryError::Exhausted { last, .. } => last,
            RetryError::Aborted { error, .. } => error,
        }
    }
}

impl<E: fmt::Display> fmt::Display for RetryError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RetryError::Exhausted { attempts, last } => {
                write!(f, "Gave up after {} attempts: {}", attempts, last)
            }
            RetryError::Aborted { attempt, error } => {
                write!(f, "Non-retryable failure on attempt {}: {}", attempt, error)
            }
        }
    }
}

impl<E: fmt::Debug + fmt::Display> std::error::Error for RetryError<E> {}

/// Run `op` until it succeeds, fails with a non-retryable error, or the
/// policy's attempt budget is spent.
///
/// `op` receives the 1-based attempt number. Waits between attempts are
/// `tokio::time::sleep`, so concurrent runs keep making progress.
pub async fn retry<T, E, Op, Fut, P>(
    policy: &RetryPolicy,
    mut op: Op,
    is_retryable: P,
) -> Result<T, RetryError<E>>
where
    Op: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    P: Fn(&E) -> bool,
    E: fmt::Display,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        match op(attempt).await {
            Ok(value) => return Ok(value),
            Err(error) if !is_retryable(&error) => {
                return Err(RetryError::Aborted { attempt, error });
            }
            Err(last) if attempt >= max_attempts => {
                tracing::warn!(attempts = attempt, error = %last, "Retry budget exhausted");
                return Err(RetryError::Exhausted {
                    attempts: attempt,
                    last,
                });
            }
            Err(error) => {
                let delay = policy.delay_for(attempt);
                tracing::warn!(
                    attempt,
                    max_attempts,
                    delay_ms = delay.as_millis() as u64,
                    error = %error,
                    "Retryable failure, backing off"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}
