//! Rotating-credential retry wrapper.

use crate::KeyPool;
use rand::Rng;
use std::time::Duration;
use tracing::{debug, warn};
use vignette_error::{KeyError, KeyErrorKind, RateLimited, VignetteResult};

/// Retry policy for [`retry_with_rotation`].
///
/// Total attempts are bounded by `pool size × max_retries_per_key`. Backoff
/// applies only to rate-limit failures and grows exponentially with the
/// number of full pool rotations already completed, not the raw attempt
/// count: burning through every key once is one escalation step.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Attempts allowed per key in the pool
    pub max_retries_per_key: usize,
    /// Backoff before any rotation has completed
    pub base_backoff: Duration,
    /// Cap applied to the exponential backoff
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries_per_key: 2,
            base_backoff: Duration::from_millis(1000),
            max_backoff: Duration::from_secs(30),
        }
    }
}

impl RetryPolicy {
    /// Backoff before the next attempt, given how many full pool rotations
    /// have completed. Random jitter of up to half the base is added to
    /// avoid synchronized retries.
    fn backoff(&self, completed_rotations: u32) -> Duration {
        let exp = self
            .base_backoff
            .saturating_mul(2u32.saturating_pow(completed_rotations))
            .min(self.max_backoff);
        let jitter_cap = (self.base_backoff.as_millis() as u64 / 2).max(1);
        let jitter = rand::thread_rng().gen_range(0..jitter_cap);
        exp + Duration::from_millis(jitter)
    }
}

/// Invoke `op` with keys from the pool, rotating to the next key on every
/// attempt.
///
/// The cursor advances on every attempt regardless of outcome, so separate
/// calls to this wrapper continue rotating where the last one left off.
/// Rate-limit failures (per [`RateLimited`]) incur an exponential backoff
/// delay before the next attempt; other failures retry immediately.
///
/// Returns the first successful result. If every attempt fails, returns an
/// aggregate error reporting the final failure and the total attempt count.
///
/// # Errors
///
/// - [`KeyErrorKind::EmptyPool`] immediately if the pool holds no keys.
/// - [`KeyErrorKind::Exhausted`] after `pool size × max_retries_per_key`
///   failed attempts.
///
/// # Examples
///
/// ```
/// use vignette_error::{ProviderError, ProviderErrorKind};
/// use vignette_keys::{KeyPool, RetryPolicy, retry_with_rotation};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let mut pool = KeyPool::new(vec!["good-key".to_string()]);
/// let result: Result<_, _> = retry_with_rotation(
///     &mut pool,
///     &RetryPolicy::default(),
///     |key| async move {
///         Ok::<_, ProviderError>(format!("called with {key}"))
///     },
/// )
/// .await;
/// assert!(result.is_ok());
/// # }
/// ```
pub async fn retry_with_rotation<T, E, F, Fut>(
    pool: &mut KeyPool,
    policy: &RetryPolicy,
    mut op: F,
) -> VignetteResult<T>
where
    E: std::fmt::Display + RateLimited,
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    if pool.is_empty() {
        return Err(KeyError::new(KeyErrorKind::EmptyPool).into());
    }

    let pool_size = pool.len();
    let max_attempts = pool_size * policy.max_retries_per_key;
    let mut last_error = String::new();

    for attempt in 0..max_attempts {
        let key = pool.next_key()?;
        match op(key).await {
            Ok(value) => {
                if attempt > 0 {
                    debug!(attempt = attempt + 1, "Succeeded after retry");
                }
                return Ok(value);
            }
            Err(e) => {
                let rate_limited = e.is_rate_limit();
                last_error = e.to_string();
                warn!(
                    attempt = attempt + 1,
                    max_attempts,
                    rate_limited,
                    error = %last_error,
                    "Attempt failed"
                );

                if rate_limited && attempt + 1 < max_attempts {
                    let completed_rotations = ((attempt + 1) / pool_size) as u32;
                    let delay = policy.backoff(completed_rotations);
                    debug!(delay_ms = delay.as_millis() as u64, "Backing off after rate limit");
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }

    Err(KeyError::new(KeyErrorKind::Exhausted {
        attempts: max_attempts,
        last_error,
    })
    .into())
}
