//! Retry policy
//!
//! Throttled API Gateway calls are retried with jittered exponential
//! backoff. The policy is a plain value so it can be inspected, overridden
//! from configuration and exercised without a network.

use crate::error::{ApiError, FetchError};
use rand::Rng;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, warn};

/// Total attempts (first call included) before giving up
pub const DEFAULT_MAX_ATTEMPTS: u32 = 10;

/// Base delay; doubles on each retry
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_secs(10);

/// Upper bound for a single delay
pub const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(60);

/// Error codes treated as throttling or transient service faults
pub const DEFAULT_RETRY_ON: &[&str] = &[
    "RequestLimitExceeded",
    "Unavailable",
    "ServiceUnavailable",
    "InternalFailure",
    "InternalError",
    "TooManyRequestsException",
    "Throttling",
];

/// How randomness is applied to the exponential delay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Jitter {
    /// Uniform in `[0, cap]`
    Full,
    /// Exactly `cap`
    None,
}

/// Retry policy for a single API operation
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
    pub jitter: Jitter,
    /// Error codes that trigger a retry
    pub retry_on: Vec<String>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay: DEFAULT_BASE_DELAY,
            max_delay: DEFAULT_MAX_DELAY,
            jitter: Jitter::Full,
            retry_on: DEFAULT_RETRY_ON.iter().map(|c| c.to_string()).collect(),
        }
    }
}

impl RetryPolicy {
    /// Policy that never sleeps; keeps attempt counting and classification
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            base_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
            jitter: Jitter::None,
            ..Self::default()
        }
    }

    /// Also retry on these codes
    pub fn with_extra_codes<I, S>(mut self, codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for code in codes {
            let code = code.into();
            if !self.retry_on.contains(&code) {
                self.retry_on.push(code);
            }
        }
        self
    }

    /// Whether an error should be retried
    pub fn is_retryable(&self, err: &ApiError) -> bool {
        match err.code() {
            Some(code) => code.contains("Throttling") || self.retry_on.iter().any(|c| c == code),
            None => false,
        }
    }

    /// Upper bound of the delay before retry number `retry` (0-based)
    pub fn delay_cap(&self, retry: u32) -> Duration {
        let factor = 1u32.checked_shl(retry).unwrap_or(u32::MAX);
        self.base_delay
            .checked_mul(factor)
            .unwrap_or(self.max_delay)
            .min(self.max_delay)
    }

    /// Delay to sleep before retry number `retry` (0-based)
    pub fn delay_for(&self, retry: u32) -> Duration {
        let cap = self.delay_cap(retry);
        match self.jitter {
            Jitter::None => cap,
            Jitter::Full => {
                let cap_ms = u64::try_from(cap.as_millis()).unwrap_or(u64::MAX);
                Duration::from_millis(rand::thread_rng().gen_range(0..=cap_ms))
            }
        }
    }

    /// Run `f` until it succeeds, fails with a non-retryable error, or the
    /// attempt budget is spent.
    ///
    /// Returns the value together with the number of retries performed.
    pub async fn run<F, Fut, T>(&self, operation_name: &str, mut f: F) -> Result<(T, u32), FetchError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            match f().await {
                Ok(value) => {
                    if attempt > 1 {
                        debug!(
                            "Operation '{}' succeeded on attempt {}/{}",
                            operation_name, attempt, max_attempts
                        );
                    }
                    return Ok((value, attempt - 1));
                }
                Err(e) if !self.is_retryable(&e) => {
                    debug!("Operation '{}' failed with non-retryable error: {}", operation_name, e);
                    return Err(FetchError::Api(e));
                }
                Err(e) if attempt >= max_attempts => {
                    error!(
                        "Operation '{}' failed after {} attempts: {}",
                        operation_name, max_attempts, e
                    );
                    return Err(FetchError::Throttled {
                        attempts: max_attempts,
                        source: e,
                    });
                }
                Err(e) => {
                    let delay = self.delay_for(attempt - 1);
                    warn!(
                        "Operation '{}' failed on attempt {}/{}: {} (retrying in {:?})",
                        operation_name, attempt, max_attempts, e, delay
                    );

                    sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn throttled() -> ApiError {
        ApiError::service("TooManyRequestsException", "Too Many Requests")
    }

    #[test]
    fn test_default_policy_values() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, 10);
        assert_eq!(policy.base_delay, Duration::from_secs(10));
        assert_eq!(policy.jitter, Jitter::Full);
        assert!(policy.retry_on.iter().any(|c| c == "TooManyRequestsException"));
    }

    #[test]
    fn test_retryable_classification() {
        let policy = RetryPolicy::default();
        assert!(policy.is_retryable(&throttled()));
        assert!(policy.is_retryable(&ApiError::service("ThrottlingException", "slow down")));
        assert!(policy.is_retryable(&ApiError::service("ServiceUnavailable", "")));
        assert!(!policy.is_retryable(&ApiError::service("NotFoundException", "")));
        assert!(!policy.is_retryable(&ApiError::service("BadRequestException", "")));
        assert!(!policy.is_retryable(&ApiError::Transport("timeout".into())));
    }

    #[test]
    fn test_extra_codes() {
        let policy = RetryPolicy::default().with_extra_codes(["ConflictException", "Throttling"]);
        assert!(policy.is_retryable(&ApiError::service("ConflictException", "")));
        assert_eq!(
            policy.retry_on.iter().filter(|c| c.as_str() == "Throttling").count(),
            1
        );
    }

    #[test]
    fn test_delay_cap_grows_and_saturates() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_cap(0), Duration::from_secs(10));
        assert_eq!(policy.delay_cap(1), Duration::from_secs(20));
        assert_eq!(policy.delay_cap(2), Duration::from_secs(40));
        assert_eq!(policy.delay_cap(3), Duration::from_secs(60));
        assert_eq!(policy.delay_cap(40), Duration::from_secs(60));
    }

    #[test]
    fn test_full_jitter_stays_within_cap() {
        let policy = RetryPolicy::default();
        for retry in 0..6 {
            let cap = policy.delay_cap(retry);
            for _ in 0..50 {
                assert!(policy.delay_for(retry) <= cap);
            }
        }
    }

    #[test]
    fn test_no_jitter_is_exact() {
        let policy = RetryPolicy {
            jitter: Jitter::None,
            ..RetryPolicy::default()
        };
        assert_eq!(policy.delay_for(1), Duration::from_secs(20));
    }

    #[tokio::test]
    async fn test_run_recovers_after_throttling() {
        let calls = Cell::new(0u32);
        let policy = RetryPolicy::immediate(10);

        let (value, retries) = policy
            .run("get_resources", || {
                calls.set(calls.get() + 1);
                let n = calls.get();
                async move {
                    if n < 4 {
                        Err(throttled())
                    } else {
                        Ok("done")
                    }
                }
            })
            .await
            .unwrap();

        assert_eq!(value, "done");
        assert_eq!(retries, 3);
        assert_eq!(calls.get(), 4);
    }

    #[tokio::test]
    async fn test_run_gives_up_after_budget() {
        let calls = Cell::new(0u32);
        let policy = RetryPolicy::immediate(10);

        let err = policy
            .run("get_resources", || {
                calls.set(calls.get() + 1);
                async { Err::<(), _>(throttled()) }
            })
            .await
            .unwrap_err();

        assert!(err.is_throttled());
        assert_eq!(calls.get(), 10);
    }

    #[tokio::test]
    async fn test_run_does_not_retry_other_errors() {
        let calls = Cell::new(0u32);
        let policy = RetryPolicy::immediate(10);

        let err = policy
            .run("get_resources", || {
                calls.set(calls.get() + 1);
                async { Err::<(), _>(ApiError::service("NotFoundException", "Invalid API identifier specified")) }
            })
            .await
            .unwrap_err();

        assert!(matches!(err, FetchError::Api(_)));
        assert_eq!(calls.get(), 1);
    }
}
