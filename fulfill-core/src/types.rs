use std::time::Duration;
use tracing::debug;

use crate::error::ActivityError;

/// Retry policy for activities
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Delay before the second attempt
    pub initial_interval: Duration,
    /// Growth factor between consecutive delays (2.0 doubles them)
    pub backoff_coefficient: f64,
    /// Upper bound for any single delay
    pub maximum_interval: Duration,
    /// Total attempts allowed, 0 means unlimited
    pub maximum_attempts: u32,
    /// Error types (see `ActivityError::error_type`) that fail immediately
    pub non_retryable_error_types: Vec<String>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            initial_interval: Duration::from_secs(1),
            backoff_coefficient: 2.0,
            maximum_interval: Duration::from_secs(100),
            maximum_attempts: 0, // Unlimited
            non_retryable_error_types: vec![],
        }
    }
}

impl RetryPolicy {
    pub fn with_maximum_attempts(mut self, maximum_attempts: u32) -> Self {
        self.maximum_attempts = maximum_attempts;
        self
    }

    pub fn with_non_retryable<I, S>(mut self, error_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.non_retryable_error_types
            .extend(error_types.into_iter().map(Into::into));
        self
    }

    /// Whether `attempt` (1-based) failing with `error` should be followed by another try.
    pub fn should_retry(&self, error: &ActivityError, attempt: u32) -> bool {
        if self.maximum_attempts > 0 && attempt >= self.maximum_attempts {
            debug!(
                attempt,
                max_attempts = self.maximum_attempts,
                "max attempts reached, not retrying"
            );
            return false;
        }

        let error_type = error.error_type();
        if self.non_retryable_error_types.iter().any(|t| t == error_type) {
            debug!(error_type, "error is explicitly non-retryable");
            return false;
        }

        true
    }

    /// Backoff to wait after `attempt` (1-based) failed.
    pub fn backoff(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(i32::MAX as u32) as i32;
        let secs = self.initial_interval.as_secs_f64() * self.backoff_coefficient.powi(exponent);

        match Duration::try_from_secs_f64(secs) {
            Ok(backoff) if backoff <= self.maximum_interval => backoff,
            _ => {
                debug!(
                    max_interval_ms = self.maximum_interval.as_millis() as u64,
                    "backoff capped at maximum"
                );
                self.maximum_interval
            }
        }
    }
}

/// Per-activity invocation options
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityOptions {
    /// Ceiling for a single attempt
    pub start_to_close_timeout: Duration,
    pub retry_policy: RetryPolicy,
}

impl ActivityOptions {
    pub fn new(start_to_close_timeout: Duration) -> Self {
        Self {
            start_to_close_timeout,
            retry_policy: RetryPolicy::default(),
        }
    }

    pub fn with_retry_policy(mut self, retry_policy: RetryPolicy) -> Self {
        self.retry_policy = retry_policy;
        self
    }
}
