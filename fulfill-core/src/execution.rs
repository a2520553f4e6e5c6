//! Reliable task execution.
//!
//! Activities are submitted by name together with their [`ActivityOptions`];
//! the executor owns attempt timeouts, retry decisions and backoff so that the
//! workflow code only sees a final value or a terminal [`ActivityFailure`].

use std::future::Future;
use tracing::{error, info, warn};

use crate::error::{ActivityError, ActivityFailure};
use crate::types::ActivityOptions;

/// Runs a named operation under an activity policy.
///
/// `operation` is invoked once per attempt with the 1-based attempt number.
pub trait TaskExecutor: Send + Sync {
    fn execute<T, F, Fut>(
        &self,
        activity: &str,
        options: &ActivityOptions,
        operation: F,
    ) -> impl Future<Output = Result<T, ActivityFailure>> + Send
    where
        T: Send,
        F: Fn(u32) -> Fut + Send + Sync,
        Fut: Future<Output = Result<T, ActivityError>> + Send;
}

/// In-process executor: attempts run on the current tokio runtime and
/// backoff is a plain timer sleep.
#[derive(Debug, Clone, Copy, Default)]
pub struct RetryingExecutor;

impl RetryingExecutor {
    pub fn new() -> Self {
        Self
    }
}

impl TaskExecutor for RetryingExecutor {
    fn execute<T, F, Fut>(
        &self,
        activity: &str,
        options: &ActivityOptions,
        operation: F,
    ) -> impl Future<Output = Result<T, ActivityFailure>> + Send
    where
        T: Send,
        F: Fn(u32) -> Fut + Send + Sync,
        Fut: Future<Output = Result<T, ActivityError>> + Send,
    {
        async move {
            let timeout = options.start_to_close_timeout;
            let policy = &options.retry_policy;
            let mut attempt: u32 = 1;

            loop {
                let outcome = match tokio::time::timeout(timeout, operation(attempt)).await {
                    Ok(result) => result,
                    Err(_) => Err(ActivityError::Timeout(timeout)),
                };

                match outcome {
                    Ok(value) => {
                        if attempt > 1 {
                            info!(activity, attempt, "activity succeeded after retry");
                        }
                        return Ok(value);
                    }
                    Err(err) if !policy.should_retry(&err, attempt) => {
                        error!(activity, attempt, error = %err, "activity failed permanently");
                        return Err(ActivityFailure {
                            activity: activity.to_string(),
                            attempts: attempt,
                            cause: err,
                        });
                    }
                    Err(err) => {
                        let backoff = policy.backoff(attempt);
                        warn!(
                            activity,
                            attempt,
                            error = %err,
                            backoff_ms = backoff.as_millis() as u64,
                            "activity failed, retrying after backoff"
                        );
                        tokio::time::sleep(backoff).await;
                        attempt += 1;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RetryPolicy;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;
    use tokio::time::Instant;

    fn options(max_attempts: u32) -> ActivityOptions {
        ActivityOptions::new(Duration::from_secs(5)).with_retry_policy(
            RetryPolicy::default()
                .with_maximum_attempts(max_attempts)
                .with_non_retryable(["PaymentDeclined"]),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_transient_failures_are_retried() {
        let calls = AtomicU32::new(0);

        let result = RetryingExecutor
            .execute("ReserveInventory", &options(5), |attempt| {
                calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if attempt < 3 {
                        Err(ActivityError::ExecutionFailed("inventory service down".into()))
                    } else {
                        Ok(attempt)
                    }
                }
            })
            .await;

        assert_eq!(result.unwrap(), 3);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_non_retryable_error_fails_on_first_attempt() {
        let calls = AtomicU32::new(0);

        let result: Result<String, _> = RetryingExecutor
            .execute("ProcessPayment", &options(0), |_| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err::<String, _>(ActivityError::PaymentDeclined("Credit card expired".into())) }
            })
            .await;

        let failure = result.unwrap_err();
        assert_eq!(failure.activity, "ProcessPayment");
        assert_eq!(failure.attempts, 1);
        assert!(matches!(failure.cause, ActivityError::PaymentDeclined(_)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retries_stop_at_ceiling_with_backoff() {
        let start = Instant::now();

        let result: Result<(), _> = RetryingExecutor
            .execute("ReserveInventory", &options(4), |_| async {
                Err::<(), _>(ActivityError::ItemNotFound("Wool Suit@@@".into()))
            })
            .await;

        let failure = result.unwrap_err();
        assert_eq!(failure.attempts, 4);
        assert!(matches!(failure.cause, ActivityError::ItemNotFound(_)));
        // 1s + 2s + 4s between the four attempts
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_secs(7) && elapsed < Duration::from_secs(8));
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_attempts_time_out_and_are_retried() {
        let result = RetryingExecutor
            .execute("DeliverOrder", &options(3), |attempt| async move {
                if attempt == 1 {
                    tokio::time::sleep(Duration::from_secs(30)).await;
                }
                Ok::<_, ActivityError>("delivered")
            })
            .await;

        assert_eq!(result.unwrap(), "delivered");
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_is_terminal_once_attempts_run_out() {
        let result: Result<(), _> = RetryingExecutor
            .execute("DeliverOrder", &options(1), |_| async {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Ok::<(), ActivityError>(())
            })
            .await;

        assert_eq!(
            result.unwrap_err().cause,
            ActivityError::Timeout(Duration::from_secs(5))
        );
    }
}
