use std::time::Duration;

/// Failure of a single activity attempt
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ActivityError {
    #[error("Payment failed: {0}")]
    PaymentDeclined(String),

    #[error("Couldn't find item in stock database: {0}")]
    ItemNotFound(String),

    #[error("Attempt timed out after {}ms", .0.as_millis())]
    Timeout(Duration),

    #[error("{0}")]
    ExecutionFailed(String),
}

impl ActivityError {
    /// Stable type name matched against a retry policy's do-not-retry list.
    pub fn error_type(&self) -> &'static str {
        match self {
            ActivityError::PaymentDeclined(_) => "PaymentDeclined",
            ActivityError::ItemNotFound(_) => "ItemNotFound",
            ActivityError::Timeout(_) => "Timeout",
            ActivityError::ExecutionFailed(_) => "ExecutionFailed",
        }
    }
}

/// Terminal failure of an activity: retries exhausted or not retryable
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{activity} failed after {attempts} attempt(s): {cause}")]
pub struct ActivityFailure {
    pub activity: String,
    pub attempts: u32,
    #[source]
    pub cause: ActivityError,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WorkflowError {
    #[error("Order fulfillment failed: {0}")]
    ActivityFailed(#[from] ActivityFailure),

    #[error("No worker registered for task queue: {0}")]
    UnknownTaskQueue(String),

    #[error("Workflow {workflow_id} did not complete within {}s", .timeout.as_secs())]
    Timeout {
        workflow_id: String,
        timeout: Duration,
    },

    #[error("Workflow {workflow_id} aborted: {reason}")]
    Aborted { workflow_id: String, reason: String },
}
