pub mod client;
pub mod error;
pub mod execution;
pub mod latency;
pub mod types;

pub use client::{LocalWorkflowClient, OrderWorkflow, WorkflowClient, WorkflowHandle};
pub use error::{ActivityError, ActivityFailure, WorkflowError};
pub use execution::{RetryingExecutor, TaskExecutor};
pub use latency::LatencySimulator;
pub use types::{ActivityOptions, RetryPolicy};

pub type WorkflowResult<T> = Result<T, WorkflowError>;
