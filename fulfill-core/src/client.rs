//! Workflow invocation boundary.
//!
//! Workflows are registered against a task queue; clients start them by
//! queue name and observe them through a [`WorkflowHandle`]. Observing is
//! decoupled from running: giving up on a handle (timeout or drop) leaves the
//! workflow running to completion.

use async_trait::async_trait;
use fulfill_shared::Order;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

use crate::error::WorkflowError;
use crate::WorkflowResult;

/// Entry point of a workflow that fulfills one order
#[async_trait]
pub trait OrderWorkflow: Send + Sync {
    async fn fulfill_order(&self, order: Order) -> WorkflowResult<String>;
}

pub trait WorkflowClient: Send + Sync {
    /// Start a workflow on `task_queue` and return immediately.
    fn start_orchestration(
        &self,
        order: Order,
        task_queue: &str,
        workflow_id: String,
    ) -> WorkflowResult<WorkflowHandle>;
}

/// Handle to a started workflow execution
pub struct WorkflowHandle {
    workflow_id: String,
    run_id: Uuid,
    task: JoinHandle<WorkflowResult<String>>,
}

impl WorkflowHandle {
    pub fn new(workflow_id: String, task: JoinHandle<WorkflowResult<String>>) -> Self {
        Self {
            workflow_id,
            run_id: Uuid::new_v4(),
            task,
        }
    }

    pub fn workflow_id(&self) -> &str {
        &self.workflow_id
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// Wait up to `timeout` for the workflow result.
    ///
    /// On timeout the handle is dropped but the workflow keeps running.
    pub async fn await_result(mut self, timeout: Duration) -> WorkflowResult<String> {
        match tokio::time::timeout(timeout, &mut self.task).await {
            Ok(Ok(result)) => result,
            Ok(Err(join_error)) => Err(WorkflowError::Aborted {
                workflow_id: self.workflow_id,
                reason: join_error.to_string(),
            }),
            Err(_) => Err(WorkflowError::Timeout {
                workflow_id: self.workflow_id,
                timeout,
            }),
        }
    }
}

/// Client whose workers run in-process on the tokio runtime.
///
/// Must be used from within a runtime: starting a workflow spawns a task.
#[derive(Clone, Default)]
pub struct LocalWorkflowClient {
    workers: HashMap<String, Arc<dyn OrderWorkflow>>,
}

impl LocalWorkflowClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a workflow implementation to serve `task_queue`.
    pub fn register_worker(&mut self, task_queue: impl Into<String>, workflow: Arc<dyn OrderWorkflow>) {
        let task_queue = task_queue.into();
        info!(task_queue = %task_queue, "worker registered");
        self.workers.insert(task_queue, workflow);
    }
}

impl WorkflowClient for LocalWorkflowClient {
    fn start_orchestration(
        &self,
        order: Order,
        task_queue: &str,
        workflow_id: String,
    ) -> WorkflowResult<WorkflowHandle> {
        let workflow = self
            .workers
            .get(task_queue)
            .cloned()
            .ok_or_else(|| WorkflowError::UnknownTaskQueue(task_queue.to_string()))?;

        let span = info_span!("workflow", workflow_id = %workflow_id, task_queue);
        let task = tokio::spawn(async move { workflow.fulfill_order(order).await }.instrument(span));

        let handle = WorkflowHandle::new(workflow_id, task);
        info!(
            workflow_id = handle.workflow_id(),
            run_id = %handle.run_id(),
            "workflow started"
        );
        Ok(handle)
    }
}
