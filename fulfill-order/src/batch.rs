use fulfill_core::WorkflowClient;
use fulfill_shared::Order;
use futures_util::future::join_all;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

/// How long the driver waits on each workflow
pub const DEFAULT_WAIT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderOutcome {
    Succeeded(String),
    Failed(String),
}

impl OrderOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, OrderOutcome::Succeeded(_))
    }
}

#[derive(Debug, Clone)]
pub struct OrderReport {
    /// Position of the order in the submitted batch
    pub index: usize,
    pub workflow_id: String,
    pub outcome: OrderOutcome,
}

impl fmt::Display for OrderReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.outcome {
            OrderOutcome::Succeeded(result) => {
                write!(f, "Workflow {} succeeded with result: {}", self.index + 1, result)
            }
            OrderOutcome::Failed(reason) => {
                write!(f, "Workflow {} failed with reason: {}", self.index + 1, reason)
            }
        }
    }
}

/// One outcome per submitted order, in submission order
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    pub reports: Vec<OrderReport>,
}

impl BatchReport {
    pub fn len(&self) -> usize {
        self.reports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

    pub fn succeeded(&self) -> usize {
        self.reports.iter().filter(|r| r.outcome.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.len() - self.succeeded()
    }
}

/// Launches one workflow per order and collects every outcome
pub struct BatchDriver {
    client: Arc<dyn WorkflowClient>,
    task_queue: String,
    wait_timeout: Duration,
}

impl BatchDriver {
    pub fn new(client: Arc<dyn WorkflowClient>, task_queue: impl Into<String>) -> Self {
        Self {
            client,
            task_queue: task_queue.into(),
            wait_timeout: DEFAULT_WAIT_TIMEOUT,
        }
    }

    pub fn with_wait_timeout(mut self, wait_timeout: Duration) -> Self {
        self.wait_timeout = wait_timeout;
        self
    }

    /// Start every order at once, then wait on each independently.
    ///
    /// A failed or timed-out order never affects its siblings, and a timed-out
    /// workflow is left running.
    pub async fn run(&self, orders: Vec<Order>) -> BatchReport {
        info!(orders = orders.len(), task_queue = %self.task_queue, "starting workflows");

        // Collecting starts every workflow before any wait begins.
        let waits: Vec<_> = orders
            .into_iter()
            .enumerate()
            .map(|(index, order)| {
                let workflow_id = format!(
                    "order-fulfill-{}-{}",
                    index,
                    chrono::Utc::now().timestamp_millis()
                );
                let started = self
                    .client
                    .start_orchestration(order, &self.task_queue, workflow_id.clone());
                let wait_timeout = self.wait_timeout;

                async move {
                    let result = match started {
                        Ok(handle) => handle.await_result(wait_timeout).await,
                        Err(e) => Err(e),
                    };
                    let outcome = match result {
                        Ok(result) => OrderOutcome::Succeeded(result),
                        Err(e) => OrderOutcome::Failed(e.to_string()),
                    };
                    OrderReport {
                        index,
                        workflow_id,
                        outcome,
                    }
                }
            })
            .collect();

        let reports = join_all(waits).await;

        for report in &reports {
            match report.outcome {
                OrderOutcome::Succeeded(_) => info!(workflow_id = %report.workflow_id, "{}", report),
                OrderOutcome::Failed(_) => error!(workflow_id = %report.workflow_id, "{}", report),
            }
        }

        BatchReport { reports }
    }
}
