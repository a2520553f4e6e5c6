//! Order fulfillment workflow.
//!
//! Payment, inventory reservation and delivery are dispatched together and
//! none of them waits on another: delivery may run before payment or
//! inventory are known to have succeeded. The approval check runs alongside
//! them; its answer is logged and otherwise unused, so high-value orders are
//! not held back.

use async_trait::async_trait;
use fulfill_core::{
    ActivityError, ActivityFailure, ActivityOptions, OrderWorkflow, RetryPolicy, RetryingExecutor,
    TaskExecutor, WorkflowError, WorkflowResult,
};
use fulfill_shared::Order;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{error, info, warn, Instrument};

use crate::activities::{
    FulfillmentActivities, CHECK_APPROVAL, DELIVER_ORDER, PROCESS_PAYMENT, RESERVE_INVENTORY,
};

/// Per-attempt ceiling for every fulfillment activity
pub const ACTIVITY_START_TO_CLOSE_TIMEOUT: Duration = Duration::from_secs(5);

/// Options the workflow declares for its activities: 5s attempts, provider
/// backoff, and no retries for a declined payment.
pub fn default_activity_options() -> ActivityOptions {
    ActivityOptions::new(ACTIVITY_START_TO_CLOSE_TIMEOUT)
        .with_retry_policy(RetryPolicy::default().with_non_retryable(["PaymentDeclined"]))
}

pub struct OrderFulfillWorkflow<E = RetryingExecutor> {
    activities: Arc<dyn FulfillmentActivities>,
    executor: E,
    options: ActivityOptions,
}

impl OrderFulfillWorkflow<RetryingExecutor> {
    pub fn new(activities: Arc<dyn FulfillmentActivities>, options: ActivityOptions) -> Self {
        Self::with_executor(activities, RetryingExecutor::new(), options)
    }
}

impl<E: TaskExecutor + Clone + 'static> OrderFulfillWorkflow<E> {
    pub fn with_executor(
        activities: Arc<dyn FulfillmentActivities>,
        executor: E,
        options: ActivityOptions,
    ) -> Self {
        Self {
            activities,
            executor,
            options,
        }
    }

    pub fn options(&self) -> &ActivityOptions {
        &self.options
    }

    /// Start one step on its own task so it runs regardless of how its
    /// siblings fare.
    fn dispatch<T, F, Fut>(
        &self,
        activity: &'static str,
        order: &Arc<Order>,
        step: F,
    ) -> JoinHandle<Result<T, ActivityFailure>>
    where
        T: Send + 'static,
        F: Fn(Arc<dyn FulfillmentActivities>, Arc<Order>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, ActivityError>> + Send + 'static,
    {
        let executor = self.executor.clone();
        let options = self.options.clone();
        let activities = self.activities.clone();
        let order = order.clone();

        tokio::spawn(
            async move {
                executor
                    .execute(activity, &options, |_| step(activities.clone(), order.clone()))
                    .await
            }
            .in_current_span(),
        )
    }

    async fn fulfill(&self, order: &Arc<Order>) -> Result<String, ActivityFailure> {
        let approval = self.dispatch(CHECK_APPROVAL, order, |activities, order| async move {
            activities.check_approval(&order).await
        });
        let payment = self.dispatch(PROCESS_PAYMENT, order, |activities, order| async move {
            activities.process_payment(&order).await
        });
        let inventory = self.dispatch(RESERVE_INVENTORY, order, |activities, order| async move {
            activities.reserve_inventory(&order).await
        });
        let delivery = self.dispatch(DELIVER_ORDER, order, |activities, order| async move {
            activities.deliver_order(&order).await
        });

        let approval = async {
            match settle(CHECK_APPROVAL, approval).await {
                Ok(requires_approval) => info!(requires_approval, "approval check completed"),
                Err(failure) => warn!(error = %failure, "approval check failed, ignoring"),
            }
            Ok::<(), ActivityFailure>(())
        };

        // Steps still running when a sibling fails are left to finish.
        let ((), payment, inventory, delivery) = tokio::try_join!(
            approval,
            settle(PROCESS_PAYMENT, payment),
            settle(RESERVE_INVENTORY, inventory),
            settle(DELIVER_ORDER, delivery)
        )?;

        Ok(format!("Order fulfilled: {}, {}, {}", payment, inventory, delivery))
    }
}

/// Await a dispatched step, reporting a crashed task as that step's failure.
async fn settle<T>(
    activity: &str,
    handle: JoinHandle<Result<T, ActivityFailure>>,
) -> Result<T, ActivityFailure> {
    match handle.await {
        Ok(result) => result,
        Err(join_error) => Err(ActivityFailure {
            activity: activity.to_string(),
            attempts: 1,
            cause: ActivityError::ExecutionFailed(join_error.to_string()),
        }),
    }
}

#[async_trait]
impl<E: TaskExecutor + Clone + 'static> OrderWorkflow for OrderFulfillWorkflow<E> {
    async fn fulfill_order(&self, order: Order) -> WorkflowResult<String> {
        info!(
            items = order.item_count(),
            total = order.total_amount(),
            "order fulfillment started"
        );

        let order = Arc::new(order);
        match self.fulfill(&order).await {
            Ok(result) => {
                info!(result = %result, "order fulfillment succeeded");
                Ok(result)
            }
            Err(failure) => {
                error!(order = %order, error = %failure, "Order fulfillment failed");
                Err(WorkflowError::from(failure))
            }
        }
    }
}
