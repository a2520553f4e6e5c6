use fulfill_catalog::StockCatalog;
use fulfill_core::{LatencySimulator, LocalWorkflowClient, OrderWorkflow, WorkflowError};
use fulfill_order::workflow::default_activity_options;
use fulfill_order::{
    BatchDriver, OrderFulfillActivities, OrderFulfillWorkflow, OrderGenerator, OrderOutcome,
};
use fulfill_shared::{CreditCard, Order, OrderItem, Payment, StockItem};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

const TASK_QUEUE: &str = "OrderFulfillTaskQueue";

fn catalog() -> Arc<StockCatalog> {
    Arc::new(StockCatalog::new(vec![
        StockItem::new("Pima Cotton T-Shirt", 49.99, 50),
        StockItem::new("Cotton T-Shirt", 33.75, 75),
        StockItem::new("Tech T-Shirt", 43.20, 120),
        StockItem::new("Performance Shorts", 69.99, 80),
        StockItem::new("Low Top Sneaker (Men)", 67.00, 40),
        StockItem::new("Wool Suit", 599.99, 12),
    ]))
}

fn workflow(max_attempts: u32) -> OrderFulfillWorkflow {
    let activities = OrderFulfillActivities::new(
        catalog(),
        Arc::new(LatencySimulator::seeded(2024)),
        Duration::from_millis(1000),
    );
    let mut options = default_activity_options();
    options.retry_policy.maximum_attempts = max_attempts;

    OrderFulfillWorkflow::new(Arc::new(activities), options)
}

fn driver(max_attempts: u32) -> BatchDriver {
    let mut client = LocalWorkflowClient::new();
    client.register_worker(TASK_QUEUE, Arc::new(workflow(max_attempts)));
    BatchDriver::new(Arc::new(client), TASK_QUEUE)
}

fn order(items: Vec<OrderItem>, expiration: &str) -> Order {
    Order::new(items, Payment::new(CreditCard::new("1234567890123456", expiration)))
}

#[tokio::test(start_paused = true)]
async fn test_valid_order_is_fulfilled() {
    let order = order(
        vec![
            OrderItem::new("Low Top Sneaker (Men)", 67.00, 1),
            OrderItem::new("Tech T-Shirt", 43.20, 2),
            OrderItem::new("Performance Shorts", 69.99, 1),
        ],
        "12/25",
    );
    let start = Instant::now();

    let result = workflow(5).fulfill_order(order).await.unwrap();

    assert_eq!(
        result,
        "Order fulfilled: Payment processed for 3 items, \
         Inventory reserved for 3 items, Order delivered for 3 items"
    );
    // Steps run side by side, so the whole order takes about one delay.
    assert!(start.elapsed() <= Duration::from_millis(1200));
}

#[tokio::test(start_paused = true)]
async fn test_expired_card_fails_without_retry() {
    let order = order(vec![OrderItem::new("Cotton T-Shirt", 33.75, 2)], "12/23");
    let start = Instant::now();

    let err = workflow(0).fulfill_order(order).await.unwrap_err();

    match err {
        WorkflowError::ActivityFailed(failure) => {
            assert_eq!(failure.activity, "ProcessPayment");
            assert_eq!(failure.attempts, 1);
            assert!(failure.to_string().contains("Credit card expired"));
        }
        other => panic!("unexpected error {:?}", other),
    }
    assert_eq!(start.elapsed(), Duration::ZERO);
}

#[tokio::test(start_paused = true)]
async fn test_batch_reports_mixed_outcomes_in_order() {
    let orders = vec![
        order(vec![OrderItem::new("Wool Suit", 599.99, 1)], "12/25"),
        order(vec![OrderItem::new("Wool Suit@@@", 599.99, 1)], "12/25"),
        order(vec![OrderItem::new("Tech T-Shirt", 43.20, 3)], "12/23"),
        order(vec![OrderItem::new("Pima Cotton T-Shirt", 49.99, 2)], "12/25"),
    ];

    let report = driver(5).run(orders).await;

    assert_eq!(report.len(), 4);
    assert!(report.reports[0].outcome.is_success());
    match &report.reports[1].outcome {
        OrderOutcome::Failed(reason) => {
            assert!(reason.contains("ReserveInventory failed after 5 attempt(s)"));
            assert!(reason.contains("Wool Suit@@@"));
        }
        other => panic!("expected inventory failure, got {:?}", other),
    }
    match &report.reports[2].outcome {
        OrderOutcome::Failed(reason) => assert!(reason.contains("Payment failed: Credit card expired")),
        other => panic!("expected payment failure, got {:?}", other),
    }
    assert!(report.reports[3].outcome.is_success());
}

#[tokio::test(start_paused = true)]
async fn test_unbounded_retries_are_cut_off_by_batch_wait() {
    let orders = vec![
        order(vec![OrderItem::new("Wool Suit@@@", 599.99, 1)], "12/25"),
        order(vec![OrderItem::new("Wool Suit", 599.99, 1)], "12/25"),
    ];
    let start = Instant::now();

    let report = driver(0).run(orders).await;

    match &report.reports[0].outcome {
        OrderOutcome::Failed(reason) => assert!(reason.contains("did not complete within 30s")),
        other => panic!("expected timeout, got {:?}", other),
    }
    assert!(report.reports[1].outcome.is_success());
    assert!(start.elapsed() >= Duration::from_secs(30));
}

#[tokio::test(start_paused = true)]
async fn test_generated_batch_fails_exactly_the_corrupted_orders() {
    let orders = OrderGenerator::seeded(31).generate_from_catalog(&catalog(), 10, 20);

    let report = driver(5).run(orders).await;

    assert_eq!(report.len(), 10);
    let failed: Vec<usize> = report
        .reports
        .iter()
        .filter(|r| !r.outcome.is_success())
        .map(|r| r.index)
        .collect();
    assert_eq!(failed, vec![0, 1]);
}
