use async_trait::async_trait;
use fulfill_catalog::{InventoryError, StockCatalog};
use fulfill_core::{ActivityError, LatencySimulator};
use fulfill_shared::Order;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

pub const CHECK_APPROVAL: &str = "CheckApproval";
pub const PROCESS_PAYMENT: &str = "ProcessPayment";
pub const RESERVE_INVENTORY: &str = "ReserveInventory";
pub const DELIVER_ORDER: &str = "DeliverOrder";

/// Orders above this total need approval
pub const APPROVAL_THRESHOLD: f64 = 10_000.0;

/// Expiration token the payment step treats as an expired card
pub const EXPIRED_CARD_EXPIRATION: &str = "12/23";

/// The units of work a fulfillment workflow invokes
#[async_trait]
pub trait FulfillmentActivities: Send + Sync {
    /// Whether the order total requires approval
    async fn check_approval(&self, order: &Order) -> Result<bool, ActivityError>;

    async fn process_payment(&self, order: &Order) -> Result<String, ActivityError>;

    async fn reserve_inventory(&self, order: &Order) -> Result<String, ActivityError>;

    async fn deliver_order(&self, order: &Order) -> Result<String, ActivityError>;
}

/// Simulated fulfillment backend.
///
/// Every call waits a jittered `simulated_delay`; inventory is checked
/// against the shared stock catalog.
pub struct OrderFulfillActivities {
    catalog: Arc<StockCatalog>,
    latency: Arc<LatencySimulator>,
    simulated_delay: Duration,
}

impl OrderFulfillActivities {
    pub fn new(
        catalog: Arc<StockCatalog>,
        latency: Arc<LatencySimulator>,
        simulated_delay: Duration,
    ) -> Self {
        Self {
            catalog,
            latency,
            simulated_delay,
        }
    }
}

#[async_trait]
impl FulfillmentActivities for OrderFulfillActivities {
    async fn check_approval(&self, order: &Order) -> Result<bool, ActivityError> {
        info!("Checking order requires approval (over $10k)");

        if order.total_amount() > APPROVAL_THRESHOLD {
            info!(total = order.total_amount(), "Order requires approval");
            return Ok(true);
        }

        self.latency.pause(self.simulated_delay).await;
        Ok(false)
    }

    async fn process_payment(&self, order: &Order) -> Result<String, ActivityError> {
        info!("Processing payment...");

        if order.credit_card().expiration == EXPIRED_CARD_EXPIRATION {
            return Err(ActivityError::PaymentDeclined("Credit card expired".to_string()));
        }

        self.latency.pause(self.simulated_delay).await;
        Ok(format!("Payment processed for {} items", order.item_count()))
    }

    async fn reserve_inventory(&self, order: &Order) -> Result<String, ActivityError> {
        info!("Reserving inventory...");

        self.catalog.reserve(&order.items).map_err(|e| match e {
            InventoryError::ItemNotFound(name) => ActivityError::ItemNotFound(name),
            other => ActivityError::ExecutionFailed(other.to_string()),
        })?;

        self.latency.pause(self.simulated_delay).await;
        Ok(format!("Inventory reserved for {} items", order.item_count()))
    }

    async fn deliver_order(&self, order: &Order) -> Result<String, ActivityError> {
        info!("Delivering order...");

        self.latency.pause(self.simulated_delay).await;
        Ok(format!("Order delivered for {} items", order.item_count()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fulfill_shared::{CreditCard, OrderItem, Payment, StockItem};
    use tokio::time::Instant;

    fn activities() -> OrderFulfillActivities {
        let catalog = StockCatalog::new(vec![
            StockItem::new("Pima Cotton T-Shirt", 49.99, 50),
            StockItem::new("Wool Suit", 599.99, 12),
            StockItem::new("Plain Toe Derby (Men)", 129.99, 30),
        ]);

        OrderFulfillActivities::new(
            Arc::new(catalog),
            Arc::new(LatencySimulator::seeded(11)),
            Duration::from_millis(1000),
        )
    }

    fn order_with(items: Vec<OrderItem>, expiration: &str) -> Order {
        Order::new(items, Payment::new(CreditCard::new("1234567890123456", expiration)))
    }

    fn valid_order() -> Order {
        order_with(vec![OrderItem::new("Pima Cotton T-Shirt", 49.99, 2)], "12/25")
    }

    #[tokio::test(start_paused = true)]
    async fn test_high_value_order_requires_approval_without_delay() {
        let order = order_with(
            vec![
                OrderItem::new("Wool Suit", 599.99, 15),
                OrderItem::new("Plain Toe Derby (Men)", 129.99, 10),
            ],
            "12/25",
        );
        let start = Instant::now();

        assert!(activities().check_approval(&order).await.unwrap());
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_low_value_order_needs_no_approval() {
        let start = Instant::now();

        assert!(!activities().check_approval(&valid_order()).await.unwrap());
        assert!(start.elapsed() >= Duration::from_millis(800));
    }

    #[tokio::test(start_paused = true)]
    async fn test_threshold_is_exclusive() {
        let order = order_with(vec![OrderItem::new("Wool Suit", 10_000.0, 1)], "12/25");

        assert!(!activities().check_approval(&order).await.unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_card_is_declined() {
        let order = order_with(vec![OrderItem::new("Pima Cotton T-Shirt", 49.99, 2)], "12/23");

        let err = activities().process_payment(&order).await.unwrap_err();

        assert_eq!(err.error_type(), "PaymentDeclined");
        assert!(err.to_string().contains("expired"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_payment_succeeds_for_other_expirations() {
        for expiration in ["12/25", "12/24", "01/23", ""] {
            let order = order_with(vec![OrderItem::new("Pima Cotton T-Shirt", 49.99, 2)], expiration);

            let result = activities().process_payment(&order).await.unwrap();

            assert!(result.contains("Payment processed"));
            assert!(result.contains("1 items"));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_reserve_inventory_reports_missing_item() {
        let order = order_with(vec![OrderItem::new("Wool Suit@@@", 599.99, 1)], "12/25");

        let err = activities().reserve_inventory(&order).await.unwrap_err();

        assert_eq!(err, ActivityError::ItemNotFound("Wool Suit@@@".to_string()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_reserve_inventory_succeeds() {
        let result = activities().reserve_inventory(&valid_order()).await.unwrap();

        assert_eq!(result, "Inventory reserved for 1 items");
    }

    #[tokio::test(start_paused = true)]
    async fn test_delivery_always_succeeds() {
        let start = Instant::now();

        let result = activities().deliver_order(&valid_order()).await.unwrap();

        assert!(result.contains("Order delivered"));
        assert!(result.contains("1 items"));
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(800) && elapsed <= Duration::from_millis(1200));
    }
}
