pub mod cli;

pub use cli::Cli;

use fulfill_catalog::StockCatalog;
use fulfill_core::{LatencySimulator, LocalWorkflowClient};
use fulfill_order::{OrderFulfillActivities, OrderFulfillWorkflow, OrderGenerator};
use fulfill_shared::Order;
use fulfill_store::{load_test_orders, Config};
use std::sync::Arc;
use tracing::{error, info};

/// Build a client with the fulfillment worker registered on the configured task queue.
pub fn build_client(config: &Config, catalog: Arc<StockCatalog>, seed: Option<u64>) -> LocalWorkflowClient {
    let latency = match seed {
        Some(seed) => LatencySimulator::seeded(seed),
        None => LatencySimulator::from_entropy(),
    };
    let activities = OrderFulfillActivities::new(
        catalog,
        Arc::new(latency),
        config.activity.simulated_delay(),
    );
    let workflow = OrderFulfillWorkflow::new(Arc::new(activities), config.activity.options());

    let mut client = LocalWorkflowClient::new();
    client.register_worker(config.worker.task_queue.clone(), Arc::new(workflow));
    client
}

/// Load the stock database once for the whole process.
///
/// A missing or malformed file is logged and replaced by an empty catalog:
/// generated batches then fall back to the sample order and inventory
/// reservation fails per order.
pub fn load_catalog(config: &Config) -> Arc<StockCatalog> {
    match StockCatalog::load(&config.data.stock_database_path) {
        Ok(catalog) => Arc::new(catalog),
        Err(e) => {
            error!(error = %e, "Failed to load stock database, continuing with an empty catalog");
            Arc::new(StockCatalog::default())
        }
    }
}

/// Pick the orders to run: the fixed test orders for a default invocation,
/// generated ones otherwise, and the built-in sample when nothing else is available.
pub fn select_orders(cli: &Cli, config: &Config, catalog: &StockCatalog, seed: Option<u64>) -> Vec<Order> {
    if !cli.wants_test_orders() {
        let mut generator = match seed {
            // Keep the generator stream apart from the latency stream
            Some(seed) => OrderGenerator::seeded(seed.wrapping_add(1)),
            None => OrderGenerator::from_entropy(),
        };
        return generator.generate_from_catalog(catalog, cli.num_orders, cli.invalid_percentage);
    }

    let orders = load_test_orders(&config.data.test_orders_path).unwrap_or_else(|e| {
        error!(error = %e, "Failed to load test orders");
        Vec::new()
    });
    if orders.is_empty() {
        info!("No test orders found, using default orders");
        return OrderGenerator::default_orders();
    }
    orders
}
