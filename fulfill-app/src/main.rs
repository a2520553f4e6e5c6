use anyhow::Context;
use clap::Parser;
use fulfill_app::{build_client, load_catalog, select_orders, Cli};
use fulfill_order::BatchDriver;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "order_fulfill=info,fulfill_app=info,fulfill_order=info,fulfill_core=info,fulfill_catalog=info,fulfill_store=info"
                    .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = fulfill_store::Config::load().context("Failed to load config")?;
    let seed = cli.seed.or(config.random.seed);

    let catalog = load_catalog(&config);
    let orders = select_orders(&cli, &config, &catalog, seed);

    let client = build_client(&config, catalog, seed);
    let driver = BatchDriver::new(Arc::new(client), config.worker.task_queue.clone())
        .with_wait_timeout(config.batch.wait_timeout());

    tracing::info!("Processing {} orders", orders.len());

    let report = driver.run(orders).await;
    tracing::info!(
        succeeded = report.succeeded(),
        failed = report.failed(),
        "All workflows completed"
    );

    Ok(())
}
