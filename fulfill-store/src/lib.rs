pub mod app_config;
pub mod fixtures;

pub use app_config::Config;
pub use fixtures::{load_test_orders, StoreError};
