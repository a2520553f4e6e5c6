use fulfill_core::{ActivityOptions, RetryPolicy};
use serde::Deserialize;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub worker: WorkerConfig,
    #[serde(default)]
    pub activity: ActivityConfig,
    #[serde(default)]
    pub batch: BatchConfig,
    #[serde(default)]
    pub random: RandomConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DataConfig {
    #[serde(default = "default_stock_database_path")]
    pub stock_database_path: PathBuf,
    #[serde(default = "default_test_orders_path")]
    pub test_orders_path: PathBuf,
}

fn default_stock_database_path() -> PathBuf { PathBuf::from("data/stock_database.json") }
fn default_test_orders_path() -> PathBuf { PathBuf::from("data/test_orders_short_valid.json") }

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            stock_database_path: default_stock_database_path(),
            test_orders_path: default_test_orders_path(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct WorkerConfig {
    #[serde(default = "default_task_queue")]
    pub task_queue: String,
}

fn default_task_queue() -> String { "OrderFulfillTaskQueue".to_string() }

impl Default for WorkerConfig {
    fn default() -> Self {
        Self { task_queue: default_task_queue() }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ActivityConfig {
    #[serde(default = "default_start_to_close_timeout_secs")]
    pub start_to_close_timeout_secs: u64,
    /// Nominal latency of every simulated external call
    #[serde(default = "default_simulated_delay_ms")]
    pub simulated_delay_ms: u64,
    #[serde(default)]
    pub retry: RetryConfig,
}

fn default_start_to_close_timeout_secs() -> u64 { 5 }
fn default_simulated_delay_ms() -> u64 { 1000 }

impl Default for ActivityConfig {
    fn default() -> Self {
        Self {
            start_to_close_timeout_secs: default_start_to_close_timeout_secs(),
            simulated_delay_ms: default_simulated_delay_ms(),
            retry: RetryConfig::default(),
        }
    }
}

impl ActivityConfig {
    pub fn simulated_delay(&self) -> Duration {
        Duration::from_millis(self.simulated_delay_ms)
    }

    pub fn options(&self) -> ActivityOptions {
        ActivityOptions::new(Duration::from_secs(self.start_to_close_timeout_secs))
            .with_retry_policy(self.retry.policy())
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct RetryConfig {
    #[serde(default = "default_initial_interval_ms")]
    pub initial_interval_ms: u64,
    #[serde(default = "default_backoff_coefficient")]
    pub backoff_coefficient: f64,
    #[serde(default = "default_maximum_interval_ms")]
    pub maximum_interval_ms: u64,
    /// 0 means unlimited
    #[serde(default = "default_maximum_attempts")]
    pub maximum_attempts: u32,
    #[serde(default = "default_non_retryable_error_types")]
    pub non_retryable_error_types: Vec<String>,
}

fn default_initial_interval_ms() -> u64 { 1000 }
fn default_backoff_coefficient() -> f64 { 2.0 }
fn default_maximum_interval_ms() -> u64 { 100_000 }
fn default_maximum_attempts() -> u32 { 5 }
fn default_non_retryable_error_types() -> Vec<String> { vec!["PaymentDeclined".to_string()] }

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            initial_interval_ms: default_initial_interval_ms(),
            backoff_coefficient: default_backoff_coefficient(),
            maximum_interval_ms: default_maximum_interval_ms(),
            maximum_attempts: default_maximum_attempts(),
            non_retryable_error_types: default_non_retryable_error_types(),
        }
    }
}

impl RetryConfig {
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy {
            initial_interval: Duration::from_millis(self.initial_interval_ms),
            backoff_coefficient: self.backoff_coefficient,
            maximum_interval: Duration::from_millis(self.maximum_interval_ms),
            maximum_attempts: self.maximum_attempts,
            non_retryable_error_types: self.non_retryable_error_types.clone(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct BatchConfig {
    #[serde(default = "default_wait_timeout_secs")]
    pub wait_timeout_secs: u64,
}

fn default_wait_timeout_secs() -> u64 { 30 }

impl Default for BatchConfig {
    fn default() -> Self {
        Self { wait_timeout_secs: default_wait_timeout_secs() }
    }
}

impl BatchConfig {
    pub fn wait_timeout(&self) -> Duration {
        Duration::from_secs(self.wait_timeout_secs)
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct RandomConfig {
    /// Fixed seed for jitter and order generation; entropy when absent
    pub seed: Option<u64>,
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            // Per-environment overrides are optional
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Local overrides, not checked in
            .add_source(config::File::with_name("config/local").required(false))
            // Eg.. `FULFILL__BATCH__WAIT_TIMEOUT_SECS=45`
            .add_source(config::Environment::with_prefix("FULFILL").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
