use clap::Parser;

/// Run order fulfillment workflows against the in-process worker
#[derive(Parser, Debug, Clone)]
#[command(name = "order-fulfill")]
#[command(about = "Fulfill a batch of orders: payment, inventory and delivery", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Number of orders to process
    #[arg(short = 'n', long, default_value_t = 1)]
    pub num_orders: usize,

    /// Percentage of orders to make invalid (0-100)
    #[arg(short = 'i', long, default_value_t = 0)]
    pub invalid_percentage: u32,

    /// Seed for simulated latency and order generation
    #[arg(long, env = "FULFILL_SEED")]
    pub seed: Option<u64>,
}

impl Cli {
    /// The fixed test orders are used unless a batch was asked for.
    pub fn wants_test_orders(&self) -> bool {
        self.num_orders == 1 && self.invalid_percentage == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["order-fulfill"]);

        assert_eq!(cli.num_orders, 1);
        assert_eq!(cli.invalid_percentage, 0);
        assert!(cli.wants_test_orders());
    }

    #[test]
    fn test_short_and_long_flags() {
        let cli = Cli::parse_from(["order-fulfill", "-n", "20", "--invalid-percentage", "15"]);

        assert_eq!(cli.num_orders, 20);
        assert_eq!(cli.invalid_percentage, 15);
        assert!(!cli.wants_test_orders());
    }

    #[test]
    fn test_single_invalid_order_is_generated() {
        let cli = Cli::parse_from(["order-fulfill", "-i", "100"]);

        assert!(!cli.wants_test_orders());
    }
}
