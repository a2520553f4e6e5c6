use fulfill_catalog::StockCatalog;
use fulfill_shared::{CreditCard, Order, OrderItem, Payment};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::Path;
use tracing::{error, info, warn};

/// Appended to the first item name of an invalid order so no catalog entry matches it
pub const CORRUPTION_MARKER: &str = "@@@";

const GENERATED_CARD_NUMBER: &str = "1234 5678 1234 5678";
const GENERATED_CARD_EXPIRATION: &str = "12/25";

/// Builds sample and synthetic orders
pub struct OrderGenerator<R = StdRng> {
    rng: R,
}

impl OrderGenerator<StdRng> {
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }

    /// The hand-authored sample order
    pub fn default_orders() -> Vec<Order> {
        let items = vec![
            OrderItem::new("Cloudmonster Running Shoe (Men)", 126.99, 1),
            OrderItem::new("2002R Sneaker (Men)", 63.00, 2),
        ];
        let credit_card = CreditCard::new("5678 1234 5678 1234", "12/24");

        vec![Order::new(items, Payment::new(credit_card))]
    }
}

impl<R: Rng> OrderGenerator<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Generate `count` orders from the catalog at `catalog_path`.
    ///
    /// Falls back to [`OrderGenerator::default_orders`] when the catalog
    /// can't be loaded or has nothing to draw from.
    pub fn generate(
        &mut self,
        catalog_path: impl AsRef<Path>,
        count: usize,
        invalid_percentage: u32,
    ) -> Vec<Order> {
        let catalog_path = catalog_path.as_ref();

        match StockCatalog::load(catalog_path) {
            Ok(catalog) => self.generate_from_catalog(&catalog, count, invalid_percentage),
            Err(e) => {
                error!(error = %e, "Failed to generate orders, using default orders");
                OrderGenerator::default_orders()
            }
        }
    }

    /// Generate `count` orders, each with 1-3 random catalog items of
    /// quantity 1-3.
    ///
    /// The first `invalid_percentage * count / 100` orders (rounded down)
    /// get [`CORRUPTION_MARKER`] appended to their first item name. The
    /// percentage is not range-checked. An empty catalog yields the default
    /// orders.
    pub fn generate_from_catalog(
        &mut self,
        catalog: &StockCatalog,
        count: usize,
        invalid_percentage: u32,
    ) -> Vec<Order> {
        if catalog.is_empty() {
            warn!("stock database is empty, using default orders");
            return OrderGenerator::default_orders();
        }

        let stock = catalog.items();
        let num_invalid = invalid_percentage as usize * count / 100;

        let mut orders = Vec::with_capacity(count);
        for i in 0..count {
            let num_items = self.rng.gen_range(1..=3);
            let items = (0..num_items)
                .map(|_| {
                    let stock_item = &stock[self.rng.gen_range(0..stock.len())];
                    OrderItem::new(
                        stock_item.item_name.clone(),
                        stock_item.item_price,
                        self.rng.gen_range(1..=3),
                    )
                })
                .collect();

            let credit_card = CreditCard::new(GENERATED_CARD_NUMBER, GENERATED_CARD_EXPIRATION);
            let mut order = Order::new(items, Payment::new(credit_card));

            if i < num_invalid {
                corrupt(&mut order);
            }
            orders.push(order);
        }

        info!(count, invalid = num_invalid.min(count), "orders generated");
        orders
    }
}

fn corrupt(order: &mut Order) {
    if let Some(first) = order.items.first_mut() {
        first.item_name.push_str(CORRUPTION_MARKER);
    }
}
