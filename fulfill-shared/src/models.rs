use serde::{Deserialize, Serialize};
use std::fmt;

use crate::pii::CardNumber;

/// A customer order: the lines being bought and how they are paid for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(default)]
    pub items: Vec<OrderItem>,
    pub payment: Payment,
}

impl Order {
    pub fn new(items: Vec<OrderItem>, payment: Payment) -> Self {
        Self { items, payment }
    }

    /// Sum of price x quantity over all lines.
    ///
    /// Computed on every call. Prices and quantities are expected to be
    /// non-negative, so the total is too.
    pub fn total_amount(&self) -> f64 {
        self.items.iter().map(OrderItem::line_total).sum()
    }

    /// Number of order lines (not units).
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn credit_card(&self) -> &CreditCard {
        &self.payment.credit_card
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Order {{ items: [")?;
        for (i, item) in self.items.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", item)?;
        }
        write!(
            f,
            "], payment: {}, total: {:.2} }}",
            self.payment.credit_card,
            self.total_amount()
        )
    }
}

/// One line of an order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    /// Stock catalog key
    pub item_name: String,
    pub item_price: f64,
    pub quantity: u32,
}

impl OrderItem {
    pub fn new(item_name: impl Into<String>, item_price: f64, quantity: u32) -> Self {
        Self {
            item_name: item_name.into(),
            item_price,
            quantity,
        }
    }

    pub fn line_total(&self) -> f64 {
        self.item_price * self.quantity as f64
    }
}

impl fmt::Display for OrderItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} x{} @ {:.2}", self.item_name, self.quantity, self.item_price)
    }
}

/// Payment method attached to an order. Only credit cards are supported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub credit_card: CreditCard,
}

impl Payment {
    pub fn new(credit_card: CreditCard) -> Self {
        Self { credit_card }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditCard {
    pub number: CardNumber,
    /// "MM/YY"
    pub expiration: String,
}

impl CreditCard {
    pub fn new(number: impl Into<String>, expiration: impl Into<String>) -> Self {
        Self {
            number: CardNumber::new(number),
            expiration: expiration.into(),
        }
    }

    pub fn masked_number(&self) -> String {
        self.number.masked()
    }
}

impl fmt::Display for CreditCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (exp {})", self.number, self.expiration)
    }
}

/// Entry in the reference stock catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockItem {
    pub item_name: String,
    /// Reference price; orders may carry a different one.
    pub item_price: f64,
    /// Informational only, never decremented.
    pub stock: i32,
}

impl StockItem {
    pub fn new(item_name: impl Into<String>, item_price: f64, stock: i32) -> Self {
        Self {
            item_name: item_name.into(),
            item_price,
            stock,
        }
    }
}
