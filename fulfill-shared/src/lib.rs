pub mod models;
pub mod pii;

pub use models::{CreditCard, Order, OrderItem, Payment, StockItem};
pub use pii::CardNumber;
