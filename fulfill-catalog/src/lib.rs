pub mod inventory;

pub use inventory::{InventoryError, StockCatalog};
