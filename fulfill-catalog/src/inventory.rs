use fulfill_shared::{OrderItem, StockItem};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Read-only reference stock catalog, loaded once and shared by all lookups
#[derive(Debug, Clone, Default)]
pub struct StockCatalog {
    items: Vec<StockItem>,
    index: HashMap<String, usize>,
}

impl StockCatalog {
    /// Build a catalog. On duplicate names the first entry wins.
    pub fn new(items: Vec<StockItem>) -> Self {
        let mut index = HashMap::with_capacity(items.len());
        for (position, item) in items.iter().enumerate() {
            index.entry(item.item_name.clone()).or_insert(position);
        }

        Self { items, index }
    }

    /// Load the catalog from a JSON array of stock items
    pub fn load(path: impl AsRef<Path>) -> Result<Self, InventoryError> {
        let path = path.as_ref();

        let json = std::fs::read_to_string(path).map_err(|source| InventoryError::CatalogUnreadable {
            path: path.to_path_buf(),
            source,
        })?;
        let items: Vec<StockItem> =
            serde_json::from_str(&json).map_err(|source| InventoryError::CatalogMalformed {
                path: path.to_path_buf(),
                source,
            })?;

        info!(path = %path.display(), items = items.len(), "stock database loaded");
        Ok(Self::new(items))
    }

    /// Exact, case-sensitive lookup by item name
    pub fn get(&self, item_name: &str) -> Option<&StockItem> {
        self.index.get(item_name).map(|&position| &self.items[position])
    }

    pub fn items(&self) -> &[StockItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Check that every ordered item exists in the catalog.
    ///
    /// Read-only: stock is neither checked against quantity nor decremented,
    /// so a failure leaves nothing to undo.
    pub fn reserve(&self, items: &[OrderItem]) -> Result<(), InventoryError> {
        for item in items {
            if self.get(&item.item_name).is_none() {
                return Err(InventoryError::ItemNotFound(item.item_name.clone()));
            }
            debug!(item = %item.item_name, quantity = item.quantity, "Reserving inventory for item");
        }

        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum InventoryError {
    #[error("Couldn't find item in stock database: {0}")]
    ItemNotFound(String),

    #[error("Failed to read stock database {}", .path.display())]
    CatalogUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse stock database {}", .path.display())]
    CatalogMalformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl InventoryError {
    pub fn is_catalog_load_failure(&self) -> bool {
        matches!(
            self,
            InventoryError::CatalogUnreadable { .. } | InventoryError::CatalogMalformed { .. }
        )
    }
}
