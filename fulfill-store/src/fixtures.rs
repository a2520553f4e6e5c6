use fulfill_shared::Order;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Failed to read test orders from {}", .path.display())]
    FixtureRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse test orders from {}", .path.display())]
    FixtureParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Load the fixed test-order file.
///
/// A missing file is not an error and yields no orders.
pub fn load_test_orders(path: impl AsRef<Path>) -> Result<Vec<Order>, StoreError> {
    let path = path.as_ref();

    let json = match std::fs::read_to_string(path) {
        Ok(json) => json,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            warn!(path = %path.display(), "Could not find test orders file");
            return Ok(Vec::new());
        }
        Err(source) => {
            return Err(StoreError::FixtureRead {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let orders: Vec<Order> = serde_json::from_str(&json).map_err(|source| StoreError::FixtureParse {
        path: path.to_path_buf(),
        source,
    })?;

    info!(path = %path.display(), orders = orders.len(), "test orders loaded");
    Ok(orders)
}
