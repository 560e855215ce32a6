//! Shared server state

use std::sync::Arc;
use std::time::Duration;

use crate::cart::CartStore;
use crate::catalog::Catalog;
use crate::core::Config;
use crate::orders::{OrderStore, OrdersManager};
use crate::sessions::SessionStore;

/// Handles shared by every request handler.
///
/// Cloning is shallow: each component sits behind an `Arc`, so axum can
/// clone the state per request for free.
#[derive(Clone, Debug)]
pub struct ServerState {
    pub config: Config,
    pub sessions: Arc<SessionStore>,
    pub carts: Arc<CartStore>,
    pub catalog: Arc<Catalog>,
    pub orders: Arc<OrdersManager>,
}

impl ServerState {
    /// Build every component in dependency order.
    ///
    /// The order database falls back to a volatile in-memory store when its
    /// file cannot be opened; the server still comes up and reports the
    /// degraded mode through `/health`.
    ///
    /// # Panics
    ///
    /// Panics when the work directory cannot be created or when even the
    /// in-memory fallback store fails to open.
    pub fn initialize(config: &Config) -> Self {
        std::fs::create_dir_all(&config.work_dir).expect("Failed to create work directory");

        let storage =
            OrderStore::open_or_volatile(config.db_path()).expect("Failed to open the order store");
        tracing::info!(mode = ?storage.mode(), "Order store ready");

        let catalog = Catalog::new();
        if config.seed_demo {
            catalog.seed_demo();
        }

        let orders = OrdersManager::new(
            storage,
            config.event_capacity,
            Duration::from_millis(config.lock_timeout_ms),
        );

        Self {
            config: config.clone(),
            sessions: Arc::new(SessionStore::new()),
            carts: Arc::new(CartStore::new()),
            catalog: Arc::new(catalog),
            orders: Arc::new(orders),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orders::StorageMode;

    #[test]
    fn test_initialize_seeds_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::with_overrides(dir.path().to_string_lossy(), 0);
        let state = ServerState::initialize(&config);

        assert_eq!(state.catalog.vendor_count(), 4);
        assert_eq!(state.orders.storage_mode(), StorageMode::Durable);
        assert_eq!(state.sessions.count(), 0);
    }

    #[test]
    fn test_initialize_falls_back_to_volatile() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::with_overrides(dir.path().to_string_lossy(), 0);
        // Point the database at a directory, which redb cannot open.
        config.db_file = String::new();
        let state = ServerState::initialize(&config);

        assert_eq!(state.orders.storage_mode(), StorageMode::Volatile);
    }
}
