//! redb-based storage layer for placed orders
//!
//! # Tables
//!
//! | Table | Key | Value | Purpose |
//! |-------|-----|-------|---------|
//! | `orders` | `order_id` | `Order` | Order records (JSON) |
//! | `user_orders` | `(user_id, order_id)` | `()` | Per-user order index |
//! | `vendor_orders` | `(vendor_id, order_id)` | `()` | Per-vendor order index |
//!
//! An order that spans several vendors gets one index row per vendor, so
//! every involved stall sees it in its listing.
//!
//! # Durability
//!
//! redb commits are persistent as soon as `commit()` returns, and the database
//! file stays consistent across power loss. When the file cannot be opened the
//! store falls back to an in-memory backend so ordering keeps working; the
//! degraded mode is surfaced through [`OrderStore::mode`].

use redb::{Database, ReadableDatabase, ReadableTable, ReadableTableMetadata, TableDefinition};
use serde::{Deserialize, Serialize};
use shared::{AppError, ErrorCode, Order};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Table for order records: key = order_id, value = JSON-serialized Order
const ORDERS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("orders");

/// Table indexing orders by user: key = (user_id, order_id), value = empty
const USER_ORDERS_TABLE: TableDefinition<(&str, &str), ()> = TableDefinition::new("user_orders");

/// Table indexing orders by vendor: key = (vendor_id, order_id), value = empty
const VENDOR_ORDERS_TABLE: TableDefinition<(&str, &str), ()> =
    TableDefinition::new("vendor_orders");

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Order not found: {0}")]
    OrderNotFound(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::OrderNotFound(order_id) => AppError::with_message(
                ErrorCode::OrderNotFound,
                format!("Order {} not found", order_id),
            )
            .with_detail("order_id", order_id),
            other => AppError::storage(other.to_string()),
        }
    }
}

/// Whether orders are persisted to disk or held in memory only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageMode {
    /// Orders survive restarts
    Durable,
    /// Disk was unavailable at startup; orders are lost on restart
    Volatile,
}

/// Order storage backed by redb
#[derive(Clone)]
pub struct OrderStore {
    db: Arc<Database>,
    mode: StorageMode,
}

impl OrderStore {
    /// Open or create the database at the given path
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let db = Database::create(path)?;
        Self::init_tables(&db)?;
        Ok(Self {
            db: Arc::new(db),
            mode: StorageMode::Durable,
        })
    }

    /// Open an in-memory database
    ///
    /// Used as the degraded fallback when the database file cannot be opened,
    /// and by tests.
    pub fn open_volatile() -> StorageResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        Self::init_tables(&db)?;
        Ok(Self {
            db: Arc::new(db),
            mode: StorageMode::Volatile,
        })
    }

    /// Open the database at `path`, falling back to a volatile in-memory
    /// store when the file is unavailable
    pub fn open_or_volatile(path: impl AsRef<Path>) -> StorageResult<Self> {
        match Self::open(path.as_ref()) {
            Ok(store) => Ok(store),
            Err(err) => {
                tracing::warn!(
                    path = %path.as_ref().display(),
                    error = %err,
                    "Order database unavailable, falling back to volatile storage"
                );
                Self::open_volatile()
            }
        }
    }

    fn init_tables(db: &Database) -> StorageResult<()> {
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(ORDERS_TABLE)?;
            let _ = write_txn.open_table(USER_ORDERS_TABLE)?;
            let _ = write_txn.open_table(VENDOR_ORDERS_TABLE)?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Whether this store persists to disk or memory
    pub fn mode(&self) -> StorageMode {
        self.mode
    }

    /// Insert a new order together with its user and vendor index rows
    pub fn insert_order(&self, order: &Order) -> StorageResult<()> {
        let txn = self.db.begin_write()?;
        {
            let mut orders = txn.open_table(ORDERS_TABLE)?;
            let value = serde_json::to_vec(order)?;
            orders.insert(order.order_id.as_str(), value.as_slice())?;

            let mut by_user = txn.open_table(USER_ORDERS_TABLE)?;
            by_user.insert((order.user_id.as_str(), order.order_id.as_str()), ())?;

            let mut by_vendor = txn.open_table(VENDOR_ORDERS_TABLE)?;
            for vendor_id in order.vendor_ids() {
                by_vendor.insert((vendor_id.as_str(), order.order_id.as_str()), ())?;
            }
        }
        txn.commit()?;
        Ok(())
    }

    /// Overwrite an existing order record
    ///
    /// The user and vendor index rows never change after insert, so only the
    /// order record itself is rewritten.
    pub fn update_order(&self, order: &Order) -> StorageResult<()> {
        let txn = self.db.begin_write()?;
        {
            let mut orders = txn.open_table(ORDERS_TABLE)?;
            if orders.get(order.order_id.as_str())?.is_none() {
                return Err(StorageError::OrderNotFound(order.order_id.clone()));
            }
            let value = serde_json::to_vec(order)?;
            orders.insert(order.order_id.as_str(), value.as_slice())?;
        }
        txn.commit()?;
        Ok(())
    }

    /// Get an order by ID
    pub fn get_order(&self, order_id: &str) -> StorageResult<Option<Order>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ORDERS_TABLE)?;

        match table.get(order_id)? {
            Some(value) => {
                let order: Order = serde_json::from_slice(value.value())?;
                Ok(Some(order))
            }
            None => Ok(None),
        }
    }

    /// List every stored order, newest first
    pub fn list_all(&self) -> StorageResult<Vec<Order>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ORDERS_TABLE)?;

        let mut orders = Vec::new();
        for result in table.iter()? {
            let (_key, value) = result?;
            let order: Order = serde_json::from_slice(value.value())?;
            orders.push(order);
        }

        sort_newest_first(&mut orders);
        Ok(orders)
    }

    /// List orders placed by a user, newest first
    pub fn list_by_user(&self, user_id: &str) -> StorageResult<Vec<Order>> {
        let read_txn = self.db.begin_read()?;
        let index = read_txn.open_table(USER_ORDERS_TABLE)?;
        let table = read_txn.open_table(ORDERS_TABLE)?;

        let mut orders = Vec::new();
        for result in index.range((user_id, "")..)? {
            let (key, _value) = result?;
            let (uid, order_id) = key.value();
            if uid != user_id {
                break;
            }
            if let Some(value) = table.get(order_id)? {
                let order: Order = serde_json::from_slice(value.value())?;
                orders.push(order);
            }
        }

        sort_newest_first(&mut orders);
        Ok(orders)
    }

    /// List orders that involve a vendor, newest first
    pub fn list_by_vendor(&self, vendor_id: &str) -> StorageResult<Vec<Order>> {
        let read_txn = self.db.begin_read()?;
        let index = read_txn.open_table(VENDOR_ORDERS_TABLE)?;
        let table = read_txn.open_table(ORDERS_TABLE)?;

        let mut orders = Vec::new();
        for result in index.range((vendor_id, "")..)? {
            let (key, _value) = result?;
            let (vid, order_id) = key.value();
            if vid != vendor_id {
                break;
            }
            if let Some(value) = table.get(order_id)? {
                let order: Order = serde_json::from_slice(value.value())?;
                orders.push(order);
            }
        }

        sort_newest_first(&mut orders);
        Ok(orders)
    }

    /// Number of stored orders
    pub fn count_orders(&self) -> StorageResult<u64> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ORDERS_TABLE)?;
        Ok(table.len()?)
    }
}

fn sort_newest_first(orders: &mut [Order]) {
    orders.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.order_id.cmp(&a.order_id))
    });
}
