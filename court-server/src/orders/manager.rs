//! Order coordination
//!
//! `OrdersManager` owns the write path for orders: every mutation goes
//! through a per-order async lock, hits storage, and only then fans out an
//! event. Readers go straight to storage. Subscribers therefore never see
//! an event for a state that was not committed first.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::order::{Order, OrderEventPayload, OrderStatus};
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::notify::{OrderNotifier, OrderSubscription, SubscribeScope};

use super::lifecycle;
use super::storage::{OrderStore, StorageError, StorageMode};

pub struct OrdersManager {
    storage: OrderStore,
    notifier: OrderNotifier,
    /// One mutex per order id, created on first write.
    locks: DashMap<String, Arc<Mutex<()>>>,
    lock_timeout: Duration,
}

impl fmt::Debug for OrdersManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OrdersManager")
            .field("storage", &self.storage.mode())
            .field("notifier", &self.notifier)
            .field("locks", &self.locks.len())
            .field("lock_timeout", &self.lock_timeout)
            .finish()
    }
}

impl OrdersManager {
    pub fn new(storage: OrderStore, event_capacity: usize, lock_timeout: Duration) -> Self {
        Self {
            storage,
            notifier: OrderNotifier::new(event_capacity),
            locks: DashMap::new(),
            lock_timeout,
        }
    }

    /// Persist a freshly checked-out order and announce it.
    pub fn place_order(&self, order: Order) -> AppResult<Order> {
        self.storage.insert_order(&order)?;
        tracing::info!(
            order_id = %order.order_id,
            user_id = %order.user_id,
            total = order.total,
            "Order placed"
        );
        self.notifier
            .publish(OrderEventPayload::Created, order.clone());
        Ok(order)
    }

    /// Move an order to `next` under its write lock.
    ///
    /// When `acting_vendor` is given the order must involve that stall;
    /// vendors cannot see or move orders that carry none of their lines.
    pub async fn update_status(
        &self,
        order_id: &str,
        next: OrderStatus,
        acting_vendor: Option<&str>,
    ) -> AppResult<Order> {
        let _guard = self.lock_order(order_id).await?;
        let mut order = self.fetch(order_id)?;
        ensure_vendor_involved(&order, acting_vendor)?;

        let from = lifecycle::apply_transition(&mut order, next)?;
        self.storage.update_order(&order)?;
        tracing::info!(order_id = %order.order_id, from = %from, to = %next, "Order status updated");
        self.notifier.publish(
            OrderEventPayload::StatusChanged { from, to: next },
            order.clone(),
        );
        Ok(order)
    }

    /// Apply a pickup QR scan. The QR payload is the order id.
    pub async fn scan_pickup(&self, code: &str, acting_vendor: Option<&str>) -> AppResult<Order> {
        let _guard = self.lock_order(code).await?;
        let mut order = self.fetch(code)?;
        ensure_vendor_involved(&order, acting_vendor)?;
        let from = lifecycle::apply_scan(&mut order)?;
        self.storage.update_order(&order)?;
        tracing::info!(order_id = %order.order_id, from = %from, "Pickup scan marked order ready");
        self.notifier.publish(
            OrderEventPayload::StatusChanged {
                from,
                to: OrderStatus::Ready,
            },
            order.clone(),
        );
        Ok(order)
    }

    pub fn order(&self, order_id: &str) -> AppResult<Order> {
        self.fetch(order_id)
    }

    /// Orders placed by `user_id`, newest first.
    pub fn orders_for_user(
        &self,
        user_id: &str,
        status: Option<OrderStatus>,
    ) -> AppResult<Vec<Order>> {
        Ok(filter_status(self.storage.list_by_user(user_id)?, status))
    }

    /// Orders carrying at least one line from `vendor_id`, newest first.
    pub fn orders_for_vendor(
        &self,
        vendor_id: &str,
        status: Option<OrderStatus>,
    ) -> AppResult<Vec<Order>> {
        Ok(filter_status(
            self.storage.list_by_vendor(vendor_id)?,
            status,
        ))
    }

    pub fn all_orders(&self, status: Option<OrderStatus>) -> AppResult<Vec<Order>> {
        Ok(filter_status(self.storage.list_all()?, status))
    }

    pub fn order_count(&self) -> AppResult<u64> {
        Ok(self.storage.count_orders()?)
    }

    pub fn subscribe(&self, scope: SubscribeScope) -> OrderSubscription {
        self.notifier.subscribe(scope)
    }

    pub fn storage_mode(&self) -> StorageMode {
        self.storage.mode()
    }

    fn fetch(&self, order_id: &str) -> AppResult<Order> {
        self.storage
            .get_order(order_id)?
            .ok_or_else(|| StorageError::OrderNotFound(order_id.to_string()).into())
    }

    async fn lock_order(&self, order_id: &str) -> AppResult<OwnedMutexGuard<()>> {
        let lock = self.locks.entry(order_id.to_string()).or_default().clone();
        tokio::time::timeout(self.lock_timeout, lock.lock_owned())
            .await
            .map_err(|_| {
                AppError::timeout(format!(
                    "Timed out waiting for exclusive access to order {}",
                    order_id
                ))
            })
    }
}

fn filter_status(mut orders: Vec<Order>, status: Option<OrderStatus>) -> Vec<Order> {
    if let Some(status) = status {
        orders.retain(|order| order.status == status);
    }
    orders
}

/// Stalls only handle orders that carry at least one of their lines.
/// Reported as not-found so a stall cannot probe for foreign order ids.
fn ensure_vendor_involved(order: &Order, acting_vendor: Option<&str>) -> AppResult<()> {
    if let Some(vendor_id) = acting_vendor {
        if !order.involves_vendor(vendor_id) {
            return Err(AppError::with_message(
                ErrorCode::OrderNotFound,
                format!("Order {} does not involve your stall", order.order_id),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::super::checkout;
    use super::*;
    use shared::order::{CartLine, OrderType, PaymentMethod, PortionSize};

    fn test_manager() -> OrdersManager {
        let store = OrderStore::open_volatile().unwrap();
        OrdersManager::new(store, 16, Duration::from_millis(200))
    }

    fn line(vendor: &str, item: &str, price: f64) -> CartLine {
        CartLine {
            line_id: format!("line_{}", item),
            item_id: item.to_string(),
            vendor_id: vendor.to_string(),
            vendor_name: format!("Stall {}", vendor),
            item_name: format!("Dish {}", item),
            size: PortionSize::Medium,
            unit_price: price,
            quantity: 1,
            reservation: None,
        }
    }

    fn sample_order(user_id: &str, lines: Vec<CartLine>) -> Order {
        checkout::build_order(
            user_id,
            "Raj Kumar",
            lines,
            PaymentMethod::Upi,
            OrderType::Now,
            None,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_place_order_persists_and_publishes() {
        let manager = test_manager();
        let mut sub = manager.subscribe(SubscribeScope::All);

        let placed = manager
            .place_order(sample_order("emp_1", vec![line("vendor_1", "item_1_1", 250.0)]))
            .unwrap();

        let stored = manager.order(&placed.order_id).unwrap();
        assert_eq!(stored.status, OrderStatus::Pending);

        let event = sub.recv().await.unwrap();
        assert_eq!(event.sequence, 1);
        assert_eq!(event.order_id, placed.order_id);
        assert!(matches!(event.payload, OrderEventPayload::Created));
    }

    #[tokio::test]
    async fn test_update_status_commits_then_publishes() {
        let manager = test_manager();
        let placed = manager
            .place_order(sample_order("emp_1", vec![line("vendor_1", "item_1_1", 250.0)]))
            .unwrap();

        let mut sub = manager.subscribe(SubscribeScope::All);
        let updated = manager
            .update_status(&placed.order_id, OrderStatus::Preparing, None)
            .await
            .unwrap();
        assert_eq!(updated.status, OrderStatus::Preparing);

        let event = sub.recv().await.unwrap();
        assert!(matches!(
            event.payload,
            OrderEventPayload::StatusChanged {
                from: OrderStatus::Pending,
                to: OrderStatus::Preparing,
            }
        ));
        assert_eq!(event.order.status, OrderStatus::Preparing);
    }

    #[tokio::test]
    async fn test_update_unknown_order() {
        let manager = test_manager();
        let err = manager
            .update_status("ORD_missing", OrderStatus::Preparing, None)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::OrderNotFound);
    }

    #[tokio::test]
    async fn test_vendor_guard() {
        let manager = test_manager();
        let placed = manager
            .place_order(sample_order("emp_1", vec![line("vendor_1", "item_1_1", 250.0)]))
            .unwrap();

        let err = manager
            .update_status(&placed.order_id, OrderStatus::Preparing, Some("vendor_2"))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::OrderNotFound);
        assert_eq!(
            manager.order(&placed.order_id).unwrap().status,
            OrderStatus::Pending
        );

        let updated = manager
            .update_status(&placed.order_id, OrderStatus::Preparing, Some("vendor_1"))
            .await
            .unwrap();
        assert_eq!(updated.status, OrderStatus::Preparing);
    }

    #[tokio::test]
    async fn test_invalid_transition_leaves_order_unchanged() {
        let manager = test_manager();
        let placed = manager
            .place_order(sample_order("emp_1", vec![line("vendor_1", "item_1_1", 250.0)]))
            .unwrap();
        let sub = manager.subscribe(SubscribeScope::All);

        let err = manager
            .update_status(&placed.order_id, OrderStatus::Pending, None)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::OrderInvalidTransition);
        assert_eq!(
            manager.order(&placed.order_id).unwrap().status,
            OrderStatus::Pending
        );
        // Nothing was committed, so nothing was announced.
        assert_eq!(manager.notifier.last_sequence(), 0);
        drop(sub);
    }

    #[tokio::test]
    async fn test_scan_marks_ready_once() {
        let manager = test_manager();
        let placed = manager
            .place_order(sample_order("emp_1", vec![line("vendor_1", "item_1_1", 250.0)]))
            .unwrap();

        let err = manager
            .scan_pickup(&placed.order_id, Some("vendor_9"))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::OrderNotFound);

        let scanned = manager
            .scan_pickup(&placed.order_id, Some("vendor_1"))
            .await
            .unwrap();
        assert_eq!(scanned.status, OrderStatus::Ready);
        assert!(scanned.completed_at.is_some());

        let err = manager
            .scan_pickup(&placed.order_id, Some("vendor_1"))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::OrderAlreadyProcessed);
        assert_eq!(
            manager.order(&placed.order_id).unwrap().status,
            OrderStatus::Ready
        );
    }

    #[tokio::test]
    async fn test_list_filters() {
        let manager = test_manager();
        let first = manager
            .place_order(sample_order("emp_1", vec![line("vendor_1", "item_1_1", 250.0)]))
            .unwrap();
        manager
            .place_order(sample_order("emp_1", vec![line("vendor_2", "item_2_1", 120.0)]))
            .unwrap();
        manager
            .place_order(sample_order("emp_2", vec![line("vendor_1", "item_1_2", 180.0)]))
            .unwrap();

        assert_eq!(manager.orders_for_user("emp_1", None).unwrap().len(), 2);
        assert_eq!(manager.orders_for_vendor("vendor_1", None).unwrap().len(), 2);
        assert_eq!(manager.all_orders(None).unwrap().len(), 3);
        assert_eq!(manager.order_count().unwrap(), 3);

        manager
            .update_status(&first.order_id, OrderStatus::Preparing, None)
            .await
            .unwrap();
        let preparing = manager
            .orders_for_user("emp_1", Some(OrderStatus::Preparing))
            .unwrap();
        assert_eq!(preparing.len(), 1);
        assert_eq!(preparing[0].order_id, first.order_id);
        assert!(manager
            .all_orders(Some(OrderStatus::Ready))
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_lock_timeout() {
        let store = OrderStore::open_volatile().unwrap();
        let manager = OrdersManager::new(store, 16, Duration::from_millis(20));
        let placed = manager
            .place_order(sample_order("emp_1", vec![line("vendor_1", "item_1_1", 250.0)]))
            .unwrap();

        let lock = manager
            .locks
            .entry(placed.order_id.clone())
            .or_default()
            .clone();
        let _held = lock.lock_owned().await;

        let err = manager
            .update_status(&placed.order_id, OrderStatus::Preparing, None)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::TimeoutError);
    }
}
