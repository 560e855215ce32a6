//! Order event fan-out
//!
//! A single process-wide `tokio::sync::broadcast` channel carries every
//! order event. Each subscription wraps its own receiver and filters to a
//! scope, so a slow diner stream cannot stall a vendor dashboard: lagging
//! receivers drop old events and keep going.
//!
//! ```text
//! OrdersManager ──▶ publish() ──▶ broadcast::Sender<OrderEvent>
//!                                      │
//!                  ┌───────────────────┼───────────────────┐
//!                  ▼                   ▼                   ▼
//!            User("emp_1")      Vendor("vendor_2")        All
//!            (diner stream)     (stall dashboard)    (admin console)
//! ```

use std::sync::atomic::{AtomicU64, Ordering};

use shared::order::{OrderEvent, OrderEventPayload};
use shared::Order;
use tokio::sync::broadcast;

/// Default event channel capacity when no override is configured
pub const DEFAULT_EVENT_CAPACITY: usize = 256;

/// Which events a subscription wants to see
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubscribeScope {
    /// Every event (admin console)
    All,
    /// Events for orders placed by this user
    User(String),
    /// Events for orders containing at least one line from this vendor
    Vendor(String),
}

impl SubscribeScope {
    /// Whether the given event is visible to this scope
    pub fn matches(&self, event: &OrderEvent) -> bool {
        match self {
            Self::All => true,
            Self::User(user_id) => event.concerns_user(user_id),
            Self::Vendor(vendor_id) => event.concerns_vendor(vendor_id),
        }
    }
}

/// Order event broadcaster.
///
/// Assigns the process-wide sequence number to each event and fans it out
/// to all live subscriptions. Events are published only after the store
/// write commits, so a received event always reflects persisted state.
pub struct OrderNotifier {
    event_tx: broadcast::Sender<OrderEvent>,
    sequence: AtomicU64,
}

impl std::fmt::Debug for OrderNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderNotifier")
            .field("event_tx", &"<broadcast::Sender>")
            .field("sequence", &self.sequence.load(Ordering::Relaxed))
            .finish()
    }
}

impl OrderNotifier {
    /// Create a notifier with the given channel capacity
    pub fn new(capacity: usize) -> Self {
        let (event_tx, _) = broadcast::channel(capacity);
        Self {
            event_tx,
            sequence: AtomicU64::new(0),
        }
    }

    /// Build the next event for `order` and broadcast it.
    ///
    /// Returns the event so callers can log or inspect the assigned
    /// sequence. Publishing with no live subscribers is not an error.
    pub fn publish(&self, payload: OrderEventPayload, order: Order) -> OrderEvent {
        let sequence = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        let event = OrderEvent::new(sequence, payload, order);
        if self.event_tx.send(event.clone()).is_err() {
            tracing::warn!(
                order_id = %event.order_id,
                "Event broadcast failed: no active receivers"
            );
        }
        event
    }

    /// Open a subscription filtered to the given scope.
    ///
    /// The subscription sees only events published after this call.
    pub fn subscribe(&self, scope: SubscribeScope) -> OrderSubscription {
        OrderSubscription {
            rx: self.event_tx.subscribe(),
            scope,
        }
    }

    /// Number of live receivers across all scopes
    pub fn subscriber_count(&self) -> usize {
        self.event_tx.receiver_count()
    }

    /// Last assigned sequence number (0 before the first publish)
    pub fn last_sequence(&self) -> u64 {
        self.sequence.load(Ordering::SeqCst)
    }
}

impl Default for OrderNotifier {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_CAPACITY)
    }
}

/// A scope-filtered view over the event channel
#[derive(Debug)]
pub struct OrderSubscription {
    rx: broadcast::Receiver<OrderEvent>,
    scope: SubscribeScope,
}

impl OrderSubscription {
    /// Wait for the next event visible to this scope.
    ///
    /// Returns `None` once the notifier is dropped and the channel drains.
    /// A subscription that falls behind the channel capacity skips the
    /// overwritten events and resumes from the oldest retained one.
    pub async fn recv(&mut self) -> Option<OrderEvent> {
        loop {
            match self.rx.recv().await {
                Ok(event) if self.scope.matches(&event) => return Some(event),
                Ok(_) => continue,
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Event subscription lagged, resuming");
                    continue;
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Scope this subscription filters to
    pub fn scope(&self) -> &SubscribeScope {
        &self.scope
    }
}
