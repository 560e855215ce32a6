//! Order API Handlers

use std::convert::Infallible;

use axum::{
    Json,
    extract::{Path, Query, State},
    response::sse::{Event, KeepAlive, Sse},
};
use futures::Stream;
use serde::{Deserialize, Serialize};
use shared::error::{AppError, AppResult, ErrorCode};
use shared::order::{Order, OrderStatus, OrderType, PaymentMethod};
use shared::session::{Session, UserRole};

use crate::core::ServerState;
use crate::notify::SubscribeScope;
use crate::orders::{StorageMode, checkout};
use crate::sessions::CurrentSession;

/// Body for checkout
#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    #[serde(default)]
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub order_type: OrderType,
    #[serde(default)]
    pub selected_slot: Option<String>,
}

/// Placed order plus the storage mode it landed in, so the client can
/// tell the user when the order only lives in memory.
#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    pub order: Order,
    pub storage_mode: StorageMode,
}

/// POST /api/orders - convert the session's cart into an order
pub async fn checkout(
    State(state): State<ServerState>,
    CurrentSession(session): CurrentSession,
    Json(req): Json<CheckoutRequest>,
) -> AppResult<Json<CheckoutResponse>> {
    let lines = state.carts.snapshot(&session.user_id);
    let order = checkout::build_order(
        &session.user_id,
        &session.user_name,
        lines,
        req.payment_method,
        req.order_type,
        req.selected_slot,
    )?;
    let order = state.orders.place_order(order)?;

    // The order is committed; everything below is bookkeeping.
    state.catalog.record_order_lines(&order.lines);
    state.carts.clear(&session.user_id);

    Ok(Json(CheckoutResponse {
        order,
        storage_mode: state.orders.storage_mode(),
    }))
}

/// Query params for listing orders
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub user_id: Option<String>,
    pub vendor_id: Option<String>,
    pub status: Option<OrderStatus>,
}

/// GET /api/orders - order history scoped to the caller's role
///
/// Employees see their own orders, vendors their stall's. Admins may
/// narrow by `user_id` or `vendor_id`, or fetch everything.
pub async fn list(
    State(state): State<ServerState>,
    CurrentSession(session): CurrentSession,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Order>>> {
    let orders = match session.role {
        UserRole::Employee => state
            .orders
            .orders_for_user(&session.user_id, query.status)?,
        UserRole::Vendor => {
            let vendor_id = session.require_vendor()?;
            state.orders.orders_for_vendor(vendor_id, query.status)?
        }
        UserRole::Admin => match (&query.user_id, &query.vendor_id) {
            (Some(user_id), _) => state.orders.orders_for_user(user_id, query.status)?,
            (None, Some(vendor_id)) => state.orders.orders_for_vendor(vendor_id, query.status)?,
            (None, None) => state.orders.all_orders(query.status)?,
        },
    };
    Ok(Json(orders))
}

/// GET /api/orders/:id - one order, if the caller may see it
pub async fn get_by_id(
    State(state): State<ServerState>,
    CurrentSession(session): CurrentSession,
    Path(id): Path<String>,
) -> AppResult<Json<Order>> {
    let order = state.orders.order(&id)?;
    ensure_visible(&session, &order)?;
    Ok(Json(order))
}

/// Body for a status transition
#[derive(Debug, Deserialize)]
pub struct SetStatusRequest {
    pub status: OrderStatus,
}

/// POST /api/orders/:id/status - move an order through its lifecycle
///
/// Vendors move orders carrying their lines; admins move anything;
/// employees may only cancel their own order while it is still
/// pending or preparing.
pub async fn set_status(
    State(state): State<ServerState>,
    CurrentSession(session): CurrentSession,
    Path(id): Path<String>,
    Json(req): Json<SetStatusRequest>,
) -> AppResult<Json<Order>> {
    let order = match session.role {
        UserRole::Admin => state.orders.update_status(&id, req.status, None).await?,
        UserRole::Vendor => {
            let vendor_id = session.require_vendor()?;
            state
                .orders
                .update_status(&id, req.status, Some(vendor_id))
                .await?
        }
        UserRole::Employee => {
            if req.status != OrderStatus::Cancelled {
                return Err(AppError::role_required(
                    "Only vendor staff can move orders forward",
                ));
            }
            let current = state.orders.order(&id)?;
            if current.user_id != session.user_id {
                return Err(AppError::with_message(
                    ErrorCode::OrderNotFound,
                    format!("Order {} not found", id),
                ));
            }
            state
                .orders
                .update_status(&id, OrderStatus::Cancelled, None)
                .await?
        }
    };
    Ok(Json(order))
}

/// Body for the pickup scan; the QR encodes the order id verbatim.
#[derive(Debug, Deserialize)]
pub struct ScanRequest {
    pub code: String,
}

/// POST /api/orders/scan - QR station shortcut for marking an order ready
pub async fn scan(
    State(state): State<ServerState>,
    CurrentSession(session): CurrentSession,
    Json(req): Json<ScanRequest>,
) -> AppResult<Json<Order>> {
    let order = match session.role {
        UserRole::Admin => state.orders.scan_pickup(&req.code, None).await?,
        UserRole::Vendor => {
            let vendor_id = session.require_vendor()?;
            state.orders.scan_pickup(&req.code, Some(vendor_id)).await?
        }
        UserRole::Employee => {
            return Err(AppError::role_required("Only vendor staff can scan pickups"));
        }
    };
    Ok(Json(order))
}

/// GET /api/orders/stream - live order events for the caller's scope
///
/// Server-sent events, one JSON `OrderEvent` per message. No replay: the
/// client fetches its history first, then follows this stream.
pub async fn stream(
    State(state): State<ServerState>,
    CurrentSession(session): CurrentSession,
) -> AppResult<Sse<impl Stream<Item = Result<Event, Infallible>>>> {
    let scope = match session.role {
        UserRole::Employee => SubscribeScope::User(session.user_id.clone()),
        UserRole::Vendor => SubscribeScope::Vendor(session.require_vendor()?.to_string()),
        UserRole::Admin => SubscribeScope::All,
    };
    let subscription = state.orders.subscribe(scope);

    let stream = futures::stream::unfold(subscription, |mut sub| async move {
        let event = sub.recv().await?;
        let sse = Event::default().json_data(&event).ok()?;
        Some((Ok::<_, Infallible>(sse), sub))
    });

    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}

/// Employees see their own orders, vendors the ones carrying their lines.
/// Anything else reads as not-found rather than forbidden.
fn ensure_visible(session: &Session, order: &Order) -> AppResult<()> {
    let visible = match session.role {
        UserRole::Admin => true,
        UserRole::Employee => order.user_id == session.user_id,
        UserRole::Vendor => session
            .vendor_id
            .as_deref()
            .is_some_and(|vendor_id| order.involves_vendor(vendor_id)),
    };
    if visible {
        Ok(())
    } else {
        Err(AppError::with_message(
            ErrorCode::OrderNotFound,
            format!("Order {} not found", order.order_id),
        ))
    }
}
