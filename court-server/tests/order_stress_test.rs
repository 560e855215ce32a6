//! Order stress test - concurrent checkouts walked through the full lifecycle.
//!
//! Uses `ServerState::initialize` against a temp work directory so every
//! order goes through the real redb-backed store. Workers interleave, so
//! later orders can finish before earlier ones.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use court_server::{Config, ServerState};
use court_server::orders::checkout;
use shared::error::ErrorCode;
use shared::order::{OrderStatus, OrderType, PaymentMethod, PortionSize};

const ORDER_COUNT: usize = 200;
const CONCURRENCY: usize = 20;

/// Demo menu picks the workers draw from
const CHOICES: &[(&str, PortionSize)] = &[
    ("item_1_1", PortionSize::Medium),
    ("item_1_2", PortionSize::Small),
    ("item_2_1", PortionSize::Large),
    ("item_2_2", PortionSize::Small),
    ("item_3_1", PortionSize::Medium),
    ("item_4_1", PortionSize::Large),
];

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_orders_full_lifecycle() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::with_overrides(dir.path().to_string_lossy(), 0);
    let state = Arc::new(ServerState::initialize(&config));

    let success = Arc::new(AtomicUsize::new(0));
    let failed = Arc::new(AtomicUsize::new(0));

    println!();
    println!(
        "order stress: {} orders across {} workers",
        ORDER_COUNT, CONCURRENCY
    );
    let started = Instant::now();

    let mut handles = Vec::with_capacity(CONCURRENCY);
    for worker in 0..CONCURRENCY {
        let state = state.clone();
        let success = success.clone();
        let failed = failed.clone();

        handles.push(tokio::spawn(async move {
            for i in 0..(ORDER_COUNT / CONCURRENCY) {
                let idx = worker * (ORDER_COUNT / CONCURRENCY) + i;
                match run_one_order(&state, idx).await {
                    Ok(()) => success.fetch_add(1, Ordering::Relaxed),
                    Err(e) => {
                        eprintln!("order {idx} failed: {e}");
                        failed.fetch_add(1, Ordering::Relaxed)
                    }
                };
            }
        }));
    }

    for handle in handles {
        handle.await.unwrap();
    }

    println!(
        "order stress: done in {:?} ({} ok, {} failed)",
        started.elapsed(),
        success.load(Ordering::Relaxed),
        failed.load(Ordering::Relaxed)
    );

    assert_eq!(success.load(Ordering::Relaxed), ORDER_COUNT);
    assert_eq!(failed.load(Ordering::Relaxed), 0);
    assert_eq!(state.orders.order_count().unwrap(), ORDER_COUNT as u64);

    // Every order ended completed with a pickup stamp.
    let completed = state
        .orders
        .all_orders(Some(OrderStatus::Completed))
        .unwrap();
    assert_eq!(completed.len(), ORDER_COUNT);
    assert!(completed.iter().all(|o| o.completed_at.is_some()));
}

async fn run_one_order(state: &ServerState, idx: usize) -> Result<(), String> {
    // Draw the cart before the first await; the rng must not cross one.
    let plan: Vec<(&str, PortionSize, u32)> = {
        use rand::Rng;
        let mut rng = rand::thread_rng();
        let count = rng.gen_range(1..=3);
        (0..count)
            .map(|_| {
                let (item_id, size) = CHOICES[rng.gen_range(0..CHOICES.len())];
                (item_id, size, rng.gen_range(1..=3))
            })
            .collect()
    };

    let mut lines = Vec::with_capacity(plan.len());
    for (item_id, size, quantity) in plan {
        let line = state
            .catalog
            .resolve_cart_line(item_id, size, quantity, None)
            .map_err(|e| format!("resolve: {e}"))?;
        lines.push(line);
    }

    let user_id = format!("emp_{}", idx % 25);
    let order = checkout::build_order(
        &user_id,
        "Stress Tester",
        lines,
        PaymentMethod::Upi,
        OrderType::Now,
        None,
    )
    .map_err(|e| format!("build: {e}"))?;

    let placed = state
        .orders
        .place_order(order)
        .map_err(|e| format!("place: {e}"))?;

    for status in [
        OrderStatus::Preparing,
        OrderStatus::Ready,
        OrderStatus::Completed,
    ] {
        state
            .orders
            .update_status(&placed.order_id, status, None)
            .await
            .map_err(|e| format!("{status}: {e}"))?;
    }

    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_single_order_scan_contention() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::with_overrides(dir.path().to_string_lossy(), 0);
    let state = Arc::new(ServerState::initialize(&config));

    let line = state
        .catalog
        .resolve_cart_line("item_3_1", PortionSize::Medium, 1, None)
        .unwrap();
    let order = checkout::build_order(
        "emp_1",
        "Ravi Kumar",
        vec![line],
        PaymentMethod::Cash,
        OrderType::Now,
        None,
    )
    .unwrap();
    let placed = state.orders.place_order(order).unwrap();

    // Twenty pickup stations scan the same QR at once. Exactly one wins.
    let mut handles = Vec::new();
    for _ in 0..20 {
        let state = state.clone();
        let order_id = placed.order_id.clone();
        handles.push(tokio::spawn(async move {
            state.orders.scan_pickup(&order_id, None).await
        }));
    }

    let mut won = 0;
    let mut already = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(order) => {
                assert_eq!(order.status, OrderStatus::Ready);
                won += 1;
            }
            Err(err) => {
                assert_eq!(err.code, ErrorCode::OrderAlreadyProcessed);
                already += 1;
            }
        }
    }

    assert_eq!(won, 1);
    assert_eq!(already, 19);

    let stored = state.orders.order(&placed.order_id).unwrap();
    assert_eq!(stored.status, OrderStatus::Ready);
    assert!(stored.completed_at.is_some());
}
