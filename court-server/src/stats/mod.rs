//! Derived reporting views
//!
//! Pure functions over order slices; callers fetch from storage and pass
//! the result in, so these never block a write. All money accumulates in
//! `Decimal` and rounds to 2 places on the way out. Cancelled orders count
//! toward nothing except the raw daily order tally.

use std::collections::HashMap;

use chrono::{DateTime, Datelike, Days, Local, NaiveDate, TimeZone};
use rust_decimal::Decimal;
use serde::Serialize;
use shared::order::{Order, OrderStatus};
use shared::vendor::Vendor;

use crate::orders::money;

/// Shown on the dashboard until the day has its first completed order.
const DEFAULT_WAIT_MINUTES: f64 = 8.0;

/// Top-line numbers for the admin dashboard, scoped to the local calendar
/// day of the serving process (except `active_orders`, which is global).
#[derive(Debug, Clone, Serialize)]
pub struct AdminOverview {
    pub total_vendors: usize,
    pub today_orders: usize,
    pub active_orders: usize,
    pub today_revenue: f64,
    pub avg_wait_minutes: f64,
}

/// Per-stall rollup joined with the vendor registry.
#[derive(Debug, Clone, Serialize)]
pub struct VendorPerformance {
    pub vendor_id: String,
    pub vendor_name: String,
    pub rating: f64,
    pub waste_percent: u8,
    pub orders: u64,
    pub revenue: f64,
    pub commission: f64,
    pub net_payout: f64,
}

/// One settlement row per non-cancelled order.
#[derive(Debug, Clone, Serialize)]
pub struct BillingTransaction {
    pub order_id: String,
    pub vendor_name: String,
    pub customer_name: String,
    pub amount: f64,
    pub commission: f64,
    pub net_amount: f64,
    pub payment_method: shared::order::PaymentMethod,
    pub status: String,
    pub timestamp: i64,
    pub date: String,
}

/// Personal spending windows for one employee.
#[derive(Debug, Clone, Serialize)]
pub struct SpendingSummary {
    pub today: f64,
    pub today_orders: usize,
    pub this_week: f64,
    pub week_orders: usize,
    pub this_month: f64,
    pub month_orders: usize,
}

pub fn admin_overview(
    total_vendors: usize,
    orders: &[Order],
    now: DateTime<Local>,
) -> AdminOverview {
    let today = now.date_naive();
    let mut today_orders = 0usize;
    let mut active_orders = 0usize;
    let mut today_revenue = Decimal::ZERO;
    let mut wait_minutes = 0f64;
    let mut wait_samples = 0usize;

    for order in orders {
        if order.status.is_active() {
            active_orders += 1;
        }
        if local_date(order.created_at) != Some(today) {
            continue;
        }
        today_orders += 1;
        if order.status != OrderStatus::Cancelled {
            today_revenue += money::to_decimal(order.total);
        }
        if let Some(done) = order.completed_at {
            wait_minutes += (done - order.created_at) as f64 / 60_000.0;
            wait_samples += 1;
        }
    }

    AdminOverview {
        total_vendors,
        today_orders,
        active_orders,
        today_revenue: money::to_f64(today_revenue),
        avg_wait_minutes: if wait_samples == 0 {
            DEFAULT_WAIT_MINUTES
        } else {
            wait_minutes / wait_samples as f64
        },
    }
}

/// Rollup across the given orders, one row per registered vendor.
///
/// An order counts once for every stall it involves. A single-vendor
/// order's full total (tax included) is that stall's revenue; an order
/// spanning stalls splits its total by each stall's share of the line sum.
pub fn vendor_performance(vendors: &[Vendor], orders: &[Order]) -> Vec<VendorPerformance> {
    let mut counts: HashMap<String, u64> = HashMap::new();
    let mut revenue: HashMap<String, Decimal> = HashMap::new();

    for order in orders.iter().filter(|o| o.status != OrderStatus::Cancelled) {
        for vendor_id in order.vendor_ids() {
            *counts.entry(vendor_id).or_default() += 1;
        }
        for (vendor_id, share) in revenue_shares(order) {
            *revenue.entry(vendor_id).or_default() += share;
        }
    }

    vendors
        .iter()
        .map(|vendor| {
            let gross = revenue.get(&vendor.vendor_id).copied().unwrap_or_default();
            let commission = money::commission_on(gross);
            VendorPerformance {
                vendor_id: vendor.vendor_id.clone(),
                vendor_name: vendor.name.clone(),
                rating: vendor.rating,
                waste_percent: waste_percent(&vendor.vendor_id),
                orders: counts.get(&vendor.vendor_id).copied().unwrap_or(0),
                revenue: money::to_f64(gross),
                commission: money::to_f64(commission),
                net_payout: money::to_f64(gross - commission),
            }
        })
        .collect()
}

/// One settled transaction per non-cancelled order, input order preserved.
pub fn billing_transactions(orders: &[Order]) -> Vec<BillingTransaction> {
    orders
        .iter()
        .filter(|order| order.status != OrderStatus::Cancelled)
        .map(|order| {
            let amount = money::to_decimal(order.total);
            let commission = money::commission_on(amount);
            BillingTransaction {
                order_id: order.order_id.clone(),
                vendor_name: vendor_label(order),
                customer_name: order.user_name.clone(),
                amount: money::to_f64(amount),
                commission: money::to_f64(commission),
                net_amount: money::to_f64(amount - commission),
                payment_method: order.payment_method,
                status: "settled".to_string(),
                timestamp: order.created_at,
                date: order.date.clone(),
            }
        })
        .collect()
}

/// Spending windows over one user's order history. The week starts on
/// Sunday; the month is the calendar month of `now`.
pub fn spending_summary(orders: &[Order], now: DateTime<Local>) -> SpendingSummary {
    let today = now.date_naive();
    let week_start = today - Days::new(u64::from(now.weekday().num_days_from_sunday()));

    let mut today_total = Decimal::ZERO;
    let mut week_total = Decimal::ZERO;
    let mut month_total = Decimal::ZERO;
    let mut today_orders = 0usize;
    let mut week_orders = 0usize;
    let mut month_orders = 0usize;

    for order in orders.iter().filter(|o| o.status != OrderStatus::Cancelled) {
        let Some(date) = local_date(order.created_at) else {
            continue;
        };
        let total = money::to_decimal(order.total);
        if date == today {
            today_total += total;
            today_orders += 1;
        }
        if date >= week_start {
            week_total += total;
            week_orders += 1;
        }
        if date.year() == today.year() && date.month() == today.month() {
            month_total += total;
            month_orders += 1;
        }
    }

    SpendingSummary {
        today: money::to_f64(today_total),
        today_orders,
        this_week: money::to_f64(week_total),
        week_orders,
        this_month: money::to_f64(month_total),
        month_orders,
    }
}

fn local_date(millis: i64) -> Option<NaiveDate> {
    Local
        .timestamp_millis_opt(millis)
        .single()
        .map(|dt| dt.date_naive())
}

fn revenue_shares(order: &Order) -> Vec<(String, Decimal)> {
    let mut shares: Vec<(String, Decimal)> = Vec::new();
    for line in &order.lines {
        let line_total = money::line_total(line.unit_price, line.quantity);
        match shares.iter_mut().find(|(id, _)| id == &line.vendor_id) {
            Some((_, sum)) => *sum += line_total,
            None => shares.push((line.vendor_id.clone(), line_total)),
        }
    }
    if shares.len() == 1 {
        return vec![(shares.remove(0).0, money::to_decimal(order.total))];
    }
    let line_sum: Decimal = shares.iter().map(|(_, sum)| *sum).sum();
    if line_sum.is_zero() {
        return shares;
    }
    let total = money::to_decimal(order.total);
    shares
        .into_iter()
        .map(|(id, sum)| (id, total * sum / line_sum))
        .collect()
}

/// Names of the stalls an order touches, joined for display.
fn vendor_label(order: &Order) -> String {
    let mut seen: Vec<&str> = Vec::new();
    let mut names: Vec<&str> = Vec::new();
    for line in &order.lines {
        if !seen.contains(&line.vendor_id.as_str()) {
            seen.push(&line.vendor_id);
            names.push(&line.vendor_name);
        }
    }
    names.join(" + ")
}

/// Kitchen waste comes from the campus audit sheet; stalls without an
/// audit entry report the 5% baseline.
fn waste_percent(vendor_id: &str) -> u8 {
    match vendor_id {
        "vendor_1" => 8,
        "vendor_2" => 6,
        "vendor_3" => 5,
        "vendor_4" => 10,
        _ => 5,
    }
}
