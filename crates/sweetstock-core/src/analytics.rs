//! # Analytics
//!
//! Read-side reductions over ledger and sale history. Everything here is
//! recomputed per request from rows the database hands over; nothing is
//! cached between calls.
//!
//! ## Reports
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  expiry_alerts   live batches with today ≤ expiry ≤ today + window     │
//! │                  → days_remaining, ordered by expiry                    │
//! │                                                                         │
//! │  top_selling     Σ qty and Σ qty×price per product                      │
//! │                  → qty desc, product_id asc                             │
//! │                                                                         │
//! │  slow_moving     Σ qty over the last 30 days for EVERY product          │
//! │                  → qty asc, name asc, product_id asc                    │
//! │                                                                         │
//! │  monthly_profit  revenue − COGS per YYYY-MM of sale_date                │
//! │                  COGS from allocation cost snapshots only               │
//! │                  → chronological, months without sales omitted          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Callers pass `today` / `now` explicitly so results are reproducible.
//! Totals are accumulated with checked arithmetic; a sum that leaves i64
//! is `CoreError::Overflow`.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use std::collections::{BTreeMap, HashMap};

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{
    ExpiryAlert, ProfitLine, ProfitReport, Product, SaleFact, SlowProduct, StockBatch, TopProduct,
};
use crate::SLOW_MOVING_WINDOW_DAYS;

// =============================================================================
// Expiry
// =============================================================================

/// Whether `expiry` falls inside `[today, today + window_days]`.
///
/// Both ends are inclusive. Already-expired stock is outside the window.
pub fn within_expiry_window(expiry: NaiveDate, today: NaiveDate, window_days: u32) -> bool {
    let deadline = today + Duration::days(i64::from(window_days));
    expiry >= today && expiry <= deadline
}

/// Builds expiry alerts from stock rows.
pub fn expiry_alerts(
    batches: impl IntoIterator<Item = StockBatch>,
    today: NaiveDate,
    window_days: u32,
) -> Vec<ExpiryAlert> {
    let mut live: Vec<StockBatch> = batches
        .into_iter()
        .filter(|b| b.quantity_remaining > 0)
        .filter(|b| within_expiry_window(b.expiry_date, today, window_days))
        .collect();

    live.sort_by(|a, b| {
        a.expiry_date
            .cmp(&b.expiry_date)
            .then_with(|| a.batch_id.cmp(&b.batch_id))
    });

    live.into_iter()
        .map(|b| ExpiryAlert {
            product_id: b.product_id,
            product_name: b.product_name,
            batch_code: b.batch_code,
            expires_on: b.expiry_date,
            days_remaining: (b.expiry_date - today).num_days(),
            quantity_remaining: b.quantity_remaining,
            unit_size_value: b.unit_size_value,
            unit_size_unit: b.unit_size_unit,
        })
        .collect()
}

// =============================================================================
// Movers
// =============================================================================

/// Top `limit` products by units sold.
///
/// Only products with at least one sale appear.
pub fn top_selling(facts: &[SaleFact], limit: usize) -> CoreResult<Vec<TopProduct>> {
    let mut by_product: HashMap<i64, TopProduct> = HashMap::new();

    for fact in facts {
        let revenue = fact.revenue()?;
        let entry = by_product.entry(fact.product_id).or_insert_with(|| TopProduct {
            product_id: fact.product_id,
            product_name: fact.product_name.clone(),
            total_quantity: 0,
            total_revenue: Money::ZERO,
        });
        entry.total_quantity = entry
            .total_quantity
            .checked_add(fact.quantity)
            .ok_or_else(|| CoreError::overflow("units sold"))?;
        entry.total_revenue = entry
            .total_revenue
            .checked_add(revenue)
            .ok_or_else(|| CoreError::overflow("product revenue"))?;
    }

    let mut ranked: Vec<TopProduct> = by_product.into_values().collect();
    ranked.sort_by(|a, b| {
        b.total_quantity
            .cmp(&a.total_quantity)
            .then_with(|| a.product_id.cmp(&b.product_id))
    });
    ranked.truncate(limit);
    Ok(ranked)
}

/// Bottom `limit` products by units sold in the 30 days before `now`.
///
/// Every catalog product takes part; one with no recent sales scores 0.
pub fn slow_moving(
    products: &[Product],
    facts: &[SaleFact],
    now: DateTime<Utc>,
    limit: usize,
) -> CoreResult<Vec<SlowProduct>> {
    let cutoff = now - Duration::days(SLOW_MOVING_WINDOW_DAYS);

    let mut sold: HashMap<i64, i64> = HashMap::new();
    for fact in facts.iter().filter(|f| f.sale_date >= cutoff) {
        let units = sold.entry(fact.product_id).or_insert(0);
        *units = units
            .checked_add(fact.quantity)
            .ok_or_else(|| CoreError::overflow("units sold"))?;
    }

    let mut ranked: Vec<SlowProduct> = products
        .iter()
        .map(|p| SlowProduct {
            product_id: p.id,
            product_name: p.name.clone(),
            sold_last_30_days: sold.get(&p.id).copied().unwrap_or(0),
        })
        .collect();

    ranked.sort_by(|a, b| {
        a.sold_last_30_days
            .cmp(&b.sold_last_30_days)
            .then_with(|| a.product_name.cmp(&b.product_name))
            .then_with(|| a.product_id.cmp(&b.product_id))
    });
    ranked.truncate(limit);
    Ok(ranked)
}

// =============================================================================
// Profit
// =============================================================================

/// Calendar month key (`YYYY-MM`) of a UTC timestamp.
pub fn month_key(at: DateTime<Utc>) -> String {
    at.format("%Y-%m").to_string()
}

/// Revenue, COGS and profit per month of `sale_date`.
pub fn monthly_profit(facts: &[SaleFact], currency: &str) -> CoreResult<ProfitReport> {
    // BTreeMap keys sort lexicographically, which for YYYY-MM is chronological.
    let mut months: BTreeMap<String, (Money, Money)> = BTreeMap::new();

    for fact in facts {
        let sale_revenue = fact.revenue()?;
        let (revenue, cogs) = months.entry(month_key(fact.sale_date)).or_default();
        *revenue = revenue
            .checked_add(sale_revenue)
            .ok_or_else(|| CoreError::overflow("monthly revenue"))?;
        *cogs = cogs
            .checked_add(fact.cogs)
            .ok_or_else(|| CoreError::overflow("monthly cost of goods sold"))?;
    }

    let months = months
        .into_iter()
        .map(|(month, (revenue, cogs))| {
            let profit = revenue
                .checked_sub(cogs)
                .ok_or_else(|| CoreError::overflow("monthly profit"))?;
            Ok(ProfitLine {
                month,
                revenue,
                cogs,
                profit,
            })
        })
        .collect::<CoreResult<Vec<_>>>()?;

    Ok(ProfitReport {
        currency: currency.to_string(),
        months,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
