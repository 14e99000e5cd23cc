//! # Analytics Repository
//!
//! Loads sale facts and hands them to [`sweetstock_core::analytics`].
//! Each report is recomputed from the ledger on every call.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use sweetstock_core::analytics;
use sweetstock_core::{Money, Product, ProfitReport, SaleFact, SlowProduct, TopProduct};

#[derive(Debug, sqlx::FromRow)]
struct SaleFactRow {
    sale_id: i64,
    product_id: i64,
    product_name: String,
    quantity: i64,
    selling_price_paise: i64,
    sale_date: DateTime<Utc>,
    cogs_paise: i64,
}

impl From<SaleFactRow> for SaleFact {
    fn from(row: SaleFactRow) -> Self {
        SaleFact {
            sale_id: row.sale_id,
            product_id: row.product_id,
            product_name: row.product_name,
            quantity: row.quantity,
            selling_price: Money::from_paise(row.selling_price_paise),
            sale_date: row.sale_date,
            cogs: Money::from_paise(row.cogs_paise),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ReportRepository {
    pool: SqlitePool,
}

impl ReportRepository {
    pub fn new(pool: SqlitePool) -> Self {
        ReportRepository { pool }
    }

    /// Every sale with its product name and allocated cost.
    pub async fn sale_facts(&self) -> DbResult<Vec<SaleFact>> {
        let rows = sqlx::query_as::<_, SaleFactRow>(
            r#"
            SELECT sa.id AS sale_id,
                   sa.product_id,
                   p.name AS product_name,
                   sa.quantity,
                   sa.selling_price_paise,
                   sa.sale_date,
                   COALESCE((
                       SELECT SUM(a.quantity * a.unit_cost_paise)
                       FROM sale_allocations a
                       WHERE a.sale_id = sa.id
                   ), 0) AS cogs_paise
            FROM sales sa
            JOIN products p ON p.id = sa.product_id
            ORDER BY sa.sale_date, sa.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        debug!(count = rows.len(), "Loaded sale facts");
        Ok(rows.into_iter().map(SaleFact::from).collect())
    }

    /// Products ranked by total units sold, at most `limit`.
    pub async fn top_selling(&self, limit: u32) -> DbResult<Vec<TopProduct>> {
        let facts = self.sale_facts().await?;
        Ok(analytics::top_selling(&facts, limit as usize)?)
    }

    /// Products with the fewest units sold in the 30 days before `now`.
    pub async fn slow_moving(&self, limit: u32, now: DateTime<Utc>) -> DbResult<Vec<SlowProduct>> {
        let products = sqlx::query_as::<_, Product>(
            "SELECT id, name, category, brand, created_at FROM products ORDER BY name, id",
        )
        .fetch_all(&self.pool)
        .await?;
        let facts = self.sale_facts().await?;

        Ok(analytics::slow_moving(&products, &facts, now, limit as usize)?)
    }

    /// Revenue, COGS and profit per calendar month.
    pub async fn monthly_profit(&self, currency: &str) -> DbResult<ProfitReport> {
        let facts = self.sale_facts().await?;
        Ok(analytics::monthly_profit(&facts, currency)?)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
