//! # Sale Recorder
//!
//! Records a sale and its FIFO cost trail as one atomic unit.
//!
//! ## Write Path
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  record(NewSale)                                                        │
//! │     │                                                                   │
//! │     ├─ normalize + validate payload                                     │
//! │     ├─ product exists?                     no ──► NotFound              │
//! │     ├─ lock(product)                       timeout ──► Conflict         │
//! │     │                                                                   │
//! │     │   ┌── with_write_retry (BUSY ─► fresh tx) ───────────────────┐    │
//! │     │   │  BEGIN                                                   │    │
//! │     │   │   idempotency lookup           hit ──► Replayed          │    │
//! │     │   │   retailer → customer_name snapshot                      │    │
//! │     │   │   invoice_number free?         no ──► Duplicate          │    │
//! │     │   │   allocate (plan + guarded decrement)                    │    │
//! │     │   │   INSERT sales, INSERT sale_allocations × n              │    │
//! │     │   │   remember idempotency key                               │    │
//! │     │   │  COMMIT                                                  │    │
//! │     │   └──────────────────────────────────────────────────────────┘    │
//! │     │                                                                   │
//! │     └─ unlock, load read model                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Any error before COMMIT drops the transaction: no sale row, no
//! allocation rows, no batch change.

use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use std::collections::HashMap;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::locks::ProductLocks;
use crate::repository::idempotency::{self, Scope};
use crate::repository::partner::find_retailer;
use crate::repository::product::ensure_product;
use crate::repository::{allocator, parse_unit_size, Recorded};
use crate::retry::{with_write_retry, WritePolicy};
use sweetstock_core::{allocation_cost, Allocation, Money, NewSale, Retailer, Sale, SizeUnit};

const SELECT_SALE: &str = r#"
    SELECT sa.id, sa.product_id, sa.retailer_id, sa.quantity, sa.selling_price_paise,
           sa.sale_date, sa.customer_name, sa.unit_size_value, sa.unit_size_unit,
           sa.invoice_number,
           r.id AS r_id, r.name AS r_name, r.channel AS r_channel,
           r.contact_person AS r_contact_person, r.phone AS r_phone,
           r.email AS r_email, r.gst_number AS r_gst_number, r.created_at AS r_created_at
    FROM sales sa
    LEFT JOIN retailers r ON r.id = sa.retailer_id
"#;

#[derive(Debug, sqlx::FromRow)]
struct SaleRow {
    id: i64,
    product_id: i64,
    retailer_id: Option<i64>,
    quantity: i64,
    selling_price_paise: i64,
    sale_date: DateTime<Utc>,
    customer_name: Option<String>,
    unit_size_value: String,
    unit_size_unit: SizeUnit,
    invoice_number: Option<String>,
    r_id: Option<i64>,
    r_name: Option<String>,
    r_channel: Option<String>,
    r_contact_person: Option<String>,
    r_phone: Option<String>,
    r_email: Option<String>,
    r_gst_number: Option<String>,
    r_created_at: Option<DateTime<Utc>>,
}

impl SaleRow {
    fn into_sale(self, allocations: Vec<Allocation>) -> DbResult<Sale> {
        let retailer = match (self.r_id, self.r_name, self.r_created_at) {
            (Some(id), Some(name), Some(created_at)) => Some(Retailer {
                id,
                name,
                channel: self.r_channel,
                contact_person: self.r_contact_person,
                phone: self.r_phone,
                email: self.r_email,
                gst_number: self.r_gst_number,
                created_at,
            }),
            _ => None,
        };

        Ok(Sale {
            id: self.id,
            product_id: self.product_id,
            retailer_id: self.retailer_id,
            quantity: self.quantity,
            selling_price: Money::from_paise(self.selling_price_paise),
            sale_date: self.sale_date,
            customer_name: self.customer_name,
            unit_size_value: parse_unit_size(&self.unit_size_value)?,
            unit_size_unit: self.unit_size_unit,
            invoice_number: self.invoice_number,
            retailer,
            allocations,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct AllocationRow {
    sale_id: i64,
    batch_id: i64,
    quantity: i64,
    unit_cost_paise: i64,
}

impl From<AllocationRow> for Allocation {
    fn from(row: AllocationRow) -> Self {
        Allocation {
            batch_id: row.batch_id,
            quantity: row.quantity,
            unit_cost: Money::from_paise(row.unit_cost_paise),
        }
    }
}

/// Repository for sales and their allocation trail.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
    locks: ProductLocks,
    policy: WritePolicy,
}

impl SaleRepository {
    pub fn new(pool: SqlitePool, locks: ProductLocks, policy: WritePolicy) -> Self {
        SaleRepository { pool, locks, policy }
    }

    /// Records a sale, consuming stock first-to-expire first.
    ///
    /// ## Errors
    /// - `Validation` for a bad payload
    /// - `NotFound` for an unknown product or retailer
    /// - `InsufficientStock` when live batches cannot cover `quantity`
    /// - `Duplicate` for a reused `invoice_number`
    /// - `Conflict` when the product lock or the database stays busy
    ///
    /// With `idempotency_key`, a repeated call returns the first sale as
    /// `Recorded::Replayed` and consumes nothing.
    pub async fn record(
        &self,
        input: NewSale,
        idempotency_key: Option<&str>,
    ) -> DbResult<Recorded<Sale>> {
        let input = input.normalized()?;

        {
            let mut conn = self.pool.acquire().await?;
            ensure_product(&mut conn, input.product_id).await?;
        }

        let guard = self
            .locks
            .acquire(input.product_id, self.policy.lock_timeout)
            .await?;

        let input = &input;
        let outcome =
            with_write_retry(self.policy, "sale", move || self.record_once(input, idempotency_key)).await;

        drop(guard);

        let outcome = match (outcome, idempotency_key) {
            // Lost the race for the key to a concurrent request.
            (Err(err), Some(key)) if err.is_duplicate_in(idempotency::TABLE) => {
                let mut conn = self.pool.acquire().await?;
                let id = idempotency::lookup(&mut conn, Scope::Sale, key)
                    .await?
                    .ok_or(err)?;
                Recorded::Replayed(id)
            }
            (other, _) => other?,
        };

        match outcome {
            Recorded::Created(id) => Ok(Recorded::Created(self.get(id).await?)),
            Recorded::Replayed(id) => {
                info!(sale_id = id, key = ?idempotency_key, "Sale replayed from idempotency key");
                Ok(Recorded::Replayed(self.get(id).await?))
            }
        }
    }

    async fn record_once(
        &self,
        input: &NewSale,
        idempotency_key: Option<&str>,
    ) -> DbResult<Recorded<i64>> {
        let mut tx = self.pool.begin().await?;

        if let Some(key) = idempotency_key {
            if let Some(id) = idempotency::lookup(&mut tx, Scope::Sale, key).await? {
                return Ok(Recorded::Replayed(id));
            }
        }

        ensure_product(&mut tx, input.product_id).await?;

        let customer_name = match input.retailer_id {
            Some(retailer_id) => {
                let retailer = find_retailer(&mut tx, retailer_id)
                    .await?
                    .ok_or_else(|| DbError::not_found("Retailer", retailer_id))?;
                input.customer_name.clone().or(Some(retailer.name))
            }
            None => input.customer_name.clone(),
        };

        if let Some(invoice) = &input.invoice_number {
            ensure_invoice_free(&mut tx, invoice).await?;
        }

        let allocations = allocator::allocate(&mut tx, input.product_id, input.quantity).await?;
        // Costed before anything is written so an out-of-range total rolls back.
        let cogs = allocation_cost(&allocations)?;

        let result = sqlx::query(
            r#"
            INSERT INTO sales (
                product_id, retailer_id, customer_name, quantity, selling_price_paise,
                unit_size_value, unit_size_unit, invoice_number, sale_date
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(input.product_id)
        .bind(input.retailer_id)
        .bind(&customer_name)
        .bind(input.quantity)
        .bind(input.selling_price.paise())
        .bind(input.unit_size_value.to_string())
        .bind(input.unit_size_unit)
        .bind(&input.invoice_number)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await
        .map_err(|e| match DbError::from(e) {
            dup if dup.is_duplicate_in("sales") => DbError::duplicate(
                "Sale",
                "invoice_number",
                input.invoice_number.clone().unwrap_or_default(),
            ),
            other => other,
        })?;

        let sale_id = result.last_insert_rowid();

        for allocation in &allocations {
            sqlx::query(
                r#"
                INSERT INTO sale_allocations (sale_id, batch_id, quantity, unit_cost_paise)
                VALUES (?1, ?2, ?3, ?4)
                "#,
            )
            .bind(sale_id)
            .bind(allocation.batch_id)
            .bind(allocation.quantity)
            .bind(allocation.unit_cost.paise())
            .execute(&mut *tx)
            .await?;
        }

        if let Some(key) = idempotency_key {
            idempotency::remember(&mut tx, Scope::Sale, key, sale_id).await?;
        }

        tx.commit().await?;

        info!(
            sale_id,
            product_id = input.product_id,
            quantity = input.quantity,
            selling_price = %input.selling_price,
            cogs = %cogs,
            batches = allocations.len(),
            "Sale recorded"
        );

        Ok(Recorded::Created(sale_id))
    }

    /// Gets one sale with its allocations and live retailer.
    pub async fn get(&self, id: i64) -> DbResult<Sale> {
        let row = sqlx::query_as::<_, SaleRow>(&format!("{SELECT_SALE} WHERE sa.id = ?1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("Sale", id))?;

        let allocations = sqlx::query_as::<_, AllocationRow>(
            "SELECT sale_id, batch_id, quantity, unit_cost_paise FROM sale_allocations WHERE sale_id = ?1 ORDER BY id",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(Allocation::from)
        .collect();

        row.into_sale(allocations)
    }

    /// Lists every sale, newest first.
    pub async fn list(&self) -> DbResult<Vec<Sale>> {
        let rows = sqlx::query_as::<_, SaleRow>(&format!(
            "{SELECT_SALE} ORDER BY sa.sale_date DESC, sa.id DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        let mut by_sale: HashMap<i64, Vec<Allocation>> = HashMap::new();
        let allocation_rows = sqlx::query_as::<_, AllocationRow>(
            "SELECT sale_id, batch_id, quantity, unit_cost_paise FROM sale_allocations ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        for row in allocation_rows {
            by_sale.entry(row.sale_id).or_default().push(row.into());
        }

        debug!(count = rows.len(), "Listed sales");

        rows.into_iter()
            .map(|row| {
                let allocations = by_sale.remove(&row.id).unwrap_or_default();
                row.into_sale(allocations)
            })
            .collect()
    }
}

async fn ensure_invoice_free(conn: &mut SqliteConnection, invoice: &str) -> DbResult<()> {
    let taken: Option<i64> = sqlx::query_scalar("SELECT id FROM sales WHERE invoice_number = ?1")
        .bind(invoice)
        .fetch_optional(&mut *conn)
        .await?;

    match taken {
        Some(_) => Err(DbError::duplicate("Sale", "invoice_number", invoice)),
        None => Ok(()),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
