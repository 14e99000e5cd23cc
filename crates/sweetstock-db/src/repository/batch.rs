//! # Batch Ledger Repository
//!
//! Purchases create batches; only the allocator ever lowers
//! `quantity_remaining`. Batches are never deleted so the cost trail of
//! every sale stays reconstructible.
//!
//! ## Read Paths
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  list()              every batch, by expiry then batch_code            │
//! │  list_remaining()    remaining > 0, FIFO order (expiry, receipt, id)   │
//! │  list_in_stock()     list_remaining() as purchases, with supplier      │
//! │  expiring_within()   remaining > 0 and today ≤ expiry ≤ today + days   │
//! │  overview()          every batch joined with product, by product name  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Duration, NaiveDate, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::repository::idempotency::{self, Scope};
use crate::repository::partner::find_supplier;
use crate::repository::product::ensure_product;
use crate::repository::{parse_unit_size, Recorded};
use crate::retry::{with_write_retry, WritePolicy};
use sweetstock_core::analytics;
use sweetstock_core::{
    Batch, CoreError, ExpiryAlert, Money, NewPurchase, Purchase, SizeUnit, StockBatch, StockOverview,
    Supplier,
};

const BATCH_COLUMNS: &str = r#"
    b.id, b.product_id, b.batch_code, b.quantity_initial, b.quantity_remaining,
    b.unit_cost_paise, b.unit_size_value, b.unit_size_unit, b.expiry_date,
    b.supplier_id, b.supplier_name, b.purchased_at
"#;

const SUPPLIER_COLUMNS: &str = r#"
    s.id AS s_id, s.name AS s_name, s.contact_person AS s_contact_person,
    s.phone AS s_phone, s.email AS s_email, s.gst_number AS s_gst_number,
    s.city AS s_city, s.created_at AS s_created_at
"#;

// =============================================================================
// Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct BatchRow {
    id: i64,
    product_id: i64,
    batch_code: String,
    quantity_initial: i64,
    quantity_remaining: i64,
    unit_cost_paise: i64,
    unit_size_value: String,
    unit_size_unit: SizeUnit,
    expiry_date: NaiveDate,
    supplier_id: Option<i64>,
    supplier_name: Option<String>,
    purchased_at: DateTime<Utc>,
}

impl TryFrom<BatchRow> for Batch {
    type Error = DbError;

    fn try_from(row: BatchRow) -> DbResult<Self> {
        Ok(Batch {
            id: row.id,
            product_id: row.product_id,
            batch_code: row.batch_code,
            quantity_initial: row.quantity_initial,
            quantity_remaining: row.quantity_remaining,
            unit_cost: Money::from_paise(row.unit_cost_paise),
            unit_size_value: parse_unit_size(&row.unit_size_value)?,
            unit_size_unit: row.unit_size_unit,
            expiry_date: row.expiry_date,
            supplier_id: row.supplier_id,
            supplier_name: row.supplier_name,
            purchased_at: row.purchased_at,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct PurchaseRow {
    #[sqlx(flatten)]
    batch: BatchRow,
    s_id: Option<i64>,
    s_name: Option<String>,
    s_contact_person: Option<String>,
    s_phone: Option<String>,
    s_email: Option<String>,
    s_gst_number: Option<String>,
    s_city: Option<String>,
    s_created_at: Option<DateTime<Utc>>,
}

impl TryFrom<PurchaseRow> for Purchase {
    type Error = DbError;

    fn try_from(row: PurchaseRow) -> DbResult<Self> {
        let supplier = match (row.s_id, row.s_name, row.s_created_at) {
            (Some(id), Some(name), Some(created_at)) => Some(Supplier {
                id,
                name,
                contact_person: row.s_contact_person,
                phone: row.s_phone,
                email: row.s_email,
                gst_number: row.s_gst_number,
                city: row.s_city,
                created_at,
            }),
            _ => None,
        };

        Ok(Purchase {
            batch: row.batch.try_into()?,
            supplier,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct StockRow {
    #[sqlx(flatten)]
    batch: BatchRow,
    product_name: String,
    live_supplier_name: Option<String>,
}

impl TryFrom<StockRow> for StockBatch {
    type Error = DbError;

    fn try_from(row: StockRow) -> DbResult<Self> {
        let live_supplier_name = row.live_supplier_name;
        let batch: Batch = row.batch.try_into()?;
        Ok(StockBatch {
            batch_id: batch.id,
            product_id: batch.product_id,
            product_name: row.product_name,
            batch_code: batch.batch_code,
            quantity_remaining: batch.quantity_remaining,
            expiry_date: batch.expiry_date,
            unit_cost: batch.unit_cost,
            unit_size_value: batch.unit_size_value,
            unit_size_unit: batch.unit_size_unit,
            supplier_id: batch.supplier_id,
            supplier_name: batch.supplier_name.or(live_supplier_name),
            purchased_at: batch.purchased_at,
        })
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for the batch ledger.
#[derive(Debug, Clone)]
pub struct BatchRepository {
    pool: SqlitePool,
    policy: WritePolicy,
}

impl BatchRepository {
    pub fn new(pool: SqlitePool, policy: WritePolicy) -> Self {
        BatchRepository { pool, policy }
    }

    /// Records a purchase as a new batch with `remaining = initial`.
    ///
    /// ## Errors
    /// - `Validation` for non-positive quantity / pack size, negative cost
    /// - `NotFound` for an unknown product or supplier
    /// - `Duplicate` when the product already has a batch with this code
    ///
    /// With `idempotency_key`, a repeated call returns the first batch as
    /// `Recorded::Replayed` and writes nothing.
    pub async fn create(
        &self,
        input: NewPurchase,
        idempotency_key: Option<&str>,
    ) -> DbResult<Recorded<Purchase>> {
        let input = input.normalized()?;
        let input = &input;

        let outcome =
            with_write_retry(self.policy, "purchase", move || self.create_once(input, idempotency_key))
                .await;

        let outcome = match (outcome, idempotency_key) {
            // Lost the race for the key to a concurrent request.
            (Err(err), Some(key)) if err.is_duplicate_in(idempotency::TABLE) => {
                let mut conn = self.pool.acquire().await?;
                let id = idempotency::lookup(&mut conn, Scope::Purchase, key)
                    .await?
                    .ok_or(err)?;
                Recorded::Replayed(id)
            }
            (other, _) => other?,
        };

        if outcome.is_replay() {
            info!(key = ?idempotency_key, "Purchase replayed from idempotency key");
        }

        let purchase = match outcome {
            Recorded::Created(id) => Recorded::Created(self.get(id).await?),
            Recorded::Replayed(id) => Recorded::Replayed(self.get(id).await?),
        };
        Ok(purchase)
    }

    async fn create_once(
        &self,
        input: &NewPurchase,
        idempotency_key: Option<&str>,
    ) -> DbResult<Recorded<i64>> {
        let mut tx = self.pool.begin().await?;

        if let Some(key) = idempotency_key {
            if let Some(id) = idempotency::lookup(&mut tx, Scope::Purchase, key).await? {
                return Ok(Recorded::Replayed(id));
            }
        }

        ensure_product(&mut tx, input.product_id).await?;

        let supplier_name = match input.supplier_id {
            Some(supplier_id) => {
                let supplier = find_supplier(&mut tx, supplier_id)
                    .await?
                    .ok_or_else(|| DbError::not_found("Supplier", supplier_id))?;
                input.supplier_name.clone().or(Some(supplier.name))
            }
            None => input.supplier_name.clone(),
        };

        let result = sqlx::query(
            r#"
            INSERT INTO inventory_batches (
                product_id, batch_code, quantity_initial, quantity_remaining,
                unit_cost_paise, unit_size_value, unit_size_unit, expiry_date,
                supplier_id, supplier_name, purchased_at
            )
            VALUES (?1, ?2, ?3, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
        )
        .bind(input.product_id)
        .bind(&input.batch_code)
        .bind(input.quantity)
        .bind(input.unit_cost.paise())
        .bind(input.unit_size_value.to_string())
        .bind(input.unit_size_unit)
        .bind(input.expiry_date)
        .bind(input.supplier_id)
        .bind(&supplier_name)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await
        .map_err(|e| match DbError::from(e) {
            dup if dup.is_duplicate_in("inventory_batches") => {
                DbError::duplicate("Batch", "batch_code", input.batch_code.as_str())
            }
            other => other,
        })?;

        let batch_id = result.last_insert_rowid();

        if let Some(key) = idempotency_key {
            idempotency::remember(&mut tx, Scope::Purchase, key, batch_id).await?;
        }

        tx.commit().await?;

        info!(
            batch_id,
            product_id = input.product_id,
            batch_code = %input.batch_code,
            quantity = input.quantity,
            unit_cost = %input.unit_cost,
            "Batch created"
        );

        Ok(Recorded::Created(batch_id))
    }

    /// Gets one purchase (batch + live supplier).
    pub async fn get(&self, id: i64) -> DbResult<Purchase> {
        let row = sqlx::query_as::<_, PurchaseRow>(&format!(
            r#"
            SELECT {BATCH_COLUMNS}, {SUPPLIER_COLUMNS}
            FROM inventory_batches b
            LEFT JOIN suppliers s ON s.id = b.supplier_id
            WHERE b.id = ?1
            "#
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("Batch", id))?;

        row.try_into()
    }

    /// Lists every batch, including exhausted ones, by expiry then code.
    pub async fn list(&self, product_id: Option<i64>) -> DbResult<Vec<Purchase>> {
        let rows = sqlx::query_as::<_, PurchaseRow>(&format!(
            r#"
            SELECT {BATCH_COLUMNS}, {SUPPLIER_COLUMNS}
            FROM inventory_batches b
            LEFT JOIN suppliers s ON s.id = b.supplier_id
            WHERE ?1 IS NULL OR b.product_id = ?1
            ORDER BY b.expiry_date, b.batch_code, b.id
            "#
        ))
        .bind(product_id)
        .fetch_all(&self.pool)
        .await?;

        debug!(count = rows.len(), ?product_id, "Listed batches");
        rows.into_iter().map(Purchase::try_from).collect()
    }

    /// Lists batches that still hold stock, in FIFO order.
    pub async fn list_remaining(&self, product_id: Option<i64>) -> DbResult<Vec<Batch>> {
        let mut conn = self.pool.acquire().await?;
        list_remaining_in(&mut conn, product_id).await
    }

    /// Same rows and order as [`list_remaining`](Self::list_remaining), shaped
    /// like [`list`](Self::list) so both purchase listings share one schema.
    pub async fn list_in_stock(&self, product_id: Option<i64>) -> DbResult<Vec<Purchase>> {
        let rows = sqlx::query_as::<_, PurchaseRow>(&format!(
            r#"
            SELECT {BATCH_COLUMNS}, {SUPPLIER_COLUMNS}
            FROM inventory_batches b
            LEFT JOIN suppliers s ON s.id = b.supplier_id
            WHERE b.quantity_remaining > 0
              AND (?1 IS NULL OR b.product_id = ?1)
            ORDER BY b.expiry_date, b.purchased_at, b.id
            "#
        ))
        .bind(product_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Purchase::try_from).collect()
    }

    /// Live batches expiring in `[today, today + days]`, with days left.
    pub async fn expiring_within(&self, days: u32, today: NaiveDate) -> DbResult<Vec<ExpiryAlert>> {
        let deadline = today + Duration::days(i64::from(days));

        let rows = sqlx::query_as::<_, StockRow>(&format!(
            r#"
            SELECT {BATCH_COLUMNS}, p.name AS product_name, s.name AS live_supplier_name
            FROM inventory_batches b
            JOIN products p ON p.id = b.product_id
            LEFT JOIN suppliers s ON s.id = b.supplier_id
            WHERE b.quantity_remaining > 0
              AND b.expiry_date >= ?1
              AND b.expiry_date <= ?2
            ORDER BY b.expiry_date, b.id
            "#
        ))
        .bind(today)
        .bind(deadline)
        .fetch_all(&self.pool)
        .await?;

        let stock = rows
            .into_iter()
            .map(StockBatch::try_from)
            .collect::<DbResult<Vec<_>>>()?;

        let alerts = analytics::expiry_alerts(stock, today, days);
        debug!(count = alerts.len(), days, %today, "Computed expiry alerts");
        Ok(alerts)
    }

    /// Every batch joined with its product, plus catalog-wide totals.
    pub async fn overview(&self) -> DbResult<StockOverview> {
        let rows = sqlx::query_as::<_, StockRow>(&format!(
            r#"
            SELECT {BATCH_COLUMNS}, p.name AS product_name, s.name AS live_supplier_name
            FROM inventory_batches b
            JOIN products p ON p.id = b.product_id
            LEFT JOIN suppliers s ON s.id = b.supplier_id
            ORDER BY p.name, b.batch_code, b.id
            "#
        ))
        .fetch_all(&self.pool)
        .await?;

        let batches = rows
            .into_iter()
            .map(StockBatch::try_from)
            .collect::<DbResult<Vec<_>>>()?;

        let total_products: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        let total_units = batches
            .iter()
            .try_fold(0i64, |total, b| total.checked_add(b.quantity_remaining))
            .ok_or_else(|| DbError::Domain(CoreError::overflow("total units")))?;

        Ok(StockOverview {
            total_products,
            total_batches: batches.len() as i64,
            total_units,
            batches,
        })
    }
}

/// FIFO-ordered live batches on an existing connection or transaction.
pub(crate) async fn list_remaining_in(
    conn: &mut SqliteConnection,
    product_id: Option<i64>,
) -> DbResult<Vec<Batch>> {
    let rows = sqlx::query_as::<_, BatchRow>(&format!(
        r#"
        SELECT {BATCH_COLUMNS}
        FROM inventory_batches b
        WHERE b.quantity_remaining > 0
          AND (?1 IS NULL OR b.product_id = ?1)
        ORDER BY b.expiry_date, b.purchased_at, b.id
        "#
    ))
    .bind(product_id)
    .fetch_all(&mut *conn)
    .await?;

    rows.into_iter().map(Batch::try_from).collect()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use rust_decimal::Decimal;
    use sweetstock_core::{NewProduct, NewSupplier};

    async fn setup() -> (Database, i64) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let product = db
            .products()
            .create(NewProduct {
                name: "Kaju Katli".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();
        (db, product.id)
    }

    fn purchase(product_id: i64, code: &str, qty: i64, expiry: NaiveDate) -> NewPurchase {
        NewPurchase {
            product_id,
            batch_code: code.to_string(),
            quantity: qty,
            unit_cost: Money::from_paise(1000),
            expiry_date: expiry,
            supplier_name: None,
            unit_size_value: Decimal::new(500, 0),
            unit_size_unit: SizeUnit::G,
            supplier_id: None,
        }
    }

    fn day(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, d).unwrap()
    }

    #[tokio::test]
    async fn test_create_sets_remaining_to_initial() {
        let (db, pid) = setup().await;

        let created = db
            .batches()
            .create(purchase(pid, "KK-01", 12, day(3, 1)), None)
            .await
            .unwrap();

        assert!(!created.is_replay());
        let p = created.into_inner();
        assert_eq!(p.batch.quantity_initial, 12);
        assert_eq!(p.batch.quantity_remaining, 12);
        assert_eq!(p.batch.unit_size_value, Decimal::new(500, 0));
        assert!(p.supplier.is_none());
    }

    #[tokio::test]
    async fn test_create_rejects_unknown_product_and_supplier() {
        let (db, pid) = setup().await;

        let err = db
            .batches()
            .create(purchase(pid + 100, "X", 1, day(3, 1)), None)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { ref entity, .. } if entity == "Product"));

        let mut input = purchase(pid, "X", 1, day(3, 1));
        input.supplier_id = Some(77);
        let err = db.batches().create(input, None).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { ref entity, .. } if entity == "Supplier"));
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_numbers() {
        let (db, pid) = setup().await;

        let mut input = purchase(pid, "X", 0, day(3, 1));
        assert!(matches!(
            db.batches().create(input.clone(), None).await,
            Err(DbError::Domain(CoreError::Validation(_)))
        ));

        input.quantity = 1;
        input.unit_cost = Money::from_paise(-5);
        assert!(matches!(
            db.batches().create(input, None).await,
            Err(DbError::Domain(CoreError::Validation(_)))
        ));
    }

    #[tokio::test]
    async fn test_duplicate_batch_code_per_product() {
        let (db, pid) = setup().await;
        let other = db
            .products()
            .create(NewProduct {
                name: "Peda".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();

        db.batches().create(purchase(pid, "LOT-1", 5, day(3, 1)), None).await.unwrap();
        // Same code on another product is fine.
        db.batches().create(purchase(other.id, "LOT-1", 5, day(3, 1)), None).await.unwrap();

        let err = db
            .batches()
            .create(purchase(pid, "LOT-1", 5, day(4, 1)), None)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Duplicate { ref field, .. } if field == "batch_code"));
    }

    #[tokio::test]
    async fn test_supplier_snapshot_rules() {
        let (db, pid) = setup().await;
        let supplier = db
            .suppliers()
            .create(NewSupplier {
                name: "Bikaner Sweets".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();

        let mut from_ref = purchase(pid, "A", 1, day(3, 1));
        from_ref.supplier_id = Some(supplier.id);
        let a = db.batches().create(from_ref, None).await.unwrap().into_inner();
        assert_eq!(a.batch.supplier_name.as_deref(), Some("Bikaner Sweets"));
        assert_eq!(a.supplier.as_ref().map(|s| s.id), Some(supplier.id));

        let mut explicit = purchase(pid, "B", 1, day(3, 1));
        explicit.supplier_id = Some(supplier.id);
        explicit.supplier_name = Some("  Bikaner Depot ".to_string());
        let b = db.batches().create(explicit, None).await.unwrap().into_inner();
        assert_eq!(b.batch.supplier_name.as_deref(), Some("Bikaner Depot"));

        let mut walk_in = purchase(pid, "C", 1, day(3, 1));
        walk_in.supplier_name = Some("Local Halwai".to_string());
        let c = db.batches().create(walk_in, None).await.unwrap().into_inner();
        assert_eq!(c.batch.supplier_id, None);
        assert_eq!(c.batch.supplier_name.as_deref(), Some("Local Halwai"));
    }

    #[tokio::test]
    async fn test_deleting_supplier_keeps_snapshot() {
        let (db, pid) = setup().await;
        let supplier = db
            .suppliers()
            .create(NewSupplier {
                name: "Bikaner Sweets".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();

        let mut input = purchase(pid, "A", 3, day(3, 1));
        input.supplier_id = Some(supplier.id);
        let created = db.batches().create(input, None).await.unwrap().into_inner();

        db.suppliers().delete(supplier.id).await.unwrap();

        let after = db.batches().get(created.batch.id).await.unwrap();
        assert_eq!(after.batch.supplier_id, None);
        assert_eq!(after.batch.supplier_name.as_deref(), Some("Bikaner Sweets"));
        assert!(after.supplier.is_none());
        assert_eq!(after.batch.quantity_remaining, 3);
    }

    #[tokio::test]
    async fn test_idempotent_purchase() {
        let (db, pid) = setup().await;

        let first = db
            .batches()
            .create(purchase(pid, "IDEM", 4, day(3, 1)), Some("po-123"))
            .await
            .unwrap();
        let second = db
            .batches()
            .create(purchase(pid, "IDEM", 4, day(3, 1)), Some("po-123"))
            .await
            .unwrap();

        assert!(!first.is_replay());
        assert!(second.is_replay());
        assert_eq!(first.into_inner().batch.id, second.into_inner().batch.id);
        assert_eq!(db.batches().list(None).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_list_remaining_fifo_order() {
        let (db, pid) = setup().await;
        let batches = db.batches();

        batches.create(purchase(pid, "LATE", 5, day(1, 10)), None).await.unwrap();
        batches.create(purchase(pid, "EARLY", 5, day(1, 5)), None).await.unwrap();
        batches.create(purchase(pid, "SAME-DAY", 5, day(1, 5)), None).await.unwrap();

        let codes: Vec<String> = batches
            .list_remaining(Some(pid))
            .await
            .unwrap()
            .into_iter()
            .map(|b| b.batch_code)
            .collect();
        assert_eq!(codes, vec!["EARLY", "SAME-DAY", "LATE"]);

        assert!(batches.list_remaining(Some(pid + 1)).await.unwrap().is_empty());
        assert_eq!(batches.list_remaining(None).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_list_in_stock_matches_remaining_as_purchases() {
        let (db, pid) = setup().await;
        let batches = db.batches();

        batches.create(purchase(pid, "LATE", 5, day(1, 10)), None).await.unwrap();
        batches.create(purchase(pid, "EARLY", 2, day(1, 5)), None).await.unwrap();
        sqlx::query("UPDATE inventory_batches SET quantity_remaining = 0 WHERE batch_code = 'EARLY'")
            .execute(db.pool())
            .await
            .unwrap();
        batches.create(purchase(pid, "MID", 5, day(1, 7)), None).await.unwrap();

        let in_stock = batches.list_in_stock(Some(pid)).await.unwrap();
        let remaining = batches.list_remaining(Some(pid)).await.unwrap();

        let codes: Vec<&str> = in_stock.iter().map(|p| p.batch.batch_code.as_str()).collect();
        assert_eq!(codes, vec!["MID", "LATE"]);
        assert_eq!(
            in_stock.iter().map(|p| p.batch.id).collect::<Vec<_>>(),
            remaining.iter().map(|b| b.id).collect::<Vec<_>>()
        );
        assert_eq!(batches.list(Some(pid)).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_expiring_within_window_edges() {
        let (db, pid) = setup().await;
        let batches = db.batches();
        let today = day(6, 1);

        batches.create(purchase(pid, "D0", 1, day(6, 1)), None).await.unwrap();
        batches.create(purchase(pid, "D7", 1, day(6, 8)), None).await.unwrap();
        batches.create(purchase(pid, "D8", 1, day(6, 9)), None).await.unwrap();
        batches.create(purchase(pid, "PAST", 1, day(5, 31)), None).await.unwrap();

        let alerts = batches.expiring_within(7, today).await.unwrap();
        let got: Vec<(String, i64)> = alerts
            .into_iter()
            .map(|a| (a.batch_code, a.days_remaining))
            .collect();
        assert_eq!(got, vec![("D0".to_string(), 0), ("D7".to_string(), 7)]);
    }

    #[tokio::test]
    async fn test_overview_totals() {
        let (db, pid) = setup().await;
        db.products()
            .create(NewProduct {
                name: "Barfi".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();

        db.batches().create(purchase(pid, "B", 4, day(3, 1)), None).await.unwrap();
        db.batches().create(purchase(pid, "A", 6, day(3, 2)), None).await.unwrap();

        let overview = db.batches().overview().await.unwrap();
        assert_eq!(overview.total_products, 2);
        assert_eq!(overview.total_batches, 2);
        assert_eq!(overview.total_units, 10);
        assert_eq!(overview.batches[0].batch_code, "A");
        assert_eq!(overview.batches[0].product_name, "Kaju Katli");
    }
}
