//! # Partner Registry
//!
//! Suppliers and retailers.
//!
//! ## Weak References
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  inventory_batches.supplier_id ──► suppliers.id   ON DELETE SET NULL   │
//! │  inventory_batches.supplier_name   (snapshot, never touched)           │
//! │                                                                         │
//! │  sales.retailer_id            ──► retailers.id    ON DELETE SET NULL   │
//! │  sales.customer_name              (snapshot, never touched)            │
//! │                                                                         │
//! │  DELETE /api/suppliers/3                                                │
//! │     → batches keep "Bikaner Sweets" in supplier_name                    │
//! │     → supplier_id becomes NULL, nested `supplier` becomes null         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use sweetstock_core::{NewRetailer, NewSupplier, Retailer, Supplier};

const SELECT_SUPPLIER: &str =
    "SELECT id, name, contact_person, phone, email, gst_number, city, created_at FROM suppliers";

const SELECT_RETAILER: &str =
    "SELECT id, name, channel, contact_person, phone, email, gst_number, created_at FROM retailers";

// =============================================================================
// Suppliers
// =============================================================================

#[derive(Debug, Clone)]
pub struct SupplierRepository {
    pool: SqlitePool,
}

impl SupplierRepository {
    pub fn new(pool: SqlitePool) -> Self {
        SupplierRepository { pool }
    }

    /// Registers a supplier. Names are unique.
    pub async fn create(&self, input: NewSupplier) -> DbResult<Supplier> {
        let input = input.normalized()?;

        let result = sqlx::query(
            r#"
            INSERT INTO suppliers (name, contact_person, phone, email, gst_number, city, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&input.name)
        .bind(&input.contact_person)
        .bind(&input.phone)
        .bind(&input.email)
        .bind(&input.gst_number)
        .bind(&input.city)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|e| DbError::from(e).or_duplicate("Supplier", "name", input.name.as_str()))?;

        let id = result.last_insert_rowid();
        info!(supplier_id = id, name = %input.name, "Supplier created");

        self.get(id).await
    }

    /// Lists suppliers ordered by name.
    pub async fn list(&self) -> DbResult<Vec<Supplier>> {
        let suppliers = sqlx::query_as::<_, Supplier>(&format!("{SELECT_SUPPLIER} ORDER BY name"))
            .fetch_all(&self.pool)
            .await?;

        debug!(count = suppliers.len(), "Listed suppliers");
        Ok(suppliers)
    }

    pub async fn get(&self, id: i64) -> DbResult<Supplier> {
        let mut conn = self.pool.acquire().await?;
        find_supplier(&mut conn, id)
            .await?
            .ok_or_else(|| DbError::not_found("Supplier", id))
    }

    /// Deletes a supplier. Historical batches keep their name snapshot.
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM suppliers WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Supplier", id));
        }

        info!(supplier_id = id, "Supplier deleted");
        Ok(())
    }
}

pub(crate) async fn find_supplier(conn: &mut SqliteConnection, id: i64) -> DbResult<Option<Supplier>> {
    let supplier = sqlx::query_as::<_, Supplier>(&format!("{SELECT_SUPPLIER} WHERE id = ?1"))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(supplier)
}

// =============================================================================
// Retailers
// =============================================================================

#[derive(Debug, Clone)]
pub struct RetailerRepository {
    pool: SqlitePool,
}

impl RetailerRepository {
    pub fn new(pool: SqlitePool) -> Self {
        RetailerRepository { pool }
    }

    /// Registers a retailer. Names are unique.
    pub async fn create(&self, input: NewRetailer) -> DbResult<Retailer> {
        let input = input.normalized()?;

        let result = sqlx::query(
            r#"
            INSERT INTO retailers (name, channel, contact_person, phone, email, gst_number, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&input.name)
        .bind(&input.channel)
        .bind(&input.contact_person)
        .bind(&input.phone)
        .bind(&input.email)
        .bind(&input.gst_number)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|e| DbError::from(e).or_duplicate("Retailer", "name", input.name.as_str()))?;

        let id = result.last_insert_rowid();
        info!(retailer_id = id, name = %input.name, "Retailer created");

        self.get(id).await
    }

    /// Lists retailers ordered by name.
    pub async fn list(&self) -> DbResult<Vec<Retailer>> {
        let retailers = sqlx::query_as::<_, Retailer>(&format!("{SELECT_RETAILER} ORDER BY name"))
            .fetch_all(&self.pool)
            .await?;

        debug!(count = retailers.len(), "Listed retailers");
        Ok(retailers)
    }

    pub async fn get(&self, id: i64) -> DbResult<Retailer> {
        let mut conn = self.pool.acquire().await?;
        find_retailer(&mut conn, id)
            .await?
            .ok_or_else(|| DbError::not_found("Retailer", id))
    }

    /// Deletes a retailer. Historical sales keep their customer name.
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM retailers WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Retailer", id));
        }

        info!(retailer_id = id, "Retailer deleted");
        Ok(())
    }
}

pub(crate) async fn find_retailer(conn: &mut SqliteConnection, id: i64) -> DbResult<Option<Retailer>> {
    let retailer = sqlx::query_as::<_, Retailer>(&format!("{SELECT_RETAILER} WHERE id = ?1"))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(retailer)
}

// =============================================================================
// Unit Tests
// =============================================================================
