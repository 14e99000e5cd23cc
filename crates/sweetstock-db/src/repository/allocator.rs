//! # FIFO Allocator (persistence side)
//!
//! Loads a product's live batches inside the caller's transaction, asks
//! [`sweetstock_core::fifo::plan_allocation`] for a plan, then applies it.
//!
//! ## Guarded Decrement
//! ```text
//! UPDATE inventory_batches
//!    SET quantity_remaining = quantity_remaining - :take
//!  WHERE id = :batch AND quantity_remaining >= :take
//!
//! rows_affected == 1  → draw applied
//! rows_affected == 0  → someone else drew first → Conflict, tx rolls back
//! ```
//!
//! The per-product lock already serializes sales, so the guard only fires
//! if a writer bypassed the lock. `quantity_remaining` can never go
//! negative either way.

use sqlx::SqliteConnection;
use tracing::{debug, warn};

use crate::error::{DbError, DbResult};
use sweetstock_core::fifo::{plan_allocation, FifoCandidate};
use sweetstock_core::{Allocation, Money};

#[derive(Debug, sqlx::FromRow)]
struct CandidateRow {
    id: i64,
    expiry_date: chrono::NaiveDate,
    purchased_at: chrono::DateTime<chrono::Utc>,
    quantity_remaining: i64,
    unit_cost_paise: i64,
}

/// Live batches of `product_id`, FIFO-ordered.
pub(crate) async fn fifo_candidates(
    conn: &mut SqliteConnection,
    product_id: i64,
) -> DbResult<Vec<FifoCandidate>> {
    let rows = sqlx::query_as::<_, CandidateRow>(
        r#"
        SELECT id, expiry_date, purchased_at, quantity_remaining, unit_cost_paise
        FROM inventory_batches
        WHERE product_id = ?1 AND quantity_remaining > 0
        ORDER BY expiry_date, purchased_at, id
        "#,
    )
    .bind(product_id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(rows
        .into_iter()
        .map(|r| FifoCandidate {
            batch_id: r.id,
            expiry_date: r.expiry_date,
            purchased_at: r.purchased_at,
            quantity_remaining: r.quantity_remaining,
            unit_cost: Money::from_paise(r.unit_cost_paise),
        })
        .collect())
}

/// Draws `quantity` units of `product_id` from its batches.
///
/// Must run inside the sale's transaction. On any error the caller drops
/// the transaction and no batch is changed.
pub(crate) async fn allocate(
    conn: &mut SqliteConnection,
    product_id: i64,
    quantity: i64,
) -> DbResult<Vec<Allocation>> {
    let candidates = fifo_candidates(conn, product_id).await?;
    let plan = plan_allocation(product_id, quantity, candidates)?;

    for draw in &plan {
        let result = sqlx::query(
            r#"
            UPDATE inventory_batches
            SET quantity_remaining = quantity_remaining - ?1
            WHERE id = ?2 AND quantity_remaining >= ?1
            "#,
        )
        .bind(draw.quantity)
        .bind(draw.batch_id)
        .execute(&mut *conn)
        .await?;

        if result.rows_affected() != 1 {
            warn!(product_id, batch_id = draw.batch_id, "Batch changed under allocation");
            return Err(DbError::conflict(
                format!("batch {}", draw.batch_id),
                "stock changed while allocating, retry the sale",
            ));
        }
    }

    debug!(product_id, quantity, draws = plan.len(), "FIFO allocation applied");
    Ok(plan)
}

// =============================================================================
// Unit Tests
// =============================================================================
