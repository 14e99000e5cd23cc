//! # Product Repository
//!
//! Database operations for the catalog.
//!
//! Products are identity rows only. Rename is allowed at any time because
//! batches and sales refer to the product by id; there is no delete.

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use sweetstock_core::{NewProduct, Product};

const SELECT_PRODUCT: &str = "SELECT id, name, category, brand, created_at FROM products";

/// Repository for product database operations.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Adds a product to the catalog.
    ///
    /// Names are not unique; two "Kaju Katli" rows from different brands
    /// are legitimate.
    pub async fn create(&self, input: NewProduct) -> DbResult<Product> {
        let input = input.normalized()?;

        let result = sqlx::query(
            "INSERT INTO products (name, category, brand, created_at) VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(&input.name)
        .bind(&input.category)
        .bind(&input.brand)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        info!(product_id = id, name = %input.name, "Product created");

        self.get(id).await
    }

    /// Lists every product ordered by name.
    pub async fn list(&self) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(&format!("{SELECT_PRODUCT} ORDER BY name, id"))
            .fetch_all(&self.pool)
            .await?;

        debug!(count = products.len(), "Listed products");
        Ok(products)
    }

    /// Gets a product by ID.
    pub async fn get(&self, id: i64) -> DbResult<Product> {
        sqlx::query_as::<_, Product>(&format!("{SELECT_PRODUCT} WHERE id = ?1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("Product", id))
    }

    /// Renames / re-labels a product.
    pub async fn update(&self, id: i64, input: NewProduct) -> DbResult<Product> {
        let input = input.normalized()?;

        let result = sqlx::query(
            "UPDATE products SET name = ?2, category = ?3, brand = ?4 WHERE id = ?1",
        )
        .bind(id)
        .bind(&input.name)
        .bind(&input.category)
        .bind(&input.brand)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        info!(product_id = id, name = %input.name, "Product updated");
        self.get(id).await
    }

    /// Counts catalog products.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Fails with NotFound unless `id` names a product. Usable inside a
/// transaction.
pub(crate) async fn ensure_product(conn: &mut SqliteConnection, id: i64) -> DbResult<()> {
    let found: Option<i64> = sqlx::query_scalar("SELECT id FROM products WHERE id = ?1")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

    found.map(|_| ()).ok_or_else(|| DbError::not_found("Product", id))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use sweetstock_core::{CoreError, ValidationError};

    async fn setup() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn named(name: &str) -> NewProduct {
        NewProduct {
            name: name.to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let db = setup().await;
        let repo = db.products();

        let created = repo
            .create(NewProduct {
                name: " Kaju Katli ".to_string(),
                category: Some("Barfi".to_string()),
                brand: Some(" ".to_string()),
            })
            .await
            .unwrap();

        assert_eq!(created.name, "Kaju Katli");
        assert_eq!(created.category.as_deref(), Some("Barfi"));
        assert_eq!(created.brand, None);
        assert_eq!(repo.get(created.id).await.unwrap(), created);
    }

    #[tokio::test]
    async fn test_list_orders_by_name_and_allows_duplicates() {
        let db = setup().await;
        let repo = db.products();

        repo.create(named("Rasgulla")).await.unwrap();
        repo.create(named("Barfi")).await.unwrap();
        repo.create(named("Barfi")).await.unwrap();

        let names: Vec<String> = repo.list().await.unwrap().into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["Barfi", "Barfi", "Rasgulla"]);
        assert_eq!(repo.count().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_blank_name_is_validation_error() {
        let db = setup().await;
        let err = db.products().create(named("   ")).await.unwrap_err();
        assert!(matches!(
            err,
            DbError::Domain(CoreError::Validation(ValidationError::Required { .. }))
        ));
    }

    #[tokio::test]
    async fn test_update_renames() {
        let db = setup().await;
        let repo = db.products();
        let p = repo.create(named("Ladoo")).await.unwrap();

        let renamed = repo.update(p.id, named("Motichoor Ladoo")).await.unwrap();
        assert_eq!(renamed.id, p.id);
        assert_eq!(renamed.name, "Motichoor Ladoo");
        assert_eq!(renamed.created_at, p.created_at);

        assert!(matches!(
            repo.update(999, named("Ghost")).await,
            Err(DbError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_get_missing() {
        let db = setup().await;
        match db.products().get(42).await {
            Err(DbError::NotFound { entity, id }) => {
                assert_eq!(entity, "Product");
                assert_eq!(id, "42");
            }
            other => panic!("expected NotFound, got {:?}", other),
        }
    }
}
