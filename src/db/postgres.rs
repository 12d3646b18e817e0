use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::{debug, info};

use super::{require_id, ProductStore};
use crate::error::{AppError, AppResult};
use crate::models::{Category, Product};

const COLUMNS: &str = "id, name, description, price, available, category";

/// PostgreSQL-backed store over the `products` table.
#[derive(Debug, Clone)]
pub struct PgProductStore {
    pool: PgPool,
}

impl PgProductStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Apply pending migrations (initial table creation).
    pub async fn migrate(&self) -> anyhow::Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl ProductStore for PgProductStore {
    async fn create(&self, product: &mut Product) -> AppResult<()> {
        let stored = sqlx::query_as::<_, Product>(&format!(
            r#"
            INSERT INTO products (name, description, price, available, category)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price)
        .bind(product.available)
        .bind(product.category)
        .fetch_one(&self.pool)
        .await?;

        *product = stored;
        info!(id = ?product.id, name = %product.name, "Created product");
        Ok(())
    }

    async fn update(&self, product: &mut Product) -> AppResult<()> {
        let id = require_id(product)?;
        let stored = sqlx::query_as::<_, Product>(&format!(
            r#"
            UPDATE products
            SET name        = $1,
                description = $2,
                price       = $3,
                available   = $4,
                category    = $5
            WHERE id = $6
            RETURNING {COLUMNS}
            "#
        ))
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price)
        .bind(product.available)
        .bind(product.category)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Product with id: {id} does not exist")))?;

        *product = stored;
        info!(id, "Updated product");
        Ok(())
    }

    async fn delete(&self, product: &Product) -> AppResult<()> {
        let Some(id) = product.id else {
            return Ok(());
        };
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        debug!(id, removed = result.rows_affected(), "Deleted product");
        Ok(())
    }

    async fn find(&self, id: i32) -> AppResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {COLUMNS} FROM products WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(product)
    }

    async fn all(&self) -> AppResult<Vec<Product>> {
        let products =
            sqlx::query_as::<_, Product>(&format!("SELECT {COLUMNS} FROM products ORDER BY id"))
                .fetch_all(&self.pool)
                .await?;
        Ok(products)
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {COLUMNS} FROM products WHERE name = $1 ORDER BY id"
        ))
        .bind(name)
        .fetch_all(&self.pool)
        .await?;
        Ok(products)
    }

    async fn find_by_category(&self, category: Category) -> AppResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {COLUMNS} FROM products WHERE category = $1 ORDER BY id"
        ))
        .bind(category)
        .fetch_all(&self.pool)
        .await?;
        Ok(products)
    }

    async fn find_by_availability(&self, available: bool) -> AppResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {COLUMNS} FROM products WHERE available = $1 ORDER BY id"
        ))
        .bind(available)
        .fetch_all(&self.pool)
        .await?;
        Ok(products)
    }

    async fn find_by_price(&self, price: Decimal) -> AppResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {COLUMNS} FROM products WHERE price = $1 ORDER BY id"
        ))
        .bind(price)
        .fetch_all(&self.pool)
        .await?;
        Ok(products)
    }

    async fn close(&self) {
        self.pool.close().await;
        info!("Database connection pool closed.");
    }
}
