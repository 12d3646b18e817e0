use std::collections::BTreeMap;

use async_trait::async_trait;
use rust_decimal::Decimal;
use tokio::sync::RwLock;
use tracing::{debug, info};

use super::{require_id, ProductStore};
use crate::error::{AppError, AppResult};
use crate::models::{Category, Product};

#[derive(Debug, Default)]
struct Table {
    next_id: i32,
    rows: BTreeMap<i32, Product>,
}

/// Process-local store used when no database is configured, and by tests.
/// Rows iterate in id order, mirroring the Postgres `ORDER BY id`.
#[derive(Debug, Default)]
pub struct MemoryProductStore {
    table: RwLock<Table>,
}

impl MemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }

    async fn filter(&self, pred: impl Fn(&Product) -> bool + Send) -> Vec<Product> {
        self.table
            .read()
            .await
            .rows
            .values()
            .filter(|p| pred(*p))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl ProductStore for MemoryProductStore {
    async fn create(&self, product: &mut Product) -> AppResult<()> {
        let mut table = self.table.write().await;
        table.next_id += 1;
        let id = table.next_id;
        product.id = Some(id);
        table.rows.insert(id, product.clone());
        info!(id, name = %product.name, "Created product");
        Ok(())
    }

    async fn update(&self, product: &mut Product) -> AppResult<()> {
        let id = require_id(product)?;
        let mut table = self.table.write().await;
        match table.rows.get_mut(&id) {
            Some(row) => {
                *row = product.clone();
                info!(id, "Updated product");
                Ok(())
            }
            None => Err(AppError::NotFound(format!(
                "Product with id: {id} does not exist"
            ))),
        }
    }

    async fn delete(&self, product: &Product) -> AppResult<()> {
        if let Some(id) = product.id {
            let removed = self.table.write().await.rows.remove(&id).is_some();
            debug!(id, removed, "Deleted product");
        }
        Ok(())
    }

    async fn find(&self, id: i32) -> AppResult<Option<Product>> {
        Ok(self.table.read().await.rows.get(&id).cloned())
    }

    async fn all(&self) -> AppResult<Vec<Product>> {
        Ok(self.filter(|_| true).await)
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Vec<Product>> {
        Ok(self.filter(|p| p.name == name).await)
    }

    async fn find_by_category(&self, category: Category) -> AppResult<Vec<Product>> {
        Ok(self.filter(|p| p.category == category).await)
    }

    async fn find_by_availability(&self, available: bool) -> AppResult<Vec<Product>> {
        Ok(self.filter(|p| p.available == available).await)
    }

    async fn find_by_price(&self, price: Decimal) -> AppResult<Vec<Product>> {
        Ok(self.filter(|p| p.price == price).await)
    }
}
