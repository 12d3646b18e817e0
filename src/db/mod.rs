mod memory;
mod postgres;

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::error::{AppResult, ValidationError};
use crate::models::{Category, Product};

pub use memory::MemoryProductStore;
pub use postgres::PgProductStore;

/// Persistence for products. Handlers receive it through `AppState` as an
/// `Arc<dyn ProductStore>`; every method maps onto a single statement.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Insert a transient product, then refresh it from the stored row
    /// (which carries the new id).
    async fn create(&self, product: &mut Product) -> AppResult<()>;

    /// Overwrite the stored row with the product's current fields, then
    /// refresh `product` from what was stored.
    /// Fails with a validation error when the product has no id.
    async fn update(&self, product: &mut Product) -> AppResult<()>;

    /// Remove the row for the product's id. Absent rows are ignored.
    async fn delete(&self, product: &Product) -> AppResult<()>;

    async fn find(&self, id: i32) -> AppResult<Option<Product>>;

    async fn all(&self) -> AppResult<Vec<Product>>;

    async fn find_by_name(&self, name: &str) -> AppResult<Vec<Product>>;

    async fn find_by_category(&self, category: Category) -> AppResult<Vec<Product>>;

    async fn find_by_availability(&self, available: bool) -> AppResult<Vec<Product>>;

    async fn find_by_price(&self, price: Decimal) -> AppResult<Vec<Product>>;

    /// Release underlying resources at shutdown.
    async fn close(&self) {}
}

fn require_id(product: &Product) -> AppResult<i32> {
    product
        .id
        .ok_or_else(|| ValidationError::new("Update called with empty ID field").into())
}
