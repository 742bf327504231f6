use super::order::Order;
use super::pagination::PageResult;
use super::payment::Payment;
use super::product::Product;
use crate::error::Result;
use async_trait::async_trait;

#[async_trait]
pub trait CatalogReader: Send + Sync {
    async fn get_product(&self, id: &str) -> Result<Option<Product>>;
}

/// Catalog maintenance, used by whatever loads products. The engines never need it.
#[async_trait]
pub trait CatalogStore: CatalogReader {
    async fn put_product(&self, product: Product) -> Result<()>;
}

#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Inserts a new order. Fails if the id is already taken.
    async fn create(&self, order: Order) -> Result<()>;
    async fn get(&self, id: &str) -> Result<Option<Order>>;
    /// Replaces an existing order. Fails with `NotFound` if it was never created.
    async fn update(&self, order: Order) -> Result<()>;
    /// Orders of `user_id` (all orders when empty), newest first.
    async fn list_by_user(&self, user_id: &str, offset: usize, limit: usize)
    -> Result<PageResult<Order>>;
}

#[async_trait]
pub trait PaymentStore: Send + Sync {
    async fn create(&self, payment: Payment) -> Result<()>;
    async fn get(&self, id: &str) -> Result<Option<Payment>>;
    async fn update(&self, payment: Payment) -> Result<()>;
    /// Payments matching every non-empty filter, newest first.
    async fn list(
        &self,
        user_id: &str,
        order_id: &str,
        offset: usize,
        limit: usize,
    ) -> Result<PageResult<Payment>>;
}

pub type CatalogReaderBox = Box<dyn CatalogReader>;
pub type OrderStoreBox = Box<dyn OrderStore>;
pub type PaymentStoreBox = Box<dyn PaymentStore>;
