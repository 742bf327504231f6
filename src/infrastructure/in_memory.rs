use crate::domain::order::Order;
use crate::domain::pagination::{PageResult, paginate};
use crate::domain::payment::Payment;
use crate::domain::ports::{CatalogReader, CatalogStore, OrderStore, PaymentStore};
use crate::domain::product::Product;
use crate::error::{FulfillmentError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A thread-safe in-memory product catalog.
///
/// Clones share the same map, so a catalog can be loaded through one handle
/// and read by the order engine through another.
#[derive(Default, Clone)]
pub struct InMemoryCatalog {
    products: Arc<RwLock<HashMap<String, Product>>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_products(products: impl IntoIterator<Item = Product>) -> Self {
        let map = products.into_iter().map(|p| (p.id.clone(), p)).collect();
        Self {
            products: Arc::new(RwLock::new(map)),
        }
    }
}

#[async_trait]
impl CatalogReader for InMemoryCatalog {
    async fn get_product(&self, id: &str) -> Result<Option<Product>> {
        let products = self.products.read().await;
        Ok(products.get(id).cloned())
    }
}

#[async_trait]
impl CatalogStore for InMemoryCatalog {
    async fn put_product(&self, product: Product) -> Result<()> {
        let mut products = self.products.write().await;
        products.insert(product.id.clone(), product);
        Ok(())
    }
}

/// Records keyed by id, remembering insertion order so records created within
/// the same clock tick still list newest first.
struct Table<T> {
    rows: HashMap<String, (u64, T)>,
    next_seq: u64,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: HashMap::new(),
            next_seq: 0,
        }
    }
}

impl<T: Clone> Table<T> {
    fn insert(&mut self, entity: &'static str, id: &str, row: T) -> Result<()> {
        if self.rows.contains_key(id) {
            return Err(FulfillmentError::InvalidInput(format!(
                "{entity} {id} already exists"
            )));
        }
        self.next_seq += 1;
        self.rows.insert(id.to_string(), (self.next_seq, row));
        Ok(())
    }

    fn replace(&mut self, entity: &'static str, id: &str, row: T) -> Result<()> {
        match self.rows.get_mut(id) {
            Some(slot) => {
                slot.1 = row;
                Ok(())
            }
            None => Err(FulfillmentError::not_found(entity, id)),
        }
    }

    fn get(&self, id: &str) -> Option<T> {
        self.rows.get(id).map(|(_, row)| row.clone())
    }

    fn newest_first<F, K>(&self, filter: F, created_at: K) -> Vec<T>
    where
        F: Fn(&T) -> bool,
        K: Fn(&T) -> DateTime<Utc>,
    {
        let mut matching: Vec<&(u64, T)> = self.rows.values().filter(|(_, r)| filter(r)).collect();
        matching.sort_by(|(seq_a, a), (seq_b, b)| {
            created_at(b)
                .cmp(&created_at(a))
                .then_with(|| seq_b.cmp(seq_a))
        });
        matching.into_iter().map(|(_, row)| row.clone()).collect()
    }
}

/// A thread-safe in-memory order store.
///
/// Ideal for testing or single-run replays where persistence is not required.
#[derive(Default, Clone)]
pub struct InMemoryOrderStore {
    orders: Arc<RwLock<Table<Order>>>,
}

impl InMemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.orders.read().await.rows.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn create(&self, order: Order) -> Result<()> {
        let mut orders = self.orders.write().await;
        let id = order.id.clone();
        orders.insert("order", &id, order)
    }

    async fn get(&self, id: &str) -> Result<Option<Order>> {
        let orders = self.orders.read().await;
        Ok(orders.get(id))
    }

    async fn update(&self, order: Order) -> Result<()> {
        let mut orders = self.orders.write().await;
        let id = order.id.clone();
        orders.replace("order", &id, order)
    }

    async fn list_by_user(
        &self,
        user_id: &str,
        offset: usize,
        limit: usize,
    ) -> Result<PageResult<Order>> {
        let orders = self.orders.read().await;
        let matching = orders.newest_first(
            |o| user_id.is_empty() || o.user_id == user_id,
            |o| o.created_at,
        );
        Ok(paginate(matching, offset, limit))
    }
}

/// A thread-safe in-memory payment store.
#[derive(Default, Clone)]
pub struct InMemoryPaymentStore {
    payments: Arc<RwLock<Table<Payment>>>,
}

impl InMemoryPaymentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.payments.read().await.rows.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl PaymentStore for InMemoryPaymentStore {
    async fn create(&self, payment: Payment) -> Result<()> {
        let mut payments = self.payments.write().await;
        let id = payment.id.clone();
        payments.insert("payment", &id, payment)
    }

    async fn get(&self, id: &str) -> Result<Option<Payment>> {
        let payments = self.payments.read().await;
        Ok(payments.get(id))
    }

    async fn update(&self, payment: Payment) -> Result<()> {
        let mut payments = self.payments.write().await;
        let id = payment.id.clone();
        payments.replace("payment", &id, payment)
    }

    async fn list(
        &self,
        user_id: &str,
        order_id: &str,
        offset: usize,
        limit: usize,
    ) -> Result<PageResult<Payment>> {
        let payments = self.payments.read().await;
        let matching = payments.newest_first(
            |p| {
                (user_id.is_empty() || p.user_id == user_id)
                    && (order_id.is_empty() || p.order_id == order_id)
            },
            |p| p.created_at,
        );
        Ok(paginate(matching, offset, limit))
    }
}
