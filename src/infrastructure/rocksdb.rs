use crate::domain::order::Order;
use crate::domain::pagination::{PageResult, paginate};
use crate::domain::payment::Payment;
use crate::domain::ports::{CatalogReader, CatalogStore, OrderStore, PaymentStore};
use crate::domain::product::Product;
use crate::error::{FulfillmentError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rocksdb::{ColumnFamily, ColumnFamilyDescriptor, DB, IteratorMode, Options};
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Column Family for catalog products.
pub const CF_PRODUCTS: &str = "products";
/// Column Family for orders.
pub const CF_ORDERS: &str = "orders";
/// Column Family for payments.
pub const CF_PAYMENTS: &str = "payments";

impl From<rocksdb::Error> for FulfillmentError {
    fn from(e: rocksdb::Error) -> Self {
        FulfillmentError::Storage(Box::new(e))
    }
}

/// An order or payment as persisted, tagged with its insertion sequence so
/// listings break `created_at` ties the same way the in-memory stores do.
#[derive(Serialize, Deserialize)]
struct Row<T> {
    seq: u64,
    record: T,
}

/// A persistent store implementation using RocksDB.
///
/// Products, orders and payments live in separate Column Families, keyed by
/// their string id and stored as JSON.
///
/// This struct is thread-safe (`Clone` shares the underlying `Arc<DB>`), so a
/// single opened database can back every port at once.
#[derive(Clone)]
pub struct RocksDBStore {
    db: Arc<DB>,
    last_seq: Arc<AtomicU64>,
}

impl RocksDBStore {
    /// Opens or creates a RocksDB instance at the specified path, creating the
    /// column families on first use.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let families = [CF_PRODUCTS, CF_ORDERS, CF_PAYMENTS]
            .into_iter()
            .map(|name| ColumnFamilyDescriptor::new(name, Options::default()));

        let db = DB::open_cf_descriptors(&opts, path, families)?;
        let store = Self {
            db: Arc::new(db),
            last_seq: Arc::new(AtomicU64::new(0)),
        };

        // Resume numbering after the rows already on disk
        let mut last = 0;
        for family in [CF_ORDERS, CF_PAYMENTS] {
            for row in store.scan::<Row<IgnoredAny>>(family)? {
                last = last.max(row.seq);
            }
        }
        store.last_seq.store(last, Ordering::SeqCst);

        Ok(store)
    }

    fn cf(&self, name: &str) -> Result<&ColumnFamily> {
        self.db.cf_handle(name).ok_or_else(|| {
            FulfillmentError::Storage(Box::new(std::io::Error::other(format!(
                "{name} column family not found"
            ))))
        })
    }

    fn put<T: Serialize>(&self, family: &str, id: &str, value: &T) -> Result<()> {
        let cf = self.cf(family)?;
        let bytes = serde_json::to_vec(value).map_err(|e| FulfillmentError::Storage(Box::new(e)))?;
        self.db.put_cf(cf, id.as_bytes(), bytes)?;
        Ok(())
    }

    fn load<T: DeserializeOwned>(&self, family: &str, id: &str) -> Result<Option<T>> {
        let cf = self.cf(family)?;
        match self.db.get_cf(cf, id.as_bytes())? {
            Some(bytes) => {
                let value =
                    serde_json::from_slice(&bytes).map_err(|e| FulfillmentError::Storage(Box::new(e)))?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    fn contains(&self, family: &str, id: &str) -> Result<bool> {
        let cf = self.cf(family)?;
        Ok(self.db.get_pinned_cf(cf, id.as_bytes())?.is_some())
    }

    fn scan<T: DeserializeOwned>(&self, family: &str) -> Result<Vec<T>> {
        let cf = self.cf(family)?;
        let mut rows = Vec::new();
        for item in self.db.iterator_cf(cf, IteratorMode::Start) {
            let (_key, value) = item?;
            let row = serde_json::from_slice(&value).map_err(|e| FulfillmentError::Storage(Box::new(e)))?;
            rows.push(row);
        }
        Ok(rows)
    }

    fn insert_row<T: Serialize>(
        &self,
        family: &str,
        entity: &str,
        id: &str,
        record: &T,
    ) -> Result<()> {
        if self.contains(family, id)? {
            return Err(FulfillmentError::InvalidInput(format!(
                "{entity} {id} already exists"
            )));
        }
        let seq = self.last_seq.fetch_add(1, Ordering::SeqCst) + 1;
        self.put(family, id, &Row { seq, record })
    }

    fn replace_row<T: Serialize>(
        &self,
        family: &str,
        entity: &'static str,
        id: &str,
        record: &T,
    ) -> Result<()> {
        let Some(existing) = self.load::<Row<IgnoredAny>>(family, id)? else {
            return Err(FulfillmentError::not_found(entity, id));
        };
        self.put(
            family,
            id,
            &Row {
                seq: existing.seq,
                record,
            },
        )
    }

    fn load_record<T: DeserializeOwned>(&self, family: &str, id: &str) -> Result<Option<T>> {
        Ok(self.load::<Row<T>>(family, id)?.map(|row| row.record))
    }

    fn newest_first<T, F, K>(&self, family: &str, filter: F, created_at: K) -> Result<Vec<T>>
    where
        T: DeserializeOwned,
        F: Fn(&T) -> bool,
        K: Fn(&T) -> DateTime<Utc>,
    {
        let mut rows: Vec<Row<T>> = self
            .scan::<Row<T>>(family)?
            .into_iter()
            .filter(|row| filter(&row.record))
            .collect();
        rows.sort_by(|a, b| {
            created_at(&b.record)
                .cmp(&created_at(&a.record))
                .then_with(|| b.seq.cmp(&a.seq))
        });
        Ok(rows.into_iter().map(|row| row.record).collect())
    }
}

#[async_trait]
impl CatalogReader for RocksDBStore {
    async fn get_product(&self, id: &str) -> Result<Option<Product>> {
        self.load(CF_PRODUCTS, id)
    }
}

#[async_trait]
impl CatalogStore for RocksDBStore {
    async fn put_product(&self, product: Product) -> Result<()> {
        self.put(CF_PRODUCTS, &product.id, &product)
    }
}

#[async_trait]
impl OrderStore for RocksDBStore {
    async fn create(&self, order: Order) -> Result<()> {
        self.insert_row(CF_ORDERS, "order", &order.id, &order)
    }

    async fn get(&self, id: &str) -> Result<Option<Order>> {
        self.load_record(CF_ORDERS, id)
    }

    async fn update(&self, order: Order) -> Result<()> {
        self.replace_row(CF_ORDERS, "order", &order.id, &order)
    }

    async fn list_by_user(
        &self,
        user_id: &str,
        offset: usize,
        limit: usize,
    ) -> Result<PageResult<Order>> {
        let orders = self.newest_first(
            CF_ORDERS,
            |o: &Order| user_id.is_empty() || o.user_id == user_id,
            |o: &Order| o.created_at,
        )?;
        Ok(paginate(orders, offset, limit))
    }
}

#[async_trait]
impl PaymentStore for RocksDBStore {
    async fn create(&self, payment: Payment) -> Result<()> {
        self.insert_row(CF_PAYMENTS, "payment", &payment.id, &payment)
    }

    async fn get(&self, id: &str) -> Result<Option<Payment>> {
        self.load_record(CF_PAYMENTS, id)
    }

    async fn update(&self, payment: Payment) -> Result<()> {
        self.replace_row(CF_PAYMENTS, "payment", &payment.id, &payment)
    }

    async fn list(
        &self,
        user_id: &str,
        order_id: &str,
        offset: usize,
        limit: usize,
    ) -> Result<PageResult<Payment>> {
        let payments = self.newest_first(
            CF_PAYMENTS,
            |p: &Payment| {
                (user_id.is_empty() || p.user_id == user_id)
                    && (order_id.is_empty() || p.order_id == order_id)
            },
            |p: &Payment| p.created_at,
        )?;
        Ok(paginate(payments, offset, limit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::order::OrderStatus;
    use chrono::Utc;
    use rust_decimal_macros::dec;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_rocksdb_open_cf() {
        let dir = tempdir().unwrap();
        let store = RocksDBStore::open(dir.path()).expect("Failed to open RocksDB");

        assert!(store.db.cf_handle(CF_PRODUCTS).is_some());
        assert!(store.db.cf_handle(CF_ORDERS).is_some());
        assert!(store.db.cf_handle(CF_PAYMENTS).is_some());
    }

    #[tokio::test]
    async fn test_rocksdb_catalog() {
        let dir = tempdir().unwrap();
        let store = RocksDBStore::open(dir.path()).unwrap();

        let product = Product::new("p-1", dec!(10.0), 5);
        store.put_product(product.clone()).await.unwrap();

        assert_eq!(store.get_product("p-1").await.unwrap().unwrap(), product);
        assert!(store.get_product("p-2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_rocksdb_order_store() {
        let dir = tempdir().unwrap();
        let store = RocksDBStore::open(dir.path()).unwrap();

        let now = Utc::now();
        let mut order = Order {
            id: "o-1".to_string(),
            user_id: "u-1".to_string(),
            product_id: "p-1".to_string(),
            quantity: 2,
            total_amount: dec!(20.0),
            status: OrderStatus::Pending,
            created_at: now,
            updated_at: now,
        };

        OrderStore::create(&store, order.clone()).await.unwrap();
        assert!(OrderStore::create(&store, order.clone()).await.is_err());

        order.status = OrderStatus::Paid;
        OrderStore::update(&store, order.clone()).await.unwrap();

        let retrieved = OrderStore::get(&store, "o-1").await.unwrap().unwrap();
        assert_eq!(retrieved, order);

        let page = store.list_by_user("u-1", 0, 10).await.unwrap();
        assert_eq!(page.total, 1);
        assert!(store.list_by_user("u-2", 0, 10).await.unwrap().items.is_empty());
    }

    fn order_at(id: &str, created_at: chrono::DateTime<Utc>) -> Order {
        Order {
            id: id.to_string(),
            user_id: "u-1".to_string(),
            product_id: "p-1".to_string(),
            quantity: 1,
            total_amount: dec!(1.0),
            status: OrderStatus::Pending,
            created_at,
            updated_at: created_at,
        }
    }

    #[tokio::test]
    async fn test_rocksdb_ties_list_in_insertion_order() {
        let dir = tempdir().unwrap();
        let now = Utc::now();

        {
            let store = RocksDBStore::open(dir.path()).unwrap();
            OrderStore::create(&store, order_at("o-b", now)).await.unwrap();
            OrderStore::create(&store, order_at("o-a", now)).await.unwrap();

            // An update keeps the original position
            let mut first = order_at("o-b", now);
            first.status = OrderStatus::Cancelled;
            OrderStore::update(&store, first).await.unwrap();

            let ids: Vec<String> = store
                .list_by_user("u-1", 0, 10)
                .await
                .unwrap()
                .items
                .into_iter()
                .map(|o| o.id)
                .collect();
            assert_eq!(ids, ["o-a", "o-b"]);
        }

        // Numbering resumes after a reopen
        let store = RocksDBStore::open(dir.path()).unwrap();
        OrderStore::create(&store, order_at("o-0", now)).await.unwrap();
        let ids: Vec<String> = store
            .list_by_user("u-1", 0, 10)
            .await
            .unwrap()
            .items
            .into_iter()
            .map(|o| o.id)
            .collect();
        assert_eq!(ids, ["o-0", "o-a", "o-b"]);
    }
}
