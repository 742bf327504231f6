use crate::domain::lifecycle::Lifecycle;
use crate::domain::order::{NewOrder, Order, OrderStatus};
use crate::domain::pagination::{PageResult, Pagination};
use crate::domain::ports::{CatalogReaderBox, OrderStoreBox};
use crate::error::{FulfillmentError, Result};
use chrono::Utc;

/// Dependencies of an [`OrderEngine`], checked once by [`OrderEngine::from_config`].
#[derive(Default)]
pub struct OrderEngineConfig {
    pub order_store: Option<OrderStoreBox>,
    pub catalog: Option<CatalogReaderBox>,
}

impl OrderEngineConfig {
    pub fn with_order_store(mut self, store: OrderStoreBox) -> Self {
        self.order_store = Some(store);
        self
    }

    pub fn with_catalog(mut self, catalog: CatalogReaderBox) -> Self {
        self.catalog = Some(catalog);
        self
    }
}

/// Creates orders against the catalog and owns the order status machine.
///
/// The catalog is only ever read: creating an order checks stock but does not
/// reserve or decrement it.
pub struct OrderEngine {
    orders: OrderStoreBox,
    catalog: CatalogReaderBox,
}

impl OrderEngine {
    /// Creates a new `OrderEngine` instance.
    ///
    /// # Arguments
    ///
    /// * `orders` - The store for order records.
    /// * `catalog` - Read-only access to products, for pricing and stock checks.
    pub fn new(orders: OrderStoreBox, catalog: CatalogReaderBox) -> Self {
        Self { orders, catalog }
    }

    /// Builds an engine from a config, failing if a store is missing.
    pub fn from_config(config: OrderEngineConfig) -> Result<Self> {
        let orders = config
            .order_store
            .ok_or_else(|| FulfillmentError::Configuration("order store is required".into()))?;
        let catalog = config
            .catalog
            .ok_or_else(|| FulfillmentError::Configuration("catalog is required".into()))?;
        Ok(Self::new(orders, catalog))
    }

    /// Prices and persists a new pending order.
    ///
    /// Nothing is written when the product is unknown or short on stock.
    #[tracing::instrument(skip(self))]
    pub async fn create_order(&self, new: NewOrder) -> Result<Order> {
        if new.id.is_empty() {
            return Err(FulfillmentError::InvalidInput("order id is required".into()));
        }
        if new.user_id.is_empty() {
            return Err(FulfillmentError::InvalidInput("user id is required".into()));
        }
        if new.quantity == 0 {
            return Err(FulfillmentError::InvalidInput(
                "quantity must be greater than 0".into(),
            ));
        }

        let product = self
            .catalog
            .get_product(&new.product_id)
            .await?
            .ok_or_else(|| FulfillmentError::not_found("product", &new.product_id))?;

        if !product.has_stock_for(new.quantity) {
            return Err(FulfillmentError::InsufficientStock {
                product_id: product.id,
                requested: new.quantity,
                available: product.stock,
            });
        }

        let total_amount = product
            .total_for(new.quantity)
            .ok_or_else(|| FulfillmentError::InvalidInput("order total overflows".into()))?;

        let now = Utc::now();
        let order = Order {
            total_amount,
            id: new.id,
            user_id: new.user_id,
            product_id: new.product_id,
            quantity: new.quantity,
            status: OrderStatus::Pending,
            created_at: now,
            updated_at: now,
        };

        self.orders.create(order.clone()).await?;
        metrics::counter!("orders_created_total").increment(1);
        tracing::info!(order_id = %order.id, total = %order.total_amount, "order created");
        Ok(order)
    }

    pub async fn get_order(&self, id: &str) -> Result<Order> {
        self.orders
            .get(id)
            .await?
            .ok_or_else(|| FulfillmentError::not_found("order", id))
    }

    /// Moves an order along the transition table.
    #[tracing::instrument(skip(self))]
    pub async fn update_order_status(&self, id: &str, status: OrderStatus) -> Result<Order> {
        let mut order = self.get_order(id).await?;

        if !order.status.can_transition_to(status) {
            return Err(FulfillmentError::InvalidTransition {
                from: order.status,
                to: status,
                reason: "transition not permitted",
            });
        }

        let previous = order.status;
        order.set_status(status);
        self.orders.update(order.clone()).await?;
        tracing::info!(order_id = %order.id, from = %previous, to = %status, "order status updated");
        Ok(order)
    }

    #[tracing::instrument(skip(self))]
    pub async fn cancel_order(&self, id: &str) -> Result<Order> {
        let mut order = self.get_order(id).await?;

        if order.status != OrderStatus::Pending {
            return Err(FulfillmentError::InvalidTransition {
                from: order.status,
                to: OrderStatus::Cancelled,
                reason: "only pending orders can be cancelled",
            });
        }

        order.set_status(OrderStatus::Cancelled);
        self.orders.update(order.clone()).await?;
        tracing::info!(order_id = %order.id, "order cancelled");
        Ok(order)
    }

    /// Lists orders newest first.
    ///
    /// # Arguments
    ///
    /// * `user_id` - Owner of the orders; empty lists every user's orders.
    /// * `page` - 1-based page number; values below 1 mean the first page.
    /// * `page_size` - Items per page; values below 1 mean 10.
    pub async fn list_orders_by_user(
        &self,
        user_id: &str,
        page: i64,
        page_size: i64,
    ) -> Result<PageResult<Order>> {
        let pagination = Pagination::new(page, page_size);
        self.orders
            .list_by_user(user_id, pagination.offset(), pagination.limit())
            .await
    }
}
