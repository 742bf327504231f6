use crate::domain::lifecycle::Lifecycle;
use crate::domain::order::OrderStatus;
use crate::domain::pagination::{PageResult, Pagination};
use crate::domain::payment::{
    CreatedPayment, NewPayment, OrderPromotion, Payment, PaymentStatus, Settlement,
};
use crate::domain::ports::{OrderStoreBox, PaymentStoreBox};
use crate::error::{FulfillmentError, Result};
use chrono::Utc;
use rust_decimal::Decimal;

pub const DEFAULT_GATEWAY_BASE_URL: &str = "https://pay.example.com";

/// Dependencies and settings of a [`PaymentEngine`].
pub struct PaymentEngineConfig {
    pub payment_store: Option<PaymentStoreBox>,
    pub order_store: Option<OrderStoreBox>,
    /// Prefix of the redirect locators handed back by `create_payment`.
    pub gateway_base_url: String,
}

impl Default for PaymentEngineConfig {
    fn default() -> Self {
        Self {
            payment_store: None,
            order_store: None,
            gateway_base_url: DEFAULT_GATEWAY_BASE_URL.to_string(),
        }
    }
}

impl PaymentEngineConfig {
    pub fn with_payment_store(mut self, store: PaymentStoreBox) -> Self {
        self.payment_store = Some(store);
        self
    }

    pub fn with_order_store(mut self, store: OrderStoreBox) -> Self {
        self.order_store = Some(store);
        self
    }

    pub fn with_gateway_base_url(mut self, url: impl Into<String>) -> Self {
        self.gateway_base_url = url.into();
        self
    }
}

/// Owns the payment status machine.
///
/// The order store is read to validate new payments and written for one
/// thing only: promoting an order to `paid` after a successful settlement.
pub struct PaymentEngine {
    payments: PaymentStoreBox,
    orders: OrderStoreBox,
    gateway_base_url: String,
}

impl PaymentEngine {
    /// Creates a new `PaymentEngine` that builds redirects against
    /// [`DEFAULT_GATEWAY_BASE_URL`].
    ///
    /// # Arguments
    ///
    /// * `payments` - The store for payment records.
    /// * `orders` - The order store, read to validate payments and written to promote orders.
    pub fn new(payments: PaymentStoreBox, orders: OrderStoreBox) -> Self {
        Self {
            payments,
            orders,
            gateway_base_url: DEFAULT_GATEWAY_BASE_URL.to_string(),
        }
    }

    /// Builds an engine from a config, failing if a store is missing or the
    /// gateway URL is blank.
    pub fn from_config(config: PaymentEngineConfig) -> Result<Self> {
        let payments = config
            .payment_store
            .ok_or_else(|| FulfillmentError::Configuration("payment store is required".into()))?;
        let orders = config
            .order_store
            .ok_or_else(|| FulfillmentError::Configuration("order store is required".into()))?;
        let gateway_base_url = config.gateway_base_url.trim_end_matches('/').to_string();
        if gateway_base_url.is_empty() {
            return Err(FulfillmentError::Configuration(
                "gateway base url must not be empty".into(),
            ));
        }
        Ok(Self {
            payments,
            orders,
            gateway_base_url,
        })
    }

    /// Records a pending payment for a pending order and returns where to send the payer.
    #[tracing::instrument(skip(self))]
    pub async fn create_payment(&self, new: NewPayment) -> Result<CreatedPayment> {
        if new.id.is_empty() {
            return Err(FulfillmentError::InvalidInput("payment id is required".into()));
        }
        if new.amount <= Decimal::ZERO {
            return Err(FulfillmentError::InvalidInput(
                "amount must be greater than 0".into(),
            ));
        }

        let order = self
            .orders
            .get(&new.order_id)
            .await?
            .ok_or_else(|| FulfillmentError::not_found("order", &new.order_id))?;

        if new.amount != order.total_amount {
            return Err(FulfillmentError::AmountMismatch {
                amount: new.amount,
                expected: order.total_amount,
            });
        }
        if order.status != OrderStatus::Pending {
            return Err(FulfillmentError::InvalidState(format!(
                "order {} is not in pending status",
                order.id
            )));
        }

        let now = Utc::now();
        let payment = Payment {
            id: new.id,
            order_id: new.order_id,
            user_id: new.user_id,
            amount: new.amount,
            method: new.method,
            status: PaymentStatus::Pending,
            transaction_id: String::new(),
            paid_at: None,
            refund_reason: None,
            created_at: now,
            updated_at: now,
        };
        self.payments.create(payment.clone()).await?;

        let redirect_url = self.redirect_url(&payment);
        metrics::counter!("payments_created_total").increment(1);
        tracing::info!(payment_id = %payment.id, %redirect_url, "payment created");
        Ok(CreatedPayment {
            payment,
            redirect_url,
        })
    }

    /// Builds the gateway page locator for a payment. No gateway is contacted.
    pub fn redirect_url(&self, payment: &Payment) -> String {
        format!(
            "{}/{}?id={}&amount={:.2}",
            self.gateway_base_url,
            payment.method.gateway_path(),
            payment.id,
            payment.amount
        )
    }

    /// Fetches a payment by id.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when no payment has that id.
    pub async fn get_payment(&self, id: &str) -> Result<Payment> {
        self.payments
            .get(id)
            .await?
            .ok_or_else(|| FulfillmentError::not_found("payment", id))
    }

    /// Applies the single settlement callback a payment accepts.
    ///
    /// On success the linked order is promoted to `paid` on a best-effort
    /// basis: whatever happens to the order, the settlement itself is
    /// recorded, and the promotion result is reported in the returned
    /// [`Settlement`].
    #[tracing::instrument(skip(self))]
    pub async fn process_callback(
        &self,
        payment_id: &str,
        transaction_id: &str,
        success: bool,
    ) -> Result<Settlement> {
        let mut payment = self.get_payment(payment_id).await?;

        let next = if success {
            PaymentStatus::Success
        } else {
            PaymentStatus::Failed
        };
        if !payment.status.can_transition_to(next) {
            return Err(FulfillmentError::InvalidState(format!(
                "payment {} is not in pending status",
                payment.id
            )));
        }

        payment.transaction_id = transaction_id.to_string();
        payment.set_status(next);
        if success {
            payment.paid_at = Some(payment.updated_at);
        }

        // Payment first: a failed write must leave the order untouched.
        self.payments.update(payment.clone()).await?;

        let promotion = if success {
            self.promote_order(&payment.order_id).await
        } else {
            OrderPromotion::NotAttempted
        };

        metrics::counter!("payments_settled_total", "outcome" => next.as_str()).increment(1);
        tracing::info!(payment_id = %payment.id, status = %payment.status, ?promotion, "payment settled");

        Ok(Settlement { payment, promotion })
    }

    /// Best-effort `paid` promotion. Never fails; failures are logged and counted.
    async fn promote_order(&self, order_id: &str) -> OrderPromotion {
        let mut order = match self.orders.get(order_id).await {
            Ok(Some(order)) => order,
            Ok(None) => {
                tracing::warn!(%order_id, "settled payment references a missing order");
                return OrderPromotion::OrderMissing;
            }
            Err(e) => {
                metrics::counter!("order_promotion_failures_total").increment(1);
                tracing::warn!(%order_id, error = %e, "failed to load order for promotion");
                return OrderPromotion::Failed(e.to_string());
            }
        };

        let previous = order.status;
        if previous != OrderStatus::Pending {
            // A second settlement for the same order, or a settlement racing a cancel.
            tracing::warn!(%order_id, %previous, "promoting an order that was no longer pending");
        }

        order.set_status(OrderStatus::Paid);
        match self.orders.update(order).await {
            Ok(()) => OrderPromotion::Promoted { previous },
            Err(e) => {
                metrics::counter!("order_promotion_failures_total").increment(1);
                tracing::warn!(%order_id, error = %e, "failed to promote order to paid");
                OrderPromotion::Failed(e.to_string())
            }
        }
    }

    #[tracing::instrument(skip(self))]
    pub async fn refund_payment(&self, id: &str, reason: &str) -> Result<Payment> {
        let mut payment = self.get_payment(id).await?;

        if !payment.status.can_transition_to(PaymentStatus::Refunded) {
            return Err(FulfillmentError::InvalidState(
                "only successful payments can be refunded".into(),
            ));
        }

        payment.set_status(PaymentStatus::Refunded);
        payment.refund_reason = (!reason.is_empty()).then(|| reason.to_string());
        self.payments.update(payment.clone()).await?;

        metrics::counter!("payments_refunded_total").increment(1);
        tracing::info!(payment_id = %payment.id, %reason, "payment refunded");
        Ok(payment)
    }

    /// Lists payments newest first; each non-empty filter narrows the result.
    ///
    /// # Arguments
    ///
    /// * `user_id` - Only payments of this user, unless empty.
    /// * `order_id` - Only payments for this order, unless empty.
    /// * `page` - 1-based page number; values below 1 mean the first page.
    /// * `page_size` - Items per page; values below 1 mean 10.
    pub async fn list_payments(
        &self,
        user_id: &str,
        order_id: &str,
        page: i64,
        page_size: i64,
    ) -> Result<PageResult<Payment>> {
        let pagination = Pagination::new(page, page_size);
        self.payments
            .list(user_id, order_id, pagination.offset(), pagination.limit())
            .await
    }
}
