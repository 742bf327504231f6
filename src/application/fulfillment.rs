use super::command::{Command, Outcome};
use super::order_engine::OrderEngine;
use super::payment_engine::PaymentEngine;
use crate::domain::order::Order;
use crate::domain::payment::Payment;
use crate::error::Result;

const SCAN_PAGE_SIZE: i64 = 100;

/// Both engines behind a single entry point that applies [`Command`]s.
pub struct FulfillmentService {
    pub orders: OrderEngine,
    pub payments: PaymentEngine,
}

impl FulfillmentService {
    pub fn new(orders: OrderEngine, payments: PaymentEngine) -> Self {
        Self { orders, payments }
    }

    /// Routes a command to the engine that owns it.
    pub async fn apply(&self, command: Command) -> Result<Outcome> {
        match command {
            Command::CreateOrder(new) => self.orders.create_order(new).await.map(Outcome::Order),
            Command::UpdateOrderStatus { id, status } => self
                .orders
                .update_order_status(&id, status)
                .await
                .map(Outcome::Order),
            Command::CancelOrder { id } => self.orders.cancel_order(&id).await.map(Outcome::Order),
            Command::CreatePayment(new) => self
                .payments
                .create_payment(new)
                .await
                .map(Outcome::PaymentCreated),
            Command::PaymentCallback {
                payment_id,
                transaction_id,
                success,
            } => self
                .payments
                .process_callback(&payment_id, &transaction_id, success)
                .await
                .map(Outcome::Settled),
            Command::RefundPayment { id, reason } => self
                .payments
                .refund_payment(&id, &reason)
                .await
                .map(Outcome::Payment),
        }
    }

    /// Every order, newest first, gathered page by page.
    pub async fn all_orders(&self) -> Result<Vec<Order>> {
        let mut all = Vec::new();
        let mut page = 1;
        loop {
            let result = self
                .orders
                .list_orders_by_user("", page, SCAN_PAGE_SIZE)
                .await?;
            let fetched = result.items.len();
            all.extend(result.items);
            if fetched == 0 || all.len() >= result.total {
                return Ok(all);
            }
            page += 1;
        }
    }

    /// Every payment, newest first, gathered page by page.
    pub async fn all_payments(&self) -> Result<Vec<Payment>> {
        let mut all = Vec::new();
        let mut page = 1;
        loop {
            let result = self
                .payments
                .list_payments("", "", page, SCAN_PAGE_SIZE)
                .await?;
            let fetched = result.items.len();
            all.extend(result.items);
            if fetched == 0 || all.len() >= result.total {
                return Ok(all);
            }
            page += 1;
        }
    }
}
