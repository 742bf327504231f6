use crate::domain::order::{Order, OrderStatus};
use crate::domain::payment::{Payment, PaymentMethod, PaymentStatus};
use crate::error::Result;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::io::Write;

#[derive(Serialize)]
struct OrderRow<'a> {
    id: &'a str,
    user_id: &'a str,
    product_id: &'a str,
    quantity: u32,
    total_amount: Decimal,
    status: OrderStatus,
    created_at: DateTime<Utc>,
}

#[derive(Serialize)]
struct PaymentRow<'a> {
    id: &'a str,
    order_id: &'a str,
    user_id: &'a str,
    amount: Decimal,
    method: PaymentMethod,
    status: PaymentStatus,
    transaction_id: &'a str,
    paid_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

/// Writes orders or payments as CSV, one row per record with a header line.
///
/// Amounts are normalized, so `30.0` is written as `30`.
pub struct ReportWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> ReportWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    pub fn write_orders<'a>(&mut self, orders: impl IntoIterator<Item = &'a Order>) -> Result<()> {
        let mut empty = true;
        for order in orders {
            empty = false;
            self.writer.serialize(OrderRow {
                id: &order.id,
                user_id: &order.user_id,
                product_id: &order.product_id,
                quantity: order.quantity,
                total_amount: order.total_amount.normalize(),
                status: order.status,
                created_at: order.created_at,
            })?;
        }
        if empty {
            self.writer.write_record([
                "id",
                "user_id",
                "product_id",
                "quantity",
                "total_amount",
                "status",
                "created_at",
            ])?;
        }
        self.writer.flush()?;
        Ok(())
    }

    pub fn write_payments<'a>(
        &mut self,
        payments: impl IntoIterator<Item = &'a Payment>,
    ) -> Result<()> {
        let mut empty = true;
        for payment in payments {
            empty = false;
            self.writer.serialize(PaymentRow {
                id: &payment.id,
                order_id: &payment.order_id,
                user_id: &payment.user_id,
                amount: payment.amount.normalize(),
                method: payment.method,
                status: payment.status,
                transaction_id: &payment.transaction_id,
                paid_at: payment.paid_at,
                created_at: payment.created_at,
            })?;
        }
        if empty {
            self.writer.write_record([
                "id",
                "order_id",
                "user_id",
                "amount",
                "method",
                "status",
                "transaction_id",
                "paid_at",
                "created_at",
            ])?;
        }
        self.writer.flush()?;
        Ok(())
    }
}
