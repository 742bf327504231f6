use crate::domain::order::{NewOrder, Order, OrderStatus};
use crate::domain::payment::{CreatedPayment, NewPayment, Payment, Settlement};

/// One mutation of the fulfillment core, as received from a front door.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    CreateOrder(NewOrder),
    UpdateOrderStatus {
        id: String,
        status: OrderStatus,
    },
    CancelOrder {
        id: String,
    },
    CreatePayment(NewPayment),
    PaymentCallback {
        payment_id: String,
        transaction_id: String,
        success: bool,
    },
    RefundPayment {
        id: String,
        reason: String,
    },
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::CreateOrder(_) => "create_order",
            Command::UpdateOrderStatus { .. } => "update_status",
            Command::CancelOrder { .. } => "cancel_order",
            Command::CreatePayment(_) => "create_payment",
            Command::PaymentCallback { .. } => "callback",
            Command::RefundPayment { .. } => "refund",
        }
    }
}

/// What a successfully applied [`Command`] produced.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Order(Order),
    PaymentCreated(CreatedPayment),
    Settled(Settlement),
    Payment(Payment),
}
