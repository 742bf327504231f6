use crate::application::command::Command;
use crate::domain::order::{NewOrder, OrderStatus};
use crate::domain::payment::{NewPayment, PaymentMethod};
use crate::error::{FulfillmentError, Result};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Read;
use uuid::Uuid;

#[derive(Debug, Deserialize, PartialEq, Clone, Copy)]
#[serde(rename_all = "snake_case")]
pub enum CommandType {
    CreateOrder,
    UpdateStatus,
    CancelOrder,
    CreatePayment,
    Callback,
    Refund,
}

/// One row of a command script. Which cells are required depends on `type`.
#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct CommandRecord {
    pub r#type: CommandType,
    pub id: Option<String>,
    pub user: Option<String>,
    pub product: Option<String>,
    pub order: Option<String>,
    pub quantity: Option<u32>,
    pub amount: Option<Decimal>,
    pub method: Option<PaymentMethod>,
    pub status: Option<OrderStatus>,
    pub transaction: Option<String>,
    pub success: Option<bool>,
    pub reason: Option<String>,
}

fn required<T>(value: Option<T>, field: &str, kind: CommandType) -> Result<T> {
    value.ok_or_else(|| {
        FulfillmentError::InvalidInput(format!("{kind:?} command is missing `{field}`"))
    })
}

impl TryFrom<CommandRecord> for Command {
    type Error = FulfillmentError;

    fn try_from(record: CommandRecord) -> Result<Self> {
        let kind = record.r#type;
        let command = match kind {
            CommandType::CreateOrder => Command::CreateOrder(NewOrder {
                id: record.id.unwrap_or_else(|| Uuid::new_v4().to_string()),
                user_id: required(record.user, "user", kind)?,
                product_id: required(record.product, "product", kind)?,
                quantity: required(record.quantity, "quantity", kind)?,
            }),
            CommandType::UpdateStatus => Command::UpdateOrderStatus {
                id: required(record.id, "id", kind)?,
                status: required(record.status, "status", kind)?,
            },
            CommandType::CancelOrder => Command::CancelOrder {
                id: required(record.id, "id", kind)?,
            },
            CommandType::CreatePayment => Command::CreatePayment(NewPayment {
                id: record.id.unwrap_or_else(|| Uuid::new_v4().to_string()),
                order_id: required(record.order, "order", kind)?,
                user_id: required(record.user, "user", kind)?,
                amount: required(record.amount, "amount", kind)?,
                method: required(record.method, "method", kind)?,
            }),
            CommandType::Callback => Command::PaymentCallback {
                payment_id: required(record.id, "id", kind)?,
                transaction_id: required(record.transaction, "transaction", kind)?,
                success: required(record.success, "success", kind)?,
            },
            CommandType::Refund => Command::RefundPayment {
                id: required(record.id, "id", kind)?,
                reason: record.reason.unwrap_or_default(),
            },
        };
        Ok(command)
    }
}

/// Reads a command script from a CSV source.
///
/// Rows are deserialized lazily, so a long script is replayed without being
/// loaded into memory. A bad row yields an error for that row only.
pub struct CommandReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> CommandReader<R> {
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    pub fn commands(self) -> impl Iterator<Item = Result<Command>> {
        self.reader
            .into_deserialize::<CommandRecord>()
            .map(|result| result.map_err(FulfillmentError::from).and_then(Command::try_from))
    }
}
