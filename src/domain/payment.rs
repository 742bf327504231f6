use super::lifecycle::Lifecycle;
use super::order::OrderStatus;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The lifecycle of a payment.
///
/// `Cancelled` is set only by systems outside this crate; no operation here
/// produces it and nothing leaves it.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Clone, Copy, Default)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Success,
    Failed,
    Refunded,
    Cancelled,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Success => "success",
            PaymentStatus::Failed => "failed",
            PaymentStatus::Refunded => "refunded",
            PaymentStatus::Cancelled => "cancelled",
        }
    }
}

impl Lifecycle for PaymentStatus {
    fn next_states(self) -> &'static [Self] {
        match self {
            PaymentStatus::Pending => &[PaymentStatus::Success, PaymentStatus::Failed],
            PaymentStatus::Success => &[PaymentStatus::Refunded],
            PaymentStatus::Failed | PaymentStatus::Refunded | PaymentStatus::Cancelled => &[],
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Clone, Copy)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Alipay,
    Wechat,
    CreditCard,
    Balance,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Alipay => "alipay",
            PaymentMethod::Wechat => "wechat",
            PaymentMethod::CreditCard => "credit_card",
            PaymentMethod::Balance => "balance",
        }
    }

    /// Path segment of the gateway page that collects this method.
    pub fn gateway_path(&self) -> &'static str {
        match self {
            PaymentMethod::Alipay => "alipay",
            PaymentMethod::Wechat => "wechat",
            PaymentMethod::CreditCard => "card",
            PaymentMethod::Balance => "pay",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A settlement attempt against exactly one order.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Payment {
    pub id: String,
    pub order_id: String,
    pub user_id: String,
    pub amount: Decimal,
    pub method: PaymentMethod,
    pub status: PaymentStatus,
    /// Gateway reference, empty until the settlement callback arrives.
    #[serde(default)]
    pub transaction_id: String,
    pub paid_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub refund_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Payment {
    pub fn set_status(&mut self, status: PaymentStatus) {
        self.status = status;
        self.updated_at = Utc::now();
    }
}

/// Caller-supplied fields of a payment about to be created.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPayment {
    pub id: String,
    pub order_id: String,
    pub user_id: String,
    pub amount: Decimal,
    pub method: PaymentMethod,
}

/// A freshly created payment and the page the payer should be sent to.
#[derive(Debug, Clone, PartialEq)]
pub struct CreatedPayment {
    pub payment: Payment,
    pub redirect_url: String,
}

/// What happened to the linked order while a settlement was recorded.
///
/// Promotion is best effort: a failure here never fails the settlement, so
/// it is reported through this value instead.
#[derive(Debug, Clone, PartialEq)]
pub enum OrderPromotion {
    /// The payment failed; the order was left alone.
    NotAttempted,
    /// The order is now `paid`.
    Promoted { previous: OrderStatus },
    /// The referenced order does not exist.
    OrderMissing,
    /// Loading or writing the order failed.
    Failed(String),
}

impl OrderPromotion {
    pub fn is_promoted(&self) -> bool {
        matches!(self, OrderPromotion::Promoted { .. })
    }
}

/// Result of a processed settlement callback.
#[derive(Debug, Clone, PartialEq)]
pub struct Settlement {
    pub payment: Payment,
    pub promotion: OrderPromotion,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transition_table() {
        assert!(PaymentStatus::Pending.can_transition_to(PaymentStatus::Success));
        assert!(PaymentStatus::Pending.can_transition_to(PaymentStatus::Failed));
        assert!(PaymentStatus::Success.can_transition_to(PaymentStatus::Refunded));

        assert!(!PaymentStatus::Pending.can_transition_to(PaymentStatus::Refunded));
        assert!(!PaymentStatus::Pending.can_transition_to(PaymentStatus::Cancelled));
        assert!(!PaymentStatus::Failed.can_transition_to(PaymentStatus::Success));
        assert!(!PaymentStatus::Refunded.can_transition_to(PaymentStatus::Success));

        assert!(PaymentStatus::Failed.is_terminal());
        assert!(PaymentStatus::Refunded.is_terminal());
        assert!(PaymentStatus::Cancelled.is_terminal());
    }

    #[test]
    fn test_method_serialization() {
        assert_eq!(
            serde_json::to_string(&PaymentMethod::CreditCard).unwrap(),
            "\"credit_card\""
        );
        let parsed: PaymentMethod = serde_json::from_str("\"wechat\"").unwrap();
        assert_eq!(parsed, PaymentMethod::Wechat);
    }

    #[test]
    fn test_gateway_paths() {
        assert_eq!(PaymentMethod::Alipay.gateway_path(), "alipay");
        assert_eq!(PaymentMethod::CreditCard.gateway_path(), "card");
        assert_eq!(PaymentMethod::Balance.gateway_path(), "pay");
    }
}
