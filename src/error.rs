use crate::domain::order::OrderStatus;
use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FulfillmentError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error(
        "Insufficient stock for product {product_id}: requested {requested}, available {available}"
    )]
    InsufficientStock {
        product_id: String,
        requested: u32,
        available: u32,
    },
    #[error("Payment amount {amount} does not match order total {expected}")]
    AmountMismatch { amount: Decimal, expected: Decimal },
    #[error("Invalid state: {0}")]
    InvalidState(String),
    #[error("Invalid status transition from {from} to {to}: {reason}")]
    InvalidTransition {
        from: OrderStatus,
        to: OrderStatus,
        reason: &'static str,
    },
    #[error("Configuration error: {0}")]
    Configuration(String),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Storage error: {0}")]
    Storage(Box<dyn std::error::Error + Send + Sync>),
}

impl FulfillmentError {
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }

    /// Business-rule rejections, as opposed to failures of the surrounding plumbing.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::NotFound { .. }
                | Self::InvalidInput(_)
                | Self::InsufficientStock { .. }
                | Self::AmountMismatch { .. }
                | Self::InvalidState(_)
                | Self::InvalidTransition { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, FulfillmentError>;

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_error_messages() {
        let err = FulfillmentError::not_found("order", "o-1");
        assert_eq!(err.to_string(), "order o-1 not found");

        let err = FulfillmentError::AmountMismatch {
            amount: dec!(25.0),
            expected: dec!(30.0),
        };
        assert_eq!(
            err.to_string(),
            "Payment amount 25.0 does not match order total 30.0"
        );
    }

    #[test]
    fn test_rejection_classification() {
        assert!(FulfillmentError::InvalidState("x".into()).is_rejection());
        assert!(!FulfillmentError::Configuration("x".into()).is_rejection());
        assert!(!FulfillmentError::IoError(std::io::Error::other("disk")).is_rejection());
    }
}
