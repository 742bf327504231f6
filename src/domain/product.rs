use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A catalog entry. The engines only ever read these.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Product {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Decimal,
    pub stock: u32,
}

impl Product {
    pub fn new(id: impl Into<String>, price: Decimal, stock: u32) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            description: String::new(),
            price,
            stock,
        }
    }

    pub fn has_stock_for(&self, quantity: u32) -> bool {
        self.stock >= quantity
    }

    /// Price of `quantity` units at the current catalog price, or `None` on overflow.
    pub fn total_for(&self, quantity: u32) -> Option<Decimal> {
        self.price.checked_mul(Decimal::from(quantity))
    }
}
