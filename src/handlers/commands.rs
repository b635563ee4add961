//! Command definitions
//!
//! Commands carry raw form values; handlers validate them.

use serde::{Deserialize, Serialize};

use crate::domain::{CartLineItem, Money, TransactionRecord};

/// Command to put a product in a session's cart
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AddToCartCommand {
    pub product_id: String,
    pub quantity: String,
}

impl AddToCartCommand {
    pub fn new(product_id: impl Into<String>, quantity: impl Into<String>) -> Self {
        Self {
            product_id: product_id.into(),
            quantity: quantity.into(),
        }
    }
}

/// Command to create or edit a catalog product
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SaveProductCommand {
    pub name: String,
    /// Decimal as string for precise parsing
    pub purchase_price: String,
    pub sale_price: String,
}

impl SaveProductCommand {
    pub fn new(
        name: impl Into<String>,
        purchase_price: impl Into<String>,
        sale_price: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            purchase_price: purchase_price.into(),
            sale_price: sale_price.into(),
        }
    }
}

/// Snapshot of a cart
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartView {
    pub items: Vec<CartLineItem>,
    pub total: Money,
}

/// Result of a successful checkout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutResult {
    pub records: Vec<TransactionRecord>,
    pub total: Money,
}
