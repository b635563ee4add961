//! Catalog product

use serde::{Deserialize, Serialize};

use super::{DomainError, Money};

/// A product of the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub purchase_price: Money,
    pub sale_price: Money,
}

/// Fields of a product before it has an id (create and edit)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductFields {
    pub name: String,
    pub purchase_price: Money,
    pub sale_price: Money,
}

impl ProductFields {
    /// Parse the raw form values of the product editor.
    pub fn parse(name: &str, purchase_price: &str, sale_price: &str) -> Result<Self, DomainError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::validation("product name must not be empty"));
        }

        let purchase_price: Money = purchase_price
            .parse()
            .map_err(|e| DomainError::validation(format!("invalid purchasePrice: {}", e)))?;
        let sale_price: Money = sale_price
            .parse()
            .map_err(|e| DomainError::validation(format!("invalid salePrice: {}", e)))?;

        Ok(Self {
            name: name.to_string(),
            purchase_price,
            sale_price,
        })
    }

    /// Attach an id
    pub fn into_product(self, id: i64) -> Product {
        Product {
            id,
            name: self.name,
            purchase_price: self.purchase_price,
            sale_price: self.sale_price,
        }
    }
}

/// Next free product id: one greater than the largest id in use.
pub fn next_product_id<I: IntoIterator<Item = i64>>(existing: I) -> i64 {
    existing.into_iter().max().unwrap_or(0).max(0) + 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_fields() {
        let fields = ProductFields::parse(" Espresso ", "1.20", "3.50").unwrap();

        assert_eq!(fields.name, "Espresso");
        assert_eq!(fields.purchase_price.value(), dec!(1.20));
        assert_eq!(fields.sale_price.value(), dec!(3.50));
    }

    #[test]
    fn test_parse_rejects_bad_price() {
        let result = ProductFields::parse("Latte", "x", "3.50");
        assert!(matches!(result, Err(DomainError::Validation(msg)) if msg.contains("purchasePrice")));
    }

    #[test]
    fn test_parse_rejects_empty_name() {
        assert!(ProductFields::parse("  ", "1", "2").is_err());
    }

    #[test]
    fn test_next_product_id() {
        assert_eq!(next_product_id(Vec::new()), 1);
        assert_eq!(next_product_id(vec![3, 1, 7]), 8);
    }
}
