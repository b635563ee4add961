//! Cart Accumulator
//!
//! Ordered list of line items selected by one customer session before
//! checkout. The cart owns no storage: it lives as long as the session.

use serde::{Deserialize, Serialize};

use super::{DomainError, Money};

/// One selected product and quantity.
///
/// # Invariants
/// - `quantity > 0`
/// - `line_total == quantity * unit_sale_price`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLineItem {
    pub transaction_code: i64,
    pub product_id: i64,
    pub product_name: String,
    pub quantity: i32,
    pub unit_sale_price: Money,
    pub line_total: Money,
}

/// Cart of one session.
///
/// # Invariants
/// - `total == sum of line totals`, never past the `Money` maximum
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Cart {
    items: Vec<CartLineItem>,
    total: Money,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a line item.
    ///
    /// The line's transaction code is one greater than the previous line's,
    /// or 1 for the first line.
    ///
    /// # Errors
    /// - `DomainError::Validation` if `quantity <= 0`, or if the line total or
    ///   the cart total would exceed the `Money` maximum
    pub fn add_item(
        &mut self,
        product_id: i64,
        product_name: impl Into<String>,
        unit_sale_price: Money,
        quantity: i32,
    ) -> Result<&CartLineItem, DomainError> {
        if quantity <= 0 {
            return Err(DomainError::validation(format!(
                "quantity must be greater than zero (got {})",
                quantity
            )));
        }

        let line_total = unit_sale_price.times(quantity)?;
        let total = self.total.try_add(&line_total).map_err(|e| {
            DomainError::validation(format!("cart total out of range: {}", e))
        })?;
        let transaction_code = self
            .items
            .last()
            .map(|item| item.transaction_code + 1)
            .unwrap_or(1);

        self.items.push(CartLineItem {
            transaction_code,
            product_id,
            product_name: product_name.into(),
            quantity,
            unit_sale_price,
            line_total,
        });
        self.total = total;

        // just pushed, never empty here
        Ok(&self.items[self.items.len() - 1])
    }

    /// Sum of all line totals
    pub fn total(&self) -> Money {
        self.total
    }

    /// Remove every line item
    pub fn clear(&mut self) {
        self.items.clear();
        self.total = Money::ZERO;
    }

    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Parse a quantity form value.
pub fn parse_quantity(raw: &str) -> Result<i32, DomainError> {
    let quantity: i32 = raw
        .trim()
        .parse()
        .map_err(|_| DomainError::validation(format!("invalid quantity: {:?}", raw)))?;
    if quantity <= 0 {
        return Err(DomainError::validation(format!(
            "quantity must be greater than zero (got {})",
            quantity
        )));
    }
    Ok(quantity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn money(value: rust_decimal::Decimal) -> Money {
        Money::new(value).unwrap()
    }

    #[test]
    fn test_add_item_computes_line_total() {
        let mut cart = Cart::new();
        let item = cart.add_item(7, "Cappuccino", money(dec!(4.25)), 3).unwrap();

        assert_eq!(item.transaction_code, 1);
        assert_eq!(item.product_id, 7);
        assert_eq!(item.line_total.value(), dec!(12.75));
    }

    #[test]
    fn test_codes_follow_previous_line() {
        let mut cart = Cart::new();
        cart.add_item(1, "Espresso", money(dec!(2.00)), 1).unwrap();
        cart.add_item(2, "Latte", money(dec!(3.00)), 2).unwrap();
        cart.add_item(1, "Espresso", money(dec!(2.00)), 1).unwrap();

        let codes: Vec<i64> = cart.items().iter().map(|i| i.transaction_code).collect();
        assert_eq!(codes, vec![1, 2, 3]);
    }

    #[test]
    fn test_total_is_sum_of_lines() {
        let mut cart = Cart::new();
        let lines = [(dec!(2.50), 2), (dec!(0.99), 7), (dec!(10.00), 1), (dec!(0.01), 13)];
        for (price, quantity) in lines {
            cart.add_item(1, "Item", money(price), quantity).unwrap();
        }

        let expected: rust_decimal::Decimal = lines
            .iter()
            .map(|(price, quantity)| *price * rust_decimal::Decimal::from(*quantity))
            .sum();
        assert_eq!(cart.total().value(), expected);
    }

    #[test]
    fn test_empty_cart_total_is_zero() {
        assert_eq!(Cart::new().total(), Money::ZERO);
    }

    #[test]
    fn test_zero_quantity_rejected() {
        let mut cart = Cart::new();
        let result = cart.add_item(1, "Espresso", money(dec!(2.00)), 0);

        assert!(matches!(result, Err(DomainError::Validation(_))));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_line_past_maximum_total_rejected() {
        let mut cart = Cart::new();
        cart.add_item(1, "Espresso machine", money(dec!(6000000000.00)), 1)
            .unwrap();

        let result = cart.add_item(1, "Espresso machine", money(dec!(6000000000.00)), 1);

        assert!(matches!(result, Err(DomainError::Validation(_))));
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.total().value(), dec!(6000000000.00));
    }

    #[test]
    fn test_total_reaches_maximum_exactly() {
        let mut cart = Cart::new();
        cart.add_item(1, "A", money(dec!(9999999999.98)), 1).unwrap();
        cart.add_item(2, "B", money(dec!(0.01)), 1).unwrap();

        let sum_of_lines: rust_decimal::Decimal =
            cart.items().iter().map(|i| i.line_total.value()).sum();
        assert_eq!(cart.total().value(), dec!(9999999999.99));
        assert_eq!(cart.total().value(), sum_of_lines);
        assert!(cart.add_item(3, "C", money(dec!(0.01)), 1).is_err());
    }

    #[test]
    fn test_clear_restarts_codes() {
        let mut cart = Cart::new();
        cart.add_item(1, "Espresso", money(dec!(2.00)), 1).unwrap();
        cart.clear();

        assert!(cart.is_empty());
        assert_eq!(cart.total(), Money::ZERO);
        let item = cart.add_item(1, "Espresso", money(dec!(2.00)), 1).unwrap();
        assert_eq!(item.transaction_code, 1);
    }

    #[test]
    fn test_parse_quantity() {
        assert_eq!(parse_quantity(" 4 ").unwrap(), 4);
        assert!(parse_quantity("-1").is_err());
        assert!(parse_quantity("two").is_err());
    }
}
