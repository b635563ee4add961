//! Domain Error Types
//!
//! Pure domain errors that don't depend on infrastructure.

use thiserror::Error;

use super::MoneyError;

/// Domain-specific errors
///
/// These errors represent rejected operations: malformed input, or a lookup
/// that found nothing. They are independent of the web/storage layers.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    /// Malformed or out-of-range input (unparsable price, zero quantity, ...)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Product id unknown to the catalog
    #[error("Product not found: {0}")]
    ProductNotFound(i64),

    /// Monthly report requested for a period without sales
    #[error("No transactions found for {month:02}/{year}")]
    NoTransactionsInPeriod { month: u32, year: i32 },

    /// Checkout of a cart without items
    #[error("Cart is empty")]
    EmptyCart,
}

impl DomainError {
    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Check if this is a not-found error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::ProductNotFound(_) | Self::NoTransactionsInPeriod { .. }
        )
    }
}

impl From<MoneyError> for DomainError {
    fn from(error: MoneyError) -> Self {
        Self::Validation(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_transactions_message() {
        let err = DomainError::NoTransactionsInPeriod { month: 3, year: 2023 };

        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "No transactions found for 03/2023");
    }

    #[test]
    fn test_money_error_is_validation() {
        let err: DomainError = MoneyError::Overflow.into();

        assert!(matches!(err, DomainError::Validation(_)));
        assert!(!err.is_not_found());
    }
}
