//! Domain module
//!
//! Core domain types and business logic.

pub mod cart;
pub mod error;
pub mod money;
pub mod period;
pub mod product;
pub mod ticket;
pub mod transaction;

pub use cart::{parse_quantity, Cart, CartLineItem};
pub use error::DomainError;
pub use money::{Money, MoneyError};
pub use period::Period;
pub use product::{next_product_id, Product, ProductFields};
pub use ticket::Ticket;
pub use transaction::{NewTransaction, TransactionRecord};
