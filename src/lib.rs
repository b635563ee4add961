//! Coffee Shop Library
//!
//! Re-exports modules for the binary and integration testing.

pub mod api;
pub mod config;
pub mod db;
pub mod domain;
mod error;
pub mod handlers;
pub mod report;
pub mod sessions;
pub mod store;

pub use config::{Config, StorageBackend};
pub use domain::{Cart, DomainError, Money, Period, Product, TransactionRecord};
pub use error::AppError;
