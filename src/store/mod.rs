//! Store module
//!
//! Storage interfaces for the catalog, the sales ledger and the ticket log,
//! with an in-memory and a PostgreSQL adapter behind each.

mod error;
mod memory;
mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{NewTransaction, Product, ProductFields, Ticket, TransactionRecord};

pub use error::StoreError;
pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Product catalog (CRUD only)
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// All products, ordered by id
    async fn list(&self) -> Result<Vec<Product>, StoreError>;

    async fn get(&self, id: i64) -> Result<Option<Product>, StoreError>;

    /// Insert with the next free id (largest id in use + 1)
    async fn create(&self, fields: ProductFields) -> Result<Product, StoreError>;

    /// Replace all fields; `None` if the id is unknown
    async fn update(&self, id: i64, fields: ProductFields) -> Result<Option<Product>, StoreError>;

    /// `false` if the id is unknown
    async fn delete(&self, id: i64) -> Result<bool, StoreError>;
}

/// Append-only ledger of completed sales
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Code the next committed record will receive (`count + 1`).
    ///
    /// Informational only: `commit` assigns codes itself, atomically.
    async fn next_transaction_code(&self) -> Result<i64, StoreError>;

    /// Append one record per item, all stamped with `timestamp`.
    ///
    /// Either every record is appended or none is. Codes are consecutive,
    /// in item order, and never reused.
    async fn commit(
        &self,
        items: &[NewTransaction],
        timestamp: DateTime<Utc>,
    ) -> Result<Vec<TransactionRecord>, StoreError>;

    /// Every record, ordered by transaction code
    async fn list_all(&self) -> Result<Vec<TransactionRecord>, StoreError>;

    /// Records with `start <= timestamp <= end`, ordered by transaction code
    async fn query_by_date_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<TransactionRecord>, StoreError>;
}

/// Append-only support ticket log
#[async_trait]
pub trait TicketLog: Send + Sync {
    async fn append(&self, ticket: Ticket) -> Result<(), StoreError>;

    /// Every ticket, oldest first
    async fn list(&self) -> Result<Vec<Ticket>, StoreError>;
}
