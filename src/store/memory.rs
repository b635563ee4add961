//! In-memory store
//!
//! Process-local adapter for development and tests. Identifier assignment
//! happens under the collection's write lock, so concurrent callers never
//! receive the same product id or transaction code.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::domain::{
    next_product_id, NewTransaction, Product, ProductFields, Ticket, TransactionRecord,
};

use super::{CatalogStore, LedgerStore, StoreError, TicketLog};

/// Catalog, ledger and ticket log kept in memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    products: RwLock<Vec<Product>>,
    transactions: RwLock<Vec<TransactionRecord>>,
    tickets: RwLock<Vec<Ticket>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CatalogStore for MemoryStore {
    async fn list(&self) -> Result<Vec<Product>, StoreError> {
        let mut products = self.products.read().await.clone();
        products.sort_by_key(|p| p.id);
        Ok(products)
    }

    async fn get(&self, id: i64) -> Result<Option<Product>, StoreError> {
        let products = self.products.read().await;
        Ok(products.iter().find(|p| p.id == id).cloned())
    }

    async fn create(&self, fields: ProductFields) -> Result<Product, StoreError> {
        let mut products = self.products.write().await;
        let id = next_product_id(products.iter().map(|p| p.id));
        let product = fields.into_product(id);
        products.push(product.clone());

        tracing::debug!(product_id = id, "Product created");
        Ok(product)
    }

    async fn update(&self, id: i64, fields: ProductFields) -> Result<Option<Product>, StoreError> {
        let mut products = self.products.write().await;
        let Some(slot) = products.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        *slot = fields.into_product(id);
        Ok(Some(slot.clone()))
    }

    async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        let mut products = self.products.write().await;
        let before = products.len();
        products.retain(|p| p.id != id);
        Ok(products.len() != before)
    }
}

#[async_trait]
impl LedgerStore for MemoryStore {
    async fn next_transaction_code(&self) -> Result<i64, StoreError> {
        let transactions = self.transactions.read().await;
        Ok(transactions.len() as i64 + 1)
    }

    async fn commit(
        &self,
        items: &[NewTransaction],
        timestamp: DateTime<Utc>,
    ) -> Result<Vec<TransactionRecord>, StoreError> {
        let mut transactions = self.transactions.write().await;
        let first_code = transactions.len() as i64 + 1;

        let records: Vec<TransactionRecord> = items
            .iter()
            .cloned()
            .zip(first_code..)
            .map(|(item, code)| item.into_record(code, timestamp))
            .collect();

        transactions.extend(records.iter().cloned());

        tracing::debug!(
            records = records.len(),
            first_code = first_code,
            "Ledger commit"
        );
        Ok(records)
    }

    async fn list_all(&self) -> Result<Vec<TransactionRecord>, StoreError> {
        Ok(self.transactions.read().await.clone())
    }

    async fn query_by_date_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<TransactionRecord>, StoreError> {
        let transactions = self.transactions.read().await;
        Ok(transactions
            .iter()
            .filter(|t| t.timestamp >= start && t.timestamp <= end)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl TicketLog for MemoryStore {
    async fn append(&self, ticket: Ticket) -> Result<(), StoreError> {
        self.tickets.write().await.push(ticket);
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Ticket>, StoreError> {
        Ok(self.tickets.read().await.clone())
    }
}
