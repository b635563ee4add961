//! PostgreSQL store
//!
//! Adapter over a sqlx connection pool. Multi-row writes run inside a single
//! database transaction holding an exclusive table lock while identifiers
//! are assigned.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::{Money, NewTransaction, Product, ProductFields, Ticket, TransactionRecord};

use super::{CatalogStore, LedgerStore, StoreError, TicketLog};

type ProductRow = (i64, String, Decimal, Decimal);
type TransactionRow = (Uuid, i64, i64, String, i32, Decimal, DateTime<Utc>);

/// Catalog, ledger and ticket log backed by PostgreSQL
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn money(value: Decimal, column: &str) -> Result<Money, StoreError> {
    Money::new(value).map_err(|e| StoreError::corrupt(format!("{}: {}", column, e)))
}

fn product_from_row((id, name, purchase_price, sale_price): ProductRow) -> Result<Product, StoreError> {
    Ok(Product {
        id,
        name,
        purchase_price: money(purchase_price, "products.purchase_price")?,
        sale_price: money(sale_price, "products.sale_price")?,
    })
}

fn transaction_from_row(row: TransactionRow) -> Result<TransactionRecord, StoreError> {
    let (id, transaction_code, product_id, product_name, quantity, amount, created_at) = row;
    Ok(TransactionRecord {
        id,
        transaction_code,
        product_id,
        product_name,
        quantity,
        amount: money(amount, "transactions.amount")?,
        timestamp: created_at,
    })
}

#[async_trait]
impl CatalogStore for PgStore {
    async fn list(&self) -> Result<Vec<Product>, StoreError> {
        let rows: Vec<ProductRow> = sqlx::query_as(
            "SELECT id, name, purchase_price, sale_price FROM products ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(product_from_row).collect()
    }

    async fn get(&self, id: i64) -> Result<Option<Product>, StoreError> {
        let row: Option<ProductRow> = sqlx::query_as(
            "SELECT id, name, purchase_price, sale_price FROM products WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(product_from_row).transpose()
    }

    async fn create(&self, fields: ProductFields) -> Result<Product, StoreError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("LOCK TABLE products IN EXCLUSIVE MODE")
            .execute(&mut *tx)
            .await?;

        let id: i64 = sqlx::query_scalar("SELECT COALESCE(MAX(id), 0) + 1 FROM products")
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query(
            r#"
            INSERT INTO products (id, name, purchase_price, sale_price)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(id)
        .bind(&fields.name)
        .bind(fields.purchase_price.value())
        .bind(fields.sale_price.value())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::debug!(product_id = id, "Product created");
        Ok(fields.into_product(id))
    }

    async fn update(&self, id: i64, fields: ProductFields) -> Result<Option<Product>, StoreError> {
        let rows_affected = sqlx::query(
            r#"
            UPDATE products
            SET name = $2, purchase_price = $3, sale_price = $4
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&fields.name)
        .bind(fields.purchase_price.value())
        .bind(fields.sale_price.value())
        .execute(&self.pool)
        .await?
        .rows_affected();

        if rows_affected == 0 {
            return Ok(None);
        }
        Ok(Some(fields.into_product(id)))
    }

    async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        let rows_affected = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(rows_affected > 0)
    }
}

#[async_trait]
impl LedgerStore for PgStore {
    async fn next_transaction_code(&self) -> Result<i64, StoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM transactions")
            .fetch_one(&self.pool)
            .await?;
        Ok(count + 1)
    }

    async fn commit(
        &self,
        items: &[NewTransaction],
        timestamp: DateTime<Utc>,
    ) -> Result<Vec<TransactionRecord>, StoreError> {
        let mut tx = self.pool.begin().await?;

        // Serializes concurrent checkouts; readers are not blocked
        sqlx::query("LOCK TABLE transactions IN EXCLUSIVE MODE")
            .execute(&mut *tx)
            .await?;

        let last_code: i64 =
            sqlx::query_scalar("SELECT COALESCE(MAX(transaction_code), 0) FROM transactions")
                .fetch_one(&mut *tx)
                .await?;

        let mut records = Vec::with_capacity(items.len());
        for (item, code) in items.iter().cloned().zip(last_code + 1..) {
            let record = item.into_record(code, timestamp);

            sqlx::query(
                r#"
                INSERT INTO transactions (
                    id, transaction_code, product_id, product_name,
                    quantity, amount, created_at
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                "#,
            )
            .bind(record.id)
            .bind(record.transaction_code)
            .bind(record.product_id)
            .bind(&record.product_name)
            .bind(record.quantity)
            .bind(record.amount.value())
            .bind(record.timestamp)
            .execute(&mut *tx)
            .await?;

            records.push(record);
        }

        tx.commit().await?;

        tracing::debug!(
            records = records.len(),
            first_code = last_code + 1,
            "Ledger commit"
        );
        Ok(records)
    }

    async fn list_all(&self) -> Result<Vec<TransactionRecord>, StoreError> {
        let rows: Vec<TransactionRow> = sqlx::query_as(
            r#"
            SELECT id, transaction_code, product_id, product_name, quantity, amount, created_at
            FROM transactions
            ORDER BY transaction_code
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(transaction_from_row).collect()
    }

    async fn query_by_date_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<TransactionRecord>, StoreError> {
        let rows: Vec<TransactionRow> = sqlx::query_as(
            r#"
            SELECT id, transaction_code, product_id, product_name, quantity, amount, created_at
            FROM transactions
            WHERE created_at >= $1 AND created_at <= $2
            ORDER BY transaction_code
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(transaction_from_row).collect()
    }
}

#[async_trait]
impl TicketLog for PgStore {
    async fn append(&self, ticket: Ticket) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO tickets (id, title, description, opened_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&ticket.title)
        .bind(&ticket.description)
        .bind(ticket.opened_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn list(&self) -> Result<Vec<Ticket>, StoreError> {
        let rows: Vec<(String, String, DateTime<Utc>)> = sqlx::query_as(
            "SELECT title, description, opened_at FROM tickets ORDER BY opened_at, id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(title, description, opened_at)| Ticket {
                title,
                description,
                opened_at,
            })
            .collect())
    }
}
