//! Database module
//!
//! Connection, schema creation and schema verification for the PostgreSQL backend.

use sqlx::PgPool;

/// Idempotent DDL, one statement per entry
const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS products (
        id              BIGINT PRIMARY KEY,
        name            TEXT NOT NULL,
        purchase_price  NUMERIC(12, 2) NOT NULL CHECK (purchase_price >= 0),
        sale_price      NUMERIC(12, 2) NOT NULL CHECK (sale_price >= 0)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS transactions (
        id                UUID PRIMARY KEY,
        transaction_code  BIGINT NOT NULL UNIQUE,
        product_id        BIGINT NOT NULL,
        product_name      TEXT NOT NULL,
        quantity          INTEGER NOT NULL CHECK (quantity > 0),
        amount            NUMERIC(12, 2) NOT NULL CHECK (amount >= 0),
        created_at        TIMESTAMPTZ NOT NULL
    )
    "#,
    r#"
    CREATE INDEX IF NOT EXISTS transactions_created_at_idx
        ON transactions (created_at)
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS tickets (
        id           UUID PRIMARY KEY,
        title        TEXT NOT NULL,
        description  TEXT NOT NULL,
        opened_at    TIMESTAMPTZ NOT NULL
    )
    "#,
];

const REQUIRED_TABLES: &[&str] = &["products", "transactions", "tickets"];

/// Verify database connectivity
pub async fn verify_connection(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Create missing tables and indexes
pub async fn ensure_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    tracing::info!("Database schema ensured");
    Ok(())
}

/// Check if required tables exist
pub async fn check_schema(pool: &PgPool) -> Result<bool, sqlx::Error> {
    for table in REQUIRED_TABLES {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM information_schema.tables
                WHERE table_schema = current_schema() AND table_name = $1
            )
            "#,
        )
        .bind(table)
        .fetch_one(pool)
        .await?;

        if !exists {
            tracing::error!("Required table '{}' does not exist", table);
            return Ok(false);
        }
    }

    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_covers_required_tables() {
        for table in REQUIRED_TABLES {
            let needle = format!("CREATE TABLE IF NOT EXISTS {} ", table);
            assert!(
                SCHEMA.iter().any(|s| s.contains(&needle)),
                "missing DDL for {}",
                table
            );
        }
    }
}
