//! Catalog Handler
//!
//! Product maintenance for the admin server.

use std::sync::Arc;

use crate::domain::{DomainError, Product, ProductFields};
use crate::error::AppError;
use crate::store::CatalogStore;

use super::SaveProductCommand;

/// Handler for product CRUD
#[derive(Clone)]
pub struct CatalogHandler {
    catalog: Arc<dyn CatalogStore>,
}

impl CatalogHandler {
    pub fn new(catalog: Arc<dyn CatalogStore>) -> Self {
        Self { catalog }
    }

    pub async fn list(&self) -> Result<Vec<Product>, AppError> {
        Ok(self.catalog.list().await?)
    }

    pub async fn get(&self, id: i64) -> Result<Product, AppError> {
        let product = self.catalog.get(id).await?;
        Ok(product.ok_or(DomainError::ProductNotFound(id))?)
    }

    pub async fn create(&self, command: SaveProductCommand) -> Result<Product, AppError> {
        let fields = parse_fields(&command)?;
        let product = self.catalog.create(fields).await?;

        tracing::info!(product_id = product.id, name = %product.name, "Product created");
        Ok(product)
    }

    pub async fn update(&self, id: i64, command: SaveProductCommand) -> Result<Product, AppError> {
        let fields = parse_fields(&command)?;
        let product = self
            .catalog
            .update(id, fields)
            .await?
            .ok_or(DomainError::ProductNotFound(id))?;

        tracing::info!(product_id = id, "Product updated");
        Ok(product)
    }

    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        if !self.catalog.delete(id).await? {
            return Err(DomainError::ProductNotFound(id).into());
        }

        tracing::info!(product_id = id, "Product deleted");
        Ok(())
    }
}

fn parse_fields(command: &SaveProductCommand) -> Result<ProductFields, DomainError> {
    ProductFields::parse(&command.name, &command.purchase_price, &command.sale_price)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn handler() -> CatalogHandler {
        CatalogHandler::new(Arc::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let handler = handler();
        let created = handler
            .create(SaveProductCommand::new("Mocha", "1.50", "4.90"))
            .await
            .unwrap();

        assert_eq!(created.id, 1);
        assert_eq!(handler.get(1).await.unwrap(), created);
    }

    #[tokio::test]
    async fn test_create_rejects_unparsable_price() {
        let result = handler()
            .create(SaveProductCommand::new("Mocha", "1,50", "4.90"))
            .await;

        assert!(matches!(result, Err(AppError::Domain(DomainError::Validation(_)))));
    }

    #[tokio::test]
    async fn test_update_and_delete_unknown() {
        let handler = handler();

        let update = handler
            .update(5, SaveProductCommand::new("Tea", "0.30", "2.00"))
            .await;
        assert!(matches!(update, Err(AppError::Domain(DomainError::ProductNotFound(5)))));

        let delete = handler.delete(5).await;
        assert!(matches!(delete, Err(AppError::Domain(DomainError::ProductNotFound(5)))));
    }
}
