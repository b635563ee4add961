//! Cart Handler
//!
//! Add, view, clear and check out a session's cart.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::domain::{parse_quantity, CartLineItem, DomainError, Money, NewTransaction};
use crate::error::AppError;
use crate::sessions::{short_session_id, CartSessions};
use crate::store::{CatalogStore, LedgerStore};

use super::{AddToCartCommand, CartView, CheckoutResult};

/// Handler for the customer cart
#[derive(Clone)]
pub struct CartHandler {
    catalog: Arc<dyn CatalogStore>,
    ledger: Arc<dyn LedgerStore>,
    sessions: CartSessions,
}

impl CartHandler {
    pub fn new(
        catalog: Arc<dyn CatalogStore>,
        ledger: Arc<dyn LedgerStore>,
        sessions: CartSessions,
    ) -> Self {
        Self {
            catalog,
            ledger,
            sessions,
        }
    }

    /// Add a catalog product to the cart.
    ///
    /// Name and unit price come from the catalog entry.
    pub async fn add_item(
        &self,
        session_id: Uuid,
        command: AddToCartCommand,
    ) -> Result<CartLineItem, AppError> {
        let product_id: i64 = command.product_id.trim().parse().map_err(|_| {
            DomainError::validation(format!("invalid productId: {:?}", command.product_id))
        })?;
        let quantity = parse_quantity(&command.quantity)?;

        let product = self
            .catalog
            .get(product_id)
            .await?
            .ok_or(DomainError::ProductNotFound(product_id))?;

        let cart = self.sessions.cart(session_id);
        let added = cart
            .lock()
            .await
            .add_item(product.id, product.name, product.sale_price, quantity)
            .cloned();
        drop(cart);

        let item = match added {
            Ok(item) => item,
            Err(e) => {
                self.sessions.release_if_empty(session_id);
                return Err(e.into());
            }
        };

        tracing::debug!(
            session_id = %short_session_id(&session_id.to_string()),
            product_id = item.product_id,
            quantity = item.quantity,
            "Item added to cart"
        );
        Ok(item)
    }

    /// Items and total; a session without a cart sees an empty one.
    pub async fn view(&self, session_id: Uuid) -> CartView {
        let Some(cart) = self.sessions.get(session_id) else {
            return CartView {
                items: Vec::new(),
                total: Money::ZERO,
            };
        };
        let cart = cart.lock().await;
        CartView {
            items: cart.items().to_vec(),
            total: cart.total(),
        }
    }

    pub async fn clear(&self, session_id: Uuid) {
        if let Some(cart) = self.sessions.get(session_id) {
            cart.lock().await.clear();
            drop(cart);
            self.sessions.release_if_empty(session_id);
            tracing::debug!(
                session_id = %short_session_id(&session_id.to_string()),
                "Cart cleared"
            );
        }
    }

    /// Record every line item in the ledger, then empty the cart.
    ///
    /// The cart stays untouched when the ledger rejects the commit.
    pub async fn checkout(&self, session_id: Uuid) -> Result<CheckoutResult, AppError> {
        let handle = self
            .sessions
            .get(session_id)
            .ok_or(DomainError::EmptyCart)?;
        let mut cart = handle.lock().await;

        if cart.is_empty() {
            return Err(DomainError::EmptyCart.into());
        }

        let items: Vec<NewTransaction> = cart.items().iter().map(NewTransaction::from).collect();
        let total = cart.total();
        let records = self.ledger.commit(&items, Utc::now()).await?;
        cart.clear();
        drop(cart);
        drop(handle);
        self.sessions.release_if_empty(session_id);

        tracing::info!(
            session_id = %short_session_id(&session_id.to_string()),
            records = records.len(),
            total = %total,
            "Checkout completed"
        );
        Ok(CheckoutResult { records, total })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ProductFields;
    use crate::store::MemoryStore;

    async fn setup() -> (CartHandler, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        store
            .create(ProductFields::parse("Espresso", "0.80", "2.50").unwrap())
            .await
            .unwrap();
        store
            .create(ProductFields::parse("Croissant", "1.10", "3.20").unwrap())
            .await
            .unwrap();
        let handler = CartHandler::new(store.clone(), store.clone(), CartSessions::new());
        (handler, store)
    }

    #[tokio::test]
    async fn test_cart_total_capped_at_money_maximum() {
        let (handler, store) = setup().await;
        store
            .create(ProductFields::parse("Roaster", "1.00", "6000000000.00").unwrap())
            .await
            .unwrap();
        let session = Uuid::new_v4();

        handler.add_item(session, AddToCartCommand::new("3", "1")).await.unwrap();
        let second = handler.add_item(session, AddToCartCommand::new("3", "1")).await;
        assert!(matches!(second, Err(AppError::Domain(DomainError::Validation(_)))));

        let view = handler.view(session).await;
        let sum_of_lines: rust_decimal::Decimal =
            view.items.iter().map(|i| i.line_total.value()).sum();
        assert_eq!(view.total.value(), sum_of_lines);

        let result = handler.checkout(session).await.unwrap();
        assert_eq!(result.total.to_string(), "6000000000.00");
    }

    #[tokio::test]
    async fn test_sessions_without_items_are_not_kept() {
        let (handler, _) = setup().await;
        let sessions = handler.sessions.clone();

        for _ in 0..50 {
            let session = Uuid::new_v4();
            handler.view(session).await;
            handler.clear(session).await;
            let _ = handler.checkout(session).await;
            let _ = handler.add_item(session, AddToCartCommand::new("99", "1")).await;
        }
        assert!(sessions.is_empty());

        let session = Uuid::new_v4();
        handler.add_item(session, AddToCartCommand::new("1", "1")).await.unwrap();
        assert_eq!(sessions.len(), 1);
        handler.checkout(session).await.unwrap();
        assert!(sessions.is_empty());

        handler.add_item(session, AddToCartCommand::new("1", "1")).await.unwrap();
        handler.clear(session).await;
        assert!(sessions.is_empty());
    }

    #[tokio::test]
    async fn test_add_uses_catalog_price() {
        let (handler, _) = setup().await;
        let session = Uuid::new_v4();

        let item = handler
            .add_item(session, AddToCartCommand::new("2", "3"))
            .await
            .unwrap();

        assert_eq!(item.product_name, "Croissant");
        assert_eq!(item.line_total.to_string(), "9.60");
        assert_eq!(handler.view(session).await.total.to_string(), "9.60");
    }

    #[tokio::test]
    async fn test_add_unknown_product() {
        let (handler, _) = setup().await;
        let result = handler
            .add_item(Uuid::new_v4(), AddToCartCommand::new("99", "1"))
            .await;

        assert!(matches!(
            result,
            Err(AppError::Domain(DomainError::ProductNotFound(99)))
        ));
    }

    #[tokio::test]
    async fn test_add_rejects_bad_quantity() {
        let (handler, _) = setup().await;
        let result = handler
            .add_item(Uuid::new_v4(), AddToCartCommand::new("1", "0"))
            .await;

        assert!(matches!(result, Err(AppError::Domain(DomainError::Validation(_)))));
    }

    #[tokio::test]
    async fn test_checkout_commits_and_clears() {
        let (handler, store) = setup().await;
        let session = Uuid::new_v4();
        handler.add_item(session, AddToCartCommand::new("1", "2")).await.unwrap();
        handler.add_item(session, AddToCartCommand::new("2", "1")).await.unwrap();

        let result = handler.checkout(session).await.unwrap();

        assert_eq!(result.records.len(), 2);
        assert_eq!(result.total.to_string(), "8.20");
        assert!(handler.view(session).await.items.is_empty());

        let ledger = store.list_all().await.unwrap();
        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger[0].amount.to_string(), "5.00");
        assert_eq!(ledger[1].product_name, "Croissant");
    }

    #[tokio::test]
    async fn test_checkout_empty_cart() {
        let (handler, store) = setup().await;
        let result = handler.checkout(Uuid::new_v4()).await;

        assert!(matches!(result, Err(AppError::Domain(DomainError::EmptyCart))));
        assert!(store.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_checkouts_of_two_sessions_get_distinct_codes() {
        let (handler, store) = setup().await;
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        handler.add_item(alice, AddToCartCommand::new("1", "1")).await.unwrap();
        handler.add_item(bob, AddToCartCommand::new("1", "1")).await.unwrap();

        let (a, b) = tokio::join!(handler.checkout(alice), handler.checkout(bob));
        let mut codes = vec![
            a.unwrap().records[0].transaction_code,
            b.unwrap().records[0].transaction_code,
        ];
        codes.sort();

        assert_eq!(codes, vec![1, 2]);
        assert_eq!(store.list_all().await.unwrap().len(), 2);
    }
}
