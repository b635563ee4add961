//! Shop Routes
//!
//! Customer catalog, cart and checkout. Each request belongs to the cart
//! session resolved by the session middleware.

use axum::{
    extract::{Extension, State},
    http::StatusCode,
    routing::{get, post},
    Form, Json, Router,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{CartLineItem, Money, Product};
use crate::error::AppError;
use crate::handlers::{AddToCartCommand, CartView, CheckoutResult};

use super::middleware::CartSession;
use super::AppState;

// =========================================================================
// Request/Response types
// =========================================================================

/// Add-to-cart form.
///
/// Other posted fields, such as the catalog page's `productName` and
/// `salePrice`, are ignored: name and price are read from the catalog.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AddToCartForm {
    pub product_id: String,
    pub quantity: String,
}

#[derive(Debug, Serialize)]
pub struct CatalogResponse {
    pub products: Vec<Product>,
}

#[derive(Debug, Serialize)]
pub struct CartResponse {
    pub session_id: Uuid,
    #[serde(flatten)]
    pub cart: CartView,
}

#[derive(Debug, Serialize)]
pub struct AddToCartResponse {
    pub item: CartLineItem,
    pub cart_total: Money,
}

// =========================================================================
// Shop Router
// =========================================================================

pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/catalog", get(catalog))
        .route("/cart", get(view_cart))
        .route("/cart/items", post(add_to_cart))
        .route("/cart/clear", post(clear_cart))
        .route("/cart/checkout", post(checkout))
}

async fn catalog(State(state): State<AppState>) -> Result<Json<CatalogResponse>, AppError> {
    let products = state.catalog_handler().list().await?;
    Ok(Json(CatalogResponse { products }))
}

async fn view_cart(
    State(state): State<AppState>,
    Extension(session): Extension<CartSession>,
) -> Json<CartResponse> {
    let cart = state.cart_handler().view(session.id).await;
    Json(CartResponse {
        session_id: session.id,
        cart,
    })
}

async fn add_to_cart(
    State(state): State<AppState>,
    Extension(session): Extension<CartSession>,
    Form(form): Form<AddToCartForm>,
) -> Result<(StatusCode, Json<AddToCartResponse>), AppError> {
    let handler = state.cart_handler();
    let command = AddToCartCommand::new(form.product_id, form.quantity);

    let item = handler.add_item(session.id, command).await?;
    let cart_total = handler.view(session.id).await.total;

    Ok((StatusCode::CREATED, Json(AddToCartResponse { item, cart_total })))
}

async fn clear_cart(
    State(state): State<AppState>,
    Extension(session): Extension<CartSession>,
) -> StatusCode {
    state.cart_handler().clear(session.id).await;
    StatusCode::NO_CONTENT
}

async fn checkout(
    State(state): State<AppState>,
    Extension(session): Extension<CartSession>,
) -> Result<Json<CheckoutResult>, AppError> {
    Ok(Json(state.cart_handler().checkout(session.id).await?))
}
