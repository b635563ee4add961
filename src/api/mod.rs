//! API module
//!
//! The two HTTP surfaces: the admin server (basic auth) and the customer
//! shop server (cart sessions). Both share one `AppState`.

pub mod admin;
pub mod middleware;
pub mod shop;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    middleware::{from_fn, from_fn_with_state},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;

use crate::handlers::{CartHandler, CatalogHandler};
use crate::report::ReportGenerator;
use crate::sessions::CartSessions;
use crate::store::{CatalogStore, LedgerStore, TicketLog};

pub use middleware::{AdminCredentials, CartSession, SESSION_HEADER};

/// Shared state of both servers
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<dyn CatalogStore>,
    pub ledger: Arc<dyn LedgerStore>,
    pub tickets: Arc<dyn TicketLog>,
    pub carts: CartSessions,
    pub reports_dir: PathBuf,
    pub admin: AdminCredentials,
}

impl AppState {
    /// State over one store implementing every storage interface
    pub fn new<S>(store: Arc<S>, reports_dir: impl Into<PathBuf>, admin: AdminCredentials) -> Self
    where
        S: CatalogStore + LedgerStore + TicketLog + 'static,
    {
        Self {
            catalog: store.clone(),
            ledger: store.clone(),
            tickets: store,
            carts: CartSessions::new(),
            reports_dir: reports_dir.into(),
            admin,
        }
    }

    /// Sweep cart sessions idle for longer than `timeout`
    pub fn with_session_idle_timeout(mut self, timeout: Duration) -> Self {
        self.carts = CartSessions::with_idle_timeout(timeout);
        self
    }

    pub fn catalog_handler(&self) -> CatalogHandler {
        CatalogHandler::new(self.catalog.clone())
    }

    pub fn cart_handler(&self) -> CartHandler {
        CartHandler::new(self.catalog.clone(), self.ledger.clone(), self.carts.clone())
    }

    pub fn reports(&self) -> ReportGenerator {
        ReportGenerator::new(self.ledger.clone(), self.reports_dir.clone())
    }
}

/// Admin application: `/health` open, everything else behind basic auth
pub fn build_admin_app(state: AppState) -> Router {
    let protected = admin::create_router()
        .layer(from_fn_with_state(state.clone(), middleware::basic_auth_middleware))
        .layer(from_fn(middleware::logging_middleware));

    Router::new()
        .route("/health", get(health_check))
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Shop application: every route except `/health` runs in a cart session
pub fn build_shop_app(state: AppState) -> Router {
    let sessioned = shop::create_router()
        .layer(from_fn(middleware::session_middleware))
        .layer(from_fn(middleware::logging_middleware));

    Router::new()
        .route("/health", get(health_check))
        .merge(sessioned)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION")
    }))
}
