//! Common test utilities
#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, Response},
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde_json::Value;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use coffee_shop::api::{AdminCredentials, AppState, SESSION_HEADER};
use coffee_shop::db;
use coffee_shop::store::MemoryStore;

pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "coffeeShop40";

/// State over a fresh in-memory store
pub fn memory_state(reports_dir: &Path) -> AppState {
    AppState::new(
        Arc::new(MemoryStore::new()),
        reports_dir,
        AdminCredentials::new(ADMIN_USERNAME, ADMIN_PASSWORD),
    )
}

pub fn basic_auth(username: &str, password: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{}:{}", username, password)))
}

/// Authenticated admin request; `form` makes it a urlencoded POST/PUT body
pub fn admin_request(method: &str, uri: &str, form: Option<&str>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, basic_auth(ADMIN_USERNAME, ADMIN_PASSWORD));
    with_form(builder, form)
}

/// Shop request, inside `session` when given
pub fn shop_request(method: &str, uri: &str, session: Option<&str>, form: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(session) = session {
        builder = builder.header(SESSION_HEADER, session);
    }
    with_form(builder, form)
}

fn with_form(builder: axum::http::request::Builder, form: Option<&str>) -> Request<Body> {
    match form {
        Some(form) => builder
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(form.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    to_bytes(response.into_body(), usize::MAX).await.unwrap().to_vec()
}

pub async fn body_json(response: Response<Body>) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

pub fn session_of(response: &Response<Body>) -> String {
    response
        .headers()
        .get(SESSION_HEADER)
        .expect("session header missing")
        .to_str()
        .unwrap()
        .to_string()
}

/// Connect to `DATABASE_URL` and start from empty tables.
///
/// `None` when no database is configured; callers skip.
pub async fn setup_test_db() -> Option<PgPool> {
    dotenvy::dotenv().ok();
    let database_url = std::env::var("DATABASE_URL").ok()?;

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("Failed to connect to DB");

    db::ensure_schema(&pool).await.expect("Failed to create schema");

    sqlx::query("TRUNCATE TABLE products, transactions, tickets")
        .execute(&pool)
        .await
        .expect("Failed to clean up DB");

    Some(pool)
}
