//! Admin Routes
//!
//! Catalog maintenance, ticket log, ledger browsing and monthly reports.
//! Every route here sits behind basic authentication.

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::{DomainError, Period, Product, Ticket, TransactionRecord};
use crate::error::AppError;
use crate::handlers::SaveProductCommand;
use crate::report::ReportFile;

use super::AppState;

// =========================================================================
// Request/Response types
// =========================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductForm {
    pub name: String,
    pub purchase_price: String,
    pub sale_price: String,
}

impl From<ProductForm> for SaveProductCommand {
    fn from(form: ProductForm) -> Self {
        SaveProductCommand::new(form.name, form.purchase_price, form.sale_price)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct TicketForm {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ReportForm {
    pub month: String,
    pub year: String,
}

/// Inclusive day range, `YYYY-MM-DD`
#[derive(Debug, Default, Deserialize)]
pub struct TransactionsQuery {
    pub start: Option<String>,
    pub end: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ProductListResponse {
    pub products: Vec<Product>,
}

#[derive(Debug, Serialize)]
pub struct TicketListResponse {
    pub tickets: Vec<Ticket>,
}

#[derive(Debug, Serialize)]
pub struct TransactionListResponse {
    pub transactions: Vec<TransactionRecord>,
    pub total: Decimal,
}

#[derive(Debug, Serialize)]
pub struct PeriodListResponse {
    pub periods: Vec<Period>,
}

// =========================================================================
// Admin Router
// =========================================================================

pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/products", get(list_products).post(create_product))
        .route(
            "/products/:id",
            get(get_product).put(update_product).delete(delete_product),
        )
        .route("/tickets", get(list_tickets).post(open_ticket))
        .route("/transactions", get(list_transactions))
        .route("/reports", post(generate_report))
        .route("/reports/periods", get(list_periods))
        .route("/reports/:month/:year", get(download_report))
}

// =========================================================================
// Products
// =========================================================================

async fn list_products(State(state): State<AppState>) -> Result<Json<ProductListResponse>, AppError> {
    let products = state.catalog_handler().list().await?;
    Ok(Json(ProductListResponse { products }))
}

async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Product>, AppError> {
    Ok(Json(state.catalog_handler().get(id).await?))
}

async fn create_product(
    State(state): State<AppState>,
    Form(form): Form<ProductForm>,
) -> Result<(StatusCode, Json<Product>), AppError> {
    let product = state.catalog_handler().create(form.into()).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Form(form): Form<ProductForm>,
) -> Result<Json<Product>, AppError> {
    Ok(Json(state.catalog_handler().update(id, form.into()).await?))
}

async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state.catalog_handler().delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// =========================================================================
// Tickets
// =========================================================================

async fn list_tickets(State(state): State<AppState>) -> Result<Json<TicketListResponse>, AppError> {
    let tickets = state.tickets.list().await?;
    Ok(Json(TicketListResponse { tickets }))
}

async fn open_ticket(
    State(state): State<AppState>,
    Form(form): Form<TicketForm>,
) -> Result<(StatusCode, Json<Ticket>), AppError> {
    let ticket = Ticket::open(&form.title, &form.description)?;
    state.tickets.append(ticket.clone()).await?;

    tracing::info!(title = %ticket.title, "Ticket opened");
    Ok((StatusCode::CREATED, Json(ticket)))
}

// =========================================================================
// Ledger
// =========================================================================

async fn list_transactions(
    State(state): State<AppState>,
    Query(query): Query<TransactionsQuery>,
) -> Result<Json<TransactionListResponse>, AppError> {
    let transactions = match (query.start.as_deref(), query.end.as_deref()) {
        (None, None) => state.ledger.list_all().await?,
        (Some(start), Some(end)) => {
            let (start, end) = parse_day_range(start, end)?;
            state.ledger.query_by_date_range(start, end).await?
        }
        _ => {
            return Err(AppError::InvalidRequest(
                "start and end must be given together".to_string(),
            ))
        }
    };

    // Ledger totals are not bounded by the `Money` maximum
    let total = transactions
        .iter()
        .fold(Decimal::new(0, 2), |acc, t| acc + t.amount.value());
    Ok(Json(TransactionListResponse { transactions, total }))
}

/// Turn two calendar days into an inclusive timestamp range covering both
/// days entirely.
fn parse_day_range(start: &str, end: &str) -> Result<(DateTime<Utc>, DateTime<Utc>), DomainError> {
    let parse = |raw: &str| {
        NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
            .map_err(|_| DomainError::validation(format!("invalid date {:?}, expected YYYY-MM-DD", raw)))
    };
    let start_day = parse(start)?;
    let end_day = parse(end)?;
    if end_day < start_day {
        return Err(DomainError::validation("end date is before start date"));
    }

    let start = start_day.and_time(NaiveTime::MIN).and_utc();
    let end = end_day
        .succ_opt()
        .map(|next| next.and_time(NaiveTime::MIN).and_utc() - Duration::microseconds(1))
        .ok_or_else(|| DomainError::validation("end date out of range"))?;
    Ok((start, end))
}

// =========================================================================
// Reports
// =========================================================================

async fn list_periods(State(state): State<AppState>) -> Result<Json<PeriodListResponse>, AppError> {
    let periods = state.reports().list_distinct_periods().await?;
    Ok(Json(PeriodListResponse { periods }))
}

async fn generate_report(
    State(state): State<AppState>,
    Form(form): Form<ReportForm>,
) -> Result<(StatusCode, Json<ReportFile>), AppError> {
    let period = Period::parse(&form.month, &form.year)?;
    let file = state.reports().export(period).await?;
    Ok((StatusCode::CREATED, Json(file)))
}

async fn download_report(
    State(state): State<AppState>,
    Path((month, year)): Path<(String, String)>,
) -> Result<Response, AppError> {
    let period = Period::parse(&month, &year)?;
    let file_name = period.report_file_name();
    let bytes = state
        .reports()
        .read_export(period)
        .await?
        .ok_or_else(|| AppError::NotFound(file_name.clone()))?;

    let headers = [
        (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", file_name),
        ),
    ];
    Ok((headers, bytes).into_response())
}
