//! API Middleware
//!
//! Admin basic authentication, cart sessions and request logging.

use std::fmt;

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, HeaderValue, Request},
    middleware::Next,
    response::Response,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::error::AppError;
use crate::sessions::short_session_id;

use super::AppState;

/// Header carrying the customer's cart session
pub const SESSION_HEADER: &str = "x-session-id";

// =========================================================================
// Admin Basic Authentication
// =========================================================================

/// Admin username and the SHA-256 of its password.
///
/// The plain password is never kept after construction.
#[derive(Clone)]
pub struct AdminCredentials {
    username: String,
    password_sha256: String,
}

impl AdminCredentials {
    pub fn new(username: impl Into<String>, password: &str) -> Self {
        Self {
            username: username.into(),
            password_sha256: sha256_hex(password),
        }
    }

    pub fn verify(&self, username: &str, password: &str) -> bool {
        self.username == username && self.password_sha256 == sha256_hex(password)
    }
}

impl fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("username", &self.username)
            .field("password_sha256", &"[REDACTED]")
            .finish()
    }
}

fn sha256_hex(secret: &str) -> String {
    hex::encode(Sha256::digest(secret.as_bytes()))
}

/// Extract `(username, password)` from an `Authorization: Basic` header
pub fn parse_basic_auth(headers: &HeaderMap) -> Option<(String, String)> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let encoded = value.strip_prefix("Basic ")?;
    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (username, password) = decoded.split_once(':')?;
    Some((username.to_string(), password.to_string()))
}

/// Reject admin requests without valid basic credentials
pub async fn basic_auth_middleware(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let authorized = parse_basic_auth(request.headers())
        .map(|(username, password)| state.admin.verify(&username, &password))
        .unwrap_or(false);

    if !authorized {
        tracing::warn!(method = %request.method(), uri = %request.uri(), "Admin authentication failed");
        return Err(AppError::Unauthorized);
    }

    Ok(next.run(request).await)
}

// =========================================================================
// Cart Sessions
// =========================================================================

/// Session of the current shop request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartSession {
    pub id: Uuid,
}

/// Resolve the cart session from `X-Session-Id`.
///
/// A missing or malformed id starts a new session. The id in use is always
/// echoed back on the response.
pub async fn session_middleware(mut request: Request<Body>, next: Next) -> Response {
    let presented = request
        .headers()
        .get(SESSION_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| Uuid::parse_str(s.trim()).ok());

    let session = CartSession {
        id: presented.unwrap_or_else(Uuid::new_v4),
    };
    if presented.is_none() {
        tracing::debug!(session_id = %short_session_id(&session.id.to_string()), "New cart session");
    }

    request.extensions_mut().insert(session);
    let mut response = next.run(request).await;

    if let Ok(value) = HeaderValue::from_str(&session.id.to_string()) {
        response.headers_mut().insert(SESSION_HEADER, value);
    }
    response
}

// =========================================================================
// Request Logging
// =========================================================================

/// Headers that should be masked in logs
const SENSITIVE_HEADERS: &[&str] = &["authorization", "cookie", "set-cookie", SESSION_HEADER];

/// Mask sensitive headers for logging
pub fn mask_headers_for_logging(headers: &HeaderMap) -> Vec<(String, String)> {
    headers
        .iter()
        .map(|(name, value)| {
            let name_lower = name.as_str().to_lowercase();
            let masked_value = if SENSITIVE_HEADERS.contains(&name_lower.as_str()) {
                "[REDACTED]".to_string()
            } else {
                value.to_str().unwrap_or("[invalid utf8]").to_string()
            };
            (name.to_string(), masked_value)
        })
        .collect()
}

/// Request logging middleware
pub async fn logging_middleware(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let headers = mask_headers_for_logging(request.headers());
    let start = std::time::Instant::now();

    tracing::info!(method = %method, uri = %uri, headers = ?headers, "Incoming request");

    let response = next.run(request).await;

    let session_id = response
        .headers()
        .get(SESSION_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(|id| short_session_id(id).to_string());

    tracing::info!(
        method = %method,
        uri = %uri,
        status = %response.status(),
        duration_ms = %start.elapsed().as_millis(),
        session_id = ?session_id,
        "Request completed"
    );

    response
}
