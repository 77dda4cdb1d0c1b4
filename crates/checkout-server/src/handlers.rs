//! HTTP Handlers
//!
//! Each endpoint validates locally, delegates to the PayPal client, and
//! converts every failure into a structured JSON error body. Nothing in
//! here is allowed to crash the process.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};

use checkout_core::error::CheckoutError;
use checkout_core::{
    Amount, CaptureResult, CurrencyCode, IssuedOrder, OrderId, OrderIntent, OrderRegistry,
};

use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    /// Amount as a decimal string or JSON number; parsed without float math
    pub amount: serde_json::Value,

    #[serde(default)]
    pub currency: Option<String>,

    /// Caller-supplied idempotency token, forwarded to the processor
    #[serde(default)]
    pub request_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreateOrderResponse {
    pub id: String,
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct CaptureOrderRequest {
    #[serde(rename = "orderID")]
    pub order_id: String,
}

#[derive(Debug, Serialize)]
pub struct CaptureErrorResponse {
    pub success: bool,
    pub error: String,
    pub code: &'static str,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub message: &'static str,
    pub version: &'static str,
    pub environment: Option<String>,
    pub paypal_configured: bool,
}

/// Map an error to its HTTP status and stable machine code
fn status_for(err: &CheckoutError) -> (StatusCode, &'static str) {
    match err {
        CheckoutError::Validation(_) => (StatusCode::BAD_REQUEST, "INVALID_REQUEST"),
        CheckoutError::UnknownOrder(_) => (StatusCode::NOT_FOUND, "UNKNOWN_ORDER"),
        CheckoutError::AlreadyCaptured(_) => (StatusCode::CONFLICT, "ALREADY_CAPTURED"),
        CheckoutError::Network(_) => (StatusCode::BAD_GATEWAY, "UPSTREAM_UNREACHABLE"),
        CheckoutError::Upstream(_) => (StatusCode::INTERNAL_SERVER_ERROR, "PROCESSOR_ERROR"),
        CheckoutError::Config(_) => (StatusCode::SERVICE_UNAVAILABLE, "PAYMENTS_DISABLED"),
        _ => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
    }
}

fn error_response(err: &CheckoutError) -> (StatusCode, Json<ErrorResponse>) {
    let (status, code) = status_for(err);
    (
        status,
        Json(ErrorResponse {
            error: err.to_string(),
            code,
        }),
    )
}

fn capture_error_response(err: &CheckoutError) -> (StatusCode, Json<CaptureErrorResponse>) {
    let (status, code) = status_for(err);
    (
        status,
        Json(CaptureErrorResponse {
            success: false,
            error: err.to_string(),
            code,
        }),
    )
}

// ============================================================================
// Handlers
// ============================================================================

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK",
        message: "PayPal payment relay running",
        version: env!("CARGO_PKG_VERSION"),
        environment: state.paypal.as_ref().map(|p| p.environment().to_string()),
        paypal_configured: state.paypal.is_some(),
    })
}

/// Create a PayPal order for the requested amount.
///
/// Validation failures are rejected here; the processor is only contacted
/// with a well-formed intent. Every issued order id is recorded in the
/// registry so capture can verify it later.
pub async fn create_order(
    State(state): State<AppState>,
    Json(payload): Json<CreateOrderRequest>,
) -> Result<Json<CreateOrderResponse>, (StatusCode, Json<ErrorResponse>)> {
    let paypal = state.paypal.as_ref().ok_or_else(|| {
        error_response(&CheckoutError::Config("payments not configured".into()))
    })?;

    let amount = Amount::from_json(&payload.amount).map_err(|e| error_response(&e))?;
    let currency = match payload.currency.as_deref() {
        Some(c) => CurrencyCode::parse(c).map_err(|e| error_response(&e))?,
        None => CurrencyCode::default(),
    };

    tracing::debug!(%amount, %currency, "Create order request received");

    let intent = OrderIntent::new(amount, currency.clone(), paypal.order_description());
    let created = paypal
        .create_order(&intent, payload.request_id.as_deref())
        .await
        .map_err(|e| {
            tracing::error!("Create order failed: {}", e);
            error_response(&e)
        })?;

    state
        .orders
        .record(IssuedOrder::new(created.id.clone(), amount, currency))
        .map_err(|e| error_response(&e))?;

    Ok(Json(CreateOrderResponse {
        id: created.id.to_string(),
        status: created.status.to_string(),
    }))
}

/// Capture a previously approved order.
///
/// Only order ids this relay issued are accepted, and each at most once
/// locally; the processor remains the final authority on double capture.
pub async fn capture_order(
    State(state): State<AppState>,
    Json(payload): Json<CaptureOrderRequest>,
) -> Result<Json<CaptureResult>, (StatusCode, Json<CaptureErrorResponse>)> {
    let paypal = state.paypal.as_ref().ok_or_else(|| {
        capture_error_response(&CheckoutError::Config("payments not configured".into()))
    })?;

    let order_id = OrderId::parse(payload.order_id).map_err(|e| capture_error_response(&e))?;

    let issued = state
        .orders
        .get(&order_id)
        .map_err(|e| capture_error_response(&e))?
        .ok_or_else(|| {
            tracing::warn!(order_id = %order_id, "Capture refused: order not issued here");
            capture_error_response(&CheckoutError::UnknownOrder(order_id.to_string()))
        })?;

    if issued.captured {
        return Err(capture_error_response(&CheckoutError::AlreadyCaptured(
            order_id.to_string(),
        )));
    }

    let result = paypal.capture_order(&order_id).await.map_err(|e| {
        tracing::error!(order_id = %order_id, "Capture failed: {}", e);
        capture_error_response(&e)
    })?;

    state
        .orders
        .mark_captured(&order_id)
        .map_err(|e| capture_error_response(&e))?;

    Ok(Json(result))
}
