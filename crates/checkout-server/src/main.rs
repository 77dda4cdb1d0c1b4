//! PayPal Checkout Relay Server
//!
//! Axum-based relay between the browser checkout controller and PayPal's
//! Orders v2 API. Two client requests (create order, capture order) become
//! authenticated processor calls; results come back normalized.

mod handlers;
mod state;

use axum::{
    http::{header::CONTENT_TYPE, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use checkout_paypal::PayPalClient;

use crate::handlers::{capture_order, create_order, health_check};
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment
    dotenvy::dotenv().ok();

    // Initialize the PayPal client
    let paypal = match PayPalClient::from_env() {
        Ok(client) => {
            tracing::info!("✓ PayPal configured ({} environment)", client.environment());
            Some(client)
        }
        Err(e) => {
            tracing::warn!("⚠ PayPal not configured - payments disabled: {}", e);
            tracing::warn!("  Set PAYPAL_CLIENT_ID and PAYPAL_CLIENT_SECRET in .env");
            None
        }
    };

    let state = AppState::new(paypal);

    // CORS: only the configured frontend origin may call the relay
    let frontend_origin =
        std::env::var("FRONTEND_ORIGIN").unwrap_or_else(|_| "http://localhost:5173".into());
    let cors = CorsLayer::new()
        .allow_origin(frontend_origin.parse::<HeaderValue>()?)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE])
        .allow_credentials(true);

    // Build router
    let app = Router::new()
        .route("/health", get(health_check))
        .route("/create-paypal-order", post(create_order))
        .route("/capture-paypal-order", post(capture_order))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:5000".into());
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("🚀 checkout relay running on http://{}", addr);
    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("");
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health               - Health check");
    tracing::info!("  POST /create-paypal-order  - Open a purchase intent");
    tracing::info!("  POST /capture-paypal-order - Finalize an approved order");
    tracing::info!("");
    tracing::info!("Allowed origin: {}", frontend_origin);

    axum::serve(listener, app).await?;

    Ok(())
}
