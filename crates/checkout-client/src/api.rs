//! Relay API Client
//!
//! HTTP access to the relay server, behind a trait so controller tests can
//! substitute a scripted double.

use async_trait::async_trait;
use serde::Deserialize;

use checkout_core::error::{CheckoutError, Result};
use checkout_core::{CaptureResult, OrderCreated, OrderId, PaymentRequest};

/// Relay access used by the checkout controller (Strategy pattern)
#[async_trait]
pub trait RelayApi: Send + Sync {
    /// Ask the relay to open a purchase intent for this request
    async fn create_order(&self, request: &PaymentRequest, request_id: &str)
        -> Result<OrderCreated>;

    /// Ask the relay to capture an approved order
    async fn capture_order(&self, order_id: &OrderId) -> Result<CaptureResult>;
}

/// reqwest-backed relay client
pub struct RelayClient {
    http: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct RelayError {
    #[serde(default)]
    error: Option<String>,
}

impl RelayClient {
    /// Create a client for the relay at `base_url`
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    async fn relay_error(response: reqwest::Response) -> CheckoutError {
        let status = response.status();
        let message = response
            .json::<RelayError>()
            .await
            .ok()
            .and_then(|body| body.error)
            .unwrap_or_else(|| format!("relay returned {}", status));
        CheckoutError::Upstream(message)
    }
}

#[async_trait]
impl RelayApi for RelayClient {
    async fn create_order(
        &self,
        request: &PaymentRequest,
        request_id: &str,
    ) -> Result<OrderCreated> {
        let response = self
            .http
            .post(format!("{}/create-paypal-order", self.base_url))
            .json(&serde_json::json!({
                "amount": request.amount.to_string(),
                "currency": request.currency.as_str(),
                "request_id": request_id,
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::relay_error(response).await);
        }

        Ok(response.json().await?)
    }

    async fn capture_order(&self, order_id: &OrderId) -> Result<CaptureResult> {
        let response = self
            .http
            .post(format!("{}/capture-paypal-order", self.base_url))
            .json(&serde_json::json!({ "orderID": order_id.as_str() }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::relay_error(response).await);
        }

        Ok(response.json().await?)
    }
}
