//! PayPal Orders Client
//!
//! The Order Initiator and Capture Executor leaf calls, normalized into
//! domain types. One client instance is shared across relay requests.

use std::time::Duration;

use checkout_core::error::{CheckoutError, Result};
use checkout_core::{CaptureResult, OrderCreated, OrderId, OrderIntent, OrderStatus};

use crate::auth::TokenCache;
use crate::config::PayPalConfig;
use crate::rest::{ApiError, CaptureResponse, CreateOrderBody, OrderResponse};

/// PayPal REST client
pub struct PayPalClient {
    http: reqwest::Client,
    config: PayPalConfig,
    token: TokenCache,
}

impl PayPalClient {
    /// Create a new client with a bounded request timeout
    pub fn new(config: PayPalConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            config,
            token: TokenCache::new(),
        })
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self> {
        Self::new(PayPalConfig::from_env()?)
    }

    /// The configured environment (sandbox/live)
    pub fn environment(&self) -> crate::config::PayPalEnvironment {
        self.config.environment
    }

    /// Line-item description attached to purchase intents
    pub fn order_description(&self) -> &str {
        &self.config.order_description
    }

    /// Open a purchase intent with the processor.
    ///
    /// Not idempotent on its own: two calls with the same intent create two
    /// distinct orders. Callers that may retry should pass `request_id`,
    /// forwarded as `PayPal-Request-Id`, so the processor deduplicates.
    pub async fn create_order(
        &self,
        intent: &OrderIntent,
        request_id: Option<&str>,
    ) -> Result<OrderCreated> {
        let bearer = self.token.bearer(&self.http, &self.config).await?;
        let url = format!("{}/v2/checkout/orders", self.config.api_base());

        let mut request = self
            .http
            .post(&url)
            .bearer_auth(bearer)
            .header("Prefer", "return=representation")
            .json(&CreateOrderBody::from_intent(intent));
        if let Some(id) = request_id {
            request = request.header("PayPal-Request-Id", id);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(upstream_error("create order", response).await);
        }

        let order: OrderResponse = response.json().await?;
        tracing::info!(order_id = %order.id, status = %order.status, "Order created");

        Ok(OrderCreated {
            id: OrderId::parse(order.id)?,
            status: OrderStatus::from(order.status),
        })
    }

    /// Finalize a previously approved order, moving funds.
    ///
    /// Sends an empty body (no partial-capture override). This call is
    /// never retried: if the response is lost, use [`Self::get_order`] to
    /// learn what actually happened before doing anything else.
    pub async fn capture_order(&self, order_id: &OrderId) -> Result<CaptureResult> {
        let bearer = self.token.bearer(&self.http, &self.config).await?;
        let url = format!(
            "{}/v2/checkout/orders/{}/capture",
            self.config.api_base(),
            order_id
        );

        let response = self
            .http
            .post(&url)
            .bearer_auth(bearer)
            .header("Prefer", "return=representation")
            .json(&serde_json::json!({}))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(upstream_error("capture order", response).await);
        }

        let capture: CaptureResponse = response.json().await?;
        let result = capture.into_capture_result()?;
        tracing::info!(order_id = %result.order_id, status = %result.status, "Payment captured");

        Ok(result)
    }

    /// Re-query order status.
    ///
    /// The recovery path after a lost capture response: callers must check
    /// here whether the capture actually went through before resubmitting.
    pub async fn get_order(&self, order_id: &OrderId) -> Result<OrderCreated> {
        let bearer = self.token.bearer(&self.http, &self.config).await?;
        let url = format!("{}/v2/checkout/orders/{}", self.config.api_base(), order_id);

        let response = self.http.get(&url).bearer_auth(bearer).send().await?;
        if !response.status().is_success() {
            return Err(upstream_error("get order", response).await);
        }

        let order: OrderResponse = response.json().await?;
        Ok(OrderCreated {
            id: OrderId::parse(order.id)?,
            status: OrderStatus::from(order.status),
        })
    }
}

/// Convert a non-2xx processor response into an `Upstream` error
async fn upstream_error(operation: &str, response: reqwest::Response) -> CheckoutError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let message = ApiError::message_from(&body);

    tracing::error!(%status, operation, "PayPal call rejected: {}", message);
    CheckoutError::Upstream(message)
}
