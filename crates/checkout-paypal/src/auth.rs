//! OAuth2 Authentication
//!
//! PayPal's REST API authenticates with the client-credentials grant:
//! `POST /v1/oauth2/token` with basic auth, returning a bearer token valid
//! for a few hours. Tokens are cached and refreshed shortly before expiry.

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use tokio::sync::RwLock;

use checkout_core::error::{CheckoutError, Result};

use crate::config::PayPalConfig;

/// Refresh this long before the token actually expires
const EXPIRY_LEEWAY_SECS: i64 = 60;

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

#[derive(Clone, Debug)]
struct CachedToken {
    token: String,
    expires_at: DateTime<Utc>,
}

impl CachedToken {
    fn is_fresh(&self) -> bool {
        Utc::now() + Duration::seconds(EXPIRY_LEEWAY_SECS) < self.expires_at
    }
}

/// Cached access token for the PayPal REST API
pub(crate) struct TokenCache {
    inner: RwLock<Option<CachedToken>>,
}

impl TokenCache {
    pub(crate) fn new() -> Self {
        Self {
            inner: RwLock::new(None),
        }
    }

    /// Get a bearer token, fetching a new one if the cache is stale
    pub(crate) async fn bearer(
        &self,
        http: &reqwest::Client,
        config: &PayPalConfig,
    ) -> Result<String> {
        {
            let cached = self.inner.read().await;
            if let Some(token) = cached.as_ref().filter(|t| t.is_fresh()) {
                return Ok(token.token.clone());
            }
        }

        let mut cached = self.inner.write().await;
        // Another task may have refreshed while we waited for the lock
        if let Some(token) = cached.as_ref().filter(|t| t.is_fresh()) {
            return Ok(token.token.clone());
        }

        let fetched = fetch_token(http, config).await?;
        let token = fetched.token.clone();
        *cached = Some(fetched);

        Ok(token)
    }
}

async fn fetch_token(http: &reqwest::Client, config: &PayPalConfig) -> Result<CachedToken> {
    let url = format!("{}/v1/oauth2/token", config.api_base());

    let response = http
        .post(&url)
        .basic_auth(&config.client_id, Some(&config.client_secret))
        .form(&[("grant_type", "client_credentials")])
        .send()
        .await?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        tracing::warn!(%status, "PayPal token request rejected");
        return Err(CheckoutError::Upstream(format!(
            "authentication failed ({}): {}",
            status, body
        )));
    }

    let token: TokenResponse = response.json().await?;
    tracing::debug!(expires_in = token.expires_in, "Fetched PayPal access token");

    Ok(CachedToken {
        token: token.access_token,
        expires_at: Utc::now() + Duration::seconds(token.expires_in),
    })
}
