//! PayPal Client Configuration

use checkout_core::error::{CheckoutError, Result};

/// Which PayPal environment to call
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PayPalEnvironment {
    /// Test mode with sandbox money
    Sandbox,
    /// Real money transactions
    Live,
}

impl PayPalEnvironment {
    /// REST API base URL for this environment
    pub fn api_base(&self) -> &'static str {
        match self {
            PayPalEnvironment::Sandbox => "https://api-m.sandbox.paypal.com",
            PayPalEnvironment::Live => "https://api-m.paypal.com",
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            PayPalEnvironment::Sandbox => "sandbox",
            PayPalEnvironment::Live => "live",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "live" | "production" => PayPalEnvironment::Live,
            _ => PayPalEnvironment::Sandbox,
        }
    }
}

impl std::fmt::Display for PayPalEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// PayPal client configuration
#[derive(Clone, Debug)]
pub struct PayPalConfig {
    /// REST API client id
    pub client_id: String,

    /// REST API client secret
    pub client_secret: String,

    /// Sandbox or live
    pub environment: PayPalEnvironment,

    /// Upstream call timeout in seconds.
    ///
    /// Bounded so a hung processor call fails the request instead of
    /// hanging it indefinitely.
    pub timeout_secs: u64,

    /// Line-item description attached to every purchase intent
    pub order_description: String,

    /// API base URL override (stub servers in tests)
    pub api_base: Option<String>,
}

impl PayPalConfig {
    /// Create a configuration with default timeout and description
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            environment: PayPalEnvironment::Sandbox,
            timeout_secs: 30,
            order_description: "Test Payment Product".into(),
            api_base: None,
        }
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self> {
        let client_id = std::env::var("PAYPAL_CLIENT_ID")
            .map_err(|_| CheckoutError::Config("PAYPAL_CLIENT_ID not set".into()))?;
        let client_secret = std::env::var("PAYPAL_CLIENT_SECRET")
            .map_err(|_| CheckoutError::Config("PAYPAL_CLIENT_SECRET not set".into()))?;

        let environment = std::env::var("PAYPAL_ENV")
            .map(|v| PayPalEnvironment::from_str(&v))
            .unwrap_or(PayPalEnvironment::Sandbox);
        let timeout_secs = std::env::var("PAYPAL_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(30);
        let order_description = std::env::var("ORDER_DESCRIPTION")
            .unwrap_or_else(|_| "Test Payment Product".into());

        Ok(Self {
            environment,
            timeout_secs,
            order_description,
            ..Self::new(client_id, client_secret)
        })
    }

    /// Effective API base URL (override wins over environment)
    pub fn api_base(&self) -> &str {
        self.api_base
            .as_deref()
            .unwrap_or_else(|| self.environment.api_base())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn environment_parses_loosely() {
        assert_eq!(PayPalEnvironment::from_str("live"), PayPalEnvironment::Live);
        assert_eq!(PayPalEnvironment::from_str("Production"), PayPalEnvironment::Live);
        assert_eq!(PayPalEnvironment::from_str("sandbox"), PayPalEnvironment::Sandbox);
        assert_eq!(PayPalEnvironment::from_str("anything"), PayPalEnvironment::Sandbox);
    }

    #[test]
    fn override_wins_over_environment() {
        let mut config = PayPalConfig::new("id", "secret");
        assert_eq!(config.api_base(), "https://api-m.sandbox.paypal.com");

        config.api_base = Some("http://127.0.0.1:9000".into());
        assert_eq!(config.api_base(), "http://127.0.0.1:9000");
    }
}
