//! # checkout-paypal
//!
//! PayPal Orders v2 REST client for the checkout relay.
//!
//! Implements the two leaf calls of the order lifecycle protocol, plus the
//! status re-query that backs the no-capture-retry policy:
//!
//! ```text
//! ┌─────────────┐  POST /v2/checkout/orders          ┌─────────────┐
//! │    Relay    │───────────────────────────────────▶│   PayPal    │
//! │   Server    │  POST /v2/checkout/orders/{id}/    │  Orders v2  │
//! │             │       capture                      │     API     │
//! │             │  GET  /v2/checkout/orders/{id}     │             │
//! └─────────────┘───────────────────────────────────▶└─────────────┘
//! ```
//!
//! Authentication uses the OAuth2 client-credentials grant; tokens are
//! cached until shortly before expiry. All calls carry a bounded timeout.
//! Capture is never retried here: a lost capture response must be resolved
//! by re-querying order status, not by resubmitting.

mod auth;
mod client;
mod config;
mod rest;

pub use client::PayPalClient;
pub use config::{PayPalConfig, PayPalEnvironment};
