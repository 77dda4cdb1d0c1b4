//! # checkout-client
//!
//! The approval surface of the checkout flow: a headless controller that
//! the processor's widget drives through its callbacks.
//!
//! ```text
//!        widget callbacks                    relay server
//! ┌──────────────────────────┐      ┌──────────────────────────┐
//! │ createOrder ─▶ on_create │─────▶│ POST /create-paypal-order│
//! │ onApprove   ─▶ on_approve│─────▶│ POST /capture-paypal-order
//! │ onCancel    ─▶ on_cancel │      └──────────────────────────┘
//! │ onError     ─▶ on_error  │
//! └──────────────────────────┘
//! ```
//!
//! One [`CheckoutController`] instance exists per payment attempt, holding
//! the payment request by value. When the amount changes, the embedding
//! layer tears the widget down and constructs a fresh controller - a stale
//! instance must never charge a stale amount. The controller owns no
//! presentation; tests drive every transition without a real widget.

mod api;
mod controller;

pub use api::{RelayApi, RelayClient};
pub use controller::{CheckoutController, CheckoutPhase};
