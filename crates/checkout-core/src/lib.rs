//! # checkout-core
//!
//! Domain model and order lifecycle protocol shared by the checkout relay
//! server and the client-side checkout controller.
//!
//! ## Order lifecycle
//!
//! ```text
//! ┌────────────┐  create   ┌──────────────┐  capture  ┌────────────┐
//! │  Checkout  │──────────▶│    Relay     │──────────▶│   PayPal   │
//! │ Controller │           │    Server    │           │  Orders v2 │
//! └────────────┘           └──────────────┘           └────────────┘
//!       │                         │
//!       │   user approves inside  │   CREATED ─▶ APPROVED ─▶ COMPLETED
//!       └── the processor widget ─┘
//! ```
//!
//! The processor owns the order; this crate only models what the relay
//! observes: the intent it sends, the identifiers it receives, and the
//! normalized capture result a downstream ledger would persist.

pub mod error;
pub mod money;
pub mod order;
pub mod registry;

pub use error::{CheckoutError, Result};
pub use money::{Amount, CurrencyCode};
pub use order::{
    CaptureResult, CapturedAmount, OrderCreated, OrderId, OrderIntent, OrderStatus, Payer,
    PaymentRequest,
};
pub use registry::{IssuedOrder, MemoryOrderRegistry, OrderRegistry};
