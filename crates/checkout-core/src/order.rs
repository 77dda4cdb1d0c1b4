//! Order Lifecycle Types
//!
//! The processor owns the order; these types model what the relay sends
//! (a purchase intent) and what it observes back (identifiers, statuses,
//! and the normalized capture result).

use serde::{Deserialize, Serialize};

use crate::error::{CheckoutError, Result};
use crate::money::{Amount, CurrencyCode};

/// Opaque order identifier issued by the processor.
///
/// The single correlation key of the protocol: it must flow unchanged from
/// the creation response to the capture request.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderId(String);

impl OrderId {
    /// Parse an identifier, rejecting empty strings
    pub fn parse(s: impl Into<String>) -> Result<Self> {
        let id = s.into();
        if id.trim().is_empty() {
            return Err(CheckoutError::Validation("order id must not be empty".into()));
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Order status as reported by the processor.
///
/// Unrecognized values pass through as `Other` rather than failing the
/// call; the processor is the authority on its own vocabulary.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OrderStatus {
    Created,
    PayerActionRequired,
    Approved,
    Completed,
    Declined,
    Failed,
    Other(String),
}

impl OrderStatus {
    pub fn as_str(&self) -> &str {
        match self {
            OrderStatus::Created => "CREATED",
            OrderStatus::PayerActionRequired => "PAYER_ACTION_REQUIRED",
            OrderStatus::Approved => "APPROVED",
            OrderStatus::Completed => "COMPLETED",
            OrderStatus::Declined => "DECLINED",
            OrderStatus::Failed => "FAILED",
            OrderStatus::Other(s) => s,
        }
    }

    /// True only for the terminal success status.
    ///
    /// A capture response can carry any other status inside a 2xx reply;
    /// callers must check this instead of the transport outcome alone.
    pub fn is_terminal_success(&self) -> bool {
        matches!(self, OrderStatus::Completed)
    }
}

impl From<String> for OrderStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "CREATED" => OrderStatus::Created,
            "PAYER_ACTION_REQUIRED" => OrderStatus::PayerActionRequired,
            "APPROVED" => OrderStatus::Approved,
            "COMPLETED" => OrderStatus::Completed,
            "DECLINED" => OrderStatus::Declined,
            "FAILED" => OrderStatus::Failed,
            _ => OrderStatus::Other(s),
        }
    }
}

impl From<OrderStatus> for String {
    fn from(status: OrderStatus) -> Self {
        status.as_str().to_string()
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What the user asked to pay: amount plus currency.
///
/// Ephemeral, created per interaction, never persisted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRequest {
    pub amount: Amount,
    pub currency: CurrencyCode,
}

impl PaymentRequest {
    pub fn new(amount: Amount, currency: CurrencyCode) -> Self {
        Self { amount, currency }
    }
}

/// A single-line-item purchase intent sent to the processor.
///
/// Maps 1:1 to a [`PaymentRequest`]; a fresh intent is built on every
/// initiation call, never cached or retried.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OrderIntent {
    pub amount: Amount,
    pub currency: CurrencyCode,
    pub description: String,
}

impl OrderIntent {
    pub fn new(amount: Amount, currency: CurrencyCode, description: impl Into<String>) -> Self {
        Self {
            amount,
            currency,
            description: description.into(),
        }
    }
}

/// Result of opening a purchase intent with the processor
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OrderCreated {
    pub id: OrderId,
    pub status: OrderStatus,
}

/// Who paid, as reported by the processor after capture
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payer {
    pub email: String,
    /// Given name and surname joined with a single space
    pub name: String,
}

/// The captured monetary amount, from the first purchase unit's first
/// capture record
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapturedAmount {
    pub value: Amount,
    pub currency: CurrencyCode,
}

/// Normalized capture outcome - the relay's output contract.
///
/// This is the one record a downstream collaborator (a ledger) would
/// persist. `success` reflects the transport outcome only; `status` is the
/// processor's word and must be inspected separately, since a declined
/// capture can ride inside an otherwise successful response.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CaptureResult {
    pub success: bool,

    #[serde(rename = "orderID")]
    pub order_id: OrderId,

    pub status: OrderStatus,

    pub payer: Payer,

    pub amount: CapturedAmount,
}
