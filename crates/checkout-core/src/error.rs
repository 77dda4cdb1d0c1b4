//! Error Types

use thiserror::Error;

/// Result type alias for checkout operations
pub type Result<T> = std::result::Result<T, CheckoutError>;

/// Checkout error taxonomy
///
/// `Validation` failures are raised before any network call; `Upstream`
/// means the processor rejected or failed the call; `Network` is a
/// transport fault reaching the processor or relay. User cancellation is
/// not an error and never appears here.
#[derive(Error, Debug)]
pub enum CheckoutError {
    /// Malformed local input, rejected before contacting the processor
    #[error("Validation error: {0}")]
    Validation(String),

    /// The processor rejected or failed the call
    #[error("Processor error: {0}")]
    Upstream(String),

    /// Transport failure reaching the processor or relay
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Missing or invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Capture requested for an order this relay never issued
    #[error("Unknown order: {0}")]
    UnknownOrder(String),

    /// Capture requested for an order already captured by this relay
    #[error("Order already captured: {0}")]
    AlreadyCaptured(String),

    /// Order registry fault
    #[error("Storage error: {0}")]
    Storage(String),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CheckoutError {
    /// Check if the operation may be retried.
    ///
    /// Only transport failures qualify, and capture callers must still
    /// re-query order status before resubmitting: a lost response does not
    /// mean the capture failed upstream.
    pub fn is_retryable(&self) -> bool {
        matches!(self, CheckoutError::Network(_))
    }

    /// Convert to a message safe to show an end user
    pub fn user_message(&self) -> String {
        match self {
            CheckoutError::Validation(msg) => format!("Invalid payment details: {}", msg),
            CheckoutError::Upstream(_) => "Payment processing failed. Please try again.".into(),
            CheckoutError::Network(_) => {
                "Could not reach the payment service. Please check your connection.".into()
            }
            CheckoutError::Config(_) => "Payments are not configured on this server.".into(),
            CheckoutError::UnknownOrder(_) => "This order is not known to the server.".into(),
            CheckoutError::AlreadyCaptured(_) => "This payment was already completed.".into(),
            _ => "An error occurred processing your payment.".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_network_errors_are_retryable() {
        assert!(!CheckoutError::Validation("bad amount".into()).is_retryable());
        assert!(!CheckoutError::Upstream("ORDER_ALREADY_CAPTURED".into()).is_retryable());
        assert!(!CheckoutError::UnknownOrder("X".into()).is_retryable());
    }

    #[test]
    fn user_messages_hide_internals() {
        let err = CheckoutError::Upstream("AUTHENTICATION_FAILURE: bad client secret".into());
        assert!(!err.user_message().contains("client secret"));
    }
}
