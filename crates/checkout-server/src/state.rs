//! Application State

use std::sync::Arc;

use checkout_core::MemoryOrderRegistry;
use checkout_paypal::PayPalClient;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// PayPal client (None if credentials are not configured)
    pub paypal: Option<Arc<PayPalClient>>,

    /// Registry of orders this relay issued, checked before capture
    pub orders: Arc<MemoryOrderRegistry>,
}

impl AppState {
    pub fn new(paypal: Option<PayPalClient>) -> Self {
        Self {
            paypal: paypal.map(Arc::new),
            orders: Arc::new(MemoryOrderRegistry::new()),
        }
    }
}
