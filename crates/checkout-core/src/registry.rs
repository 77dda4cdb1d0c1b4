//! Issued-Order Registry
//!
//! The relay records every order identifier it creates and refuses to
//! capture identifiers it never issued. Without this check a client could
//! submit an arbitrary processor-issued id and have the relay finalize it.
//! The processor remains the final authority on double capture; the local
//! captured flag is an early rejection, not a consistency guarantee.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::RwLock;

use crate::error::{CheckoutError, Result};
use crate::money::{Amount, CurrencyCode};
use crate::order::OrderId;

/// Record of an order this relay created
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct IssuedOrder {
    /// Processor-issued identifier
    pub order_id: OrderId,

    /// Amount the order was created with
    pub amount: Amount,

    /// Currency the order was created with
    pub currency: CurrencyCode,

    /// Whether this relay has successfully captured the order
    pub captured: bool,

    /// When the order was issued
    pub created_at: DateTime<Utc>,

    /// When the capture succeeded
    pub captured_at: Option<DateTime<Utc>>,
}

impl IssuedOrder {
    /// Record a freshly created order
    pub fn new(order_id: OrderId, amount: Amount, currency: CurrencyCode) -> Self {
        Self {
            order_id,
            amount,
            currency,
            captured: false,
            created_at: Utc::now(),
            captured_at: None,
        }
    }
}

/// Order registry trait
pub trait OrderRegistry: Send + Sync {
    /// Record a newly issued order
    fn record(&self, order: IssuedOrder) -> Result<()>;

    /// Look up an order by id
    fn get(&self, id: &OrderId) -> Result<Option<IssuedOrder>>;

    /// Mark an order captured.
    ///
    /// Fails with `UnknownOrder` for ids this relay never issued and with
    /// `AlreadyCaptured` for ids already marked.
    fn mark_captured(&self, id: &OrderId) -> Result<IssuedOrder>;
}

/// In-memory order registry.
///
/// Completed-transaction persistence is out of scope; a durable
/// implementation of [`OrderRegistry`] would report its faults through
/// `CheckoutError::Storage`.
pub struct MemoryOrderRegistry {
    orders: RwLock<HashMap<OrderId, IssuedOrder>>,
}

impl Default for MemoryOrderRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryOrderRegistry {
    pub fn new() -> Self {
        Self {
            orders: RwLock::new(HashMap::new()),
        }
    }
}

impl OrderRegistry for MemoryOrderRegistry {
    fn record(&self, order: IssuedOrder) -> Result<()> {
        let mut orders = self.orders.write().unwrap();

        tracing::debug!(order_id = %order.order_id, "Recorded issued order");
        orders.insert(order.order_id.clone(), order);

        Ok(())
    }

    fn get(&self, id: &OrderId) -> Result<Option<IssuedOrder>> {
        let orders = self.orders.read().unwrap();
        Ok(orders.get(id).cloned())
    }

    fn mark_captured(&self, id: &OrderId) -> Result<IssuedOrder> {
        let mut orders = self.orders.write().unwrap();

        let order = orders
            .get_mut(id)
            .ok_or_else(|| CheckoutError::UnknownOrder(id.to_string()))?;

        if order.captured {
            return Err(CheckoutError::AlreadyCaptured(id.to_string()));
        }

        order.captured = true;
        order.captured_at = Some(Utc::now());

        Ok(order.clone())
    }
}
