//! Monetary Amounts
//!
//! Uses `rust_decimal` for all monetary values - never use f64 for money!
//! Amounts cross the wire as fixed two-decimal strings.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{CheckoutError, Result};

/// A positive monetary amount, normalized to exactly two fractional digits.
///
/// Construction truncates extra fractional digits toward zero (`9.999`
/// becomes `9.99`); zero, negative, and non-numeric inputs are rejected.
/// Serializes as a fixed two-decimal string (`"10.00"`), never as a float.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Amount(Decimal);

impl Amount {
    /// Create from a decimal value, normalizing to two fractional digits
    pub fn new(value: Decimal) -> Result<Self> {
        if value <= Decimal::ZERO {
            return Err(CheckoutError::Validation(format!(
                "amount must be positive, got {}",
                value
            )));
        }

        let mut normalized = value.round_dp_with_strategy(2, RoundingStrategy::ToZero);
        if normalized <= Decimal::ZERO {
            return Err(CheckoutError::Validation(format!(
                "amount {} truncates to zero",
                value
            )));
        }
        normalized.rescale(2);

        Ok(Self(normalized))
    }

    /// Parse from a decimal string
    pub fn parse(s: &str) -> Result<Self> {
        let value = Decimal::from_str(s.trim())
            .map_err(|_| CheckoutError::Validation(format!("amount is not numeric: {:?}", s)))?;
        Self::new(value)
    }

    /// Parse from a JSON value (the relay accepts `string|number` bodies).
    ///
    /// Numbers are converted through their decimal text representation so
    /// no float arithmetic touches the value.
    pub fn from_json(value: &serde_json::Value) -> Result<Self> {
        match value {
            serde_json::Value::String(s) => Self::parse(s),
            serde_json::Value::Number(n) => Self::parse(&n.to_string()),
            other => Err(CheckoutError::Validation(format!(
                "amount must be a string or number, got {}",
                other
            ))),
        }
    }

    /// The underlying decimal value
    pub fn as_decimal(&self) -> Decimal {
        self.0
    }
}

impl std::fmt::Display for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for Amount {
    type Error = CheckoutError;

    fn try_from(s: String) -> Result<Self> {
        Self::parse(&s)
    }
}

impl From<Amount> for String {
    fn from(amount: Amount) -> Self {
        amount.to_string()
    }
}

/// ISO 4217 currency code (three uppercase ASCII letters)
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyCode(String);

impl CurrencyCode {
    /// Parse a currency code, normalizing to uppercase
    pub fn parse(s: &str) -> Result<Self> {
        let code = s.trim().to_uppercase();
        if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(CheckoutError::Validation(format!(
                "currency must be a three-letter ISO 4217 code, got {:?}",
                s
            )));
        }
        Ok(Self(code))
    }

    /// US dollars, the default when the client omits a currency
    pub fn usd() -> Self {
        Self("USD".into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CurrencyCode {
    fn default() -> Self {
        Self::usd()
    }
}

impl std::fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for CurrencyCode {
    type Error = CheckoutError;

    fn try_from(s: String) -> Result<Self> {
        Self::parse(&s)
    }
}

impl From<CurrencyCode> for String {
    fn from(code: CurrencyCode) -> Self {
        code.0
    }
}
