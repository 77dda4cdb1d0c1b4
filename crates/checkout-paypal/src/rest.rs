//! PayPal REST Wire Types
//!
//! Request and response shapes for the Orders v2 API, plus normalization
//! into the domain types the rest of the workspace speaks.

use serde::{Deserialize, Serialize};

use checkout_core::error::{CheckoutError, Result};
use checkout_core::{Amount, CaptureResult, CapturedAmount, CurrencyCode, OrderId, OrderIntent,
    OrderStatus, Payer};

#[derive(Debug, Serialize)]
pub(crate) struct CreateOrderBody {
    pub intent: &'static str,
    pub purchase_units: Vec<PurchaseUnit>,
}

#[derive(Debug, Serialize)]
pub(crate) struct PurchaseUnit {
    pub amount: MoneyValue,
    pub description: String,
}

/// Monetary value as PayPal expects it: a decimal string, never a float
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct MoneyValue {
    pub currency_code: String,
    pub value: String,
}

impl CreateOrderBody {
    /// Build the single-line-item purchase intent.
    ///
    /// `intent = CAPTURE` means funds move immediately on approval rather
    /// than being merely authorized.
    pub(crate) fn from_intent(intent: &OrderIntent) -> Self {
        Self {
            intent: "CAPTURE",
            purchase_units: vec![PurchaseUnit {
                amount: MoneyValue {
                    currency_code: intent.currency.to_string(),
                    value: intent.amount.to_string(),
                },
                description: intent.description.clone(),
            }],
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct OrderResponse {
    pub id: String,
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CaptureResponse {
    pub id: String,
    pub status: String,
    #[serde(default)]
    pub payer: Option<PayerResponse>,
    #[serde(default)]
    pub purchase_units: Vec<CapturedUnit>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PayerResponse {
    #[serde(default)]
    pub email_address: Option<String>,
    #[serde(default)]
    pub name: Option<PayerName>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PayerName {
    #[serde(default)]
    pub given_name: Option<String>,
    #[serde(default)]
    pub surname: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CapturedUnit {
    #[serde(default)]
    pub payments: Option<Payments>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Payments {
    #[serde(default)]
    pub captures: Vec<CaptureRecord>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CaptureRecord {
    pub amount: MoneyValue,
}

/// Error body PayPal returns on rejected calls
#[derive(Debug, Deserialize)]
pub(crate) struct ApiError {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ApiError {
    /// Best-effort extraction of the processor's message from an error body
    pub(crate) fn message_from(body: &str) -> String {
        match serde_json::from_str::<ApiError>(body) {
            Ok(err) => {
                let name = err.name.unwrap_or_default();
                let message = err.message.unwrap_or_default();
                match (name.is_empty(), message.is_empty()) {
                    (false, false) => format!("{}: {}", name, message),
                    (false, true) => name,
                    (true, false) => message,
                    (true, true) => body.to_string(),
                }
            }
            Err(_) => body.to_string(),
        }
    }
}

impl CaptureResponse {
    /// Normalize into the relay's output contract.
    ///
    /// Payer name is given name + surname joined with one space; the
    /// captured amount comes from the first purchase unit's first capture
    /// record.
    pub(crate) fn into_capture_result(self) -> Result<CaptureResult> {
        let order_id = OrderId::parse(self.id)?;
        let status = OrderStatus::from(self.status);

        let payer = self.payer.unwrap_or(PayerResponse {
            email_address: None,
            name: None,
        });
        let name_parts = payer.name.unwrap_or(PayerName {
            given_name: None,
            surname: None,
        });
        let full_name = [name_parts.given_name, name_parts.surname]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ");

        let money = self
            .purchase_units
            .into_iter()
            .next()
            .and_then(|unit| unit.payments)
            .and_then(|payments| payments.captures.into_iter().next())
            .map(|capture| capture.amount)
            .ok_or_else(|| {
                CheckoutError::Upstream("capture response carries no capture record".into())
            })?;

        Ok(CaptureResult {
            success: true,
            order_id,
            status,
            payer: Payer {
                email: payer.email_address.unwrap_or_default(),
                name: full_name,
            },
            amount: CapturedAmount {
                value: Amount::parse(&money.value)?,
                currency: CurrencyCode::parse(&money.currency_code)?,
            },
        })
    }
}
