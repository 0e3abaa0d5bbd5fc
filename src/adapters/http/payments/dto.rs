//! HTTP DTOs (Data Transfer Objects) for payment endpoints.
//!
//! These types define the JSON request/response structure for the payments API.
//! They serve as the boundary between HTTP and the application layer.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::ValidationError;
use crate::domain::payment::{LineItem, PaymentSessionRequest, PaymentSessionResult};

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Request to open a hosted checkout for an order.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentSessionRequest {
    /// Currency code applied to every item.
    pub currency: String,
    /// Items to charge for.
    pub items: Vec<LineItemRequest>,
    /// Caller's order identifier.
    pub order_id: String,
}

/// One line of the order.
#[derive(Debug, Clone, Deserialize)]
pub struct LineItemRequest {
    pub name: String,
    /// Unit price in major units (e.g. `19.99`).
    pub price: Decimal,
    pub quantity: i64,
}

impl CreatePaymentSessionRequest {
    /// Validate and convert into the domain request.
    ///
    /// Item errors name the offending index, e.g. `items[1].quantity`.
    pub fn into_domain(self) -> Result<PaymentSessionRequest, ValidationError> {
        let items = self
            .items
            .into_iter()
            .enumerate()
            .map(|(i, item)| {
                LineItem::new(item.name, item.price, item.quantity)
                    .map_err(|e| e.nested_in(&format!("items[{}]", i)))
            })
            .collect::<Result<Vec<_>, _>>()?;

        PaymentSessionRequest::new(self.currency, items, self.order_id)
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Redirect URLs for the created checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSessionResponse {
    pub cancel_url: Option<String>,
    pub success_url: Option<String>,
    /// Hosted checkout page to send the customer to.
    pub url: Option<String>,
}

impl From<PaymentSessionResult> for PaymentSessionResponse {
    fn from(result: PaymentSessionResult) -> Self {
        Self {
            cancel_url: result.cancel_url,
            success_url: result.success_url,
            url: result.url,
        }
    }
}

/// Acknowledgement returned to the provider for accepted webhooks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookReceivedResponse {
    pub received: bool,
}

impl WebhookReceivedResponse {
    pub fn received() -> Self {
        Self { received: true }
    }
}

/// Liveness probe body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

/// Standard error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling.
    pub error_code: String,
    /// Human-readable error message.
    pub message: String,
    /// Additional details (optional).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    /// Create a new error response.
    pub fn new(error_code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error_code: error_code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Create an error response with details.
    pub fn with_details(
        error_code: impl Into<String>,
        message: impl Into<String>,
        details: serde_json::Value,
    ) -> Self {
        Self {
            error_code: error_code.into(),
            message: message.into(),
            details: Some(details),
        }
    }
}
