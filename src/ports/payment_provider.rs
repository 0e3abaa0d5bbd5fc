//! Payment provider port for external payment processing.
//!
//! Defines the contract for payment gateway integrations (e.g., Stripe).
//! Implementations create hosted checkout sessions and authenticate the
//! webhook notifications the gateway sends back.

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::payment::LineItem;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Port for payment provider integrations.
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Create a one-time-payment checkout session.
    ///
    /// The order id must be attached to the resulting payment so that
    /// later charge notifications can be correlated with the order.
    async fn create_checkout_session(
        &self,
        request: CreateCheckoutRequest,
    ) -> Result<CheckoutSession, PaymentError>;

    /// Verify a webhook signature and parse the event.
    ///
    /// Returns the parsed event if valid, error if signature invalid.
    async fn verify_webhook(
        &self,
        payload: &[u8],
        signature: &str,
    ) -> Result<WebhookEvent, PaymentError>;
}

/// Request to create a checkout session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateCheckoutRequest {
    /// Currency code shared by every line item.
    pub currency: String,

    /// Items in display order.
    pub line_items: Vec<LineItem>,

    /// Order id attached to the payment as metadata.
    pub order_id: String,

    /// URL to redirect after successful checkout.
    pub success_url: String,

    /// URL to redirect after canceled checkout.
    pub cancel_url: String,
}

/// Checkout session for payment completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutSession {
    /// Provider's session ID.
    pub id: String,

    /// URL for customer to complete checkout.
    pub url: Option<String>,

    /// Success redirect as recorded by the provider.
    pub success_url: Option<String>,

    /// Cancel redirect as recorded by the provider.
    pub cancel_url: Option<String>,
}

/// Webhook event from payment provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookEvent {
    /// Event ID from provider.
    pub id: String,

    /// Event type.
    pub event_type: WebhookEventType,

    /// Event payload (provider-specific).
    pub data: WebhookEventData,

    /// When the event occurred (Unix timestamp).
    pub created_at: i64,
}

/// Types of webhook events we handle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WebhookEventType {
    /// A charge was captured successfully.
    ChargeSucceeded,

    /// Any other event type, kept verbatim.
    Unknown(String),
}

impl WebhookEventType {
    /// Provider-side name of the event type.
    pub fn as_str(&self) -> &str {
        match self {
            WebhookEventType::ChargeSucceeded => "charge.succeeded",
            WebhookEventType::Unknown(other) => other,
        }
    }
}

/// Webhook event payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum WebhookEventData {
    /// Charge data.
    #[serde(rename = "charge")]
    Charge {
        charge_id: String,
        order_id: Option<String>,
        receipt_url: Option<String>,
        amount: i64,
        currency: String,
    },

    /// Raw/unknown event data.
    #[serde(rename = "raw")]
    Raw { json: String },
}

/// Errors from payment provider operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentError {
    /// Error code for categorization.
    pub code: PaymentErrorCode,

    /// Human-readable message.
    pub message: String,

    /// Provider's error code (if available).
    pub provider_code: Option<String>,

    /// Whether the operation can be retried.
    pub retryable: bool,
}

impl PaymentError {
    /// Create a new payment error.
    pub fn new(code: PaymentErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            provider_code: None,
            retryable: code.is_retryable(),
        }
    }

    /// Create with provider code.
    pub fn with_provider_code(mut self, code: impl Into<String>) -> Self {
        self.provider_code = Some(code.into());
        self
    }

    /// Create a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::NetworkError, message)
    }

    /// Create an authentication error.
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::AuthenticationError, message)
    }

    /// Create a card declined error.
    pub fn card_declined(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::CardDeclined, message)
    }

    /// Create a rate limit error.
    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::RateLimitExceeded, message)
    }

    /// Create a generic provider API error.
    pub fn provider(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::ProviderError, message)
    }

    /// Create an invalid webhook error.
    pub fn invalid_webhook(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::InvalidWebhook, message)
    }
}

impl std::fmt::Display for PaymentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for PaymentError {}

impl From<PaymentError> for DomainError {
    fn from(err: PaymentError) -> Self {
        let code = match err.code {
            PaymentErrorCode::InvalidWebhook => ErrorCode::ValidationFailed,
            _ => ErrorCode::ExternalServiceError,
        };

        let domain = DomainError::new(code, err.message);
        match err.provider_code {
            Some(provider_code) => domain.with_detail("provider_code", provider_code),
            None => domain,
        }
    }
}

/// Payment error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentErrorCode {
    /// Network connectivity issue.
    NetworkError,

    /// API authentication failed.
    AuthenticationError,

    /// Card was declined.
    CardDeclined,

    /// Rate limit exceeded.
    RateLimitExceeded,

    /// Invalid webhook signature.
    InvalidWebhook,

    /// Provider API error.
    ProviderError,
}

impl PaymentErrorCode {
    /// Check if this error type is typically retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            PaymentErrorCode::NetworkError | PaymentErrorCode::RateLimitExceeded
        )
    }
}

impl std::fmt::Display for PaymentErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PaymentErrorCode::NetworkError => "network_error",
            PaymentErrorCode::AuthenticationError => "authentication_error",
            PaymentErrorCode::CardDeclined => "card_declined",
            PaymentErrorCode::RateLimitExceeded => "rate_limit_exceeded",
            PaymentErrorCode::InvalidWebhook => "invalid_webhook",
            PaymentErrorCode::ProviderError => "provider_error",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payment_provider_is_object_safe() {
        fn _accepts_dyn(_provider: &dyn PaymentProvider) {}
    }

    #[test]
    fn payment_error_retryable() {
        assert!(PaymentErrorCode::NetworkError.is_retryable());
        assert!(PaymentErrorCode::RateLimitExceeded.is_retryable());

        assert!(!PaymentErrorCode::CardDeclined.is_retryable());
        assert!(!PaymentErrorCode::InvalidWebhook.is_retryable());
        assert!(!PaymentErrorCode::ProviderError.is_retryable());
    }

    #[test]
    fn payment_error_display() {
        let err = PaymentError::card_declined("Your card was declined");
        assert!(err.to_string().contains("card_declined"));
        assert!(err.to_string().contains("Your card was declined"));
    }

    #[test]
    fn payment_error_converts_to_domain_error() {
        let payment_err = PaymentError::provider("No such price").with_provider_code("resource_missing");
        let domain_err: DomainError = payment_err.into();
        assert_eq!(domain_err.code, ErrorCode::ExternalServiceError);
        assert!(domain_err.message.contains("No such price"));
        assert_eq!(
            domain_err.details.get("provider_code"),
            Some(&"resource_missing".to_string())
        );
    }

    #[test]
    fn webhook_event_type_names() {
        assert_eq!(WebhookEventType::ChargeSucceeded.as_str(), "charge.succeeded");
        assert_eq!(
            WebhookEventType::Unknown("charge.refunded".to_string()).as_str(),
            "charge.refunded"
        );
    }
}
