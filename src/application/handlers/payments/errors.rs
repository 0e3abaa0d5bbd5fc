//! Errors surfaced by the payment handlers.
//!
//! # HTTP Status Mapping
//!
//! | Error | HTTP Status |
//! |-------|-------------|
//! | InvalidWebhook | 400 (text body) |
//! | Validation | 400 |
//! | Provider | 502 |
//! | Publish | 500 |

use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode, ValidationError};
use crate::ports::PaymentError;

#[derive(Debug, Clone, Error)]
pub enum PaymentsError {
    /// Webhook could not be authenticated or parsed.
    #[error("{0}")]
    InvalidWebhook(String),

    /// Caller input was rejected before reaching the provider.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The payment provider rejected or failed the call.
    #[error("Payment provider error: {0}")]
    Provider(#[source] PaymentError),

    /// The message bus did not accept the event.
    #[error("Event publishing failed: {0}")]
    Publish(#[source] DomainError),
}

impl PaymentsError {
    pub fn invalid_webhook(message: impl Into<String>) -> Self {
        PaymentsError::InvalidWebhook(message.into())
    }

    pub fn provider(error: PaymentError) -> Self {
        PaymentsError::Provider(error)
    }

    pub fn publish(error: DomainError) -> Self {
        PaymentsError::Publish(error)
    }

    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            PaymentsError::InvalidWebhook(_) | PaymentsError::Validation(_) => {
                ErrorCode::ValidationFailed
            }
            PaymentsError::Provider(_) => ErrorCode::ExternalServiceError,
            PaymentsError::Publish(_) => ErrorCode::MessageBusError,
        }
    }
}
