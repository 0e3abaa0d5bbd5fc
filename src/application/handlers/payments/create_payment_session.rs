//! CreatePaymentSessionHandler - Command handler for opening a hosted checkout.

use std::sync::Arc;

use crate::domain::payment::{PaymentSessionRequest, PaymentSessionResult};
use crate::ports::{CreateCheckoutRequest, PaymentProvider};

use super::PaymentsError;

/// Redirect targets handed to the provider for every session.
///
/// Loaded from configuration; callers cannot override them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutUrls {
    pub success_url: String,
    pub cancel_url: String,
}

impl CheckoutUrls {
    pub fn new(success_url: impl Into<String>, cancel_url: impl Into<String>) -> Self {
        Self {
            success_url: success_url.into(),
            cancel_url: cancel_url.into(),
        }
    }
}

/// Command to create a payment session.
pub type CreatePaymentSessionCommand = PaymentSessionRequest;

/// Handler for creating hosted checkout sessions.
pub struct CreatePaymentSessionHandler {
    payment_provider: Arc<dyn PaymentProvider>,
    urls: CheckoutUrls,
}

impl CreatePaymentSessionHandler {
    pub fn new(payment_provider: Arc<dyn PaymentProvider>, urls: CheckoutUrls) -> Self {
        Self {
            payment_provider,
            urls,
        }
    }

    pub async fn handle(
        &self,
        cmd: CreatePaymentSessionCommand,
    ) -> Result<PaymentSessionResult, PaymentsError> {
        let order_id = cmd.order_id().to_string();

        let request = CreateCheckoutRequest {
            currency: cmd.currency().to_string(),
            line_items: cmd.items().to_vec(),
            order_id: order_id.clone(),
            success_url: self.urls.success_url.clone(),
            cancel_url: self.urls.cancel_url.clone(),
        };

        let session = self
            .payment_provider
            .create_checkout_session(request)
            .await
            .map_err(|e| {
                tracing::error!(
                    order_id = %order_id,
                    error = %e,
                    retryable = e.retryable,
                    "Failed to create checkout session"
                );
                PaymentsError::provider(e)
            })?;

        tracing::info!(
            order_id = %order_id,
            session_id = %session.id,
            "Payment session created"
        );

        Ok(PaymentSessionResult {
            cancel_url: session.cancel_url,
            success_url: session.success_url,
            url: session.url,
        })
    }
}
