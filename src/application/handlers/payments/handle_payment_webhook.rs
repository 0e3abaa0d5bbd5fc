//! HandlePaymentWebhookHandler - Command handler for processing payment provider webhooks.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, ErrorCode, Timestamp};
use crate::domain::payment::PaymentSucceeded;
use crate::ports::{
    EventPublisher, PaymentProvider, WebhookEvent, WebhookEventData, WebhookEventType,
};

use super::PaymentsError;

/// Command to handle a payment webhook.
#[derive(Debug, Clone)]
pub struct HandlePaymentWebhookCommand {
    /// Raw webhook payload, exactly as received.
    pub payload: Vec<u8>,
    /// Webhook signature header.
    pub signature: String,
}

/// Result of webhook processing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandlePaymentWebhookResult {
    /// Charge succeeded and `payment.succeeded` was published.
    PaymentRecorded {
        order_id: Option<String>,
        stripe_payment_id: String,
    },
    /// Event type this service does not act on.
    Ignored { event_type: String },
}

/// Handler for processing payment provider webhooks.
///
/// Authenticates the notification through the provider port and, for
/// successful charges, announces the payment on the message bus.
pub struct HandlePaymentWebhookHandler {
    payment_provider: Arc<dyn PaymentProvider>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl HandlePaymentWebhookHandler {
    pub fn new(
        payment_provider: Arc<dyn PaymentProvider>,
        event_publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            payment_provider,
            event_publisher,
        }
    }

    pub async fn handle(
        &self,
        cmd: HandlePaymentWebhookCommand,
    ) -> Result<HandlePaymentWebhookResult, PaymentsError> {
        // 1. Verify webhook signature and parse event
        let webhook_event = self
            .payment_provider
            .verify_webhook(&cmd.payload, &cmd.signature)
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "Webhook verification failed");
                PaymentsError::invalid_webhook(e.message)
            })?;

        // 2. Process based on event type
        match &webhook_event.event_type {
            WebhookEventType::ChargeSucceeded => self.handle_charge_succeeded(&webhook_event).await,
            WebhookEventType::Unknown(event_type) => {
                tracing::debug!(
                    event_id = %webhook_event.id,
                    event_type = %event_type,
                    "Unhandled webhook event type"
                );
                Ok(HandlePaymentWebhookResult::Ignored {
                    event_type: event_type.clone(),
                })
            }
        }
    }

    async fn handle_charge_succeeded(
        &self,
        webhook_event: &WebhookEvent,
    ) -> Result<HandlePaymentWebhookResult, PaymentsError> {
        let (charge_id, order_id, receipt_url) = match &webhook_event.data {
            WebhookEventData::Charge {
                charge_id,
                order_id,
                receipt_url,
                ..
            } => (charge_id.clone(), order_id.clone(), receipt_url.clone()),
            WebhookEventData::Raw { .. } => {
                return Err(PaymentsError::invalid_webhook(
                    "Unexpected webhook data type for charge.succeeded",
                ))
            }
        };

        if order_id.is_none() {
            tracing::warn!(
                event_id = %webhook_event.id,
                charge_id = %charge_id,
                "Charge succeeded without an orderId; publishing with null orderId"
            );
        }

        let message = PaymentSucceeded {
            stripe_payment_id: charge_id.clone(),
            order_id: order_id.clone(),
            receipt_url,
        };

        let occurred_at =
            Timestamp::from_unix_secs(webhook_event.created_at).unwrap_or_else(Timestamp::now);
        let envelope = message
            .to_envelope()
            .map_err(|e| {
                PaymentsError::publish(DomainError::new(
                    ErrorCode::InternalError,
                    format!("Failed to serialize payment event: {}", e),
                ))
            })?
            .occurred_at(occurred_at)
            .with_causation_id(webhook_event.id.clone());

        self.event_publisher.publish(envelope).await.map_err(|e| {
            tracing::error!(
                order_id = ?order_id,
                charge_id = %charge_id,
                error = %e,
                "Failed to publish payment.succeeded"
            );
            PaymentsError::publish(e)
        })?;

        tracing::info!(
            order_id = ?order_id,
            charge_id = %charge_id,
            "Payment succeeded"
        );

        Ok(HandlePaymentWebhookResult::PaymentRecorded {
            order_id,
            stripe_payment_id: charge_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::events::InMemoryEventBus;
    use crate::adapters::stripe::MockPaymentProvider;
    use crate::ports::PaymentError;

    fn command() -> HandlePaymentWebhookCommand {
        HandlePaymentWebhookCommand {
            payload: b"{}".to_vec(),
            signature: "t=1,v1=abc".to_string(),
        }
    }

    fn handler_with(
        provider: MockPaymentProvider,
    ) -> (HandlePaymentWebhookHandler, Arc<InMemoryEventBus>) {
        let bus = Arc::new(InMemoryEventBus::new());
        let handler = HandlePaymentWebhookHandler::new(Arc::new(provider), bus.clone());
        (handler, bus)
    }

    // ════════════════════════════════════════════════════════════════════════════
    // charge.succeeded
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn charge_succeeded_publishes_payment_succeeded() {
        let provider = MockPaymentProvider::new();
        provider.set_webhook_event(MockPaymentProvider::charge_succeeded_event(
            "ch_1",
            Some("order-42"),
            Some("https://pay.stripe.com/receipts/ch_1"),
        ));
        let (handler, bus) = handler_with(provider);

        let result = handler.handle(command()).await.unwrap();

        assert_eq!(
            result,
            HandlePaymentWebhookResult::PaymentRecorded {
                order_id: Some("order-42".to_string()),
                stripe_payment_id: "ch_1".to_string(),
            }
        );

        let events = bus.events_of_type("payment.succeeded");
        assert_eq!(events.len(), 1);
        let payload: PaymentSucceeded = events[0].payload_as().unwrap();
        assert_eq!(
            payload,
            PaymentSucceeded {
                stripe_payment_id: "ch_1".to_string(),
                order_id: Some("order-42".to_string()),
                receipt_url: Some("https://pay.stripe.com/receipts/ch_1".to_string()),
            }
        );
    }

    #[tokio::test]
    async fn envelope_carries_provider_event_context() {
        let provider = MockPaymentProvider::new();
        let mut event = MockPaymentProvider::charge_succeeded_event("ch_1", Some("order-42"), None);
        event.id = "evt_abc".to_string();
        event.created_at = 1704067200;
        provider.set_webhook_event(event);
        let (handler, bus) = handler_with(provider);

        handler.handle(command()).await.unwrap();

        let envelope = &bus.published_events()[0];
        assert_eq!(envelope.aggregate_id, "order-42");
        assert_eq!(envelope.aggregate_type, "Payment");
        assert_eq!(envelope.occurred_at.as_unix_secs(), 1704067200);
        assert_eq!(envelope.metadata.causation_id.as_deref(), Some("evt_abc"));
    }

    #[tokio::test]
    async fn missing_receipt_url_is_published_as_null() {
        let provider = MockPaymentProvider::new();
        provider.set_webhook_event(MockPaymentProvider::charge_succeeded_event(
            "ch_2",
            Some("order-7"),
            None,
        ));
        let (handler, bus) = handler_with(provider);

        handler.handle(command()).await.unwrap();

        let envelope = &bus.published_events()[0];
        assert!(envelope.payload["receiptUrl"].is_null());
    }

    #[tokio::test]
    async fn charge_without_order_id_publishes_once_with_null_order_id() {
        let provider = MockPaymentProvider::new();
        provider.set_webhook_event(MockPaymentProvider::charge_succeeded_event(
            "ch_3",
            None,
            Some("https://pay.stripe.com/receipts/ch_3"),
        ));
        let (handler, bus) = handler_with(provider);

        let result = handler.handle(command()).await.unwrap();

        assert_eq!(
            result,
            HandlePaymentWebhookResult::PaymentRecorded {
                order_id: None,
                stripe_payment_id: "ch_3".to_string(),
            }
        );
        let events = bus.published_events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].aggregate_id, "ch_3");
        assert!(events[0].payload["orderId"].is_null());
        assert_eq!(events[0].payload["stripePaymentId"], "ch_3");
    }

    #[tokio::test]
    async fn publish_failure_propagates() {
        let provider = MockPaymentProvider::new();
        provider.set_webhook_event(MockPaymentProvider::charge_succeeded_event(
            "ch_4",
            Some("order-1"),
            None,
        ));
        let bus = Arc::new(InMemoryEventBus::failing("connection refused"));
        let handler = HandlePaymentWebhookHandler::new(Arc::new(provider), bus);

        let err = handler.handle(command()).await.unwrap_err();

        assert!(matches!(err, PaymentsError::Publish(_)));
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Other event types / verification
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn other_event_types_are_ignored() {
        let provider = MockPaymentProvider::new();
        provider.set_webhook_event(MockPaymentProvider::unhandled_event("payment_intent.created"));
        let (handler, bus) = handler_with(provider);

        let result = handler.handle(command()).await.unwrap();

        assert_eq!(
            result,
            HandlePaymentWebhookResult::Ignored {
                event_type: "payment_intent.created".to_string()
            }
        );
        assert_eq!(bus.event_count(), 0);
    }

    #[tokio::test]
    async fn verification_failure_is_invalid_webhook_with_message() {
        let (handler, bus) = handler_with(MockPaymentProvider::rejecting_webhooks());

        let err = handler.handle(command()).await.unwrap_err();

        match err {
            PaymentsError::InvalidWebhook(message) => {
                assert_eq!(message, "Verification disabled")
            }
            other => panic!("Expected InvalidWebhook, got {:?}", other),
        }
        assert_eq!(bus.event_count(), 0);
    }

    #[tokio::test]
    async fn injected_provider_error_is_reported_as_invalid_webhook() {
        let provider = MockPaymentProvider::new();
        provider.set_method_error(
            "verify_webhook",
            PaymentError::invalid_webhook("Event too old (900 seconds)"),
        );
        let (handler, _bus) = handler_with(provider);

        let err = handler.handle(command()).await.unwrap_err();

        assert_eq!(err.to_string(), "Event too old (900 seconds)");
    }

    #[tokio::test]
    async fn charge_with_raw_payload_is_rejected() {
        let provider = MockPaymentProvider::new();
        provider.set_webhook_event(WebhookEvent {
            id: "evt_odd".to_string(),
            event_type: WebhookEventType::ChargeSucceeded,
            data: WebhookEventData::Raw {
                json: "{}".to_string(),
            },
            created_at: 0,
        });
        let (handler, bus) = handler_with(provider);

        let err = handler.handle(command()).await.unwrap_err();

        assert!(matches!(err, PaymentsError::InvalidWebhook(_)));
        assert_eq!(bus.event_count(), 0);
    }
}
