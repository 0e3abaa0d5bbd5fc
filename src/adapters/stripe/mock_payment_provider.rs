//! Mock payment provider for testing.
//!
//! Provides a configurable mock implementation of `PaymentProvider` for unit
//! and integration tests. Supports:
//! - Pre-configured responses
//! - Error injection
//! - Call tracking and request capture
//! - Webhook event simulation

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::ports::{
    CheckoutSession, CreateCheckoutRequest, PaymentError, PaymentProvider, WebhookEvent,
    WebhookEventData, WebhookEventType,
};

/// Mock payment provider for testing.
///
/// # Example
///
/// ```ignore
/// let mock = MockPaymentProvider::new();
///
/// // Inject errors
/// mock.set_method_error("create_checkout_session", PaymentError::network("down"));
///
/// // Inspect what was sent
/// let request = mock.last_checkout_request().unwrap();
/// ```
#[derive(Default)]
pub struct MockPaymentProvider {
    /// Inner state (thread-safe for async tests).
    inner: Arc<Mutex<MockState>>,
}

/// Internal mutable state.
#[derive(Default)]
struct MockState {
    /// Next checkout session to return.
    next_checkout: Option<CheckoutSession>,

    /// Most recent checkout request received.
    last_checkout_request: Option<CreateCheckoutRequest>,

    /// Next webhook event to return.
    next_webhook_event: Option<WebhookEvent>,

    /// Error to return on next call.
    next_error: Option<PaymentError>,

    /// Specific errors by method name.
    method_errors: HashMap<String, PaymentError>,

    /// Track method calls for assertions.
    call_log: Vec<MethodCall>,

    /// Webhook verification behavior.
    webhook_verify_mode: WebhookVerifyMode,
}

/// Recorded method call for assertions.
#[derive(Debug, Clone)]
pub struct MethodCall {
    pub method: String,
    pub args: Vec<String>,
}

/// How to handle webhook verification.
#[derive(Default, Clone)]
enum WebhookVerifyMode {
    /// Accept any payload and return configured event.
    #[default]
    AcceptAll,

    /// Accept only this exact signature header.
    RequireSignature(String),

    /// Always fail verification.
    AlwaysFail,
}

impl MockPaymentProvider {
    /// Create a new mock provider with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock that fails all webhook verifications.
    pub fn rejecting_webhooks() -> Self {
        let mock = Self::new();
        mock.inner.lock().unwrap().webhook_verify_mode = WebhookVerifyMode::AlwaysFail;
        mock
    }

    /// Create a mock that only accepts the given signature header.
    pub fn requiring_signature(signature: impl Into<String>) -> Self {
        let mock = Self::new();
        mock.inner.lock().unwrap().webhook_verify_mode =
            WebhookVerifyMode::RequireSignature(signature.into());
        mock
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Configuration Methods
    // ════════════════════════════════════════════════════════════════════════════

    /// Set the checkout session to return.
    pub fn set_checkout_session(&self, session: CheckoutSession) {
        self.inner.lock().unwrap().next_checkout = Some(session);
    }

    /// Set the webhook event to return on verification.
    pub fn set_webhook_event(&self, event: WebhookEvent) {
        self.inner.lock().unwrap().next_webhook_event = Some(event);
    }

    /// Set an error to return on the next call to any method.
    pub fn set_error(&self, error: PaymentError) {
        self.inner.lock().unwrap().next_error = Some(error);
    }

    /// Set an error for a specific method.
    pub fn set_method_error(&self, method: &str, error: PaymentError) {
        self.inner
            .lock()
            .unwrap()
            .method_errors
            .insert(method.to_string(), error);
    }

    /// Clear all configured errors.
    pub fn clear_errors(&self) {
        let mut state = self.inner.lock().unwrap();
        state.next_error = None;
        state.method_errors.clear();
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Call Tracking
    // ════════════════════════════════════════════════════════════════════════════

    /// Get all recorded method calls.
    pub fn calls(&self) -> Vec<MethodCall> {
        self.inner.lock().unwrap().call_log.clone()
    }

    /// Check if a method was called.
    pub fn was_called(&self, method: &str) -> bool {
        self.inner
            .lock()
            .unwrap()
            .call_log
            .iter()
            .any(|c| c.method == method)
    }

    /// Get count of calls to a method.
    pub fn call_count(&self, method: &str) -> usize {
        self.inner
            .lock()
            .unwrap()
            .call_log
            .iter()
            .filter(|c| c.method == method)
            .count()
    }

    /// The most recent checkout request, as the provider saw it.
    pub fn last_checkout_request(&self) -> Option<CreateCheckoutRequest> {
        self.inner.lock().unwrap().last_checkout_request.clone()
    }

    /// Clear the call log.
    pub fn clear_calls(&self) {
        self.inner.lock().unwrap().call_log.clear();
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Internal Helpers
    // ════════════════════════════════════════════════════════════════════════════

    fn record_call(&self, method: &str, args: Vec<String>) {
        self.inner.lock().unwrap().call_log.push(MethodCall {
            method: method.to_string(),
            args,
        });
    }

    fn check_error(&self, method: &str) -> Result<(), PaymentError> {
        let mut state = self.inner.lock().unwrap();

        // Check method-specific error first
        if let Some(error) = state.method_errors.get(method) {
            return Err(error.clone());
        }

        // Check global error (consumes it)
        if let Some(error) = state.next_error.take() {
            return Err(error);
        }

        Ok(())
    }

    /// Build an event from a Stripe-shaped JSON payload.
    fn event_from_payload(payload: &[u8]) -> Result<WebhookEvent, PaymentError> {
        let parsed: serde_json::Value = serde_json::from_slice(payload)
            .map_err(|e| PaymentError::invalid_webhook(format!("Invalid JSON: {}", e)))?;

        let id = parsed["id"].as_str().unwrap_or("evt_mock").to_string();
        let created = parsed["created"]
            .as_i64()
            .unwrap_or_else(|| chrono::Utc::now().timestamp());
        let object = &parsed["data"]["object"];

        let (event_type, data) = match parsed["type"].as_str().unwrap_or("unknown") {
            "charge.succeeded" => (
                WebhookEventType::ChargeSucceeded,
                WebhookEventData::Charge {
                    charge_id: object["id"].as_str().unwrap_or("ch_mock").to_string(),
                    order_id: object["metadata"]["orderId"]
                        .as_str()
                        .filter(|s| !s.is_empty())
                        .map(String::from),
                    receipt_url: object["receipt_url"].as_str().map(String::from),
                    amount: object["amount"].as_i64().unwrap_or_default(),
                    currency: object["currency"].as_str().unwrap_or_default().to_string(),
                },
            ),
            other => (
                WebhookEventType::Unknown(other.to_string()),
                WebhookEventData::Raw {
                    json: object.to_string(),
                },
            ),
        };

        Ok(WebhookEvent {
            id,
            event_type,
            data,
            created_at: created,
        })
    }
}

impl Clone for MockPaymentProvider {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

#[async_trait]
impl PaymentProvider for MockPaymentProvider {
    async fn create_checkout_session(
        &self,
        request: CreateCheckoutRequest,
    ) -> Result<CheckoutSession, PaymentError> {
        self.record_call(
            "create_checkout_session",
            vec![
                request.order_id.clone(),
                request.currency.clone(),
                request.line_items.len().to_string(),
            ],
        );
        self.check_error("create_checkout_session")?;

        let mut state = self.inner.lock().unwrap();

        let session = state.next_checkout.take().unwrap_or_else(|| {
            let id = format!("cs_mock_{}", uuid::Uuid::new_v4().simple());
            CheckoutSession {
                url: Some(format!("https://checkout.stripe.com/c/pay/{}", id)),
                success_url: Some(request.success_url.clone()),
                cancel_url: Some(request.cancel_url.clone()),
                id,
            }
        });

        state.last_checkout_request = Some(request);

        Ok(session)
    }

    async fn verify_webhook(
        &self,
        payload: &[u8],
        signature: &str,
    ) -> Result<WebhookEvent, PaymentError> {
        self.record_call(
            "verify_webhook",
            vec![
                String::from_utf8_lossy(payload).chars().take(50).collect(),
                signature.chars().take(20).collect(),
            ],
        );
        self.check_error("verify_webhook")?;

        let state = self.inner.lock().unwrap();

        match &state.webhook_verify_mode {
            WebhookVerifyMode::AcceptAll => {}
            WebhookVerifyMode::RequireSignature(required) => {
                if signature != required {
                    return Err(PaymentError::invalid_webhook("Invalid signature"));
                }
            }
            WebhookVerifyMode::AlwaysFail => {
                return Err(PaymentError::invalid_webhook("Verification disabled"));
            }
        }

        // Return configured event or parse from payload
        if let Some(event) = &state.next_webhook_event {
            return Ok(event.clone());
        }

        Self::event_from_payload(payload)
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Test Helpers
// ════════════════════════════════════════════════════════════════════════════════

impl MockPaymentProvider {
    /// Create a `charge.succeeded` webhook event.
    pub fn charge_succeeded_event(
        charge_id: &str,
        order_id: Option<&str>,
        receipt_url: Option<&str>,
    ) -> WebhookEvent {
        WebhookEvent {
            id: format!("evt_charge_{}", uuid::Uuid::new_v4().simple()),
            event_type: WebhookEventType::ChargeSucceeded,
            data: WebhookEventData::Charge {
                charge_id: charge_id.to_string(),
                order_id: order_id.map(String::from),
                receipt_url: receipt_url.map(String::from),
                amount: 2000,
                currency: "usd".to_string(),
            },
            created_at: chrono::Utc::now().timestamp(),
        }
    }

    /// Create a webhook event of a type this service does not act on.
    pub fn unhandled_event(event_type: &str) -> WebhookEvent {
        WebhookEvent {
            id: format!("evt_other_{}", uuid::Uuid::new_v4().simple()),
            event_type: WebhookEventType::Unknown(event_type.to_string()),
            data: WebhookEventData::Raw {
                json: "{}".to_string(),
            },
            created_at: chrono::Utc::now().timestamp(),
        }
    }
}
