//! Stripe payment provider adapter.
//!
//! Implements the `PaymentProvider` trait for Stripe API integration.
//! Handles one-time checkout sessions and webhook verification.
//!
//! # Security
//!
//! - HMAC-SHA256 signature verification with constant-time comparison
//! - Timestamp validation (5-minute window) for replay attack prevention
//! - Secrets handled via `secrecy::SecretString`
//!
//! # Configuration
//!
//! ```ignore
//! let config = StripeConfig::new(api_key, webhook_secret);
//! let adapter = StripePaymentAdapter::new(config);
//! ```

use async_trait::async_trait;
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::ports::{
    CheckoutSession, CreateCheckoutRequest, PaymentError, PaymentProvider, WebhookEvent,
    WebhookEventData, WebhookEventType,
};

use super::webhook_types::{
    SignatureHeader, StripeCharge, StripeCheckoutSession, StripeErrorResponse, StripeWebhookEvent,
};

type HmacSha256 = Hmac<Sha256>;

/// Maximum age for webhook events (5 minutes).
const MAX_TIMESTAMP_AGE_SECS: i64 = 300;

/// Clock skew tolerance for future timestamps (60 seconds).
const MAX_FUTURE_TOLERANCE_SECS: i64 = 60;

const DEFAULT_API_BASE_URL: &str = "https://api.stripe.com";

/// Stripe API configuration.
#[derive(Clone)]
pub struct StripeConfig {
    /// Stripe secret API key (sk_live_... or sk_test_...).
    api_key: SecretString,

    /// Webhook signing secret (whsec_...).
    webhook_secret: SecretString,

    /// Base URL for Stripe API (default: https://api.stripe.com).
    api_base_url: String,

    /// Whether to reject test mode events.
    require_livemode: bool,
}

impl StripeConfig {
    /// Create a new Stripe configuration.
    pub fn new(api_key: impl Into<String>, webhook_secret: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::new(api_key.into()),
            webhook_secret: SecretString::new(webhook_secret.into()),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            require_livemode: false,
        }
    }

    /// Set a custom API base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Reject webhook events whose `livemode` flag is false.
    pub fn with_require_livemode(mut self, require: bool) -> Self {
        self.require_livemode = require;
        self
    }
}

/// Stripe payment provider adapter.
///
/// Implements `PaymentProvider` for Stripe API integration.
pub struct StripePaymentAdapter {
    config: StripeConfig,
    http_client: reqwest::Client,
}

impl StripePaymentAdapter {
    /// Create a new Stripe adapter with the given configuration.
    pub fn new(config: StripeConfig) -> Self {
        Self {
            config,
            http_client: reqwest::Client::new(),
        }
    }

    /// Verify webhook signature using HMAC-SHA256.
    ///
    /// The signed payload is `"{t}.{raw body}"`, hashed over the exact bytes
    /// received. Any one matching `v1` entry is sufficient.
    fn verify_signature(&self, payload: &[u8], header: &SignatureHeader) -> Result<(), PaymentError> {
        // 1. Validate timestamp (prevent replay attacks)
        let now = chrono::Utc::now().timestamp();
        let age = now.checked_sub(header.timestamp).ok_or_else(|| {
            tracing::warn!(
                event_timestamp = header.timestamp,
                "Webhook timestamp out of range"
            );
            PaymentError::invalid_webhook("Invalid timestamp")
        })?;

        if age > MAX_TIMESTAMP_AGE_SECS {
            tracing::warn!(
                event_timestamp = header.timestamp,
                current_time = now,
                age_secs = age,
                "Webhook event too old - possible replay attack"
            );
            return Err(PaymentError::invalid_webhook(format!(
                "Event too old ({} seconds)",
                age
            )));
        }

        if age < -MAX_FUTURE_TOLERANCE_SECS {
            tracing::warn!(
                event_timestamp = header.timestamp,
                current_time = now,
                "Webhook event from future - clock skew or manipulation"
            );
            return Err(PaymentError::invalid_webhook("Event timestamp in future"));
        }

        // 2. Compute expected signature
        let mut mac =
            HmacSha256::new_from_slice(self.config.webhook_secret.expose_secret().as_bytes())
                .map_err(|e| PaymentError::invalid_webhook(format!("Invalid signing key: {}", e)))?;

        mac.update(header.timestamp.to_string().as_bytes());
        mac.update(b".");
        mac.update(payload);
        let expected = mac.finalize().into_bytes();

        // 3. Constant-time comparison against every candidate
        let expected_bytes: &[u8] = expected.as_slice();
        let matched = header
            .v1_signatures
            .iter()
            .any(|candidate| bool::from(expected_bytes.ct_eq(candidate.as_slice())));

        if !matched {
            tracing::warn!(
                candidates = header.v1_signatures.len(),
                "No webhook signature matched the expected signature"
            );
            return Err(PaymentError::invalid_webhook(
                "No signatures found matching the expected signature for payload",
            ));
        }

        Ok(())
    }

    /// Parse a Stripe event and convert to domain types.
    fn parse_event(&self, payload: &[u8]) -> Result<WebhookEvent, PaymentError> {
        let stripe_event: StripeWebhookEvent = serde_json::from_slice(payload).map_err(|e| {
            tracing::warn!(error = %e, "Failed to parse webhook payload");
            PaymentError::invalid_webhook(format!("Invalid JSON: {}", e))
        })?;

        if self.config.require_livemode && !stripe_event.livemode {
            tracing::warn!(
                event_id = %stripe_event.id,
                "Rejected test mode event in production"
            );
            return Err(PaymentError::invalid_webhook(
                "Test mode events not allowed in production",
            ));
        }

        let event_type = match stripe_event.event_type.as_str() {
            "charge.succeeded" => WebhookEventType::ChargeSucceeded,
            other => WebhookEventType::Unknown(other.to_string()),
        };

        let data = Self::extract_event_data(&event_type, &stripe_event)?;

        Ok(WebhookEvent {
            id: stripe_event.id,
            event_type,
            data,
            created_at: stripe_event.created,
        })
    }

    /// Extract event data from Stripe event into domain format.
    fn extract_event_data(
        event_type: &WebhookEventType,
        event: &StripeWebhookEvent,
    ) -> Result<WebhookEventData, PaymentError> {
        match event_type {
            WebhookEventType::ChargeSucceeded => {
                let charge: StripeCharge = serde_json::from_value(event.data.object.clone())
                    .map_err(|e| PaymentError::invalid_webhook(format!("Invalid charge: {}", e)))?;

                Ok(WebhookEventData::Charge {
                    order_id: charge.order_id().map(str::to_string),
                    charge_id: charge.id,
                    receipt_url: charge.receipt_url,
                    amount: charge.amount,
                    currency: charge.currency,
                })
            }

            WebhookEventType::Unknown(_) => Ok(WebhookEventData::Raw {
                json: event.data.object.to_string(),
            }),
        }
    }

    /// Form fields for `POST /v1/checkout/sessions`.
    fn checkout_form(request: &CreateCheckoutRequest) -> Vec<(String, String)> {
        let mut params = Vec::with_capacity(request.line_items.len() * 4 + 4);

        for (i, item) in request.line_items.iter().enumerate() {
            params.push((
                format!("line_items[{}][price_data][currency]", i),
                request.currency.clone(),
            ));
            params.push((
                format!("line_items[{}][price_data][product_data][name]", i),
                item.name().to_string(),
            ));
            params.push((
                format!("line_items[{}][price_data][unit_amount]", i),
                item.unit_amount().to_string(),
            ));
            params.push((
                format!("line_items[{}][quantity]", i),
                item.quantity().to_string(),
            ));
        }

        params.push((
            "payment_intent_data[metadata][orderId]".to_string(),
            request.order_id.clone(),
        ));
        params.push(("mode".to_string(), "payment".to_string()));
        params.push(("success_url".to_string(), request.success_url.clone()));
        params.push(("cancel_url".to_string(), request.cancel_url.clone()));

        params
    }

    /// Map a non-2xx Stripe response to a `PaymentError`.
    fn api_error(status: reqwest::StatusCode, body: &str) -> PaymentError {
        let parsed = serde_json::from_str::<StripeErrorResponse>(body).ok();
        let message = parsed
            .as_ref()
            .and_then(|r| r.error.message.clone())
            .unwrap_or_else(|| format!("Stripe API error: {}", body));

        let error = match (status.as_u16(), parsed.as_ref().and_then(|r| r.error.error_type.as_deref())) {
            (401, _) => PaymentError::authentication(message),
            (429, _) => PaymentError::rate_limited(message),
            (_, Some("card_error")) => PaymentError::card_declined(message),
            _ => PaymentError::provider(message),
        };

        match parsed.and_then(|r| r.error.code) {
            Some(code) => error.with_provider_code(code),
            None => error,
        }
    }
}

#[async_trait]
impl PaymentProvider for StripePaymentAdapter {
    async fn create_checkout_session(
        &self,
        request: CreateCheckoutRequest,
    ) -> Result<CheckoutSession, PaymentError> {
        let url = format!("{}/v1/checkout/sessions", self.config.api_base_url);
        let params = Self::checkout_form(&request);

        let response = self
            .http_client
            .post(&url)
            .basic_auth(self.config.api_key.expose_secret(), Option::<&str>::None)
            .form(&params)
            .send()
            .await
            .map_err(|e| PaymentError::network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            let error = Self::api_error(status, &error_text);
            tracing::error!(
                status = status.as_u16(),
                code = %error.code,
                order_id = %request.order_id,
                "Stripe create_checkout_session failed"
            );
            return Err(error);
        }

        let stripe_session: StripeCheckoutSession = response.json().await.map_err(|e| {
            PaymentError::provider(format!("Failed to parse Stripe response: {}", e))
        })?;

        tracing::info!(
            session_id = %stripe_session.id,
            order_id = %request.order_id,
            "Stripe checkout session created"
        );

        Ok(CheckoutSession {
            id: stripe_session.id,
            url: stripe_session.url,
            success_url: stripe_session.success_url,
            cancel_url: stripe_session.cancel_url,
        })
    }

    async fn verify_webhook(
        &self,
        payload: &[u8],
        signature: &str,
    ) -> Result<WebhookEvent, PaymentError> {
        // 1. Parse signature header
        let header = SignatureHeader::parse(signature).map_err(|e| {
            tracing::warn!(error = %e, "Failed to parse Stripe-Signature header");
            PaymentError::invalid_webhook(e.to_string())
        })?;

        // 2. Verify signature (includes timestamp validation)
        self.verify_signature(payload, &header)?;

        // 3. Parse and convert event
        let webhook_event = self.parse_event(payload)?;

        tracing::debug!(
            event_id = %webhook_event.id,
            event_type = webhook_event.event_type.as_str(),
            "Webhook signature verified"
        );

        Ok(webhook_event)
    }
}
