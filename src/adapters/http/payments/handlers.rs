//! HTTP handlers for payment endpoints.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};

use crate::application::handlers::payments::{
    CheckoutUrls, CreatePaymentSessionHandler, HandlePaymentWebhookCommand,
    HandlePaymentWebhookHandler, PaymentsError,
};
use crate::ports::{EventPublisher, PaymentProvider};

use super::dto::{
    CreatePaymentSessionRequest, ErrorResponse, PaymentSessionResponse, WebhookReceivedResponse,
};

/// Header carrying the provider's webhook signature.
pub const STRIPE_SIGNATURE_HEADER: &str = "stripe-signature";

/// Shared state for payment routes.
#[derive(Clone)]
pub struct PaymentsAppState {
    pub payment_provider: Arc<dyn PaymentProvider>,
    pub event_publisher: Arc<dyn EventPublisher>,
    pub checkout_urls: CheckoutUrls,
}

impl PaymentsAppState {
    pub fn new(
        payment_provider: Arc<dyn PaymentProvider>,
        event_publisher: Arc<dyn EventPublisher>,
        checkout_urls: CheckoutUrls,
    ) -> Self {
        Self {
            payment_provider,
            event_publisher,
            checkout_urls,
        }
    }

    /// Create handlers on demand from the shared state.
    pub fn create_payment_session_handler(&self) -> CreatePaymentSessionHandler {
        CreatePaymentSessionHandler::new(self.payment_provider.clone(), self.checkout_urls.clone())
    }

    pub fn webhook_handler(&self) -> HandlePaymentWebhookHandler {
        HandlePaymentWebhookHandler::new(
            self.payment_provider.clone(),
            self.event_publisher.clone(),
        )
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Command Handlers (POST endpoints)
// ════════════════════════════════════════════════════════════════════════════════

/// POST /payments/create-payment-session - Open a hosted checkout
pub async fn create_payment_session(
    State(state): State<PaymentsAppState>,
    payload: Result<Json<CreatePaymentSessionRequest>, JsonRejection>,
) -> Result<impl IntoResponse, PaymentsApiError> {
    let Json(request) = payload?;
    let cmd = request.into_domain().map_err(PaymentsError::from)?;

    let handler = state.create_payment_session_handler();
    let result = handler.handle(cmd).await?;

    Ok(Json(PaymentSessionResponse::from(result)))
}

/// POST /payments/webhook - Handle Stripe webhooks
///
/// The body is taken as raw bytes; signature verification needs them untouched.
pub async fn handle_stripe_webhook(
    State(state): State<PaymentsAppState>,
    headers: HeaderMap,
    body: axum::body::Bytes,
) -> Result<impl IntoResponse, PaymentsApiError> {
    let signature = headers
        .get(STRIPE_SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| PaymentsError::invalid_webhook("Missing Stripe-Signature header"))?;

    let handler = state.webhook_handler();
    let cmd = HandlePaymentWebhookCommand {
        payload: body.to_vec(),
        signature: signature.to_string(),
    };

    handler.handle(cmd).await?;

    Ok(Json(WebhookReceivedResponse::received()))
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error type that converts application errors to HTTP responses.
#[derive(Debug)]
pub enum PaymentsApiError {
    /// Handler or validation failure.
    Payments(PaymentsError),
    /// Body was not valid JSON for the endpoint.
    InvalidBody(String),
}

impl From<PaymentsError> for PaymentsApiError {
    fn from(err: PaymentsError) -> Self {
        Self::Payments(err)
    }
}

impl From<JsonRejection> for PaymentsApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidBody(rejection.body_text())
    }
}

impl IntoResponse for PaymentsApiError {
    fn into_response(self) -> axum::response::Response {
        let err = match self {
            PaymentsApiError::InvalidBody(message) => {
                let body = ErrorResponse::new("INVALID_REQUEST_BODY", message);
                return (StatusCode::BAD_REQUEST, Json(body)).into_response();
            }
            PaymentsApiError::Payments(err) => err,
        };

        let error_code = err.code().to_string();
        match err {
            PaymentsError::InvalidWebhook(message) => (
                StatusCode::BAD_REQUEST,
                [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
                format!("Webhook Error: {}", message),
            )
                .into_response(),
            PaymentsError::Validation(e) => {
                let body = ErrorResponse::with_details(
                    error_code,
                    e.to_string(),
                    serde_json::json!({ "field": e.field() }),
                );
                (StatusCode::BAD_REQUEST, Json(body)).into_response()
            }
            PaymentsError::Provider(e) => {
                let body = ErrorResponse::with_details(
                    error_code,
                    e.message.clone(),
                    serde_json::json!({
                        "provider_error": e.code.to_string(),
                        "provider_code": e.provider_code,
                        "retryable": e.retryable,
                    }),
                );
                (StatusCode::BAD_GATEWAY, Json(body)).into_response()
            }
            PaymentsError::Publish(e) => {
                tracing::error!(error = %e, "Responding 500 after publish failure");
                let body = ErrorResponse::new(error_code, "Failed to publish payment event");
                (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{DomainError, ValidationError};
    use crate::ports::PaymentError;
    use http_body_util::BodyExt;

    async fn body_string(response: axum::response::Response) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn invalid_webhook_is_plain_text_400() {
        let response =
            PaymentsApiError::from(PaymentsError::invalid_webhook("Invalid signature")).into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "text/plain; charset=utf-8"
        );
        assert_eq!(body_string(response).await, "Webhook Error: Invalid signature");
    }

    #[tokio::test]
    async fn validation_error_is_json_400_with_field() {
        let err = PaymentsError::from(ValidationError::empty_field("currency"));
        let response = PaymentsApiError::from(err).into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(body["error_code"], "VALIDATION_FAILED");
        assert_eq!(body["details"]["field"], "currency");
    }

    #[tokio::test]
    async fn provider_error_is_502_with_provider_message() {
        let err = PaymentsError::provider(
            PaymentError::provider("No such currency: xyz").with_provider_code("invalid_currency"),
        );
        let response = PaymentsApiError::from(err).into_response();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(body["error_code"], "EXTERNAL_SERVICE_ERROR");
        assert_eq!(body["message"], "No such currency: xyz");
        assert_eq!(body["details"]["provider_code"], "invalid_currency");
    }

    #[tokio::test]
    async fn publish_error_is_500() {
        let err = PaymentsError::publish(DomainError::message_bus("connection refused"));
        let response = PaymentsApiError::from(err).into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_string(response).await;
        assert!(!body.contains("connection refused"));
    }

    #[tokio::test]
    async fn invalid_body_is_json_400() {
        let response = PaymentsApiError::InvalidBody("expected value".to_string()).into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(body["error_code"], "INVALID_REQUEST_BODY");
    }
}
