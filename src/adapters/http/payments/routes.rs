//! Axum router configuration for payment endpoints.

use axum::{routing::post, Router};

use super::handlers::{create_payment_session, handle_stripe_webhook, PaymentsAppState};

/// Create the payments API router.
///
/// # Routes
/// - `POST /create-payment-session` - Open a hosted checkout for an order
/// - `POST /webhook` - Handle Stripe webhooks (no auth, signature verified)
pub fn payments_routes() -> Router<PaymentsAppState> {
    Router::new()
        .route("/create-payment-session", post(create_payment_session))
        .route("/webhook", post(handle_stripe_webhook))
}

/// Create the payments module router, mounted at `/payments`.
///
/// # Example
///
/// ```ignore
/// let app = Router::new()
///     .merge(payments_router())
///     .with_state(app_state);
/// ```
pub fn payments_router() -> Router<PaymentsAppState> {
    Router::new().nest("/payments", payments_routes())
}
