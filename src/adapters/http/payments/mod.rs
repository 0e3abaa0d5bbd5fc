//! HTTP adapter for payment endpoints.
//!
//! Exposes the payment flow via REST API:
//! - `POST /payments/create-payment-session` - Start a hosted checkout
//! - `POST /payments/webhook` - Handle Stripe webhooks

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::*;
pub use handlers::{PaymentsApiError, PaymentsAppState, STRIPE_SIGNATURE_HEADER};
pub use routes::{payments_router, payments_routes};
