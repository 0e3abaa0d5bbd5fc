//! Payment handlers.
//!
//! ## Commands
//! - Creating hosted checkout sessions
//! - Processing payment webhooks

mod create_payment_session;
mod errors;
mod handle_payment_webhook;

pub use create_payment_session::{
    CheckoutUrls, CreatePaymentSessionCommand, CreatePaymentSessionHandler,
};
pub use errors::PaymentsError;
pub use handle_payment_webhook::{
    HandlePaymentWebhookCommand, HandlePaymentWebhookHandler, HandlePaymentWebhookResult,
};
