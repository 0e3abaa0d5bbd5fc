//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `PaymentProvider` - Checkout creation and webhook verification (Stripe)
//! - `EventPublisher` - Publishing domain events to the message bus

mod event_publisher;
mod payment_provider;

pub use event_publisher::EventPublisher;
pub use payment_provider::{
    CheckoutSession, CreateCheckoutRequest, PaymentError, PaymentErrorCode, PaymentProvider,
    WebhookEvent, WebhookEventData, WebhookEventType,
};
