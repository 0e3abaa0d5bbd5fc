//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `events` - Event bus implementations (in-memory, Redis)
//! - `http` - REST API (axum)
//! - `stripe` - Stripe payment provider

pub mod events;
pub mod http;
pub mod stripe;

pub use events::{InMemoryEventBus, RedisEventPublisher};
pub use stripe::{MockPaymentProvider, StripeConfig, StripePaymentAdapter};
