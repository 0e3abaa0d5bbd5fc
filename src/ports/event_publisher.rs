//! EventPublisher port - Interface for publishing integration events.
//!
//! This port defines how the application hands events to the message bus
//! without knowing about the underlying transport (in-memory, Redis, etc.).

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, EventEnvelope};

/// Port for publishing events to other services.
///
/// Implementations must ensure:
/// - Events are routed by `event_type`
/// - Only the envelope payload goes on the wire
/// - Errors are propagated to the caller
///
/// # Example
///
/// ```ignore
/// let event = PaymentSucceeded { .. }.to_envelope()?;
/// publisher.publish(event).await?;
/// ```
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publish a single event.
    async fn publish(&self, event: EventEnvelope) -> Result<(), DomainError>;
}
