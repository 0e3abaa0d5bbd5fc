//! In-memory event bus implementation for testing.
//!
//! Captures published events for assertions instead of delivering them.
//!
//! # Security Note
//!
//! This adapter is for **testing only** and should not be used in production.
//! It uses `.expect()` on lock operations which will panic if locks are poisoned.
//! Production code should use the Redis publisher.

use async_trait::async_trait;
use std::sync::RwLock;

use crate::domain::foundation::{DomainError, EventEnvelope};
use crate::ports::EventPublisher;

/// In-memory event bus for testing.
///
/// # Panics
///
/// Methods may panic if internal locks are poisoned. This is acceptable
/// for test code but this adapter should NOT be used in production.
///
/// # Example
///
/// ```ignore
/// let bus = Arc::new(InMemoryEventBus::new());
///
/// bus.publish(envelope).await?;
///
/// assert_eq!(bus.event_count(), 1);
/// assert!(bus.has_event("payment.succeeded"));
/// ```
pub struct InMemoryEventBus {
    published: RwLock<Vec<EventEnvelope>>,
    failure: Option<String>,
}

impl InMemoryEventBus {
    /// Creates a new empty event bus.
    pub fn new() -> Self {
        Self {
            published: RwLock::new(Vec::new()),
            failure: None,
        }
    }

    /// Creates a bus whose every publish fails with a message bus error.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            published: RwLock::new(Vec::new()),
            failure: Some(message.into()),
        }
    }

    // === Test Helpers ===

    /// Returns all published events (for test assertions).
    pub fn published_events(&self) -> Vec<EventEnvelope> {
        self.published
            .read()
            .expect("InMemoryEventBus: published lock poisoned")
            .clone()
    }

    /// Returns events of a specific type.
    pub fn events_of_type(&self, event_type: &str) -> Vec<EventEnvelope> {
        self.published_events()
            .into_iter()
            .filter(|e| e.event_type == event_type)
            .collect()
    }

    /// Clears all published events (for test isolation).
    pub fn clear(&self) {
        self.published
            .write()
            .expect("InMemoryEventBus: published write lock poisoned")
            .clear();
    }

    /// Returns count of published events.
    pub fn event_count(&self) -> usize {
        self.published
            .read()
            .expect("InMemoryEventBus: published lock poisoned")
            .len()
    }

    /// Checks if a specific event type was published.
    pub fn has_event(&self, event_type: &str) -> bool {
        self.published
            .read()
            .expect("InMemoryEventBus: published lock poisoned")
            .iter()
            .any(|e| e.event_type == event_type)
    }
}

impl Default for InMemoryEventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventPublisher for InMemoryEventBus {
    async fn publish(&self, event: EventEnvelope) -> Result<(), DomainError> {
        if let Some(message) = &self.failure {
            return Err(DomainError::message_bus(message.clone())
                .with_detail("event_type", event.event_type));
        }

        self.published
            .write()
            .expect("InMemoryEventBus: published write lock poisoned")
            .push(event);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::ErrorCode;
    use serde_json::json;

    fn test_envelope(event_type: &str, aggregate_id: &str) -> EventEnvelope {
        EventEnvelope::new(event_type, aggregate_id, "Payment", json!({}))
    }

    #[tokio::test]
    async fn publish_stores_event() {
        let bus = InMemoryEventBus::new();

        bus.publish(test_envelope("payment.succeeded", "order-1"))
            .await
            .unwrap();

        assert_eq!(bus.event_count(), 1);
        assert!(bus.has_event("payment.succeeded"));
    }

    #[tokio::test]
    async fn events_of_type_filters_correctly() {
        let bus = InMemoryEventBus::new();

        bus.publish(test_envelope("type.a", "1")).await.unwrap();
        bus.publish(test_envelope("type.b", "2")).await.unwrap();
        bus.publish(test_envelope("type.a", "3")).await.unwrap();

        assert_eq!(bus.events_of_type("type.a").len(), 2);
        assert_eq!(bus.events_of_type("type.b").len(), 1);
    }

    #[tokio::test]
    async fn clear_removes_all_events() {
        let bus = InMemoryEventBus::new();
        bus.publish(test_envelope("a", "1")).await.unwrap();

        bus.clear();

        assert_eq!(bus.event_count(), 0);
    }

    #[tokio::test]
    async fn failing_bus_rejects_and_records_nothing() {
        let bus = InMemoryEventBus::failing("broker unreachable");

        let err = bus
            .publish(test_envelope("payment.succeeded", "order-1"))
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::MessageBusError);
        assert!(err.message.contains("broker unreachable"));
        assert_eq!(bus.event_count(), 0);
    }
}
