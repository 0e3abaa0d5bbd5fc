//! Redis pub/sub event publisher for production deployments.
//!
//! Each event is sent with `PUBLISH <prefix><event_type> <payload JSON>`.
//! Subscribers see the payload only; envelope metadata stays in the logs.
//!
//! The connection is a `ConnectionManager`, which re-establishes the link
//! after a Redis restart or network drop. A publish that hits a broken link
//! still fails; the next one reconnects.

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;

use crate::domain::foundation::{DomainError, EventEnvelope};
use crate::ports::EventPublisher;

/// Publishes events to Redis channels named after the event type.
#[derive(Clone)]
pub struct RedisEventPublisher {
    conn: ConnectionManager,
    channel_prefix: String,
}

impl RedisEventPublisher {
    /// Create a publisher over an established connection.
    pub fn new(conn: ConnectionManager) -> Self {
        Self {
            conn,
            channel_prefix: String::new(),
        }
    }

    /// Prepend a namespace to every channel name.
    pub fn with_channel_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.channel_prefix = prefix.into();
        self
    }

    /// Connect to `url` and build a publisher.
    pub async fn connect(url: &str) -> Result<Self, DomainError> {
        let client = redis::Client::open(url)
            .map_err(|e| DomainError::message_bus(format!("Invalid Redis URL: {}", e)))?;
        let conn = ConnectionManager::new(client)
            .await
            .map_err(|e| DomainError::message_bus(format!("Redis connection failed: {}", e)))?;
        Ok(Self::new(conn))
    }

    fn channel_for(&self, event_type: &str) -> String {
        channel_name(&self.channel_prefix, event_type)
    }
}

fn channel_name(prefix: &str, event_type: &str) -> String {
    format!("{}{}", prefix, event_type)
}

/// Wire body for an event: the bare payload JSON, without the envelope.
fn wire_body(event: &EventEnvelope) -> Result<String, DomainError> {
    serde_json::to_string(&event.payload).map_err(|e| {
        DomainError::message_bus(format!("Failed to serialize event payload: {}", e))
    })
}

#[async_trait]
impl EventPublisher for RedisEventPublisher {
    async fn publish(&self, event: EventEnvelope) -> Result<(), DomainError> {
        let channel = self.channel_for(&event.event_type);
        let body = wire_body(&event)?;

        let mut conn = self.conn.clone();
        let receivers: i64 = conn.publish(&channel, body).await.map_err(|e: redis::RedisError| {
            DomainError::message_bus(e.to_string()).with_detail("channel", channel.clone())
        })?;

        tracing::debug!(
            channel = %channel,
            event_id = %event.event_id,
            aggregate_id = %event.aggregate_id,
            receivers,
            "Event published"
        );

        Ok(())
    }
}

impl std::fmt::Debug for RedisEventPublisher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisEventPublisher")
            .field("channel_prefix", &self.channel_prefix)
            .finish_non_exhaustive()
    }
}
