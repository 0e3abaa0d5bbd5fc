//! Event bus adapters.
//!
//! Adapters implement the event publishing port for different environments:
//!
//! - `InMemoryEventBus` - In-process capture for testing
//! - `RedisEventPublisher` - Redis pub/sub for production

mod in_memory;
mod redis_publisher;

pub use in_memory::InMemoryEventBus;
pub use redis_publisher::RedisEventPublisher;
