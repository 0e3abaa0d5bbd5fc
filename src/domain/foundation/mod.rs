//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, event transport types, and error types
//! shared by every payment operation.

mod errors;
mod events;
mod timestamp;

pub use errors::{DomainError, ErrorCode, ValidationError};
pub use events::{EventEnvelope, EventId, EventMetadata};
pub use timestamp::Timestamp;
