//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (errors, event envelope, timestamps)
//! - `payment` - Checkout requests, line items, and payment events

pub mod foundation;
pub mod payment;
