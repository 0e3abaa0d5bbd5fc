//! Payments Service - Stripe checkout and payment event dispatch
//!
//! This crate creates hosted Stripe checkout sessions for orders and turns
//! verified Stripe webhooks into `payment.succeeded` messages on the internal
//! message bus.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
