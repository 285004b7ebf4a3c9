//! Event-driven messaging for BlobSync
//!
//! This crate carries storage mutations from the API to the workers:
//!
//! - [`StorageEvent`] / [`EventType`] — the wire representation of a mutation
//! - [`HandlerRegistry`] — per-event-type callback dispatch
//! - [`KafkaClient`] — synchronous producer plus a consumer-group subscriber
//!   with a supervised loop and cooperative shutdown
//!
//! Delivery is at-least-once with respect to crashes between receipt and
//! offset commit. Handler-level failures are logged and the offset is
//! committed anyway; handlers must therefore be idempotent under redelivery.

pub mod error;
pub mod event;
pub mod handlers;
pub mod kafka;
pub mod publisher;

pub use error::*;
pub use event::*;
pub use handlers::*;
pub use kafka::*;
pub use publisher::*;
