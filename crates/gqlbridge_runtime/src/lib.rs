//! Execution/subscription bridge runtime for gqlbridge.
//!
//! This crate connects a GraphQL execution engine to a single serialized
//! consumer context:
//! - `store`: Parsed query programs keyed by handle
//! - `channel`: Cross-thread payload handoff with cooperative shutdown
//! - `runner`: Operation startup and the drain worker
//! - `registry`: Active operations, addressable for cancellation
//! - `service`: The public lifecycle object tying it all together

pub mod channel;
pub mod registry;
pub mod runner;
pub mod service;
pub mod store;

pub use channel::PayloadChannel;
pub use registry::OperationRegistry;
pub use runner::{CompleteCallback, OperationRunner, PayloadCallback};
pub use service::Service;
pub use store::QueryStore;
