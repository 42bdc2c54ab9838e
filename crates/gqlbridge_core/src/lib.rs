//! Core types for gqlbridge.
//!
//! This crate provides the foundational types shared by the bridge:
//! - `engine`: The execution-engine interface the bridge drives
//! - `envelope`: GraphQL result envelope construction
//! - `error`: Error taxonomy

pub mod engine;
pub mod envelope;
pub mod error;

pub use engine::{
    ExecutionEngine, OperationKind, PayloadSink, PendingResult, QueryHandle, SubscriptionKey,
    Variables,
};
pub use error::{BridgeError, EngineError};
