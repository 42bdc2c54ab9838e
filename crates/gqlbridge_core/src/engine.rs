//! The execution-engine interface driven by the bridge.
//!
//! The bridge treats the GraphQL service as an opaque collaborator: it
//! parses query text into programs, classifies named operations, resolves
//! one-shot operations, and streams subscription payloads into a sink.

use crate::error::{BridgeError, EngineError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

/// Handle for a stored query program.
pub type QueryHandle = i32;

/// Opaque key issued by the engine for an active subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubscriptionKey(pub u64);

/// Kind of a named operation within a query program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    Query,
    Mutation,
    Subscription,
}

/// Operation variables decoded from caller-supplied JSON.
pub type Variables = serde_json::Map<String, Value>;

/// A result the engine has promised but not yet produced.
///
/// Forcing the closure performs the resolution. The bridge forces pending
/// results on the drain worker only, so engine work never runs on the
/// consumer context.
pub type PendingResult = Box<dyn FnOnce() -> Result<Value, EngineError> + Send + 'static>;

/// Destination for subscription payloads emitted by the engine.
///
/// The sink may be invoked from any thread. It only ever reaches the
/// operation's payload channel, and it degenerates to a no-op once the
/// subscription is cancelled, so the engine may always call it safely.
pub type PayloadSink = Arc<dyn Fn(PendingResult) + Send + Sync>;

/// The backing GraphQL service.
///
/// `unsubscribe` must be synchronous: once it returns, no further sink
/// invocations for that key may occur.
pub trait ExecutionEngine: Send + Sync + 'static {
    /// Parsed representation of a query document.
    type Program: Clone + Send + Sync + 'static;

    /// Parses query text into a program.
    fn parse(&self, text: &str) -> Result<Self::Program, BridgeError>;

    /// Classifies the named operation within a program.
    ///
    /// An empty `operation_name` selects the document's anonymous (or
    /// single) operation; that convention belongs to the engine, not the
    /// bridge.
    fn classify(
        &self,
        program: &Self::Program,
        operation_name: &str,
    ) -> Result<OperationKind, BridgeError>;

    /// Registers a subscription, wiring emitted payloads into `sink`.
    fn subscribe(
        &self,
        program: Self::Program,
        operation_name: String,
        variables: Variables,
        sink: PayloadSink,
    ) -> Result<SubscriptionKey, EngineError>;

    /// Releases a subscription, blocking until no further sink calls for
    /// `key` will occur.
    fn unsubscribe(&self, key: SubscriptionKey);

    /// Resolves a one-shot operation as a deferred result.
    fn resolve(
        &self,
        program: Self::Program,
        operation_name: String,
        variables: Variables,
    ) -> PendingResult;
}
