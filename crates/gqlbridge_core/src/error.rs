//! Error taxonomy for gqlbridge.

use crate::engine::QueryHandle;
use serde_json::Value;
use thiserror::Error;

/// Errors surfaced to the caller while storing queries or preparing an
/// operation.
///
/// Failures that occur *after* an operation has started never take this
/// form; they are translated into result envelopes and delivered through
/// the payload callback instead.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// The query text could not be parsed; carries the parser diagnostic.
    #[error("query parse error: {0}")]
    Parse(String),

    /// No stored query program under this handle.
    #[error("unknown query handle: {0}")]
    UnknownQuery(QueryHandle),

    /// The named operation does not exist in the query program.
    #[error("unknown operation: {0:?}")]
    UnknownOperation(String),

    /// The variables string was present but did not decode to a JSON object.
    #[error("invalid variables object: {0}")]
    InvalidVariables(String),

    /// A failure reported by the execution engine.
    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// Failures produced by the execution engine while registering, resolving,
/// or streaming an operation.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A schema-level error with structured GraphQL error values.
    #[error("schema error")]
    Schema {
        /// The engine's error list, in wire shape.
        errors: Vec<Value>,
    },

    /// Any other engine failure, reduced to its message.
    #[error("{0}")]
    Failure(String),
}
