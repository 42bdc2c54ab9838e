//! GraphQL result envelope construction.
//!
//! A result envelope is a JSON map with a `data` field (possibly null) and
//! an optional `errors` field. The engine's successful results already are
//! envelopes; failures are synthesized here so the consumer always receives
//! a well-formed envelope instead of a propagated error.

use crate::error::EngineError;
use serde_json::{json, Value};

/// Builds an envelope carrying structured GraphQL errors and no data.
pub fn error_envelope(errors: Vec<Value>) -> Value {
    json!({
        "data": null,
        "errors": errors,
    })
}

/// Builds an envelope with a single message-only error.
pub fn message_envelope(message: impl Into<String>) -> Value {
    error_envelope(vec![json!({ "message": message.into() })])
}

/// Translates a forced engine result into an envelope.
pub fn from_engine_result(result: Result<Value, EngineError>) -> Value {
    match result {
        Ok(envelope) => envelope,
        Err(EngineError::Schema { errors }) => error_envelope(errors),
        Err(err) => message_envelope(err.to_string()),
    }
}
