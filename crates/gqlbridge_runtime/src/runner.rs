//! Operation startup and the drain worker.
//!
//! `OperationRunner::start` resolves a stored program, an operation name,
//! and caller variables into either a one-shot resolution or a streaming
//! subscription, then spawns a dedicated worker that drains the payload
//! channel and forwards JSON envelopes to the consumer callbacks.

use crate::channel::PayloadChannel;
use crate::store::QueryStore;
use gqlbridge_core::{
    envelope, BridgeError, EngineError, ExecutionEngine, OperationKind, PayloadSink, QueryHandle,
    Variables,
};
use serde_json::Value;
use std::sync::Arc;
use std::thread;

/// Receives each delivery batch of JSON-encoded envelopes, in arrival
/// order. The host is responsible for marshalling the call onto its
/// consumer context.
pub type PayloadCallback = Box<dyn FnMut(Vec<String>) + Send>;

/// Fires exactly once, when the drain loop exits.
pub type CompleteCallback = Box<dyn FnOnce() + Send>;

/// A started operation. The drain worker runs detached; the runner only
/// carries the channel so the registry can address the operation for
/// cancellation.
pub struct OperationRunner {
    channel: Arc<PayloadChannel>,
}

impl OperationRunner {
    /// Prepares the operation and spawns its drain worker.
    ///
    /// Preparation failures do not propagate: they are logged and
    /// delivered to the consumer as a single synthetic error envelope
    /// followed by completion, so every started operation observably
    /// terminates.
    pub fn start<E: ExecutionEngine>(
        engine: &Arc<E>,
        store: &QueryStore<E::Program>,
        handle: QueryHandle,
        operation_name: &str,
        variables_json: &str,
        on_payload: PayloadCallback,
        on_complete: CompleteCallback,
    ) -> Self {
        let channel = Arc::new(PayloadChannel::new());

        if let Err(err) = prepare(engine, &channel, store, handle, operation_name, variables_json)
        {
            tracing::error!(handle, operation = operation_name, error = %err,
                "failed to prepare operation");

            // Roll back a half-opened channel, then hand the failure to the
            // drain loop as a normal payload.
            channel.cancel();
            let message = format!("caught exception preparing the operation: {err}");
            channel.prime(Box::new(move || Err(EngineError::Failure(message))));
        }

        let worker = Arc::clone(&channel);
        let spawned = thread::Builder::new()
            .name("graphql-subscription".into())
            .spawn(move || drain(&worker, on_payload, on_complete));

        if let Err(err) = spawned {
            tracing::error!(handle, error = %err, "failed to spawn drain worker");
            channel.cancel();
        }

        Self { channel }
    }

    /// The channel backing this operation, shared with the registry.
    pub fn channel(&self) -> &Arc<PayloadChannel> {
        &self.channel
    }
}

/// Operation startup; runs on the consumer context before the worker
/// spawns.
fn prepare<E: ExecutionEngine>(
    engine: &Arc<E>,
    channel: &Arc<PayloadChannel>,
    store: &QueryStore<E::Program>,
    handle: QueryHandle,
    operation_name: &str,
    variables_json: &str,
) -> Result<(), BridgeError> {
    let program = store.get(handle)?;
    let variables = decode_variables(variables_json)?;

    if engine.classify(&program, operation_name)? == OperationKind::Subscription {
        // Live before the registration completes, so payloads emitted
        // while `subscribe` is still in flight are queued.
        channel.open();

        let sink: PayloadSink = {
            let channel = Arc::clone(channel);
            Arc::new(move |payload| channel.push(payload))
        };

        let key = engine.subscribe(program, operation_name.to_owned(), variables, sink)?;

        let unsubscribe = {
            let engine = Arc::clone(engine);
            Box::new(move |key| engine.unsubscribe(key))
        };
        channel.attach_subscription(key, unsubscribe);
    } else {
        // Deferred: the resolution itself runs on the drain worker. The
        // channel stays unregistered, so the worker delivers the single
        // result and completes.
        channel.prime(engine.resolve(program, operation_name.to_owned(), variables));
    }

    Ok(())
}

/// Decodes caller-supplied variables JSON; an empty string is an empty map.
fn decode_variables(raw: &str) -> Result<Variables, BridgeError> {
    if raw.is_empty() {
        return Ok(Variables::new());
    }

    match serde_json::from_str(raw) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(BridgeError::InvalidVariables(format!(
            "expected a JSON object, got {other}"
        ))),
        Err(err) => Err(BridgeError::InvalidVariables(err.to_string())),
    }
}

/// The drain loop; runs on the dedicated worker thread.
///
/// Forces each pending result in arrival order, translates it into an
/// envelope, and delivers everything accumulated between wakeups as one
/// batch. Exits once the channel is cancelled and fully drained, then
/// fires the completion callback.
fn drain(channel: &PayloadChannel, mut on_payload: PayloadCallback, on_complete: CompleteCallback) {
    let mut registered = true;

    while registered {
        let (pending, still_registered) = channel.wait_for_work();
        registered = still_registered;

        let mut batch = Vec::with_capacity(pending.len());

        for payload in pending {
            let document = envelope::from_engine_result(payload());

            match serde_json::to_string(&document) {
                Ok(text) => batch.push(text),
                Err(err) => {
                    tracing::error!(error = %err, "failed to serialize result envelope");
                }
            }
        }

        if !batch.is_empty() {
            on_payload(batch);
        }
    }

    on_complete();
}
