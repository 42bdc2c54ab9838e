//! The public lifecycle object for the bridge.
//!
//! A `Service` owns the engine handle, the query store, and the operation
//! registry. All of its methods are meant to be called from one serialized
//! consumer context; only the drain workers and the engine's producer
//! threads run elsewhere.

use crate::registry::OperationRegistry;
use crate::runner::{CompleteCallback, OperationRunner, PayloadCallback};
use crate::store::QueryStore;
use gqlbridge_core::{BridgeError, ExecutionEngine, QueryHandle};
use std::sync::Arc;

/// Execution/subscription bridge over a backing engine.
pub struct Service<E: ExecutionEngine> {
    engine: Arc<E>,
    store: QueryStore<E::Program>,
    registry: OperationRegistry,
}

impl<E: ExecutionEngine> Service<E> {
    /// Starts the service over `engine`.
    ///
    /// Engine-specific startup options (such as profile selection) belong
    /// to the engine's own constructor.
    pub fn new(engine: E) -> Self {
        Self {
            engine: Arc::new(engine),
            store: QueryStore::new(),
            registry: OperationRegistry::new(),
        }
    }

    /// Parses query text and stores the program under a fresh handle.
    ///
    /// On a parse error no handle is allocated and the store is unchanged.
    pub fn parse_query(&mut self, text: &str) -> Result<QueryHandle, BridgeError> {
        let program = self.engine.parse(text)?;
        Ok(self.store.insert(program))
    }

    /// Discards a stored query program; no-op for an unknown handle.
    ///
    /// In-flight operations on the handle are unaffected: they cloned the
    /// program at start time.
    pub fn discard_query(&mut self, handle: QueryHandle) {
        self.store.discard(handle);
    }

    /// Starts the named operation of a stored query.
    ///
    /// `on_payload` receives one or more JSON-encoded result envelopes per
    /// delivery batch; `on_complete` fires exactly once when the
    /// operation's drain loop exits. Preparation failures are delivered
    /// through the same callbacks as a single error envelope plus
    /// completion.
    pub fn fetch_query(
        &mut self,
        handle: QueryHandle,
        operation_name: &str,
        variables_json: &str,
        on_payload: PayloadCallback,
        on_complete: CompleteCallback,
    ) {
        tracing::debug!(handle, operation = operation_name, "starting operation");

        let runner = OperationRunner::start(
            &self.engine,
            &self.store,
            handle,
            operation_name,
            variables_json,
            on_payload,
            on_complete,
        );

        self.registry.begin(handle, Arc::clone(runner.channel()));
    }

    /// Cancels the active operation under `handle`; no-op if absent.
    ///
    /// In-flight payloads drain before the operation completes; payloads
    /// produced after the cancellation takes effect are dropped. Calling
    /// this twice never reaches the engine's unsubscribe twice.
    pub fn unsubscribe(&mut self, handle: QueryHandle) {
        self.registry.cancel(handle);
    }

    /// Tears the service down: cancels every active operation and clears
    /// the query store.
    pub fn stop(&mut self) {
        tracing::debug!(
            active = self.registry.len(),
            stored = self.store.len(),
            "stopping service"
        );

        self.registry.cancel_all();
        self.store.clear();
    }
}

impl<E: ExecutionEngine> Drop for Service<E> {
    fn drop(&mut self) {
        self.stop();
    }
}
