//! Active operations, addressable for cancellation.

use crate::channel::PayloadChannel;
use gqlbridge_core::QueryHandle;
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// Maps a query handle to its active operation's channel.
///
/// An entry exists iff a runner for that handle is active: inserted when
/// the operation begins, removed on explicit cancellation. Accessed only
/// from the consumer context.
#[derive(Default)]
pub struct OperationRegistry {
    channels: FxHashMap<QueryHandle, Arc<PayloadChannel>>,
}

impl OperationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a started operation under its handle.
    ///
    /// Starting a second operation under a live handle cancels the
    /// displaced channel; leaving it running would make it unreachable for
    /// any later cancellation by handle.
    pub fn begin(&mut self, handle: QueryHandle, channel: Arc<PayloadChannel>) {
        if let Some(previous) = self.channels.insert(handle, channel) {
            tracing::debug!(handle, "replacing live operation, cancelling prior");
            previous.cancel();
        }
    }

    /// Cancels and removes the operation under `handle`; no-op if absent.
    pub fn cancel(&mut self, handle: QueryHandle) {
        if let Some(channel) = self.channels.remove(&handle) {
            channel.cancel();
        }
    }

    /// Cancels every active operation; global shutdown only.
    pub fn cancel_all(&mut self) {
        for (_, channel) in self.channels.drain() {
            channel.cancel();
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.channels.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }
}
