//! Stored query programs keyed by handle.

use gqlbridge_core::{BridgeError, QueryHandle};
use std::collections::BTreeMap;

/// Pure mapping from handle to parsed query program.
///
/// Accessed only from the consumer context; runners clone the program out
/// at start time rather than borrowing into the store, so an entry may be
/// discarded while an operation on it is still in flight.
pub struct QueryStore<P> {
    programs: BTreeMap<QueryHandle, P>,
}

impl<P> Default for QueryStore<P> {
    fn default() -> Self {
        Self {
            programs: BTreeMap::new(),
        }
    }
}

impl<P: Clone> QueryStore<P> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a program, allocating the next handle.
    ///
    /// Handles are `max(existing) + 1`, starting at 1, so a handle is never
    /// reused while its program is stored.
    pub fn insert(&mut self, program: P) -> QueryHandle {
        let handle = self.programs.keys().next_back().map_or(1, |last| last + 1);

        self.programs.insert(handle, program);
        handle
    }

    /// Removes a stored program; no-op if absent.
    pub fn discard(&mut self, handle: QueryHandle) {
        self.programs.remove(&handle);
    }

    /// Clones the program under `handle` for a runner starting up.
    pub fn get(&self, handle: QueryHandle) -> Result<P, BridgeError> {
        self.programs
            .get(&handle)
            .cloned()
            .ok_or(BridgeError::UnknownQuery(handle))
    }

    /// Drops every stored program.
    pub fn clear(&mut self) {
        self.programs.clear();
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.programs.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.programs.len()
    }
}
