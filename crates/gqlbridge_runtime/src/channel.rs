//! Cross-thread payload handoff for one registered operation.
//!
//! A `PayloadChannel` is shared between the engine's producer sink, the
//! drain worker, and the cancellation path. The mutex here is the bridge's
//! sole point of mutual exclusion; producers hold it only for the push and
//! never across engine calls.

use gqlbridge_core::{PendingResult, SubscriptionKey};
use std::collections::VecDeque;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

/// Engine-side teardown for a subscription key, invoked at most once.
pub type Unsubscriber = Box<dyn FnOnce(SubscriptionKey) + Send>;

#[derive(Default)]
struct ChannelState {
    payloads: VecDeque<PendingResult>,
    key: Option<SubscriptionKey>,
    unsubscribe: Option<Unsubscriber>,
    registered: bool,
}

/// Thread-safe queue of pending results plus the liveness flag and wakeup
/// condition for one operation.
#[derive(Default)]
pub struct PayloadChannel {
    state: Mutex<ChannelState>,
    condition: Condvar,
}

impl PayloadChannel {
    pub fn new() -> Self {
        Self::default()
    }

    // A producer panicking mid-push leaves the queue consistent, so a
    // poisoned lock is recovered rather than cascading the panic.
    fn lock(&self) -> MutexGuard<'_, ChannelState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Marks the channel live.
    ///
    /// Runs before the engine registration call so payloads emitted while
    /// the registration is still in flight are queued, not dropped.
    pub(crate) fn open(&self) {
        self.lock().registered = true;
    }

    /// Attaches the engine's subscription key and teardown to a live
    /// channel.
    pub(crate) fn attach_subscription(&self, key: SubscriptionKey, unsubscribe: Unsubscriber) {
        let mut state = self.lock();
        state.key = Some(key);
        state.unsubscribe = Some(unsubscribe);
    }

    /// Whether the channel has been opened and not yet cancelled.
    pub(crate) fn is_live(&self) -> bool {
        self.lock().registered
    }

    /// Queues a payload from the engine's producer sink.
    ///
    /// Stale pushes arriving after cancellation are silently dropped; the
    /// engine may fire once more while teardown is racing it.
    pub fn push(&self, payload: PendingResult) {
        let mut state = self.lock();

        if !state.registered {
            return;
        }

        state.payloads.push_back(payload);

        drop(state);
        self.condition.notify_one();
    }

    /// Queues a payload regardless of liveness.
    ///
    /// Start-time only: carries the one-shot resolution (the channel is
    /// never marked live, so the drain loop delivers once and exits) and
    /// the synthetic envelope for a failed preparation.
    pub(crate) fn prime(&self, payload: PendingResult) {
        let mut state = self.lock();

        state.payloads.push_back(payload);

        drop(state);
        self.condition.notify_one();
    }

    /// Blocks until cancelled or work arrives, then takes the entire queue.
    ///
    /// Returns the drained payloads in arrival order and whether the
    /// channel was still live at the time of the take. This is the only
    /// blocking point in the bridge, and it runs on the drain worker.
    pub(crate) fn wait_for_work(&self) -> (VecDeque<PendingResult>, bool) {
        let mut state = self.lock();

        while state.registered && state.payloads.is_empty() {
            state = self
                .condition
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }

        let drained = std::mem::take(&mut state.payloads);

        (drained, state.registered)
    }

    /// Cancels the operation; safe to call concurrently with delivery and
    /// idempotent.
    ///
    /// The engine-side unsubscribe runs outside the channel lock, otherwise
    /// it could deadlock against a producer push that is waiting on that
    /// lock. It blocks until the engine guarantees no further sink calls.
    pub fn cancel(&self) {
        let mut state = self.lock();

        if !state.registered {
            return;
        }

        state.registered = false;

        let key = state.key.take();
        let unsubscribe = state.unsubscribe.take();

        drop(state);
        self.condition.notify_one();

        if let (Some(key), Some(unsubscribe)) = (key, unsubscribe) {
            unsubscribe(key);
        }
    }
}

impl Drop for PayloadChannel {
    // An operation that is simply dropped must not leak an engine
    // subscription or a blocked worker.
    fn drop(&mut self) {
        self.cancel();
    }
}
