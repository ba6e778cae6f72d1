//! Scoped capability handles onto a [`Store`](crate::Store).
//!
//! Views never hold the store itself. They receive a [`StateReader`] to read
//! snapshots and a [`Dispatcher`] to submit actions. Both borrow the store, so
//! the compiler rejects any attempt to use them after the owning session is
//! gone. A [`StateSubscription`] is the one owned handle; it reports
//! [`StoreError::SessionEnded`] once its store has been dropped.

use crate::StoreError;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use todolist_core::action::{TAG_FIELD, TaggedAction};
use todolist_core::reducer::Reducer;
use tokio::sync::watch;

/// Anything that accepts actions on behalf of a store
pub trait ActionSink<A> {
    /// Submit an action
    ///
    /// # Errors
    ///
    /// Returns the store's error when the action is refused.
    fn dispatch(&self, action: A) -> Result<(), StoreError>;
}

impl<S, A, E, R> ActionSink<A> for crate::Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E>,
    S: Clone + PartialEq,
    A: Clone,
{
    fn dispatch(&self, action: A) -> Result<(), StoreError> {
        self.send(action)
    }
}

/// Write-only handle onto a store
///
/// Holding a `Dispatcher` gives no access to state.
pub struct Dispatcher<'a, A> {
    sink: &'a dyn ActionSink<A>,
}

impl<'a, A> Dispatcher<'a, A> {
    /// Wrap a sink
    #[must_use]
    pub const fn new(sink: &'a dyn ActionSink<A>) -> Self {
        Self { sink }
    }

    /// Submit a typed action
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Rejected`] when the reducer refuses the action.
    pub fn send(&self, action: A) -> Result<(), StoreError> {
        self.sink.dispatch(action)
    }

    /// Decode a raw action value and submit it
    ///
    /// This is the boundary where UI events enter the store. The tag is
    /// checked before decoding, so an unhandled tag aborts with
    /// [`StoreError::UnknownAction`] instead of being dropped.
    ///
    /// # Errors
    ///
    /// - [`StoreError::MalformedAction`] if `raw` is not an object with a
    ///   string tag, or its fields do not match the tagged variant
    /// - [`StoreError::UnknownAction`] if the tag is not handled
    /// - anything [`Dispatcher::send`] returns
    pub fn send_json(&self, raw: &str) -> Result<(), StoreError>
    where
        A: TaggedAction + DeserializeOwned,
    {
        let action = decode_action::<A>(raw).inspect_err(|error| {
            tracing::error!(error = %error, "Refusing raw action");
        })?;
        tracing::debug!(tag = action.tag(), "Decoded raw action");
        self.send(action)
    }
}

impl<A> Clone for Dispatcher<'_, A> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<A> Copy for Dispatcher<'_, A> {}

impl<A> std::fmt::Debug for Dispatcher<'_, A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher").finish_non_exhaustive()
    }
}

/// Decode a tagged action, rejecting tags outside `A::TAGS`
///
/// The decoded variant must report the same tag it was decoded from.
///
/// # Errors
///
/// See [`Dispatcher::send_json`].
pub fn decode_action<A>(raw: &str) -> Result<A, StoreError>
where
    A: TaggedAction + DeserializeOwned,
{
    let value: serde_json::Value =
        serde_json::from_str(raw).map_err(|e| StoreError::MalformedAction(e.to_string()))?;

    let tag = value
        .get(TAG_FIELD)
        .and_then(serde_json::Value::as_str)
        .map(str::to_owned)
        .ok_or_else(|| {
            StoreError::MalformedAction(format!("missing string field \"{TAG_FIELD}\""))
        })?;

    if !A::is_known_tag(&tag) {
        return Err(StoreError::UnknownAction(tag));
    }

    let action: A =
        serde_json::from_value(value).map_err(|e| StoreError::MalformedAction(e.to_string()))?;
    if action.tag() != tag {
        return Err(StoreError::MalformedAction(format!(
            "tag \"{tag}\" decoded as \"{}\"",
            action.tag()
        )));
    }

    Ok(action)
}

/// Read-only handle onto a store's snapshots
pub struct StateReader<'a, S> {
    state: &'a watch::Sender<Arc<S>>,
}

impl<'a, S> StateReader<'a, S> {
    pub(crate) const fn new(state: &'a watch::Sender<Arc<S>>) -> Self {
        Self { state }
    }

    /// The current snapshot
    #[must_use]
    pub fn snapshot(&self) -> Arc<S> {
        Arc::clone(&self.state.borrow())
    }

    /// Derive a value from the current snapshot
    pub fn select<T>(&self, f: impl FnOnce(&S) -> T) -> T {
        let snapshot = self.snapshot();
        f(&snapshot)
    }

    /// Subscribe to future snapshots
    #[must_use]
    pub fn subscribe(&self) -> StateSubscription<S> {
        StateSubscription::new(self.state.subscribe())
    }
}

impl<S> Clone for StateReader<'_, S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S> Copy for StateReader<'_, S> {}

impl<S: std::fmt::Debug> std::fmt::Debug for StateReader<'_, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("StateReader")
            .field(&self.snapshot())
            .finish()
    }
}

/// Owned subscription to snapshot publication
///
/// Wakes only when a transition changed the state.
#[derive(Debug)]
pub struct StateSubscription<S> {
    receiver: watch::Receiver<Arc<S>>,
}

impl<S> StateSubscription<S> {
    pub(crate) const fn new(receiver: watch::Receiver<Arc<S>>) -> Self {
        Self { receiver }
    }

    /// The latest snapshot, without marking it seen
    #[must_use]
    pub fn current(&self) -> Arc<S> {
        Arc::clone(&self.receiver.borrow())
    }

    /// Whether a snapshot newer than the last one seen was published
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::SessionEnded`] if the store was dropped.
    pub fn has_changed(&self) -> Result<bool, StoreError> {
        self.receiver
            .has_changed()
            .map_err(|_| StoreError::SessionEnded)
    }

    /// Wait for the next published snapshot and mark it seen
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::SessionEnded`] if the store was dropped.
    pub async fn changed(&mut self) -> Result<Arc<S>, StoreError> {
        self.receiver
            .changed()
            .await
            .map_err(|_| StoreError::SessionEnded)?;
        Ok(Arc::clone(&self.receiver.borrow_and_update()))
    }
}
