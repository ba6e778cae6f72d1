//! # Todolist Runtime
//!
//! Runtime implementation of the state store.
//!
//! This crate provides the [`Store`] that owns a state value, runs the reducer
//! for every dispatched action and publishes immutable snapshots to views.
//!
//! ## Core Components
//!
//! - **Store**: owns the current snapshot, the reducer and its environment
//! - **Snapshot topic**: [`StateReader`] and [`StateSubscription`] observe state
//! - **Dispatch topic**: [`Dispatcher`] submits actions; action observers are
//!   reached through [`Store::subscribe_actions`]
//!
//! The two topics are segregated: action observers are not woken by snapshot
//! publication, and snapshot subscribers are not woken by actions that leave
//! the state unchanged.
//!
//! ## Example
//!
//! ```ignore
//! use todolist_runtime::Store;
//!
//! let store = Store::new(initial_state, my_reducer, environment);
//!
//! // Send an action
//! store.send(Action::DoSomething)?;
//!
//! // Read state
//! let value = store.state(|s| s.some_field);
//! ```

use std::sync::Arc;
use std::time::Instant;
use todolist_core::reducer::Reducer;

/// Scoped read and write handles onto a store
pub mod handle;

/// Metric names and descriptions
pub mod metrics;

pub use handle::{ActionSink, Dispatcher, StateReader, StateSubscription};

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during Store operations
    ///
    /// None of these are transient: each one reports misuse of the store by
    /// the code wired around it, so callers should not retry.
    #[derive(Error, Debug, Clone, PartialEq, Eq)]
    pub enum StoreError {
        /// A raw action carried a tag the reducer does not handle
        ///
        /// The transition is aborted and the state is left untouched.
        #[error("Unhandled action type: {0}")]
        UnknownAction(String),

        /// A raw action could not be decoded
        #[error("Malformed action: {0}")]
        MalformedAction(String),

        /// The reducer refused the action before its transition ran
        #[error("Action rejected: {0}")]
        Rejected(String),

        /// The store that owned this handle has been dropped
        #[error("Store session has ended")]
        SessionEnded,
    }
}

pub use error::StoreError;

/// Configuration for Store instances
///
/// # Example
///
/// ```
/// use todolist_runtime::StoreConfig;
///
/// let config = StoreConfig::default().with_broadcast_capacity(64);
/// assert_eq!(config.broadcast_capacity, 64);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Number of actions buffered for slow action observers
    pub broadcast_capacity: usize,
}

impl StoreConfig {
    /// Default action broadcast capacity
    pub const DEFAULT_BROADCAST_CAPACITY: usize = 16;

    /// Create a new configuration with custom values
    ///
    /// A capacity of zero is raised to one.
    #[must_use]
    pub fn new(broadcast_capacity: usize) -> Self {
        Self {
            broadcast_capacity: broadcast_capacity.max(1),
        }
    }

    /// Set the action broadcast capacity
    ///
    /// A capacity of zero is raised to one.
    #[must_use]
    pub fn with_broadcast_capacity(mut self, capacity: usize) -> Self {
        self.broadcast_capacity = capacity.max(1);
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            broadcast_capacity: Self::DEFAULT_BROADCAST_CAPACITY,
        }
    }
}

/// Store runtime for coordinating reducer execution and snapshot publication.
pub mod store {
    use super::handle::{Dispatcher, StateReader, StateSubscription};
    use super::metrics as names;
    use super::{Arc, Instant, Reducer, StoreConfig, StoreError};
    use tokio::sync::{broadcast, watch};

    /// The Store - runtime coordinator for a reducer
    ///
    /// The Store manages:
    /// 1. State (the current snapshot, behind a `watch` channel)
    /// 2. Reducer (transition logic)
    /// 3. Environment (injected dependencies)
    /// 4. Action broadcast (observers of the dispatch topic)
    ///
    /// Snapshots are never mutated after publication. Each accepted action
    /// runs the reducer on a private copy of the current snapshot; the copy
    /// replaces the snapshot only when it differs from it.
    ///
    /// # Type Parameters
    ///
    /// - `S`: State type
    /// - `A`: Action type
    /// - `E`: Environment type
    /// - `R`: Reducer implementation
    pub struct Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        state: watch::Sender<Arc<S>>,
        reducer: R,
        environment: E,
        /// Every accepted action is sent here after its transition ran.
        action_broadcast: broadcast::Sender<A>,
    }

    impl<S, A, E, R> Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
        S: Clone + PartialEq,
        A: Clone,
    {
        /// Create a new store with initial state, reducer, and environment
        ///
        /// Uses [`StoreConfig::default`].
        #[must_use]
        pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
            Self::with_config(initial_state, reducer, environment, StoreConfig::default())
        }

        /// Create a new Store with custom configuration
        #[must_use]
        pub fn with_config(
            initial_state: S,
            reducer: R,
            environment: E,
            config: StoreConfig,
        ) -> Self {
            let (state, _) = watch::channel(Arc::new(initial_state));
            let (action_broadcast, _) = broadcast::channel(config.broadcast_capacity.max(1));

            Self {
                state,
                reducer,
                environment,
                action_broadcast,
            }
        }

        /// Send an action to the store
        ///
        /// 1. Checks the reducer's precondition against the current snapshot
        /// 2. Runs the reducer on a copy of the snapshot, under the write lock
        /// 3. Publishes the copy if it differs from the snapshot
        /// 4. Broadcasts the action to action observers
        ///
        /// The transition runs to completion before `send` returns, so a
        /// render that follows observes its result.
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::Rejected`] if the reducer's precondition
        /// refuses the action. The state is untouched in that case.
        #[tracing::instrument(skip(self, action), name = "store_send")]
        pub fn send(&self, action: A) -> Result<(), StoreError> {
            tracing::debug!("Processing action");
            metrics::counter!(names::ACTIONS_TOTAL).increment(1);

            let observed = action.clone();
            let mut outcome = Ok(());

            let published = self.state.send_if_modified(|snapshot| {
                tracing::trace!("Acquired write lock on state");

                if let Err(rejection) = self.reducer.precondition(&**snapshot, &action) {
                    outcome = Err(StoreError::Rejected(rejection.reason));
                    return false;
                }

                let span = tracing::debug_span!("reducer_execution");
                let _enter = span.enter();

                let start = Instant::now();
                let mut next = S::clone(&**snapshot);
                self.reducer.reduce(&mut next, action, &self.environment);
                metrics::histogram!(names::REDUCER_DURATION_SECONDS)
                    .record(start.elapsed().as_secs_f64());

                if next == **snapshot {
                    false
                } else {
                    *snapshot = Arc::new(next);
                    true
                }
            });

            if let Err(error) = &outcome {
                tracing::error!(error = %error, "Action rejected");
                metrics::counter!(names::ACTIONS_REJECTED).increment(1);
                return outcome;
            }

            if published {
                tracing::trace!("Published new snapshot");
                metrics::counter!(names::SNAPSHOTS_PUBLISHED).increment(1);
            } else {
                tracing::trace!("Transition left state unchanged");
            }

            // No observers is not an error
            let _ = self.action_broadcast.send(observed);
            tracing::debug!("Action processing completed");

            Ok(())
        }

        /// Read current state via a closure
        ///
        /// ```ignore
        /// let todo_count = store.state(|s| s.count());
        /// ```
        ///
        /// The closure sees a snapshot; it may call back into the store.
        pub fn state<F, T>(&self, f: F) -> T
        where
            F: FnOnce(&S) -> T,
        {
            let snapshot = self.snapshot();
            f(&snapshot)
        }

        /// The current snapshot
        #[must_use]
        pub fn snapshot(&self) -> Arc<S> {
            Arc::clone(&self.state.borrow())
        }

        /// Subscribe to snapshot publication
        ///
        /// The subscription starts with the current snapshot marked as seen.
        #[must_use]
        pub fn subscribe(&self) -> StateSubscription<S> {
            StateSubscription::new(self.state.subscribe())
        }

        /// Subscribe to actions accepted by the store
        ///
        /// Observers receive each accepted action after its transition ran,
        /// whether or not it changed the state. Slow observers lag once more
        /// than [`StoreConfig::broadcast_capacity`] actions are buffered.
        #[must_use]
        pub fn subscribe_actions(&self) -> broadcast::Receiver<A> {
            self.action_broadcast.subscribe()
        }

        /// Read-only handle valid for as long as the store is borrowed
        #[must_use]
        pub const fn reader(&self) -> StateReader<'_, S> {
            StateReader::new(&self.state)
        }

        /// Write-only handle valid for as long as the store is borrowed
        #[must_use]
        pub fn dispatcher(&self) -> Dispatcher<'_, A> {
            Dispatcher::new(self)
        }
    }

    impl<S, A, E, R> std::fmt::Debug for Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
        S: std::fmt::Debug,
    {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("Store")
                .field("state", &*self.state.borrow())
                .field("action_observers", &self.action_broadcast.receiver_count())
                .finish_non_exhaustive()
        }
    }
}

pub use store::Store;

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;
    use todolist_core::reducer::Rejection;

    #[derive(Debug, Clone, PartialEq, Default)]
    struct Shelf {
        books: Vec<u32>,
    }

    #[derive(Debug, Clone, PartialEq)]
    enum ShelfAction {
        Add(u32),
        Take(u32),
    }

    struct ShelfReducer;

    impl Reducer for ShelfReducer {
        type State = Shelf;
        type Action = ShelfAction;
        type Environment = ();

        fn precondition(&self, state: &Shelf, action: &ShelfAction) -> Result<(), Rejection> {
            match action {
                ShelfAction::Add(book) if state.books.contains(book) => {
                    Err(Rejection::new(format!("book {book} already shelved")))
                }
                _ => Ok(()),
            }
        }

        fn reduce(&self, state: &mut Shelf, action: ShelfAction, _env: &()) {
            match action {
                ShelfAction::Add(book) => state.books.push(book),
                ShelfAction::Take(book) => state.books.retain(|b| *b != book),
            }
        }
    }

    fn shelf_store() -> Store<Shelf, ShelfAction, (), ShelfReducer> {
        Store::new(Shelf::default(), ShelfReducer, ())
    }

    #[test]
    fn send_applies_transition() {
        let store = shelf_store();
        store.send(ShelfAction::Add(1)).unwrap();
        store.send(ShelfAction::Add(2)).unwrap();

        assert_eq!(store.state(|s| s.books.clone()), vec![1, 2]);
    }

    #[test]
    fn old_snapshots_are_not_mutated() {
        let store = shelf_store();
        store.send(ShelfAction::Add(1)).unwrap();
        let before = store.snapshot();

        store.send(ShelfAction::Add(2)).unwrap();

        assert_eq!(before.books, vec![1]);
        assert_eq!(store.snapshot().books, vec![1, 2]);
    }

    #[test]
    fn rejected_action_leaves_state_untouched() {
        let store = shelf_store();
        store.send(ShelfAction::Add(7)).unwrap();
        let before = store.snapshot();

        let err = store.send(ShelfAction::Add(7)).unwrap_err();

        let reason = "book 7 already shelved".to_string();
        assert_eq!(err, StoreError::Rejected(reason));
        assert!(Arc::ptr_eq(&before, &store.snapshot()));
    }

    #[test]
    fn unchanged_transition_keeps_snapshot_identity() {
        let store = shelf_store();
        store.send(ShelfAction::Add(1)).unwrap();
        let before = store.snapshot();

        store.send(ShelfAction::Take(99)).unwrap();

        assert!(Arc::ptr_eq(&before, &store.snapshot()));
    }

    #[test]
    fn state_closure_may_dispatch() {
        let store = shelf_store();
        store.state(|s| {
            let next = s.books.len() as u32 + 10;
            store.send(ShelfAction::Add(next)).unwrap();
        });
        assert_eq!(store.snapshot().books, vec![10]);
    }

    #[test]
    fn action_observers_see_accepted_actions_only() {
        let store = shelf_store();
        let mut actions = store.subscribe_actions();

        store.send(ShelfAction::Add(3)).unwrap();
        let _ = store.send(ShelfAction::Add(3));
        store.send(ShelfAction::Take(42)).unwrap();

        assert_eq!(actions.try_recv().unwrap(), ShelfAction::Add(3));
        assert_eq!(actions.try_recv().unwrap(), ShelfAction::Take(42));
        assert!(actions.try_recv().is_err());
    }

    #[test]
    fn config_capacity_is_at_least_one() {
        assert_eq!(StoreConfig::new(0).broadcast_capacity, 1);
        let config = StoreConfig::default().with_broadcast_capacity(0);
        assert_eq!(config.broadcast_capacity, 1);
        assert_eq!(
            StoreConfig::default().broadcast_capacity,
            StoreConfig::DEFAULT_BROADCAST_CAPACITY
        );
    }

    #[test]
    fn store_with_config_accepts_small_capacity() {
        let store = Store::with_config(Shelf::default(), ShelfReducer, (), StoreConfig::new(1));
        let mut actions = store.subscribe_actions();

        store.send(ShelfAction::Add(1)).unwrap();
        store.send(ShelfAction::Add(2)).unwrap();

        // Capacity 1: the first action was overwritten
        assert!(matches!(
            actions.try_recv(),
            Err(tokio::sync::broadcast::error::TryRecvError::Lagged(1))
        ));
        assert_eq!(actions.try_recv().unwrap(), ShelfAction::Add(2));
    }
}
