//! # Todolist Core
//!
//! Core traits for the todo list state store.
//!
//! This crate provides the abstractions the runtime and the todo domain are
//! built from:
//!
//! - **State**: the value a store holds (for the todo list, the ordered items)
//! - **Action**: a tagged intent describing a desired state change
//! - **Reducer**: `(State, Action, Environment) → State`, pure and synchronous
//! - **Environment**: injected dependencies, such as the [`environment::Clock`]
//!
//! ## Example
//!
//! ```
//! use todolist_core::reducer::Reducer;
//!
//! #[derive(Clone, Debug, PartialEq)]
//! struct Tally {
//!     count: u32,
//! }
//!
//! enum TallyAction {
//!     Bump,
//! }
//!
//! struct TallyReducer;
//!
//! impl Reducer for TallyReducer {
//!     type State = Tally;
//!     type Action = TallyAction;
//!     type Environment = ();
//!
//!     fn reduce(&self, state: &mut Tally, action: TallyAction, _env: &()) {
//!         match action {
//!             TallyAction::Bump => state.count += 1,
//!         }
//!     }
//! }
//!
//! let mut state = Tally { count: 0 };
//! TallyReducer.reduce(&mut state, TallyAction::Bump, &());
//! assert_eq!(state.count, 1);
//! ```

// Re-export commonly used types
pub use chrono::{DateTime, Utc};
pub use serde::{Deserialize, Serialize};

/// Action module - tagged intents submitted to a store
///
/// Actions that cross the UI boundary arrive as internally tagged values
/// (`{"type": "TOGGLE", "id": 3}`). The tag set is closed: a tag outside it is
/// a programming error and must never reach a reducer.
pub mod action {
    /// Field that carries the action tag in decoded values.
    pub const TAG_FIELD: &str = "type";

    /// An action enum whose variants are addressed by a string tag.
    pub trait TaggedAction {
        /// Every tag the reducer handles.
        const TAGS: &'static [&'static str];

        /// The tag of this action.
        fn tag(&self) -> &'static str;

        /// Whether `tag` names one of this action's variants.
        #[must_use]
        fn is_known_tag(tag: &str) -> bool {
            Self::TAGS.iter().any(|known| *known == tag)
        }
    }
}

/// Reducer module - the core trait for state transitions
///
/// Reducers are pure functions: `(State, Action, Environment) → State`.
/// They are deterministic and testable without a running store.
pub mod reducer {
    use thiserror::Error;

    /// Why an action was refused before its transition ran
    #[derive(Error, Debug, Clone, PartialEq, Eq)]
    #[error("{reason}")]
    pub struct Rejection {
        /// Human-readable reason
        pub reason: String,
    }

    impl Rejection {
        /// Creates a rejection with the given reason
        #[must_use]
        pub fn new(reason: impl Into<String>) -> Self {
            Self {
                reason: reason.into(),
            }
        }
    }

    /// The Reducer trait - core abstraction for state transitions
    ///
    /// # Type Parameters
    ///
    /// - `State`: The state this reducer operates on
    /// - `Action`: The action type this reducer processes
    /// - `Environment`: The injected dependencies this reducer needs
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Checks whether `action` may be applied to `state`
        ///
        /// Runs before [`Reducer::reduce`]. A rejected action leaves the state
        /// untouched. The default accepts every action.
        ///
        /// # Errors
        ///
        /// Returns a [`Rejection`] when applying `action` would break an
        /// invariant of the state.
        fn precondition(
            &self,
            _state: &Self::State,
            _action: &Self::Action,
        ) -> Result<(), Rejection> {
            Ok(())
        }

        /// Reduce an action into a state change
        ///
        /// The transition must be total and free of side effects: the runtime
        /// calls it on a private copy of the current snapshot and publishes
        /// the result.
        ///
        /// # Arguments
        ///
        /// - `state`: Mutable reference to the state being built
        /// - `action`: The action to process
        /// - `env`: Reference to injected dependencies
        fn reduce(&self, state: &mut Self::State, action: Self::Action, env: &Self::Environment);
    }
}

/// Environment module - dependency injection traits
///
/// External dependencies are abstracted behind traits and handed to whoever
/// needs them, so tests can substitute deterministic implementations.
pub mod environment {
    use chrono::{DateTime, Utc};

    /// Clock trait - abstracts time operations for testability
    ///
    /// # Examples
    ///
    /// ```
    /// use todolist_core::environment::{Clock, SystemClock};
    ///
    /// let clock = SystemClock;
    /// let earlier = clock.now();
    /// assert!(clock.now() >= earlier);
    /// ```
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;
    }

    /// Production clock backed by the system time
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }
}
