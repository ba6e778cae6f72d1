//! # Todolist Testing
//!
//! Testing utilities and helpers for the todo list state store.
//!
//! This crate provides:
//! - Mock implementations of Environment traits
//! - A Given-When-Then harness for reducers
//! - Property-based testing strategies
//!
//! ## Example
//!
//! ```ignore
//! use todolist_testing::{ReducerTest, test_clock};
//!
//! #[test]
//! fn toggling_flips_done() {
//!     ReducerTest::new(TodoReducer::new())
//!         .with_env(())
//!         .given_state(TodoState::seed())
//!         .when_action(TodoAction::Toggle { id: TodoId::new(3) })
//!         .then_state(|state| assert_eq!(state.remaining_count(), 1))
//!         .run();
//! }
//! ```

use chrono::{DateTime, Utc};
use todolist_core::environment::Clock;


/// Mock implementations for testing.
pub mod mocks {
    use super::{Clock, DateTime, Utc};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use todolist_testing::mocks::FixedClock;
    /// use todolist_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// let time1 = clock.now();
    /// let time2 = clock.now();
    /// assert_eq!(time1, time2); // Always the same!
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC, a Wednesday)
    ///
    /// # Panics
    ///
    /// This function will panic if the hardcoded timestamp fails to parse,
    /// which should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }
}

/// Property-based testing utilities using proptest.
pub mod properties {
    use proptest::collection::hash_set;
    use proptest::prelude::*;

    /// Distinct positive ids, in arbitrary order
    ///
    /// Ids stay below `max_id`, so callers can pick fresh ids above it.
    pub fn distinct_ids(max_len: usize, max_id: u64) -> impl Strategy<Value = Vec<u64>> {
        hash_set(1..max_id.max(2), 0..=max_len)
            .prop_map(|ids| ids.into_iter().collect::<Vec<_>>())
            .prop_shuffle()
    }

    /// Short printable labels
    pub fn label() -> impl Strategy<Value = String> {
        "[a-zA-Z0-9 ]{0,24}"
    }
}

// Re-export commonly used items
pub use mocks::{FixedClock, test_clock};
pub use reducer_test::ReducerTest;
