//! Metric names recorded by the store.
//!
//! The store records through the `metrics` facade. Nothing is exported unless
//! the embedding application installs a recorder; [`describe_metrics`] attaches
//! descriptions to whichever recorder is installed.

use ::metrics::{Unit, describe_counter, describe_histogram};

/// Actions submitted to any store
pub const ACTIONS_TOTAL: &str = "store.actions.total";

/// Actions refused by a reducer precondition
pub const ACTIONS_REJECTED: &str = "store.actions.rejected";

/// Time spent inside `Reducer::reduce`
pub const REDUCER_DURATION_SECONDS: &str = "store.reducer.duration_seconds";

/// Transitions that produced a new snapshot
pub const SNAPSHOTS_PUBLISHED: &str = "store.snapshots.published";

/// Register descriptions for every store metric
pub fn describe_metrics() {
    describe_counter!(ACTIONS_TOTAL, "Total number of actions sent to stores");
    describe_counter!(
        ACTIONS_REJECTED,
        "Actions refused before their transition ran"
    );
    describe_histogram!(
        REDUCER_DURATION_SECONDS,
        Unit::Seconds,
        "Reducer execution duration in seconds"
    );
    describe_counter!(
        SNAPSHOTS_PUBLISHED,
        "Transitions that changed state and published a snapshot"
    );
}
