//! Session wiring: the provider that owns the store and hands out handles.
//!
//! A [`TodoProvider`] is the initialized session. Views borrow a read handle,
//! a dispatch handle and the id counter from it; none of them can outlive the
//! provider, so "used outside the provider" cannot compile.

use crate::config::TodoConfig;
use crate::reducer::TodoReducer;
use crate::types::{IdsExhausted, TodoAction, TodoId, TodoItem, TodoState};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;
use todolist_core::environment::Clock;
use todolist_runtime::{Dispatcher, StateReader, Store, StoreError};
use tokio::sync::broadcast;

/// Store type for the todo list
pub type TodoStore = Store<TodoState, TodoAction, (), TodoReducer>;

/// Source of ids for new todos
///
/// Ids are handed out in increasing order and never reused, even after the
/// todo holding one is removed. The counter stops at `u64::MAX`, which is
/// never handed out.
#[derive(Debug)]
pub struct NextId(AtomicU64);

impl NextId {
    const EXHAUSTED: u64 = u64::MAX;

    /// Counter whose first id is `first`
    #[must_use]
    pub const fn starting_at(first: TodoId) -> Self {
        Self(AtomicU64::new(first.get()))
    }

    /// Counter with no ids left
    #[must_use]
    pub const fn exhausted() -> Self {
        Self(AtomicU64::new(Self::EXHAUSTED))
    }

    /// The id the next call to [`NextId::take`] returns, if any
    #[must_use]
    pub fn peek(&self) -> Option<TodoId> {
        let next = self.0.load(Ordering::SeqCst);
        (next != Self::EXHAUSTED).then_some(TodoId::new(next))
    }

    /// Take an id and advance the counter
    ///
    /// # Errors
    ///
    /// Returns [`IdsExhausted`] once the counter has reached `u64::MAX`.
    pub fn take(&self) -> Result<TodoId, IdsExhausted> {
        let advance = |next: u64| next.checked_add(1);
        self.0
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, advance)
            .map(TodoId::new)
            .map_err(|_| IdsExhausted)
    }
}

/// Creating a todo failed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CreateTodoError {
    /// The session has no ids left for new todos
    #[error(transparent)]
    IdsExhausted(#[from] IdsExhausted),

    /// The store refused the `Create` action
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Append a new unfinished todo with a fresh id
///
/// The id is taken from `next_id` before dispatching, so it is consumed even
/// if the store refuses the action.
///
/// # Errors
///
/// Returns [`CreateTodoError::IdsExhausted`] when `next_id` has no ids left,
/// otherwise whatever the store returns for the `Create` action.
pub fn create_todo(
    dispatch: Dispatcher<'_, TodoAction>,
    next_id: &NextId,
    text: impl Into<String>,
) -> Result<TodoId, CreateTodoError> {
    let id = next_id.take()?;
    dispatch.send(TodoAction::Create {
        todo: TodoItem::new(id, text),
    })?;
    Ok(id)
}

/// The todo session: store, id counter, clock and configuration
pub struct TodoProvider {
    store: TodoStore,
    next_id: NextId,
    clock: Arc<dyn Clock>,
    config: TodoConfig,
}

impl TodoProvider {
    /// Start a session holding the seed todos
    #[must_use]
    pub fn new(config: TodoConfig, clock: Arc<dyn Clock>) -> Self {
        Self::with_todos(config, clock, TodoState::seed())
    }

    /// Start a session holding `todos`
    ///
    /// The id counter starts above the largest id in `todos`. If `todos`
    /// already holds `u64::MAX` the counter starts exhausted, and creating a
    /// todo fails with [`CreateTodoError::IdsExhausted`].
    #[must_use]
    pub fn with_todos(config: TodoConfig, clock: Arc<dyn Clock>, todos: TodoState) -> Self {
        let next_id = todos
            .next_free_id()
            .map_or_else(|_| NextId::exhausted(), NextId::starting_at);
        if next_id.peek().is_none() {
            tracing::warn!("Todo ids exhausted, new todos will be refused");
        }
        tracing::debug!(
            todos = todos.count(),
            next_id = ?next_id.peek(),
            "Todo session started"
        );

        Self {
            store: Store::with_config(todos, TodoReducer::new(), (), config.store_config()),
            next_id,
            clock,
            config,
        }
    }

    /// Run `f` inside a session holding the seed todos
    ///
    /// The session, and every handle borrowed from it, ends when `f` returns.
    pub fn scope<T>(config: TodoConfig, clock: Arc<dyn Clock>, f: impl FnOnce(&Self) -> T) -> T {
        let provider = Self::new(config, clock);
        let output = f(&provider);
        tracing::debug!(
            todos = provider.state().select(TodoState::count),
            "Todo session ended"
        );
        output
    }

    /// Read-only handle onto the todo list
    #[must_use]
    pub const fn state(&self) -> StateReader<'_, TodoState> {
        self.store.reader()
    }

    /// Write-only handle onto the todo list
    #[must_use]
    pub fn dispatch(&self) -> Dispatcher<'_, TodoAction> {
        self.store.dispatcher()
    }

    /// The id counter for new todos
    #[must_use]
    pub const fn next_id(&self) -> &NextId {
        &self.next_id
    }

    /// The clock views read the date from
    #[must_use]
    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    /// Session configuration
    #[must_use]
    pub const fn config(&self) -> &TodoConfig {
        &self.config
    }

    /// Observe every action the session accepts
    #[must_use]
    pub fn subscribe_actions(&self) -> broadcast::Receiver<TodoAction> {
        self.store.subscribe_actions()
    }
}

impl std::fmt::Debug for TodoProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TodoProvider")
            .field("store", &self.store)
            .field("next_id", &self.next_id)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;
    use todolist_testing::test_clock;

    fn provider() -> TodoProvider {
        TodoProvider::new(TodoConfig::default(), Arc::new(test_clock()))
    }

    fn provider_with(todos: Vec<TodoItem>) -> TodoProvider {
        let todos = TodoState::try_from_items(todos).unwrap();
        TodoProvider::with_todos(TodoConfig::default(), Arc::new(test_clock()), todos)
    }

    #[test]
    fn next_id_is_monotonic() {
        let next = NextId::starting_at(TodoId::new(5));
        assert_eq!(next.peek(), Some(TodoId::new(5)));
        assert_eq!(next.take(), Ok(TodoId::new(5)));
        assert_eq!(next.take(), Ok(TodoId::new(6)));
        assert_eq!(next.peek(), Some(TodoId::new(7)));
    }

    #[test]
    fn next_id_stops_instead_of_wrapping() {
        let next = NextId::starting_at(TodoId::new(u64::MAX - 1));
        assert_eq!(next.take(), Ok(TodoId::new(u64::MAX - 1)));
        assert_eq!(next.peek(), None);
        assert_eq!(next.take(), Err(IdsExhausted));
        assert_eq!(next.take(), Err(IdsExhausted));

        let last = NextId::starting_at(TodoId::new(u64::MAX));
        assert_eq!(last.take(), Err(IdsExhausted));
        assert_eq!(NextId::exhausted().peek(), None);
    }

    #[test]
    fn session_starts_from_seed() {
        let provider = provider();
        assert_eq!(provider.state().select(TodoState::count), 4);
        assert_eq!(provider.next_id().peek(), Some(TodoId::new(5)));
    }

    #[test]
    fn created_ids_are_never_reused() {
        let provider = provider();
        let dispatch = provider.dispatch();

        let first = create_todo(dispatch, provider.next_id(), "one").unwrap();
        dispatch.send(TodoAction::Remove { id: first }).unwrap();
        let second = create_todo(dispatch, provider.next_id(), "two").unwrap();
        let third = create_todo(dispatch, provider.next_id(), "three").unwrap();

        assert_eq!([first, second, third].map(TodoId::get), [5, 6, 7]);
        let ids: Vec<_> = provider
            .state()
            .select(|s| s.iter().map(|t| t.id.get()).collect());
        assert_eq!(ids, vec![1, 2, 3, 4, 6, 7]);
    }

    #[test]
    fn with_todos_starts_counter_above_max() {
        let provider = provider_with(vec![
            TodoItem::new(TodoId::new(10), "a"),
            TodoItem::new(TodoId::new(3), "b"),
        ]);
        assert_eq!(provider.next_id().peek(), Some(TodoId::new(11)));
    }

    #[test]
    fn largest_id_in_session_refuses_new_todos() {
        let provider = provider_with(vec![TodoItem::new(TodoId::new(u64::MAX), "last")]);
        assert_eq!(provider.next_id().peek(), None);

        let err = create_todo(provider.dispatch(), provider.next_id(), "more").unwrap_err();
        assert_eq!(err, CreateTodoError::IdsExhausted(IdsExhausted));
        assert_eq!(provider.state().select(TodoState::count), 1);

        // Existing todos still respond
        let id = TodoId::new(u64::MAX);
        provider.dispatch().send(TodoAction::Toggle { id }).unwrap();
        let toggled = provider.state().select(|s| s.get(id).cloned());
        assert_eq!(toggled.map(|t| t.done), Some(true));
    }

    #[test]
    fn counter_near_limit_never_wraps_to_old_ids() {
        let provider = provider_with(vec![TodoItem::new(TodoId::new(u64::MAX - 2), "a")]);
        let dispatch = provider.dispatch();

        let created = create_todo(dispatch, provider.next_id(), "b").unwrap();
        assert_eq!(created, TodoId::new(u64::MAX - 1));

        let err = create_todo(dispatch, provider.next_id(), "c").unwrap_err();
        assert_eq!(err, CreateTodoError::IdsExhausted(IdsExhausted));
        let ids: Vec<_> = provider
            .state()
            .select(|s| s.iter().map(|t| t.id.get()).collect());
        assert_eq!(ids, vec![u64::MAX - 2, u64::MAX - 1]);
    }

    #[test]
    fn scope_returns_closure_output() {
        let clock = Arc::new(test_clock());
        let remaining = TodoProvider::scope(TodoConfig::default(), clock, |ctx| {
            let id = TodoId::new(3);
            ctx.dispatch().send(TodoAction::Toggle { id }).unwrap();
            ctx.state().select(TodoState::remaining_count)
        });
        assert_eq!(remaining, 1);
    }

    #[test]
    fn create_with_taken_id_is_rejected() {
        let provider = provider();
        let err = provider
            .dispatch()
            .send(TodoAction::Create {
                todo: TodoItem::new(TodoId::new(4), "again"),
            })
            .unwrap_err();

        assert!(matches!(err, StoreError::Rejected(reason) if reason.contains("already exists")));
        assert_eq!(provider.state().select(TodoState::count), 4);
    }

    #[test]
    fn create_errors_carry_their_source_message() {
        let refused = CreateTodoError::from(StoreError::Rejected("taken".to_string()));
        assert_eq!(refused.to_string(), "Action rejected: taken");
        assert_eq!(
            CreateTodoError::from(IdsExhausted).to_string(),
            "No todo ids left"
        );
    }
}
