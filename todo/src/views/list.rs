//! The list of todos, with per-row toggle and remove.

use crate::context::TodoProvider;
use crate::types::{TodoAction, TodoId, TodoState};
use todolist_runtime::{Dispatcher, StateReader, StoreError};

/// The list view
pub struct TodoList<'a> {
    state: StateReader<'a, TodoState>,
    dispatch: Dispatcher<'a, TodoAction>,
}

impl<'a> TodoList<'a> {
    /// List bound to a session
    #[must_use]
    pub fn new(provider: &'a TodoProvider) -> Self {
        Self {
            state: provider.state(),
            dispatch: provider.dispatch(),
        }
    }

    /// One rendered line per todo, in display order
    #[must_use]
    pub fn render(&self) -> Vec<String> {
        self.state
            .select(|todos| todos.iter().map(ToString::to_string).collect())
    }

    /// Row click: flip `done`
    ///
    /// # Errors
    ///
    /// Returns the store's error. The reducer accepts every toggle.
    pub fn toggle(&self, id: TodoId) -> Result<(), StoreError> {
        self.dispatch.send(TodoAction::Toggle { id })
    }

    /// Trash icon: drop the row
    ///
    /// # Errors
    ///
    /// Returns the store's error. The reducer accepts every removal.
    pub fn remove(&self, id: TodoId) -> Result<(), StoreError> {
        self.dispatch.send(TodoAction::Remove { id })
    }
}
