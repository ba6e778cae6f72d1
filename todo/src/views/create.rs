//! The "new todo" form.

use crate::context::{CreateTodoError, NextId, TodoProvider, create_todo};
use crate::types::{TodoAction, TodoId};
use todolist_runtime::Dispatcher;

/// The create form: a toggle button and a text input
///
/// The form only needs to write, so it holds no read handle.
pub struct TodoCreate<'a> {
    dispatch: Dispatcher<'a, TodoAction>,
    next_id: &'a NextId,
    open: bool,
    value: String,
}

impl<'a> TodoCreate<'a> {
    /// Closed, empty form bound to a session
    #[must_use]
    pub fn new(provider: &'a TodoProvider) -> Self {
        Self {
            dispatch: provider.dispatch(),
            next_id: provider.next_id(),
            open: false,
            value: String::new(),
        }
    }

    /// Whether the input is shown
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.open
    }

    /// Current input text
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// The round button: show or hide the input
    pub fn toggle_open(&mut self) {
        self.open = !self.open;
    }

    /// Typing into the input
    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }

    /// Enter in the input: append the text as a new todo
    ///
    /// Clears and closes the form. Returns the new id, or `None` when the
    /// form is closed (the input is not on screen, so nothing is submitted).
    ///
    /// # Errors
    ///
    /// Returns [`CreateTodoError`] if the session has no ids left or the
    /// store refuses the `Create`; the form keeps its text in that case.
    pub fn submit(&mut self) -> Result<Option<TodoId>, CreateTodoError> {
        if !self.open {
            return Ok(None);
        }

        let id = create_todo(self.dispatch, self.next_id, self.value.as_str())?;
        tracing::debug!(%id, "Created todo");

        self.value.clear();
        self.open = false;
        Ok(Some(id))
    }
}
