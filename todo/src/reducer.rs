//! Reducer logic for the todo list.
//!
//! Every transition is total: toggling or removing an id that is not in the
//! list leaves the list unchanged. The one refusal is a `Create` whose id is
//! already taken, which would break id uniqueness.

use crate::types::{TodoAction, TodoState};
use todolist_core::reducer::{Reducer, Rejection};

/// Reducer for the todo list
#[derive(Clone, Copy, Debug, Default)]
pub struct TodoReducer;

impl TodoReducer {
    /// Creates a new `TodoReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Reducer for TodoReducer {
    type State = TodoState;
    type Action = TodoAction;
    type Environment = ();

    fn precondition(&self, state: &TodoState, action: &TodoAction) -> Result<(), Rejection> {
        match action {
            TodoAction::Create { todo } if state.exists(todo.id) => Err(Rejection::new(format!(
                "Todo with ID {} already exists",
                todo.id
            ))),
            _ => Ok(()),
        }
    }

    fn reduce(&self, state: &mut TodoState, action: TodoAction, _env: &()) {
        match action {
            TodoAction::Create { todo } => state.push(todo),
            TodoAction::Toggle { id } => {
                if let Some(todo) = state.get_mut(id) {
                    todo.toggle();
                }
            }
            TodoAction::Remove { id } => state.remove(id),
        }
    }
}
