//! Domain types for the todo list.
//!
//! A todo list is an ordered collection of items. Display order is insertion
//! order, and every id appears at most once.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use todolist_core::action::TaggedAction;

/// Unique identifier for a todo item
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(u64);

impl TodoId {
    /// Creates a `TodoId` from its numeric value
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the numeric value
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for TodoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single todo item
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoItem {
    /// Unique identifier
    pub id: TodoId,
    /// What needs doing
    pub text: String,
    /// Whether the item is finished
    pub done: bool,
}

impl TodoItem {
    /// Creates an unfinished todo item
    #[must_use]
    pub fn new(id: TodoId, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            done: false,
        }
    }

    /// Returns the item with `done` set
    #[must_use]
    pub fn with_done(mut self, done: bool) -> Self {
        self.done = done;
        self
    }

    /// Flips `done`
    pub fn toggle(&mut self) {
        self.done = !self.done;
    }
}

impl std::fmt::Display for TodoItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mark = if self.done { 'x' } else { ' ' };
        write!(f, "[{mark}] {}", self.text)
    }
}

/// A collection was built with an id that appears twice
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Todo with ID {0} appears more than once")]
pub struct DuplicateTodoId(pub TodoId);

/// Every todo id has been handed out
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("No todo ids left")]
pub struct IdsExhausted;

/// State of the todo list
///
/// The items are private so that the id uniqueness invariant can only be
/// broken from inside this crate, and the reducer does not break it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct TodoState {
    todos: Vec<TodoItem>,
}

impl TodoState {
    /// Creates an empty todo list
    #[must_use]
    pub const fn new() -> Self {
        Self { todos: Vec::new() }
    }

    /// The items every session starts with
    #[must_use]
    pub fn seed() -> Self {
        Self {
            todos: vec![
                TodoItem::new(TodoId::new(1), "프로젝트 생성하기").with_done(true),
                TodoItem::new(TodoId::new(2), "컴포넌트 스타일링하기").with_done(true),
                TodoItem::new(TodoId::new(3), "Context 만들기"),
                TodoItem::new(TodoId::new(4), "기능 구현하기"),
            ],
        }
    }

    /// Builds a todo list from items in display order
    ///
    /// # Errors
    ///
    /// Returns [`DuplicateTodoId`] for the first id that appears twice.
    pub fn try_from_items(items: Vec<TodoItem>) -> Result<Self, DuplicateTodoId> {
        for (index, item) in items.iter().enumerate() {
            if items[..index].iter().any(|earlier| earlier.id == item.id) {
                return Err(DuplicateTodoId(item.id));
            }
        }
        Ok(Self { todos: items })
    }

    /// All items in display order
    #[must_use]
    pub fn items(&self) -> &[TodoItem] {
        &self.todos
    }

    /// Iterates over the items in display order
    pub fn iter(&self) -> std::slice::Iter<'_, TodoItem> {
        self.todos.iter()
    }

    /// Returns the number of todos
    #[must_use]
    pub fn count(&self) -> usize {
        self.todos.len()
    }

    /// Returns the number of todos not yet done
    #[must_use]
    pub fn remaining_count(&self) -> usize {
        self.todos.iter().filter(|t| !t.done).count()
    }

    /// Returns the number of finished todos
    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.todos.iter().filter(|t| t.done).count()
    }

    /// Returns a todo by ID
    #[must_use]
    pub fn get(&self, id: TodoId) -> Option<&TodoItem> {
        self.todos.iter().find(|t| t.id == id)
    }

    /// Checks if a todo exists
    #[must_use]
    pub fn exists(&self, id: TodoId) -> bool {
        self.get(id).is_some()
    }

    /// The smallest id above every id in the list (1 for an empty list)
    ///
    /// # Errors
    ///
    /// Returns [`IdsExhausted`] if the list holds `u64::MAX`.
    pub fn next_free_id(&self) -> Result<TodoId, IdsExhausted> {
        let max = self.todos.iter().map(|t| t.id.get()).max().unwrap_or(0);
        max.checked_add(1).map(TodoId::new).ok_or(IdsExhausted)
    }

    pub(crate) fn push(&mut self, item: TodoItem) {
        self.todos.push(item);
    }

    pub(crate) fn get_mut(&mut self, id: TodoId) -> Option<&mut TodoItem> {
        self.todos.iter_mut().find(|t| t.id == id)
    }

    pub(crate) fn remove(&mut self, id: TodoId) {
        self.todos.retain(|t| t.id != id);
    }
}

impl<'a> IntoIterator for &'a TodoState {
    type Item = &'a TodoItem;
    type IntoIter = std::slice::Iter<'a, TodoItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Actions the todo list accepts
///
/// The serialized form is tagged by `type`, e.g. `{"type":"TOGGLE","id":3}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "UPPERCASE")]
pub enum TodoAction {
    /// Append a new item; its id must come from the session's `NextId`
    Create {
        /// The item to append
        todo: TodoItem,
    },

    /// Flip `done` on the matching item, if any
    Toggle {
        /// Item to toggle
        id: TodoId,
    },

    /// Drop the matching item, if any
    Remove {
        /// Item to remove
        id: TodoId,
    },
}

impl TaggedAction for TodoAction {
    const TAGS: &'static [&'static str] = &["CREATE", "TOGGLE", "REMOVE"];

    fn tag(&self) -> &'static str {
        match self {
            Self::Create { .. } => "CREATE",
            Self::Toggle { .. } => "TOGGLE",
            Self::Remove { .. } => "REMOVE",
        }
    }
}
