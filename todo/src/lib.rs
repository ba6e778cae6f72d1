//! Todo list state store with header, list, and create-form views.
//!
//! A [`TodoProvider`] owns the session: the store holding the ordered todos,
//! the id counter for new todos, and the clock. Views borrow read and dispatch
//! handles from it:
//!
//! - [`TodoHead`]: today's date and how many todos are left
//! - [`TodoList`]: the rows, with toggle and remove
//! - [`TodoCreate`]: the form that appends a todo with a fresh id
//!
//! # Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use todolist::{TodoAction, TodoConfig, TodoHead, TodoId, TodoProvider};
//! use todolist_core::environment::SystemClock;
//!
//! let remaining = TodoProvider::scope(TodoConfig::default(), Arc::new(SystemClock), |ctx| {
//!     ctx.dispatch().send(TodoAction::Toggle { id: TodoId::new(3) })?;
//!     Ok::<_, todolist_runtime::StoreError>(TodoHead::new(ctx).remaining())
//! })?;
//!
//! assert_eq!(remaining, 1);
//! # Ok::<(), todolist_runtime::StoreError>(())
//! ```

pub mod config;
pub mod context;
pub mod reducer;
pub mod types;
pub mod views;

// Re-export commonly used types
pub use config::{ConfigError, Locale, TodoConfig};
pub use context::{CreateTodoError, NextId, TodoProvider, TodoStore, create_todo};
pub use reducer::TodoReducer;
pub use types::{DuplicateTodoId, IdsExhausted, TodoAction, TodoId, TodoItem, TodoState};
pub use views::{HeadView, TodoCreate, TodoHead, TodoList};
