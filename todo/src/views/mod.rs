//! Views over a todo session.
//!
//! Views read through a `StateReader` and write through a `Dispatcher`; none
//! of them touches the todo list directly.

pub mod create;
pub mod head;
pub mod list;

pub use create::TodoCreate;
pub use head::{HeadView, TodoHead};
pub use list::TodoList;
