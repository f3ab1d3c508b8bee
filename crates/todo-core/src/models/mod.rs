//! Data models for the todo app

mod settings;
mod todo;

pub use settings::{Palette, Settings, ThemeMode};
pub use todo::{normalize_todo_text, TodoDocument, TodoId, TodoItem, TodoPatch};
