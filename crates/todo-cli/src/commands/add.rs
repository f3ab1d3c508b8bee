use todo_core::store::RemoteStore;
use todo_core::view::NewTodoForm;
use todo_core::{TodoItem, TodoListManager};

use crate::commands::common::{parse_optional_reminder, resolve_todo_text};
use crate::error::CliError;

pub async fn run_add<S: RemoteStore>(
    manager: &TodoListManager<S>,
    text_parts: &[String],
    remind_at: Option<&str>,
) -> Result<TodoItem, CliError> {
    let mut form = NewTodoForm {
        text: resolve_todo_text(text_parts)?,
        reminder: parse_optional_reminder(remind_at)?,
    };

    let item = form.submit(manager).await?;
    println!("{}", item.id);
    Ok(item)
}
