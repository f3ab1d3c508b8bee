use todo_core::store::RemoteStore;
use todo_core::view::TodoItemView;
use todo_core::{TodoItem, TodoListManager};

use crate::commands::common::{normalize_text, parse_reminder, resolve_todo};
use crate::error::CliError;

/// Replace the text and/or reminder; whatever is not given is kept.
pub async fn run_edit<S: RemoteStore>(
    manager: &TodoListManager<S>,
    id: &str,
    text_parts: &[String],
    remind_at: Option<&str>,
    clear_reminder: bool,
) -> Result<TodoItem, CliError> {
    let mut view = TodoItemView::new(resolve_todo(id, manager).await?);
    view.begin_edit();
    if let Some(text) = normalize_text(&text_parts.join(" ")) {
        view.set_text(text);
    }
    if clear_reminder {
        view.set_reminder(None);
    } else if let Some(remind_at) = remind_at {
        view.set_reminder(Some(parse_reminder(remind_at)?));
    }

    view.save(manager).await?;
    let item = view.item().clone();
    println!("{}", item.id);
    Ok(item)
}
