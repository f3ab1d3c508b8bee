use todo_core::store::RemoteStore;
use todo_core::view::TodoItemView;
use todo_core::{TodoItem, TodoListManager};

use crate::commands::common::resolve_todo;
use crate::error::CliError;

pub async fn run_toggle<S: RemoteStore>(
    manager: &TodoListManager<S>,
    id: &str,
) -> Result<TodoItem, CliError> {
    let mut view = TodoItemView::new(resolve_todo(id, manager).await?);
    view.toggle(manager).await?;

    let item = view.item().clone();
    let state = if item.done { "done" } else { "open" };
    println!("{}  {state}", item.id);
    Ok(item)
}
