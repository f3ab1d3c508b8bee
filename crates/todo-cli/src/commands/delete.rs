use todo_core::store::RemoteStore;
use todo_core::view::TodoItemView;
use todo_core::{TodoId, TodoListManager};

use crate::commands::common::resolve_todo;
use crate::error::CliError;

pub async fn run_delete<S: RemoteStore>(
    manager: &TodoListManager<S>,
    id: &str,
) -> Result<TodoId, CliError> {
    let view = TodoItemView::new(resolve_todo(id, manager).await?);
    view.delete(manager).await?;

    let id = view.item().id.clone();
    println!("{id}");
    Ok(id)
}
