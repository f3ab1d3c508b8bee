use chrono::Utc;
use todo_core::auth::{welcome_line, SessionContext, SessionPersistence};
use todo_core::store::RemoteStore;
use todo_core::TodoListManager;

use crate::commands::common::{format_todo_lines, todo_to_list_item, TodoListItem};
use crate::error::CliError;

pub async fn run_list<S: RemoteStore, P: SessionPersistence>(
    manager: &TodoListManager<S>,
    session: &SessionContext<P>,
    as_json: bool,
) -> Result<(), CliError> {
    let items = manager.items().await;

    if as_json {
        let json_items = items
            .iter()
            .map(todo_to_list_item)
            .collect::<Vec<TodoListItem>>();
        println!("{}", serde_json::to_string_pretty(&json_items)?);
        return Ok(());
    }

    if let Some(welcome) = welcome_line(session.current_user()) {
        println!("{welcome}");
    }
    if items.is_empty() {
        println!("No todos yet.");
    }
    for line in format_todo_lines(&items, Utc::now()) {
        println!("{line}");
    }

    Ok(())
}
