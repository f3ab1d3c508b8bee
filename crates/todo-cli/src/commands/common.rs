use std::io::{self, IsTerminal, Read};
use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use serde::Serialize;
use todo_core::auth::{SessionContext, SessionPersistence};
use todo_core::config::ClientConfig;
use todo_core::notify::{Notification, Notifier, NotifyKind, TracingNotifier};
use todo_core::store::{FirestoreStore, RemoteStore};
use todo_core::{TodoId, TodoItem, TodoListManager};

use crate::auth::{restore_session, SessionStore};
use crate::error::CliError;

const LOCAL_REMINDER_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M"];

/// Prints notifications to stderr so stdout stays machine-readable
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notification: Notification) {
        let label = match notification.kind {
            NotifyKind::Success => "success",
            NotifyKind::Error => "error",
            NotifyKind::Info => "info",
        };
        eprintln!("[{label}] {}", notification.message);
    }
}

/// Console output on a terminal, timestamped log lines otherwise.
pub fn default_notifier() -> Arc<dyn Notifier> {
    if io::stderr().is_terminal() {
        Arc::new(ConsoleNotifier)
    } else {
        Arc::new(TracingNotifier)
    }
}

/// Loaded list plus the session it was fetched with
pub struct Workspace<S: RemoteStore> {
    pub manager: TodoListManager<S>,
    pub session: SessionContext<SessionStore>,
    pub config: ClientConfig,
}

pub fn load_config(config_path: Option<&Path>) -> Result<ClientConfig, CliError> {
    Ok(ClientConfig::load(config_path)?)
}

/// Restore the stored session; a broken keychain leaves the user signed out.
pub async fn open_session(
    config: &ClientConfig,
) -> Result<SessionContext<SessionStore>, CliError> {
    match restore_session(config).await {
        Ok(session) => Ok(session),
        Err(error) => {
            tracing::warn!("Continuing signed out: {}", error);
            Ok(SessionContext::new(config, SessionStore::for_config(config))?)
        }
    }
}

/// Build the remote-backed manager and run its single startup load.
pub async fn open_workspace(
    config_path: Option<&Path>,
) -> Result<Workspace<FirestoreStore>, CliError> {
    let config = load_config(config_path)?;
    let session = open_session(&config).await?;
    let store = FirestoreStore::new(&config.remote()?)?
        .with_id_token(session.id_token().map(str::to_string));
    Ok(start_workspace(store, session, config, default_notifier()).await)
}

/// Load the list once. A failed load has already been reported by the
/// manager, so the workspace continues with an empty list.
pub async fn start_workspace<S: RemoteStore>(
    store: S,
    session: SessionContext<SessionStore>,
    config: ClientConfig,
    notifier: Arc<dyn Notifier>,
) -> Workspace<S> {
    let manager = TodoListManager::new(store, notifier, config.collection.clone());
    if let Err(error) = manager.load().await {
        tracing::warn!("Continuing with an empty list: {}", error);
    }
    Workspace {
        manager,
        session,
        config,
    }
}

#[derive(Debug, Serialize)]
pub struct TodoListItem {
    pub id: String,
    pub text: String,
    pub done: bool,
    pub reminder: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
}

pub fn todo_to_list_item(item: &TodoItem) -> TodoListItem {
    TodoListItem {
        id: item.id.to_string(),
        text: item.text.clone(),
        done: item.done,
        reminder: item.reminder,
        created_at: item.created_at,
    }
}

pub fn format_todo_lines(items: &[TodoItem], now: DateTime<Utc>) -> Vec<String> {
    items
        .iter()
        .map(|item| {
            let short_id = item.id.as_str().chars().take(13).collect::<String>();
            let mark = if item.done { "[x]" } else { "[ ]" };
            let text = todo_preview(&item.text, 40);
            let age = item.created_at.map_or_else(String::new, |created_at| {
                format_relative_time(created_at.timestamp_millis(), now.timestamp_millis())
            });

            match item.reminder {
                Some(reminder) => format!(
                    "{short_id:<13}  {mark} {text:<40}  {age:<10}  @ {}",
                    format_reminder(reminder)
                ),
                None => format!("{short_id:<13}  {mark} {text:<40}  {age}")
                    .trim_end()
                    .to_string(),
            }
        })
        .collect()
}

pub fn todo_preview(text: &str, max_chars: usize) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");

    if collapsed.chars().count() <= max_chars {
        collapsed
    } else {
        let take_len = max_chars.saturating_sub(3);
        let mut truncated = collapsed.chars().take(take_len).collect::<String>();
        truncated.push_str("...");
        truncated
    }
}

pub fn format_reminder(reminder: DateTime<Utc>) -> String {
    reminder
        .with_timezone(&Local)
        .format("%Y-%m-%d %H:%M")
        .to_string()
}

pub fn format_relative_time(timestamp_ms: i64, now_ms: i64) -> String {
    let diff = now_ms.saturating_sub(timestamp_ms);
    let minute = 60_000;
    let hour = 60 * minute;
    let day = 24 * hour;
    let week = 7 * day;

    if diff < minute {
        "just now".to_string()
    } else if diff < hour {
        format!("{}m ago", diff / minute)
    } else if diff < day {
        format!("{}h ago", diff / hour)
    } else if diff < week {
        format!("{}d ago", diff / day)
    } else {
        format!("{}w ago", diff / week)
    }
}

/// Parse a reminder as RFC 3339, or as a wall-clock time in `zone`.
pub fn parse_reminder_in<Tz: TimeZone>(value: &str, zone: &Tz) -> Result<DateTime<Utc>, CliError> {
    let value = value.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Ok(parsed.with_timezone(&Utc));
    }

    LOCAL_REMINDER_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .and_then(|naive| zone.from_local_datetime(&naive).earliest())
        .map(|local| local.with_timezone(&Utc))
        .ok_or_else(|| CliError::InvalidReminder(value.to_string()))
}

pub fn parse_reminder(value: &str) -> Result<DateTime<Utc>, CliError> {
    parse_reminder_in(value, &Local)
}

pub fn parse_optional_reminder(value: Option<&str>) -> Result<Option<DateTime<Utc>>, CliError> {
    value.map(parse_reminder).transpose()
}

/// Todo text from arguments, falling back to piped stdin.
pub fn resolve_todo_text(text_parts: &[String]) -> Result<String, CliError> {
    if let Some(text) = normalize_text(&text_parts.join(" ")) {
        return Ok(text);
    }

    if let Some(text) = read_piped_stdin()? {
        return Ok(text);
    }

    Err(CliError::EmptyText)
}

pub fn normalize_text(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

pub fn normalize_todo_identifier(id: &str) -> Result<String, CliError> {
    normalize_text(id).ok_or(CliError::EmptyTodoId)
}

pub fn read_piped_stdin() -> Result<Option<String>, CliError> {
    let stdin = io::stdin();
    if stdin.is_terminal() {
        return Ok(None);
    }

    let mut buffer = String::new();
    stdin.lock().read_to_string(&mut buffer)?;
    Ok(normalize_text(&buffer))
}

/// Resolve an ID or unique prefix against the loaded list, then fetch it.
pub async fn resolve_todo<S: RemoteStore>(
    query: &str,
    manager: &TodoListManager<S>,
) -> Result<TodoItem, CliError> {
    let query = normalize_todo_identifier(query)?;
    let id: TodoId = manager.resolve_prefix(&query).await?;
    manager
        .get(&id)
        .await
        .ok_or_else(|| CliError::Core(todo_core::Error::NotFound(id.to_string())))
}

pub fn signed_in_label<S: SessionPersistence>(session: &SessionContext<S>) -> Option<String> {
    let user = session.current_user()?;
    Some(
        user.email
            .clone()
            .or_else(|| user.display_name.clone())
            .unwrap_or_else(|| user.id.clone()),
    )
}
