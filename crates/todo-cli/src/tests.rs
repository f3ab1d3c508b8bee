use std::sync::Arc;

use chrono::{Duration, FixedOffset, TimeZone, Utc};
use clap::CommandFactory;
use pretty_assertions::assert_eq;
use tempfile::TempDir;
use todo_core::auth::SessionContext;
use todo_core::config::ClientConfig;
use todo_core::models::{ThemeMode, TodoDocument, TodoPatch};
use todo_core::services::SettingsService;
use todo_core::store::{CreatedDocument, MemoryStore, RemoteStore};
use todo_core::{TodoId, TodoItem, TodoListManager};

use crate::auth::SessionStore;
use crate::cli::{Cli, CompletionShell, ThemeCommands};
use crate::commands::add::run_add;
use crate::commands::common::{
    format_relative_time, format_todo_lines, normalize_text, normalize_todo_identifier,
    parse_reminder_in, start_workspace, todo_preview, ConsoleNotifier,
};
use crate::commands::completions::render_completions;
use crate::commands::delete::run_delete;
use crate::commands::edit::run_edit;
use crate::commands::theme::run_theme;
use crate::commands::toggle::run_toggle;
use crate::error::CliError;

fn memory_manager() -> TodoListManager<MemoryStore> {
    TodoListManager::new(MemoryStore::new(), Arc::new(ConsoleNotifier), "tasks")
}

fn words(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_string).collect()
}

#[test]
fn cli_definition_is_consistent() {
    Cli::command().debug_assert();
}

#[test]
fn normalize_text_trims_and_rejects_empty() {
    assert_eq!(normalize_text("  hello  "), Some("hello".to_string()));
    assert_eq!(normalize_text(" \n\t "), None);
    assert!(matches!(
        normalize_todo_identifier("   "),
        Err(CliError::EmptyTodoId)
    ));
}

#[test]
fn parse_reminder_accepts_rfc3339() {
    let zone = FixedOffset::east_opt(2 * 3600).unwrap();
    let parsed = parse_reminder_in("2026-03-01T09:30:00Z", &zone).unwrap();
    assert_eq!(parsed, Utc.with_ymd_and_hms(2026, 3, 1, 9, 30, 0).unwrap());
}

#[test]
fn parse_reminder_reads_wall_clock_in_zone() {
    let zone = FixedOffset::east_opt(2 * 3600).unwrap();
    let expected = Utc.with_ymd_and_hms(2026, 3, 1, 7, 30, 0).unwrap();

    assert_eq!(parse_reminder_in("2026-03-01 09:30", &zone).unwrap(), expected);
    assert_eq!(parse_reminder_in("2026-03-01T09:30", &zone).unwrap(), expected);
    assert!(matches!(
        parse_reminder_in("tomorrow", &zone),
        Err(CliError::InvalidReminder(_))
    ));
}

#[test]
fn format_relative_time_units() {
    let now = 10_000_000_000;
    assert_eq!(format_relative_time(now - 30_000, now), "just now");
    assert_eq!(format_relative_time(now - 120_000, now), "2m ago");
    assert_eq!(format_relative_time(now - 2 * 60 * 60_000, now), "2h ago");
    assert_eq!(format_relative_time(now - 3 * 24 * 60 * 60_000, now), "3d ago");
}

#[test]
fn todo_preview_collapses_and_truncates() {
    assert_eq!(todo_preview("buy\n  milk", 40), "buy milk");
    assert_eq!(todo_preview(&"x".repeat(50), 10), "xxxxxxx...");
}

#[test]
fn format_todo_lines_marks_done_items() {
    let now = Utc::now();
    let items = vec![
        TodoItem {
            id: "0192f0c1a2b3c4d5e6f7".parse().unwrap(),
            text: "Buy milk".to_string(),
            done: true,
            reminder: None,
            created_at: Some(now - Duration::minutes(5)),
        },
        TodoItem {
            id: "0192f0c1ffff".parse().unwrap(),
            text: "Call mom".to_string(),
            done: false,
            reminder: Some(now + Duration::hours(1)),
            created_at: None,
        },
    ];

    let lines = format_todo_lines(&items, now);

    assert!(lines[0].starts_with("0192f0c1a2b3c  [x] Buy milk"));
    assert!(lines[0].ends_with("5m ago"));
    assert!(lines[1].contains("[ ] Call mom"));
    assert!(lines[1].contains("@ "));
}

#[tokio::test]
async fn add_toggle_edit_delete_through_commands() {
    let manager = memory_manager();

    let item = run_add(&manager, &words("Buy milk"), Some("2030-01-01T08:00:00Z"))
        .await
        .unwrap();
    assert_eq!(item.text, "Buy milk");
    let prefix = &item.id.as_str()[..8];

    let toggled = run_toggle(&manager, prefix).await.unwrap();
    assert!(toggled.done);

    let edited = run_edit(&manager, prefix, &words("Buy oat milk"), None, false)
        .await
        .unwrap();
    assert_eq!(edited.text, "Buy oat milk");
    assert!(edited.done);
    assert_eq!(edited.reminder, item.reminder);

    let cleared = run_edit(&manager, prefix, &words("Buy oat milk"), None, true)
        .await
        .unwrap();
    assert_eq!(cleared.reminder, None);

    let deleted = run_delete(&manager, prefix).await.unwrap();
    assert_eq!(deleted, item.id);
    assert!(manager.is_empty().await);
}

#[tokio::test]
async fn edit_without_text_changes_only_reminder() {
    let manager = memory_manager();
    let item = run_add(&manager, &words("Keep me"), None).await.unwrap();

    let edited = run_edit(
        &manager,
        item.id.as_str(),
        &[],
        Some("2031-01-01T10:00:00Z"),
        false,
    )
    .await
    .unwrap();

    assert_eq!(edited.text, "Keep me");
    assert_eq!(
        edited.reminder,
        Some(Utc.with_ymd_and_hms(2031, 1, 1, 10, 0, 0).unwrap())
    );
}

/// Store whose listing always fails; writes go to memory.
#[derive(Default)]
struct UnlistableStore {
    inner: MemoryStore,
}

impl RemoteStore for UnlistableStore {
    async fn create(
        &self,
        collection: &str,
        document: &TodoDocument,
    ) -> todo_core::Result<CreatedDocument> {
        self.inner.create(collection, document).await
    }

    async fn update(
        &self,
        collection: &str,
        id: &TodoId,
        patch: &TodoPatch,
    ) -> todo_core::Result<()> {
        self.inner.update(collection, id, patch).await
    }

    async fn delete(&self, collection: &str, id: &TodoId) -> todo_core::Result<()> {
        self.inner.delete(collection, id).await
    }

    async fn list_all(
        &self,
        _collection: &str,
    ) -> todo_core::Result<Vec<(TodoId, TodoDocument)>> {
        Err(todo_core::Error::Remote("backend unavailable".to_string()))
    }
}

#[tokio::test]
async fn failed_startup_load_still_allows_add() {
    let config = ClientConfig::default();
    let session = SessionContext::new(&config, SessionStore::for_config(&config)).unwrap();
    let workspace = start_workspace(
        UnlistableStore::default(),
        session,
        config,
        Arc::new(ConsoleNotifier),
    )
    .await;
    assert!(workspace.manager.is_empty().await);

    let item = run_add(&workspace.manager, &words("Still works"), None)
        .await
        .unwrap();

    assert_eq!(workspace.manager.items().await, vec![item]);
    assert!(matches!(
        run_toggle(&workspace.manager, "nope").await,
        Err(CliError::Core(todo_core::Error::NotFound(_)))
    ));
}

#[tokio::test]
async fn unknown_id_is_reported() {
    let manager = memory_manager();
    assert!(matches!(
        run_toggle(&manager, "nope").await,
        Err(CliError::Core(todo_core::Error::NotFound(_)))
    ));
}

#[test]
fn theme_toggle_persists() {
    let dir = TempDir::new().unwrap();
    let settings = SettingsService::new(dir.path().join("settings.json"));

    assert_eq!(run_theme(None, &settings).unwrap(), ThemeMode::Light);
    assert_eq!(
        run_theme(Some(ThemeCommands::Toggle), &settings).unwrap(),
        ThemeMode::Dark
    );
    assert_eq!(run_theme(None, &settings).unwrap(), ThemeMode::Dark);
}

#[test]
fn completions_name_the_binary() {
    let script = String::from_utf8(render_completions(CompletionShell::Bash)).unwrap();
    assert!(script.contains("todo"));
    assert!(script.contains("toggle"));
}
