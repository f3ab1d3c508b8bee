//! Todo list manager.
//!
//! Owns the in-memory list for a session, applies mutations optimistically
//! where the UI expects instant feedback, synchronizes each one with the
//! remote store in a single attempt, and rolls back on failure.
//!
//! | operation | local change            | on remote failure      |
//! |-----------|-------------------------|------------------------|
//! | `load`    | replace list on success | keep previous list     |
//! | `add`     | append after success    | nothing to undo        |
//! | `toggle`  | flip `done` first       | restore checkpoint     |
//! | `delete`  | remove first            | restore checkpoint     |
//! | `edit`    | update after success    | nothing to undo        |

mod optimistic;
mod reminders;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use crate::models::{normalize_todo_text, TodoDocument, TodoId, TodoItem, TodoPatch};
use crate::notify::{Notification, Notifier};
use crate::state::{BusyCategory, BusyFlags, InFlight};
use crate::store::RemoteStore;
use crate::{Error, Result};

use optimistic::{Checkpoint, LocalMutation, RemoteWrite};

pub use reminders::{ReminderScheduler, REMINDER_DISPLAY_DURATION};

pub const EMPTY_TEXT_MESSAGE: &str = "Todo text cannot be empty";

#[derive(Debug, Default)]
pub(crate) struct ListState {
    items: Vec<TodoItem>,
}

/// In-memory todo list synchronized with a remote store
pub struct TodoListManager<S: RemoteStore> {
    state: Arc<Mutex<ListState>>,
    in_flight: InFlight,
    store: S,
    notifier: Arc<dyn Notifier>,
    collection: String,
}

impl<S: RemoteStore> TodoListManager<S> {
    pub fn new(store: S, notifier: Arc<dyn Notifier>, collection: impl Into<String>) -> Self {
        Self {
            state: Arc::new(Mutex::new(ListState::default())),
            in_flight: InFlight::default(),
            store,
            notifier,
            collection: collection.into(),
        }
    }

    #[must_use]
    pub fn collection(&self) -> &str {
        &self.collection
    }

    #[must_use]
    pub fn notifier(&self) -> &dyn Notifier {
        self.notifier.as_ref()
    }

    /// Snapshot of the list in fetch/add order
    pub async fn items(&self) -> Vec<TodoItem> {
        self.state.lock().await.items.clone()
    }

    pub async fn get(&self, id: &TodoId) -> Option<TodoItem> {
        let state = self.state.lock().await;
        state.items.iter().find(|item| &item.id == id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.state.lock().await.items.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.state.lock().await.items.is_empty()
    }

    #[must_use]
    pub fn busy(&self) -> BusyFlags {
        self.in_flight.flags()
    }

    #[must_use]
    pub fn is_busy(&self, category: BusyCategory) -> bool {
        self.busy().is_busy(category)
    }

    /// Find the single item whose id is `query` or starts with it.
    pub async fn resolve_prefix(&self, query: &str) -> Result<TodoId> {
        let query = query.trim();
        if query.is_empty() {
            return Err(Error::Validation("Todo id cannot be empty".to_string()));
        }

        let state = self.state.lock().await;
        if let Some(item) = state.items.iter().find(|item| item.id.as_str() == query) {
            return Ok(item.id.clone());
        }

        let matches: Vec<&TodoId> = state
            .items
            .iter()
            .map(|item| &item.id)
            .filter(|id| id.as_str().starts_with(query))
            .collect();
        match matches.as_slice() {
            [] => Err(Error::NotFound(query.to_string())),
            [id] => Ok((*id).clone()),
            many => {
                let options = many
                    .iter()
                    .take(3)
                    .map(|id| id.as_str().chars().take(12).collect::<String>())
                    .collect::<Vec<_>>()
                    .join(", ");
                Err(Error::Validation(format!(
                    "Todo id prefix '{query}' is ambiguous (matches {options})"
                )))
            }
        }
    }

    /// Replace the list with the store's contents.
    ///
    /// On failure the previous list is kept.
    pub async fn load(&self) -> Result<usize> {
        self.tracked(BusyCategory::Fetching, async {
            match self.store.list_all(&self.collection).await {
                Ok(documents) => {
                    let items: Vec<TodoItem> = documents
                        .into_iter()
                        .map(|(id, document)| TodoItem::from_document(id, document))
                        .collect();
                    let count = items.len();
                    self.state.lock().await.items = items;
                    tracing::info!(count, collection = %self.collection, "Loaded todos");
                    Ok(count)
                }
                Err(error) => {
                    tracing::warn!("Error fetching todos: {}", error);
                    self.report(Notification::error("Failed to load todos"));
                    Err(error)
                }
            }
        })
        .await
    }

    /// Create a todo. The item is appended only once the store confirms it.
    pub async fn add(&self, text: &str, reminder: Option<DateTime<Utc>>) -> Result<TodoItem> {
        let Some(text) = normalize_todo_text(text) else {
            return Err(self.reject_empty_text());
        };

        self.tracked(BusyCategory::Adding, async {
            let document = TodoDocument::new(text, reminder);
            match self.store.create(&self.collection, &document).await {
                Ok(created) => {
                    let item = TodoItem {
                        id: created.id,
                        text: document.text,
                        done: document.done,
                        reminder: document.reminder,
                        created_at: created.created_at,
                    };
                    self.state.lock().await.items.push(item.clone());
                    tracing::debug!(id = %item.id, "Added todo");
                    self.report(Notification::success("Todo added successfully"));
                    Ok(item)
                }
                Err(error) => {
                    tracing::warn!("Error adding todo: {}", error);
                    self.report(Notification::error("Failed to add todo"));
                    Err(error)
                }
            }
        })
        .await
    }

    /// Flip the completion flag, optimistically.
    pub async fn toggle(&self, id: &TodoId) -> Result<()> {
        self.tracked(
            BusyCategory::Updating,
            self.run_optimistic(LocalMutation::Toggle(id.clone())),
        )
        .await
        .map(drop)
    }

    /// Remove a todo, optimistically.
    pub async fn delete(&self, id: &TodoId) -> Result<()> {
        self.tracked(
            BusyCategory::Deleting,
            self.run_optimistic(LocalMutation::Remove(id.clone())),
        )
        .await?;
        self.report(Notification::success("Todo deleted successfully"));
        Ok(())
    }

    /// Replace text and reminder once the store accepts the update.
    pub async fn edit(
        &self,
        id: &TodoId,
        text: &str,
        reminder: Option<DateTime<Utc>>,
    ) -> Result<()> {
        let Some(text) = normalize_todo_text(text) else {
            return Err(self.reject_empty_text());
        };
        if self.get(id).await.is_none() {
            let error = Error::NotFound(id.to_string());
            self.report(Notification::error(error.to_string()));
            return Err(error);
        }

        self.tracked(BusyCategory::Updating, async {
            let patch = TodoPatch::content(text.clone(), reminder);
            if let Err(error) = self.store.update(&self.collection, id, &patch).await {
                tracing::warn!(%id, "Error updating todo: {}", error);
                self.report(Notification::error(error.to_string()));
                return Err(error);
            }

            let mut state = self.state.lock().await;
            if let Some(item) = state.items.iter_mut().find(|item| &item.id == id) {
                item.text = text;
                item.reminder = reminder;
            }
            drop(state);
            self.report(Notification::success("Todo updated successfully"));
            Ok(())
        })
        .await
    }

    /// Run one reminder sweep against `now`; returns how many fired.
    pub async fn sweep_reminders(&self, now: DateTime<Utc>) -> usize {
        let mut state = self.state.lock().await;
        reminders::sweep(&mut state.items, now, self.notifier.as_ref())
    }

    /// Start the periodic reminder sweep.
    pub fn start_reminders(&self, period: Duration) -> Result<ReminderScheduler> {
        if period.is_zero() {
            return Err(Error::Config(
                "reminder interval must be greater than zero".to_string(),
            ));
        }
        Ok(ReminderScheduler::spawn(
            Arc::clone(&self.state),
            Arc::clone(&self.notifier),
            period,
        ))
    }

    async fn run_optimistic(&self, mutation: LocalMutation) -> Result<RemoteWrite> {
        let applied = {
            let mut state = self.state.lock().await;
            let checkpoint = Checkpoint::capture(&state.items);
            mutation
                .apply(&mut state.items)
                .map(|write| (checkpoint, write))
        };
        let (checkpoint, write) = match applied {
            Ok(applied) => applied,
            Err(error) => {
                self.report(Notification::error(error.to_string()));
                return Err(error);
            }
        };

        if let Err(error) = self.issue(&write).await {
            tracing::warn!(?mutation, "Remote write failed, rolling back: {}", error);
            checkpoint.restore(&mut self.state.lock().await.items);
            self.report(Notification::error(error.to_string()));
            return Err(error);
        }
        Ok(write)
    }

    async fn issue(&self, write: &RemoteWrite) -> Result<()> {
        match write {
            RemoteWrite::Update { id, patch } => {
                self.store.update(&self.collection, id, patch).await
            }
            RemoteWrite::Delete { id } => self.store.delete(&self.collection, id).await,
        }
    }

    /// Run `operation` with `category` marked busy. The mark is cleared when
    /// the operation settles or its future is dropped; a dropped toggle or
    /// delete keeps its optimistic change without rollback.
    async fn tracked<T>(&self, category: BusyCategory, operation: impl Future<Output = T>) -> T {
        let _busy = self.in_flight.enter(category);
        operation.await
    }

    fn reject_empty_text(&self) -> Error {
        self.report(Notification::error(EMPTY_TEXT_MESSAGE));
        Error::Validation(EMPTY_TEXT_MESSAGE.to_string())
    }

    fn report(&self, notification: Notification) {
        self.notifier.notify(notification);
    }
}
