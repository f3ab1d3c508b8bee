//! Per-item edit state and the new-todo form.
//!
//! Neither type touches the store. Every mutation is delegated to the
//! [`TodoListManager`]; these only hold what the user is typing.

use chrono::{DateTime, Utc};

use crate::manager::{TodoListManager, EMPTY_TEXT_MESSAGE};
use crate::models::{normalize_todo_text, TodoItem};
use crate::notify::Notification;
use crate::state::BusyFlags;
use crate::store::RemoteStore;
use crate::{Error, Result};

const EDITING_MESSAGE: &str = "Finish editing before changing this todo";

/// Unsaved text and reminder for an item in edit mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditBuffer {
    pub text: String,
    pub reminder: Option<DateTime<Utc>>,
}

/// One rendered todo, optionally in edit mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoItemView {
    item: TodoItem,
    editing: Option<EditBuffer>,
}

impl TodoItemView {
    #[must_use]
    pub const fn new(item: TodoItem) -> Self {
        Self {
            item,
            editing: None,
        }
    }

    #[must_use]
    pub const fn item(&self) -> &TodoItem {
        &self.item
    }

    #[must_use]
    pub const fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    #[must_use]
    pub const fn buffer(&self) -> Option<&EditBuffer> {
        self.editing.as_ref()
    }

    /// Re-read the item from the manager; keeps the edit buffer.
    pub async fn refresh<S: RemoteStore>(&mut self, manager: &TodoListManager<S>) {
        if let Some(item) = manager.get(&self.item.id).await {
            self.item = item;
        }
    }

    /// Enter edit mode seeded with the current text and reminder.
    pub fn begin_edit(&mut self) {
        self.editing = Some(EditBuffer {
            text: self.item.text.clone(),
            reminder: self.item.reminder,
        });
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        if let Some(buffer) = self.editing.as_mut() {
            buffer.text = text.into();
        }
    }

    pub fn set_reminder(&mut self, reminder: Option<DateTime<Utc>>) {
        if let Some(buffer) = self.editing.as_mut() {
            buffer.reminder = reminder;
        }
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    /// Submit the edit buffer.
    ///
    /// Blank text is reported and keeps edit mode without reaching the
    /// manager. Otherwise edit mode ends once the manager call returns,
    /// whatever its outcome.
    pub async fn save<S: RemoteStore>(&mut self, manager: &TodoListManager<S>) -> Result<()> {
        let Some(buffer) = self.editing.as_ref() else {
            return Ok(());
        };
        if normalize_todo_text(&buffer.text).is_none() {
            manager.notifier().notify(Notification::error(EMPTY_TEXT_MESSAGE));
            return Err(Error::Validation(EMPTY_TEXT_MESSAGE.to_string()));
        }

        let result = manager
            .edit(&self.item.id, &buffer.text, buffer.reminder)
            .await;
        self.editing = None;
        self.refresh(manager).await;
        result
    }

    pub async fn toggle<S: RemoteStore>(&mut self, manager: &TodoListManager<S>) -> Result<()> {
        self.ensure_not_editing()?;
        let result = manager.toggle(&self.item.id).await;
        self.refresh(manager).await;
        result
    }

    pub async fn delete<S: RemoteStore>(&self, manager: &TodoListManager<S>) -> Result<()> {
        self.ensure_not_editing()?;
        manager.delete(&self.item.id).await
    }

    #[must_use]
    pub const fn can_toggle(&self, busy: BusyFlags) -> bool {
        !self.is_editing() && !busy.updating
    }

    #[must_use]
    pub const fn can_edit(&self, busy: BusyFlags) -> bool {
        !self.is_editing() && !busy.updating && !busy.deleting
    }

    #[must_use]
    pub const fn can_delete(&self, busy: BusyFlags) -> bool {
        !self.is_editing() && !busy.deleting
    }

    #[must_use]
    pub const fn can_save(&self, busy: BusyFlags) -> bool {
        self.is_editing() && !busy.updating
    }

    fn ensure_not_editing(&self) -> Result<()> {
        if self.is_editing() {
            Err(Error::Validation(EDITING_MESSAGE.to_string()))
        } else {
            Ok(())
        }
    }
}

/// Input state for creating a todo
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewTodoForm {
    pub text: String,
    pub reminder: Option<DateTime<Utc>>,
}

impl NewTodoForm {
    /// Blank text or an add in flight disables submission.
    #[must_use]
    pub fn can_submit(&self, busy: BusyFlags) -> bool {
        !busy.adding && normalize_todo_text(&self.text).is_some()
    }

    /// Add the todo; both fields are cleared only when the add succeeds.
    pub async fn submit<S: RemoteStore>(&mut self, manager: &TodoListManager<S>) -> Result<TodoItem> {
        let item = manager.add(&self.text, self.reminder).await?;
        self.text.clear();
        self.reminder = None;
        Ok(item)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::Duration;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::notify::tests::RecordingNotifier;
    use crate::store::MemoryStore;

    async fn manager_with(
        text: &str,
    ) -> (TodoListManager<MemoryStore>, Arc<RecordingNotifier>, TodoItemView) {
        let notifier = Arc::new(RecordingNotifier::default());
        let manager = TodoListManager::new(MemoryStore::new(), notifier.clone(), "tasks");
        let item = manager.add(text, None).await.unwrap();
        notifier.take();
        (manager, notifier, TodoItemView::new(item))
    }

    #[tokio::test]
    async fn begin_edit_seeds_buffer_from_item() {
        let (_, _, mut view) = manager_with("Buy milk").await;
        view.begin_edit();
        assert_eq!(
            view.buffer(),
            Some(&EditBuffer {
                text: "Buy milk".to_string(),
                reminder: None,
            })
        );
    }

    #[tokio::test]
    async fn cancel_discards_buffer_without_touching_manager() {
        let (manager, notifier, mut view) = manager_with("Buy milk").await;
        view.begin_edit();
        view.set_text("Something else");
        view.cancel_edit();

        assert!(!view.is_editing());
        assert_eq!(manager.items().await[0].text, "Buy milk");
        assert!(notifier.take().is_empty());
    }

    #[tokio::test]
    async fn save_with_blank_text_stays_in_edit_mode() {
        let (manager, notifier, mut view) = manager_with("Buy milk").await;
        view.begin_edit();
        view.set_text("   ");

        assert!(matches!(view.save(&manager).await, Err(Error::Validation(_))));
        assert!(view.is_editing());
        assert_eq!(manager.items().await[0].text, "Buy milk");
        assert_eq!(notifier.messages(), vec![EMPTY_TEXT_MESSAGE]);
    }

    #[tokio::test]
    async fn save_applies_edit_and_leaves_edit_mode() {
        let (manager, _, mut view) = manager_with("Buy milk").await;
        let reminder = Utc::now() + Duration::hours(2);
        view.begin_edit();
        view.set_text("Buy oat milk");
        view.set_reminder(Some(reminder));

        view.save(&manager).await.unwrap();

        assert!(!view.is_editing());
        assert_eq!(view.item().text, "Buy oat milk");
        assert_eq!(view.item().reminder, Some(reminder));
    }

    #[tokio::test]
    async fn toggle_and_delete_are_refused_while_editing() {
        let (manager, _, mut view) = manager_with("Buy milk").await;
        view.begin_edit();

        assert!(!view.can_toggle(BusyFlags::default()));
        assert!(view.toggle(&manager).await.is_err());
        assert!(view.delete(&manager).await.is_err());
        assert_eq!(manager.len().await, 1);
        assert!(!manager.items().await[0].done);

        view.cancel_edit();
        view.toggle(&manager).await.unwrap();
        assert!(view.item().done);
    }

    #[test]
    fn controls_follow_busy_flags() {
        let view = TodoItemView::new(TodoItem {
            id: "a".parse().unwrap(),
            text: "a".to_string(),
            done: false,
            reminder: None,
            created_at: None,
        });
        let updating = BusyFlags {
            updating: true,
            ..BusyFlags::default()
        };
        let deleting = BusyFlags {
            deleting: true,
            ..BusyFlags::default()
        };
        assert!(!view.can_toggle(updating));
        assert!(!view.can_edit(updating));
        assert!(view.can_delete(updating));
        assert!(!view.can_edit(deleting));
        assert!(!view.can_delete(deleting));
        assert!(view.can_edit(BusyFlags::default()));
    }

    #[test]
    fn submit_needs_text_and_no_add_in_flight() {
        let adding = BusyFlags {
            adding: true,
            ..BusyFlags::default()
        };
        let mut form = NewTodoForm::default();
        assert!(!form.can_submit(BusyFlags::default()));

        form.text = "   ".to_string();
        assert!(!form.can_submit(BusyFlags::default()));

        form.text = "Call mom".to_string();
        assert!(form.can_submit(BusyFlags::default()));
        assert!(!form.can_submit(adding));
    }

    #[tokio::test]
    async fn form_clears_only_after_successful_add() {
        let notifier = Arc::new(RecordingNotifier::default());
        let manager = TodoListManager::new(MemoryStore::new(), notifier, "tasks");
        let mut form = NewTodoForm {
            text: "  ".to_string(),
            reminder: Some(Utc::now()),
        };

        assert!(form.submit(&manager).await.is_err());
        assert!(form.reminder.is_some());

        form.text = "Call mom".to_string();
        let item = form.submit(&manager).await.unwrap();
        assert_eq!(item.text, "Call mom");
        assert_eq!(form, NewTodoForm::default());
    }
}
