//! Todo item model

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::Error;

/// Opaque identifier of a todo document in the remote store
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(String);

impl TodoId {
    /// Generate a fresh document identifier (UUID v7, hyphenless)
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::now_v7().simple().to_string())
    }

    /// Get the string representation of this ID
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for TodoId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed.contains('/') {
            return Err(Error::Validation(format!("Invalid todo id: {s:?}")));
        }
        Ok(Self(trimmed.to_string()))
    }
}

/// A todo item as held in memory by the list manager
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoItem {
    /// Remote document identifier, immutable
    pub id: TodoId,
    /// Non-empty user-visible text
    pub text: String,
    /// Completion flag
    pub done: bool,
    /// Pending one-shot reminder
    pub reminder: Option<DateTime<Utc>>,
    /// Server-assigned creation time; `None` until the store reports it
    pub created_at: Option<DateTime<Utc>>,
}

impl TodoItem {
    /// Build an in-memory item from a stored document.
    #[must_use]
    pub fn from_document(id: TodoId, document: TodoDocument) -> Self {
        Self {
            id,
            text: document.text,
            done: document.done,
            reminder: document.reminder,
            created_at: document.created_at,
        }
    }

    /// Whether the reminder is set and its due time has passed.
    #[must_use]
    pub fn is_reminder_due(&self, now: DateTime<Utc>) -> bool {
        self.reminder.is_some_and(|due| due <= now)
    }
}

/// Fields persisted for each todo document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoDocument {
    pub text: String,
    pub done: bool,
    pub reminder: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl TodoDocument {
    /// A new, not yet completed todo. `created_at` is left to the store.
    #[must_use]
    pub fn new(text: impl Into<String>, reminder: Option<DateTime<Utc>>) -> Self {
        Self {
            text: text.into(),
            done: false,
            reminder,
            created_at: None,
        }
    }
}

/// Partial update of a todo document
///
/// `reminder: Some(None)` clears the reminder; `None` leaves it untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoPatch {
    pub text: Option<String>,
    pub done: Option<bool>,
    pub reminder: Option<Option<DateTime<Utc>>>,
}

impl TodoPatch {
    /// Patch that only sets the completion flag
    #[must_use]
    pub const fn done(done: bool) -> Self {
        Self {
            text: None,
            done: Some(done),
            reminder: None,
        }
    }

    /// Patch that replaces text and reminder together
    #[must_use]
    pub fn content(text: impl Into<String>, reminder: Option<DateTime<Utc>>) -> Self {
        Self {
            text: Some(text.into()),
            done: None,
            reminder: Some(reminder),
        }
    }

    /// Names of the persisted fields this patch touches
    #[must_use]
    pub fn field_paths(&self) -> Vec<&'static str> {
        let mut paths = Vec::with_capacity(3);
        if self.text.is_some() {
            paths.push("text");
        }
        if self.done.is_some() {
            paths.push("done");
        }
        if self.reminder.is_some() {
            paths.push("reminder");
        }
        paths
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_none() && self.done.is_none() && self.reminder.is_none()
    }

    /// Apply the patch to a stored document
    pub fn apply_to(&self, document: &mut TodoDocument) {
        if let Some(text) = &self.text {
            document.text.clone_from(text);
        }
        if let Some(done) = self.done {
            document.done = done;
        }
        if let Some(reminder) = self.reminder {
            document.reminder = reminder;
        }
    }
}

/// Trim todo text; whitespace-only input is rejected.
#[must_use]
pub fn normalize_todo_text(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    #[test]
    fn todo_id_generate_is_unique() {
        assert_ne!(TodoId::generate(), TodoId::generate());
    }

    #[test]
    fn todo_id_rejects_empty_and_path_like_values() {
        assert!("".parse::<TodoId>().is_err());
        assert!("  ".parse::<TodoId>().is_err());
        assert!("tasks/abc".parse::<TodoId>().is_err());
        assert_eq!("abc".parse::<TodoId>().unwrap().as_str(), "abc");
    }

    #[test]
    fn reminder_due_only_when_set_and_past() {
        let now = Utc::now();
        let mut item = TodoItem::from_document(
            "a".parse().unwrap(),
            TodoDocument::new("Call mom", None),
        );
        assert!(!item.is_reminder_due(now));

        item.reminder = Some(now + Duration::minutes(5));
        assert!(!item.is_reminder_due(now));

        item.reminder = Some(now);
        assert!(item.is_reminder_due(now));
    }

    #[test]
    fn patch_field_paths_follow_set_fields() {
        assert_eq!(TodoPatch::done(true).field_paths(), vec!["done"]);
        assert_eq!(
            TodoPatch::content("x", None).field_paths(),
            vec!["text", "reminder"]
        );
        assert!(TodoPatch::default().is_empty());
    }

    #[test]
    fn patch_clears_reminder_explicitly() {
        let mut document = TodoDocument::new("x", Some(Utc::now()));
        TodoPatch::content("y", None).apply_to(&mut document);
        assert_eq!(document.text, "y");
        assert_eq!(document.reminder, None);

        TodoPatch::done(true).apply_to(&mut document);
        assert!(document.done);
        assert_eq!(document.text, "y");
    }

    #[test]
    fn document_serializes_created_at_in_camel_case() {
        let json = serde_json::to_value(TodoDocument::new("x", None)).unwrap();
        assert!(json.get("createdAt").is_some());
        assert_eq!(json["done"], false);
    }

    #[test]
    fn normalize_todo_text_trims() {
        assert_eq!(normalize_todo_text("  Buy milk "), Some("Buy milk".to_string()));
        assert_eq!(normalize_todo_text(" \n\t"), None);
    }
}
