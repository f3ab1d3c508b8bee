//! Optimistic local mutations with checkpoint rollback.

use crate::models::{TodoId, TodoItem, TodoPatch};
use crate::{Error, Result};

/// A change applied to the in-memory list before the store confirms it
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum LocalMutation {
    Toggle(TodoId),
    Remove(TodoId),
}

/// The remote write that confirms a local mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum RemoteWrite {
    Update { id: TodoId, patch: TodoPatch },
    Delete { id: TodoId },
}

/// The list as it was before a mutation; restoring it undoes the mutation
#[derive(Debug)]
pub(crate) struct Checkpoint(Vec<TodoItem>);

impl Checkpoint {
    pub(crate) fn capture(items: &[TodoItem]) -> Self {
        Self(items.to_vec())
    }

    pub(crate) fn restore(self, items: &mut Vec<TodoItem>) {
        *items = self.0;
    }
}

impl LocalMutation {
    /// Apply to `items` and return the write to send.
    ///
    /// Fails without touching `items` when the target is not in the list.
    pub(crate) fn apply(&self, items: &mut Vec<TodoItem>) -> Result<RemoteWrite> {
        match self {
            Self::Toggle(id) => {
                let item = items
                    .iter_mut()
                    .find(|item| &item.id == id)
                    .ok_or_else(|| Error::NotFound(id.to_string()))?;
                item.done = !item.done;
                Ok(RemoteWrite::Update {
                    id: id.clone(),
                    patch: TodoPatch::done(item.done),
                })
            }
            Self::Remove(id) => {
                let index = items
                    .iter()
                    .position(|item| &item.id == id)
                    .ok_or_else(|| Error::NotFound(id.to_string()))?;
                items.remove(index);
                Ok(RemoteWrite::Delete { id: id.clone() })
            }
        }
    }
}
