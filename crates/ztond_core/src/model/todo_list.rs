//! Todo list record.
//!
//! # Invariants
//! - `todo_count` is a cache owned by the item repository; callers never
//!   write it directly.
//! - `updated_at` only moves forward.

use super::TodoValidationError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable list identifier.
pub type ListId = Uuid;

/// One named todo list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoList {
    pub id: ListId,
    pub title: String,
    /// Unix epoch milliseconds of the last list or contained-item mutation.
    pub updated_at: i64,
    /// Number of non-divider, not-done items.
    pub todo_count: u32,
    /// Soft-delete marker. Archived lists keep their items.
    pub archived: bool,
}

impl TodoList {
    /// Creates an empty, active list with a generated id.
    pub fn new(title: impl Into<String>, updated_at: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            updated_at,
            todo_count: 0,
            archived: false,
        }
    }

    pub fn is_active(&self) -> bool {
        !self.archived
    }

    pub fn validate(&self) -> Result<(), TodoValidationError> {
        if self.title.trim().is_empty() {
            return Err(TodoValidationError::BlankTitle);
        }
        Ok(())
    }
}

/// Normalizes a user-entered title; `None` when nothing is left after trim.
pub fn normalize_title(title: &str) -> Option<String> {
    let trimmed = title.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::{normalize_title, TodoList};
    use crate::model::TodoValidationError;

    #[test]
    fn new_list_starts_active_and_empty() {
        let list = TodoList::new("Groceries", 10);
        assert!(list.is_active());
        assert_eq!(list.todo_count, 0);
        assert_eq!(list.updated_at, 10);
    }

    #[test]
    fn blank_title_fails_validation() {
        let list = TodoList::new("   ", 0);
        assert_eq!(list.validate(), Err(TodoValidationError::BlankTitle));
    }

    #[test]
    fn normalize_title_trims_and_rejects_blank() {
        assert_eq!(normalize_title("  Work "), Some("Work".to_string()));
        assert_eq!(normalize_title(" \t"), None);
    }
}
