//! Todo item record and divider semantics.
//!
//! # Invariants
//! - `position` is unique within one list; gaps and negative values are legal.
//! - Content starting with [`DIVIDER_PREFIX`] is a divider and never counts
//!   as an open todo, regardless of `done`.

use super::todo_list::ListId;
use super::TodoValidationError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable item identifier.
pub type ItemId = Uuid;

/// Content prefix that turns an item into a section divider.
pub const DIVIDER_PREFIX: &str = "---";

/// Prefix added to items left behind by a cross-list move.
pub const MOVED_MARKER: &str = "*moved* ";

/// One entry of a todo list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoItem {
    pub id: ItemId,
    pub list_id: ListId,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default)]
    pub done: bool,
    /// Manual ordering key; compared, never used as an index.
    pub position: i64,
}

/// How an item row is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind<'a> {
    /// Regular checkable task.
    Task,
    /// Bare `---` separator rule.
    Rule,
    /// `--- label` section header.
    Header(&'a str),
}

impl TodoItem {
    /// Creates a not-done item with a generated id.
    pub fn new(list_id: ListId, content: impl Into<String>, position: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            list_id,
            content: content.into(),
            url: None,
            done: false,
            position,
        }
    }

    pub fn is_divider(&self) -> bool {
        self.content.starts_with(DIVIDER_PREFIX)
    }

    pub fn kind(&self) -> ItemKind<'_> {
        match self.content.strip_prefix(DIVIDER_PREFIX) {
            None => ItemKind::Task,
            Some(rest) if rest.trim().is_empty() => ItemKind::Rule,
            Some(rest) => ItemKind::Header(rest.trim()),
        }
    }

    /// Whether this item contributes to its list's `todo_count`.
    pub fn counts_as_open(&self) -> bool {
        !self.is_divider() && !self.done
    }

    /// Content used for the row left behind after moving to another list.
    pub fn moved_content(&self) -> String {
        format!("{MOVED_MARKER}{}", self.content)
    }

    pub fn validate(&self) -> Result<(), TodoValidationError> {
        if self.content.trim().is_empty() {
            return Err(TodoValidationError::BlankContent);
        }
        if self
            .url
            .as_deref()
            .is_some_and(|url| url.trim().is_empty())
        {
            return Err(TodoValidationError::BlankUrl);
        }
        Ok(())
    }
}

/// Counts open todos the same way the list cache does.
pub fn count_open<'a>(items: impl IntoIterator<Item = &'a TodoItem>) -> u32 {
    items.into_iter().filter(|item| item.counts_as_open()).count() as u32
}

/// Normalizes an optional url input: blank means "no url".
pub fn normalize_url(url: Option<&str>) -> Option<String> {
    url.map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}
