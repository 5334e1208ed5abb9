//! Todo domain model.
//!
//! # Responsibility
//! - Define the list and item records shared by repositories and services.
//! - Keep divider/done semantics in one place so counts stay consistent.
//!
//! # Invariants
//! - Every record is identified by a stable client-generated UUID.
//! - Lists are archived, never hard-deleted.

pub mod todo_item;
pub mod todo_list;

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Validation failures for list/item records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TodoValidationError {
    /// List title is blank after trim.
    BlankTitle,
    /// Item content is blank after trim.
    BlankContent,
    /// Item url is present but blank after trim.
    BlankUrl,
    /// `todo_count` is negative in persisted or caller-built state.
    NegativeTodoCount(i64),
}

impl Display for TodoValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankTitle => write!(f, "list title must not be blank"),
            Self::BlankContent => write!(f, "item content must not be blank"),
            Self::BlankUrl => write!(f, "item url must be omitted instead of blank"),
            Self::NegativeTodoCount(value) => write!(f, "todo_count must not be negative: {value}"),
        }
    }
}

impl Error for TodoValidationError {}
