//! Plain-text rendering of lists and items.

use crate::resolve::short_id;
use ztond_core::{ItemKind, TodoItem, TodoList};

pub fn list_line(list: &TodoList) -> String {
    let mut line = format!(
        "{}  {}  ({} open)",
        short_id(list.id),
        list.title,
        list.todo_count
    );
    if list.archived {
        line.push_str("  [archived]");
    }
    line
}

/// One row of the item view; `index` is the displayed index used by `reorder`.
pub fn item_line(index: usize, item: &TodoItem) -> String {
    let body = match item.kind() {
        ItemKind::Task => {
            let check = if item.done { "[x]" } else { "[ ]" };
            match item.url.as_deref() {
                Some(url) => format!("{check} {}  <{url}>", item.content),
                None => format!("{check} {}", item.content),
            }
        }
        ItemKind::Rule => "----------------".to_string(),
        ItemKind::Header(label) => format!("--- {label} ---"),
    };
    format!("{index:>3}. {body}  {}", short_id(item.id))
}
