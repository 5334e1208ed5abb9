//! Turns user-typed references into list/item ids.
//!
//! Lists match by full id, exact title, then id prefix. Items match by full
//! id or id prefix. A prefix must select exactly one record.

use crate::error::{CliError, Result};
use uuid::Uuid;
use ztond_core::{ItemId, ListId, TodoItem, TodoList};

pub fn resolve_list(lists: &[TodoList], reference: &str) -> Result<ListId> {
    let reference = reference.trim();
    if let Ok(id) = Uuid::parse_str(reference) {
        if lists.iter().any(|list| list.id == id) {
            return Ok(id);
        }
        return Err(not_found("list", reference));
    }

    let titled: Vec<ListId> = lists
        .iter()
        .filter(|list| list.title == reference)
        .map(|list| list.id)
        .collect();
    match titled.len() {
        0 => {}
        1 => return Ok(titled[0]),
        count => {
            return Err(CliError::Ambiguous {
                kind: "list",
                reference: reference.to_string(),
                count,
            })
        }
    }

    unique_prefix("list", reference, lists.iter().map(|list| list.id))
}

pub fn resolve_item(items: &[TodoItem], reference: &str) -> Result<ItemId> {
    let reference = reference.trim();
    if let Ok(id) = Uuid::parse_str(reference) {
        if items.iter().any(|item| item.id == id) {
            return Ok(id);
        }
        return Err(not_found("item", reference));
    }
    unique_prefix("item", reference, items.iter().map(|item| item.id))
}

/// Eight hex digits, enough to address a record in a personal store.
pub fn short_id(id: Uuid) -> String {
    id.simple().to_string()[..8].to_string()
}

fn unique_prefix(
    kind: &'static str,
    reference: &str,
    ids: impl Iterator<Item = Uuid>,
) -> Result<Uuid> {
    let needle = reference.to_ascii_lowercase().replace('-', "");
    if needle.is_empty() {
        return Err(not_found(kind, reference));
    }
    let matches: Vec<Uuid> = ids
        .filter(|id| id.simple().to_string().starts_with(&needle))
        .collect();
    match matches.as_slice() {
        [] => Err(not_found(kind, reference)),
        [id] => Ok(*id),
        _ => Err(CliError::Ambiguous {
            kind,
            reference: reference.to_string(),
            count: matches.len(),
        }),
    }
}

fn not_found(kind: &'static str, reference: &str) -> CliError {
    CliError::NotFound {
        kind,
        reference: reference.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::{resolve_item, resolve_list, short_id};
    use crate::error::CliError;
    use uuid::Uuid;
    use ztond_core::{TodoItem, TodoList};

    fn list_with_id(id: &str, title: &str) -> TodoList {
        let mut list = TodoList::new(title, 1);
        list.id = Uuid::parse_str(id).unwrap();
        list
    }

    fn lists() -> Vec<TodoList> {
        vec![
            list_with_id("a1b2c3d4-0000-4000-8000-000000000001", "Work"),
            list_with_id("a1b2ffff-0000-4000-8000-000000000002", "Home"),
            list_with_id("0badcafe-0000-4000-8000-000000000003", "a1b2"),
        ]
    }

    #[test]
    fn full_id_resolves() {
        let lists = lists();
        let id = resolve_list(&lists, "a1b2c3d4-0000-4000-8000-000000000001").unwrap();
        assert_eq!(id, lists[0].id);
    }

    #[test]
    fn unknown_full_id_is_not_found() {
        let err = resolve_list(&lists(), "ffffffff-0000-4000-8000-000000000009").unwrap_err();
        assert!(matches!(err, CliError::NotFound { kind: "list", .. }));
    }

    #[test]
    fn exact_title_wins_over_prefix() {
        let lists = lists();
        assert_eq!(resolve_list(&lists, "a1b2").unwrap(), lists[2].id);
        assert_eq!(resolve_list(&lists, "Home").unwrap(), lists[1].id);
    }

    #[test]
    fn unique_prefix_resolves_and_shared_prefix_is_ambiguous() {
        let lists = lists();
        assert_eq!(resolve_list(&lists, "a1b2c").unwrap(), lists[0].id);
        assert_eq!(resolve_list(&lists, "A1B2F").unwrap(), lists[1].id);

        let err = resolve_list(&lists, "a1b").unwrap_err();
        assert!(matches!(err, CliError::Ambiguous { count: 2, .. }));
    }

    #[test]
    fn items_resolve_by_prefix_only_within_candidates() {
        let list = lists().remove(0);
        let mut first = TodoItem::new(list.id, "milk", 0);
        first.id = Uuid::parse_str("12345678-0000-4000-8000-000000000001").unwrap();
        let mut second = TodoItem::new(list.id, "eggs", 1);
        second.id = Uuid::parse_str("12349999-0000-4000-8000-000000000002").unwrap();
        let items = vec![first.clone(), second];

        assert_eq!(resolve_item(&items, "123456").unwrap(), first.id);
        assert!(matches!(
            resolve_item(&items, "1234").unwrap_err(),
            CliError::Ambiguous { kind: "item", .. }
        ));
        assert!(matches!(
            resolve_item(&items, "").unwrap_err(),
            CliError::NotFound { .. }
        ));
    }

    #[test]
    fn short_id_is_eight_hex_digits() {
        let id = Uuid::parse_str("a1b2c3d4-0000-4000-8000-000000000001").unwrap();
        assert_eq!(short_id(id), "a1b2c3d4");
    }
}
