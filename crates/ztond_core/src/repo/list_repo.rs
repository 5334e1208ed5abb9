//! Todo list repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide create/read/rename/archive APIs over the `lists` table.
//! - Own the recency ordering used by list pickers.
//!
//! # Invariants
//! - Archived lists are excluded unless explicitly requested.
//! - Listing order is deterministic: `updated_at DESC, id ASC`.
//! - `todo_count` is only written by [`refresh_list_stats`].

use crate::db::now_epoch_ms;
use crate::model::todo_list::{ListId, TodoList};
use crate::model::TodoValidationError;
use crate::repo::{bool_to_int, ensure_schema_ready, parse_flag, parse_uuid, RepoError, RepoResult};
use crate::sync::journal::{record_change, ChangeEntity, ChangeOp};
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};

const LIST_SELECT_SQL: &str = "SELECT
    id,
    title,
    updated_at,
    todo_count,
    archived
FROM lists";

/// Query options for listing todo lists.
#[derive(Debug, Clone, Copy, Default)]
pub struct ListQuery {
    pub include_archived: bool,
}

/// Repository interface for todo list operations.
pub trait ListRepository {
    fn create_list(&self, list: &TodoList) -> RepoResult<ListId>;
    fn get_list(&self, id: ListId) -> RepoResult<Option<TodoList>>;
    /// Lists ordered by recency, most recently updated first.
    fn list_lists(&self, query: ListQuery) -> RepoResult<Vec<TodoList>>;
    /// Most recently updated active list, if any.
    fn last_updated_list(&self) -> RepoResult<Option<TodoList>>;
    /// Renames one list and bumps its `updated_at`.
    fn rename_list(&self, id: ListId, title: &str) -> RepoResult<()>;
    /// Sets or clears the archived flag. Items are never touched.
    fn set_archived(&self, id: ListId, archived: bool) -> RepoResult<()>;
}

/// SQLite-backed list repository.
pub struct SqliteListRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteListRepository<'conn> {
    /// Creates repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_schema_ready(conn)?;
        Ok(Self { conn })
    }
}

impl ListRepository for SqliteListRepository<'_> {
    fn create_list(&self, list: &TodoList) -> RepoResult<ListId> {
        list.validate()?;

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        tx.execute(
            "INSERT INTO lists (id, title, updated_at, todo_count, archived)
             VALUES (?1, ?2, ?3, 0, ?4);",
            params![
                list.id.to_string(),
                list.title.as_str(),
                list.updated_at,
                bool_to_int(list.archived),
            ],
        )?;
        record_change(&tx, ChangeEntity::List, list.id, ChangeOp::Create, list.updated_at)?;
        tx.commit()?;

        Ok(list.id)
    }

    fn get_list(&self, id: ListId) -> RepoResult<Option<TodoList>> {
        load_list(self.conn, id)
    }

    fn list_lists(&self, query: ListQuery) -> RepoResult<Vec<TodoList>> {
        let sql = if query.include_archived {
            format!("{LIST_SELECT_SQL} ORDER BY updated_at DESC, id ASC;")
        } else {
            format!("{LIST_SELECT_SQL} WHERE archived = 0 ORDER BY updated_at DESC, id ASC;")
        };

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query([])?;
        let mut lists = Vec::new();
        while let Some(row) = rows.next()? {
            lists.push(parse_list_row(row)?);
        }
        Ok(lists)
    }

    fn last_updated_list(&self) -> RepoResult<Option<TodoList>> {
        let mut stmt = self.conn.prepare(&format!(
            "{LIST_SELECT_SQL}
             WHERE archived = 0
             ORDER BY updated_at DESC, id ASC
             LIMIT 1;"
        ))?;
        let mut rows = stmt.query([])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_list_row(row)?)),
            None => Ok(None),
        }
    }

    fn rename_list(&self, id: ListId, title: &str) -> RepoResult<()> {
        if title.trim().is_empty() {
            return Err(TodoValidationError::BlankTitle.into());
        }

        let now = now_epoch_ms();
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let changed = tx.execute(
            "UPDATE lists
             SET title = ?2,
                 updated_at = MAX(updated_at, ?3)
             WHERE id = ?1;",
            params![id.to_string(), title, now],
        )?;
        if changed == 0 {
            return Err(RepoError::ListNotFound(id));
        }
        record_change(&tx, ChangeEntity::List, id, ChangeOp::Update, now)?;
        tx.commit()?;
        Ok(())
    }

    fn set_archived(&self, id: ListId, archived: bool) -> RepoResult<()> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let changed = tx.execute(
            "UPDATE lists SET archived = ?2 WHERE id = ?1;",
            params![id.to_string(), bool_to_int(archived)],
        )?;
        if changed == 0 {
            return Err(RepoError::ListNotFound(id));
        }
        record_change(&tx, ChangeEntity::List, id, ChangeOp::Update, now_epoch_ms())?;
        tx.commit()?;
        Ok(())
    }
}

/// Recomputes the cached open-todo count and bumps `updated_at`.
///
/// Must run inside the transaction that mutated the list's items.
pub(crate) fn refresh_list_stats(conn: &Connection, id: ListId) -> RepoResult<()> {
    let now = now_epoch_ms();
    let changed = conn.execute(
        "UPDATE lists
         SET todo_count = (
                 SELECT COUNT(*)
                 FROM items
                 WHERE items.list_id = lists.id
                   AND items.done = 0
                   AND substr(items.content, 1, 3) <> '---'
             ),
             updated_at = MAX(updated_at, ?2)
         WHERE id = ?1;",
        params![id.to_string(), now],
    )?;
    if changed == 0 {
        return Err(RepoError::ListNotFound(id));
    }
    record_change(conn, ChangeEntity::List, id, ChangeOp::Update, now)?;
    Ok(())
}

pub(crate) fn load_list(conn: &Connection, id: ListId) -> RepoResult<Option<TodoList>> {
    conn.query_row(
        &format!("{LIST_SELECT_SQL} WHERE id = ?1;"),
        [id.to_string()],
        |row| Ok(parse_list_row(row)),
    )
    .optional()?
    .transpose()
}

fn parse_list_row(row: &Row<'_>) -> RepoResult<TodoList> {
    let id_text: String = row.get("id")?;
    let todo_count: i64 = row.get("todo_count")?;
    let todo_count = u32::try_from(todo_count)
        .map_err(|_| RepoError::Validation(TodoValidationError::NegativeTodoCount(todo_count)))?;

    let list = TodoList {
        id: parse_uuid(&id_text, "lists.id")?,
        title: row.get("title")?,
        updated_at: row.get("updated_at")?,
        todo_count,
        archived: parse_flag(row.get("archived")?, "lists.archived")?,
    };
    list.validate()?;
    Ok(list)
}
