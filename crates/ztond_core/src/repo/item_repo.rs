//! Todo item repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide insert/edit/toggle/reposition/move APIs over the `items` table.
//! - Keep the owning list's derived cache in sync with every item write.
//!
//! # Invariants
//! - Items are read in `position ASC, id ASC` order.
//! - Prepend inserts at `min(position) - 1`, append at `max(position) + 1`;
//!   an empty list starts at `-1` or `1` respectively.
//! - Batched position updates touch exactly the rows they name.

use crate::db::now_epoch_ms;
use crate::model::todo_item::{ItemId, TodoItem};
use crate::model::todo_list::ListId;
use crate::repo::list_repo::refresh_list_stats;
use crate::repo::{bool_to_int, ensure_schema_ready, parse_flag, parse_uuid, RepoError, RepoResult};
use crate::sync::journal::{record_change, ChangeEntity, ChangeOp};
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};
use serde::{Deserialize, Serialize};

const ITEM_SELECT_SQL: &str = "SELECT
    id,
    list_id,
    content,
    url,
    done,
    position
FROM items";

/// Where a new item lands in its list's ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Placement {
    /// Before the current first item.
    #[default]
    Prepend,
    /// After the current last item.
    Append,
}

impl Placement {
    pub fn from_prepend(prepend: bool) -> Self {
        if prepend {
            Self::Prepend
        } else {
            Self::Append
        }
    }
}

/// Request model for inserting one item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewItem {
    pub list_id: ListId,
    pub content: String,
    pub url: Option<String>,
}

/// Partial update for one item. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemPatch {
    pub content: Option<String>,
    /// `Some(None)` clears the url.
    pub url: Option<Option<String>>,
    pub done: Option<bool>,
}

impl ItemPatch {
    pub fn is_empty(&self) -> bool {
        self.content.is_none() && self.url.is_none() && self.done.is_none()
    }
}

/// New position for one item in a batched reorder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionChange {
    pub id: ItemId,
    pub position: i64,
}

/// Repository interface for todo item operations.
pub trait ItemRepository {
    /// Inserts one item at the start or end of its list.
    fn insert_item(&self, item: &NewItem, placement: Placement) -> RepoResult<TodoItem>;
    fn get_item(&self, id: ItemId) -> RepoResult<Option<TodoItem>>;
    /// All items of one list, ordered by position.
    fn list_items(&self, list_id: ListId) -> RepoResult<Vec<TodoItem>>;
    /// Applies a partial update and returns the stored item.
    fn update_item(&self, id: ItemId, patch: &ItemPatch) -> RepoResult<TodoItem>;
    /// Flips `done` and returns the stored item.
    fn toggle_done(&self, id: ItemId) -> RepoResult<TodoItem>;
    /// Writes new positions for items of one list in one transaction.
    fn update_positions(&self, changes: &[PositionChange]) -> RepoResult<()>;
    /// Leaves a done, marked copy in the source list and inserts the item
    /// into `target_list`. Returns the newly created item.
    fn move_to_list(
        &self,
        id: ItemId,
        target_list: ListId,
        placement: Placement,
    ) -> RepoResult<TodoItem>;
}

/// SQLite-backed item repository.
pub struct SqliteItemRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteItemRepository<'conn> {
    /// Creates repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_schema_ready(conn)?;
        Ok(Self { conn })
    }
}

impl ItemRepository for SqliteItemRepository<'_> {
    fn insert_item(&self, item: &NewItem, placement: Placement) -> RepoResult<TodoItem> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let created = insert_in_tx(&tx, item, placement)?;
        tx.commit()?;
        Ok(created)
    }

    fn get_item(&self, id: ItemId) -> RepoResult<Option<TodoItem>> {
        load_item(self.conn, id)
    }

    fn list_items(&self, list_id: ListId) -> RepoResult<Vec<TodoItem>> {
        let mut stmt = self.conn.prepare(&format!(
            "{ITEM_SELECT_SQL}
             WHERE list_id = ?1
             ORDER BY position ASC, id ASC;"
        ))?;
        let mut rows = stmt.query([list_id.to_string()])?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            items.push(parse_item_row(row)?);
        }
        Ok(items)
    }

    fn update_item(&self, id: ItemId, patch: &ItemPatch) -> RepoResult<TodoItem> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let mut item = load_item(&tx, id)?.ok_or(RepoError::ItemNotFound(id))?;

        if let Some(content) = &patch.content {
            item.content = content.clone();
        }
        if let Some(url) = &patch.url {
            item.url = url.clone();
        }
        if let Some(done) = patch.done {
            item.done = done;
        }
        item.validate()?;

        write_item_fields(&tx, &item)?;
        refresh_list_stats(&tx, item.list_id)?;
        tx.commit()?;
        Ok(item)
    }

    fn toggle_done(&self, id: ItemId) -> RepoResult<TodoItem> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let mut item = load_item(&tx, id)?.ok_or(RepoError::ItemNotFound(id))?;
        item.done = !item.done;

        write_item_fields(&tx, &item)?;
        refresh_list_stats(&tx, item.list_id)?;
        tx.commit()?;
        Ok(item)
    }

    fn update_positions(&self, changes: &[PositionChange]) -> RepoResult<()> {
        let Some(first) = changes.first() else {
            return Ok(());
        };

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let list_id = load_item(&tx, first.id)?
            .ok_or(RepoError::ItemNotFound(first.id))?
            .list_id;

        let now = now_epoch_ms();
        {
            let mut stmt = tx.prepare(
                "UPDATE items
                 SET position = ?2
                 WHERE id = ?1
                   AND list_id = ?3;",
            )?;
            for change in changes {
                let changed =
                    stmt.execute(params![change.id.to_string(), change.position, list_id.to_string()])?;
                if changed == 0 {
                    return Err(match load_item(&tx, change.id)? {
                        Some(_) => RepoError::MixedLists,
                        None => RepoError::ItemNotFound(change.id),
                    });
                }
                record_change(&tx, ChangeEntity::Item, change.id, ChangeOp::Update, now)?;
            }
        }

        refresh_list_stats(&tx, list_id)?;
        tx.commit()?;
        Ok(())
    }

    fn move_to_list(
        &self,
        id: ItemId,
        target_list: ListId,
        placement: Placement,
    ) -> RepoResult<TodoItem> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let mut source = load_item(&tx, id)?.ok_or(RepoError::ItemNotFound(id))?;

        let moved = NewItem {
            list_id: target_list,
            content: source.content.clone(),
            url: source.url.clone(),
        };

        source.content = source.moved_content();
        source.done = true;
        write_item_fields(&tx, &source)?;
        refresh_list_stats(&tx, source.list_id)?;

        let created = insert_in_tx(&tx, &moved, placement)?;
        tx.commit()?;
        Ok(created)
    }
}

fn insert_in_tx(conn: &Connection, item: &NewItem, placement: Placement) -> RepoResult<TodoItem> {
    let list_exists: bool = conn
        .query_row(
            "SELECT 1 FROM lists WHERE id = ?1;",
            [item.list_id.to_string()],
            |_| Ok(true),
        )
        .optional()?
        .unwrap_or(false);
    if !list_exists {
        return Err(RepoError::ListNotFound(item.list_id));
    }

    let position = next_position(conn, item.list_id, placement)?;
    let mut created = TodoItem::new(item.list_id, item.content.clone(), position);
    created.url = item.url.clone();
    created.validate()?;

    conn.execute(
        "INSERT INTO items (id, list_id, content, url, done, position)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
        params![
            created.id.to_string(),
            created.list_id.to_string(),
            created.content.as_str(),
            created.url.as_deref(),
            bool_to_int(created.done),
            created.position,
        ],
    )?;
    record_change(conn, ChangeEntity::Item, created.id, ChangeOp::Create, now_epoch_ms())?;
    refresh_list_stats(conn, created.list_id)?;
    Ok(created)
}

fn next_position(conn: &Connection, list_id: ListId, placement: Placement) -> RepoResult<i64> {
    let sql = match placement {
        Placement::Prepend => "SELECT COALESCE(MIN(position), 0) - 1 FROM items WHERE list_id = ?1;",
        Placement::Append => "SELECT COALESCE(MAX(position), 0) + 1 FROM items WHERE list_id = ?1;",
    };
    let position = conn.query_row(sql, [list_id.to_string()], |row| row.get(0))?;
    Ok(position)
}

fn write_item_fields(conn: &Connection, item: &TodoItem) -> RepoResult<()> {
    let changed = conn.execute(
        "UPDATE items
         SET content = ?2,
             url = ?3,
             done = ?4
         WHERE id = ?1;",
        params![
            item.id.to_string(),
            item.content.as_str(),
            item.url.as_deref(),
            bool_to_int(item.done),
        ],
    )?;
    if changed == 0 {
        return Err(RepoError::ItemNotFound(item.id));
    }
    record_change(conn, ChangeEntity::Item, item.id, ChangeOp::Update, now_epoch_ms())?;
    Ok(())
}

fn load_item(conn: &Connection, id: ItemId) -> RepoResult<Option<TodoItem>> {
    conn.query_row(
        &format!("{ITEM_SELECT_SQL} WHERE id = ?1;"),
        [id.to_string()],
        |row| Ok(parse_item_row(row)),
    )
    .optional()?
    .transpose()
}

fn parse_item_row(row: &Row<'_>) -> RepoResult<TodoItem> {
    let id_text: String = row.get("id")?;
    let list_id_text: String = row.get("list_id")?;

    let item = TodoItem {
        id: parse_uuid(&id_text, "items.id")?,
        list_id: parse_uuid(&list_id_text, "items.list_id")?,
        content: row.get("content")?,
        url: row.get("url")?,
        done: parse_flag(row.get("done")?, "items.done")?,
        position: row.get("position")?,
    };
    item.validate()?;
    Ok(item)
}
