//! Change journal backing sync pushes.
//!
//! # Invariants
//! - `seq` is strictly increasing and never reused (`AUTOINCREMENT`).
//! - At most one pending entry per entity; a newer change moves it to the
//!   tail with a fresh `seq`.
//! - Entries are written in the same transaction as the mutation they record.

use crate::repo::{ensure_schema_ready, parse_uuid, RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Entity family of a journaled change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeEntity {
    List,
    Item,
}

/// Kind of journaled change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeOp {
    Create,
    Update,
}

/// One pending outbox entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeRecord {
    pub seq: i64,
    pub entity: ChangeEntity,
    pub entity_id: Uuid,
    pub op: ChangeOp,
    pub changed_at: i64,
}

/// Read/acknowledge access to the change journal.
pub trait ChangeJournal {
    /// Oldest pending entries first, at most `limit`.
    fn pending(&self, limit: u32) -> RepoResult<Vec<ChangeRecord>>;
    fn pending_count(&self) -> RepoResult<u64>;
    /// Drops every entry with `seq <= through_seq`. Returns the number dropped.
    fn acknowledge(&self, through_seq: i64) -> RepoResult<usize>;
}

/// SQLite-backed change journal.
pub struct SqliteChangeJournal<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteChangeJournal<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_schema_ready(conn)?;
        Ok(Self { conn })
    }
}

impl ChangeJournal for SqliteChangeJournal<'_> {
    fn pending(&self, limit: u32) -> RepoResult<Vec<ChangeRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT seq, entity, entity_id, op, changed_at
             FROM change_log
             ORDER BY seq ASC
             LIMIT ?1;",
        )?;
        let mut rows = stmt.query([i64::from(limit)])?;
        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            let entity_text: String = row.get("entity")?;
            let op_text: String = row.get("op")?;
            let entity_id_text: String = row.get("entity_id")?;
            records.push(ChangeRecord {
                seq: row.get("seq")?,
                entity: parse_entity(&entity_text)?,
                entity_id: parse_uuid(&entity_id_text, "change_log.entity_id")?,
                op: parse_op(&op_text)?,
                changed_at: row.get("changed_at")?,
            });
        }
        Ok(records)
    }

    fn pending_count(&self) -> RepoResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM change_log;", [], |row| row.get(0))?;
        Ok(count.max(0) as u64)
    }

    fn acknowledge(&self, through_seq: i64) -> RepoResult<usize> {
        let dropped = self
            .conn
            .execute("DELETE FROM change_log WHERE seq <= ?1;", [through_seq])?;
        Ok(dropped)
    }
}

/// Records a change, replacing any pending entry for the same entity.
/// Callers pass the connection or transaction that performed the mutation.
pub(crate) fn record_change(
    conn: &Connection,
    entity: ChangeEntity,
    entity_id: Uuid,
    op: ChangeOp,
    changed_at: i64,
) -> RepoResult<()> {
    let entity_text = entity_to_db(entity);
    let entity_id_text = entity_id.to_string();

    let pending_op: Option<String> = conn
        .query_row(
            "SELECT op FROM change_log WHERE entity = ?1 AND entity_id = ?2;",
            params![entity_text, entity_id_text],
            |row| row.get(0),
        )
        .optional()?;
    // Not yet pushed: the provider still needs the create.
    let op = match pending_op.as_deref() {
        Some("create") => ChangeOp::Create,
        _ => op,
    };

    conn.execute(
        "DELETE FROM change_log WHERE entity = ?1 AND entity_id = ?2;",
        params![entity_text, entity_id_text],
    )?;
    conn.execute(
        "INSERT INTO change_log (entity, entity_id, op, changed_at)
         VALUES (?1, ?2, ?3, ?4);",
        params![entity_text, entity_id_text, op_to_db(op), changed_at],
    )?;
    Ok(())
}

fn entity_to_db(entity: ChangeEntity) -> &'static str {
    match entity {
        ChangeEntity::List => "list",
        ChangeEntity::Item => "item",
    }
}

fn parse_entity(value: &str) -> RepoResult<ChangeEntity> {
    match value {
        "list" => Ok(ChangeEntity::List),
        "item" => Ok(ChangeEntity::Item),
        other => Err(RepoError::InvalidData(format!(
            "invalid entity `{other}` in change_log.entity"
        ))),
    }
}

fn op_to_db(op: ChangeOp) -> &'static str {
    match op {
        ChangeOp::Create => "create",
        ChangeOp::Update => "update",
    }
}

fn parse_op(value: &str) -> RepoResult<ChangeOp> {
    match value {
        "create" => Ok(ChangeOp::Create),
        "update" => Ok(ChangeOp::Update),
        other => Err(RepoError::InvalidData(format!(
            "invalid op `{other}` in change_log.op"
        ))),
    }
}
