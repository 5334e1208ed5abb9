//! Core domain logic for ztond, a local-first todo list store.
//! This crate is the single source of truth for list/item invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod sync;

pub use config::{AppConfig, ConfigError};
pub use logging::{default_log_level, flush_logging, init_logging, logging_status, LoggingError};
pub use model::todo_item::{count_open, ItemId, ItemKind, TodoItem, DIVIDER_PREFIX, MOVED_MARKER};
pub use model::todo_list::{ListId, TodoList};
pub use model::TodoValidationError;
pub use repo::item_repo::{
    ItemPatch, ItemRepository, NewItem, Placement, PositionChange, SqliteItemRepository,
};
pub use repo::list_repo::{ListQuery, ListRepository, SqliteListRepository};
pub use repo::{RepoError, RepoResult};
pub use service::reorder::{plan_reorder, ReorderPlan};
pub use service::todo_service::{
    AddTodoRequest, EditTodoRequest, TodoService, TodoServiceError, TodoServiceResult,
};
pub use sync::config::{SyncConfig, SyncStatus};
pub use sync::journal::{ChangeEntity, ChangeJournal, ChangeOp, ChangeRecord, SqliteChangeJournal};
pub use sync::provider::{SyncProvider, SyncReport, SyncService};
pub use sync::SyncError;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Convenience alias for the SQLite-backed service used by front ends.
pub type SqliteTodoService<'conn> =
    TodoService<SqliteListRepository<'conn>, SqliteItemRepository<'conn>>;

/// Builds the SQLite-backed service over one migrated connection.
pub fn sqlite_todo_service(conn: &rusqlite::Connection) -> RepoResult<SqliteTodoService<'_>> {
    Ok(TodoService::new(
        SqliteListRepository::try_new(conn)?,
        SqliteItemRepository::try_new(conn)?,
    ))
}
