//! Todo list/item use-case service.
//!
//! # Responsibility
//! - Provide the operations behind the list picker, item list, create form,
//!   done toggle and drag handlers.
//! - Enforce input normalization and list lifecycle rules above repositories.
//!
//! # Invariants
//! - Blank titles and blank item content are silent no-ops (`Ok(None)`).
//! - Items are only added to, or moved into, active lists.
//! - Reorders write only the span between old and new index.

use crate::db::now_epoch_ms;
use crate::model::todo_item::{normalize_url, ItemId, TodoItem};
use crate::model::todo_list::{normalize_title, ListId, TodoList};
use crate::repo::item_repo::{ItemPatch, ItemRepository, NewItem, Placement};
use crate::repo::list_repo::{ListQuery, ListRepository};
use crate::repo::RepoError;
use crate::service::reorder::{plan_reorder, ReorderPlan};
use log::{debug, info};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors from todo service operations.
#[derive(Debug)]
pub enum TodoServiceError {
    ListNotFound(ListId),
    ItemNotFound(ItemId),
    /// Target list is archived.
    ListArchived(ListId),
    /// Cross-list move targets the item's own list.
    SameList(ListId),
    /// Repository-level failure.
    Repo(RepoError),
}

impl Display for TodoServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ListNotFound(id) => write!(f, "list not found: {id}"),
            Self::ItemNotFound(id) => write!(f, "item not found: {id}"),
            Self::ListArchived(id) => write!(f, "list is archived: {id}"),
            Self::SameList(id) => write!(f, "item already belongs to list {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for TodoServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for TodoServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::ListNotFound(id) => Self::ListNotFound(id),
            RepoError::ItemNotFound(id) => Self::ItemNotFound(id),
            other => Self::Repo(other),
        }
    }
}

pub type TodoServiceResult<T> = Result<T, TodoServiceError>;

/// Request model for the create-todo form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddTodoRequest {
    pub list_id: ListId,
    pub content: String,
    pub url: Option<String>,
}

/// Request model for editing one item in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditTodoRequest {
    /// New content; blank values keep the current content.
    pub content: Option<String>,
    /// New url; blank values clear the url.
    pub url: Option<String>,
}

/// Todo use-case service facade.
pub struct TodoService<L: ListRepository, I: ItemRepository> {
    lists: L,
    items: I,
}

impl<L: ListRepository, I: ItemRepository> TodoService<L, I> {
    pub fn new(lists: L, items: I) -> Self {
        Self { lists, items }
    }

    /// Active lists, most recently updated first.
    pub fn active_lists(&self) -> TodoServiceResult<Vec<TodoList>> {
        Ok(self.lists.list_lists(ListQuery::default())?)
    }

    /// Every list including archived ones, most recently updated first.
    pub fn all_lists(&self) -> TodoServiceResult<Vec<TodoList>> {
        Ok(self.lists.list_lists(ListQuery {
            include_archived: true,
        })?)
    }

    pub fn get_list(&self, id: ListId) -> TodoServiceResult<TodoList> {
        self.lists
            .get_list(id)?
            .ok_or(TodoServiceError::ListNotFound(id))
    }

    pub fn last_updated_list(&self) -> TodoServiceResult<Option<TodoList>> {
        Ok(self.lists.last_updated_list()?)
    }

    /// Resolves the list a view should show: the requested one when it is
    /// active, otherwise the most recently updated active list.
    pub fn resolve_active_list(
        &self,
        requested: Option<ListId>,
    ) -> TodoServiceResult<Option<TodoList>> {
        if let Some(id) = requested {
            if let Some(list) = self.lists.get_list(id)?.filter(TodoList::is_active) {
                return Ok(Some(list));
            }
            debug!("event=list_resolve module=service status=fallback list_id={id}");
        }
        self.last_updated_list()
    }

    /// Creates a list. Blank titles are ignored.
    pub fn add_list(&self, title: &str) -> TodoServiceResult<Option<TodoList>> {
        let Some(title) = normalize_title(title) else {
            debug!("event=list_add module=service status=skipped reason=blank_title");
            return Ok(None);
        };

        let list = TodoList::new(title, now_epoch_ms());
        self.lists.create_list(&list)?;
        info!("event=list_add module=service status=ok list_id={}", list.id);
        Ok(Some(list))
    }

    /// Renames a list and bumps its recency. Blank titles are ignored.
    pub fn rename_list(&self, id: ListId, title: &str) -> TodoServiceResult<Option<TodoList>> {
        let Some(title) = normalize_title(title) else {
            debug!("event=list_rename module=service status=skipped reason=blank_title");
            return Ok(None);
        };

        self.lists.rename_list(id, &title)?;
        info!("event=list_rename module=service status=ok list_id={id}");
        self.get_list(id).map(Some)
    }

    /// Archives a list. Its items stay in storage.
    pub fn archive_list(&self, id: ListId) -> TodoServiceResult<()> {
        self.lists.set_archived(id, true)?;
        info!("event=list_archive module=service status=ok list_id={id}");
        Ok(())
    }

    /// Brings an archived list back into the active set.
    pub fn restore_list(&self, id: ListId) -> TodoServiceResult<()> {
        self.lists.set_archived(id, false)?;
        info!("event=list_restore module=service status=ok list_id={id}");
        Ok(())
    }

    /// All items of a list ordered by position.
    pub fn items(&self, list_id: ListId) -> TodoServiceResult<Vec<TodoItem>> {
        self.get_list(list_id)?;
        Ok(self.items.list_items(list_id)?)
    }

    /// Items as shown by the item list: done items only when `display_done`.
    pub fn visible_items(
        &self,
        list_id: ListId,
        display_done: bool,
    ) -> TodoServiceResult<Vec<TodoItem>> {
        let mut items = self.items(list_id)?;
        if !display_done {
            items.retain(|item| !item.done);
        }
        Ok(items)
    }

    pub fn get_item(&self, id: ItemId) -> TodoServiceResult<TodoItem> {
        self.items
            .get_item(id)?
            .ok_or(TodoServiceError::ItemNotFound(id))
    }

    /// Adds an item at the start or end of the list. Blank content is
    /// ignored; a blank url is treated as no url.
    pub fn add_todo(
        &self,
        request: &AddTodoRequest,
        placement: Placement,
    ) -> TodoServiceResult<Option<TodoItem>> {
        if request.content.trim().is_empty() {
            debug!("event=item_add module=service status=skipped reason=blank_content");
            return Ok(None);
        }
        self.ensure_list_active(request.list_id)?;

        let new_item = NewItem {
            list_id: request.list_id,
            content: request.content.clone(),
            url: normalize_url(request.url.as_deref()),
        };
        let item = self.items.insert_item(&new_item, placement)?;
        info!(
            "event=item_add module=service status=ok list_id={} item_id={} placement={placement:?}",
            item.list_id, item.id
        );
        Ok(Some(item))
    }

    /// Edits content and/or url of one item.
    pub fn edit_todo(&self, id: ItemId, request: &EditTodoRequest) -> TodoServiceResult<TodoItem> {
        let patch = ItemPatch {
            content: request
                .content
                .as_ref()
                .filter(|content| !content.trim().is_empty())
                .cloned(),
            url: request
                .url
                .as_deref()
                .map(|url| normalize_url(Some(url))),
            done: None,
        };

        if patch.is_empty() {
            debug!("event=item_edit module=service status=skipped item_id={id}");
            return self.get_item(id);
        }

        let item = self.items.update_item(id, &patch)?;
        info!("event=item_edit module=service status=ok item_id={id}");
        Ok(item)
    }

    /// Flips the done flag; the list's open count follows.
    pub fn toggle_done(&self, id: ItemId) -> TodoServiceResult<TodoItem> {
        let item = self.items.toggle_done(id)?;
        info!(
            "event=item_toggle module=service status=ok item_id={id} done={}",
            item.done
        );
        Ok(item)
    }

    /// Drops `item_id` at `target_index` of the (possibly done-filtered)
    /// ordering of its own list.
    pub fn reorder(
        &self,
        item_id: ItemId,
        target_index: usize,
        display_done: bool,
    ) -> TodoServiceResult<ReorderPlan> {
        let item = self.get_item(item_id)?;
        let items = self.items.list_items(item.list_id)?;
        let plan = plan_reorder(&items, item_id, target_index, display_done)
            .ok_or(TodoServiceError::ItemNotFound(item_id))?;

        if plan.is_noop() {
            debug!("event=item_reorder module=service status=skipped item_id={item_id}");
            return Ok(plan);
        }

        self.items.update_positions(&plan.changes)?;
        info!(
            "event=item_reorder module=service status=ok item_id={item_id} from={} to={} touched={}",
            plan.old_index,
            plan.new_index,
            plan.changes.len()
        );
        Ok(plan)
    }

    /// Moves an item to another list: the source row stays behind, done and
    /// marked as moved; a fresh item is created in `target_list`.
    pub fn move_to_list(
        &self,
        item_id: ItemId,
        target_list: ListId,
        placement: Placement,
    ) -> TodoServiceResult<TodoItem> {
        let item = self.get_item(item_id)?;
        if item.list_id == target_list {
            return Err(TodoServiceError::SameList(target_list));
        }
        self.ensure_list_active(target_list)?;

        let created = self.items.move_to_list(item_id, target_list, placement)?;
        info!(
            "event=item_move module=service status=ok item_id={item_id} from_list={} to_list={target_list} new_item_id={}",
            item.list_id, created.id
        );
        Ok(created)
    }

    fn ensure_list_active(&self, id: ListId) -> TodoServiceResult<TodoList> {
        let list = self.get_list(id)?;
        if !list.is_active() {
            return Err(TodoServiceError::ListArchived(id));
        }
        Ok(list)
    }
}
