use ztond_core::db::open_db_in_memory;
use ztond_core::{
    sqlite_todo_service, AddTodoRequest, ListRepository, Placement, SqliteListRepository,
    TodoList, TodoServiceError,
};

fn setup() -> rusqlite::Connection {
    open_db_in_memory().unwrap()
}

fn add_item(
    service: &ztond_core::SqliteTodoService<'_>,
    list: &TodoList,
    content: &str,
) -> ztond_core::TodoItem {
    service
        .add_todo(
            &AddTodoRequest {
                list_id: list.id,
                content: content.to_string(),
                url: None,
            },
            Placement::Append,
        )
        .unwrap()
        .unwrap()
}

#[test]
fn add_list_trims_title_and_starts_empty() {
    let conn = setup();
    let service = sqlite_todo_service(&conn).unwrap();

    let list = service.add_list("  Groceries ").unwrap().unwrap();
    assert_eq!(list.title, "Groceries");
    assert_eq!(list.todo_count, 0);
    assert!(!list.archived);

    let stored = service.get_list(list.id).unwrap();
    assert_eq!(stored, list);
}

#[test]
fn blank_title_is_a_silent_noop() {
    let conn = setup();
    let service = sqlite_todo_service(&conn).unwrap();

    assert!(service.add_list("   ").unwrap().is_none());
    assert!(service.active_lists().unwrap().is_empty());

    let list = service.add_list("Work").unwrap().unwrap();
    assert!(service.rename_list(list.id, "").unwrap().is_none());
    assert_eq!(service.get_list(list.id).unwrap().title, "Work");
}

#[test]
fn active_lists_are_sorted_by_recency() {
    let conn = setup();
    let service = sqlite_todo_service(&conn).unwrap();

    let first = service.add_list("First").unwrap().unwrap();
    let second = service.add_list("Second").unwrap().unwrap();
    let third = service.add_list("Third").unwrap().unwrap();

    let titles: Vec<String> = service
        .active_lists()
        .unwrap()
        .into_iter()
        .map(|list| list.title)
        .collect();
    assert_eq!(titles, vec!["Third", "Second", "First"]);

    // Touching an item bumps its list to the front.
    add_item(&service, &first, "milk");
    let ids: Vec<_> = service
        .active_lists()
        .unwrap()
        .into_iter()
        .map(|list| list.id)
        .collect();
    assert_eq!(ids, vec![first.id, third.id, second.id]);
    assert_eq!(service.last_updated_list().unwrap().unwrap().id, first.id);
}

#[test]
fn rename_bumps_recency() {
    let conn = setup();
    let service = sqlite_todo_service(&conn).unwrap();

    let old = service.add_list("Old").unwrap().unwrap();
    let _new = service.add_list("New").unwrap().unwrap();

    let renamed = service.rename_list(old.id, "Renamed").unwrap().unwrap();
    assert_eq!(renamed.title, "Renamed");
    assert!(renamed.updated_at > old.updated_at);
    assert_eq!(service.last_updated_list().unwrap().unwrap().id, old.id);
}

#[test]
fn archiving_hides_list_but_keeps_items() {
    let conn = setup();
    let service = sqlite_todo_service(&conn).unwrap();

    let list = service.add_list("Holiday").unwrap().unwrap();
    add_item(&service, &list, "passport");
    add_item(&service, &list, "sunscreen");

    service.archive_list(list.id).unwrap();

    assert!(service.active_lists().unwrap().is_empty());
    assert!(service.last_updated_list().unwrap().is_none());
    assert_eq!(service.all_lists().unwrap().len(), 1);
    assert!(service.get_list(list.id).unwrap().archived);
    assert_eq!(service.items(list.id).unwrap().len(), 2);

    service.restore_list(list.id).unwrap();
    assert_eq!(service.active_lists().unwrap().len(), 1);
}

#[test]
fn archived_lists_reject_new_items() {
    let conn = setup();
    let service = sqlite_todo_service(&conn).unwrap();

    let list = service.add_list("Closed").unwrap().unwrap();
    service.archive_list(list.id).unwrap();

    let err = service
        .add_todo(
            &AddTodoRequest {
                list_id: list.id,
                content: "late".to_string(),
                url: None,
            },
            Placement::Prepend,
        )
        .unwrap_err();
    assert!(matches!(err, TodoServiceError::ListArchived(id) if id == list.id));
}

#[test]
fn resolve_active_list_falls_back_to_most_recent() {
    let conn = setup();
    let service = sqlite_todo_service(&conn).unwrap();

    assert!(service.resolve_active_list(None).unwrap().is_none());

    let archived = service.add_list("Archived").unwrap().unwrap();
    let kept = service.add_list("Kept").unwrap().unwrap();
    let latest = service.add_list("Latest").unwrap().unwrap();
    service.archive_list(archived.id).unwrap();

    assert_eq!(
        service.resolve_active_list(Some(kept.id)).unwrap().unwrap().id,
        kept.id
    );
    assert_eq!(
        service
            .resolve_active_list(Some(archived.id))
            .unwrap()
            .unwrap()
            .id,
        latest.id
    );
    assert_eq!(service.resolve_active_list(None).unwrap().unwrap().id, latest.id);
}

#[test]
fn missing_list_operations_return_not_found() {
    let conn = setup();
    let repo = SqliteListRepository::try_new(&conn).unwrap();
    let service = sqlite_todo_service(&conn).unwrap();
    let missing = uuid::Uuid::new_v4();

    assert!(repo.get_list(missing).unwrap().is_none());
    assert!(matches!(
        service.archive_list(missing),
        Err(TodoServiceError::ListNotFound(id)) if id == missing
    ));
    assert!(matches!(
        service.items(missing),
        Err(TodoServiceError::ListNotFound(_))
    ));
}
