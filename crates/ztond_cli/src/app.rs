//! Command dispatch over one open database.

use crate::cli::Commands;
use crate::error::{CliError, Result};
use crate::render::{item_line, list_line};
use crate::resolve::{resolve_item, resolve_list, short_id};
use rusqlite::Connection;
use serde_json::json;
use std::io::{BufRead, Write};
use ztond_core::{
    sqlite_todo_service, AddTodoRequest, EditTodoRequest, ItemId, ListId, Placement,
    SqliteChangeJournal, SqliteTodoService, SyncService, TodoItem, TodoList,
};

/// Environment variable carrying the sync session token.
pub const SYNC_TOKEN_ENV: &str = "ZTOND_SYNC_TOKEN";

pub struct App<'a> {
    conn: &'a Connection,
    config: &'a ztond_core::AppConfig,
    service: SqliteTodoService<'a>,
    credentials_present: bool,
}

impl<'a> App<'a> {
    pub fn new(
        conn: &'a Connection,
        config: &'a ztond_core::AppConfig,
        credentials_present: bool,
    ) -> Result<Self> {
        Ok(Self {
            conn,
            config,
            service: sqlite_todo_service(conn)?,
            credentials_present,
        })
    }

    pub fn run(
        &self,
        command: Commands,
        out: &mut dyn Write,
        input: &mut dyn BufRead,
    ) -> Result<()> {
        match command {
            Commands::Lists { archived, json } => {
                let lists = if archived {
                    self.service.all_lists()?
                } else {
                    self.service.active_lists()?
                };
                if json {
                    serde_json::to_writer_pretty(&mut *out, &lists)?;
                    writeln!(out)?;
                } else if lists.is_empty() {
                    writeln!(out, "no lists yet; create one with `ztond list-add <title>`")?;
                } else {
                    for list in &lists {
                        writeln!(out, "{}", list_line(list))?;
                    }
                }
            }
            Commands::ListAdd { title } => match self.service.add_list(&title)? {
                Some(list) => writeln!(out, "created {}", list_line(&list))?,
                None => writeln!(out, "nothing to add: title is blank")?,
            },
            Commands::ListRename { list, title } => {
                let id = self.find_list(&list)?;
                match self.service.rename_list(id, &title)? {
                    Some(list) => writeln!(out, "renamed {}", list_line(&list))?,
                    None => writeln!(out, "title is blank; list unchanged")?,
                }
            }
            Commands::ListArchive { list, yes } => {
                let id = self.find_list(&list)?;
                let list = self.service.get_list(id)?;
                let prompt = format!("Archive list `{}`? Its items are kept. [y/N] ", list.title);
                if yes || confirm(&prompt, out, input)? {
                    self.service.archive_list(id)?;
                    writeln!(out, "archived {}", short_id(id))?;
                } else {
                    writeln!(out, "cancelled")?;
                }
            }
            Commands::ListRestore { list } => {
                let id = self.find_list(&list)?;
                self.service.restore_list(id)?;
                writeln!(out, "restored {}", list_line(&self.service.get_list(id)?))?;
            }
            Commands::Items { list, done, json } => {
                let Some(list) = self.view_list(list.as_deref())? else {
                    writeln!(out, "no active list; create one with `ztond list-add <title>`")?;
                    return Ok(());
                };
                let items = self
                    .service
                    .visible_items(list.id, done || self.config.display_done)?;
                if json {
                    serde_json::to_writer_pretty(&mut *out, &items)?;
                    writeln!(out)?;
                } else {
                    writeln!(out, "{}", list_line(&list))?;
                    for (index, item) in items.iter().enumerate() {
                        writeln!(out, "{}", item_line(index, item))?;
                    }
                }
            }
            Commands::Add {
                content,
                list,
                url,
                placement,
            } => {
                let list_id = self.target_list(list.as_deref())?;
                let request = AddTodoRequest {
                    list_id,
                    content,
                    url,
                };
                let placement = Placement::from_prepend(placement.resolve(self.config.prepend));
                match self.service.add_todo(&request, placement)? {
                    Some(item) => writeln!(out, "added {}", short_id(item.id))?,
                    None => writeln!(out, "nothing to add: content is blank")?,
                }
            }
            Commands::Edit { item, content, url } => {
                let id = self.find_item(&item)?;
                let blank_content = content
                    .as_deref()
                    .map_or(true, |content| content.trim().is_empty());
                if blank_content && url.is_none() {
                    writeln!(out, "nothing to change: pass --content or --url")?;
                    return Ok(());
                }
                let item = self
                    .service
                    .edit_todo(id, &EditTodoRequest { content, url })?;
                writeln!(out, "updated {}", short_id(item.id))?;
            }
            Commands::Toggle { item } => {
                let id = self.find_item(&item)?;
                let item = self.service.toggle_done(id)?;
                let state = if item.done { "done" } else { "open" };
                writeln!(out, "{} is {state}", short_id(item.id))?;
            }
            Commands::Reorder { item, index, done } => {
                let id = self.find_item(&item)?;
                let plan = self
                    .service
                    .reorder(id, index, done || self.config.display_done)?;
                if plan.is_noop() {
                    writeln!(out, "{} already at {}", short_id(id), plan.old_index)?;
                } else {
                    writeln!(
                        out,
                        "moved {} from {} to {} ({} rows touched)",
                        short_id(id),
                        plan.old_index,
                        plan.new_index,
                        plan.changes.len()
                    )?;
                }
            }
            Commands::Move {
                item,
                list,
                placement,
            } => {
                let id = self.find_item(&item)?;
                let target = self.find_list(&list)?;
                let placement = Placement::from_prepend(placement.resolve(self.config.prepend));
                let created = self.service.move_to_list(id, target, placement)?;
                writeln!(
                    out,
                    "moved {} to {} as {}",
                    short_id(id),
                    short_id(target),
                    short_id(created.id)
                )?;
            }
            Commands::SyncStatus { json } => {
                let sync = self.sync_service()?;
                let status = sync.status(self.credentials_present)?;
                let pending = sync.pending_count()?;
                if json {
                    serde_json::to_writer_pretty(
                        &mut *out,
                        &json!({ "status": status, "pending": pending }),
                    )?;
                    writeln!(out)?;
                } else {
                    match status {
                        ztond_core::SyncStatus::Disabled => writeln!(out, "sync: disabled")?,
                        ztond_core::SyncStatus::AwaitingAuth { database_url } => writeln!(
                            out,
                            "sync: awaiting sign-in for {database_url} (set {SYNC_TOKEN_ENV})"
                        )?,
                        ztond_core::SyncStatus::Ready { database_url } => {
                            writeln!(out, "sync: ready for {database_url}")?
                        }
                    }
                    writeln!(out, "pending changes: {pending}")?;
                }
            }
            Commands::SyncPending { limit } => {
                let records = self.sync_service()?.pending(limit)?;
                serde_json::to_writer_pretty(&mut *out, &records)?;
                writeln!(out)?;
            }
        }
        Ok(())
    }

    fn sync_service(&self) -> Result<SyncService<SqliteChangeJournal<'a>>> {
        Ok(SyncService::new(
            SqliteChangeJournal::try_new(self.conn)?,
            self.config.sync.clone(),
        ))
    }

    fn find_list(&self, reference: &str) -> Result<ListId> {
        resolve_list(&self.service.all_lists()?, reference)
    }

    fn find_item(&self, reference: &str) -> Result<ItemId> {
        let mut items: Vec<TodoItem> = Vec::new();
        for list in self.service.all_lists()? {
            items.extend(self.service.items(list.id)?);
        }
        resolve_item(&items, reference)
    }

    /// Explicit list, or the most recently updated active one.
    fn view_list(&self, reference: Option<&str>) -> Result<Option<TodoList>> {
        match reference {
            Some(reference) => {
                let id = self.find_list(reference)?;
                Ok(Some(self.service.get_list(id)?))
            }
            None => Ok(self.service.resolve_active_list(None)?),
        }
    }

    fn target_list(&self, reference: Option<&str>) -> Result<ListId> {
        self.view_list(reference)?
            .map(|list| list.id)
            .ok_or(CliError::NoActiveList)
    }
}

fn confirm(prompt: &str, out: &mut dyn Write, input: &mut dyn BufRead) -> Result<bool> {
    write!(out, "{prompt}")?;
    out.flush()?;
    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(matches!(
        answer.trim().to_ascii_lowercase().as_str(),
        "y" | "yes"
    ))
}

#[cfg(test)]
mod tests {
    use super::App;
    use crate::cli::{Commands, PlacementArgs};
    use crate::error::CliError;
    use crate::resolve::short_id;
    use std::io::Cursor;
    use ztond_core::db::open_db_in_memory;
    use ztond_core::{sqlite_todo_service, AppConfig, SyncConfig};

    fn run(app: &App<'_>, command: Commands, input: &str) -> Result<String, CliError> {
        let mut out = Vec::new();
        let mut input = Cursor::new(input.as_bytes().to_vec());
        app.run(command, &mut out, &mut input)?;
        Ok(String::from_utf8(out).unwrap())
    }

    fn add(content: &str, list: Option<&str>) -> Commands {
        Commands::Add {
            content: content.to_string(),
            list: list.map(str::to_string),
            url: None,
            placement: PlacementArgs::default(),
        }
    }

    fn list_add(title: &str) -> Commands {
        Commands::ListAdd {
            title: title.to_string(),
        }
    }

    #[test]
    fn add_goes_to_most_recent_list_and_prepends_by_default() {
        let conn = open_db_in_memory().unwrap();
        let config = AppConfig::default();
        let app = App::new(&conn, &config, false).unwrap();

        run(&app, list_add("Work"), "").unwrap();
        run(&app, list_add("Home"), "").unwrap();
        run(&app, add("milk", None), "").unwrap();
        run(&app, add("eggs", None), "").unwrap();

        let service = sqlite_todo_service(&conn).unwrap();
        let home = service.last_updated_list().unwrap().unwrap();
        assert_eq!(home.title, "Home");
        let contents: Vec<String> = service
            .items(home.id)
            .unwrap()
            .into_iter()
            .map(|item| item.content)
            .collect();
        assert_eq!(contents, vec!["eggs", "milk"]);

        let listing = run(
            &app,
            Commands::Items {
                list: Some("Home".to_string()),
                done: false,
                json: false,
            },
            "",
        )
        .unwrap();
        assert!(listing.contains("  0. [ ] eggs"));
        assert!(listing.contains("  1. [ ] milk"));
    }

    #[test]
    fn add_without_any_list_fails() {
        let conn = open_db_in_memory().unwrap();
        let config = AppConfig::default();
        let app = App::new(&conn, &config, false).unwrap();

        let err = run(&app, add("milk", None), "").unwrap_err();
        assert!(matches!(err, CliError::NoActiveList));
    }

    #[test]
    fn edit_without_changes_reports_nothing_to_change() {
        let conn = open_db_in_memory().unwrap();
        let config = AppConfig::default();
        let app = App::new(&conn, &config, false).unwrap();
        run(&app, list_add("Work"), "").unwrap();
        run(&app, add("milk", None), "").unwrap();

        let service = sqlite_todo_service(&conn).unwrap();
        let list_id = service.last_updated_list().unwrap().unwrap().id;
        let item = service.items(list_id).unwrap().remove(0);
        let edit = |content: Option<&str>, url: Option<&str>| Commands::Edit {
            item: short_id(item.id),
            content: content.map(str::to_string),
            url: url.map(str::to_string),
        };

        let output = run(&app, edit(None, None), "").unwrap();
        assert_eq!(output, "nothing to change: pass --content or --url\n");
        let output = run(&app, edit(Some("  "), None), "").unwrap();
        assert!(output.starts_with("nothing to change"));
        assert_eq!(service.get_item(item.id).unwrap().content, "milk");

        let output = run(&app, edit(Some("oat milk"), None), "").unwrap();
        assert!(output.starts_with("updated"));
        assert_eq!(service.get_item(item.id).unwrap().content, "oat milk");
    }

    #[test]
    fn archive_requires_confirmation() {
        let conn = open_db_in_memory().unwrap();
        let config = AppConfig::default();
        let app = App::new(&conn, &config, false).unwrap();
        run(&app, list_add("Work"), "").unwrap();

        let archive = |yes| Commands::ListArchive {
            list: "Work".to_string(),
            yes,
        };
        let output = run(&app, archive(false), "n\n").unwrap();
        assert!(output.ends_with("cancelled\n"));
        let service = sqlite_todo_service(&conn).unwrap();
        assert_eq!(service.active_lists().unwrap().len(), 1);

        run(&app, archive(false), "yes\n").unwrap();
        assert!(service.active_lists().unwrap().is_empty());
        assert_eq!(service.all_lists().unwrap().len(), 1);

        run(
            &app,
            Commands::ListRestore {
                list: "Work".to_string(),
            },
            "",
        )
        .unwrap();
        assert_eq!(service.active_lists().unwrap().len(), 1);
    }

    #[test]
    fn move_and_toggle_by_id_prefix() {
        let conn = open_db_in_memory().unwrap();
        let config = AppConfig::default();
        let app = App::new(&conn, &config, false).unwrap();
        run(&app, list_add("Work"), "").unwrap();
        run(&app, list_add("Home"), "").unwrap();
        run(&app, add("milk", Some("Work")), "").unwrap();

        let service = sqlite_todo_service(&conn).unwrap();
        let work = service
            .all_lists()
            .unwrap()
            .into_iter()
            .find(|list| list.title == "Work")
            .unwrap();
        let item = service.items(work.id).unwrap().remove(0);

        run(
            &app,
            Commands::Move {
                item: short_id(item.id),
                list: "Home".to_string(),
                placement: PlacementArgs::default(),
            },
            "",
        )
        .unwrap();

        let source = service.get_item(item.id).unwrap();
        assert!(source.done);
        assert_eq!(source.content, "*moved* milk");
        let home = service
            .all_lists()
            .unwrap()
            .into_iter()
            .find(|list| list.title == "Home")
            .unwrap();
        assert_eq!(home.todo_count, 1);

        let moved = service.items(home.id).unwrap().remove(0);
        let output = run(
            &app,
            Commands::Toggle {
                item: short_id(moved.id),
            },
            "",
        )
        .unwrap();
        assert!(output.ends_with("is done\n"));
        assert_eq!(service.get_list(home.id).unwrap().todo_count, 0);
    }

    #[test]
    fn reorder_uses_displayed_index() {
        let conn = open_db_in_memory().unwrap();
        let config = AppConfig {
            prepend: false,
            ..AppConfig::default()
        };
        let app = App::new(&conn, &config, false).unwrap();
        run(&app, list_add("Work"), "").unwrap();
        for content in ["a", "b", "c"] {
            run(&app, add(content, None), "").unwrap();
        }

        let service = sqlite_todo_service(&conn).unwrap();
        let list_id = service.last_updated_list().unwrap().unwrap().id;
        let first = service.items(list_id).unwrap().remove(0);
        run(
            &app,
            Commands::Reorder {
                item: first.id.to_string(),
                index: 2,
                done: false,
            },
            "",
        )
        .unwrap();

        let contents: Vec<String> = service
            .items(list_id)
            .unwrap()
            .into_iter()
            .map(|item| item.content)
            .collect();
        assert_eq!(contents, vec!["b", "c", "a"]);
    }

    #[test]
    fn sync_status_reports_outbox() {
        let conn = open_db_in_memory().unwrap();
        let config = AppConfig {
            sync: SyncConfig {
                database_url: "https://z0.example.cloud".to_string(),
                require_auth: true,
            },
            ..AppConfig::default()
        };
        let app = App::new(&conn, &config, false).unwrap();
        run(&app, list_add("Work"), "").unwrap();

        let output = run(&app, Commands::SyncStatus { json: true }, "").unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["status"]["state"], "awaiting_auth");
        assert_eq!(value["pending"], 1);

        let pending = run(&app, Commands::SyncPending { limit: 10 }, "").unwrap();
        let records: serde_json::Value = serde_json::from_str(&pending).unwrap();
        assert_eq!(records.as_array().unwrap().len(), 1);
    }
}
