//! Command-line surface.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// ztond - personal todo lists, local first
#[derive(Parser, Debug)]
#[command(name = "ztond")]
#[command(version)]
#[command(about = "Personal todo lists with local storage and sync outbox")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// SQLite database file, overriding the config
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Insert position flags shared by `add` and `move`.
#[derive(Args, Debug, Clone, Copy, Default)]
#[group(multiple = false)]
pub struct PlacementArgs {
    /// Insert before the first item
    #[arg(long)]
    pub prepend: bool,

    /// Insert after the last item
    #[arg(long)]
    pub append: bool,
}

impl PlacementArgs {
    /// Explicit flag wins, otherwise the configured default.
    pub fn resolve(self, default_prepend: bool) -> bool {
        match (self.prepend, self.append) {
            (true, _) => true,
            (_, true) => false,
            _ => default_prepend,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show active lists, most recently updated first
    Lists {
        /// Include archived lists
        #[arg(long)]
        archived: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Create a list
    ListAdd {
        /// List title
        title: String,
    },

    /// Rename a list
    ListRename {
        /// List id, id prefix or title
        list: String,

        /// New title
        title: String,
    },

    /// Archive a list (its items are kept)
    ListArchive {
        /// List id, id prefix or title
        list: String,

        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },

    /// Bring an archived list back
    ListRestore {
        /// List id, id prefix or title
        list: String,
    },

    /// Show the items of a list
    Items {
        /// List id, id prefix or title (defaults to the most recent list)
        #[arg(long, short)]
        list: Option<String>,

        /// Include done items
        #[arg(long)]
        done: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Add an item; content starting with `---` adds a divider
    Add {
        /// Item content
        content: String,

        /// List id, id prefix or title (defaults to the most recent list)
        #[arg(long, short)]
        list: Option<String>,

        /// Link attached to the item
        #[arg(long)]
        url: Option<String>,

        #[command(flatten)]
        placement: PlacementArgs,
    },

    /// Edit content and/or url of an item
    Edit {
        /// Item id or id prefix
        item: String,

        /// New content
        #[arg(long)]
        content: Option<String>,

        /// New url; pass an empty string to remove it
        #[arg(long)]
        url: Option<String>,
    },

    /// Mark an item done, or not done again
    Toggle {
        /// Item id or id prefix
        item: String,
    },

    /// Move an item to another index of its list
    Reorder {
        /// Item id or id prefix
        item: String,

        /// Target index in the displayed ordering
        index: usize,

        /// Count done items when resolving the index
        #[arg(long)]
        done: bool,
    },

    /// Move an item to another list
    Move {
        /// Item id or id prefix
        item: String,

        /// Target list id, id prefix or title
        list: String,

        #[command(flatten)]
        placement: PlacementArgs,
    },

    /// Show sync endpoint state and outbox size
    SyncStatus {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show pending outbox entries as JSON
    SyncPending {
        /// Maximum number of entries
        #[arg(long, default_value_t = 50)]
        limit: u32,
    },
}
