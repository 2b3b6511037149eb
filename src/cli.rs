use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::filters::SortBy;
use crate::store::ListKind;

#[derive(Debug, Parser)]
#[command(name = "cinelist")]
#[command(about = "Search OMDb and keep a local watchlist and favorites")]
#[command(version)]
pub struct Cli {
    /// SQLite file holding the lists (overrides CINELIST_DB).
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,
    /// Keep lists in memory only; nothing is written to disk.
    #[arg(long, global = true, default_value_t = false)]
    pub ephemeral: bool,
    /// Print JSON instead of text.
    #[arg(long, global = true, default_value_t = false)]
    pub json: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Search titles, optionally narrowing the page by year and type.
    Search {
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long)]
        year: Option<String>,
        #[arg(long = "type")]
        kind: Option<String>,
        #[arg(long, default_value = "relevance")]
        sort: SortBy,
    },
    /// Full record for an IMDb id.
    Details { imdb_id: String },
    /// Full record for an exact title, optionally pinned to a year.
    Lookup {
        #[arg(required = true, num_args = 1..)]
        title: Vec<String>,
        #[arg(long)]
        year: Option<String>,
    },
    /// A few picks from popular searches.
    Featured,
    /// Show a list, newest first.
    List { list: ListKind },
    /// Add a title to a list.
    Add { list: ListKind, imdb_id: String },
    /// Remove a title from a list.
    Remove { list: ListKind, imdb_id: String },
    /// Add the title if it is missing, remove it otherwise.
    Toggle { list: ListKind, imdb_id: String },
    /// Empty a list, or both with `all`.
    Clear { target: ClearTarget },
    /// Number of entries in each list.
    Stats,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearTarget {
    One(ListKind),
    All,
}

impl std::str::FromStr for ClearTarget {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(ClearTarget::All);
        }
        s.parse::<ListKind>().map(ClearTarget::One)
    }
}

impl Command {
    /// Whether the command talks to OMDb.
    pub fn needs_catalog(&self) -> bool {
        matches!(
            self,
            Command::Search { .. }
                | Command::Details { .. }
                | Command::Lookup { .. }
                | Command::Featured
                | Command::Add { .. }
                | Command::Toggle { .. }
        )
    }
}
