//! Watchlist and favorites, persisted as JSON arrays in a [`KeyValueStorage`].
//!
//! Storage trouble never reaches callers: unreadable data reads as an empty
//! list and failed writes come back as `false`. Stored elements are never
//! re-encoded, so entries written by other clients keep their exact shape.

use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::omdb::{MediaType, MovieDetail, MovieSummary};
use crate::storage::KeyValueStorage;

pub const WATCHLIST_KEY: &str = "movie_watchlist";
pub const FAVORITES_KEY: &str = "movie_favorites";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ListKind {
    Watchlist,
    Favorites,
}

impl ListKind {
    pub const ALL: [ListKind; 2] = [ListKind::Watchlist, ListKind::Favorites];

    pub fn storage_key(&self) -> &'static str {
        match self {
            ListKind::Watchlist => WATCHLIST_KEY,
            ListKind::Favorites => FAVORITES_KEY,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ListKind::Watchlist => "watchlist",
            ListKind::Favorites => "favorites",
        }
    }
}

impl std::fmt::Display for ListKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ListKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "watchlist" | "watch" => Ok(ListKind::Watchlist),
            "favorites" | "favourites" | "fav" => Ok(ListKind::Favorites),
            other => Err(format!(
                "unknown list '{}', expected 'watchlist' or 'favorites'",
                other
            )),
        }
    }
}

/// A persisted list member. Field names follow the browser storage layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListEntry {
    #[serde(rename = "imdbID")]
    pub imdb_id: String,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Year")]
    pub year: String,
    #[serde(rename = "Poster", default, with = "crate::omdb::na")]
    pub poster: Option<String>,
    #[serde(rename = "Type")]
    pub kind: MediaType,
    #[serde(rename = "addedAt")]
    pub added_at: DateTime<Utc>,
}

impl ListEntry {
    fn from_summary(summary: MovieSummary, added_at: DateTime<Utc>) -> Self {
        ListEntry {
            imdb_id: summary.imdb_id,
            title: summary.title,
            year: summary.year,
            poster: summary.poster,
            kind: summary.kind,
            added_at,
        }
    }
}

/// Anything that can be put on a list.
pub trait Listable {
    fn summary(&self) -> MovieSummary;
}

impl Listable for MovieSummary {
    fn summary(&self) -> MovieSummary {
        self.clone()
    }
}

impl Listable for MovieDetail {
    fn summary(&self) -> MovieSummary {
        MovieDetail::summary(self)
    }
}

impl Listable for ListEntry {
    fn summary(&self) -> MovieSummary {
        MovieSummary {
            imdb_id: self.imdb_id.clone(),
            title: self.title.clone(),
            year: self.year.clone(),
            poster: self.poster.clone(),
            kind: self.kind,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ListStats {
    pub watchlist_count: usize,
    pub favorites_count: usize,
}

pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

pub struct ListStore {
    storage: Arc<dyn KeyValueStorage>,
    clock: Clock,
}

impl ListStore {
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self::with_clock(storage, Arc::new(Utc::now))
    }

    pub fn with_clock(storage: Arc<dyn KeyValueStorage>, clock: Clock) -> Self {
        Self { storage, clock }
    }

    /// Every readable entry, in storage order. Missing data or data that is
    /// not a JSON array reads as empty; elements that do not decode as an
    /// entry are skipped but stay in storage.
    pub fn get_all(&self, kind: ListKind) -> Vec<ListEntry> {
        self.load_raw(kind)
            .into_iter()
            .filter_map(|item| match serde_json::from_value::<ListEntry>(item) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!("Skipping unreadable {} entry: {}", kind, e);
                    None
                }
            })
            .collect()
    }

    /// Newest first.
    pub fn get_sorted(&self, kind: ListKind) -> Vec<ListEntry> {
        let mut entries = self.get_all(kind);
        entries.sort_by(|a, b| b.added_at.cmp(&a.added_at));
        entries
    }

    pub fn contains(&self, kind: ListKind, imdb_id: &str) -> bool {
        self.load_raw(kind)
            .iter()
            .any(|item| stored_id(item) == Some(imdb_id))
    }

    /// Appends one entry. Returns false, without touching storage, when the
    /// id is already listed. Elements already stored are written back as is.
    pub fn add(&self, kind: ListKind, movie: &impl Listable) -> bool {
        let summary = movie.summary();
        let mut items = self.load_raw(kind);
        if items
            .iter()
            .any(|item| stored_id(item) == Some(summary.imdb_id.as_str()))
        {
            debug!("{} already holds {}", kind, summary.imdb_id);
            return false;
        }
        let imdb_id = summary.imdb_id.clone();
        let entry = ListEntry::from_summary(summary, (self.clock)());
        match serde_json::to_value(&entry) {
            Ok(value) => items.push(value),
            Err(e) => {
                warn!("Failed to encode {} entry {}: {}", kind, imdb_id, e);
                return false;
            }
        }
        let saved = self.persist(kind, &items);
        if saved {
            debug!("Added {} to {}", imdb_id, kind);
        }
        saved
    }

    /// Idempotent: removing an absent id still succeeds.
    pub fn remove(&self, kind: ListKind, imdb_id: &str) -> bool {
        let mut items = self.load_raw(kind);
        items.retain(|item| stored_id(item) != Some(imdb_id));
        self.persist(kind, &items)
    }

    /// Removes the movie when listed, adds it otherwise. Returns whether the
    /// movie is on the list afterwards.
    pub fn toggle(&self, kind: ListKind, movie: &impl Listable) -> bool {
        let summary = movie.summary();
        if self.contains(kind, &summary.imdb_id) {
            let removed = self.remove(kind, &summary.imdb_id);
            !removed
        } else {
            self.add(kind, &summary)
        }
    }

    pub fn clear(&self, kind: ListKind) {
        if let Err(e) = self.storage.remove(kind.storage_key()) {
            warn!("Failed to clear {}: {}", kind, e);
        }
    }

    pub fn clear_all(&self) {
        for kind in ListKind::ALL {
            self.clear(kind);
        }
    }

    pub fn stats(&self) -> ListStats {
        ListStats {
            watchlist_count: self.get_all(ListKind::Watchlist).len(),
            favorites_count: self.get_all(ListKind::Favorites).len(),
        }
    }

    fn load_raw(&self, kind: ListKind) -> Vec<Value> {
        let raw = match self.storage.get(kind.storage_key()) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!("Failed to read {}: {}", kind, e);
                return Vec::new();
            }
        };
        match serde_json::from_str::<Vec<Value>>(&raw) {
            Ok(items) => items,
            Err(e) => {
                warn!("Ignoring unreadable {} data: {}", kind, e);
                Vec::new()
            }
        }
    }

    fn persist(&self, kind: ListKind, items: &[Value]) -> bool {
        let encoded = match serde_json::to_string(items) {
            Ok(s) => s,
            Err(e) => {
                warn!("Failed to encode {}: {}", kind, e);
                return false;
            }
        };
        match self.storage.set(kind.storage_key(), &encoded) {
            Ok(()) => true,
            Err(e) => {
                warn!("Failed to write {}: {}", kind, e);
                false
            }
        }
    }
}

fn stored_id(item: &Value) -> Option<&str> {
    item.get("imdbID").and_then(Value::as_str)
}
