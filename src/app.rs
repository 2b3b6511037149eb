use crate::cli::{ClearTarget, Cli, Command};
use crate::config::Config;
use crate::discover;
use crate::links;
use crate::omdb::{parse_imdb_id, CatalogApi, MovieDetail, MovieSummary, OmdbClient};
use crate::session::SearchSession;
use crate::storage::{KeyValueStorage, MemoryStorage, SqliteStorage};
use crate::store::{ListEntry, ListKind, ListStore};
use anyhow::{anyhow, bail, Context, Result};
use serde_json::json;
use std::io::Write;
use std::sync::Arc;
use tracing::{debug, info};

const DETAILS_FAILED_MESSAGE: &str = "Failed to load movie details. Please try again.";

#[derive(Clone)]
pub struct AppState {
    pub catalog: Option<Arc<dyn CatalogApi>>,
    pub store: Arc<ListStore>,
}

impl AppState {
    pub fn new(catalog: Option<Arc<dyn CatalogApi>>, store: Arc<ListStore>) -> Self {
        Self { catalog, store }
    }

    /// Opens the list database and, when the command needs it, the OMDb client.
    pub fn from_config(config: &Config, cli: &Cli) -> Result<Self> {
        let storage: Arc<dyn KeyValueStorage> = if cli.ephemeral {
            info!("Using in-memory lists");
            Arc::new(MemoryStorage::new())
        } else {
            let path = cli.db.clone().unwrap_or_else(|| config.db_path.clone());
            debug!("Opening list database {}", path.display());
            let storage = SqliteStorage::new(&path)
                .with_context(|| format!("Failed to open list database {}", path.display()))?;
            Arc::new(storage)
        };

        let catalog: Option<Arc<dyn CatalogApi>> = if cli.command.needs_catalog() {
            Some(Arc::new(OmdbClient::from_config(config)?))
        } else {
            None
        };

        Ok(Self::new(catalog, Arc::new(ListStore::new(storage))))
    }

    fn catalog(&self) -> Result<&dyn CatalogApi> {
        self.catalog
            .as_deref()
            .ok_or_else(|| anyhow!("OMDb client not configured; set OMDB_API_KEY"))
    }
}

pub async fn run_command(
    state: &AppState,
    command: Command,
    out: &mut dyn Write,
    json: bool,
) -> Result<()> {
    match command {
        Command::Search {
            query,
            page,
            year,
            kind,
            sort,
        } => {
            let query = query.join(" ");
            let mut session = SearchSession::new();
            session.search(state.catalog()?, &query, page).await;
            session.set_year(year.as_deref());
            session.set_kind(kind.as_deref());
            session.set_sort(sort);
            render_search(state, &session, out, json)
        }
        Command::Details { imdb_id } => {
            let imdb_id = imdb_id_arg(&imdb_id)?;
            let detail = state
                .catalog()?
                .details(&imdb_id)
                .await
                .map_err(|e| anyhow!(e.user_message(DETAILS_FAILED_MESSAGE)))?;
            render_detail(state, &detail, out, json)
        }
        Command::Lookup { title, year } => {
            let title = title.join(" ");
            let detail = state
                .catalog()?
                .lookup_title(&title, year.as_deref())
                .await
                .map_err(|e| anyhow!(e.user_message(DETAILS_FAILED_MESSAGE)))?;
            render_detail(state, &detail, out, json)
        }
        Command::Featured => {
            let items = discover::featured(state.catalog()?).await;
            if json {
                writeln!(out, "{}", serde_json::to_string_pretty(&items)?)?;
            } else {
                for item in &items {
                    writeln!(out, "{}", summary_line(state, item))?;
                }
            }
            Ok(())
        }
        Command::List { list } => {
            let entries = state.store.get_sorted(list);
            if json {
                writeln!(out, "{}", serde_json::to_string_pretty(&entries)?)?;
                return Ok(());
            }
            if entries.is_empty() {
                writeln!(out, "Your {} is empty.", list)?;
            }
            for entry in &entries {
                writeln!(out, "{}", entry_line(entry))?;
            }
            Ok(())
        }
        Command::Add { list, imdb_id } => {
            let imdb_id = imdb_id_arg(&imdb_id)?;
            if state.store.contains(list, &imdb_id) {
                return report(out, json, list, &imdb_id, "unchanged", true);
            }
            let detail = fetch_for_list(state, &imdb_id).await?;
            let added = state.store.add(list, &detail);
            let outcome = if added { "added" } else { "failed" };
            report(out, json, list, &detail.imdb_id, outcome, added)
        }
        Command::Remove { list, imdb_id } => {
            let imdb_id = imdb_id_arg(&imdb_id)?;
            let ok = state.store.remove(list, &imdb_id);
            report(out, json, list, &imdb_id, if ok { "removed" } else { "failed" }, ok)
        }
        Command::Toggle { list, imdb_id } => {
            let imdb_id = imdb_id_arg(&imdb_id)?;
            let was_member = state.store.contains(list, &imdb_id);
            let member = if was_member {
                !state.store.remove(list, &imdb_id)
            } else {
                let detail = fetch_for_list(state, &imdb_id).await?;
                state.store.toggle(list, &detail)
            };
            // An unchanged membership means the write did not go through.
            let ok = member != was_member;
            let outcome = match (ok, member) {
                (false, _) => "failed",
                (true, true) => "added",
                (true, false) => "removed",
            };
            report(out, json, list, &imdb_id, outcome, ok)
        }
        Command::Clear { target } => {
            match target {
                ClearTarget::One(list) => state.store.clear(list),
                ClearTarget::All => state.store.clear_all(),
            }
            let stats = state.store.stats();
            if json {
                writeln!(out, "{}", serde_json::to_string_pretty(&stats)?)?;
            } else {
                match target {
                    ClearTarget::One(list) => writeln!(out, "Cleared {}.", list)?,
                    ClearTarget::All => writeln!(out, "Cleared watchlist and favorites.")?,
                }
            }
            Ok(())
        }
        Command::Stats => {
            let stats = state.store.stats();
            if json {
                writeln!(out, "{}", serde_json::to_string_pretty(&stats)?)?;
            } else {
                writeln!(out, "watchlist: {}", stats.watchlist_count)?;
                writeln!(out, "favorites: {}", stats.favorites_count)?;
            }
            Ok(())
        }
    }
}

fn imdb_id_arg(input: &str) -> Result<String> {
    parse_imdb_id(input).ok_or_else(|| {
        anyhow!(
            "'{}' is not an IMDb id (expected tt followed by digits)",
            input.trim()
        )
    })
}

async fn fetch_for_list(state: &AppState, imdb_id: &str) -> Result<MovieDetail> {
    state
        .catalog()?
        .details(imdb_id)
        .await
        .map_err(|e| anyhow!(e.user_message(DETAILS_FAILED_MESSAGE)))
}

fn report(
    out: &mut dyn Write,
    json: bool,
    list: ListKind,
    imdb_id: &str,
    outcome: &str,
    ok: bool,
) -> Result<()> {
    if json {
        let body = json!({ "list": list, "imdbID": imdb_id, "outcome": outcome, "ok": ok });
        writeln!(out, "{}", serde_json::to_string_pretty(&body)?)?;
        return Ok(());
    }
    match outcome {
        "added" => writeln!(out, "Added {} to {}.", imdb_id, list)?,
        "removed" => writeln!(out, "Removed {} from {}.", imdb_id, list)?,
        "unchanged" => writeln!(out, "{} is already on your {}.", imdb_id, list)?,
        _ => writeln!(out, "Could not update your {}.", list)?,
    }
    if !ok {
        bail!("failed to save {}", list);
    }
    Ok(())
}

fn render_search(
    state: &AppState,
    session: &SearchSession,
    out: &mut dyn Write,
    json: bool,
) -> Result<()> {
    let visible = session.visible();
    if json {
        let body = json!({
            "query": session.query(),
            "page": session.page(),
            "totalResults": session.total_count(),
            "totalPages": session.total_pages(),
            "filters": session.filters(),
            "error": session.error(),
            "results": visible,
        });
        writeln!(out, "{}", serde_json::to_string_pretty(&body)?)?;
        return Ok(());
    }

    if let Some(message) = session.error() {
        writeln!(out, "{}", message)?;
        return Ok(());
    }
    if visible.is_empty() {
        writeln!(out, "No results match the current filters.")?;
    }
    for item in &visible {
        writeln!(out, "{}", summary_line(state, item))?;
    }
    if session.total_count() > 0 {
        let window: Vec<String> = session
            .page_window()
            .iter()
            .map(|p| {
                if *p == session.page() {
                    format!("[{}]", p)
                } else {
                    p.to_string()
                }
            })
            .collect();
        writeln!(out)?;
        writeln!(
            out,
            "Page {} of {} • {} total results   {}",
            session.page(),
            session.total_pages(),
            session.total_count(),
            window.join(" ")
        )?;
    }
    Ok(())
}

fn render_detail(
    state: &AppState,
    detail: &MovieDetail,
    out: &mut dyn Write,
    json: bool,
) -> Result<()> {
    let badges = badges(state, &detail.imdb_id);
    if json {
        let body = json!({
            "movie": detail,
            "inWatchlist": state.store.contains(ListKind::Watchlist, &detail.imdb_id),
            "inFavorites": state.store.contains(ListKind::Favorites, &detail.imdb_id),
            "trailerSearchUrl": links::trailer_search_url(&detail.title, &detail.year),
            "imdbUrl": links::imdb_url(&detail.imdb_id),
        });
        writeln!(out, "{}", serde_json::to_string_pretty(&body)?)?;
        return Ok(());
    }

    writeln!(out, "{} ({}) {}", detail.title, detail.year, badges)?;
    writeln!(
        out,
        "{} • {} • {}",
        links::format_rating(detail.rated.as_deref()),
        links::format_runtime(detail.runtime.as_deref()),
        detail.kind
    )?;
    if let Some(rating) = &detail.imdb_rating {
        writeln!(out, "IMDb rating: {}/10", rating)?;
    }
    for rating in &detail.ratings {
        writeln!(out, "  {}: {}", rating.source, rating.value)?;
    }
    if !detail.genres.is_empty() {
        writeln!(out, "Genre: {}", detail.genres.join(", "))?;
    }
    if let Some(plot) = &detail.plot {
        writeln!(out)?;
        writeln!(out, "{}", plot)?;
        writeln!(out)?;
    }
    let fields = [
        ("Director", &detail.director),
        ("Writer", &detail.writer),
        ("Actors", &detail.actors),
        ("Country", &detail.country),
        ("Language", &detail.language),
        ("Released", &detail.released),
        ("Box Office", &detail.box_office),
        ("Awards", &detail.awards),
    ];
    for (label, value) in fields {
        if let Some(value) = value {
            writeln!(out, "{}: {}", label, value)?;
        }
    }
    writeln!(
        out,
        "Poster: {}",
        links::poster_url(detail.poster.as_deref(), &detail.title)
    )?;
    writeln!(
        out,
        "Trailer: {}",
        links::trailer_search_url(&detail.title, &detail.year)
    )?;
    writeln!(out, "IMDb: {}", links::imdb_url(&detail.imdb_id))?;
    Ok(())
}

fn badges(state: &AppState, imdb_id: &str) -> String {
    let mut out = String::new();
    if state.store.contains(ListKind::Watchlist, imdb_id) {
        out.push_str("[W]");
    }
    if state.store.contains(ListKind::Favorites, imdb_id) {
        out.push_str("[F]");
    }
    out
}

fn summary_line(state: &AppState, item: &MovieSummary) -> String {
    format!(
        "{:<6} {:<11} {} ({}) [{}]",
        badges(state, &item.imdb_id),
        item.imdb_id,
        item.title,
        item.year,
        item.kind
    )
}

fn entry_line(entry: &ListEntry) -> String {
    format!(
        "{:<11} {} ({}) [{}] added {}",
        entry.imdb_id,
        entry.title,
        entry.year,
        entry.kind,
        entry.added_at.format("%Y-%m-%d %H:%M")
    )
}
