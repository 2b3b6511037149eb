//! State behind one search screen: the last unfiltered page, the active
//! filters, pagination and the message shown when a search fails.

use tracing::{debug, warn};

use crate::filters::{self, FilterState, SortBy};
use crate::omdb::{total_pages, CatalogApi, CatalogError, MovieSummary, SearchPage};

pub const SEARCH_FAILED_MESSAGE: &str = "Failed to search movies. Please try again.";
const PAGE_WINDOW: u32 = 5;

/// Stamp for one in-flight search. Only the newest ticket may complete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    generation: u64,
    query: String,
    page: u32,
}

impl SearchTicket {
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn page(&self) -> u32 {
        self.page
    }
}

#[derive(Debug, Default)]
pub struct SearchSession {
    query: String,
    page: u32,
    all_results: Vec<MovieSummary>,
    total_count: u32,
    filters: FilterState,
    error: Option<String>,
    loading: bool,
    generation: u64,
}

impl SearchSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a search. Blank queries are ignored. Filters are reset and any
    /// ticket handed out earlier becomes stale.
    pub fn begin(&mut self, query: &str, page: u32) -> Option<SearchTicket> {
        let query = query.trim();
        if query.is_empty() {
            return None;
        }
        self.generation += 1;
        self.query = query.to_string();
        self.page = page.max(1);
        self.filters = FilterState::default();
        self.error = None;
        self.loading = true;
        Some(SearchTicket {
            generation: self.generation,
            query: self.query.clone(),
            page: self.page,
        })
    }

    /// Applies a search outcome. Returns false, leaving state untouched, when
    /// a newer search has started since `ticket` was issued.
    pub fn complete(
        &mut self,
        ticket: &SearchTicket,
        result: Result<SearchPage, CatalogError>,
    ) -> bool {
        if ticket.generation != self.generation {
            debug!(
                "Discarding stale results for '{}' page {}",
                ticket.query, ticket.page
            );
            return false;
        }
        self.loading = false;
        match result {
            Ok(page) => {
                self.all_results = page.items;
                self.total_count = page.total_count;
            }
            Err(e) => {
                if !e.is_business() {
                    warn!("Search for '{}' failed: {}", ticket.query, e);
                }
                self.all_results.clear();
                self.total_count = 0;
                self.error = Some(e.user_message(SEARCH_FAILED_MESSAGE));
            }
        }
        true
    }

    pub async fn search(&mut self, api: &dyn CatalogApi, query: &str, page: u32) -> bool {
        let Some(ticket) = self.begin(query, page) else {
            return false;
        };
        let result = api.search(ticket.query(), ticket.page()).await;
        self.complete(&ticket, result)
    }

    /// Re-runs the current query on another page.
    pub async fn go_to_page(&mut self, api: &dyn CatalogApi, page: u32) -> bool {
        let query = self.query.clone();
        self.search(api, &query, page).await
    }

    /// Results after filters and sort, recomputed from the unfiltered page.
    pub fn visible(&self) -> Vec<MovieSummary> {
        filters::apply_filters(&self.all_results, &self.filters)
    }

    pub fn set_year(&mut self, year: Option<&str>) {
        self.filters.set_year(year);
    }

    pub fn set_kind(&mut self, kind: Option<&str>) {
        self.filters.set_kind(kind);
    }

    pub fn set_sort(&mut self, sort_by: SortBy) {
        self.filters.sort_by = sort_by;
    }

    pub fn reset_filters(&mut self) {
        self.filters = FilterState::default();
    }

    pub fn year_options(&self) -> Vec<String> {
        filters::year_options(&self.all_results)
    }

    pub fn type_options(&self) -> Vec<String> {
        filters::type_options(&self.all_results)
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn all_results(&self) -> &[MovieSummary] {
        &self.all_results
    }

    pub fn total_count(&self) -> u32 {
        self.total_count
    }

    pub fn total_pages(&self) -> u32 {
        total_pages(self.total_count)
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages()
    }

    /// Up to five page numbers around the current page, as shown in the
    /// pagination bar.
    pub fn page_window(&self) -> Vec<u32> {
        let total = self.total_pages();
        let current = self.page.max(1);
        let count = total.min(PAGE_WINDOW);
        let first = if total <= PAGE_WINDOW || current <= 3 {
            1
        } else if current >= total - 2 {
            total - (PAGE_WINDOW - 1)
        } else {
            current - 2
        };
        (0..count).map(|i| first + i).collect()
    }
}
