use tracing::warn;

use crate::omdb::{CatalogApi, MovieSummary};

pub const FEATURED_QUERIES: [&str; 3] = ["Marvel", "Batman", "Star Wars"];
pub const FEATURED_PER_QUERY: usize = 4;

/// Home-screen mix: the first few hits of a handful of fixed searches, run
/// one after another. A failing search only drops its own slice.
pub async fn featured(api: &dyn CatalogApi) -> Vec<MovieSummary> {
    let mut out = Vec::new();
    for query in FEATURED_QUERIES {
        match api.search(query, 1).await {
            Ok(page) => out.extend(page.items.into_iter().take(FEATURED_PER_QUERY)),
            Err(e) => warn!("Featured search '{}' failed: {}", query, e),
        }
    }
    out
}
