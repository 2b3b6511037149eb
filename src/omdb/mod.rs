//! OMDb catalog access: search, detail and title lookups.

use async_trait::async_trait;
use thiserror::Error;

mod client;
mod types;

pub use client::{OmdbClient, DEFAULT_BASE_URL};
pub use types::{
    normalize, total_pages, MediaType, MovieDetail, MovieSummary, Rating, SearchPage,
    NOT_AVAILABLE, RESULTS_PER_PAGE,
};
pub(crate) use types::na;

#[derive(Debug, Error)]
pub enum CatalogError {
    /// OMDb answered `Response: "False"`; carries the provider's message.
    #[error("{0}")]
    NotFound(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: {status} - {body}")]
    Status { status: u16, body: String },

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Client not configured: {0}")]
    NotConfigured(String),
}

impl CatalogError {
    /// "No results" style failures, as opposed to transport trouble.
    pub fn is_business(&self) -> bool {
        matches!(self, CatalogError::NotFound(_))
    }

    /// Message shown to the user: the provider text for business failures,
    /// `fallback` for everything else.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            CatalogError::NotFound(msg) => msg.clone(),
            CatalogError::InvalidRequest(msg) => msg.clone(),
            _ => fallback.to_string(),
        }
    }
}

#[async_trait]
pub trait CatalogApi: Send + Sync {
    async fn search(&self, query: &str, page: u32) -> Result<SearchPage, CatalogError>;
    async fn details(&self, imdb_id: &str) -> Result<MovieDetail, CatalogError>;
    async fn lookup_title(
        &self,
        title: &str,
        year: Option<&str>,
    ) -> Result<MovieDetail, CatalogError>;
}

pub fn parse_imdb_id(input: &str) -> Option<String> {
    let lower = input.trim().to_lowercase();
    if lower.starts_with("tt") && lower.len() > 2 && lower[2..].chars().all(|c| c.is_ascii_digit())
    {
        return Some(lower);
    }
    None
}

pub(crate) fn validate_query(query: &str) -> Result<&str, CatalogError> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return Err(CatalogError::InvalidRequest(
            "search query must not be empty".to_string(),
        ));
    }
    Ok(trimmed)
}

pub(crate) fn validate_page(page: u32) -> Result<u32, CatalogError> {
    if page == 0 {
        return Err(CatalogError::InvalidRequest(
            "page numbers start at 1".to_string(),
        ));
    }
    Ok(page)
}

pub(crate) fn validate_id(imdb_id: &str) -> Result<&str, CatalogError> {
    let trimmed = imdb_id.trim();
    if trimmed.is_empty() {
        return Err(CatalogError::InvalidRequest(
            "identifier must not be empty".to_string(),
        ));
    }
    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn business_failures_keep_provider_message() {
        let err = CatalogError::NotFound("Movie not found!".to_string());
        assert!(err.is_business());
        assert_eq!(err.user_message("Failed"), "Movie not found!");

        let err = CatalogError::Parse("eof".to_string());
        assert!(!err.is_business());
        assert_eq!(err.user_message("Failed"), "Failed");
    }

    #[test]
    fn parses_imdb_ids() {
        assert_eq!(parse_imdb_id(" TT0372784 "), Some("tt0372784".to_string()));
        assert_eq!(parse_imdb_id("tt"), None);
        assert_eq!(parse_imdb_id("Batman"), None);
    }

    #[test]
    fn rejects_blank_inputs() {
        assert!(validate_query("   ").is_err());
        assert_eq!(validate_query(" Batman ").unwrap(), "Batman");
        assert!(validate_page(0).is_err());
        assert!(validate_id("").is_err());
    }
}
