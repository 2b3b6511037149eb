use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use super::types::{DetailResponse, Envelope, SearchResponse};
use super::{
    validate_id, validate_page, validate_query, CatalogApi, CatalogError, MovieDetail, SearchPage,
};
use crate::config::Config;

pub const DEFAULT_BASE_URL: &str = "https://www.omdbapi.com";

#[derive(Debug, Clone)]
pub struct OmdbClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl OmdbClient {
    pub fn new(api_key: &str, base_url: &str) -> Result<Self, CatalogError> {
        if api_key.trim().is_empty() {
            return Err(CatalogError::NotConfigured(
                "OMDb API key is empty".to_string(),
            ));
        }
        let user_agent = format!("cinelist/{}", env!("CARGO_PKG_VERSION"));
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(30))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.trim().to_string(),
        })
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let api_key = config.api_key()?;
        Self::new(api_key, &config.omdb_base_url).context("Failed to build OMDb HTTP client")
    }

    /// Issues one GET and unwraps the `Response` envelope. Exactly one
    /// request per call; nothing is retried.
    async fn get_json<T: DeserializeOwned>(&self, query: &str) -> Result<T, CatalogError> {
        let url = format!(
            "{}/?apikey={}&{}",
            self.base_url,
            urlencoding::encode(&self.api_key),
            query
        );
        debug!("OMDb request: {}/?{}", self.base_url, query);
        let res = self.client.get(&url).send().await?;
        let status = res.status();
        let text = res.text().await?;
        if !status.is_success() {
            return Err(CatalogError::Status {
                status: status.as_u16(),
                body: text,
            });
        }
        let value: Value = serde_json::from_str(&text)
            .map_err(|e| CatalogError::Parse(format!("invalid JSON body: {}", e)))?;
        let envelope: Envelope = serde_json::from_value(value.clone())
            .map_err(|e| CatalogError::Parse(format!("missing Response field: {}", e)))?;
        if !envelope.is_success() {
            return Err(CatalogError::NotFound(
                envelope.error.unwrap_or_else(|| "No movies found".to_string()),
            ));
        }
        serde_json::from_value(value).map_err(|e| CatalogError::Parse(e.to_string()))
    }
}

#[async_trait]
impl CatalogApi for OmdbClient {
    async fn search(&self, query: &str, page: u32) -> Result<SearchPage, CatalogError> {
        let query = validate_query(query)?;
        let page = validate_page(page)?;
        let data: SearchResponse = self
            .get_json(&format!("s={}&page={}", urlencoding::encode(query), page))
            .await?;
        let page_data = SearchPage::from(data);
        debug!(
            query = %query,
            page,
            items = page_data.items.len(),
            total = page_data.total_count,
            "OMDb search complete"
        );
        Ok(page_data)
    }

    async fn details(&self, imdb_id: &str) -> Result<MovieDetail, CatalogError> {
        let id = validate_id(imdb_id)?;
        let data: DetailResponse = self
            .get_json(&format!("i={}&plot=full", urlencoding::encode(id)))
            .await?;
        Ok(data.into())
    }

    async fn lookup_title(
        &self,
        title: &str,
        year: Option<&str>,
    ) -> Result<MovieDetail, CatalogError> {
        let title = validate_query(title)?;
        let year_param = match year.map(str::trim).filter(|y| !y.is_empty()) {
            Some(y) => format!("&y={}", urlencoding::encode(y)),
            None => String::new(),
        };
        let data: DetailResponse = self
            .get_json(&format!(
                "t={}{}&plot=full",
                urlencoding::encode(title),
                year_param
            ))
            .await?;
        Ok(data.into())
    }
}
