use anyhow::Result;
use std::env;
use std::path::PathBuf;

use crate::omdb::DEFAULT_BASE_URL;

pub const API_KEY_VAR: &str = "OMDB_API_KEY";
pub const BASE_URL_VAR: &str = "OMDB_BASE_URL";
pub const DB_PATH_VAR: &str = "CINELIST_DB";
const DEFAULT_DB_PATH: &str = "cinelist.db";

#[derive(Debug, Clone)]
pub struct Config {
    pub omdb_api_key: Option<String>,
    pub omdb_base_url: String,
    pub db_path: PathBuf,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        Self {
            omdb_api_key: non_empty(API_KEY_VAR),
            omdb_base_url: non_empty(BASE_URL_VAR).unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            db_path: non_empty(DB_PATH_VAR)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_PATH)),
        }
    }

    pub fn api_key(&self) -> Result<&str> {
        self.omdb_api_key
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("Missing required environment variable: {}", API_KEY_VAR))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_apply_when_unset_or_blank() {
        let vars = HashMap::from([(BASE_URL_VAR, "  ")]);
        let config = Config::from_lookup(|k| vars.get(k).map(|v| v.to_string()));
        assert!(config.omdb_api_key.is_none());
        assert_eq!(config.omdb_base_url, DEFAULT_BASE_URL);
        assert_eq!(config.db_path, PathBuf::from("cinelist.db"));
        assert!(config.api_key().is_err());
    }

    #[test]
    fn reads_overrides() {
        let vars = HashMap::from([
            (API_KEY_VAR, "abc123"),
            (BASE_URL_VAR, "http://127.0.0.1:8080"),
            (DB_PATH_VAR, "/tmp/lists.db"),
        ]);
        let config = Config::from_lookup(|k| vars.get(k).map(|v| v.to_string()));
        assert_eq!(config.api_key().unwrap(), "abc123");
        assert_eq!(config.omdb_base_url, "http://127.0.0.1:8080");
        assert_eq!(config.db_path, PathBuf::from("/tmp/lists.db"));
    }
}
