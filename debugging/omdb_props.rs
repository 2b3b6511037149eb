//! Fetch a raw OMDb response and print it, followed by the fields OMDb
//! reported as "N/A".
//! Usage:
//!   cargo run --bin omdb_props -- search <query> [page]
//!   cargo run --bin omdb_props -- id <imdb_id>
//!   cargo run --bin omdb_props -- title <title> [year]
//! Requires OMDB_API_KEY in the environment (.env supported).

use anyhow::{Context, Result};
use dotenvy::dotenv;
use reqwest::Client;
use serde_json::Value;
use std::env;
use std::str::FromStr;

const OMDB_BASE: &str = "https://www.omdbapi.com";

#[derive(Debug, Clone, Copy, PartialEq)]
enum LookupKind {
    Search,
    Id,
    Title,
}

impl FromStr for LookupKind {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "search" => Ok(LookupKind::Search),
            "id" => Ok(LookupKind::Id),
            "title" => Ok(LookupKind::Title),
            _ => Err(anyhow::anyhow!("lookup must be 'search', 'id' or 'title'")),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    let api_key = env::var("OMDB_API_KEY").context("Missing OMDB_API_KEY in environment")?;
    let base = env::var("OMDB_BASE_URL").unwrap_or_else(|_| OMDB_BASE.to_string());

    let mut args = env::args().skip(1);
    let kind: LookupKind = args
        .next()
        .context("usage: omdb_props <search|id|title> <value> [extra]")?
        .parse()?;
    let value = args.next().context("missing lookup value")?;
    let extra = args.next();

    let query = match kind {
        LookupKind::Search => format!(
            "s={}&page={}",
            urlencoding::encode(&value),
            extra.as_deref().unwrap_or("1")
        ),
        LookupKind::Id => format!("i={}&plot=full", urlencoding::encode(&value)),
        LookupKind::Title => match extra.as_deref() {
            Some(year) => format!(
                "t={}&y={}&plot=full",
                urlencoding::encode(&value),
                urlencoding::encode(year)
            ),
            None => format!("t={}&plot=full", urlencoding::encode(&value)),
        },
    };

    let client = Client::new();
    let url = format!(
        "{}/?apikey={}&{}",
        base.trim_end_matches('/'),
        urlencoding::encode(&api_key),
        query
    );
    let body: Value = get_json(&client, &url).await?;
    println!("{}", serde_json::to_string_pretty(&body)?);

    let mut missing = Vec::new();
    collect_not_available("", &body, &mut missing);
    if !missing.is_empty() {
        println!();
        println!("N/A fields:");
        for path in missing {
            println!("  {}", path);
        }
    }
    Ok(())
}

fn collect_not_available(prefix: &str, value: &Value, out: &mut Vec<String>) {
    match value {
        Value::String(s) if s == "N/A" => out.push(prefix.to_string()),
        Value::Object(map) => {
            for (k, v) in map {
                let path = if prefix.is_empty() {
                    k.clone()
                } else {
                    format!("{prefix}.{k}")
                };
                collect_not_available(&path, v, out);
            }
        }
        Value::Array(items) => {
            for (i, v) in items.iter().enumerate() {
                collect_not_available(&format!("{prefix}[{i}]"), v, out);
            }
        }
        _ => {}
    }
}

async fn get_json(client: &Client, url: &str) -> Result<Value> {
    let res = client.get(url).send().await.context("request failed")?;
    let status = res.status();
    let text = res.text().await.context("reading body failed")?;
    if !status.is_success() {
        return Err(anyhow::anyhow!("OMDb returned {} -> {}", status, text));
    }
    let parsed: Value = serde_json::from_str(&text).context("JSON parse failed")?;
    Ok(parsed)
}
