use serde::{Deserialize, Serialize};

/// Sentinel OMDb uses for every field it has no value for.
pub const NOT_AVAILABLE: &str = "N/A";

/// Maximum number of items OMDb returns for one search page.
pub const RESULTS_PER_PAGE: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Movie,
    Series,
    Episode,
    Game,
    #[serde(other)]
    Other,
}

impl MediaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Movie => "movie",
            MediaType::Series => "series",
            MediaType::Episode => "episode",
            MediaType::Game => "game",
            MediaType::Other => "other",
        }
    }
}

impl std::fmt::Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of an OMDb search response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieSummary {
    #[serde(rename = "imdbID")]
    pub imdb_id: String,
    #[serde(rename = "Title")]
    pub title: String,
    /// Free-form; series use ranges such as "2019–2021".
    #[serde(rename = "Year")]
    pub year: String,
    #[serde(rename = "Poster", default, with = "na")]
    pub poster: Option<String>,
    #[serde(rename = "Type")]
    pub kind: MediaType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    #[serde(rename = "Source")]
    pub source: String,
    #[serde(rename = "Value")]
    pub value: String,
}

/// Full record returned by `?i=` and `?t=` lookups. Optional fields are
/// `None` wherever OMDb sent "N/A".
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovieDetail {
    pub imdb_id: String,
    pub title: String,
    pub year: String,
    pub kind: MediaType,
    pub poster: Option<String>,
    pub rated: Option<String>,
    pub released: Option<String>,
    pub runtime: Option<String>,
    pub genres: Vec<String>,
    pub director: Option<String>,
    pub writer: Option<String>,
    pub actors: Option<String>,
    pub plot: Option<String>,
    pub language: Option<String>,
    pub country: Option<String>,
    pub awards: Option<String>,
    pub ratings: Vec<Rating>,
    pub metascore: Option<String>,
    pub imdb_rating: Option<String>,
    pub imdb_votes: Option<String>,
    pub dvd: Option<String>,
    pub box_office: Option<String>,
    pub production: Option<String>,
    pub website: Option<String>,
    pub total_seasons: Option<String>,
}

impl MovieDetail {
    pub fn summary(&self) -> MovieSummary {
        MovieSummary {
            imdb_id: self.imdb_id.clone(),
            title: self.title.clone(),
            year: self.year.clone(),
            poster: self.poster.clone(),
            kind: self.kind,
        }
    }
}

/// One page of search results.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchPage {
    pub items: Vec<MovieSummary>,
    pub total_count: u32,
}

impl SearchPage {
    pub fn total_pages(&self) -> u32 {
        total_pages(self.total_count)
    }
}

pub fn total_pages(total_count: u32) -> u32 {
    total_count.div_ceil(RESULTS_PER_PAGE)
}

/// Every OMDb reply carries `Response: "True" | "False"`.
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope {
    #[serde(rename = "Response")]
    pub response: String,
    #[serde(rename = "Error", default)]
    pub error: Option<String>,
}

impl Envelope {
    pub fn is_success(&self) -> bool {
        self.response.eq_ignore_ascii_case("true")
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchResponse {
    #[serde(rename = "Search", default)]
    pub search: Vec<MovieSummary>,
    #[serde(rename = "totalResults", default)]
    pub total_results: Option<String>,
}

impl From<SearchResponse> for SearchPage {
    fn from(r: SearchResponse) -> Self {
        let total_count = r
            .total_results
            .as_deref()
            .and_then(|t| t.trim().parse::<u32>().ok())
            .unwrap_or(0);
        SearchPage {
            items: r.search,
            total_count,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct DetailResponse {
    #[serde(rename = "imdbID")]
    imdb_id: String,
    title: String,
    #[serde(default)]
    year: Option<String>,
    #[serde(rename = "Type")]
    kind: MediaType,
    poster: Option<String>,
    rated: Option<String>,
    released: Option<String>,
    runtime: Option<String>,
    genre: Option<String>,
    director: Option<String>,
    writer: Option<String>,
    actors: Option<String>,
    plot: Option<String>,
    language: Option<String>,
    country: Option<String>,
    awards: Option<String>,
    #[serde(default)]
    ratings: Vec<Rating>,
    metascore: Option<String>,
    #[serde(rename = "imdbRating")]
    imdb_rating: Option<String>,
    #[serde(rename = "imdbVotes")]
    imdb_votes: Option<String>,
    #[serde(rename = "DVD")]
    dvd: Option<String>,
    box_office: Option<String>,
    production: Option<String>,
    website: Option<String>,
    #[serde(rename = "totalSeasons")]
    total_seasons: Option<String>,
}

impl From<DetailResponse> for MovieDetail {
    fn from(d: DetailResponse) -> Self {
        MovieDetail {
            imdb_id: d.imdb_id,
            title: d.title,
            year: d.year.unwrap_or_default(),
            kind: d.kind,
            poster: present(d.poster),
            rated: present(d.rated),
            released: present(d.released),
            runtime: present(d.runtime),
            genres: split_list(present(d.genre)),
            director: present(d.director),
            writer: present(d.writer),
            actors: present(d.actors),
            plot: present(d.plot),
            language: present(d.language),
            country: present(d.country),
            awards: present(d.awards),
            ratings: d.ratings,
            metascore: present(d.metascore),
            imdb_rating: present(d.imdb_rating),
            imdb_votes: present(d.imdb_votes),
            dvd: present(d.dvd),
            box_office: present(d.box_office),
            production: present(d.production),
            website: present(d.website),
            total_seasons: present(d.total_seasons),
        }
    }
}

/// Maps the "N/A" sentinel (and blanks) to `None`.
pub fn normalize(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed == NOT_AVAILABLE {
        None
    } else {
        Some(value)
    }
}

fn present(value: Option<String>) -> Option<String> {
    value.and_then(normalize)
}

fn split_list(value: Option<String>) -> Vec<String> {
    value
        .map(|v| {
            v.split(',')
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .map(|s| s.to_string())
                .collect()
        })
        .unwrap_or_default()
}

/// Serde adapter for the poster field of summaries and persisted entries.
pub(crate) mod na {
    use super::{normalize, NOT_AVAILABLE};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        Ok(raw.and_then(normalize))
    }

    /// Writes `None` back as "N/A" so stored records keep the provider layout.
    pub fn serialize<S>(value: &Option<String>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(value.as_deref().unwrap_or(NOT_AVAILABLE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn detail_normalizes_not_available_fields() {
        let raw = json!({
            "Title": "Batman Begins",
            "Year": "2005",
            "Rated": "PG-13",
            "Runtime": "N/A",
            "Genre": "Action, Crime, Drama",
            "Awards": "N/A",
            "Poster": "N/A",
            "Ratings": [{ "Source": "Internet Movie Database", "Value": "8.2/10" }],
            "imdbRating": "8.2",
            "DVD": "N/A",
            "imdbID": "tt0372784",
            "Type": "movie",
            "Response": "True"
        });
        let wire: DetailResponse = serde_json::from_value(raw).unwrap();
        let detail = MovieDetail::from(wire);
        assert_eq!(detail.rated.as_deref(), Some("PG-13"));
        assert_eq!(detail.runtime, None);
        assert_eq!(detail.awards, None);
        assert_eq!(detail.poster, None);
        assert_eq!(detail.dvd, None);
        assert_eq!(detail.imdb_rating.as_deref(), Some("8.2"));
        assert_eq!(detail.genres, vec!["Action", "Crime", "Drama"]);
        assert_eq!(detail.ratings.len(), 1);
        assert_eq!(detail.plot, None);
    }

    #[test]
    fn summary_poster_round_trips_sentinel() {
        let raw = json!({
            "Title": "Batman",
            "Year": "1989",
            "imdbID": "tt0096895",
            "Type": "movie",
            "Poster": "N/A"
        });
        let summary: MovieSummary = serde_json::from_value(raw).unwrap();
        assert_eq!(summary.poster, None);
        let back = serde_json::to_value(&summary).unwrap();
        assert_eq!(back["Poster"], "N/A");
    }

    #[test]
    fn unknown_media_type_is_tolerated() {
        let raw = json!({
            "Title": "Odd",
            "Year": "2001",
            "imdbID": "tt1",
            "Type": "short"
        });
        let summary: MovieSummary = serde_json::from_value(raw).unwrap();
        assert_eq!(summary.kind, MediaType::Other);
    }

    #[test]
    fn total_results_parse_and_pages() {
        let page: SearchPage = SearchResponse {
            search: Vec::new(),
            total_results: Some("571".to_string()),
        }
        .into();
        assert_eq!(page.total_count, 571);
        assert_eq!(page.total_pages(), 58);

        let garbage: SearchPage = SearchResponse {
            search: Vec::new(),
            total_results: Some("lots".to_string()),
        }
        .into();
        assert_eq!(garbage.total_count, 0);
        assert_eq!(garbage.total_pages(), 0);
        assert_eq!(total_pages(10), 1);
        assert_eq!(total_pages(11), 2);
    }
}
