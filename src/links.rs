use once_cell::sync::Lazy;
use regex::Regex;

const YOUTUBE_SEARCH: &str = "https://www.youtube.com/results?search_query=";
const IMDB_TITLE: &str = "https://www.imdb.com/title";
const POSTER_PLACEHOLDER: &str = "https://via.placeholder.com/300x450/1f2937/ffffff?text=";

static YOUTUBE_ID: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^.*(?:youtu\.be/|v/|u/\w/|embed/|watch\?v=|&v=)([^#&?]*).*").expect("valid regex")
});

/// YouTube search for "<title> <year> trailer", words joined with '+'.
pub fn trailer_search_url(title: &str, year: &str) -> String {
    let query = format!("{} {} trailer", title, year);
    let words: Vec<String> = query
        .split_whitespace()
        .map(|w| urlencoding::encode(w).into_owned())
        .collect();
    format!("{YOUTUBE_SEARCH}{}", words.join("+"))
}

pub fn imdb_url(imdb_id: &str) -> String {
    format!("{IMDB_TITLE}/{}/", urlencoding::encode(imdb_id.trim()))
}

pub fn poster_url(poster: Option<&str>, title: &str) -> String {
    match poster {
        Some(p) if !p.trim().is_empty() => p.to_string(),
        _ => format!("{POSTER_PLACEHOLDER}{}", urlencoding::encode(title)),
    }
}

pub fn format_rating(rating: Option<&str>) -> String {
    rating.unwrap_or("Not Rated").to_string()
}

pub fn format_runtime(runtime: Option<&str>) -> String {
    runtime.unwrap_or("Unknown").to_string()
}

/// The 11-character video id from watch, embed or short links.
pub fn extract_youtube_id(url: &str) -> Option<String> {
    let caps = YOUTUBE_ID.captures(url)?;
    let id = caps.get(1)?.as_str();
    if id.len() == 11 {
        Some(id.to_string())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_trailer_search() {
        assert_eq!(
            trailer_search_url("The Dark  Knight", "2008"),
            "https://www.youtube.com/results?search_query=The+Dark+Knight+2008+trailer"
        );
        assert_eq!(
            trailer_search_url("Amélie", ""),
            "https://www.youtube.com/results?search_query=Am%C3%A9lie+trailer"
        );
    }

    #[test]
    fn builds_imdb_and_poster_urls() {
        assert_eq!(imdb_url("tt0468569"), "https://www.imdb.com/title/tt0468569/");
        assert_eq!(poster_url(Some("https://img/x.jpg"), "X"), "https://img/x.jpg");
        assert_eq!(
            poster_url(None, "Star Wars"),
            "https://via.placeholder.com/300x450/1f2937/ffffff?text=Star%20Wars"
        );
    }

    #[test]
    fn formats_missing_values() {
        assert_eq!(format_rating(None), "Not Rated");
        assert_eq!(format_rating(Some("PG-13")), "PG-13");
        assert_eq!(format_runtime(None), "Unknown");
        assert_eq!(format_runtime(Some("152 min")), "152 min");
    }

    #[test]
    fn extracts_youtube_ids() {
        assert_eq!(
            extract_youtube_id("https://www.youtube.com/watch?v=EXeTwQWrcwY").as_deref(),
            Some("EXeTwQWrcwY")
        );
        assert_eq!(
            extract_youtube_id("https://youtu.be/EXeTwQWrcwY?t=10").as_deref(),
            Some("EXeTwQWrcwY")
        );
        assert_eq!(
            extract_youtube_id("https://www.youtube.com/embed/EXeTwQWrcwY").as_deref(),
            Some("EXeTwQWrcwY")
        );
        assert_eq!(extract_youtube_id("https://example.com/watch?v=short"), None);
        assert_eq!(extract_youtube_id(""), None);
    }
}
