//! Client-side narrowing and ordering of a search result page.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::str::FromStr;

use icu_collator::options::CollatorOptions;
use icu_collator::CollatorBorrowed;
use serde::Serialize;
use tracing::warn;

use crate::omdb::{MovieSummary, NOT_AVAILABLE};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    /// Provider order.
    #[default]
    Relevance,
    /// Newest first.
    Year,
    /// A to Z.
    Title,
}

impl FromStr for SortBy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "relevance" => Ok(SortBy::Relevance),
            "year" => Ok(SortBy::Year),
            "title" => Ok(SortBy::Title),
            other => Err(format!(
                "unknown sort '{}', expected relevance, year or title",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterState {
    pub year: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub sort_by: SortBy,
}

impl FilterState {
    /// Blank strings count as "not set".
    pub fn new(year: Option<&str>, kind: Option<&str>, sort_by: SortBy) -> Self {
        Self {
            year: non_blank(year),
            kind: non_blank(kind),
            sort_by,
        }
    }

    pub fn is_active(&self) -> bool {
        self.year.is_some() || self.kind.is_some() || self.sort_by != SortBy::Relevance
    }

    pub fn set_year(&mut self, year: Option<&str>) {
        self.year = non_blank(year);
    }

    pub fn set_kind(&mut self, kind: Option<&str>) {
        self.kind = non_blank(kind);
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(|v| v.to_string())
}

/// Always computed from the unfiltered results, so clearing a filter
/// restores exactly what the provider returned.
pub fn apply_filters(all_results: &[MovieSummary], filters: &FilterState) -> Vec<MovieSummary> {
    let mut out: Vec<MovieSummary> = all_results
        .iter()
        .filter(|m| filters.year.as_deref().map_or(true, |y| m.year == y))
        .filter(|m| {
            filters
                .kind
                .as_deref()
                .map_or(true, |k| m.kind.as_str().eq_ignore_ascii_case(k))
        })
        .cloned()
        .collect();

    // sort_by is stable, ties keep provider order.
    match filters.sort_by {
        SortBy::Relevance => {}
        SortBy::Year => out.sort_by(|a, b| year_key(&b.year).cmp(&year_key(&a.year))),
        SortBy::Title => {
            let collator = TitleCollator::new();
            out.sort_by(|a, b| collator.compare(&a.title, &b.title))
        }
    }
    out
}

/// Leading integer of a year string ("2019–2021" -> 2019). `None` sorts lowest.
pub fn year_key(year: &str) -> Option<i32> {
    let digits: String = year
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

/// Orders titles with the Unicode collation algorithm over the root
/// locale's CLDR data, so initials such as "É" or "Æ" sort with their base
/// letters instead of after "Z". Equal-collating titles fall back to the
/// raw strings so the order is total.
pub struct TitleCollator {
    collator: Option<CollatorBorrowed<'static>>,
}

impl TitleCollator {
    pub fn new() -> Self {
        match CollatorBorrowed::try_new(Default::default(), CollatorOptions::default()) {
            Ok(collator) => Self {
                collator: Some(collator),
            },
            Err(e) => {
                warn!("Collation data unavailable, sorting titles by case folding: {}", e);
                Self { collator: None }
            }
        }
    }

    pub fn compare(&self, a: &str, b: &str) -> Ordering {
        let order = match &self.collator {
            Some(collator) => collator.compare(a, b),
            None => fold_case(a).cmp(&fold_case(b)),
        };
        order.then_with(|| a.cmp(b))
    }
}

impl Default for TitleCollator {
    fn default() -> Self {
        Self::new()
    }
}

fn fold_case(s: &str) -> String {
    s.chars().flat_map(char::to_lowercase).collect()
}

pub fn compare_titles(a: &str, b: &str) -> Ordering {
    TitleCollator::new().compare(a, b)
}

/// Distinct years present in the results, newest first, "N/A" dropped.
pub fn year_options(results: &[MovieSummary]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut years: Vec<String> = results
        .iter()
        .map(|m| m.year.trim())
        .filter(|y| !y.is_empty() && *y != NOT_AVAILABLE)
        .filter(|y| seen.insert(y.to_string()))
        .map(|y| y.to_string())
        .collect();
    years.sort_by(|a, b| year_key(b).cmp(&year_key(a)));
    years
}

/// Distinct media types in first-seen order.
pub fn type_options(results: &[MovieSummary]) -> Vec<String> {
    let mut seen = HashSet::new();
    results
        .iter()
        .map(|m| m.kind.as_str())
        .filter(|k| seen.insert(*k))
        .map(|k| k.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::omdb::MediaType;

    fn movie(id: &str, title: &str, year: &str, kind: MediaType) -> MovieSummary {
        MovieSummary {
            imdb_id: id.to_string(),
            title: title.to_string(),
            year: year.to_string(),
            poster: None,
            kind,
        }
    }

    fn sample() -> Vec<MovieSummary> {
        vec![
            movie("tt1", "Zorro", "1998", MediaType::Movie),
            movie("tt2", "Alien", "1979", MediaType::Movie),
            movie("tt3", "Matrix", "1999", MediaType::Movie),
            movie("tt4", "Batman: The Animated Series", "1992–1995", MediaType::Series),
            movie("tt5", "Unknown", "N/A", MediaType::Movie),
            movie("tt6", "alien nation", "1989", MediaType::Series),
        ]
    }

    fn titles(items: &[MovieSummary]) -> Vec<&str> {
        items.iter().map(|m| m.title.as_str()).collect()
    }

    #[test]
    fn empty_filters_are_identity() {
        let results = sample();
        let out = apply_filters(&results, &FilterState::new(Some(""), Some(""), SortBy::Relevance));
        assert_eq!(out, results);
        assert!(!FilterState::default().is_active());
    }

    #[test]
    fn title_sort_is_alphabetical() {
        let results = vec![
            movie("tt1", "Zorro", "1998", MediaType::Movie),
            movie("tt2", "Alien", "1979", MediaType::Movie),
            movie("tt3", "Matrix", "1999", MediaType::Movie),
        ];
        let filters = FilterState::new(None, None, SortBy::Title);
        assert_eq!(titles(&apply_filters(&results, &filters)), vec!["Alien", "Matrix", "Zorro"]);
    }

    #[test]
    fn title_sort_ignores_case() {
        let filters = FilterState::new(None, None, SortBy::Title);
        let out = apply_filters(&sample(), &filters);
        let sorted = titles(&out);
        assert_eq!(sorted[0], "Alien");
        assert_eq!(sorted[1], "alien nation");
        for pair in out.windows(2) {
            assert_ne!(compare_titles(&pair[0].title, &pair[1].title), Ordering::Greater);
        }
    }

    #[test]
    fn title_sort_places_accented_initials_with_their_letters() {
        let results = vec![
            movie("tt1", "Zorro", "1998", MediaType::Movie),
            movie("tt2", "Élan", "2001", MediaType::Movie),
            movie("tt3", "Amélie", "2001", MediaType::Movie),
            movie("tt4", "Æon Flux", "2005", MediaType::Movie),
        ];
        let filters = FilterState::new(None, None, SortBy::Title);
        assert_eq!(
            titles(&apply_filters(&results, &filters)),
            vec!["Æon Flux", "Amélie", "Élan", "Zorro"]
        );
        assert_ne!(compare_titles("Élan", "Elan"), Ordering::Equal);
        assert_eq!(compare_titles("Ökonom", "Zebra"), Ordering::Less);
    }

    #[test]
    fn year_sort_is_newest_first_with_invalid_last() {
        let filters = FilterState::new(None, None, SortBy::Year);
        let out = apply_filters(&sample(), &filters);
        let years: Vec<&str> = out.iter().map(|m| m.year.as_str()).collect();
        assert_eq!(years, vec!["1999", "1998", "1992–1995", "1989", "1979", "N/A"]);
    }

    #[test]
    fn year_filter_uses_exact_string() {
        let filters = FilterState::new(Some("1992"), None, SortBy::Relevance);
        assert!(apply_filters(&sample(), &filters).is_empty());
        let filters = FilterState::new(Some("1992–1995"), None, SortBy::Relevance);
        assert_eq!(titles(&apply_filters(&sample(), &filters)), vec!["Batman: The Animated Series"]);
    }

    #[test]
    fn type_filter_is_case_insensitive_and_composes() {
        let filters = FilterState::new(None, Some("SERIES"), SortBy::Title);
        assert_eq!(
            titles(&apply_filters(&sample(), &filters)),
            vec!["alien nation", "Batman: The Animated Series"]
        );
        let filters = FilterState::new(Some("1989"), Some("series"), SortBy::Relevance);
        assert_eq!(titles(&apply_filters(&sample(), &filters)), vec!["alien nation"]);
    }

    #[test]
    fn filters_never_compound() {
        let results = sample();
        let mut filters = FilterState::new(Some("1979"), None, SortBy::Relevance);
        assert_eq!(apply_filters(&results, &filters).len(), 1);
        filters.set_year(None);
        assert_eq!(apply_filters(&results, &filters), results);
    }

    #[test]
    fn option_lists() {
        assert_eq!(
            year_options(&sample()),
            vec!["1999", "1998", "1992–1995", "1989", "1979"]
        );
        assert_eq!(type_options(&sample()), vec!["movie", "series"]);
    }

    #[test]
    fn parses_sort_names() {
        assert_eq!("Year".parse::<SortBy>(), Ok(SortBy::Year));
        assert_eq!("".parse::<SortBy>(), Ok(SortBy::Relevance));
        assert!("rating".parse::<SortBy>().is_err());
        assert_eq!(year_key("2019–2021"), Some(2019));
        assert_eq!(year_key("N/A"), None);
    }
}
