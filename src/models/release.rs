use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A release as reported by the streaming catalog, before enrichment
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogRecord {
    pub title: String,
    pub year: Option<i32>,
    pub release_date: Option<NaiveDate>,
    /// Service ids (e.g. "netflix", "prime")
    pub platforms: BTreeSet<String>,
}

impl CatalogRecord {
    /// Identity used for deduplication within a run
    pub fn dedup_key(&self) -> (String, Option<i32>) {
        (self.title.trim().to_string(), self.year)
    }
}

/// Metadata returned by the ratings lookup
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Enrichment {
    pub rating: Option<f64>,
    pub plot: Option<String>,
    pub genre: Option<String>,
}

/// A release carried through enrichment, ranking and formatting
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReleaseItem {
    pub title: String,
    pub year: Option<i32>,
    pub release_date: Option<NaiveDate>,
    pub genre: Option<String>,
    pub platforms: BTreeSet<String>,
    pub rating: Option<f64>,
    pub plot: Option<String>,
}

impl From<CatalogRecord> for ReleaseItem {
    fn from(record: CatalogRecord) -> Self {
        ReleaseItem {
            title: record.title,
            year: record.year,
            release_date: record.release_date,
            genre: None,
            platforms: record.platforms,
            rating: None,
            plot: None,
        }
    }
}

impl ReleaseItem {
    /// Attaches enrichment data; missing fields stay unset
    pub fn with_enrichment(mut self, enrichment: Enrichment) -> Self {
        self.rating = enrichment.rating;
        self.plot = enrichment.plot;
        self.genre = enrichment.genre;
        self
    }

    /// Numeric rating used for ordering; missing ratings rank lowest
    pub fn rank_score(&self) -> f64 {
        self.rating.unwrap_or(0.0)
    }
}

/// Parses a rating string such as "7.8"
///
/// "N/A", blanks and non-finite values yield `None`.
pub fn parse_rating(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|r| r.is_finite())
}

/// Parses a date string, reading only the leading `YYYY-MM-DD` part
pub fn parse_release_date(raw: &str) -> Option<NaiveDate> {
    let head = raw.trim().get(..10)?;
    NaiveDate::parse_from_str(head, "%Y-%m-%d").ok()
}
