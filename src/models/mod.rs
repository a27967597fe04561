use serde::Deserialize;
use serde_json::{Map, Value};

pub mod release;
pub mod window;

pub use release::{parse_rating, parse_release_date, CatalogRecord, Enrichment, ReleaseItem};
pub use window::DateWindow;

// ============================================================================
// Field-name fallback chains
// ============================================================================

/// Ordered candidate keys for each field of a catalog record
///
/// Catalog responses name the same field differently across endpoints and
/// content types (movies carry `title`/`releaseDate`, series `name`/`firstAirDate`).
/// The first key holding a usable value wins.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldMap {
    pub title: &'static [&'static str],
    pub release_date: &'static [&'static str],
    pub year: &'static [&'static str],
    pub streaming_info: &'static [&'static str],
}

impl FieldMap {
    /// First non-blank string among the candidate keys
    pub fn first_str<'a>(
        item: &'a Map<String, Value>,
        keys: &[&str],
    ) -> Option<&'a str> {
        keys.iter()
            .filter_map(|key| item.get(*key).and_then(Value::as_str))
            .map(str::trim)
            .find(|s| !s.is_empty())
    }

    /// First integer among the candidate keys, accepting numeric strings
    pub fn first_i32(item: &Map<String, Value>, keys: &[&str]) -> Option<i32> {
        keys.iter().find_map(|key| match item.get(*key)? {
            Value::Number(n) => n.as_i64().and_then(|n| i32::try_from(n).ok()),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        })
    }

    /// First object among the candidate keys
    pub fn first_object<'a>(
        item: &'a Map<String, Value>,
        keys: &[&str],
    ) -> Option<&'a Map<String, Value>> {
        keys.iter()
            .find_map(|key| item.get(*key).and_then(Value::as_object))
    }
}

// ============================================================================
// Streaming Availability API Types
// ============================================================================

/// Raw page from `GET /v2/search/basic`
///
/// Items are kept as loose JSON objects; the provider resolves fields through
/// its [`FieldMap`].
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiSearchPage {
    #[serde(default)]
    pub result: Vec<Value>,
    #[serde(default)]
    pub has_more: Option<bool>,
}

// ============================================================================
// OMDb API Types
// ============================================================================

/// Response from OMDb title lookup (`?t=`)
///
/// OMDb reports lookup failures in-band with `"Response": "False"`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OmdbResponse {
    pub response: String,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(rename = "imdbRating", default)]
    pub imdb_rating: Option<String>,
    #[serde(default)]
    pub plot: Option<String>,
    #[serde(default)]
    pub genre: Option<String>,
}

impl OmdbResponse {
    pub fn found(&self) -> bool {
        self.response.eq_ignore_ascii_case("true")
    }

    /// Converts a successful lookup, mapping OMDb's "N/A" placeholders to `None`
    pub fn into_enrichment(self) -> Enrichment {
        Enrichment {
            rating: self.imdb_rating.as_deref().and_then(parse_rating),
            plot: self.plot.and_then(not_placeholder),
            genre: self.genre.and_then(not_placeholder),
        }
    }
}

fn not_placeholder(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("N/A") {
        None
    } else {
        Some(trimmed.to_string())
    }
}
