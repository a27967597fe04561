/// External data providers
///
/// This module provides a pluggable architecture for the two upstream sources the
/// digest is built from: a streaming catalog listing regional releases, and a ratings
/// service supplying rating, plot and genre. Each provider hides its API's response
/// shape behind the normalized models.
use crate::{
    error::AppResult,
    models::{CatalogRecord, Enrichment},
};

pub mod omdb;
pub mod streaming_availability;

pub use omdb::OmdbProvider;
pub use streaming_availability::StreamingAvailabilityProvider;

/// Trait for streaming catalog providers
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Fetch one page (1-based) of recent regional releases
    ///
    /// Records come back normalized; those with an unparseable release date keep
    /// `release_date: None` and are left for the caller to discard.
    async fn fetch_page(&self, page: u32) -> AppResult<Vec<CatalogRecord>>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}

/// Trait for rating/plot metadata providers
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait RatingsProvider: Send + Sync {
    /// Look up a title, optionally narrowed by release year
    ///
    /// Returns `Ok(None)` when the provider explicitly reports no match.
    async fn lookup(&self, title: &str, year: Option<i32>) -> AppResult<Option<Enrichment>>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
