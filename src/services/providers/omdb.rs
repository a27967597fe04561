/// OMDb API provider
///
/// Resolves rating, plot and genre with a single `?t=` title lookup per release.
use crate::{
    error::{AppError, AppResult},
    models::{Enrichment, OmdbResponse},
    services::providers::RatingsProvider,
};
use reqwest::Client as HttpClient;
use std::time::Duration;

#[derive(Clone)]
pub struct OmdbProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    timeout: Duration,
}

impl OmdbProvider {
    pub fn new(api_key: String, api_url: String, timeout: Duration) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
            timeout,
        }
    }
}

#[async_trait::async_trait]
impl RatingsProvider for OmdbProvider {
    async fn lookup(&self, title: &str, year: Option<i32>) -> AppResult<Option<Enrichment>> {
        let url = format!("{}/", self.api_url);

        let mut query = vec![
            ("apikey", self.api_key.clone()),
            ("t", title.to_string()),
            ("plot", "short".to_string()),
        ];
        if let Some(year) = year {
            query.push(("y", year.to_string()));
        }

        // Request errors carry the URL, which embeds the API key
        let response = self
            .http_client
            .get(&url)
            .query(&query)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| AppError::HttpClient(e.without_url()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "OMDb API returned status {}: {}",
                status, body
            )));
        }

        let omdb: OmdbResponse = response
            .json()
            .await
            .map_err(|e| AppError::HttpClient(e.without_url()))?;

        if !omdb.found() {
            tracing::debug!(
                title = %title,
                year = ?year,
                reason = omdb.error.as_deref().unwrap_or("unknown"),
                provider = "omdb",
                "Title not found"
            );
            return Ok(None);
        }

        let enrichment = omdb.into_enrichment();

        tracing::debug!(
            title = %title,
            rating = ?enrichment.rating,
            provider = "omdb",
            "Title enriched"
        );

        Ok(Some(enrichment))
    }

    fn name(&self) -> &'static str {
        "omdb"
    }
}
