/// Streaming Availability API provider (via RapidAPI)
///
/// Lists recent releases for a region through `/v2/search/basic`, ordered by date.
/// Items mix movie and series shapes, so every field is read through [`FIELDS`].
use crate::{
    error::{AppError, AppResult},
    models::{parse_release_date, ApiSearchPage, CatalogRecord, FieldMap},
    services::providers::CatalogProvider,
};
use chrono::Datelike;
use reqwest::{Client as HttpClient, Url};
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use std::time::Duration;

const DEFAULT_API_HOST: &str = "streaming-availability.p.rapidapi.com";
const UNKNOWN_TITLE: &str = "Unknown";

/// Field-name fallback chains for Streaming Availability items
pub const FIELDS: FieldMap = FieldMap {
    title: &["title", "name", "originalTitle"],
    release_date: &["releaseDate", "firstAirDate", "release_date", "originalRelease"],
    year: &["year", "releaseYear", "firstAirYear"],
    streaming_info: &["streamingInfo", "streamingOptions"],
};

#[derive(Clone)]
pub struct StreamingAvailabilityProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    api_host: String,
    country: String,
    services: Vec<String>,
    timeout: Duration,
}

impl StreamingAvailabilityProvider {
    pub fn new(
        api_key: String,
        api_url: String,
        country: String,
        services: Vec<String>,
        timeout: Duration,
    ) -> Self {
        let api_host = Url::parse(&api_url)
            .ok()
            .and_then(|url| url.host_str().map(str::to_string))
            .unwrap_or_else(|| DEFAULT_API_HOST.to_string());

        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
            api_host,
            country: country.to_lowercase(),
            services,
            timeout,
        }
    }

    /// Normalizes one raw catalog item
    fn convert_item(&self, item: &Map<String, Value>) -> CatalogRecord {
        let title = FieldMap::first_str(item, FIELDS.title)
            .unwrap_or(UNKNOWN_TITLE)
            .to_string();

        let release_date = FieldMap::first_str(item, FIELDS.release_date)
            .and_then(parse_release_date);

        // Fall back to the release date's year when no explicit year is given
        let year = FieldMap::first_i32(item, FIELDS.year)
            .or_else(|| release_date.map(|d| d.year()));

        CatalogRecord {
            title,
            year,
            release_date,
            platforms: self.collect_platforms(item),
        }
    }

    /// Collects service ids from the streaming info block
    ///
    /// Prefers the configured country; when that key is absent every country is
    /// scanned. Countries map either to an object keyed by service id or to an array
    /// of options carrying `service.id`.
    fn collect_platforms(&self, item: &Map<String, Value>) -> BTreeSet<String> {
        let mut platforms = BTreeSet::new();

        let Some(info) = FieldMap::first_object(item, FIELDS.streaming_info) else {
            return platforms;
        };

        let countries: Vec<&Value> = match info.get(&self.country) {
            Some(local) => vec![local],
            None => info.values().collect(),
        };

        for country in countries {
            match country {
                Value::Object(services) => {
                    platforms.extend(services.keys().map(|k| k.to_lowercase()));
                }
                Value::Array(options) => {
                    platforms.extend(options.iter().filter_map(service_id_of));
                }
                _ => {}
            }
        }

        platforms.retain(|p| !p.trim().is_empty());
        platforms
    }
}

fn service_id_of(option: &Value) -> Option<String> {
    match option.get("service")? {
        Value::String(id) => Some(id.to_lowercase()),
        Value::Object(service) => service
            .get("id")
            .and_then(Value::as_str)
            .map(str::to_lowercase),
        _ => None,
    }
}

#[async_trait::async_trait]
impl CatalogProvider for StreamingAvailabilityProvider {
    #[tracing::instrument(skip(self), fields(provider = "streaming_availability"))]
    async fn fetch_page(&self, page: u32) -> AppResult<Vec<CatalogRecord>> {
        let url = format!("{}/v2/search/basic", self.api_url);
        let services = self.services.join(",");
        let page_param = page.to_string();

        let response = self
            .http_client
            .get(&url)
            .header("x-rapidapi-key", &self.api_key)
            .header("x-rapidapi-host", &self.api_host)
            .query(&[
                ("country", self.country.as_str()),
                ("services", services.as_str()),
                ("type", "all"),
                ("order_by", "date"),
                ("page", page_param.as_str()),
                ("output_language", "en"),
            ])
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| AppError::HttpClient(e.without_url()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "API returned status {}: {}",
                status, body
            )));
        }

        let search_page: ApiSearchPage = response
            .json()
            .await
            .map_err(|e| AppError::HttpClient(e.without_url()))?;

        let records: Vec<CatalogRecord> = search_page
            .result
            .iter()
            .filter_map(|item| match item.as_object() {
                Some(object) => Some(self.convert_item(object)),
                None => {
                    tracing::debug!(item = %item, "Skipping non-object catalog item");
                    None
                }
            })
            .collect();

        tracing::info!(
            page = page,
            results = records.len(),
            has_more = ?search_page.has_more,
            "Catalog page fetched"
        );

        Ok(records)
    }

    fn name(&self) -> &'static str {
        "streaming_availability"
    }
}
