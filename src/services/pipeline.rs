use chrono::NaiveDate;
use tracing::Instrument;
use uuid::Uuid;

use crate::{
    config::{Config, Credentials},
    error::AppResult,
    models::DateWindow,
    services::{
        digest::{self, DigestSettings},
        enrichment,
        notifier::{Notifier, TelegramNotifier},
        providers::{CatalogProvider, OmdbProvider, RatingsProvider, StreamingAvailabilityProvider},
        ranking, releases, window,
    },
};

/// Stage limits for one run
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineSettings {
    /// Catalog pages fetched
    pub fetch_pages: u32,
    /// Releases looked up in the ratings provider
    pub enrich_limit: usize,
    pub digest: DigestSettings,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            fetch_pages: 2,
            enrich_limit: 20,
            digest: DigestSettings::default(),
        }
    }
}

impl From<&Config> for PipelineSettings {
    fn from(config: &Config) -> Self {
        Self {
            fetch_pages: config.fetch_pages,
            enrich_limit: config.enrich_limit,
            digest: DigestSettings {
                region_label: config.region_label.clone(),
                max_entries: config.digest_limit,
                plot_limit: config.plot_limit,
            },
        }
    }
}

/// Outcome of a completed run
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub window: DateWindow,
    /// Releases inside the window, before deduplication
    pub in_window: usize,
    /// Releases left after deduplication
    pub unique: usize,
    pub message: String,
    /// `false` when no notifier was configured (dry run)
    pub delivered: bool,
}

/// The weekly digest job: window → fetch → dedupe → enrich → rank → format → send
pub struct Pipeline {
    catalog: Box<dyn CatalogProvider>,
    ratings: Box<dyn RatingsProvider>,
    notifier: Option<Box<dyn Notifier>>,
    settings: PipelineSettings,
}

impl Pipeline {
    pub fn new(
        catalog: Box<dyn CatalogProvider>,
        ratings: Box<dyn RatingsProvider>,
        notifier: Option<Box<dyn Notifier>>,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            catalog,
            ratings,
            notifier,
            settings,
        }
    }

    /// Wires the production providers from configuration
    ///
    /// Telegram delivery is enabled only when `credentials` carries the Telegram pair.
    pub fn from_config(config: &Config, credentials: Credentials) -> Self {
        let catalog = StreamingAvailabilityProvider::new(
            credentials.streaming_api_key,
            config.streaming_api_url.clone(),
            config.country.clone(),
            config.services.clone(),
            config.catalog_timeout(),
        );

        let ratings = OmdbProvider::new(
            credentials.omdb_api_key,
            config.omdb_api_url.clone(),
            config.ratings_timeout(),
        );

        let notifier = credentials.telegram.map(|telegram| {
            Box::new(TelegramNotifier::new(
                telegram.bot_token,
                telegram.chat_id,
                config.telegram_api_url.clone(),
                config.notify_timeout(),
            )) as Box<dyn Notifier>
        });

        Self::new(
            Box::new(catalog),
            Box::new(ratings),
            notifier,
            PipelineSettings::from(config),
        )
    }

    /// Runs every stage once for the week containing `today`
    ///
    /// Catalog and ratings failures degrade the digest but never fail the run; a
    /// notifier failure does.
    pub async fn run(&self, today: NaiveDate) -> AppResult<RunReport> {
        let run_id = Uuid::new_v4();
        let span = tracing::info_span!("digest_run", run_id = %run_id);

        self.run_stages(today).instrument(span).await
    }

    async fn run_stages(&self, today: NaiveDate) -> AppResult<RunReport> {
        let window = window::weekly_window(today);
        tracing::info!(window = %window, "Starting weekly OTT digest");

        let in_window =
            releases::fetch_in_window(self.catalog.as_ref(), &window, self.settings.fetch_pages)
                .await;
        let in_window_count = in_window.len();

        let unique = releases::dedupe(in_window);
        let unique_count = unique.len();
        tracing::info!(unique = unique_count, "Unique releases found");

        let enriched =
            enrichment::enrich(self.ratings.as_ref(), unique, self.settings.enrich_limit).await;
        let ranked = ranking::rank(enriched);
        let message = digest::format_digest(&ranked, &window, &self.settings.digest);

        let delivered = match &self.notifier {
            Some(notifier) => {
                tracing::info!(notifier = notifier.name(), "Sending digest");
                notifier.send(&message).await?;
                true
            }
            None => {
                tracing::info!("No notifier configured, skipping delivery");
                false
            }
        };

        Ok(RunReport {
            window,
            in_window: in_window_count,
            unique: unique_count,
            message,
            delivered,
        })
    }
}
