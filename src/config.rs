use serde::Deserialize;
use std::time::Duration;

use crate::error::{AppError, AppResult};

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Streaming Availability API key (RapidAPI)
    #[serde(default)]
    pub streaming_api_key: Option<String>,

    /// OMDb API key
    #[serde(default)]
    pub omdb_api_key: Option<String>,

    /// Telegram bot token
    #[serde(default)]
    pub telegram_bot_token: Option<String>,

    /// Telegram destination chat or channel
    #[serde(default)]
    pub telegram_chat_id: Option<String>,

    /// Streaming Availability API base URL
    #[serde(default = "default_streaming_api_url")]
    pub streaming_api_url: String,

    /// OMDb API base URL
    #[serde(default = "default_omdb_api_url")]
    pub omdb_api_url: String,

    /// Telegram Bot API base URL
    #[serde(default = "default_telegram_api_url")]
    pub telegram_api_url: String,

    /// Region code passed to the catalog search
    #[serde(default = "default_country")]
    pub country: String,

    /// Region name shown in the digest header
    #[serde(default = "default_region_label")]
    pub region_label: String,

    /// Streaming service allow-list
    #[serde(default = "default_services")]
    pub services: Vec<String>,

    /// Number of catalog pages fetched per run
    #[serde(default = "default_fetch_pages")]
    pub fetch_pages: u32,

    /// Maximum number of titles looked up in OMDb
    #[serde(default = "default_enrich_limit")]
    pub enrich_limit: usize,

    /// Maximum number of entries rendered in the digest
    #[serde(default = "default_digest_limit")]
    pub digest_limit: usize,

    /// Plot character budget
    #[serde(default = "default_plot_limit")]
    pub plot_limit: usize,

    #[serde(default = "default_catalog_timeout_secs")]
    pub catalog_timeout_secs: u64,

    #[serde(default = "default_ratings_timeout_secs")]
    pub ratings_timeout_secs: u64,

    #[serde(default = "default_notify_timeout_secs")]
    pub notify_timeout_secs: u64,
}

fn default_streaming_api_url() -> String {
    "https://streaming-availability.p.rapidapi.com".to_string()
}

fn default_omdb_api_url() -> String {
    "https://www.omdbapi.com".to_string()
}

fn default_telegram_api_url() -> String {
    "https://api.telegram.org".to_string()
}

fn default_country() -> String {
    "in".to_string()
}

fn default_region_label() -> String {
    "India".to_string()
}

fn default_services() -> Vec<String> {
    [
        "netflix", "prime", "hotstar", "zee5", "jio", "sonyliv", "mxplayer", "voot",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_fetch_pages() -> u32 {
    2
}

fn default_enrich_limit() -> usize {
    20
}

fn default_digest_limit() -> usize {
    10
}

fn default_plot_limit() -> usize {
    350
}

const MIN_PLOT_LIMIT: usize = 4;
const MAX_PLOT_LIMIT: usize = 1000;

fn default_catalog_timeout_secs() -> u64 {
    20
}

fn default_ratings_timeout_secs() -> u64 {
    10
}

fn default_notify_timeout_secs() -> u64 {
    20
}

/// Secrets resolved for the stages that are active in this run
#[derive(Debug, Clone)]
pub struct Credentials {
    pub streaming_api_key: String,
    pub omdb_api_key: String,
    /// `None` when delivery is disabled (dry run)
    pub telegram: Option<TelegramCredentials>,
}

#[derive(Debug, Clone)]
pub struct TelegramCredentials {
    pub bot_token: String,
    pub chat_id: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> AppResult<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(std::env::vars())
    }

    /// Load configuration from an explicit set of variables
    pub fn from_vars<I>(vars: I) -> AppResult<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut config = envy::from_iter::<_, Config>(vars)
            .map_err(|e| AppError::Config(format!("Failed to load config: {}", e)))?;

        config.services = config
            .services
            .iter()
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect();
        if config.services.is_empty() {
            return Err(AppError::Config(
                "SERVICES must name at least one service".to_string(),
            ));
        }

        config.check_limits()?;
        Ok(config)
    }

    fn check_limits(&self) -> AppResult<()> {
        let limits = [
            ("FETCH_PAGES", self.fetch_pages as u64),
            ("ENRICH_LIMIT", self.enrich_limit as u64),
            ("DIGEST_LIMIT", self.digest_limit as u64),
            ("PLOT_LIMIT", self.plot_limit as u64),
            ("CATALOG_TIMEOUT_SECS", self.catalog_timeout_secs),
            ("RATINGS_TIMEOUT_SECS", self.ratings_timeout_secs),
            ("NOTIFY_TIMEOUT_SECS", self.notify_timeout_secs),
        ];

        for (name, value) in limits {
            if value == 0 {
                return Err(AppError::Config(format!("{} must be greater than zero", name)));
            }
        }

        // The ellipsis marker alone takes three characters; the upper bound keeps
        // every digest line well under one Telegram message
        if !(MIN_PLOT_LIMIT..=MAX_PLOT_LIMIT).contains(&self.plot_limit) {
            return Err(AppError::Config(format!(
                "PLOT_LIMIT must be between {} and {}",
                MIN_PLOT_LIMIT, MAX_PLOT_LIMIT
            )));
        }

        Ok(())
    }

    /// Resolves the secrets required by the active stages
    ///
    /// Both API keys are always required. The Telegram pair is required only when
    /// `deliver` is set. Blank values count as missing.
    pub fn credentials(&self, deliver: bool) -> AppResult<Credentials> {
        let streaming_api_key = require(&self.streaming_api_key, "STREAMING_API_KEY")?;
        let omdb_api_key = require(&self.omdb_api_key, "OMDB_API_KEY")?;

        let telegram = if deliver {
            Some(TelegramCredentials {
                bot_token: require(&self.telegram_bot_token, "TELEGRAM_BOT_TOKEN")?,
                chat_id: require(&self.telegram_chat_id, "TELEGRAM_CHAT_ID")?,
            })
        } else {
            None
        };

        Ok(Credentials {
            streaming_api_key,
            omdb_api_key,
            telegram,
        })
    }

    pub fn catalog_timeout(&self) -> Duration {
        Duration::from_secs(self.catalog_timeout_secs)
    }

    pub fn ratings_timeout(&self) -> Duration {
        Duration::from_secs(self.ratings_timeout_secs)
    }

    pub fn notify_timeout(&self) -> Duration {
        Duration::from_secs(self.notify_timeout_secs)
    }
}

fn require(value: &Option<String>, name: &'static str) -> AppResult<String> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(AppError::MissingSecret(name)),
    }
}
