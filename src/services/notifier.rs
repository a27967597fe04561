/// Digest delivery
///
/// Posts the formatted digest to a Telegram chat through the Bot API `sendMessage`
/// method. Delivery failures are terminal for the run.
use crate::error::{AppError, AppResult};
use reqwest::Client as HttpClient;
use serde::Deserialize;
use std::time::Duration;

/// Telegram rejects messages longer than this many characters
pub const MESSAGE_LIMIT: usize = 4096;

const PARSE_MODE: &str = "Markdown";

/// Trait for digest destinations
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver the full digest text
    async fn send(&self, text: &str) -> AppResult<()>;

    /// Notifier name for logging and debugging
    fn name(&self) -> &'static str;
}

#[derive(Debug, Deserialize)]
struct TelegramResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Clone)]
pub struct TelegramNotifier {
    http_client: HttpClient,
    bot_token: String,
    chat_id: String,
    api_url: String,
    timeout: Duration,
}

impl TelegramNotifier {
    pub fn new(bot_token: String, chat_id: String, api_url: String, timeout: Duration) -> Self {
        Self {
            http_client: HttpClient::new(),
            bot_token,
            chat_id,
            api_url: api_url.trim_end_matches('/').to_string(),
            timeout,
        }
    }

    async fn send_chunk(&self, text: &str) -> AppResult<()> {
        let url = format!("{}/bot{}/sendMessage", self.api_url, self.bot_token);

        // Request errors carry the URL, which embeds the bot token
        let response = self
            .http_client
            .post(&url)
            .form(&[
                ("chat_id", self.chat_id.as_str()),
                ("text", text),
                ("parse_mode", PARSE_MODE),
                ("disable_web_page_preview", "true"),
            ])
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| AppError::HttpClient(e.without_url()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AppError::HttpClient(e.without_url()))?;

        if !status.is_success() {
            return Err(AppError::Notification(format!(
                "Telegram returned status {}: {}",
                status, body
            )));
        }

        let reply: TelegramResponse = serde_json::from_str(&body).map_err(|e| {
            AppError::Notification(format!("Unreadable Telegram response: {}", e))
        })?;

        if !reply.ok {
            return Err(AppError::Notification(
                reply
                    .description
                    .unwrap_or_else(|| "Telegram rejected the message".to_string()),
            ));
        }

        Ok(())
    }
}

#[async_trait::async_trait]
impl Notifier for TelegramNotifier {
    async fn send(&self, text: &str) -> AppResult<()> {
        let chunks = split_message(text, MESSAGE_LIMIT);

        for (index, chunk) in chunks.iter().enumerate() {
            if let Err(e) = self.send_chunk(chunk).await {
                if index == 0 {
                    return Err(e);
                }

                tracing::error!(
                    delivered = index,
                    parts = chunks.len(),
                    notifier = "telegram",
                    "Digest partially delivered"
                );
                let reason = match e {
                    AppError::Notification(message) => message,
                    other => other.to_string(),
                };
                return Err(AppError::Notification(format!(
                    "{} (sent {} of {} parts before failing)",
                    reason,
                    index,
                    chunks.len()
                )));
            }
            tracing::debug!(part = index + 1, parts = chunks.len(), "Message part sent");
        }

        tracing::info!(
            chat_id = %self.chat_id,
            parts = chunks.len(),
            notifier = "telegram",
            "Digest delivered"
        );

        Ok(())
    }

    fn name(&self) -> &'static str {
        "telegram"
    }
}

/// Splits `text` into pieces of at most `limit` characters
///
/// Pieces break after a newline where possible; a single line longer than `limit`
/// is cut mid-line, never between a Markdown escape and the character it escapes.
/// Whitespace-only pieces are dropped.
pub fn split_message(text: &str, limit: usize) -> Vec<String> {
    let limit = limit.max(1);
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for line in text.split_inclusive('\n') {
        for part in hard_wrap(line, limit) {
            let part_len = part.chars().count();
            if current_len + part_len > limit && current_len > 0 {
                push_chunk(&mut chunks, std::mem::take(&mut current));
                current_len = 0;
            }
            current.push_str(&part);
            current_len += part_len;
        }
    }
    push_chunk(&mut chunks, current);

    chunks
}

fn hard_wrap(line: &str, limit: usize) -> Vec<String> {
    let chars: Vec<char> = line.chars().collect();
    let mut pieces = Vec::new();
    let mut start = 0;

    while start < chars.len() {
        let mut end = (start + limit).min(chars.len());
        if end < chars.len() && end - start > 1 && chars[end - 1] == '\\' {
            end -= 1;
        }
        pieces.push(chars[start..end].iter().collect());
        start = end;
    }

    pieces
}

fn push_chunk(chunks: &mut Vec<String>, chunk: String) {
    if !chunk.trim().is_empty() {
        chunks.push(chunk);
    }
}
