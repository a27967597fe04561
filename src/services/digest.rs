//! Renders the weekly digest as Telegram (legacy) Markdown.

use std::collections::BTreeSet;

use crate::models::{DateWindow, ReleaseItem};

const SEPARATOR: &str = "──────────────────────────";
const NOT_AVAILABLE: &str = "N/A";
const NO_PLOT: &str = "No plot available";
const UNKNOWN_GENRE: &str = "Unknown";
const ELLIPSIS: &str = "...";

/// Display names for catalog service ids
const SERVICE_NAMES: &[(&str, &str)] = &[
    ("netflix", "Netflix"),
    ("prime", "Prime Video"),
    ("hotstar", "Disney+ Hotstar"),
    ("zee5", "ZEE5"),
    ("jio", "JioCinema"),
    ("sonyliv", "SonyLIV"),
    ("mxplayer", "MX Player"),
    ("voot", "Voot"),
    ("apple", "Apple TV+"),
];

/// Rendering limits for the digest
#[derive(Debug, Clone, PartialEq)]
pub struct DigestSettings {
    /// Region name shown in the header
    pub region_label: String,
    /// Maximum entries rendered
    pub max_entries: usize,
    /// Plot character budget, ellipsis included
    pub plot_limit: usize,
}

impl Default for DigestSettings {
    fn default() -> Self {
        Self {
            region_label: "India".to_string(),
            max_entries: 10,
            plot_limit: 350,
        }
    }
}

/// Message sent when nothing was released in the window
pub fn empty_digest(window: &DateWindow) -> String {
    format!("🎬 No new OTT releases found for {}.", window.label())
}

/// Formats ranked releases into a single message
///
/// Output depends only on the inputs, so formatting the same list twice yields
/// identical text.
pub fn format_digest(
    items: &[ReleaseItem],
    window: &DateWindow,
    settings: &DigestSettings,
) -> String {
    if items.is_empty() {
        return empty_digest(window);
    }

    let mut message = format!(
        "🎬 *OTT Releases in {}* ({})\n{}\n\n",
        strip_bold(&settings.region_label),
        window.label(),
        SEPARATOR
    );

    for item in items.iter().take(settings.max_entries) {
        message.push_str(&format_entry(item, settings.plot_limit));
    }

    let hidden = items.len().saturating_sub(settings.max_entries);
    if hidden > 0 {
        let noun = if hidden == 1 { "release" } else { "releases" };
        message.push_str(&format!("_+{} more {}_\n", hidden, noun));
    }

    message
}

fn format_entry(item: &ReleaseItem, plot_limit: usize) -> String {
    let rating = item
        .rating
        .map(|r| format!("{:.1}", r))
        .unwrap_or_else(|| NOT_AVAILABLE.to_string());

    let release_date = item
        .release_date
        .map(|d| d.format("%d %b %Y").to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string());

    let genre = item.genre.as_deref().unwrap_or(UNKNOWN_GENRE);
    let plot = truncate_chars(item.plot.as_deref().unwrap_or(NO_PLOT), plot_limit);

    format!(
        "📽️ *{}* (IMDb: {})\n🗓️ Release Date: {}\n📺 Platform(s): {}\n🎭 Genre: {}\n📝 {}\n\n",
        strip_bold(&item.title),
        rating,
        release_date,
        escape_markdown(&platform_list(&item.platforms)),
        escape_markdown(genre),
        escape_markdown(&plot),
    )
}

/// Comma-joined display names, or "N/A" when no platform is known
pub fn platform_list(platforms: &BTreeSet<String>) -> String {
    let names: BTreeSet<String> = platforms.iter().map(|id| display_name(id)).collect();

    if names.is_empty() {
        NOT_AVAILABLE.to_string()
    } else {
        names.into_iter().collect::<Vec<_>>().join(", ")
    }
}

fn display_name(service_id: &str) -> String {
    let id = service_id.trim().to_lowercase();
    if let Some((_, name)) = SERVICE_NAMES.iter().find(|(known, _)| *known == id) {
        return name.to_string();
    }

    let mut chars = id.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Cuts `text` to at most `limit` characters, marking the cut with "..."
pub fn truncate_chars(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text.to_string();
    }

    let keep = limit.saturating_sub(ELLIPSIS.len());
    let mut truncated: String = text.chars().take(keep).collect();
    truncated.push_str(ELLIPSIS);
    truncated
}

/// Escapes the characters legacy Markdown treats as entity markers
pub fn escape_markdown(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '_' | '*' | '`' | '[') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

// Entities cannot nest in legacy Markdown, so bold text only needs its own
// delimiter removed.
fn strip_bold(text: &str) -> String {
    text.replace('*', "")
}
