use std::collections::{hash_map::Entry, HashMap};

use crate::{
    models::{CatalogRecord, DateWindow},
    services::providers::CatalogProvider,
};

/// Fetches up to `pages` catalog pages and keeps the records released in `window`
///
/// A failed page is logged and skipped; an empty page ends pagination. Failures never
/// propagate, so the caller always gets whatever could be fetched.
pub async fn fetch_in_window(
    provider: &dyn CatalogProvider,
    window: &DateWindow,
    pages: u32,
) -> Vec<CatalogRecord> {
    let mut fetched = Vec::new();

    for page in 1..=pages {
        match provider.fetch_page(page).await {
            Ok(records) if records.is_empty() => {
                tracing::debug!(page, provider = provider.name(), "Empty page, stopping");
                break;
            }
            Ok(records) => fetched.extend(records),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    page,
                    provider = provider.name(),
                    "Catalog page fetch failed"
                );
            }
        }
    }

    let total = fetched.len();
    let in_window = filter_window(fetched, window);

    tracing::info!(
        fetched = total,
        in_window = in_window.len(),
        window = %window,
        "Catalog releases collected"
    );

    in_window
}

/// Keeps records whose release date falls inside `window`
///
/// Records without a parseable release date are dropped.
pub fn filter_window(records: Vec<CatalogRecord>, window: &DateWindow) -> Vec<CatalogRecord> {
    records
        .into_iter()
        .filter(|record| match record.release_date {
            Some(date) => window.contains(date),
            None => {
                tracing::debug!(title = %record.title, "Dropping release without a date");
                false
            }
        })
        .collect()
}

/// Removes repeated (title, year) records, keeping first-seen order
///
/// Platforms listed on a dropped repeat are merged into the kept record.
pub fn dedupe(records: Vec<CatalogRecord>) -> Vec<CatalogRecord> {
    let mut unique: Vec<CatalogRecord> = Vec::with_capacity(records.len());
    let mut seen: HashMap<(String, Option<i32>), usize> = HashMap::new();

    for record in records {
        match seen.entry(record.dedup_key()) {
            Entry::Occupied(slot) => unique[*slot.get()].platforms.extend(record.platforms),
            Entry::Vacant(slot) => {
                slot.insert(unique.len());
                unique.push(record);
            }
        }
    }

    unique
}
