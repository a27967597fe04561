use crate::{
    models::{CatalogRecord, Enrichment, ReleaseItem},
    services::providers::RatingsProvider,
};

/// Enriches releases one lookup at a time
///
/// Only the first `limit` releases are looked up; later ones pass through with no
/// rating, plot or genre. Lookup failures and "not found" answers leave the same
/// empty fields and never drop the release.
pub async fn enrich(
    provider: &dyn RatingsProvider,
    records: Vec<CatalogRecord>,
    limit: usize,
) -> Vec<ReleaseItem> {
    let total = records.len();
    let mut enriched = Vec::with_capacity(total);
    let mut matched = 0usize;

    for (index, record) in records.into_iter().enumerate() {
        let item = ReleaseItem::from(record);

        if index >= limit {
            enriched.push(item);
            continue;
        }

        let enrichment = match provider.lookup(&item.title, item.year).await {
            Ok(Some(enrichment)) => {
                matched += 1;
                enrichment
            }
            Ok(None) => Enrichment::default(),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    title = %item.title,
                    provider = provider.name(),
                    "Ratings lookup failed"
                );
                Enrichment::default()
            }
        };

        enriched.push(item.with_enrichment(enrichment));
    }

    tracing::info!(
        releases = total,
        looked_up = total.min(limit),
        matched,
        "Enrichment completed"
    );

    enriched
}
