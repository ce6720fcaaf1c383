//! Degraded single-query search.
//!
//! Used only when the strategies collected nothing. The raw query goes to
//! the catalog once, unboosted, and the records are ordered by the catalog's
//! own score. Relevance filtering is not applied here. This is
//! the last failure boundary: errors become an empty list.

use crate::catalog::{CatalogClient, SearchGuard};
use crate::dedupe::dedupe;
use crate::models::{Candidate, MAX_RANKED_RESULTS};
use crate::normalizer::normalize;
use tracing::{debug, warn};

pub const FALLBACK_LIMIT: usize = MAX_RANKED_RESULTS;

pub async fn fallback_search(
    catalog: &dyn CatalogClient,
    guard: &SearchGuard,
    query: &str,
) -> Vec<Candidate> {
    let records = match guard.search(catalog, query, FALLBACK_LIMIT).await {
        Ok(records) => records,
        Err(err) => {
            warn!(error = %err, "Fallback search failed");
            return Vec::new();
        }
    };

    let mut candidates = dedupe(records.iter().map(|record| normalize(record, 0)).collect());
    candidates.sort_by(|a, b| b.catalog_score.cmp(&a.catalog_score));
    candidates.truncate(MAX_RANKED_RESULTS);

    debug!(count = candidates.len(), "Fallback search returned candidates");
    candidates
}
