//! Artist identity resolution
//!
//! ```text
//! name ─► StrategyRunner ─► dedupe ─► relevance::filter ─► rank ─► ≤10 candidates
//!              │
//!              └─ nothing collected ─► fallback_search ─► ≤10 candidates
//! ```
//!
//! Each call is independent: nothing is cached between calls, and the same
//! deterministic catalog always yields the same ordered output.

use crate::catalog::{CatalogClient, SearchGuard};
use crate::dedupe::dedupe;
use crate::fallback::fallback_search;
use crate::models::{Candidate, Resolution, ResolutionPath};
use crate::ranker::rank;
use crate::relevance;
use crate::strategy::StrategyRunner;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument};

/// Resolves free-text artist names into ranked catalog candidates.
///
/// # Example
///
/// ```ignore
/// use core_identity::ArtistResolver;
/// use std::time::Duration;
///
/// let resolver = ArtistResolver::new(catalog).with_call_timeout(Duration::from_secs(10));
///
/// let candidates = resolver.resolve("Radiohead").await;
/// match candidates.first() {
///     Some(best) => println!("{} ({:?})", best.name, best.external_id),
///     None => println!("no match, create the artist manually"),
/// }
/// ```
pub struct ArtistResolver {
    catalog: Arc<dyn CatalogClient>,
    guard: SearchGuard,
}

impl ArtistResolver {
    /// Resolver with no call timeout and no cancellation.
    pub fn new(catalog: Arc<dyn CatalogClient>) -> Self {
        Self {
            catalog,
            guard: SearchGuard::new(),
        }
    }

    /// Bound every individual catalog call. A timed-out call counts as a
    /// failed strategy.
    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.guard = self.guard.with_timeout(timeout);
        self
    }

    /// Abort outstanding and future catalog calls once `token` fires.
    /// Resolutions running at that point return whatever they had, usually
    /// nothing.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.guard = self.guard.with_cancellation(token);
        self
    }

    /// Build a MusicBrainz-backed resolver from runtime configuration.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::Config`](crate::IdentityError::Config) when
    /// the configuration is invalid or has no MusicBrainz user agent.
    #[cfg(feature = "musicbrainz")]
    pub fn from_config(config: &core_runtime::config::ResolverConfig) -> crate::Result<Self> {
        let catalog = crate::providers::MusicBrainzCatalog::from_config(config)?;
        let resolver = Self::new(Arc::new(catalog));

        Ok(match config.call_timeout {
            Some(timeout) => resolver.with_call_timeout(timeout),
            None => resolver,
        })
    }

    /// Ranked candidates for `raw_artist_name`, best first, at most ten.
    ///
    /// Never fails: catalog errors, timeouts and cancellation degrade to
    /// fewer or no candidates. An empty list means "no match".
    pub async fn resolve(&self, raw_artist_name: &str) -> Vec<Candidate> {
        self.resolve_detailed(raw_artist_name).await.candidates
    }

    /// Like [`resolve`](Self::resolve), also reporting which path produced the
    /// list and what each strategy did.
    #[instrument(skip_all, fields(query = %raw_artist_name))]
    pub async fn resolve_detailed(&self, raw_artist_name: &str) -> Resolution {
        let query = raw_artist_name.trim();
        if query.is_empty() {
            debug!("Blank artist name, skipping catalog");
            return Resolution::empty();
        }

        let runner = StrategyRunner::new(self.catalog.as_ref(), &self.guard);
        let (collected, strategies) = runner.run_with_reports(query).await;

        if collected.is_empty() {
            let candidates = fallback_search(self.catalog.as_ref(), &self.guard, query).await;
            let path = if candidates.is_empty() {
                ResolutionPath::Empty
            } else {
                ResolutionPath::FallbackSearch
            };
            info!(count = candidates.len(), path = ?path, "Resolved artist via fallback");

            return Resolution {
                candidates,
                path,
                strategies,
            };
        }

        let collected_count = collected.len();
        let unique = dedupe(collected);
        let unique_count = unique.len();
        let relevant = relevance::filter(unique, query);
        let candidates = rank(relevant);

        info!(
            collected = collected_count,
            unique = unique_count,
            count = candidates.len(),
            best = candidates.first().map(|c| c.name.as_str()).unwrap_or(""),
            "Resolved artist"
        );

        Resolution {
            candidates,
            path: ResolutionPath::Strategies,
            strategies,
        }
    }
}
