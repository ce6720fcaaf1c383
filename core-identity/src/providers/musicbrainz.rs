//! MusicBrainz Artist Catalog
//!
//! [`CatalogClient`] implementation over the MusicBrainz web service.
//!
//! ## API Endpoint
//!
//! - **Artist Search**: `https://musicbrainz.org/ws/2/artist/?query={query}&fmt=json&limit={n}`
//!
//! The response's `artists` array is handed to the resolver as raw records;
//! MusicBrainz field names (`id`, `type`, `score`, `life-span`) are exactly
//! what [`RawRecord`] reads.
//!
//! ## Rate Limiting
//!
//! MusicBrainz allows one request per second for identified clients. The
//! client spaces requests by the configured delay, measured with an
//! injectable [`Clock`]. The wait happens in [`CatalogClient::ready`], so a
//! resolver call timeout only measures the HTTP round trip.
//!
//! ## User Agent Requirement
//!
//! Format: "ApplicationName/Version (ContactEmail)", e.g.
//! "MyMusicApp/1.0 (contact@example.com)". Anonymous requests are throttled
//! or rejected by the service.
//!
//! ## Usage
//!
//! ```ignore
//! use core_identity::providers::MusicBrainzCatalog;
//! use core_identity::ArtistResolver;
//! use std::sync::Arc;
//!
//! let catalog = MusicBrainzCatalog::new(
//!     http_client,
//!     "MyMusicApp/1.0 (contact@example.com)".to_string(),
//!     1000,
//! );
//! let resolver = ArtistResolver::new(Arc::new(catalog));
//! ```

use crate::catalog::{CatalogClient, RawRecord};
use crate::error::{IdentityError, Result};
use async_trait::async_trait;
use bridge_traits::http::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
use bridge_traits::time::{Clock, SystemClock};
use core_runtime::config::{ResolverConfig, DEFAULT_REQUEST_TIMEOUT_MS};
use core_runtime::logging::redact_if_sensitive;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// MusicBrainz API base URL
const MUSICBRAINZ_API_BASE: &str = "https://musicbrainz.org/ws/2";

/// Retry-After assumed when a 429 response carries none
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

const PROVIDER_NAME: &str = "MusicBrainz";

/// Artist catalog backed by MusicBrainz.
pub struct MusicBrainzCatalog {
    http_client: Arc<dyn HttpClient>,
    user_agent: String,
    base_url: String,
    request_timeout: Duration,
    rate_limiter: Mutex<RateLimiter>,
}

/// Enforces a minimum spacing between consecutive requests
struct RateLimiter {
    clock: Arc<dyn Clock>,
    last_request_ms: Option<i64>,
    min_delay: Duration,
    /// A slot claimed by `reserve` that the next request may use without waiting
    reserved: bool,
}

impl RateLimiter {
    fn new(delay_ms: u64, clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            last_request_ms: None,
            min_delay: Duration::from_millis(delay_ms),
            reserved: false,
        }
    }

    /// Wait for a free slot and hold it for the next `acquire`.
    async fn reserve(&mut self) {
        if !self.reserved {
            self.wait_if_needed().await;
            self.reserved = true;
        }
    }

    /// Use the reserved slot, or wait for a new one.
    async fn acquire(&mut self) {
        if !std::mem::take(&mut self.reserved) {
            self.wait_if_needed().await;
        }
    }

    async fn wait_if_needed(&mut self) {
        if let Some(last) = self.last_request_ms {
            let elapsed_ms = self.clock.unix_timestamp_millis().saturating_sub(last);
            let required_ms = i64::try_from(self.min_delay.as_millis()).unwrap_or(i64::MAX);
            if elapsed_ms < required_ms {
                let wait_time = Duration::from_millis((required_ms - elapsed_ms).unsigned_abs());
                debug!("Rate limiting: waiting {:?}", wait_time);
                tokio::time::sleep(wait_time).await;
            }
        }
        self.last_request_ms = Some(self.clock.unix_timestamp_millis());
    }
}

impl MusicBrainzCatalog {
    /// # Arguments
    ///
    /// * `http_client` - HTTP transport
    /// * `user_agent` - User agent string (format: "AppName/Version (Contact)")
    /// * `rate_limit_delay_ms` - Minimum delay between requests in milliseconds
    pub fn new(
        http_client: Arc<dyn HttpClient>,
        user_agent: String,
        rate_limit_delay_ms: u64,
    ) -> Self {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        Self::with_clock(http_client, user_agent, rate_limit_delay_ms, clock)
    }

    pub fn with_clock(
        http_client: Arc<dyn HttpClient>,
        user_agent: String,
        rate_limit_delay_ms: u64,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            http_client,
            user_agent,
            base_url: MUSICBRAINZ_API_BASE.to_string(),
            request_timeout: Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS),
            rate_limiter: Mutex::new(RateLimiter::new(rate_limit_delay_ms, clock)),
        }
    }

    /// Build from runtime configuration; the user agent is mandatory.
    pub fn from_config(config: &ResolverConfig) -> Result<Self> {
        config.validate()?;

        let api = &config.catalog_api;
        let user_agent = api.musicbrainz_user_agent.clone().ok_or_else(|| {
            core_runtime::Error::Config(
                "MusicBrainz user agent is required to build the artist catalog".to_string(),
            )
        })?;

        info!(
            user_agent = %redact_if_sensitive("user_agent", &user_agent),
            rate_limit_delay_ms = api.rate_limit_delay_ms,
            "MusicBrainz catalog configured"
        );

        Ok(
            Self::new(Arc::clone(&config.http_client), user_agent, api.rate_limit_delay_ms)
                .with_request_timeout(api.request_timeout()),
        )
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Point at a mirror or a local MusicBrainz instance.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn search_url(&self, query: &str, limit: usize) -> String {
        format!(
            "{}/artist/?query={}&fmt=json&limit={}",
            self.base_url,
            urlencoding::encode(query),
            limit
        )
    }

    fn parse_artists(response: &HttpResponse) -> Result<Vec<RawRecord>> {
        let body: Value = response.json().map_err(|e| {
            IdentityError::MalformedResponse(format!("Failed to parse artist search: {}", e))
        })?;

        let records = body
            .get("artists")
            .and_then(Value::as_array)
            .map(|artists| artists.iter().cloned().map(RawRecord::from).collect())
            .unwrap_or_default();

        Ok(records)
    }
}

#[async_trait]
impl CatalogClient for MusicBrainzCatalog {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<RawRecord>> {
        let url = self.search_url(query, limit);
        debug!("Searching MusicBrainz: {}", url);

        self.rate_limiter.lock().await.acquire().await;

        let request = HttpRequest::new(HttpMethod::Get, url)
            .header("User-Agent", &self.user_agent)
            .header("Accept", "application/json")
            .timeout(self.request_timeout);

        let response = self.http_client.execute(request).await.map_err(|e| {
            IdentityError::CatalogUnavailable(format!("MusicBrainz artist search failed: {}", e))
        })?;

        match response.status {
            200 => Self::parse_artists(&response),
            503 => {
                warn!("MusicBrainz service unavailable (503)");
                Err(IdentityError::CatalogUnavailable(
                    "MusicBrainz returned 503".to_string(),
                ))
            }
            429 => {
                let retry_after = response
                    .header("Retry-After")
                    .and_then(|v| v.trim().parse::<u64>().ok())
                    .unwrap_or(DEFAULT_RETRY_AFTER_SECS);

                Err(IdentityError::RateLimited {
                    provider: PROVIDER_NAME.to_string(),
                    retry_after_seconds: retry_after,
                })
            }
            status => Err(IdentityError::HttpError {
                status,
                body: String::from_utf8_lossy(&response.body).to_string(),
            }),
        }
    }

    async fn ready(&self) {
        self.rate_limiter.lock().await.reserve().await;
    }
}
