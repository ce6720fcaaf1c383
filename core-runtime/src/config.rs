//! # Resolver Configuration
//!
//! Builder-style configuration for the artist identity resolver. The builder
//! validates eagerly so a host learns about a missing capability or a bad
//! catalog setting at startup rather than on the first lookup.
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::config::{CatalogApiConfig, ResolverConfig};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! let config = ResolverConfig::builder()
//!     .http_client(Arc::new(MyHttpClient))
//!     .catalog_api(
//!         CatalogApiConfig::new()
//!             .with_musicbrainz_user_agent("MyMusicApp/1.0 (contact@example.com)"),
//!     )
//!     .call_timeout(Duration::from_secs(10))
//!     .build()?;
//! ```

use crate::error::{Error, Result};
use bridge_traits::HttpClient;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Default delay between catalog requests (MusicBrainz allows 1 req/sec)
pub const DEFAULT_RATE_LIMIT_DELAY_MS: u64 = 1000;

/// Default per-request HTTP timeout handed to the transport
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 30_000;

const MAX_RATE_LIMIT_DELAY_MS: u64 = 60_000;

/// Settings for the external catalog API.
///
/// # Example
///
/// ```no_run
/// use core_runtime::config::CatalogApiConfig;
///
/// let config = CatalogApiConfig::new()
///     .with_musicbrainz_user_agent("MyMusicApp/1.0 (contact@example.com)")
///     .with_rate_limit_delay_ms(1500);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogApiConfig {
    /// MusicBrainz user agent string (format: "AppName/Version (Contact)")
    ///
    /// MusicBrainz rejects anonymous clients, so the catalog adapter cannot
    /// be built without one.
    /// See: https://musicbrainz.org/doc/MusicBrainz_API/Rate_Limiting
    pub musicbrainz_user_agent: Option<String>,

    /// Minimum delay in milliseconds between two catalog requests
    pub rate_limit_delay_ms: u64,

    /// Transport-level timeout for a single HTTP request
    pub request_timeout_ms: u64,
}

impl Default for CatalogApiConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogApiConfig {
    pub fn new() -> Self {
        Self {
            musicbrainz_user_agent: None,
            rate_limit_delay_ms: DEFAULT_RATE_LIMIT_DELAY_MS,
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
        }
    }

    pub fn with_musicbrainz_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.musicbrainz_user_agent = Some(user_agent.into());
        self
    }

    pub fn with_rate_limit_delay_ms(mut self, delay_ms: u64) -> Self {
        self.rate_limit_delay_ms = delay_ms;
        self
    }

    pub fn with_request_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.request_timeout_ms = timeout_ms;
        self
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn has_musicbrainz(&self) -> bool {
        self.musicbrainz_user_agent.is_some()
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(ref ua) = self.musicbrainz_user_agent {
            if ua.trim().is_empty() {
                return Err(Error::Config(
                    "MusicBrainz user agent cannot be empty".to_string(),
                ));
            }
            if !ua.contains('/') || !ua.contains('(') || !ua.contains(')') {
                return Err(Error::Config(
                    "MusicBrainz user agent must follow format: 'AppName/Version (Contact)'"
                        .to_string(),
                ));
            }
        }

        if self.rate_limit_delay_ms == 0 {
            return Err(Error::Config(
                "Rate limit delay must be greater than 0ms".to_string(),
            ));
        }

        if self.rate_limit_delay_ms > MAX_RATE_LIMIT_DELAY_MS {
            return Err(Error::Config(
                "Rate limit delay exceeds maximum of 60 seconds (60,000ms)".to_string(),
            ));
        }

        if self.request_timeout_ms == 0 {
            return Err(Error::Config(
                "Request timeout must be greater than 0ms".to_string(),
            ));
        }

        Ok(())
    }
}

/// Everything the resolver needs from its host.
#[derive(Clone)]
pub struct ResolverConfig {
    /// Transport used by the catalog adapter
    pub http_client: Arc<dyn HttpClient>,

    pub catalog_api: CatalogApiConfig,

    /// Upper bound on a single catalog search issued by a resolution
    /// strategy. `None` waits as long as the catalog takes.
    pub call_timeout: Option<Duration>,
}

impl fmt::Debug for ResolverConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolverConfig")
            .field("http_client", &"HttpClient { ... }")
            .field("catalog_api", &self.catalog_api)
            .field("call_timeout", &self.call_timeout)
            .finish()
    }
}

impl ResolverConfig {
    pub fn builder() -> ResolverConfigBuilder {
        ResolverConfigBuilder::default()
    }

    pub fn validate(&self) -> Result<()> {
        self.catalog_api.validate()?;

        if self.call_timeout == Some(Duration::ZERO) {
            return Err(Error::Config(
                "Call timeout must be greater than zero when set".to_string(),
            ));
        }

        Ok(())
    }
}

/// Builder for [`ResolverConfig`].
#[derive(Default)]
pub struct ResolverConfigBuilder {
    http_client: Option<Arc<dyn HttpClient>>,
    catalog_api: Option<CatalogApiConfig>,
    call_timeout: Option<Duration>,
}

impl ResolverConfigBuilder {
    pub fn http_client(mut self, client: Arc<dyn HttpClient>) -> Self {
        self.http_client = Some(client);
        self
    }

    pub fn catalog_api(mut self, config: CatalogApiConfig) -> Self {
        self.catalog_api = Some(config);
        self
    }

    pub fn call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = Some(timeout);
        self
    }

    /// Build and validate the configuration.
    ///
    /// # Errors
    ///
    /// - [`Error::CapabilityMissing`] when no `HttpClient` was injected
    /// - [`Error::Config`] when a setting is out of range
    pub fn build(self) -> Result<ResolverConfig> {
        let http_client = self.http_client.ok_or_else(|| Error::CapabilityMissing {
            capability: "HttpClient".to_string(),
            message: "An HttpClient implementation is required to reach the artist catalog. \
                      Inject the host's HTTP adapter with ResolverConfigBuilder::http_client."
                .to_string(),
        })?;

        let config = ResolverConfig {
            http_client,
            catalog_api: self.catalog_api.unwrap_or_default(),
            call_timeout: self.call_timeout,
        };

        config.validate()?;
        Ok(config)
    }
}
