//! Catalog seam
//!
//! [`CatalogClient`] is the only thing the resolver knows about the external
//! artist catalog. Records come back loosely typed, as the catalog's JSON
//! objects, and every accessor on [`RawRecord`] tolerates absent keys and
//! unexpected value types.
//!
//! [`SearchGuard`] wraps each call with an optional timeout and cancellation
//! token. Both default to off.

use crate::error::{IdentityError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// One artist record as returned by the catalog.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawRecord(Map<String, Value>);

impl RawRecord {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Catalog identifier (MBID for MusicBrainz)
    pub fn id(&self) -> Option<&str> {
        self.str_field("id")
    }

    pub fn name(&self) -> Option<&str> {
        self.str_field("name")
    }

    /// Entity type, e.g. "Person" or "Group"
    pub fn artist_type(&self) -> Option<&str> {
        self.str_field("type")
    }

    pub fn country(&self) -> Option<&str> {
        self.str_field("country")
    }

    pub fn disambiguation(&self) -> Option<&str> {
        self.str_field("disambiguation")
    }

    /// Raw relevance score. JSON responses carry `score`; the XML-derived
    /// shape carries `ext:score`.
    pub fn score(&self) -> Option<&Value> {
        self.0
            .get("score")
            .filter(|value| !value.is_null())
            .or_else(|| self.0.get("ext:score"))
    }

    pub fn life_span_begin(&self) -> Option<&str> {
        self.life_span_field("begin")
    }

    pub fn life_span_end(&self) -> Option<&str> {
        self.life_span_field("end")
    }

    fn str_field(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    fn life_span_field(&self, key: &str) -> Option<&str> {
        self.0
            .get("life-span")
            .and_then(Value::as_object)
            .and_then(|span| span.get(key))
            .and_then(Value::as_str)
    }
}

impl From<Value> for RawRecord {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(fields) => Self(fields),
            _ => Self::default(),
        }
    }
}

/// External artist catalog.
///
/// `query` is passed through untouched; the catalog owns tokenization and
/// query syntax. `limit` is the maximum number of records wanted.
#[async_trait]
pub trait CatalogClient: Send + Sync {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<RawRecord>>;

    /// Wait until the catalog will accept another request.
    ///
    /// Clients that throttle locally do their waiting here so that
    /// [`SearchGuard`] can keep it out of the call timeout.
    async fn ready(&self) {}
}

/// Timeout and cancellation policy applied to every catalog call.
#[derive(Debug, Clone, Default)]
pub struct SearchGuard {
    timeout: Option<Duration>,
    cancellation: Option<CancellationToken>,
}

impl SearchGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancellation
            .as_ref()
            .is_some_and(CancellationToken::is_cancelled)
    }

    /// Run one search under this guard.
    ///
    /// The timeout covers [`CatalogClient::search`] only; the client's
    /// [`ready`](CatalogClient::ready) wait is bounded by cancellation alone.
    ///
    /// # Errors
    ///
    /// - [`IdentityError::Cancelled`] if the token fires before or during the call
    /// - [`IdentityError::Timeout`] if the call outlives the configured timeout
    /// - whatever the catalog itself returns
    pub async fn search(
        &self,
        client: &dyn CatalogClient,
        query: &str,
        limit: usize,
    ) -> Result<Vec<RawRecord>> {
        if self.is_cancelled() {
            return Err(IdentityError::Cancelled);
        }

        let call = async {
            client.ready().await;

            match self.timeout {
                Some(deadline) => {
                    match tokio::time::timeout(deadline, client.search(query, limit)).await {
                        Ok(result) => result,
                        Err(_) => Err(IdentityError::Timeout(deadline)),
                    }
                }
                None => client.search(query, limit).await,
            }
        };

        match &self.cancellation {
            Some(token) => {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => Err(IdentityError::Cancelled),
                    result = call => result,
                }
            }
            None => call.await,
        }
    }
}
