//! # Host Bridge Traits
//!
//! Capabilities the identity resolver needs from its host but does not
//! implement itself.
//!
//! ## Traits
//!
//! - [`HttpClient`](http::HttpClient) - Async HTTP transport used by catalog adapters
//! - [`Clock`](time::Clock) - Time source, injectable for deterministic tests
//! - [`LoggerSink`](time::LoggerSink) - Forward structured logs to host logging
//!
//! ## Error Handling
//!
//! Every bridge operation reports failures as [`BridgeError`](error::BridgeError).
//! Host implementations should convert their native errors into it and keep the
//! message actionable (URL, status, what was attempted).
//!
//! ## Thread Safety
//!
//! All bridge traits require `Send + Sync` so a single adapter can be shared
//! behind an `Arc` by every resolver instance.
//!
//! ## Implementing HttpClient
//!
//! ```ignore
//! use bridge_traits::http::{HttpClient, HttpRequest, HttpResponse};
//! use bridge_traits::error::Result;
//! use async_trait::async_trait;
//!
//! pub struct ReqwestClient {
//!     client: reqwest::Client,
//! }
//!
//! #[async_trait]
//! impl HttpClient for ReqwestClient {
//!     async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
//!         // Translate HttpRequest into a reqwest call
//!         todo!()
//!     }
//! }
//! ```

pub mod error;
pub mod http;
pub mod time;

pub use error::BridgeError;

pub use http::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
pub use time::{Clock, LogEntry, LogLevel, LoggerSink, SystemClock};
