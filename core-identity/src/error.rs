use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IdentityError {
    #[error("Catalog unavailable: {0}")]
    CatalogUnavailable(String),

    #[error("HTTP error {status}: {body}")]
    HttpError { status: u16, body: String },

    #[error("Rate limited by {provider}, retry after {retry_after_seconds}s")]
    RateLimited {
        provider: String,
        retry_after_seconds: u64,
    },

    #[error("Malformed catalog response: {0}")]
    MalformedResponse(String),

    #[error("Catalog call timed out after {0:?}")]
    Timeout(Duration),

    #[error("Catalog call cancelled")]
    Cancelled,

    #[error("Bridge error: {0}")]
    Bridge(#[from] bridge_traits::error::BridgeError),

    #[error("Configuration error: {0}")]
    Config(#[from] core_runtime::Error),
}

pub type Result<T> = std::result::Result<T, IdentityError>;
