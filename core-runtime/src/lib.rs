//! # Core Runtime Module
//!
//! Runtime infrastructure shared by the identity resolver crates:
//! - Logging and tracing setup
//! - Resolver and catalog API configuration
//!
//! Hosts build a [`ResolverConfig`](config::ResolverConfig), call
//! [`init_logging`](logging::init_logging) once at startup, and hand the
//! config to `core_identity::ArtistResolver::from_config`.

pub mod config;
pub mod error;
pub mod logging;

pub use error::{Error, Result};
