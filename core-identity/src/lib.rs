//! # Artist Identity Module
//!
//! Turns a free-text artist name into a ranked list of catalog candidates.
//!
//! ## Overview
//!
//! This module handles:
//! - Strategy-driven catalog querying (exact phrase, field-scoped, basic)
//! - Record normalization and deduplication
//! - Name relevance scoring with adaptive thresholds
//! - Weighted ranking of the survivors
//! - MusicBrainz catalog access (optional, feature-gated)
//!
//! Resolution never fails. Catalog errors, timeouts and cancellation shrink
//! the candidate list, possibly to nothing.

pub mod catalog;
pub mod dedupe;
pub mod error;
pub mod fallback;
pub mod models;
pub mod normalizer;
pub mod providers;
pub mod ranker;
pub mod relevance;
pub mod resolver;
pub mod strategy;

pub use catalog::{CatalogClient, RawRecord, SearchGuard};
pub use error::{IdentityError, Result};
pub use models::{
    Candidate, Resolution, ResolutionPath, StrategyReport, StrategyStatus, MAX_RANKED_RESULTS,
};
pub use resolver::ArtistResolver;
pub use strategy::Strategy;

#[cfg(feature = "musicbrainz")]
pub use providers::MusicBrainzCatalog;
