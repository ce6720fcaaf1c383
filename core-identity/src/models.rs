//! Resolution data model

use crate::strategy::Strategy;
use serde::{Deserialize, Serialize};

/// Upper bound on the number of candidates a resolution returns.
pub const MAX_RANKED_RESULTS: usize = 10;

/// One normalized, scored artist the caller can pick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    /// Catalog identifier. `None` means the record cannot be deduplicated.
    pub external_id: Option<String>,
    pub name: String,
    #[serde(rename = "type")]
    pub artist_type: String,
    pub country: String,
    pub disambiguation: String,
    /// Catalog score plus the boost of the strategy that produced the record
    pub catalog_score: u32,
    pub formed_year: Option<i32>,
    pub ended_year: Option<i32>,
    /// Textual similarity to the query; `None` until the relevance filter ran
    pub relevance_score: Option<u32>,
}

/// Which branch of the pipeline produced the final list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionPath {
    /// Strategies found candidates; they were filtered and ranked
    Strategies,
    /// Strategies found nothing; the unfiltered basic query answered
    FallbackSearch,
    /// Nothing was found anywhere (or the query was blank)
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StrategyStatus {
    Collected { count: usize },
    Failed { reason: String },
    Skipped,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategyReport {
    pub strategy: Strategy,
    pub status: StrategyStatus,
}

/// Ranked candidates plus how they were obtained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    /// Best match first, at most [`MAX_RANKED_RESULTS`] entries
    pub candidates: Vec<Candidate>,
    pub path: ResolutionPath,
    pub strategies: Vec<StrategyReport>,
}

impl Resolution {
    pub fn empty() -> Self {
        Self {
            candidates: Vec::new(),
            path: ResolutionPath::Empty,
            strategies: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Top-ranked candidate, for callers that auto-select
    pub fn best(&self) -> Option<&Candidate> {
        self.candidates.first()
    }
}
