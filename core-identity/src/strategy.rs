//! Multi-strategy catalog search
//!
//! Three queries of decreasing strictness, always in this order:
//!
//! | Strategy    | Query                                  | Boost | Limit | Runs when          |
//! |-------------|----------------------------------------|-------|-------|--------------------|
//! | Exact       | `"<name>"`                             | +20   | 5     | always             |
//! | FieldScoped | `artist:"<name>"`, then `artist:<name>` | +10   | 5     | < 5 collected      |
//! | Basic       | `<name>`                               | 0     | 8     | < 3 collected      |
//!
//! Gating looks at the running, not yet deduplicated, list. A strategy that
//! gets skipped might have surfaced a better match; that is accepted.
//!
//! Every strategy reports an explicit [`StrategyOutcome`]. Failures are
//! logged and contribute nothing; [`collect_outcome`] is the single place
//! that policy lives.

use crate::catalog::{CatalogClient, SearchGuard};
use crate::error::Result;
use crate::models::{Candidate, StrategyReport, StrategyStatus};
use crate::normalizer::normalize;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub const EXACT_BOOST: u32 = 20;
pub const FIELD_SCOPED_BOOST: u32 = 10;
pub const BASIC_BOOST: u32 = 0;

pub const EXACT_LIMIT: usize = 5;
pub const FIELD_SCOPED_LIMIT: usize = 5;
pub const BASIC_LIMIT: usize = 8;

/// Field-scoped search runs only while fewer candidates than this are collected
pub const FIELD_SCOPED_GATE: usize = 5;
/// Basic search runs only while fewer candidates than this are collected
pub const BASIC_GATE: usize = 3;

/// What a single strategy produced: normalized candidates or the reason it failed.
pub type StrategyOutcome = Result<Vec<Candidate>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    Exact,
    FieldScoped,
    Basic,
}

impl Strategy {
    /// Execution order
    pub const ALL: [Strategy; 3] = [Strategy::Exact, Strategy::FieldScoped, Strategy::Basic];

    pub fn boost(self) -> u32 {
        match self {
            Strategy::Exact => EXACT_BOOST,
            Strategy::FieldScoped => FIELD_SCOPED_BOOST,
            Strategy::Basic => BASIC_BOOST,
        }
    }

    pub fn limit(self) -> usize {
        match self {
            Strategy::Exact => EXACT_LIMIT,
            Strategy::FieldScoped => FIELD_SCOPED_LIMIT,
            Strategy::Basic => BASIC_LIMIT,
        }
    }

    /// Whether the strategy runs given how many candidates are already collected.
    pub fn should_run(self, collected: usize) -> bool {
        match self {
            Strategy::Exact => true,
            Strategy::FieldScoped => collected < FIELD_SCOPED_GATE,
            Strategy::Basic => collected < BASIC_GATE,
        }
    }

    /// Catalog queries to try, in order. Later queries are retries used only
    /// when the earlier ones returned no records.
    pub fn queries(self, name: &str) -> Vec<String> {
        match self {
            Strategy::Exact => vec![format!("\"{}\"", escape_phrase(name))],
            Strategy::FieldScoped => vec![
                format!("artist:\"{}\"", escape_phrase(name)),
                format!("artist:{}", name),
            ],
            Strategy::Basic => vec![name.to_string()],
        }
    }
}

/// Escape the characters that would terminate a quoted phrase.
fn escape_phrase(name: &str) -> String {
    name.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Fold one outcome into the running list and describe what happened.
pub fn collect_outcome(
    collected: &mut Vec<Candidate>,
    strategy: Strategy,
    outcome: StrategyOutcome,
) -> StrategyReport {
    let status = match outcome {
        Ok(candidates) => {
            let count = candidates.len();
            collected.extend(candidates);
            StrategyStatus::Collected { count }
        }
        Err(err) => {
            warn!(strategy = ?strategy, error = %err, "Strategy failed, continuing");
            StrategyStatus::Failed {
                reason: err.to_string(),
            }
        }
    };

    StrategyReport { strategy, status }
}

/// Runs the strategies against one catalog for one query.
pub struct StrategyRunner<'a> {
    catalog: &'a dyn CatalogClient,
    guard: &'a SearchGuard,
}

impl<'a> StrategyRunner<'a> {
    pub fn new(catalog: &'a dyn CatalogClient, guard: &'a SearchGuard) -> Self {
        Self { catalog, guard }
    }

    /// Unfiltered candidates from every strategy that ran, duplicates included.
    pub async fn run_strategies(&self, query: &str) -> Vec<Candidate> {
        self.run_with_reports(query).await.0
    }

    /// Same as [`run_strategies`](Self::run_strategies), plus one report per strategy.
    pub async fn run_with_reports(&self, query: &str) -> (Vec<Candidate>, Vec<StrategyReport>) {
        let mut collected = Vec::new();
        let mut reports = Vec::with_capacity(Strategy::ALL.len());

        for strategy in Strategy::ALL {
            if !strategy.should_run(collected.len()) {
                debug!(
                    strategy = ?strategy,
                    collected = collected.len(),
                    "Skipping strategy, enough candidates collected"
                );
                reports.push(StrategyReport {
                    strategy,
                    status: StrategyStatus::Skipped,
                });
                continue;
            }

            let outcome = self.run_strategy(strategy, query).await;
            reports.push(collect_outcome(&mut collected, strategy, outcome));
        }

        (collected, reports)
    }

    async fn run_strategy(&self, strategy: Strategy, query: &str) -> StrategyOutcome {
        let mut last: StrategyOutcome = Ok(Vec::new());

        for catalog_query in strategy.queries(query) {
            debug!(strategy = ?strategy, query = %catalog_query, "Searching catalog");

            match self
                .guard
                .search(self.catalog, &catalog_query, strategy.limit())
                .await
            {
                Ok(records) if !records.is_empty() => {
                    return Ok(records
                        .iter()
                        .map(|record| normalize(record, strategy.boost()))
                        .collect());
                }
                Ok(_) => last = Ok(Vec::new()),
                Err(err) => last = Err(err),
            }
        }

        last
    }
}
