//! Name relevance scoring and adaptive thresholding
//!
//! Scores compare the query and the candidate name case-insensitively, word
//! by word. The weights below are empirical.

use crate::models::Candidate;
use std::collections::HashSet;

pub const EXACT_MATCH_SCORE: f64 = 100.0;
pub const SUBSET_MATCH_SCORE: f64 = 80.0;
/// Multiplied by the fraction of query words found in the name
pub const OVERLAP_WEIGHT: f64 = 60.0;
pub const FIRST_WORD_BONUS: f64 = 10.0;
pub const SUBSTRING_SCORE: f64 = 20.0;

/// Extra name words tolerated before the length penalty applies
pub const EXTRA_WORD_ALLOWANCE: usize = 2;
pub const EXTRA_WORD_PENALTY: f64 = 3.0;

pub const ARTIST_TYPES: &[&str] = &["person", "group", "band"];
pub const ARTIST_TYPE_BONUS: f64 = 5.0;

pub const ANCIENT_YEAR: i32 = 1700;
pub const ANCIENT_YEAR_PENALTY: f64 = 15.0;
pub const COMPOSER_YEAR: i32 = 1900;
pub const COMPOSER_PENALTY: f64 = 10.0;

/// Pools smaller than this use the lenient threshold
pub const SMALL_POOL_SIZE: usize = 5;
pub const LENIENT_THRESHOLD: u32 = 15;
pub const STRICT_THRESHOLD: u32 = 25;
/// Second chance when the primary threshold keeps nobody
pub const RELAXED_THRESHOLD: u32 = 10;
/// How many candidates survive by catalog score alone when relevance keeps nobody
pub const CATALOG_FALLBACK_COUNT: usize = 3;

/// Minimum relevance a candidate needs in a pool of `pool_size`.
pub fn threshold_for(pool_size: usize) -> u32 {
    if pool_size < SMALL_POOL_SIZE {
        LENIENT_THRESHOLD
    } else {
        STRICT_THRESHOLD
    }
}

/// Relevance of one candidate to the query; 0 when the name shares nothing with it.
pub fn relevance_score(candidate: &Candidate, query: &str) -> u32 {
    let query_lower = query.trim().to_lowercase();
    let name_lower = candidate.name.trim().to_lowercase();

    let query_tokens: Vec<&str> = query_lower.split_whitespace().collect();
    let name_tokens: Vec<&str> = name_lower.split_whitespace().collect();
    let query_words: HashSet<&str> = query_tokens.iter().copied().collect();
    let name_words: HashSet<&str> = name_tokens.iter().copied().collect();

    let mut score = 0.0;

    if name_lower == query_lower {
        score += EXACT_MATCH_SCORE;
    } else if !query_words.is_empty() && query_words.is_subset(&name_words) {
        score += SUBSET_MATCH_SCORE;
    } else {
        let common = query_words.intersection(&name_words).count();
        if common > 0 {
            score += OVERLAP_WEIGHT * common as f64 / query_words.len() as f64;
            if query_tokens
                .first()
                .is_some_and(|first| name_words.contains(first))
            {
                score += FIRST_WORD_BONUS;
            }
        } else if name_lower.contains(&query_lower) || query_lower.contains(&name_lower) {
            score += SUBSTRING_SCORE;
        } else {
            return 0;
        }
    }

    let extra_words = name_tokens.len().saturating_sub(query_tokens.len());
    if extra_words > EXTRA_WORD_ALLOWANCE {
        score -= EXTRA_WORD_PENALTY * extra_words as f64;
    }

    let type_lower = candidate.artist_type.trim().to_lowercase();
    if ARTIST_TYPES.contains(&type_lower.as_str()) {
        score += ARTIST_TYPE_BONUS;
    }

    if let Some(year) = candidate.formed_year {
        if year < ANCIENT_YEAR {
            score -= ANCIENT_YEAR_PENALTY;
        } else if year < COMPOSER_YEAR && type_lower.contains("composer") {
            score -= COMPOSER_PENALTY;
        }
    }

    if score <= 0.0 {
        0
    } else {
        score.trunc() as u32
    }
}

/// Score every candidate and keep the relevant ones.
///
/// Keeps candidates at or above [`threshold_for`] the pool size. If that
/// keeps nobody, retries at [`RELAXED_THRESHOLD`]; if that also keeps nobody,
/// returns the [`CATALOG_FALLBACK_COUNT`] best candidates by catalog score.
/// Only an empty input yields an empty output.
pub fn filter(candidates: Vec<Candidate>, query: &str) -> Vec<Candidate> {
    if candidates.is_empty() {
        return Vec::new();
    }

    let threshold = threshold_for(candidates.len());
    let scored: Vec<Candidate> = candidates
        .into_iter()
        .map(|mut candidate| {
            candidate.relevance_score = Some(relevance_score(&candidate, query));
            candidate
        })
        .collect();

    for minimum in [threshold, RELAXED_THRESHOLD] {
        let kept = keep_at_least(&scored, minimum);
        if !kept.is_empty() {
            return kept;
        }
    }

    let mut by_catalog = scored;
    by_catalog.sort_by(|a, b| b.catalog_score.cmp(&a.catalog_score));
    by_catalog.truncate(CATALOG_FALLBACK_COUNT);
    by_catalog
}

fn keep_at_least(candidates: &[Candidate], minimum: u32) -> Vec<Candidate> {
    candidates
        .iter()
        .filter(|candidate| candidate.relevance_score.unwrap_or(0) >= minimum)
        .cloned()
        .collect()
}
