use crate::models::{Candidate, MAX_RANKED_RESULTS};

pub const RELEVANCE_WEIGHT: f64 = 1.5;
pub const CATALOG_WEIGHT: f64 = 0.5;

/// Ordering key: relevance dominates, catalog score breaks near-ties.
pub fn combined_score(candidate: &Candidate) -> f64 {
    f64::from(candidate.relevance_score.unwrap_or(0)) * RELEVANCE_WEIGHT
        + f64::from(candidate.catalog_score) * CATALOG_WEIGHT
}

/// Best first, at most [`MAX_RANKED_RESULTS`]. Equal keys keep their input order.
pub fn rank(mut candidates: Vec<Candidate>) -> Vec<Candidate> {
    candidates.sort_by(|a, b| combined_score(b).total_cmp(&combined_score(a)));
    candidates.truncate(MAX_RANKED_RESULTS);
    candidates
}
