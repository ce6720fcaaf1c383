use crate::models::Candidate;
use std::collections::HashSet;

/// Drop later candidates whose catalog id was already seen.
///
/// First occurrence wins, so Exact-strategy hits (highest boost, searched
/// first) shadow their lower-boosted repeats. Candidates without an id are
/// always kept and never compared with each other.
pub fn dedupe(candidates: Vec<Candidate>) -> Vec<Candidate> {
    let mut seen_ids: HashSet<String> = HashSet::new();

    candidates
        .into_iter()
        .filter(|candidate| match &candidate.external_id {
            Some(id) => seen_ids.insert(id.clone()),
            None => true,
        })
        .collect()
}
