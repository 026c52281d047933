//! Proposal filtering and candidate selection.

use std::collections::HashSet;

use crate::verifier::VerificationStatus;
use crate::vocabulary::{WordEntry, normalize_key};

/// Whether a first-pass proposal is worth verifying.
///
/// It must be non-blank and differ from the original beyond letter case.
pub fn usable_proposal(entry: &WordEntry, proposal: &str) -> Option<String> {
    let trimmed = proposal.trim();
    if trimmed.is_empty() || normalize_key(trimmed) == entry.normalized_text {
        return None;
    }
    Some(trimmed.to_string())
}

/// Clean a raw candidate list: trim, drop blanks, the original and duplicates,
/// keep generator order, and cap the list at `max_candidates`.
pub fn filter_candidates(entry: &WordEntry, raw: Vec<String>, max_candidates: usize) -> Vec<String> {
    let mut seen = HashSet::new();
    raw.into_iter()
        .filter_map(|candidate| usable_proposal(entry, &candidate))
        .filter(|candidate| seen.insert(normalize_key(candidate)))
        .take(max_candidates)
        .collect()
}

/// Pick the confirmed candidate with the shortest normalized length, earliest
/// generator position first on ties. Returns its index.
///
/// ```
/// use wordbook::corrector::selection::select_candidate;
/// use wordbook::verifier::VerificationStatus::{Confirmed, Failed};
///
/// let candidates = vec!["supersystem".to_string(), "system".to_string(), "super".to_string()];
/// let statuses = vec![Failed, Confirmed, Confirmed];
/// assert_eq!(select_candidate(&candidates, &statuses), Some(2));
/// ```
pub fn select_candidate(candidates: &[String], statuses: &[VerificationStatus]) -> Option<usize> {
    candidates
        .iter()
        .zip(statuses)
        .enumerate()
        .filter(|(_, (_, status))| status.is_confirmed())
        .min_by_key(|(index, (candidate, _))| (normalize_key(candidate).chars().count(), *index))
        .map(|(index, _)| index)
}
