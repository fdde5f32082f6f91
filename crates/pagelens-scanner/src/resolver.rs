//! Overlap resolution for candidate matches within one text node.

use pagelens_core::TextMatch;

/// Select a non-overlapping subset of candidates, first-match-wins.
///
/// Candidates are stable-sorted by start offset, so ties keep the classifier's
/// discovery order (email, then phone, then social). A greedy leftmost cursor
/// scan then accepts a candidate iff it begins at or after the end of the last
/// accepted one; later-starting overlapping candidates never preempt an
/// earlier accepted match. Rejections are silent drops.
#[must_use]
pub fn resolve(mut candidates: Vec<TextMatch>) -> Vec<TextMatch> {
    candidates.sort_by_key(|candidate| candidate.start);

    let mut accepted = Vec::with_capacity(candidates.len());
    let mut cursor = 0;

    for candidate in candidates {
        if candidate.start >= cursor {
            cursor = candidate.end;
            accepted.push(candidate);
        }
    }

    accepted
}
