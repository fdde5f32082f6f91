//! Per-scan session state: deduplicated values and highlight handles.

use pagelens_core::{MatchKind, ScanResultPayload, SessionId, Timestamp};
use pagelens_dom::NodeId;
use std::collections::HashSet;

/// Insertion-ordered, deduplicated record for one kind.
#[derive(Debug, Default)]
struct KindRecord {
    order: Vec<String>,
    seen: HashSet<String>,
    highlights: Vec<NodeId>,
}

/// One cancellable scan pass over a document.
///
/// The session owns global deduplication: a value already recorded under its
/// kind is never re-emitted or re-highlighted, even when it reoccurs in later
/// nodes. Highlight handles live only as long as the document they point into;
/// a restart replaces the whole session.
#[derive(Debug)]
pub struct ScanSession {
    id: SessionId,
    emails: KindRecord,
    phones: KindRecord,
    socials: KindRecord,
}

impl ScanSession {
    /// Create a fresh session with empty state.
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: SessionId::generate(),
            emails: KindRecord::default(),
            phones: KindRecord::default(),
            socials: KindRecord::default(),
        }
    }

    /// The session identifier.
    #[must_use]
    pub fn id(&self) -> &SessionId {
        &self.id
    }

    /// Record a value under its kind.
    ///
    /// Returns `true` if the value was new; `false` means it was already
    /// recorded and the caller must skip highlighting it.
    pub fn record(&mut self, kind: MatchKind, value: &str) -> bool {
        let record = self.record_mut(kind);
        if record.seen.contains(value) {
            return false;
        }
        record.seen.insert(value.to_string());
        record.order.push(value.to_string());
        true
    }

    /// Attach a highlight element handle to a kind's accepted order.
    ///
    /// Returns the index the highlight occupies within its kind.
    pub fn attach_highlight(&mut self, kind: MatchKind, node: NodeId) -> usize {
        let record = self.record_mut(kind);
        record.highlights.push(node);
        record.highlights.len() - 1
    }

    /// Number of highlights attached for a kind so far.
    #[must_use]
    pub fn highlight_count(&self, kind: MatchKind) -> usize {
        self.record_ref(kind).highlights.len()
    }

    /// Look up the highlight handle at `index` within a kind.
    #[must_use]
    pub fn highlight_ref(&self, kind: MatchKind, index: usize) -> Option<NodeId> {
        self.record_ref(kind).highlights.get(index).copied()
    }

    /// All highlight handles across kinds, in per-kind acceptance order.
    #[must_use]
    pub fn all_highlights(&self) -> Vec<NodeId> {
        MatchKind::ALL
            .iter()
            .flat_map(|kind| self.record_ref(*kind).highlights.iter().copied())
            .collect()
    }

    /// Recorded values for a kind, in the order first seen.
    #[must_use]
    pub fn values(&self, kind: MatchKind) -> &[String] {
        &self.record_ref(kind).order
    }

    /// Build the final result payload from the session's recorded values.
    #[must_use]
    pub fn result_payload(&self, source_url: &str, time: Timestamp) -> ScanResultPayload {
        ScanResultPayload {
            emails: self.emails.order.clone(),
            phones: self.phones.order.clone(),
            socials: self.socials.order.clone(),
            source_url: source_url.to_string(),
            time,
        }
    }

    fn record_ref(&self, kind: MatchKind) -> &KindRecord {
        match kind {
            MatchKind::Email => &self.emails,
            MatchKind::Phone => &self.phones,
            MatchKind::Social => &self.socials,
        }
    }

    fn record_mut(&mut self, kind: MatchKind) -> &mut KindRecord {
        match kind {
            MatchKind::Email => &mut self.emails,
            MatchKind::Phone => &mut self.phones,
            MatchKind::Social => &mut self.socials,
        }
    }
}

impl Default for ScanSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_deduplicates_per_kind() {
        let mut session = ScanSession::new();

        assert!(session.record(MatchKind::Email, "a@b.com"));
        assert!(!session.record(MatchKind::Email, "a@b.com"));
        assert!(session.record(MatchKind::Email, "c@d.com"));

        assert_eq!(session.values(MatchKind::Email), ["a@b.com", "c@d.com"]);
    }

    #[test]
    fn test_kinds_do_not_share_dedup_state() {
        let mut session = ScanSession::new();

        assert!(session.record(MatchKind::Email, "12345678"));
        assert!(session.record(MatchKind::Phone, "12345678"));
    }

    #[test]
    fn test_values_keep_insertion_order() {
        let mut session = ScanSession::new();
        for value in ["z@z.com", "a@a.com", "m@m.com"] {
            session.record(MatchKind::Email, value);
        }
        assert_eq!(
            session.values(MatchKind::Email),
            ["z@z.com", "a@a.com", "m@m.com"]
        );
    }

    #[test]
    fn test_payload_mirrors_session() {
        let mut session = ScanSession::new();
        session.record(MatchKind::Email, "a@b.com");
        session.record(MatchKind::Social, "https://x.com/handle");

        let payload = session.result_payload("https://example.com/", Timestamp::now());
        assert_eq!(payload.emails, ["a@b.com"]);
        assert!(payload.phones.is_empty());
        assert_eq!(payload.socials, ["https://x.com/handle"]);
        assert_eq!(payload.source_url, "https://example.com/");
    }

    #[test]
    fn test_highlight_lookup() {
        use pagelens_dom::PageDocument;

        let doc = PageDocument::parse("<p>x</p>", "https://example.com/");
        let node = doc.text_nodes()[0];

        let mut session = ScanSession::new();
        assert_eq!(session.attach_highlight(MatchKind::Email, node), 0);
        assert_eq!(session.highlight_count(MatchKind::Email), 1);
        assert_eq!(session.highlight_ref(MatchKind::Email, 0), Some(node));
        assert_eq!(session.highlight_ref(MatchKind::Email, 1), None);
        assert_eq!(session.highlight_ref(MatchKind::Phone, 0), None);
    }
}
