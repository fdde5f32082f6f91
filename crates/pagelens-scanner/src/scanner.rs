//! The per-page scan engine: snapshot, classify, annotate, report.

use crate::annotator::{self, AcceptedMatch, NEUTRAL_STYLE, PULSE_STYLE};
use crate::classifier::PatternClassifier;
use crate::error::Result;
use crate::resolver;
use crate::session::ScanSession;
use pagelens_core::{
    AppConfig, MatchKind, ScanConfig, ScannerCommand, ScannerEvent, Timestamp,
};
use pagelens_dom::{NodeId, PageDocument};
use tokio::sync::mpsc::UnboundedSender;
use tokio_util::sync::CancellationToken;

/// Whether a scan pass is currently in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Idle,
    Running,
}

/// Scans one document for contact identifiers and annotates matches in place.
///
/// A scanner owns its document and exactly one session at a time. Starting a
/// new session replaces the previous session's state; stopping cancels the
/// in-flight pass cooperatively and neutralizes highlight styling without
/// removing the markers from the tree.
#[derive(Debug)]
pub struct PageScanner {
    document: PageDocument,
    session: ScanSession,
    classifier: PatternClassifier,
    state: ScanState,
    cancel: CancellationToken,
    scan: ScanConfig,
    events: UnboundedSender<ScannerEvent>,
}

impl PageScanner {
    /// Create a scanner over a parsed document.
    ///
    /// # Errors
    /// Returns `ScanError::Pattern` if the configured social allow-list does
    /// not compile into a valid pattern.
    pub fn new(
        document: PageDocument,
        config: &AppConfig,
        events: UnboundedSender<ScannerEvent>,
    ) -> Result<Self> {
        Ok(Self {
            document,
            session: ScanSession::new(),
            classifier: PatternClassifier::new(&config.patterns)?,
            state: ScanState::Idle,
            cancel: CancellationToken::new(),
            scan: config.scan.clone(),
            events,
        })
    }

    /// Dispatch one command from the panel.
    pub async fn handle_command(&mut self, command: ScannerCommand) -> Result<()> {
        match command {
            ScannerCommand::Start => self.start().await,
            ScannerCommand::Stop => {
                self.stop();
                Ok(())
            }
            ScannerCommand::JumpToMatch { kind, index } => {
                self.jump_to_match(kind, index);
                Ok(())
            }
        }
    }

    /// Run a full scan pass over the document.
    ///
    /// Ignored if a pass is already running. A fresh session replaces any
    /// previous one, so repeated starts re-scan from scratch. The scanner is
    /// back in the idle state when this returns, whether the pass completed
    /// or was cancelled.
    pub async fn start(&mut self) -> Result<()> {
        if self.state == ScanState::Running {
            tracing::debug!("scan already in progress, start ignored");
            return Ok(());
        }
        if self.cancel.is_cancelled() {
            self.cancel = CancellationToken::new();
        }
        self.session = ScanSession::new();
        self.state = ScanState::Running;
        tracing::info!(
            url = self.document.url(),
            session = %self.session.id(),
            "scan started"
        );

        let outcome = self.run_pass().await;
        self.state = ScanState::Idle;
        outcome
    }

    /// Cancel the in-flight pass, if any, and neutralize highlight styling.
    ///
    /// Markers stay in the tree so the page text keeps its structure; only
    /// the visual emphasis is removed.
    pub fn stop(&mut self) {
        self.cancel.cancel();
        self.clear_highlight_styles();
    }

    /// Pulse the highlight at `index` within `kind` and tag it as the scroll
    /// target. Silent no-op when no such highlight exists.
    pub fn jump_to_match(&mut self, kind: MatchKind, index: usize) {
        let Some(id) = self.session.highlight_ref(kind, index) else {
            tracing::debug!(kind = kind.as_str(), index, "no highlight at index");
            return;
        };
        if self.document.set_attr(id, "style", PULSE_STYLE).is_err() {
            return;
        }
        let _ = self.document.set_attr(id, "data-scroll-target", "true");
    }

    /// A handle that cancels the current pass when triggered.
    #[must_use]
    pub fn cancel_flag(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// The document being scanned.
    #[must_use]
    pub fn document(&self) -> &PageDocument {
        &self.document
    }

    /// The current session's recorded state.
    #[must_use]
    pub fn session(&self) -> &ScanSession {
        &self.session
    }

    /// Whether a pass is currently running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state == ScanState::Running
    }

    async fn run_pass(&mut self) -> Result<()> {
        let nodes = self.document.text_nodes();
        let total = nodes.len();
        let interval = self.scan.progress_sample_interval.max(1);
        let yield_every = self.scan.yield_every_nodes.max(1);

        for (index, node) in nodes.into_iter().enumerate() {
            if self.cancel.is_cancelled() {
                tracing::info!(processed = index, total, "scan cancelled");
                self.clear_highlight_styles();
                return Ok(());
            }

            if index % interval == 0 {
                self.emit(ScannerEvent::Progress {
                    percent: progress_percent(index, total),
                });
            }

            // A stale or reparented node is a skip, never a failed scan.
            if let Err(err) = self.process_node(node) {
                tracing::warn!(%err, "skipping text node");
            }

            if (index + 1) % yield_every == 0 {
                tokio::task::yield_now().await;
            }
        }

        // A stop arriving during the yield after the last node lands here.
        if self.cancel.is_cancelled() {
            tracing::info!(processed = total, total, "scan cancelled");
            self.clear_highlight_styles();
            return Ok(());
        }

        self.emit(ScannerEvent::Progress { percent: 95 });
        self.scan_link_targets();

        let payload = self
            .session
            .result_payload(self.document.url(), Timestamp::now());
        tracing::info!(
            emails = payload.emails.len(),
            phones = payload.phones.len(),
            socials = payload.socials.len(),
            "scan complete"
        );
        self.emit(ScannerEvent::Result(payload));
        Ok(())
    }

    /// Classify one text node, resolve overlaps, deduplicate against the
    /// session, and annotate whatever survives.
    fn process_node(&mut self, node: NodeId) -> Result<()> {
        let text = self.document.node_text(node)?.to_string();
        let candidates = self.classifier.classify(&text);
        if candidates.is_empty() {
            return Ok(());
        }

        let mut next_index = [
            self.session.highlight_count(MatchKind::Email),
            self.session.highlight_count(MatchKind::Phone),
            self.session.highlight_count(MatchKind::Social),
        ];

        let mut accepted = Vec::new();
        for m in resolver::resolve(candidates) {
            // One highlight per distinct value: repeats are not re-annotated.
            if !self.session.record(m.kind, &m.value) {
                continue;
            }
            let slot = kind_slot(m.kind);
            let kind_index = next_index[slot];
            next_index[slot] += 1;
            accepted.push(AcceptedMatch {
                inner: m,
                kind_index,
            });
        }

        if accepted.is_empty() {
            return Ok(());
        }

        let markers = annotator::annotate(&mut self.document, node, &accepted)?;
        for (mark, marker_id) in accepted.iter().zip(markers) {
            self.session.attach_highlight(mark.inner.kind, marker_id);
        }
        Ok(())
    }

    /// Record social-profile link destinations that never appear as visible
    /// text. Record-only: hyperlink targets get no highlight marker.
    fn scan_link_targets(&mut self) {
        for (_, href) in self.document.links() {
            let Some(resolved) = self.document.resolve_href(&href) else {
                continue;
            };
            if let Some(value) = self.classifier.classify_social_url(&resolved) {
                if self.session.record(MatchKind::Social, &value) {
                    tracing::debug!(value, "recorded social link target");
                }
            }
        }
    }

    fn clear_highlight_styles(&mut self) {
        for id in self.session.all_highlights() {
            // Stale handles are fine here; a marker that is gone needs no
            // styling change.
            let _ = self.document.set_attr(id, "style", NEUTRAL_STYLE);
        }
    }

    fn emit(&self, event: ScannerEvent) {
        if self.events.send(event).is_err() {
            tracing::warn!("event channel closed, dropping scanner event");
        }
    }
}

fn kind_slot(kind: MatchKind) -> usize {
    match kind {
        MatchKind::Email => 0,
        MatchKind::Phone => 1,
        MatchKind::Social => 2,
    }
}

fn progress_percent(processed: usize, total: usize) -> u8 {
    if total == 0 {
        return 95;
    }
    u8::try_from((processed * 95 / total).min(95)).unwrap_or(95)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    fn scanner_for(html: &str) -> (PageScanner, mpsc::UnboundedReceiver<ScannerEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let doc = PageDocument::parse(html, "https://example.com/page");
        let scanner =
            PageScanner::new(doc, &AppConfig::default(), tx).expect("build scanner");
        (scanner, rx)
    }

    fn drain(rx: &mut mpsc::UnboundedReceiver<ScannerEvent>) -> Vec<ScannerEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    #[test]
    fn test_progress_percent_bounds() {
        assert_eq!(progress_percent(0, 10), 0);
        assert_eq!(progress_percent(5, 10), 47);
        assert_eq!(progress_percent(10, 10), 95);
        assert_eq!(progress_percent(0, 0), 95);
    }

    #[tokio::test]
    async fn test_single_pass_emits_result() {
        let (mut scanner, mut rx) =
            scanner_for("<p>Contact a@b.com or call 555-123-4567 today</p>");

        scanner.start().await.expect("scan");
        assert!(!scanner.is_running());

        let events = drain(&mut rx);
        let result = events
            .iter()
            .find_map(|event| match event {
                ScannerEvent::Result(payload) => Some(payload.clone()),
                ScannerEvent::Progress { .. } => None,
            })
            .expect("result event");

        assert_eq!(result.emails, ["a@b.com"]);
        assert_eq!(result.phones, ["555-123-4567"]);
        assert!(result.socials.is_empty());
        assert_eq!(result.source_url, "https://example.com/page");
    }

    #[tokio::test]
    async fn test_empty_document_still_reports() {
        let (mut scanner, mut rx) = scanner_for("<body></body>");

        scanner.start().await.expect("scan");

        let events = drain(&mut rx);
        assert!(matches!(
            events[0],
            ScannerEvent::Progress { percent: 95 }
        ));
        match &events[1] {
            ScannerEvent::Result(payload) => assert_eq!(payload.total(), 0),
            other => panic!("expected result event, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_duplicate_value_highlighted_once() {
        let (mut scanner, mut rx) = scanner_for(
            "<p>write a@b.com</p><p>again a@b.com</p><p>also c@d.com</p>",
        );

        scanner.start().await.expect("scan");

        let events = drain(&mut rx);
        let result = events
            .iter()
            .find_map(|event| match event {
                ScannerEvent::Result(payload) => Some(payload.clone()),
                ScannerEvent::Progress { .. } => None,
            })
            .expect("result event");

        assert_eq!(result.emails, ["a@b.com", "c@d.com"]);
        assert_eq!(scanner.session().highlight_count(MatchKind::Email), 2);

        // The second occurrence stays plain text.
        let html = scanner.document().to_html();
        assert_eq!(html.matches("data-value=\"a@b.com\"").count(), 1);
    }

    #[tokio::test]
    async fn test_link_targets_recorded_without_markers() {
        let (mut scanner, mut rx) = scanner_for(
            r#"<p>find us online</p><a href="https://facebook.com/ourpage">here</a>"#,
        );

        scanner.start().await.expect("scan");

        let events = drain(&mut rx);
        let result = events
            .iter()
            .find_map(|event| match event {
                ScannerEvent::Result(payload) => Some(payload.clone()),
                ScannerEvent::Progress { .. } => None,
            })
            .expect("result event");

        assert_eq!(result.socials, ["https://facebook.com/ourpage"]);
        assert_eq!(scanner.session().highlight_count(MatchKind::Social), 0);
    }

    #[tokio::test]
    async fn test_jump_to_match_out_of_range_is_a_no_op() {
        let (mut scanner, _rx) = scanner_for("<p>write a@b.com</p>");
        scanner.start().await.expect("scan");

        let before = scanner.document().to_html();
        scanner.jump_to_match(MatchKind::Email, 5);
        scanner.jump_to_match(MatchKind::Phone, 0);
        assert_eq!(scanner.document().to_html(), before);
    }

    #[tokio::test]
    async fn test_jump_to_match_pulses_target() {
        let (mut scanner, _rx) = scanner_for("<p>a@b.com and c@d.com</p>");
        scanner.start().await.expect("scan");

        scanner.jump_to_match(MatchKind::Email, 1);

        let target = scanner
            .session()
            .highlight_ref(MatchKind::Email, 1)
            .expect("second highlight");
        let doc = scanner.document();
        assert_eq!(doc.attr(target, "style").expect("marker"), Some(PULSE_STYLE));
        assert_eq!(
            doc.attr(target, "data-scroll-target").expect("marker"),
            Some("true")
        );
        assert_eq!(
            doc.attr(target, "data-value").expect("marker"),
            Some("c@d.com")
        );
    }

    #[tokio::test]
    async fn test_restart_replaces_session() {
        let (mut scanner, mut rx) = scanner_for("<p>write a@b.com</p>");

        scanner.start().await.expect("first scan");
        let first_id = scanner.session().id().clone();
        drain(&mut rx);

        scanner.start().await.expect("second scan");
        assert_ne!(scanner.session().id(), &first_id);

        // The value is new again under the fresh session.
        let events = drain(&mut rx);
        let result = events
            .iter()
            .find_map(|event| match event {
                ScannerEvent::Result(payload) => Some(payload.clone()),
                ScannerEvent::Progress { .. } => None,
            })
            .expect("result event");
        assert_eq!(result.emails, ["a@b.com"]);
    }
}
