//! Message contracts between the panel, the per-page scanner, and the
//! coordinator.
//!
//! The extension transport dispatched on free-form `action` strings; here each
//! direction is a tagged enum so dispatch is exhaustive at compile time. The
//! serialized form keeps the `action` tag and camelCase payload fields so the
//! records stay recognizable on the wire.

use crate::types::{AggregateStats, MatchKind, ScanResultPayload};
use serde::{Deserialize, Serialize};

/// Commands the panel sends to a per-page scanner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum ScannerCommand {
    /// Begin a scan session on the page.
    Start,
    /// Cancel the in-progress session and clear highlight styling.
    Stop,
    /// Scroll to and pulse the highlight at `index` within `kind`.
    #[serde(rename_all = "camelCase")]
    JumpToMatch {
        /// Kind whose highlight sequence is indexed
        kind: MatchKind,
        /// Zero-based position in the kind's accepted order
        index: usize,
    },
}

/// Events a scanner emits toward the coordinator and panel.
///
/// All emissions are fire-and-forget; no acknowledgment is expected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum ScannerEvent {
    /// Incremental progress update, 0-95.
    Progress {
        /// Integer percentage; the scanner never emits 100 itself
        percent: u8,
    },
    /// Final deduplicated result of a completed session.
    Result(ScanResultPayload),
}

/// Requests handled by the coordinator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum CoordinatorRequest {
    /// Fold a scan result into the stored aggregate.
    RecordResult(ScanResultPayload),
    /// Return aggregate counts and history.
    GetStats,
    /// Reset all aggregates and history to empty.
    ClearData,
}

/// Responses returned by the coordinator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum CoordinatorResponse {
    /// Result folded in; reports how many values were new.
    #[serde(rename_all = "camelCase")]
    Recorded {
        /// Number of values not previously in the aggregate
        new_values: usize,
    },
    /// Current aggregate statistics.
    Stats(AggregateStats),
    /// All stored data was reset.
    Cleared,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Timestamp;

    #[test]
    fn test_command_tag_shape() {
        let cmd = ScannerCommand::JumpToMatch {
            kind: MatchKind::Email,
            index: 2,
        };
        let json = serde_json::to_value(&cmd).expect("serialize command");
        assert_eq!(json["action"], "jumpToMatch");
        assert_eq!(json["kind"], "email");
        assert_eq!(json["index"], 2);
    }

    #[test]
    fn test_command_roundtrip() {
        for cmd in [
            ScannerCommand::Start,
            ScannerCommand::Stop,
            ScannerCommand::JumpToMatch {
                kind: MatchKind::Social,
                index: 0,
            },
        ] {
            let json = serde_json::to_string(&cmd).expect("serialize command");
            let back: ScannerCommand = serde_json::from_str(&json).expect("deserialize command");
            assert_eq!(back, cmd);
        }
    }

    #[test]
    fn test_progress_event_shape() {
        let event = ScannerEvent::Progress { percent: 47 };
        let json = serde_json::to_value(&event).expect("serialize event");
        assert_eq!(json["action"], "progress");
        assert_eq!(json["percent"], 47);
    }

    #[test]
    fn test_result_event_carries_payload() {
        let event = ScannerEvent::Result(ScanResultPayload {
            emails: vec!["a@b.com".to_string()],
            phones: vec![],
            socials: vec![],
            source_url: "https://example.com/page".to_string(),
            time: Timestamp::now(),
        });

        let json = serde_json::to_value(&event).expect("serialize event");
        assert_eq!(json["action"], "result");
        assert_eq!(json["emails"][0], "a@b.com");
    }

    #[test]
    fn test_coordinator_request_roundtrip() {
        let req = CoordinatorRequest::GetStats;
        let json = serde_json::to_string(&req).expect("serialize request");
        assert_eq!(json, r#"{"action":"getStats"}"#);

        let back: CoordinatorRequest = serde_json::from_str(&json).expect("deserialize request");
        assert_eq!(back, req);
    }
}
