//! Shared types used across the Pagelens workspace.
//!
//! This module defines the common newtypes and enums that provide type safety
//! and clear domain modeling for matches, sessions, and aggregate statistics.

use crate::error::PagelensError;
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// The category of an extracted contact identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    /// Email address
    Email,
    /// Phone number
    Phone,
    /// Social-profile link
    Social,
}

impl MatchKind {
    /// All kinds in classifier evaluation order (email, phone, social).
    ///
    /// The order matters: the overlap resolver breaks start-offset ties by
    /// discovery order, which follows this sequence.
    pub const ALL: [MatchKind; 3] = [MatchKind::Email, MatchKind::Phone, MatchKind::Social];

    /// Stable lowercase identifier, matching the serde representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Social => "social",
        }
    }

    /// Get a human-readable display name for the kind.
    #[must_use]
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Email => "Email Address",
            Self::Phone => "Phone Number",
            Self::Social => "Social Profile",
        }
    }
}

impl fmt::Display for MatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// A typed substring hypothesis produced by the classifier.
///
/// Offsets are byte offsets into the originating text node's content at scan
/// time. Invariant: `start < end <= text.len()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextMatch {
    /// Category of the matched value
    pub kind: MatchKind,
    /// The exact substring matched
    pub value: String,
    /// Start offset within the originating text node
    pub start: usize,
    /// End offset (exclusive) within the originating text node
    pub end: usize,
}

impl TextMatch {
    /// Create a new match, validating the offset invariant.
    ///
    /// # Errors
    /// Returns error if `start >= end` or the span length does not cover
    /// the matched value.
    pub fn new(
        kind: MatchKind,
        value: impl Into<String>,
        start: usize,
        end: usize,
    ) -> Result<Self, PagelensError> {
        let value = value.into();
        if start >= end {
            return Err(PagelensError::Validation(format!(
                "match offsets out of order: start {start} >= end {end}"
            )));
        }
        if end - start != value.len() {
            return Err(PagelensError::Validation(format!(
                "match span {} does not cover value of length {}",
                end - start,
                value.len()
            )));
        }
        Ok(Self {
            kind,
            value,
            start,
            end,
        })
    }

    /// Whether this match overlaps another span.
    #[must_use]
    pub fn overlaps(&self, other: &TextMatch) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Newtype for scan session identifiers with validation.
///
/// Session IDs must be valid UUIDs (v4 format).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(String);

impl SessionId {
    /// Create a new `SessionId` from a string.
    ///
    /// # Errors
    /// Returns error if the ID is not a valid UUID v4.
    pub fn new(id: impl Into<String>) -> Result<Self, PagelensError> {
        let id = id.into();
        Self::validate(&id)?;
        Ok(Self(id))
    }

    /// Create a new random `SessionId` using UUID v4.
    #[must_use]
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Get the inner string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Validate that a string is a valid UUID v4.
    fn validate(id: &str) -> Result<(), PagelensError> {
        static UUID_REGEX: OnceLock<Regex> = OnceLock::new();
        let regex = UUID_REGEX.get_or_init(|| {
            Regex::new(r"^[0-9a-f]{8}-[0-9a-f]{4}-4[0-9a-f]{3}-[89ab][0-9a-f]{3}-[0-9a-f]{12}$")
                .expect("valid regex")
        });

        if regex.is_match(id) {
            Ok(())
        } else {
            Err(PagelensError::Validation(format!(
                "invalid session ID: must be a valid UUID v4, got '{id}'"
            )))
        }
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Wrapper around `chrono::DateTime<Utc>` for consistent timestamp handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Create a timestamp representing the current moment.
    #[must_use]
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Parse a timestamp from an RFC3339 string.
    pub fn from_rfc3339(s: &str) -> Result<Self, PagelensError> {
        DateTime::parse_from_rfc3339(s)
            .map(|dt| Self(dt.with_timezone(&Utc)))
            .map_err(|e| PagelensError::Validation(format!("invalid timestamp: {e}")))
    }

    /// Format as RFC3339 string.
    #[must_use]
    pub fn to_rfc3339(&self) -> String {
        self.0.to_rfc3339()
    }

    /// Get seconds since Unix epoch.
    #[must_use]
    pub fn timestamp(&self) -> i64 {
        self.0.timestamp()
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::now()
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }
}

/// Payload of the final result event emitted by a completed scan.
///
/// Value lists are deduplicated per kind and kept in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanResultPayload {
    /// Deduplicated email addresses in the order first seen
    pub emails: Vec<String>,
    /// Deduplicated phone numbers in the order first seen
    pub phones: Vec<String>,
    /// Deduplicated social-profile links in the order first seen
    pub socials: Vec<String>,
    /// URL of the scanned document
    pub source_url: String,
    /// Completion time of the scan
    pub time: Timestamp,
}

impl ScanResultPayload {
    /// Borrow the value list for one kind.
    #[must_use]
    pub fn values(&self, kind: MatchKind) -> &[String] {
        match kind {
            MatchKind::Email => &self.emails,
            MatchKind::Phone => &self.phones,
            MatchKind::Social => &self.socials,
        }
    }

    /// Per-kind value counts.
    #[must_use]
    pub fn counts(&self) -> KindCounts {
        KindCounts {
            emails: self.emails.len(),
            phones: self.phones.len(),
            socials: self.socials.len(),
        }
    }

    /// Total number of values across all kinds.
    #[must_use]
    pub fn total(&self) -> usize {
        self.emails.len() + self.phones.len() + self.socials.len()
    }
}

/// Per-kind value counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KindCounts {
    /// Number of email addresses
    pub emails: usize,
    /// Number of phone numbers
    pub phones: usize,
    /// Number of social-profile links
    pub socials: usize,
}

impl KindCounts {
    /// Sum across all kinds.
    #[must_use]
    pub fn total(&self) -> usize {
        self.emails + self.phones + self.socials
    }
}

/// One entry in the coordinator's capped scan history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// URL the values were extracted from
    pub source_url: String,
    /// Time the result arrived
    pub time: Timestamp,
    /// How many new values each kind contributed
    pub counts: KindCounts,
}

/// Aggregate statistics returned for a `GetStats` request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateStats {
    /// Running total of values recorded across all sessions
    pub total_found: u64,
    /// Current per-kind counts
    pub counts: KindCounts,
    /// Most recent scan results, oldest first
    pub history: Vec<HistoryEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_kind_serialization() {
        let kind = MatchKind::Email;
        let json = serde_json::to_string(&kind).expect("serialize kind");
        assert_eq!(json, "\"email\"");

        let deserialized: MatchKind = serde_json::from_str(&json).expect("deserialize kind");
        assert_eq!(deserialized, kind);
    }

    #[test]
    fn test_match_kind_display() {
        assert_eq!(MatchKind::Email.to_string(), "Email Address");
        assert_eq!(MatchKind::Social.to_string(), "Social Profile");
    }

    #[test]
    fn test_text_match_valid() {
        let m = TextMatch::new(MatchKind::Email, "a@b.com", 8, 15).expect("valid match");
        assert_eq!(m.value, "a@b.com");
        assert_eq!(m.end - m.start, 7);
    }

    #[test]
    fn test_text_match_invalid_offsets() {
        assert!(TextMatch::new(MatchKind::Email, "a@b.com", 15, 8).is_err());
        assert!(TextMatch::new(MatchKind::Email, "a@b.com", 8, 8).is_err());
        assert!(TextMatch::new(MatchKind::Email, "a@b.com", 0, 3).is_err());
    }

    #[test]
    fn test_text_match_overlap() {
        let a = TextMatch::new(MatchKind::Email, "a@b.co", 0, 6).expect("valid match");
        let b = TextMatch::new(MatchKind::Phone, "555-123-45", 5, 15).expect("valid match");
        let c = TextMatch::new(MatchKind::Phone, "555-123-45", 6, 16).expect("valid match");
        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c));
    }

    #[test]
    fn test_session_id_generate() {
        let id1 = SessionId::generate();
        let id2 = SessionId::generate();
        assert_ne!(id1, id2);
        assert!(SessionId::new(id1.as_str()).is_ok());
    }

    #[test]
    fn test_session_id_invalid() {
        for id in ["not-a-uuid", "", "550e8400-e29b-51d4-a716-446655440000"] {
            assert!(SessionId::new(id).is_err(), "should fail for: {id}");
        }
    }

    #[test]
    fn test_timestamp_rfc3339_roundtrip() {
        let ts = Timestamp::now();
        let parsed = Timestamp::from_rfc3339(&ts.to_rfc3339()).expect("parse timestamp");
        assert_eq!(ts.timestamp(), parsed.timestamp());
    }

    #[test]
    fn test_payload_counts() {
        let payload = ScanResultPayload {
            emails: vec!["a@b.com".to_string()],
            phones: vec!["555-123-4567".to_string(), "555-987-6543".to_string()],
            socials: vec![],
            source_url: "https://example.com".to_string(),
            time: Timestamp::now(),
        };

        assert_eq!(payload.counts().emails, 1);
        assert_eq!(payload.counts().phones, 2);
        assert_eq!(payload.total(), 3);
        assert_eq!(payload.values(MatchKind::Phone).len(), 2);
    }
}
