//! Pattern classifier for contact identifiers.
//!
//! Maps a text span to zero or more typed candidate matches. Classification
//! is pure and total: identical input always yields identical candidates, and
//! text with no matches yields an empty sequence rather than an error.

use crate::error::Result;
use pagelens_core::{MatchKind, PatternConfig, TextMatch};
use regex::Regex;
use std::sync::OnceLock;

/// Local part, `@`, dot-separated domain labels, final alphabetic label of
/// length >= 2.
const EMAIL_PATTERN: &str = r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}";

/// Optional `+` country prefix, optional parenthesized area code, then digit
/// groups of 1-5 separated by `-`, `.`, or whitespace. Raw digit count is
/// validated separately.
const PHONE_PATTERN: &str = r"(?:\+\d{1,3}[\s.-]?)?(?:\(\d{1,5}\)[\s.-]?)?\d{1,5}(?:[\s.-]\d{1,5})*";

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(EMAIL_PATTERN).expect("valid regex"))
}

fn phone_regex() -> &'static Regex {
    static PHONE: OnceLock<Regex> = OnceLock::new();
    PHONE.get_or_init(|| Regex::new(PHONE_PATTERN).expect("valid regex"))
}

/// Classifies text spans against the three pattern families.
///
/// The social pattern is built from the configured host allow-list, and the
/// phone digit threshold is the configured heuristic, so classifiers are
/// constructed per configuration rather than held in statics.
#[derive(Debug, Clone)]
pub struct PatternClassifier {
    social: Regex,
    min_phone_digits: usize,
}

impl PatternClassifier {
    /// Build a classifier from pattern configuration.
    ///
    /// # Errors
    /// Returns `ScanError::Pattern` if the social allow-list produces an
    /// invalid expression.
    pub fn new(config: &PatternConfig) -> Result<Self> {
        let social = Regex::new(&Self::social_pattern(&config.social_hosts))?;
        Ok(Self {
            social,
            min_phone_digits: config.min_phone_digits,
        })
    }

    fn social_pattern(hosts: &[String]) -> String {
        if hosts.is_empty() {
            // Unmatchable: an empty allow-list disables the social family.
            return r"[^\s\S]".to_string();
        }
        let alternation = hosts
            .iter()
            .map(|host| regex::escape(host))
            .collect::<Vec<_>>()
            .join("|");
        format!(r"https?://(?:www\.)?(?:{alternation})\.com/[A-Za-z0-9._%-]+")
    }

    /// Find all candidate matches in a text span.
    ///
    /// Candidates are returned in family order (email, phone, social); the
    /// overlap resolver relies on this order to break start-offset ties. A
    /// single substring may satisfy more than one family here; conflicts are
    /// the resolver's problem, not the classifier's.
    #[must_use]
    pub fn classify(&self, text: &str) -> Vec<TextMatch> {
        let mut candidates = Vec::new();

        for m in email_regex().find_iter(text) {
            candidates.push(TextMatch {
                kind: MatchKind::Email,
                value: m.as_str().to_string(),
                start: m.start(),
                end: m.end(),
            });
        }

        for m in phone_regex().find_iter(text) {
            if count_digits(m.as_str()) < self.min_phone_digits {
                continue;
            }
            candidates.push(TextMatch {
                kind: MatchKind::Phone,
                value: m.as_str().to_string(),
                start: m.start(),
                end: m.end(),
            });
        }

        for m in self.social.find_iter(text) {
            candidates.push(TextMatch {
                kind: MatchKind::Social,
                value: m.as_str().to_string(),
                start: m.start(),
                end: m.end(),
            });
        }

        candidates
    }

    /// Match a resolved hyperlink target against the social pattern.
    ///
    /// Link destinations are not always rendered as visible text, so they get
    /// their own pass after text scanning.
    #[must_use]
    pub fn classify_social_url(&self, url: &str) -> Option<String> {
        self.social.find(url).map(|m| m.as_str().to_string())
    }
}

fn count_digits(value: &str) -> usize {
    value.chars().filter(char::is_ascii_digit).count()
}
