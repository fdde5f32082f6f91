//! Cross-session aggregation of scan results.

use pagelens_core::{AggregateStats, HistoryEntry, KindCounts, ScanResultPayload};
use serde::{Deserialize, Serialize};

/// The running aggregate of every value ever recorded, plus a capped history
/// of the scans that contributed something new.
///
/// Value lists are deduplicated and kept in the order first recorded across
/// all sessions. Serialized as the coordinator's single stored record, with
/// defaults for any missing field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Aggregate {
    /// Running total of distinct values across all kinds
    pub total_found: u64,
    /// Every distinct email seen, in first-recorded order
    pub emails: Vec<String>,
    /// Every distinct phone number seen, in first-recorded order
    pub phones: Vec<String>,
    /// Every distinct social link seen, in first-recorded order
    pub socials: Vec<String>,
    /// Recent contributing scans, oldest first
    pub history: Vec<HistoryEntry>,
}

impl Aggregate {
    /// Fold one scan result into the aggregate.
    ///
    /// Returns how many of the payload's values were new. A history entry is
    /// appended only when at least one value was new; the history is then
    /// trimmed to `history_max`, evicting the oldest entries first.
    pub fn fold(&mut self, payload: &ScanResultPayload, history_max: usize) -> usize {
        let new_counts = KindCounts {
            emails: merge_new(&mut self.emails, &payload.emails),
            phones: merge_new(&mut self.phones, &payload.phones),
            socials: merge_new(&mut self.socials, &payload.socials),
        };

        let new_values = new_counts.total();
        if new_values == 0 {
            return 0;
        }

        self.total_found += new_values as u64;
        self.history.push(HistoryEntry {
            source_url: payload.source_url.clone(),
            time: payload.time,
            counts: new_counts,
        });
        if self.history.len() > history_max {
            let excess = self.history.len() - history_max;
            self.history.drain(..excess);
        }

        new_values
    }

    /// Current statistics snapshot.
    #[must_use]
    pub fn stats(&self) -> AggregateStats {
        AggregateStats {
            total_found: self.total_found,
            counts: KindCounts {
                emails: self.emails.len(),
                phones: self.phones.len(),
                socials: self.socials.len(),
            },
            history: self.history.clone(),
        }
    }
}

/// Append the values not already present, returning how many were new.
fn merge_new(existing: &mut Vec<String>, incoming: &[String]) -> usize {
    let mut added = 0;
    for value in incoming {
        if !existing.contains(value) {
            existing.push(value.clone());
            added += 1;
        }
    }
    added
}
