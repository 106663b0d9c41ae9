use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::StatEntry;

/// Compact host view returned by list and lookup reads
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostSummary {
    pub hostname: String,
    pub data_points: u64,
    pub last_insert: DateTime<Utc>,
}

/// Host aggregate root: the summary plus the full stat history.
///
/// `data_points` always equals the history length; both only change
/// through [`HostRecord::push`], so the two cannot drift apart.
#[derive(Debug, Clone)]
pub struct HostRecord {
    summary: HostSummary,
    history: VecDeque<StatEntry>,
}

impl HostRecord {
    /// A record comes into existence with its first snapshot; there is no
    /// separate host registration step.
    pub fn first(hostname: impl Into<String>, entry: StatEntry, at: DateTime<Utc>) -> Self {
        Self {
            summary: HostSummary {
                hostname: hostname.into(),
                data_points: 1,
                last_insert: at,
            },
            history: VecDeque::from([entry]),
        }
    }

    /// Prepend a snapshot: history is kept newest-first.
    pub fn push(&mut self, entry: StatEntry, at: DateTime<Utc>) {
        self.history.push_front(entry);
        self.summary.data_points += 1;
        self.summary.last_insert = at;
    }

    pub fn summary(&self) -> &HostSummary {
        &self.summary
    }

    pub fn history(&self) -> &VecDeque<StatEntry> {
        &self.history
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }
}
