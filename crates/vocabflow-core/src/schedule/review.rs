//! Due-date calculation from a word's mastery history.

use serde::{Deserialize, Serialize};

use super::interval::IntervalTable;
use crate::model::{Timestamp, Word, WordList};

/// Lifecycle position of a word, derived from its history and queue membership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum WordStatus {
    /// Never mastered and not queued.
    New,
    /// In the consolidation queue, whatever its history.
    Queued,
    /// Mastered at least once and waiting for its next review.
    Scheduled { due_at: Timestamp },
}

/// Computes next-due times against an [`IntervalTable`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewClock {
    table: IntervalTable,
}

impl ReviewClock {
    pub fn new(table: IntervalTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &IntervalTable {
        &self.table
    }

    /// `None` for a word that was never mastered; such a word is never due.
    pub fn next_due_time(&self, word: &Word) -> Option<Timestamp> {
        let stage = word.stage()?;
        let last = word.last_mastered()?;
        Some(last.saturating_add(self.table.millis_for_stage(stage)))
    }

    pub fn is_due(&self, word: &Word, now: Timestamp) -> bool {
        self.next_due_time(word).is_some_and(|due| now >= due)
    }

    /// Negative when overdue. Display only; selection uses [`Self::is_due`].
    pub fn time_until_due(&self, word: &Word, now: Timestamp) -> Option<i64> {
        self.next_due_time(word).map(|due| due - now)
    }

    pub fn status(&self, list: &WordList, word: &Word) -> WordStatus {
        if list.is_queued(&word.id) {
            return WordStatus::Queued;
        }
        match self.next_due_time(word) {
            Some(due_at) => WordStatus::Scheduled { due_at },
            None => WordStatus::New,
        }
    }
}
