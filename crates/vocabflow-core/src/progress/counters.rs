//! Derived list statistics.
//!
//! Pure functions over a list snapshot; nothing here is stored.

use serde::{Deserialize, Serialize};

use crate::model::{Timestamp, WordList};
use crate::schedule::ReviewClock;

/// Words that have left the "new" state: queued or mastered at least once.
pub fn learned_count(list: &WordList) -> usize {
    list.words
        .iter()
        .filter(|w| list.is_queued(&w.id) || w.is_mastered())
        .count()
}

/// Words mastered at least once.
pub fn mastered_count(list: &WordList) -> usize {
    list.words.iter().filter(|w| w.is_mastered()).count()
}

/// Dashboard figures for one list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ListProgress {
    pub total: usize,
    pub learned: usize,
    pub mastered: usize,
    /// Size of the consolidation queue.
    pub queued: usize,
    /// Eligible for a memorize session.
    pub new_words: usize,
    /// Eligible for a review session right now.
    pub due: usize,
}

impl ListProgress {
    pub fn compute(list: &WordList, review: &ReviewClock, now: Timestamp) -> Self {
        let mut progress = ListProgress {
            total: list.len(),
            learned: learned_count(list),
            mastered: mastered_count(list),
            ..Default::default()
        };
        for word in &list.words {
            let queued = list.is_queued(&word.id);
            if queued {
                progress.queued += 1;
            }
            if !queued && !word.is_mastered() {
                progress.new_words += 1;
            }
            if review.is_due(word, now) {
                progress.due += 1;
            }
        }
        progress
    }

    /// Mastered share of the list in 0.0..=1.0.
    pub fn mastered_ratio(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.mastered as f64 / self.total as f64
    }
}
