//! Selection and ordering of the cards for one session.
//!
//! Selection rules are mutually exclusive by construction:
//!
//! ```text
//! Memorize    : never mastered AND not queued      (shuffled)
//! Consolidate : queued                             (incorrect_count desc, stable)
//! Review      : mastered at least once AND due     (shuffled)
//! ```

use rand::prelude::*;
use rand_pcg::Mcg128Xsl64;
use tracing::debug;

use super::engine::Session;
use super::mode::LearningMode;
use crate::model::{Timestamp, Word, WordList};
use crate::schedule::ReviewClock;

/// Builds snapshot queues for learning sessions.
#[derive(Debug, Clone, Default)]
pub struct QueueBuilder {
    review: ReviewClock,
    /// Random seed for reproducible card order (None = random)
    seed: Option<u64>,
}

impl QueueBuilder {
    pub fn new(review: ReviewClock) -> Self {
        Self { review, seed: None }
    }

    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    pub fn review_clock(&self) -> &ReviewClock {
        &self.review
    }

    /// Eligible words for `mode` in final order, as owned copies.
    pub fn build(&self, list: &WordList, mode: LearningMode, now: Timestamp) -> Vec<Word> {
        let mut queue = self.select(list, mode, now);
        match mode {
            LearningMode::Memorize | LearningMode::Review => self.shuffle(&mut queue),
            LearningMode::Consolidate => {
                // sort_by_key is stable: ties keep display order.
                queue.sort_by_key(|w| std::cmp::Reverse(w.incorrect_count));
            }
        }
        debug!(list_id = %list.id, %mode, cards = queue.len(), "built session queue");
        queue
    }

    /// Eligible words in display order, before any reordering.
    pub fn select(&self, list: &WordList, mode: LearningMode, now: Timestamp) -> Vec<Word> {
        list.words
            .iter()
            .filter(|w| self.is_eligible(list, w, mode, now))
            .cloned()
            .collect()
    }

    pub fn is_eligible(
        &self,
        list: &WordList,
        word: &Word,
        mode: LearningMode,
        now: Timestamp,
    ) -> bool {
        match mode {
            LearningMode::Memorize => !word.is_mastered() && !list.is_queued(&word.id),
            LearningMode::Consolidate => list.is_queued(&word.id),
            LearningMode::Review => word.is_mastered() && self.review.is_due(word, now),
        }
    }

    /// Build the queue and wrap it in a fresh session.
    ///
    /// `daily_count` is the persisted count for the current day, so the session
    /// can report a running total.
    pub fn start_session(
        &self,
        list: &WordList,
        mode: LearningMode,
        now: Timestamp,
        daily_count: u32,
    ) -> Session {
        Session::new(list.id.clone(), mode, self.build(list, mode, now), daily_count)
    }

    fn shuffle(&self, words: &mut [Word]) {
        let mut rng = match self.seed {
            Some(seed) => Mcg128Xsl64::seed_from_u64(seed),
            None => Mcg128Xsl64::from_entropy(),
        };
        words.shuffle(&mut rng);
    }
}
